//! Id generation for new todos.

use composable_todo_core::environment::{Clock, IdGenerator};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Ids derived from wall-clock milliseconds
///
/// Two todos created within the same millisecond (or after the clock stepped
/// backwards) get consecutive ids instead of colliding: every id is strictly
/// greater than the previous one.
pub struct TimestampIdGenerator {
    clock: Arc<dyn Clock>,
    last: AtomicU64,
}

impl TimestampIdGenerator {
    /// Creates a generator reading time from `clock`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            last: AtomicU64::new(0),
        }
    }
}

impl std::fmt::Debug for TimestampIdGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimestampIdGenerator")
            .field("last", &self.last.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl IdGenerator for TimestampIdGenerator {
    fn next_id(&self) -> u64 {
        // Clocks before 1970 are treated as 0 and fall back to the counter
        let now = u64::try_from(self.clock.now().timestamp_millis()).unwrap_or(0);
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last.saturating_add(1)))
            })
            .unwrap_or_else(|last| last);
        now.max(previous.saturating_add(1))
    }
}
