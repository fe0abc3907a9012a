//! # Composable Todo Testing
//!
//! Testing utilities and helpers for the Composable Todo architecture.
//!
//! This crate provides:
//! - Mock implementations of Environment traits
//! - [`ReducerTest`], a Given-When-Then harness for reducers
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use composable_todo_testing::{mocks::InMemoryStorage, test_clock};
//!
//! let storage = InMemoryStorage::new();
//! let env = TodoEnvironment::new(Arc::new(test_clock()), Arc::new(storage.clone()));
//! ```

use chrono::{DateTime, Utc};
use composable_todo_core::environment::Clock;


/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use composable_todo_core::environment::{IdGenerator, KeyValueStorage, StorageError};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex, MutexGuard};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use composable_todo_testing::mocks::FixedClock;
    /// use composable_todo_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(DateTime::<Utc>::UNIX_EPOCH + chrono::Duration::days(20_089))
    }

    /// Predictable ids: 1, 2, 3, ...
    #[derive(Debug, Clone, Default)]
    pub struct SequentialIdGenerator {
        next: Arc<AtomicU64>,
    }

    impl SequentialIdGenerator {
        /// Start counting at 1
        #[must_use]
        pub fn new() -> Self {
            Self::starting_at(1)
        }

        /// Start counting at `first`
        #[must_use]
        pub fn starting_at(first: u64) -> Self {
            Self {
                next: Arc::new(AtomicU64::new(first)),
            }
        }
    }

    impl IdGenerator for SequentialIdGenerator {
        fn next_id(&self) -> u64 {
            self.next.fetch_add(1, Ordering::SeqCst)
        }
    }

    /// In-memory key-value storage
    ///
    /// Clones share the same map, so a test can keep one clone to inspect
    /// what the code under test wrote. Every `set_item` is counted.
    #[derive(Debug, Clone, Default)]
    pub struct InMemoryStorage {
        items: Arc<Mutex<HashMap<String, String>>>,
        writes: Arc<AtomicUsize>,
    }

    impl InMemoryStorage {
        /// Create empty storage
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Create storage pre-seeded with one key
        #[must_use]
        pub fn with_item(key: &str, value: &str) -> Self {
            let storage = Self::new();
            storage.lock().insert(key.to_string(), value.to_string());
            storage
        }

        /// Current value under `key`
        #[must_use]
        pub fn item(&self, key: &str) -> Option<String> {
            self.lock().get(key).cloned()
        }

        /// Number of `set_item` calls so far
        #[must_use]
        pub fn write_count(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }

        // A poisoned map only means another test thread panicked mid-write
        fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
            self.items
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
        }
    }

    impl KeyValueStorage for InMemoryStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            Ok(self.item(key))
        }

        fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.lock().insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    /// Storage whose every operation fails, for error-path tests
    #[derive(Debug, Clone)]
    pub struct FailingStorage {
        reason: String,
    }

    impl FailingStorage {
        /// Fail every call with `reason`
        #[must_use]
        pub fn new(reason: impl Into<String>) -> Self {
            Self {
                reason: reason.into(),
            }
        }
    }

    impl KeyValueStorage for FailingStorage {
        fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable(self.reason.clone()))
        }

        fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable(self.reason.clone()))
        }
    }
}

// Re-export commonly used items
pub use mocks::{test_clock, FixedClock, InMemoryStorage, SequentialIdGenerator};
pub use reducer_test::{assertions, ReducerTest};
