//! Metrics recorded by the Store runtime.
//!
//! Metrics go through the `metrics` facade. Nothing is exported unless the
//! host installs a recorder; without one every call is a no-op.
//!
//! # Example
//!
//! ```
//! use composable_todo_runtime::metrics::register_metrics;
//!
//! // Attach descriptions once at startup, before the first Store is built
//! register_metrics();
//! ```

use metrics::{describe_counter, describe_histogram};
use std::time::Duration;

// Re-export metrics macros for use in other modules
pub use metrics::{counter, histogram};

/// Register descriptions for every metric the runtime records.
pub fn register_metrics() {
    describe_counter!(
        "store.commands.total",
        "Total number of actions sent to a store"
    );
    describe_histogram!(
        "store.reducer.duration_seconds",
        "Time spent inside the reducer per action"
    );
    describe_histogram!(
        "store.effects.count",
        "Number of effects returned per reduced action"
    );
    describe_counter!(
        "store.effects.executed",
        "Total number of effects executed, labelled by type"
    );
    describe_counter!(
        "store.shutdown.initiated",
        "Number of graceful shutdowns started"
    );
    describe_counter!(
        "store.shutdown.completed",
        "Number of graceful shutdowns that drained all effects"
    );
    describe_counter!(
        "store.shutdown.timeout",
        "Number of graceful shutdowns that gave up with effects pending"
    );
    describe_counter!(
        "store.shutdown.rejected_actions",
        "Actions rejected because the store was shutting down"
    );
}

/// Store metrics recorder.
pub struct StoreMetrics;

impl StoreMetrics {
    /// Record an action entering the store.
    pub fn record_command() {
        counter!("store.commands.total").increment(1);
    }

    /// Record one reducer run and the number of effects it produced.
    pub fn record_reduce(duration: Duration, effects: usize) {
        histogram!("store.reducer.duration_seconds").record(duration.as_secs_f64());
        // Note: Precision loss acceptable for metrics (effect counts < 2^52)
        #[allow(clippy::cast_precision_loss)]
        histogram!("store.effects.count").record(effects as f64);
    }

    /// Record an executed effect by type label.
    pub fn record_effect(kind: &'static str) {
        counter!("store.effects.executed", "type" => kind).increment(1);
    }

    /// Record a shutdown lifecycle step.
    pub fn record_shutdown(step: ShutdownStep) {
        match step {
            ShutdownStep::Initiated => counter!("store.shutdown.initiated").increment(1),
            ShutdownStep::Completed => counter!("store.shutdown.completed").increment(1),
            ShutdownStep::TimedOut => counter!("store.shutdown.timeout").increment(1),
            ShutdownStep::RejectedAction => {
                counter!("store.shutdown.rejected_actions").increment(1);
            },
        }
    }
}

/// Lifecycle steps of a graceful shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownStep {
    /// Shutdown flag raised
    Initiated,
    /// All pending effects drained
    Completed,
    /// Timeout elapsed with effects still running
    TimedOut,
    /// An action arrived after shutdown started
    RejectedAction,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_without_recorder_is_noop() {
        register_metrics();
        StoreMetrics::record_command();
        StoreMetrics::record_reduce(Duration::from_millis(1), 2);
        StoreMetrics::record_effect("future");
        StoreMetrics::record_shutdown(ShutdownStep::Initiated);
    }
}
