//! # Composable Todo Runtime
//!
//! Runtime implementation for the Composable Todo architecture.
//!
//! This crate provides the Store runtime that coordinates reducer execution
//! and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: The runtime that manages state and executes effects
//! - **`EffectHandle`**: Lets a caller wait until the effects of one action finished
//! - **Event Loop**: The action → reducer → effects → action feedback loop
//!
//! ## Example
//!
//! ```ignore
//! use composable_todo_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action and wait for its effects
//! let mut handle = store.send(Action::DoSomething).await?;
//! handle.wait().await;
//!
//! // Read state
//! let value = store.state(|s| s.some_field).await;
//! ```

use composable_todo_core::{effect::Effect, reducer::Reducer};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};

/// Metrics for observability
pub mod metrics;

use metrics::{ShutdownStep, StoreMetrics};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// This error is returned when `send()` is called after shutdown initiated.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        ///
        /// Some effects were still running when the timeout elapsed.
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),

        /// Waiting on an [`EffectHandle`](crate::EffectHandle) exceeded its timeout
        #[error("Timed out waiting for effects after {0:?}")]
        Timeout(std::time::Duration),
    }
}

pub use error::StoreError;

/// Handle for tracking effect completion
///
/// Returned by [`Store::send()`] to allow waiting for the effects of that
/// action to complete. Actions fed back by those effects are reduced before
/// the effect counts as finished, so after [`EffectHandle::wait`] returns the
/// state reflects the whole feedback chain of direct effects.
///
/// # Example
///
/// ```ignore
/// let mut handle = store.send(Action::Save).await?;
/// handle.wait_with_timeout(Duration::from_secs(5)).await?;
/// // The write requested by Action::Save has landed
/// ```
#[derive(Clone)]
pub struct EffectHandle {
    effects: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    /// Create a handle together with the tracking context used by effect execution
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(());

        let handle = Self {
            effects: Arc::clone(&counter),
            completion: rx,
        };

        let tracking = EffectTracking {
            counter,
            notifier: Arc::new(tx),
        };

        (handle, tracking)
    }

    /// Number of effects still running
    #[must_use]
    pub fn pending(&self) -> usize {
        self.effects.load(Ordering::SeqCst)
    }

    /// Wait for all effects to complete
    pub async fn wait(&mut self) {
        while self.effects.load(Ordering::SeqCst) > 0 {
            // Sender dropped means every tracking clone is gone, so the count is final
            if self.completion.changed().await.is_err() {
                break;
            }
        }
    }

    /// Wait for all effects to complete with a timeout
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if the timeout expires before all
    /// effects complete.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout(timeout))
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending_effects", &self.pending())
            .finish_non_exhaustive()
    }
}

/// Internal: Effect tracking context passed through effect execution
#[derive(Clone)]
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: Arc<watch::Sender<()>>,
}

impl EffectTracking {
    /// Increment the effect counter (effect started)
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    /// Decrement the effect counter (effect completed)
    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            // Counter reached zero, notify waiters
            let _ = self.notifier.send(());
        }
    }
}

/// Internal: RAII guard that decrements effect counter on drop
///
/// Ensures the effect counter is always decremented, even if the effect panics.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// Guard that decrements an atomic counter on drop (for shutdown tracking)
struct AtomicCounterGuard(Arc<AtomicUsize>);

impl Drop for AtomicCounterGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Store runtime for coordinating reducer execution and effect handling.
pub mod store {
    use super::{
        Arc, AtomicBool, AtomicCounterGuard, AtomicUsize, DecrementGuard, Duration, Effect,
        EffectHandle, EffectTracking, Ordering, Reducer, RwLock, ShutdownStep, StoreError,
        StoreMetrics,
    };

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock`, so reducer runs are serialized)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop)
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: R,
        environment: E,
        shutdown: Arc<AtomicBool>,
        pending_effects: Arc<AtomicUsize>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer,
                environment,
                shutdown: Arc::new(AtomicBool::new(false)),
                pending_effects: Arc::new(AtomicUsize::new(0)),
            }
        }

        /// Send an action to the store
        ///
        /// 1. Acquires write lock on state
        /// 2. Calls reducer with (state, action, environment)
        /// 3. Spawns the returned effects
        /// 4. Effects may produce more actions (feedback loop)
        ///
        /// `send()` returns after starting effect execution, not completion.
        /// Await the returned [`EffectHandle`] to know when they finished.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        ///
        /// # Panics
        ///
        /// If the reducer panics, the panic will propagate and halt the store.
        /// Reducers should be pure functions that do not panic.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError>
        where
            R: Clone,
            E: Clone,
        {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                StoreMetrics::record_shutdown(ShutdownStep::RejectedAction);
                return Err(StoreError::ShutdownInProgress);
            }

            tracing::debug!("Processing action");
            StoreMetrics::record_command();

            let (handle, tracking) = EffectHandle::new();

            let effects = {
                let mut state = self.state.write().await;
                tracing::trace!("Acquired write lock on state");

                let span = tracing::debug_span!("reducer_execution");
                let _enter = span.enter();

                let start = std::time::Instant::now();
                let effects = self.reducer.reduce(&mut *state, action, &self.environment);
                StoreMetrics::record_reduce(start.elapsed(), effects.len());

                tracing::trace!("Reducer completed, returned {} effects", effects.len());
                effects
            };

            for effect in effects {
                self.execute_effect(effect, &tracking);
            }

            Ok(handle)
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let todo_count = store.state(|s| s.todos.len()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        /// Initiate graceful shutdown of the store
        ///
        /// Sets the shutdown flag (rejecting new actions) and waits for
        /// pending effects to complete.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if the timeout expires before all
        /// pending effects complete.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Initiating graceful shutdown");
            StoreMetrics::record_shutdown(ShutdownStep::Initiated);

            self.shutdown.store(true, Ordering::Release);

            let start = std::time::Instant::now();
            let poll_interval = Duration::from_millis(10);

            loop {
                let pending = self.pending_effects.load(Ordering::Acquire);

                if pending == 0 {
                    tracing::info!("All effects completed, shutdown successful");
                    StoreMetrics::record_shutdown(ShutdownStep::Completed);
                    return Ok(());
                }

                if start.elapsed() >= timeout {
                    tracing::error!(
                        pending_effects = pending,
                        "Shutdown timeout: {} effects still running", pending
                    );
                    StoreMetrics::record_shutdown(ShutdownStep::TimedOut);
                    return Err(StoreError::ShutdownTimeout(pending));
                }

                tokio::time::sleep(poll_interval).await;
            }
        }

        /// Execute an effect with tracking
        ///
        /// - `None`: No-op
        /// - `Future`: Spawns the computation; a produced action is sent back
        ///   to the store before the effect counts as complete
        ///
        /// Effect failures are logged and never halt the store.
        fn execute_effect(&self, effect: Effect<A>, tracking: &EffectTracking)
        where
            R: Clone,
            E: Clone,
        {
            match effect {
                Effect::None => {
                    tracing::trace!("Executing Effect::None (no-op)");
                    StoreMetrics::record_effect("none");
                },
                Effect::Future(fut) => {
                    tracing::trace!("Executing Effect::Future");
                    StoreMetrics::record_effect("future");
                    tracking.increment();

                    // Track global pending effects for shutdown
                    self.pending_effects.fetch_add(1, Ordering::SeqCst);
                    let pending_guard = AtomicCounterGuard(Arc::clone(&self.pending_effects));

                    let guard = DecrementGuard(tracking.clone());
                    let store = self.clone();

                    tokio::spawn(async move {
                        let _guard = guard;
                        let _pending_guard = pending_guard;

                        if let Some(action) = fut.await {
                            tracing::trace!("Effect::Future produced an action, sending to store");
                            if let Err(error) = store.send(action).await {
                                tracing::warn!(%error, "Dropped action produced by effect");
                            }
                        } else {
                            tracing::trace!("Effect::Future completed with no action");
                        }
                    });
                },
            }
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone,
        E: Clone,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: self.reducer.clone(),
                environment: self.environment.clone(),
                shutdown: Arc::clone(&self.shutdown),
                pending_effects: Arc::clone(&self.pending_effects),
            }
        }
    }
}

// Re-export for convenience
pub use store::Store;
