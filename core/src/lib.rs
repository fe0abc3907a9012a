//! # Composable Todo Core
//!
//! Core traits and types for the Composable Todo architecture.
//!
//! This crate provides the abstractions every feature is built from:
//!
//! - **State**: Domain state for a feature
//! - **Action**: All possible inputs to a reducer (user intents and feedback events)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Environment**: Injected dependencies via traits (clock, ids, storage)
//!
//! ## Example
//!
//! ```
//! use composable_todo_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! #[derive(Debug, Default)]
//! struct CounterState {
//!     count: i64,
//! }
//!
//! enum CounterAction {
//!     Increment,
//! }
//!
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut CounterState,
//!         action: CounterAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<CounterAction>; 4]> {
//!         match action {
//!             CounterAction::Increment => state.count += 1,
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! let mut state = CounterState::default();
//! let effects = CounterReducer.reduce(&mut state, CounterAction::Increment, &());
//! assert_eq!(state.count, 1);
//! assert_eq!(effects.len(), 1);
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{smallvec, SmallVec};

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`.
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        ///
        /// Most actions produce zero or one effect, so effects are returned
        /// inline in a `SmallVec` without allocating.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values, returned from reducers and executed by the Store.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;

    /// Effect type - describes a side effect to be executed
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Wrap a future into an effect
        #[must_use]
        pub fn future<F>(fut: F) -> Self
        where
            F: Future<Output = Option<Action>> + Send + 'static,
        {
            Effect::Future(Box::pin(fut))
        }

        /// Returns true if this effect does nothing
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Effect::None)
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter, so reducers stay deterministic under test.
pub mod environment {
    use chrono::{DateTime, Utc};
    use thiserror::Error;

    /// Clock trait - abstracts time operations for testability
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Id generator - produces integer identifiers for new records
    ///
    /// Implementations must return strictly increasing values for the
    /// lifetime of the generator.
    pub trait IdGenerator: Send + Sync {
        /// Produce the next identifier
        fn next_id(&self) -> u64;
    }

    /// Errors raised by a [`KeyValueStorage`] backend
    #[derive(Error, Debug)]
    pub enum StorageError {
        /// The key contains characters the backend cannot address
        #[error("Invalid storage key: {0:?}")]
        InvalidKey(String),

        /// Underlying I/O failed
        #[error("Storage I/O failed: {0}")]
        Io(#[from] std::io::Error),

        /// The backend refused the operation (quota, read-only, closed)
        #[error("Storage unavailable: {0}")]
        Unavailable(String),
    }

    /// Key-value storage surface
    ///
    /// String keys map to string values. Reads of absent keys return
    /// `Ok(None)`; writes replace the whole value.
    pub trait KeyValueStorage: Send + Sync {
        /// Read the value stored under `key`
        ///
        /// # Errors
        ///
        /// Returns [`StorageError`] if the backend cannot be read.
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

        /// Store `value` under `key`, replacing any previous value
        ///
        /// # Errors
        ///
        /// Returns [`StorageError`] if the backend cannot be written.
        fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    }
}
