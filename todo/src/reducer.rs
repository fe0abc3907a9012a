//! Reducer logic for the todo list.
//!
//! Every mutation that changes (or may change) the list returns a persist
//! effect carrying a snapshot of the list taken while the write lock is held,
//! so writes reflect mutations in the order they were reduced.

use crate::ids::TimestampIdGenerator;
use crate::persistence::WriteSequencer;
use crate::types::{Todo, TodoAction, TodoId, TodoState};
use composable_todo_core::{
    effect::Effect,
    environment::{Clock, IdGenerator, KeyValueStorage},
    reducer::Reducer,
    smallvec, SmallVec,
};
use std::sync::Arc;

/// Environment dependencies for the todo reducer
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Source of ids for new todos
    pub ids: Arc<dyn IdGenerator>,
    /// Where the list is persisted
    pub storage: Arc<dyn KeyValueStorage>,
    /// Orders writes to `storage`
    pub writes: Arc<WriteSequencer>,
}

impl TodoEnvironment {
    /// Creates a new `TodoEnvironment`
    #[must_use]
    pub fn new(ids: Arc<dyn IdGenerator>, storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            ids,
            storage,
            writes: Arc::new(WriteSequencer::new()),
        }
    }

    /// Environment with timestamp-derived ids read from `clock`
    #[must_use]
    pub fn production(clock: Arc<dyn Clock>, storage: Arc<dyn KeyValueStorage>) -> Self {
        Self::new(Arc::new(TimestampIdGenerator::new(clock)), storage)
    }
}

/// Reducer for the todo list
#[derive(Clone, Debug, Default)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Draw ids until one is free; terminates because generators are monotonic
    fn fresh_id(state: &TodoState, env: &TodoEnvironment) -> TodoId {
        loop {
            let id = TodoId::new(env.ids.next_id());
            if !state.contains(id) {
                return id;
            }
            tracing::debug!(%id, "Generated id already taken, drawing another");
        }
    }

    /// Effect writing the current list to storage
    ///
    /// The write runs on the blocking pool. Its ticket is drawn here, while
    /// the store's write lock is held, so a write that finishes late never
    /// replaces a newer snapshot.
    fn persist(state: &TodoState, env: &TodoEnvironment) -> Effect<TodoAction> {
        let storage = Arc::clone(&env.storage);
        let writes = Arc::clone(&env.writes);
        let ticket = writes.ticket();
        let todos = state.todos.clone();

        Effect::future(async move {
            let saved =
                tokio::task::spawn_blocking(move || writes.save(ticket, storage.as_ref(), &todos))
                    .await;

            match saved {
                Ok(Ok(_)) => None,
                Ok(Err(error)) => Some(TodoAction::PersistFailed {
                    error: error.to_string(),
                }),
                Err(error) => Some(TodoAction::PersistFailed {
                    error: format!("Failed to run persist task: {error}"),
                }),
            }
        })
    }
}

/// Trim surrounding whitespace and byte order marks from typed text
fn trim_input(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
}

impl Reducer for TodoReducer {
    type State = TodoState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        tracing::debug!(action = action.name(), "Reducing todo action");

        // Commands other than BeginEdit redraw the list, which drops the edit field
        if action.is_command() && !matches!(action, TodoAction::BeginEdit { .. }) {
            state.editing = None;
        }

        match action {
            // ========== Commands ==========
            TodoAction::AddTodo { text } => {
                let text = trim_input(&text);
                if text.is_empty() {
                    tracing::debug!("Ignoring blank todo");
                    return SmallVec::new();
                }

                let id = Self::fresh_id(state, env);
                state.todos.push(Todo::new(id, text.to_string()));
                state.last_error = None;
                tracing::debug!(%id, "Todo added");

                smallvec![Self::persist(state, env)]
            },

            TodoAction::ToggleTodo { id } => {
                match state.get_mut(id) {
                    Some(todo) => todo.toggle(),
                    None => tracing::debug!(%id, "Toggle for unknown todo"),
                }
                state.last_error = None;

                smallvec![Self::persist(state, env)]
            },

            TodoAction::BeginEdit { id } => {
                if state.contains(id) {
                    state.editing = Some(id);
                }
                SmallVec::new()
            },

            TodoAction::CommitEdit { id, text } => {
                let text = trim_input(&text);
                let changed = match state.get_mut(id) {
                    Some(todo) if !text.is_empty() && todo.text != text => {
                        todo.text = text.to_string();
                        true
                    },
                    _ => false,
                };

                if changed {
                    state.last_error = None;
                    smallvec![Self::persist(state, env)]
                } else {
                    tracing::debug!(%id, "Edit left text unchanged");
                    SmallVec::new()
                }
            },

            TodoAction::DeleteTodo { id } => {
                state.todos.retain(|t| t.id != id);
                state.last_error = None;

                smallvec![Self::persist(state, env)]
            },

            TodoAction::ClearCompleted => {
                state.todos.retain(|t| !t.completed);
                state.last_error = None;

                smallvec![Self::persist(state, env)]
            },

            TodoAction::SetFilter { filter } => {
                state.filter = filter;
                SmallVec::new()
            },

            // ========== Events ==========
            TodoAction::PersistFailed { error } => {
                tracing::warn!(%error, "Failed to persist todos");
                state.last_error = Some(error);
                SmallVec::new()
            },
        }
    }
}
