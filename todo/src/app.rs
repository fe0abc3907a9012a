//! Controller binding a host surface to the todo store.
//!
//! Each host event becomes one action. The controller waits for that
//! action's effects (the storage write and any feedback) before redrawing,
//! so by the time [`TodoApp::dispatch`] returns the write has landed and the
//! surface shows the new list, counter and filter marker.

use crate::persistence;
use crate::reducer::{TodoEnvironment, TodoReducer};
use crate::surface::Surface;
use crate::types::{Filter, TodoAction, TodoId, TodoState};
use crate::view::{self, Frame};
use composable_todo_core::environment::StorageError;
use composable_todo_runtime::{Store, StoreError};
use std::io;
use std::time::Duration;
use thiserror::Error;

/// Longest time a single event may spend waiting for its write
pub const EFFECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Store specialised to the todo list
pub type TodoStore = Store<TodoState, TodoAction, TodoEnvironment, TodoReducer>;

/// User interaction reported by a host surface
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UiEvent {
    /// Add button clicked or Enter pressed in the input field
    AddRequested {
        /// Raw field value
        text: String,
    },
    /// Row checkbox changed
    CheckboxChanged {
        /// Row id
        id: TodoId,
    },
    /// Row delete control clicked
    DeleteClicked {
        /// Row id
        id: TodoId,
    },
    /// Row text double-clicked
    TextDoubleClicked {
        /// Row id
        id: TodoId,
    },
    /// Edit field lost focus
    EditBlurred {
        /// Row id
        id: TodoId,
        /// Raw field value
        value: String,
    },
    /// Enter pressed in the edit field
    EditConfirmed {
        /// Row id
        id: TodoId,
        /// Raw field value
        value: String,
    },
    /// Filter control clicked
    FilterClicked {
        /// Tag carried by the control
        tag: String,
    },
    /// Clear-completed control clicked
    ClearCompletedClicked,
}

impl From<UiEvent> for TodoAction {
    fn from(event: UiEvent) -> Self {
        match event {
            UiEvent::AddRequested { text } => Self::AddTodo { text },
            UiEvent::CheckboxChanged { id } => Self::ToggleTodo { id },
            UiEvent::DeleteClicked { id } => Self::DeleteTodo { id },
            UiEvent::TextDoubleClicked { id } => Self::BeginEdit { id },
            UiEvent::EditBlurred { id, value } | UiEvent::EditConfirmed { id, value } => {
                Self::CommitEdit { id, text: value }
            },
            UiEvent::FilterClicked { tag } => Self::SetFilter {
                filter: Filter::from_tag(&tag),
            },
            UiEvent::ClearCompletedClicked => Self::ClearCompleted,
        }
    }
}

/// Errors raised by the todo application
#[derive(Error, Debug)]
pub enum TodoError {
    /// The store rejected an action or timed out
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The stored list could not be read
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The surface could not be written
    #[error("Surface error: {0}")]
    Surface(#[from] io::Error),
}

/// Todo application driving a [`Surface`]
pub struct TodoApp<V: Surface> {
    store: TodoStore,
    surface: V,
}

impl<V: Surface> TodoApp<V> {
    /// Load the stored list and draw the first frame
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Storage`] if the stored list cannot be read, or
    /// [`TodoError::Surface`] if the first frame cannot be drawn.
    pub async fn start(env: TodoEnvironment, surface: V) -> Result<Self, TodoError> {
        let todos = persistence::load_todos(env.storage.as_ref())?;
        tracing::info!(count = todos.len(), "Loaded todos");

        let store = Store::new(TodoState::from_todos(todos), TodoReducer::new(), env);
        let mut app = Self { store, surface };
        app.refresh().await?;
        Ok(app)
    }

    /// Handle one host event
    ///
    /// The event's write is awaited for at most [`EFFECT_TIMEOUT`]. A write
    /// still running after that keeps going in the background; writes are
    /// sequenced, so a late one is dropped rather than overwriting the
    /// snapshot of a newer event.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Store`] if the store is shutting down or the
    /// write did not finish in time, or [`TodoError::Surface`] if redrawing
    /// failed.
    #[tracing::instrument(skip(self))]
    pub async fn dispatch(&mut self, event: UiEvent) -> Result<(), TodoError> {
        let is_add = matches!(event, UiEvent::AddRequested { .. });
        let before = self.store.state(TodoState::count).await;

        self.apply(event.into()).await?;

        if is_add && self.store.state(TodoState::count).await > before {
            self.surface.clear_input()?;
        }

        self.refresh().await
    }

    async fn apply(&self, action: TodoAction) -> Result<(), TodoError> {
        let mut handle = self.store.send(action).await?;
        handle.wait_with_timeout(EFFECT_TIMEOUT).await?;

        if let Some(error) = self.store.state(|s| s.last_error.clone()).await {
            tracing::debug!(%error, "Last write failed, in-memory list stays authoritative");
        }
        Ok(())
    }

    async fn refresh(&mut self) -> Result<(), TodoError> {
        let frame = self.frame().await;
        self.surface.render_list(&frame.list)?;
        self.surface.set_remaining(&frame.remaining)?;
        self.surface.set_active_filter(frame.filter)?;
        Ok(())
    }

    /// What the surface currently shows
    pub async fn frame(&self) -> Frame {
        self.store.state(view::render).await
    }

    /// Snapshot of the current state
    pub async fn state(&self) -> TodoState {
        self.store.state(Clone::clone).await
    }

    /// The driven surface
    pub const fn surface(&self) -> &V {
        &self.surface
    }

    /// The driven surface, mutably
    pub const fn surface_mut(&mut self) -> &mut V {
        &mut self.surface
    }

    /// Stop accepting events and wait for pending writes
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Store`] if writes are still running after `timeout`.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), TodoError> {
        self.store.shutdown(timeout).await?;
        Ok(())
    }
}
