//! Domain types for the todo list.
//!
//! A todo list is an ordered sequence of task records. Insertion order is the
//! only ordering; the active filter and the row being edited are view state
//! carried next to the list but never persisted.

use composable_todo_macros::Action;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a todo item
///
/// Serialized as a bare JSON number so stored lists stay compatible with
/// millisecond-timestamp ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(u64);

impl TodoId {
    /// Wrap a raw id
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw id
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single todo item, exactly as persisted
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Unique identifier, fixed at creation
    pub id: TodoId,
    /// Trimmed, non-empty description
    pub text: String,
    /// Whether the todo is completed
    pub completed: bool,
}

impl Todo {
    /// Creates a new, incomplete todo item
    #[must_use]
    pub const fn new(id: TodoId, text: String) -> Self {
        Self {
            id,
            text,
            completed: false,
        }
    }

    /// Flips the completion flag
    pub const fn toggle(&mut self) {
        self.completed = !self.completed;
    }
}

/// View predicate selecting which todos are displayed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    /// Every todo
    #[default]
    All,
    /// Incomplete todos only
    Active,
    /// Completed todos only
    Completed,
}

impl Filter {
    /// Every filter, in the order the filter controls are laid out
    pub const ALL: [Self; 3] = [Self::All, Self::Active, Self::Completed];

    /// Parse a filter control tag; unknown tags select [`Filter::All`]
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim() {
            "active" => Self::Active,
            "completed" => Self::Completed,
            _ => Self::All,
        }
    }

    /// The tag carried by the matching filter control
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    /// Whether `todo` is visible under this filter
    #[must_use]
    pub const fn matches(self, todo: &Todo) -> bool {
        match self {
            Self::All => true,
            Self::Active => !todo.completed,
            Self::Completed => todo.completed,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// State of the todo list
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TodoState {
    /// All todos in insertion order
    pub todos: Vec<Todo>,
    /// Active filter; resets to `All` on every start
    pub filter: Filter,
    /// Row currently in edit mode
    pub editing: Option<TodoId>,
    /// Last persistence failure, cleared by the next successful mutation
    pub last_error: Option<String>,
}

impl TodoState {
    /// Creates a new empty todo state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a state around a previously stored list
    #[must_use]
    pub fn from_todos(todos: Vec<Todo>) -> Self {
        Self {
            todos,
            ..Self::default()
        }
    }

    /// Returns the number of todos
    #[must_use]
    pub fn count(&self) -> usize {
        self.todos.len()
    }

    /// Returns the number of incomplete todos, whatever the filter
    #[must_use]
    pub fn remaining_count(&self) -> usize {
        self.todos.iter().filter(|t| !t.completed).count()
    }

    /// Returns the number of completed todos
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.todos.iter().filter(|t| t.completed).count()
    }

    /// Returns a todo by ID
    #[must_use]
    pub fn get(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    /// Returns a mutable todo by ID
    pub fn get_mut(&mut self, id: TodoId) -> Option<&mut Todo> {
        self.todos.iter_mut().find(|t| t.id == id)
    }

    /// Checks if a todo exists
    #[must_use]
    pub fn contains(&self, id: TodoId) -> bool {
        self.get(id).is_some()
    }
}

/// Actions for the todo list
///
/// Commands are user intents reported by the host surface. Events are facts
/// fed back into the reducer by effects.
#[derive(Action, Clone, Debug, PartialEq, Eq)]
pub enum TodoAction {
    // ========== Commands ==========
    /// Command: Append a todo with the given text
    #[command]
    AddTodo {
        /// Raw input; trimmed before use
        text: String,
    },

    /// Command: Flip the completion flag of a todo
    #[command]
    ToggleTodo {
        /// Todo to toggle
        id: TodoId,
    },

    /// Command: Put a row into edit mode
    #[command]
    BeginEdit {
        /// Row to edit
        id: TodoId,
    },

    /// Command: Leave edit mode, replacing the text if it changed
    #[command]
    CommitEdit {
        /// Row being edited
        id: TodoId,
        /// Raw field value; trimmed before use
        text: String,
    },

    /// Command: Remove a todo
    #[command]
    DeleteTodo {
        /// Todo to delete
        id: TodoId,
    },

    /// Command: Remove every completed todo
    #[command]
    ClearCompleted,

    /// Command: Switch the active filter
    #[command]
    SetFilter {
        /// New filter
        filter: Filter,
    },

    // ========== Events ==========
    /// Event: Writing the list to storage failed
    #[event]
    PersistFailed {
        /// Error message
        error: String,
    },
}
