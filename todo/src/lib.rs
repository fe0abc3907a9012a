//! Todo list manager built on the Composable Todo architecture.
//!
//! Users add, edit, complete, filter and delete short text tasks. The list is
//! kept in a [`Store`](composable_todo_runtime::Store) and mirrored to a
//! key-value storage after every mutation, under the key `"todos"` as a JSON
//! array of `{"id", "text", "completed"}` objects.
//!
//! - [`TodoReducer`] holds the business rules
//! - [`view`] computes which rows are shown and how
//! - [`TodoApp`] turns host events into actions, waits for the write, and
//!   redraws a [`Surface`]
//! - [`HtmlSurface`] and [`TerminalSurface`] are the bundled hosts
//!
//! # Quick Start
//!
//! ```no_run
//! use composable_todo_core::environment::SystemClock;
//! use std::sync::Arc;
//! use todo::{FileStorage, HtmlSurface, TodoApp, TodoEnvironment, UiEvent};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let storage = FileStorage::open(".todo-data")?;
//! let env = TodoEnvironment::production(Arc::new(SystemClock), Arc::new(storage));
//! let mut app = TodoApp::start(env, HtmlSurface::new()).await?;
//!
//! app.dispatch(UiEvent::AddRequested { text: "Buy milk".to_string() }).await?;
//! assert_eq!(app.surface().remaining(), "1 item left");
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod command;
pub mod config;
pub mod html;
pub mod ids;
pub mod persistence;
pub mod reducer;
pub mod surface;
pub mod terminal;
pub mod types;
pub mod view;

// Re-export commonly used types
pub use app::{TodoApp, TodoError, TodoStore, UiEvent};
pub use command::{parse_command, Command, ParseError};
pub use config::{Config, ConfigError, SurfaceKind};
pub use html::HtmlSurface;
pub use persistence::{FileStorage, PersistenceError, WriteSequencer, STORAGE_KEY};
pub use reducer::{TodoEnvironment, TodoReducer};
pub use surface::Surface;
pub use terminal::TerminalSurface;
pub use types::{Filter, Todo, TodoAction, TodoId, TodoState};
