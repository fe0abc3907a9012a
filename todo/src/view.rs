//! Pure view computation.
//!
//! Decides which rows are visible, in which order and in which mode. Host
//! surfaces only turn the result into markup or terminal output.

use crate::types::{Filter, Todo, TodoId, TodoState};

/// Text shown when the filtered list is empty
pub const PLACEHOLDER_TEXT: &str = "No tasks found";

/// Presentation mode of a single row
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowMode {
    /// Checkbox, text and delete control
    Display,
    /// Editable field pre-filled with the current text
    Editing,
}

/// One visible row
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowView {
    /// Id reported back with user intents on this row
    pub id: TodoId,
    /// Current text
    pub text: String,
    /// Checkbox state and completed marker
    pub completed: bool,
    /// Display or edit mode
    pub mode: RowMode,
}

/// Contents of the list container
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListView {
    /// Nothing matches the filter
    Placeholder,
    /// Matching rows in insertion order
    Rows(Vec<RowView>),
}

impl ListView {
    /// Rows in display order; empty for the placeholder
    #[must_use]
    pub fn rows(&self) -> &[RowView] {
        match self {
            Self::Placeholder => &[],
            Self::Rows(rows) => rows,
        }
    }

    /// Id of the 1-based row `number`
    #[must_use]
    pub fn id_at(&self, number: usize) -> Option<TodoId> {
        number
            .checked_sub(1)
            .and_then(|index| self.rows().get(index))
            .map(|row| row.id)
    }

    /// Row currently in edit mode, if any
    #[must_use]
    pub fn editing(&self) -> Option<&RowView> {
        self.rows().iter().find(|row| row.mode == RowMode::Editing)
    }
}

/// Everything a surface shows after an event
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    /// List container contents
    pub list: ListView,
    /// Counter label text
    pub remaining: String,
    /// Filter control to mark active
    pub filter: Filter,
}

/// Todos matching `filter`, original order preserved
pub fn visible(todos: &[Todo], filter: Filter) -> impl Iterator<Item = &Todo> {
    todos.iter().filter(move |todo| filter.matches(todo))
}

/// Compute the list container for the current filter and edit mode
#[must_use]
pub fn render_list(state: &TodoState) -> ListView {
    let rows: Vec<RowView> = visible(&state.todos, state.filter)
        .map(|todo| RowView {
            id: todo.id,
            text: todo.text.clone(),
            completed: todo.completed,
            mode: if state.editing == Some(todo.id) {
                RowMode::Editing
            } else {
                RowMode::Display
            },
        })
        .collect();

    if rows.is_empty() {
        ListView::Placeholder
    } else {
        ListView::Rows(rows)
    }
}

/// Counter label for `remaining` incomplete todos
#[must_use]
pub fn remaining_label(remaining: usize) -> String {
    if remaining == 1 {
        "1 item left".to_string()
    } else {
        format!("{remaining} items left")
    }
}

/// Compute the full frame for `state`
#[must_use]
pub fn render(state: &TodoState) -> Frame {
    Frame {
        list: render_list(state),
        remaining: remaining_label(state.remaining_count()),
        filter: state.filter,
    }
}
