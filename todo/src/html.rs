//! Markup host surface.
//!
//! Produces the inner HTML of the list container and the filter bar, using
//! the class names the page stylesheet expects.

use crate::surface::Surface;
use crate::types::Filter;
use crate::view::{ListView, RowMode, RowView, PLACEHOLDER_TEXT};
use std::fmt::Write as _;
use std::io;

/// Escape text for use in element content and quoted attribute values
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn push_row(html: &mut String, row: &RowView) {
    let text = escape_html(&row.text);
    let checked = if row.completed { " checked" } else { "" };

    let _ = write!(html, r#"<li class="todo-item" data-id="{}">"#, row.id);
    let _ = write!(html, r#"<input type="checkbox" class="todo-checkbox"{checked}>"#);
    match row.mode {
        RowMode::Display => {
            let class = if row.completed {
                "todo-text completed"
            } else {
                "todo-text"
            };
            let _ = write!(html, r#"<span class="{class}">{text}</span>"#);
        },
        RowMode::Editing => {
            let _ = write!(
                html,
                r#"<input type="text" class="edit-input" value="{text}" autofocus>"#
            );
        },
    }
    html.push_str(r#"<button class="delete-btn"><i class="fas fa-trash"></i></button>"#);
    html.push_str("</li>");
}

/// Inner HTML of the list container
#[must_use]
pub fn render_list_html(list: &ListView) -> String {
    match list {
        ListView::Placeholder => format!(r#"<p class="no-tasks">{PLACEHOLDER_TEXT}</p>"#),
        ListView::Rows(rows) => {
            let mut html = String::with_capacity(rows.len() * 192);
            for row in rows {
                push_row(&mut html, row);
            }
            html
        },
    }
}

/// Filter buttons with exactly one marked active
#[must_use]
pub fn filter_bar_html(active: Filter) -> String {
    let mut html = String::new();
    for filter in Filter::ALL {
        let class = if filter == active {
            "filter-btn active"
        } else {
            "filter-btn"
        };
        let label = match filter {
            Filter::All => "All",
            Filter::Active => "Active",
            Filter::Completed => "Completed",
        };
        let _ = write!(
            html,
            r#"<button class="{class}" data-filter="{}">{label}</button>"#,
            filter.tag()
        );
    }
    html
}

/// Surface keeping the markup of the dynamic page regions in memory
#[derive(Debug, Clone, Default)]
pub struct HtmlSurface {
    list_html: String,
    remaining: String,
    active_filter: Filter,
    input_clears: usize,
}

impl HtmlSurface {
    /// Creates an empty surface
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current list container markup
    #[must_use]
    pub fn list_html(&self) -> &str {
        &self.list_html
    }

    /// Current counter label
    #[must_use]
    pub fn remaining(&self) -> &str {
        &self.remaining
    }

    /// Filter control currently marked active
    #[must_use]
    pub const fn active_filter(&self) -> Filter {
        self.active_filter
    }

    /// Current filter bar markup
    #[must_use]
    pub fn filter_bar_html(&self) -> String {
        filter_bar_html(self.active_filter)
    }

    /// How many times the input field was cleared
    #[must_use]
    pub const fn input_clears(&self) -> usize {
        self.input_clears
    }
}

impl Surface for HtmlSurface {
    fn render_list(&mut self, list: &ListView) -> io::Result<()> {
        self.list_html = render_list_html(list);
        Ok(())
    }

    fn set_remaining(&mut self, label: &str) -> io::Result<()> {
        label.clone_into(&mut self.remaining);
        Ok(())
    }

    fn set_active_filter(&mut self, filter: Filter) -> io::Result<()> {
        self.active_filter = filter;
        Ok(())
    }

    fn clear_input(&mut self) -> io::Result<()> {
        self.input_clears += 1;
        Ok(())
    }
}
