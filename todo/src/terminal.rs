//! Line-oriented terminal surface.

use crate::surface::Surface;
use crate::types::Filter;
use crate::view::{ListView, RowMode, PLACEHOLDER_TEXT};
use std::io::{self, Write};

/// Command summary printed by `help`
pub const HELP_TEXT: &str = "\
Commands:
  add TEXT       add a todo
  toggle N       flip completion of row N
  edit N         edit row N; the next line is the new text
  delete N       delete row N
  filter TAG     show all, active or completed todos
  clear          remove completed todos
  help           show this help
  quit           exit
";

/// Surface printing each frame as numbered rows
///
/// Row numbers start at 1 and refer to the rows of the last rendered list,
/// which [`TerminalSurface::last_list`] exposes to the command parser.
#[derive(Debug)]
pub struct TerminalSurface<W: Write> {
    out: W,
    last_list: ListView,
}

impl<W: Write> TerminalSurface<W> {
    /// Creates a surface writing to `out`
    pub const fn new(out: W) -> Self {
        Self {
            out,
            last_list: ListView::Placeholder,
        }
    }

    /// List shown by the last render
    #[must_use]
    pub const fn last_list(&self) -> &ListView {
        &self.last_list
    }

    /// Print the command summary
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the output cannot be written.
    pub fn print_help(&mut self) -> io::Result<()> {
        self.out.write_all(HELP_TEXT.as_bytes())?;
        self.out.flush()
    }

    /// Print the prompt for the next line
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the output cannot be written.
    pub fn prompt(&mut self) -> io::Result<()> {
        match self.last_list.editing() {
            Some(row) => write!(self.out, "edit {}> ", row.text)?,
            None => write!(self.out, "> ")?,
        }
        self.out.flush()
    }

    /// Print a one-line notice
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the output cannot be written.
    pub fn notice(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "{message}")?;
        self.out.flush()
    }

    /// Consume the surface, returning the writer
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn render_list(&mut self, list: &ListView) -> io::Result<()> {
        writeln!(self.out)?;
        match list {
            ListView::Placeholder => writeln!(self.out, "  {PLACEHOLDER_TEXT}")?,
            ListView::Rows(rows) => {
                for (index, row) in rows.iter().enumerate() {
                    let number = index + 1;
                    let mark = if row.completed { 'x' } else { ' ' };
                    match row.mode {
                        RowMode::Display => {
                            writeln!(self.out, "  {number:>2}. [{mark}] {}", row.text)?;
                        },
                        RowMode::Editing => {
                            writeln!(self.out, "  {number:>2}. [{mark}] (editing) {}", row.text)?;
                        },
                    }
                }
            },
        }
        self.last_list = list.clone();
        Ok(())
    }

    fn set_remaining(&mut self, label: &str) -> io::Result<()> {
        writeln!(self.out, "  {label}")
    }

    fn set_active_filter(&mut self, filter: Filter) -> io::Result<()> {
        let bar: Vec<String> = Filter::ALL
            .iter()
            .map(|f| {
                if *f == filter {
                    format!("[{f}]")
                } else {
                    f.to_string()
                }
            })
            .collect();
        writeln!(self.out, "  Filter: {}", bar.join(" "))?;
        self.out.flush()
    }

    fn clear_input(&mut self) -> io::Result<()> {
        // The line was consumed when it was read
        Ok(())
    }
}
