//! Terminal command parsing.

use crate::app::UiEvent;
use crate::types::TodoId;
use crate::view::ListView;
use thiserror::Error;

/// A parsed input line
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// A user intent for the controller
    Event(UiEvent),
    /// Print the command summary
    Help,
    /// Leave the loop
    Quit,
    /// Blank line
    Empty,
}

/// Why a line could not be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// First word is not a known command
    #[error("Unknown command: {0} (type 'help')")]
    UnknownCommand(String),

    /// Command needs an argument
    #[error("Missing argument for {0}")]
    MissingArgument(&'static str),

    /// Row argument is not a number
    #[error("Invalid row number: {0}")]
    InvalidRow(String),

    /// Row argument is outside the shown list
    #[error("No row {0} in the current list")]
    NoSuchRow(usize),
}

/// Parse one line against the currently shown list
///
/// While a row is in edit mode the whole line is the field value, committed
/// as if confirmed with Enter.
///
/// # Errors
///
/// Returns [`ParseError`] for unknown commands or bad row arguments.
pub fn parse_command(line: &str, list: &ListView) -> Result<Command, ParseError> {
    if let Some(row) = list.editing() {
        return Ok(Command::Event(UiEvent::EditConfirmed {
            id: row.id,
            value: line.to_string(),
        }));
    }

    let line = line.trim();
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(word, rest)| (word, rest.trim()));

    let event = match word.to_ascii_lowercase().as_str() {
        "" => return Ok(Command::Empty),
        "help" | "?" => return Ok(Command::Help),
        "quit" | "exit" | "q" => return Ok(Command::Quit),
        "add" => UiEvent::AddRequested {
            text: rest.to_string(),
        },
        "toggle" => UiEvent::CheckboxChanged {
            id: row_id(rest, "toggle", list)?,
        },
        "delete" | "rm" => UiEvent::DeleteClicked {
            id: row_id(rest, "delete", list)?,
        },
        "edit" => UiEvent::TextDoubleClicked {
            id: row_id(rest, "edit", list)?,
        },
        "filter" => {
            if rest.is_empty() {
                return Err(ParseError::MissingArgument("filter"));
            }
            UiEvent::FilterClicked {
                tag: rest.to_string(),
            }
        },
        "clear" => UiEvent::ClearCompletedClicked,
        _ => return Err(ParseError::UnknownCommand(word.to_string())),
    };

    Ok(Command::Event(event))
}

fn row_id(arg: &str, command: &'static str, list: &ListView) -> Result<TodoId, ParseError> {
    if arg.is_empty() {
        return Err(ParseError::MissingArgument(command));
    }
    let number: usize = arg
        .parse()
        .map_err(|_| ParseError::InvalidRow(arg.to_string()))?;
    list.id_at(number).ok_or(ParseError::NoSuchRow(number))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{RowMode, RowView};

    fn list(mode: RowMode) -> ListView {
        ListView::Rows(vec![
            RowView {
                id: TodoId::new(100),
                text: "A".to_string(),
                completed: false,
                mode: RowMode::Display,
            },
            RowView {
                id: TodoId::new(200),
                text: "B".to_string(),
                completed: true,
                mode,
            },
        ])
    }

    fn event(line: &str) -> Option<UiEvent> {
        match parse_command(line, &list(RowMode::Display)) {
            Ok(Command::Event(event)) => Some(event),
            _ => None,
        }
    }

    #[test]
    fn parses_row_commands() {
        assert_eq!(
            event("toggle 2"),
            Some(UiEvent::CheckboxChanged { id: TodoId::new(200) })
        );
        assert_eq!(
            event("  delete   1 "),
            Some(UiEvent::DeleteClicked { id: TodoId::new(100) })
        );
        assert_eq!(
            event("edit 1"),
            Some(UiEvent::TextDoubleClicked { id: TodoId::new(100) })
        );
    }

    #[test]
    fn add_keeps_raw_text() {
        assert_eq!(
            event("add Buy   milk"),
            Some(UiEvent::AddRequested {
                text: "Buy   milk".to_string()
            })
        );
        assert_eq!(
            event("add"),
            Some(UiEvent::AddRequested {
                text: String::new()
            })
        );
    }

    #[test]
    fn parses_filter_and_clear() {
        assert_eq!(
            event("filter completed"),
            Some(UiEvent::FilterClicked {
                tag: "completed".to_string()
            })
        );
        assert_eq!(event("CLEAR"), Some(UiEvent::ClearCompletedClicked));
    }

    #[test]
    fn parses_control_commands() {
        let list = list(RowMode::Display);
        assert_eq!(parse_command("", &list), Ok(Command::Empty));
        assert_eq!(parse_command("   ", &list), Ok(Command::Empty));
        assert_eq!(parse_command("help", &list), Ok(Command::Help));
        assert_eq!(parse_command("quit", &list), Ok(Command::Quit));
    }

    #[test]
    fn reports_bad_input() {
        let list = list(RowMode::Display);
        assert_eq!(
            parse_command("frobnicate", &list),
            Err(ParseError::UnknownCommand("frobnicate".to_string()))
        );
        assert_eq!(
            parse_command("toggle", &list),
            Err(ParseError::MissingArgument("toggle"))
        );
        assert_eq!(
            parse_command("toggle two", &list),
            Err(ParseError::InvalidRow("two".to_string()))
        );
        assert_eq!(
            parse_command("delete 3", &list),
            Err(ParseError::NoSuchRow(3))
        );
        assert_eq!(
            parse_command("toggle 0", &list),
            Err(ParseError::NoSuchRow(0))
        );
        assert_eq!(
            parse_command("filter", &list),
            Err(ParseError::MissingArgument("filter"))
        );
    }

    #[test]
    fn edit_mode_takes_line_as_value() {
        let list = list(RowMode::Editing);

        assert_eq!(
            parse_command("quit", &list),
            Ok(Command::Event(UiEvent::EditConfirmed {
                id: TodoId::new(200),
                value: "quit".to_string(),
            }))
        );
        assert_eq!(
            parse_command("", &list),
            Ok(Command::Event(UiEvent::EditConfirmed {
                id: TodoId::new(200),
                value: String::new(),
            }))
        );
    }
}
