use crate::{AppError, AppResult, view::SessionIntent};

use std::panic::Location;

use error_location::ErrorLocation;

/// Usage text printed by `help`.
pub const HELP: &str = "\
Dashboard:
  list                 show classrooms
  create <name>        add a classroom
  rename <n> <name>    rename classroom n
  fav <n>              toggle favourite on classroom n
  trash <n>            move classroom n to trash
  record <n>           open the recorder for classroom n
Recorder:
  start | pause | resume | stop | close
  name <text>          type the filename in the save dialog
  save | discard | cancel
General:
  status | help | quit";

/// Commands sent from the input handler to the main application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// Show the dashboard.
    List,
    /// Create a classroom.
    Create {
        /// Requested name, untrimmed.
        name: String,
    },
    /// Rename the classroom at a one-based position.
    Rename {
        /// One-based dashboard position.
        position: usize,
        /// Requested name, untrimmed.
        name: String,
    },
    /// Toggle favourite on the classroom at a one-based position.
    Favourite {
        /// One-based dashboard position.
        position: usize,
    },
    /// Trash the classroom at a one-based position.
    Trash {
        /// One-based dashboard position.
        position: usize,
    },
    /// Open the recording surface for a classroom.
    Record {
        /// One-based dashboard position.
        position: usize,
    },
    /// A button press on the open recording surface.
    Session(SessionIntent),
    /// Re-render whatever is on screen.
    Status,
    /// Print usage.
    Help,
    /// Request application shutdown.
    Shutdown,
}

impl AppCommand {
    /// Parse one input line. Returns `Ok(None)` for blank lines.
    #[track_caller]
    pub fn parse(line: &str) -> AppResult<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "list" | "ls" => AppCommand::List,
            "create" => AppCommand::Create {
                name: required(rest, "create <name>")?.to_string(),
            },
            "rename" => {
                let (position, name) = match rest.split_once(char::is_whitespace) {
                    Some((position, name)) => (position, name.trim()),
                    None => (rest, ""),
                };
                AppCommand::Rename {
                    position: parse_position(position)?,
                    name: required(name, "rename <n> <name>")?.to_string(),
                }
            }
            "fav" | "favourite" => AppCommand::Favourite {
                position: parse_position(rest)?,
            },
            "trash" => AppCommand::Trash {
                position: parse_position(rest)?,
            },
            "record" => AppCommand::Record {
                position: parse_position(rest)?,
            },
            "start" => AppCommand::Session(SessionIntent::Start),
            "pause" => AppCommand::Session(SessionIntent::Pause),
            "resume" => AppCommand::Session(SessionIntent::Resume),
            "stop" => AppCommand::Session(SessionIntent::Stop),
            "close" => AppCommand::Session(SessionIntent::Close),
            "name" => AppCommand::Session(SessionIntent::Name(rest.to_string())),
            "save" => AppCommand::Session(SessionIntent::Save),
            "discard" => AppCommand::Session(SessionIntent::Discard),
            "cancel" => AppCommand::Session(SessionIntent::Cancel),
            "status" => AppCommand::Status,
            "help" | "?" => AppCommand::Help,
            "quit" | "exit" => AppCommand::Shutdown,
            other => {
                return Err(AppError::InvalidCommand {
                    reason: format!("unknown command {:?}, try `help`", other),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        Ok(Some(command))
    }
}

#[track_caller]
fn required<'a>(value: &'a str, usage: &str) -> AppResult<&'a str> {
    if value.is_empty() {
        return Err(AppError::InvalidCommand {
            reason: format!("usage: {}", usage),
            location: ErrorLocation::from(Location::caller()),
        });
    }
    Ok(value)
}

#[track_caller]
fn parse_position(value: &str) -> AppResult<usize> {
    match value.parse::<usize>() {
        Ok(position) if position > 0 => Ok(position),
        _ => Err(AppError::InvalidCommand {
            reason: format!("expected a classroom number, got {:?}", value),
            location: ErrorLocation::from(Location::caller()),
        }),
    }
}
