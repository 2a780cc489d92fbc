//! Line-oriented commands typed at the terminal.

use consumption_client::domain::{Mode, UnknownMode};

use super::Action;

pub const HELP: &str = "\
commands:
  mode daily|weekly     switch prediction mode (resets fields)
  set <field> <number>  edit a field of the current mode
  predict               compute the prediction and draw the chart
  show                  list fields and the current state
  help                  show this message
  quit                  leave the session";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Action(Action),
    Show,
    Help,
    Quit,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}' (type 'help')")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("'{0}' is not a whole number")]
    InvalidNumber(String),
    #[error(transparent)]
    Mode(#[from] UnknownMode),
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let cmd = match (head.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("mode", [mode]) => Command::Action(Action::SelectMode(mode.parse::<Mode>()?)),
        ("mode", _) => return Err(CommandError::Usage("mode daily|weekly")),
        ("set", [name, value]) => {
            let value = value
                .parse::<i64>()
                .map_err(|_| CommandError::InvalidNumber(value.to_string()))?;
            Command::Action(Action::SetField {
                name: name.to_ascii_lowercase(),
                value,
            })
        }
        ("set", _) => return Err(CommandError::Usage("set <field> <number>")),
        ("predict", []) => Command::Action(Action::Predict),
        ("predict", _) => return Err(CommandError::Usage("predict")),
        ("show", []) => Command::Show,
        ("show", _) => return Err(CommandError::Usage("show")),
        ("help" | "?", _) => Command::Help,
        ("quit" | "exit", []) => Command::Quit,
        ("quit" | "exit", _) => return Err(CommandError::Usage("quit")),
        (other, _) => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(cmd))
}
