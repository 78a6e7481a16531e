//! Error taxonomy for addressing and command execution.
//!
//! Every variant is recoverable: the read loop prints it with an `error: `
//! prefix and keeps the buffer as it was before the failed command.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which endpoint of a range an address was parsed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    First,
    Last,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::First => f.write_str("first"),
            Endpoint::Last => f.write_str("last"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("no current line")]
    NoCurrentLine,
    /// `index` is zero-based and may be negative (`-5` on line 2); it is
    /// shown one-based like every other line number the user sees.
    #[error("{which} address {} is out of range (buffer has {bound} lines)", .index.saturating_add(1))]
    OutOfRange {
        index: i64,
        bound: usize,
        which: Endpoint,
    },
    #[error("last address {} precedes first address {}", .last + 1, .first + 1)]
    InvalidRange { first: usize, last: usize },
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Address(#[from] AddressError),
    #[error("no command specified")]
    NoCommand,
    #[error("{0}: command not found")]
    UnknownCommand(String),
    #[error("{0}")]
    Tokenize(String),
    #[error("{command}: {message}")]
    Arguments { command: String, message: String },
    #[error("no filename provided")]
    NoFilename,
    #[error("ranges nested more than {limit} deep")]
    NestingTooDeep { limit: usize },
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("output: {0}")]
    Output(#[from] std::io::Error),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("the command name '{0}' is reserved")]
    Reserved(String),
    #[error("command '{0}' is already registered")]
    Duplicate(String),
    #[error("command names must not be empty")]
    EmptyName,
    #[error("{command}: {message}")]
    InvalidArgs { command: String, message: String },
}

pub type CommandResult<T> = Result<T, CommandError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_reports_one_based_lines() {
        let e = AddressError::OutOfRange {
            index: 4,
            bound: 3,
            which: Endpoint::First,
        };
        assert_eq!(
            e.to_string(),
            "first address 5 is out of range (buffer has 3 lines)"
        );
    }

    #[test]
    fn address_errors_pass_through_command_error() {
        let e: CommandError = AddressError::NoCurrentLine.into();
        assert_eq!(e.to_string(), "no current line");
    }

    #[test]
    fn unknown_command_message() {
        let e = CommandError::UnknownCommand("zz".into());
        assert_eq!(e.to_string(), "zz: command not found");
    }
}
