//! Interactive command shell
//!
//! A `Dispatcher` holds the registry of named commands and drives the
//! read-evaluate loop. Input comes from any `LineSource`; the terminal one is
//! `LineEditor`, which adds history and command name completion.

mod command;
mod dispatcher;
mod input;

pub use command::{Command, CommandRegistry, HandlerResult, Invocation};
pub use dispatcher::Dispatcher;
pub use input::{complete_command, CommandCompleter, LineEditor, LineSource};

use rustyline::error::ReadlineError;
use thiserror::Error;

use crate::api::FetchError;
use crate::cursor::NavigationError;

/// Prompt shown before each line of input
pub const PROMPT: &str = "pokedex > ";

/// Recoverable failures reported back to the user by the loop
#[derive(Debug, Error)]
pub enum CommandError {
    /// The input line had no tokens
    #[error("provide a command! use 'help'")]
    NoCommand,

    /// The first token did not name a registered command
    #[error("unknown command '{0}'! use 'help'")]
    UnknownCommand(String),

    /// A required argument was missing
    #[error("usage: {0}")]
    Usage(&'static str),

    /// The named Pokemon is not in the pokedex
    #[error("you have not caught {0}")]
    NotCaught(String),

    /// The pokedex has no entries yet
    #[error("your pokedex is empty")]
    EmptyPokedex,

    #[error(transparent)]
    Navigation(#[from] NavigationError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Failures that end the interactive loop
#[derive(Debug, Error)]
pub enum ReplError {
    /// The input stream could not be read
    #[error("failed to read input: {0}")]
    Input(#[from] ReadlineError),
}
