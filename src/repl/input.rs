//! Line input for the interactive loop
//!
//! `LineEditor` wraps a rustyline editor with persistent history and
//! prefix completion of command names.

use std::fs;
use std::io;
use std::path::PathBuf;

use rustyline::completion::Completer;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tracing::{debug, warn};

use super::ReplError;

/// Source of input lines for `Dispatcher::run`
pub trait LineSource {
    /// Reads one line after showing `prompt`
    ///
    /// # Returns
    /// * `Ok(Some(line))` for a line of input
    /// * `Ok(None)` when input is exhausted
    /// * `Err(ReplError)` when the input stream cannot be read
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, ReplError>;

    /// Records a non-blank line that is about to be dispatched
    fn add_history(&mut self, _line: &str) {}
}

/// Command names that start with `prefix`, in the order given
pub fn complete_command(names: &[String], prefix: &str) -> Vec<String> {
    names
        .iter()
        .filter(|name| name.starts_with(prefix))
        .cloned()
        .collect()
}

/// Completes the first word of a line against the registered command names
#[derive(Debug, Clone, Default)]
pub struct CommandCompleter {
    names: Vec<String>,
}

impl CommandCompleter {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }
}

impl Completer for CommandCompleter {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        let prefix = &line[..pos];
        if prefix.contains(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }
        Ok((0, complete_command(&self.names, prefix)))
    }
}

impl Hinter for CommandCompleter {
    type Hint = String;
}

impl Highlighter for CommandCompleter {}

impl Validator for CommandCompleter {}

impl Helper for CommandCompleter {}

/// Terminal `LineSource` with history and completion
pub struct LineEditor {
    editor: Editor<CommandCompleter, DefaultHistory>,
    history_path: Option<PathBuf>,
}

impl LineEditor {
    /// Creates an editor completing `names`, loading history from `history_path` if given
    ///
    /// A missing or unreadable history file is not an error.
    pub fn new(names: Vec<String>, history_path: Option<PathBuf>) -> Result<Self, ReplError> {
        let mut editor = Editor::<CommandCompleter, DefaultHistory>::new()?;
        editor.set_helper(Some(CommandCompleter::new(names)));

        if let Some(path) = &history_path {
            if let Err(err) = editor.load_history(path) {
                debug!(path = %path.display(), error = %err, "No history loaded");
            }
        }

        Ok(Self {
            editor,
            history_path,
        })
    }

    /// Writes history back to disk, creating the parent directory if needed
    pub fn save_history(&mut self) {
        let Some(path) = &self.history_path else {
            return;
        };

        if let Some(parent) = path.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                warn!(path = %parent.display(), error = %err, "Could not create history directory");
                return;
            }
        }
        if let Err(err) = self.editor.save_history(path) {
            warn!(path = %path.display(), error = %err, "Could not save history");
        }
    }
}

impl LineSource for LineEditor {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, ReplError> {
        let editor = &mut self.editor;
        match tokio::task::block_in_place(|| editor.readline(prompt)) {
            Ok(line) => Ok(Some(line)),
            // Ctrl-C abandons the current line only
            Err(ReadlineError::Interrupted) => Ok(Some(String::new())),
            Err(ReadlineError::Eof) => Ok(None),
            // A line that is not valid UTF-8 is dropped; the stream stays usable
            Err(ReadlineError::Io(err)) if err.kind() == io::ErrorKind::InvalidData => {
                warn!(error = %err, "Skipping unreadable input line");
                Ok(Some(String::new()))
            }
            Err(err) => Err(ReplError::Input(err)),
        }
    }

    fn add_history(&mut self, line: &str) {
        if let Err(err) = self.editor.add_history_entry(line) {
            debug!(error = %err, "Could not record history entry");
        }
    }
}
