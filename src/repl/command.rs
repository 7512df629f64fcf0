//! Named commands and the registry they are looked up in

use std::collections::BTreeMap;

use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;

use super::CommandError;

/// Outcome of running a command handler
pub type HandlerResult = Result<(), CommandError>;

type Handler<C> =
    Box<dyn for<'a> Fn(&'a mut C, Invocation<'a, C>) -> BoxFuture<'a, HandlerResult> + Send + Sync>;

/// Everything a handler receives besides the shared context
pub struct Invocation<'a, C> {
    /// Tokens following the command name
    pub args: &'a [String],
    /// All registered commands, for listing help
    pub registry: &'a CommandRegistry<C>,
    /// Cancelling this ends the loop before the next prompt
    pub shutdown: &'a CancellationToken,
}

impl<'a, C> Invocation<'a, C> {
    /// The argument at `index`, or `CommandError::Usage` with `usage`
    pub fn require_arg(&self, index: usize, usage: &'static str) -> Result<&'a str, CommandError> {
        self.args
            .get(index)
            .map(String::as_str)
            .ok_or(CommandError::Usage(usage))
    }
}

/// A named, described handler over a context of type `C`
pub struct Command<C> {
    name: String,
    description: String,
    handler: Handler<C>,
}

impl<C> Command<C> {
    /// Creates a command from a handler returning a boxed future
    ///
    /// # Arguments
    /// * `name` - Token that selects the command; matched case-sensitively
    /// * `description` - One-line help text
    /// * `handler` - Invoked with the context and the remaining tokens
    pub fn new<F>(name: impl Into<String>, description: impl Into<String>, handler: F) -> Self
    where
        F: for<'a> Fn(&'a mut C, Invocation<'a, C>) -> BoxFuture<'a, HandlerResult>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            handler: Box::new(handler),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// `name - description`, as shown by help
    pub fn usage(&self) -> String {
        format!("{} - {}", self.name, self.description)
    }

    pub(crate) fn call<'a>(
        &self,
        ctx: &'a mut C,
        invocation: Invocation<'a, C>,
    ) -> BoxFuture<'a, HandlerResult> {
        (self.handler)(ctx, invocation)
    }
}

/// Commands keyed by name
pub struct CommandRegistry<C> {
    commands: BTreeMap<String, Command<C>>,
}

impl<C> Default for CommandRegistry<C> {
    fn default() -> Self {
        Self {
            commands: BTreeMap::new(),
        }
    }
}

impl<C> CommandRegistry<C> {
    /// Adds `command`, returning any command it replaced
    pub fn insert(&mut self, command: Command<C>) -> Option<Command<C>> {
        self.commands.insert(command.name.clone(), command)
    }

    pub fn get(&self, name: &str) -> Option<&Command<C>> {
        self.commands.get(name)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Commands in name order
    pub fn iter(&self) -> impl Iterator<Item = &Command<C>> {
        self.commands.values()
    }

    /// Registered names in sorted order
    pub fn names(&self) -> Vec<String> {
        self.commands.keys().cloned().collect()
    }
}
