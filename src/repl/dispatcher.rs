//! Command resolution and the read-evaluate loop

use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::command::{Command, CommandRegistry, HandlerResult, Invocation};
use super::input::LineSource;
use super::{CommandError, ReplError};

/// Resolves input lines to registered commands and runs them against `C`
pub struct Dispatcher<C> {
    registry: CommandRegistry<C>,
    shutdown: CancellationToken,
    prompt: String,
}

impl<C> Dispatcher<C> {
    /// Creates a dispatcher with an empty registry
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            registry: CommandRegistry::default(),
            shutdown: CancellationToken::new(),
            prompt: prompt.into(),
        }
    }

    /// Adds `command`; a command already registered under the same name is replaced
    pub fn register(&mut self, command: Command<C>) {
        let name = command.name().to_string();
        if self.registry.insert(command).is_some() {
            debug!(command = %name, "Replaced existing command");
        }
    }

    pub fn registry(&self) -> &CommandRegistry<C> {
        &self.registry
    }

    /// A handle that stops the loop once cancelled
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Tokenizes `input` and runs the matching command
    ///
    /// # Returns
    /// * `Err(CommandError::NoCommand)` if `input` is blank
    /// * `Err(CommandError::UnknownCommand)` if no command has the first token as its name
    /// * Otherwise whatever the handler returns
    pub async fn dispatch(&self, ctx: &mut C, input: &str) -> HandlerResult {
        let tokens: Vec<String> = input.split_whitespace().map(str::to_string).collect();
        let (name, args) = tokens.split_first().ok_or(CommandError::NoCommand)?;

        let command = self
            .registry
            .get(name)
            .ok_or_else(|| CommandError::UnknownCommand(name.clone()))?;

        debug!(command = %name, args = args.len(), "Dispatching command");
        let invocation = Invocation {
            args,
            registry: &self.registry,
            shutdown: &self.shutdown,
        };
        command.call(ctx, invocation).await
    }

    /// Prompts for and dispatches lines until cancelled or input ends
    ///
    /// Blank lines are skipped without touching history. Command errors are
    /// printed and the loop continues; only an unreadable input stream is
    /// returned as an error.
    pub async fn run(&self, ctx: &mut C, input: &mut impl LineSource) -> Result<(), ReplError> {
        loop {
            if self.shutdown.is_cancelled() {
                debug!("Shutdown requested, leaving loop");
                break;
            }

            let Some(line) = input.read_line(&self.prompt)? else {
                debug!("End of input");
                break;
            };

            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            input.add_history(line);

            if let Err(err) = self.dispatch(ctx, line).await {
                debug!(error = %err, "Command failed");
                println!("error: {}", err);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use rustyline::error::ReadlineError;
    use std::collections::VecDeque;

    /// Feeds a fixed script of lines, then reports end of input
    #[derive(Default)]
    struct ScriptedInput {
        lines: VecDeque<String>,
        history: Vec<String>,
        reads: usize,
        fail_after: Option<usize>,
    }

    impl ScriptedInput {
        fn new(lines: &[&str]) -> Self {
            Self {
                lines: lines.iter().map(|l| l.to_string()).collect(),
                ..Default::default()
            }
        }
    }

    impl LineSource for ScriptedInput {
        fn read_line(&mut self, _prompt: &str) -> Result<Option<String>, ReplError> {
            if self.fail_after == Some(self.reads) {
                return Err(ReplError::Input(ReadlineError::Io(std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    "broken pipe",
                ))));
            }
            self.reads += 1;
            Ok(self.lines.pop_front())
        }

        fn add_history(&mut self, line: &str) {
            self.history.push(line.to_string());
        }
    }

    /// Records the arguments of every call
    type Calls = Vec<(String, Vec<String>)>;

    fn recording(name: &'static str) -> Command<Calls> {
        Command::new(name, "records its calls", move |calls: &mut Calls, invocation| {
            async move {
                calls.push((name.to_string(), invocation.args.to_vec()));
                Ok(())
            }
            .boxed()
        })
    }

    fn exit_command() -> Command<Calls> {
        Command::new("exit", "stops the loop", |_, invocation| {
            async move {
                invocation.shutdown.cancel();
                Ok(())
            }
            .boxed()
        })
    }

    fn failing_command() -> Command<Calls> {
        Command::new("fail", "always fails", |_, _| {
            async { Err(CommandError::Usage("fail <never>")) }.boxed()
        })
    }

    #[tokio::test]
    async fn test_dispatch_empty_input_is_no_command() {
        let dispatcher = Dispatcher::<Calls>::new("> ");
        let mut calls = Calls::new();

        let result = dispatcher.dispatch(&mut calls, "").await;
        assert!(matches!(result, Err(CommandError::NoCommand)));

        let result = dispatcher.dispatch(&mut calls, "   \t ").await;
        assert!(matches!(result, Err(CommandError::NoCommand)));
    }

    #[tokio::test]
    async fn test_dispatch_unknown_command() {
        let mut dispatcher = Dispatcher::new("> ");
        dispatcher.register(recording("help"));
        let mut calls = Calls::new();

        let result = dispatcher.dispatch(&mut calls, "frobnicate").await;

        assert!(matches!(result, Err(CommandError::UnknownCommand(name)) if name == "frobnicate"));
        assert!(calls.is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_invokes_handler_exactly_once() {
        let mut dispatcher = Dispatcher::new("> ");
        dispatcher.register(recording("help"));
        let mut calls = Calls::new();

        dispatcher
            .dispatch(&mut calls, "help")
            .await
            .expect("help should succeed");

        assert_eq!(calls, vec![("help".to_string(), Vec::new())]);
    }

    #[tokio::test]
    async fn test_dispatch_passes_remaining_tokens() {
        let mut dispatcher = Dispatcher::new("> ");
        dispatcher.register(recording("explore"));
        let mut calls = Calls::new();

        dispatcher
            .dispatch(&mut calls, "  explore   pastoria-city-area  extra ")
            .await
            .expect("explore should succeed");

        assert_eq!(
            calls[0].1,
            vec!["pastoria-city-area".to_string(), "extra".to_string()]
        );
    }

    #[tokio::test]
    async fn test_dispatch_is_case_sensitive() {
        let mut dispatcher = Dispatcher::new("> ");
        dispatcher.register(Command::new("ping", "replies", |_: &mut (), _| {
            async { Ok(()) }.boxed()
        }));

        assert_eq!(dispatcher.registry().len(), 1);
        assert!(dispatcher.dispatch(&mut (), "ping").await.is_ok());
        assert!(matches!(
            dispatcher.dispatch(&mut (), "PING").await,
            Err(CommandError::UnknownCommand(_))
        ));
    }

    #[tokio::test]
    async fn test_register_last_write_wins() {
        let mut dispatcher = Dispatcher::new("> ");
        dispatcher.register(failing_command());
        dispatcher.register(Command::new("fail", "now succeeds", |_, _| {
            async { Ok(()) }.boxed()
        }));
        let mut calls = Calls::new();

        assert_eq!(dispatcher.registry().len(), 1);
        assert!(dispatcher.dispatch(&mut calls, "fail").await.is_ok());
    }

    #[tokio::test]
    async fn test_handler_error_is_returned_to_caller() {
        let mut dispatcher = Dispatcher::new("> ");
        dispatcher.register(failing_command());
        let mut calls = Calls::new();

        let result = dispatcher.dispatch(&mut calls, "fail").await;

        assert!(matches!(result, Err(CommandError::Usage(_))));
    }

    #[tokio::test]
    async fn test_run_continues_after_errors_until_eof() {
        let mut dispatcher = Dispatcher::new("> ");
        dispatcher.register(recording("map"));
        dispatcher.register(failing_command());
        let mut calls = Calls::new();
        let mut input = ScriptedInput::new(&["map", "fail", "frobnicate", "map next"]);

        dispatcher
            .run(&mut calls, &mut input)
            .await
            .expect("Loop should end cleanly at EOF");

        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].1, vec!["next".to_string()]);
    }

    #[tokio::test]
    async fn test_run_skips_blank_lines_without_history() {
        let mut dispatcher = Dispatcher::new("> ");
        dispatcher.register(recording("map"));
        let mut calls = Calls::new();
        let mut input = ScriptedInput::new(&["", "   ", "  map  ", "\t"]);

        dispatcher.run(&mut calls, &mut input).await.expect("Loop should end");

        assert_eq!(calls.len(), 1);
        assert_eq!(input.history, vec!["map".to_string()]);
    }

    #[tokio::test]
    async fn test_run_stops_after_cancellation() {
        let mut dispatcher = Dispatcher::new("> ");
        dispatcher.register(recording("map"));
        dispatcher.register(exit_command());
        let mut calls = Calls::new();
        let mut input = ScriptedInput::new(&["map", "exit", "map", "map"]);

        dispatcher.run(&mut calls, &mut input).await.expect("Loop should end");

        assert_eq!(calls.len(), 1, "Commands after exit must not run");
        assert_eq!(input.reads, 2, "No line is read after exit");
        assert!(dispatcher.shutdown_token().is_cancelled());
    }

    #[tokio::test]
    async fn test_run_returns_error_when_input_breaks() {
        let mut dispatcher = Dispatcher::new("> ");
        dispatcher.register(recording("map"));
        let mut calls = Calls::new();
        let mut input = ScriptedInput::new(&["map", "map"]);
        input.fail_after = Some(1);

        let result = dispatcher.run(&mut calls, &mut input).await;

        assert!(matches!(result, Err(ReplError::Input(_))));
        assert_eq!(calls.len(), 1);
    }
}
