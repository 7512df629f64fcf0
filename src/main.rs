//! Pokedex CLI - browse PokeAPI locations and catch Pokemon
//!
//! Starts the interactive shell. Command output goes to stdout; logs go to
//! stderr and are filtered by `--log-level` or `RUST_LOG`.

use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use pokedex::api::{Endpoints, HttpTransport, ResourceFetcher};
use pokedex::cache::TtlCache;
use pokedex::cli::{Cli, Config};
use pokedex::commands::{register_all, Session};
use pokedex::repl::{Dispatcher, LineEditor, PROMPT};

/// Installs the stderr log subscriber
///
/// `filter` takes precedence over `RUST_LOG`; with neither, only warnings are shown.
fn init_tracing(filter: Option<&str>) {
    let filter = match filter {
        Some(filter) => EnvFilter::new(filter),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = match Config::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    };

    init_tracing(config.log_level.as_deref());
    tracing::debug!(?config, "Starting shell");

    let transport = HttpTransport::new(config.timeout)?;
    let fetcher = ResourceFetcher::new(TtlCache::new(config.cache_ttl), transport);
    let mut session = Session::new(fetcher, Endpoints::new(config.base_url.clone()));

    let mut dispatcher = Dispatcher::new(PROMPT);
    register_all(&mut dispatcher);

    let mut editor = LineEditor::new(dispatcher.registry().names(), config.history_path.clone())?;
    let result = dispatcher.run(&mut session, &mut editor).await;
    editor.save_history();

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
    Ok(())
}
