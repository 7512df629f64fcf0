//! Shell commands and the session state they operate on
//!
//! Every command is a plain function over `Session`, registered with the
//! dispatcher by `register_all`.

use futures::future::BoxFuture;
use futures::FutureExt;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::api::{Endpoints, LocationArea, NamedResource, Page, Pokemon, ResourceFetcher};
use crate::cursor::PageCursor;
use crate::pokedex::{attempt_catch, catch_chance, Pokedex};
use crate::repl::{Command, CommandError, Dispatcher, HandlerResult, Invocation};

/// State shared by all commands for the lifetime of the shell
pub struct Session {
    pub fetcher: ResourceFetcher,
    pub endpoints: Endpoints,
    /// Position in the location listing
    pub cursor: PageCursor,
    pub pokedex: Pokedex,
    rng: StdRng,
}

impl Session {
    /// Creates a session whose first `map` shows the first page of locations
    pub fn new(fetcher: ResourceFetcher, endpoints: Endpoints) -> Self {
        Self {
            fetcher,
            cursor: PageCursor::starting_at(endpoints.locations()),
            endpoints,
            pokedex: Pokedex::default(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Replaces the catch RNG, for reproducible rolls
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }
}

/// Registers every shell command on `dispatcher`
pub fn register_all(dispatcher: &mut Dispatcher<Session>) {
    dispatcher.register(Command::new("help", "Displays a help message", help));
    dispatcher.register(Command::new("exit", "Exit the Pokedex", exit));
    dispatcher.register(Command::new(
        "map",
        "Displays the names of the next 20 location areas in the Pokemon world",
        map,
    ));
    dispatcher.register(Command::new(
        "mapb",
        "Displays the names of the previous 20 location areas in the Pokemon world",
        map_back,
    ));
    dispatcher.register(Command::new(
        "explore",
        "Displays a list of all the Pokemon in a given area",
        explore,
    ));
    dispatcher.register(Command::new(
        "catch",
        "Throws a Pokeball and adds the Pokemon to the Pokedex if caught",
        catch,
    ));
    dispatcher.register(Command::new(
        "inspect",
        "Displays the details of a Pokemon in your Pokedex",
        inspect,
    ));
    dispatcher.register(Command::new(
        "pokedex",
        "Displays a list of all the Pokemon in your Pokedex",
        pokedex,
    ));
}

fn help<'a>(
    _: &'a mut Session,
    invocation: Invocation<'a, Session>,
) -> BoxFuture<'a, HandlerResult> {
    async move {
        println!("Available commands:");
        for command in invocation.registry.iter() {
            println!("\t{}", command.usage());
        }
        println!();
        Ok(())
    }
    .boxed()
}

fn exit<'a>(
    _: &'a mut Session,
    invocation: Invocation<'a, Session>,
) -> BoxFuture<'a, HandlerResult> {
    async move {
        println!("Closing the Pokedex... Goodbye!");
        invocation.shutdown.cancel();
        Ok(())
    }
    .boxed()
}

fn map<'a>(
    session: &'a mut Session,
    _: Invocation<'a, Session>,
) -> BoxFuture<'a, HandlerResult> {
    async move {
        let url = session.cursor.next()?.to_string();
        show_locations(session, &url).await
    }
    .boxed()
}

fn map_back<'a>(
    session: &'a mut Session,
    _: Invocation<'a, Session>,
) -> BoxFuture<'a, HandlerResult> {
    async move {
        let url = session.cursor.previous()?.to_string();
        show_locations(session, &url).await
    }
    .boxed()
}

/// Fetches one page of locations, moves the cursor to it and prints the names
async fn show_locations(session: &mut Session, url: &str) -> HandlerResult {
    let page: Page<NamedResource> = session.fetcher.get(url).await?;
    session.cursor.update(&page);

    for location in &page.results {
        println!("{}", location.name);
    }
    Ok(())
}

fn explore<'a>(
    session: &'a mut Session,
    invocation: Invocation<'a, Session>,
) -> BoxFuture<'a, HandlerResult> {
    async move {
        let area = invocation.require_arg(0, "explore <area>")?;
        println!("Exploring {}...", area);

        let url = session.endpoints.location_area(area);
        let location_area: LocationArea = session.fetcher.get(&url).await?;

        println!("Found Pokemon:");
        for encounter in &location_area.pokemon_encounters {
            println!(" - {}", encounter.pokemon.name);
        }
        Ok(())
    }
    .boxed()
}

fn catch<'a>(
    session: &'a mut Session,
    invocation: Invocation<'a, Session>,
) -> BoxFuture<'a, HandlerResult> {
    async move {
        let name = invocation.require_arg(0, "catch <pokemon>")?;
        if session.pokedex.contains(name) {
            println!("You already have {} in your Pokedex!", name);
            return Ok(());
        }

        let url = session.endpoints.pokemon(name);
        let pokemon: Pokemon = session.fetcher.get(&url).await?;

        println!("Chance: {:.2}%", catch_chance(pokemon.base_experience) * 100.0);
        println!("Throwing a Pokeball at {}...", name);
        if !attempt_catch(&mut session.rng, pokemon.base_experience) {
            println!("{} escaped!", name);
            return Ok(());
        }

        println!("{} was caught!", name);
        println!("You may now inspect it with the inspect command.");
        session.pokedex.insert(pokemon);
        Ok(())
    }
    .boxed()
}

fn inspect<'a>(
    session: &'a mut Session,
    invocation: Invocation<'a, Session>,
) -> BoxFuture<'a, HandlerResult> {
    async move {
        let name = invocation.require_arg(0, "inspect <pokemon>")?;
        let caught = session
            .pokedex
            .get(name)
            .ok_or_else(|| CommandError::NotCaught(name.to_string()))?;
        let pokemon = &caught.pokemon;

        println!("Name: {}", pokemon.name);
        println!("Height: {}", pokemon.height);
        println!("Weight: {}", pokemon.weight);
        println!("Caught: {}", caught.caught_at.format("%Y-%m-%d %H:%M:%S UTC"));
        println!("Stats:");
        for stat in &pokemon.stats {
            println!("  - {}: {}", stat.stat.name, stat.base_stat);
        }
        println!("Types:");
        for kind in &pokemon.types {
            println!("  - {}", kind.kind.name);
        }
        Ok(())
    }
    .boxed()
}

fn pokedex<'a>(
    session: &'a mut Session,
    _: Invocation<'a, Session>,
) -> BoxFuture<'a, HandlerResult> {
    async move {
        if session.pokedex.is_empty() {
            return Err(CommandError::EmptyPokedex);
        }

        println!("Your Pokedex:");
        for name in session.pokedex.names() {
            println!(" - {}", name);
        }
        Ok(())
    }
    .boxed()
}
