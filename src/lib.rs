//! Pokedex CLI Library
//!
//! An interactive shell over PokeAPI. Responses are cached in memory for a
//! short TTL so paging back and forth does not hit the network twice.

pub mod api;
pub mod cache;
pub mod cli;
pub mod commands;
pub mod cursor;
pub mod pokedex;
pub mod repl;
