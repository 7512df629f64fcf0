//! PokeAPI resource models and endpoints
//!
//! This module contains the payload types decoded from PokeAPI responses and
//! the `ResourceFetcher` that loads them through the response cache.

pub mod client;

pub use client::{FetchError, HttpTransport, RawResponse, ResourceFetcher, Transport};

use serde::{Deserialize, Serialize};

/// Base URL for the public PokeAPI
pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Builds resource URLs relative to a configurable base
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl Endpoints {
    /// Creates endpoints rooted at `base_url`; a trailing slash is ignored
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    /// First page of the location listing
    pub fn locations(&self) -> String {
        format!("{}/location", self.base_url)
    }

    /// A single location area by name or id
    pub fn location_area(&self, area: &str) -> String {
        format!("{}/location-area/{}", self.base_url, area)
    }

    /// A single Pokemon by name or id
    pub fn pokemon(&self, name: &str) -> String {
        format!("{}/pokemon/{}", self.base_url, name)
    }
}

/// One page of a paged listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// Total number of resources across all pages
    pub count: u32,
    /// URL of the following page, if any
    pub next: Option<String>,
    /// URL of the preceding page, if any
    pub previous: Option<String>,
    /// Resources on this page
    pub results: Vec<T>,
}

/// A name plus the URL of the full resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    pub name: String,
    pub url: String,
}

/// A location area and the Pokemon that can be encountered in it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationArea {
    #[serde(default)]
    pub name: String,
    pub pokemon_encounters: Vec<PokemonEncounter>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokemonEncounter {
    pub pokemon: NamedResource,
}

/// The subset of a Pokemon record shown by the shell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pokemon {
    pub name: String,
    /// Experience gained for defeating it; drives the catch chance
    #[serde(default)]
    pub base_experience: Option<u32>,
    /// Height in decimetres
    pub height: u32,
    /// Weight in hectograms
    pub weight: u32,
    pub stats: Vec<PokemonStat>,
    pub types: Vec<PokemonType>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokemonStat {
    pub base_stat: u32,
    pub stat: NamedResource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokemonType {
    #[serde(rename = "type")]
    pub kind: NamedResource,
}
