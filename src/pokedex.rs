//! The player's collection of caught Pokemon and the catch roll

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::api::Pokemon;

/// Base experience at or below which a catch always succeeds
pub const CATCH_FACTOR: f64 = 20.0;

/// A Pokemon record plus when it was caught
#[derive(Debug, Clone)]
pub struct CaughtPokemon {
    pub pokemon: Pokemon,
    pub caught_at: DateTime<Utc>,
}

/// Caught Pokemon keyed by name
#[derive(Debug, Default)]
pub struct Pokedex {
    entries: BTreeMap<String, CaughtPokemon>,
}

impl Pokedex {
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&CaughtPokemon> {
        self.entries.get(name)
    }

    /// Records `pokemon` as caught now, keyed by its name
    pub fn insert(&mut self, pokemon: Pokemon) {
        let caught = CaughtPokemon {
            caught_at: Utc::now(),
            pokemon,
        };
        self.entries.insert(caught.pokemon.name.clone(), caught);
    }

    /// Names of all caught Pokemon in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Probability in `[0, 1]` that a throw catches a Pokemon
///
/// Unknown or very low base experience always catches.
pub fn catch_chance(base_experience: Option<u32>) -> f64 {
    match base_experience {
        Some(experience) if f64::from(experience) > CATCH_FACTOR => {
            CATCH_FACTOR / f64::from(experience)
        }
        _ => 1.0,
    }
}

/// Rolls one throw
pub fn attempt_catch(rng: &mut impl Rng, base_experience: Option<u32>) -> bool {
    rng.gen::<f64>() < catch_chance(base_experience)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pokemon(name: &str, base_experience: Option<u32>) -> Pokemon {
        Pokemon {
            name: name.to_string(),
            base_experience,
            height: 4,
            weight: 60,
            stats: Vec::new(),
            types: Vec::new(),
        }
    }

    #[test]
    fn test_catch_chance_scales_with_experience() {
        assert!((catch_chance(Some(40)) - 0.5).abs() < f64::EPSILON);
        assert!((catch_chance(Some(200)) - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_catch_chance_is_capped_at_certain() {
        assert_eq!(catch_chance(Some(20)), 1.0);
        assert_eq!(catch_chance(Some(0)), 1.0);
        assert_eq!(catch_chance(None), 1.0);
    }

    #[test]
    fn test_attempt_catch_always_succeeds_for_low_experience() {
        let mut rng = StdRng::seed_from_u64(42);
        assert!((0..100).all(|_| attempt_catch(&mut rng, Some(10))));
    }

    #[test]
    fn test_attempt_catch_rate_tracks_chance() {
        let mut rng = StdRng::seed_from_u64(42);
        let caught = (0..10_000).filter(|_| attempt_catch(&mut rng, Some(80))).count();

        // Expected 2500
        assert!((2200..2800).contains(&caught), "caught {}", caught);
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut pokedex = Pokedex::default();
        assert!(pokedex.is_empty());

        let before = Utc::now();
        pokedex.insert(pokemon("pikachu", Some(112)));
        let caught = pokedex.get("pikachu").expect("Should be caught");
        assert!(caught.caught_at >= before);

        assert!(pokedex.contains("pikachu"));
        assert!(!pokedex.contains("Pikachu"));
        assert_eq!(pokedex.get("pikachu").map(|c| c.pokemon.height), Some(4));
    }

    #[test]
    fn test_names_are_sorted() {
        let mut pokedex = Pokedex::default();
        pokedex.insert(pokemon("squirtle", None));
        pokedex.insert(pokemon("bulbasaur", None));
        pokedex.insert(pokemon("squirtle", None));

        assert_eq!(pokedex.names().collect::<Vec<_>>(), vec!["bulbasaur", "squirtle"]);
        assert_eq!(pokedex.len(), 2);
    }
}
