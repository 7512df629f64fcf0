//! Cache module for storing raw API responses in memory
//!
//! This module provides a TTL cache that keeps response bodies keyed by their
//! URL. Entries are never checked for freshness on read; a background sweep
//! that runs once per TTL period removes everything that has outlived it.

mod ttl;

pub use ttl::TtlCache;
