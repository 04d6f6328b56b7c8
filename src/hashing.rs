//! This module provides a deterministic `HashMap`. The hashing data structures in the
//! standard library are randomly seeded, which would make iteration order (and anything
//! derived from it) differ between runs with the same random seed.
//!
//! `HashMap<K, V>` here does not have a `new` method. Use `HashMap::default()` instead.
//!
//! The `hash_str` free function is used to derive per-generator seeds in `crate::random`.

use xxhash_rust::xxh3::xxh3_64;

pub use rustc_hash::FxHashMap as HashMap;

/// A convenience method to compute the hash of a `&str`. Stable across runs and platforms.
#[must_use]
pub fn hash_str(data: &str) -> u64 {
    xxh3_64(data.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_strings() {
        let a = hash_str("hello");
        let b = hash_str("hello");
        let c = hash_str("world");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn deterministic_map() {
        let mut map: HashMap<&str, u32> = HashMap::default();
        map.insert("a", 1);
        map.insert("b", 2);
        assert_eq!(map.get("a"), Some(&1));
        assert_eq!(map.len(), 2);
    }
}
