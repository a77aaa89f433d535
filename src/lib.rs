//! # Linked Probe Map
//!
//! A hash map with linear probing that iterates in insertion order.
//!
//! [`LinkedProbeMap`] stores entries directly in an open-addressing slot
//! table and threads a doubly linked list through the occupied slots, so it
//! needs no second container to remember the order in which keys arrived.
//!
//! - Lookups hash a key to its home slot (`hash mod logical_capacity`) and
//!   probe forward one slot at a time.
//! - The table is rebuilt with twice the logical capacity as soon as more than
//!   half of it would be in use. A rebuild keeps the insertion order.
//! - Removal uses no tombstones. The entries that followed the removed one in
//!   its probe cluster are reinserted, which moves them to the end of the
//!   iteration order.
//!
//! ## Basic Usage
//!
//! ```rust
//! use linked_probe::{LinkedProbeMap, MapError};
//!
//! let mut map = LinkedProbeMap::new();
//!
//! // Insert values; an existing key keeps its first value
//! map.insert("apple".to_string(), 1);
//! map.insert("banana".to_string(), 2);
//! assert!(!map.insert("apple".to_string(), 10));
//! assert_eq!(map.get("apple"), Some(&1));
//!
//! // Overwrite through the defaulting accessor
//! *map.get_or_insert_default("apple".to_string()) = 10;
//! assert_eq!(map.at("apple"), Ok(&10));
//! assert_eq!(map.at("cherry"), Err(MapError::KeyNotFound));
//!
//! // Iterate in insertion order
//! let keys: Vec<&str> = map.keys().map(String::as_str).collect();
//! assert_eq!(keys, ["apple", "banana"]);
//!
//! // Remove values
//! map.remove("apple");
//! assert_eq!(map.get("apple"), None);
//! ```
//!
//! ## Cursors
//!
//! ```rust
//! use linked_probe::LinkedProbeMap;
//!
//! let map: LinkedProbeMap<u32, &str> = [(1, "one"), (2, "two")].into_iter().collect();
//! assert!(map.find(&3) == map.cursor_end());
//! assert_eq!(map.find(&1).value(), Some(&"one"));
//! ```

/// Position types over the insertion order
mod cursor;
/// The error returned by fallible accessors
mod error;
/// Insertion-order iterators
pub mod iter;
/// The map itself: probing, growth, compaction
mod linked_probe_map;
/// Slot records shared by the map and its iterators
mod slot;
/// Probe-length statistics
mod stats;
/// Deterministic hashers
mod utils;

#[cfg(test)]
mod linked_probe_map_proptest;

pub use cursor::{Cursor, CursorMut};
pub use error::MapError;
pub use linked_probe_map::LinkedProbeMap;
pub use stats::ProbeStats;
pub use utils::{BuildIdentityHasher, IdentityHasher};
