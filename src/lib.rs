#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod error;

/// Key hashing: the [`KeyHasher`] trait, adapters and the integer and string
/// hash functions.
pub mod hash;

/// A HashMap implementation using linear probing.
///
/// This module provides a `HashMap` that wraps the `HashTable` and provides
/// a standard key-value map interface with pluggable key hashers.
pub mod hash_map;

pub mod hash_table;

pub use error::TryReserveError;
pub use hash::KeyHasher;
pub use hash_map::Entry;
pub use hash_map::HashMap;
pub use hash_table::DEFAULT_CAPACITY;
pub use hash_table::HashTable;
