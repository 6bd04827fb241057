//! Key-value persistence for move-in progress.
//!
//! This crate provides a trait-based string key-value store with an
//! in-memory implementation and a JSON file reference implementation.

#![warn(missing_docs)]

pub mod trait_;
pub mod memory;
pub mod json_storage;

pub use trait_::{KeyValueStore, StorageError, Result};
pub use memory::MemoryStore;
pub use json_storage::JsonFileStore;
