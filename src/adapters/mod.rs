//! Infrastructure adapters implementing the domain ports.

pub mod local_storage;
pub mod memory;
pub mod sqlite;

pub use local_storage::JsonFileKeyValueStore;
