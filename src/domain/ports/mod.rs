//! Port trait definitions (Hexagonal Architecture)
//!
//! Async and sync trait interfaces that adapters must implement:
//! - DocumentStore: the backing document database
//! - KeyValueStore: local persistent key-value storage (the cache substrate)
//! - IdentityProvider: session user and auth-state notifications
//! - Clock: injected time source
//!
//! These contracts keep the domain independent of specific infrastructure.

pub mod clock;
pub mod document_store;
pub mod identity_provider;
pub mod key_value_store;

pub use clock::{Clock, SystemClock};
pub use document_store::{
    resolve_field_map, CollectionPath, Document, DocumentId, DocumentStore, FieldFilter, FieldMap,
    FieldValue,
};
pub use identity_provider::{AuthUser, IdentityProvider};
pub use key_value_store::{KeyValueStore, StorageError, StorageResult};
