//! In-memory adapters: first-class fakes for the store, local storage,
//! identity, and clock ports.

pub mod clock;
pub mod document_store;
pub mod identity_provider;
pub mod key_value_store;

pub use clock::ManualClock;
pub use document_store::InMemoryDocumentStore;
pub use identity_provider::LocalIdentityProvider;
pub use key_value_store::InMemoryKeyValueStore;
