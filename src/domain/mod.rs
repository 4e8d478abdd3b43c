//! Domain layer for the tutorhub platform.
//!
//! Core business logic, domain models, and port contracts.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
