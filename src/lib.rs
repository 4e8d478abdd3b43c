//! Tutorhub - Tutoring Platform Backend
//!
//! Tutorhub is the backend core for a small tutoring platform: a course
//! catalog with nested lessons, role-based user accounts, manually reviewed
//! course subscriptions, and per-lesson progress tracking.
//!
//! Two mechanisms cut across every feature:
//!
//! - **Soft-delete lifecycle**: records are logically deleted and restorable,
//!   with actor and timestamp stamps on every transition
//! - **Read-through TTL cache**: hot catalog reads are served from local
//!   key-value storage with per-call-site TTLs, failing open on any error
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Models, ports, and the error taxonomy
//! - **Service Layer** (`services`): Lifecycle, cache, and per-entity services
//! - **Adapters** (`adapters`): SQLite document store, JSON-file key-value
//!   storage, and in-memory test doubles
//! - **Infrastructure Layer** (`infrastructure`): Configuration and logging
//!
//! # Example
//!
//! ```ignore
//! use tutorhub::infrastructure::{AppServices, ConfigLoader};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::load()?;
//!     let app = AppServices::from_config(&config).await?;
//!     let courses = app.courses.list_courses().await?;
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    ActorId, CacheConfig, Config, Course, DatabaseConfig, Lesson, LessonProgress, LoggingConfig,
    NewCourse, NewLesson, NewSubscription, NewUser, RecordMeta, Role, Stored, Subscription,
    SubscriptionStatus, UserProfile, UserStatus,
};
pub use domain::ports::{
    AuthUser, Clock, CollectionPath, Document, DocumentId, DocumentStore, FieldFilter, FieldMap,
    FieldValue, IdentityProvider, KeyValueStore, SystemClock,
};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::setup::AppServices;
pub use services::{
    CourseService, LessonService, LifecycleOutcome, LifecycleService, ProgressService,
    SessionService, SubscriptionService, TtlCache, UserService,
};
