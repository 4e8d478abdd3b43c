//! Domain models for the tutorhub platform.

pub mod config;
pub mod course;
pub mod lesson;
pub mod progress;
pub mod record;
pub mod subscription;
pub mod user;

pub use config::{CacheConfig, Config, DatabaseConfig, LoggingConfig};
pub use course::{courses_collection, lessons_collection, Course, NewCourse};
pub use lesson::{Lesson, NewLesson};
pub use progress::{progress_collection, LessonProgress};
pub use record::{audit_fields, creation_fields, decode, encode, ActorId, RecordMeta, Stored};
pub use subscription::{
    subscriptions_collection, NewSubscription, Subscription, SubscriptionStatus,
};
pub use user::{users_collection, NewUser, Role, UserProfile, UserStatus};
