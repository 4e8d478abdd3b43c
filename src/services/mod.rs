//! Application services orchestrating the domain ports.

pub mod cache;
pub mod course_service;
pub mod lesson_service;
pub mod lifecycle;
pub mod progress_service;
pub mod session_service;
pub mod subscription_service;
pub mod user_service;

pub use cache::{TtlCache, CACHE_NAMESPACE};
pub use course_service::CourseService;
pub use lesson_service::LessonService;
pub use lifecycle::{LifecycleOutcome, LifecycleService};
pub use progress_service::ProgressService;
pub use session_service::{SessionService, SESSION_PROFILE_KEY};
pub use subscription_service::SubscriptionService;
pub use user_service::UserService;
