//! Composition root: wire the loaded configuration into stores and services.
//!
//! This is the one place that knows how the pieces fit together: the config's
//! database section becomes the SQLite pool, the cache section becomes the
//! file-backed key-value store and the service TTLs.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::adapters::sqlite::{initialize_database, SqliteDocumentStore};
use crate::adapters::JsonFileKeyValueStore;
use crate::domain::models::config::Config;
use crate::domain::ports::{IdentityProvider, KeyValueStore, SystemClock};
use crate::services::{
    CourseService, LessonService, ProgressService, SessionService, SubscriptionService, TtlCache,
    UserService,
};

/// The fully wired service graph.
pub struct AppServices {
    pub courses: CourseService,
    pub lessons: LessonService,
    pub users: UserService,
    pub subscriptions: SubscriptionService,
    pub progress: ProgressService,
    pub cache: TtlCache,
    storage: Arc<dyn KeyValueStore>,
}

impl AppServices {
    /// Build every service from the configuration: open and migrate the
    /// database, open the local storage file, and apply the configured TTLs.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let pool = initialize_database(&config.database)
            .await
            .with_context(|| format!("initializing database at {}", config.database.path))?;

        let clock = Arc::new(SystemClock);
        let store = Arc::new(SqliteDocumentStore::with_clock(pool, clock.clone()));
        let storage: Arc<dyn KeyValueStore> = Arc::new(
            JsonFileKeyValueStore::open(&config.cache.storage_path)
                .with_context(|| format!("opening local storage at {}", config.cache.storage_path))?,
        );
        let cache = TtlCache::new(storage.clone(), clock);

        Ok(Self {
            courses: CourseService::new(store.clone(), cache.clone()).with_ttls(
                config.cache.list_ttl_minutes,
                config.cache.entity_ttl_minutes,
            ),
            lessons: LessonService::new(store.clone()),
            users: UserService::new(store.clone()),
            subscriptions: SubscriptionService::new(store.clone()),
            progress: ProgressService::new(store),
            cache,
            storage,
        })
    }

    /// Attach an identity provider, yielding the session service over the
    /// same storage and cache as the rest of the graph.
    pub fn session(&self, identity: Arc<dyn IdentityProvider>) -> SessionService {
        SessionService::new(
            identity,
            self.users.clone(),
            self.storage.clone(),
            self.cache.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::LocalIdentityProvider;
    use crate::domain::models::{ActorId, NewCourse};
    use crate::domain::ports::{AuthUser, DocumentId};
    use crate::services::CACHE_NAMESPACE;
    use tempfile::tempdir;

    fn test_config(dir: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.database.path = dir
            .join("data/tutorhub.db")
            .to_str()
            .unwrap()
            .to_string();
        config.cache.storage_path = dir
            .join("local_storage.json")
            .to_str()
            .unwrap()
            .to_string();
        config.cache.list_ttl_minutes = 5;
        config.cache.entity_ttl_minutes = 10;
        config
    }

    #[tokio::test]
    async fn test_from_config_wires_database_and_storage_paths() {
        let dir = tempdir().unwrap();
        let config = test_config(dir.path());

        let app = AppServices::from_config(&config).await.unwrap();

        let id = app
            .courses
            .create_course(NewCourse::new("Algebra I", DocumentId::new("tutor-1")))
            .await
            .unwrap();
        assert_eq!(app.courses.list_courses().await.unwrap().len(), 1);
        assert!(dir.path().join("data/tutorhub.db").exists());

        // The listing was cached through the configured storage file
        let cached = app
            .cache
            .get::<Vec<crate::domain::models::Stored<crate::domain::models::Course>>>("courses");
        assert!(cached.is_some());

        // Caching proves the configured TTLs are live: a delete is invisible
        // until the entry lapses
        app.courses
            .soft_delete_course(&id, &ActorId::new("super_admin"))
            .await
            .unwrap();
        assert_eq!(app.courses.list_courses().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_storage_file_persists_cache_entries() {
        let dir = tempdir().unwrap();
        let config = test_config(dir.path());

        let app = AppServices::from_config(&config).await.unwrap();
        app.courses.list_courses().await.unwrap();

        let reopened = JsonFileKeyValueStore::open(&config.cache.storage_path).unwrap();
        let namespaced: Vec<_> = reopened
            .keys()
            .unwrap()
            .into_iter()
            .filter(|k| k.starts_with(CACHE_NAMESPACE))
            .collect();
        assert_eq!(namespaced, vec![format!("{CACHE_NAMESPACE}courses")]);
    }

    #[tokio::test]
    async fn test_session_service_shares_storage() {
        let dir = tempdir().unwrap();
        let config = test_config(dir.path());

        let app = AppServices::from_config(&config).await.unwrap();
        let identity = Arc::new(LocalIdentityProvider::new());
        let session = app.session(identity.clone());

        identity.sign_in(AuthUser::new("uid-1"));
        // No profile document yet; resolution confirms absence cleanly
        assert!(session.load_profile().await.unwrap().is_none());
    }
}
