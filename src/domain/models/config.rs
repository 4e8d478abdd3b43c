//! Configuration model.

use serde::{Deserialize, Serialize};

/// Main configuration structure for tutorhub.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            cache: CacheConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseConfig {
    /// Path to the `SQLite` database file
    #[serde(default = "default_database_path")]
    pub path: String,

    /// Maximum number of database connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_path() -> String {
    ".tutorhub/tutorhub.db".to_string()
}

const fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// TTL cache configuration. TTLs differ per call site to reflect differing
/// volatility: list-level data turns over faster than single-entity fetches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CacheConfig {
    /// TTL in minutes for cached list-level reads (course listing)
    #[serde(default = "default_list_ttl_minutes")]
    pub list_ttl_minutes: i64,

    /// TTL in minutes for cached single-entity reads (one course)
    #[serde(default = "default_entity_ttl_minutes")]
    pub entity_ttl_minutes: i64,

    /// Path to the local key-value storage file backing the cache
    #[serde(default = "default_storage_path")]
    pub storage_path: String,
}

const fn default_list_ttl_minutes() -> i64 {
    30
}

const fn default_entity_ttl_minutes() -> i64 {
    60
}

fn default_storage_path() -> String {
    ".tutorhub/local_storage.json".to_string()
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            list_ttl_minutes: default_list_ttl_minutes(),
            entity_ttl_minutes: default_entity_ttl_minutes(),
            storage_path: default_storage_path(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}
