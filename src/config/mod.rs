// src/config/mod.rs
// Central configuration for the teamdeck backend

pub mod helpers;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

lazy_static! {
    pub static ref CONFIG: TeamdeckConfig = TeamdeckConfig::from_env();
}

/// Main configuration structure - composes all domain configs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamdeckConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub workload: WorkloadConfig,
    pub insights: InsightConfig,
    pub logging: LoggingConfig,
}

impl TeamdeckConfig {
    pub fn from_env() -> Self {
        // Don't panic if .env doesn't exist (for production)
        dotenv::dotenv().ok();

        Self {
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            auth: AuthConfig::from_env(),
            workload: WorkloadConfig::from_env(),
            insights: InsightConfig::from_env(),
            logging: LoggingConfig::from_env(),
        }
    }
}

impl Default for TeamdeckConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            host: helpers::env_or("TEAMDECK_HOST", "127.0.0.1"),
            port: helpers::env_parsed("TEAMDECK_PORT", 3000),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn from_env() -> Self {
        Self {
            url: helpers::env_or("DATABASE_URL", "sqlite:teamdeck.db?mode=rwc"),
            max_connections: helpers::env_parsed("TEAMDECK_SQLITE_MAX_CONNECTIONS", 5),
        }
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_days: i64,
}

impl AuthConfig {
    pub fn from_env() -> Self {
        Self {
            jwt_secret: helpers::env_or(
                "JWT_SECRET",
                "teamdeck-jwt-secret-change-in-production-please",
            ),
            token_ttl_days: helpers::env_parsed("JWT_TTL_DAYS", 7),
        }
    }
}

/// Workload aggregation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadConfig {
    /// Nominal full task load per person; workload percentage is
    /// computed against this and capped at 100.
    pub max_capacity: u32,
}

impl WorkloadConfig {
    pub fn from_env() -> Self {
        Self {
            max_capacity: helpers::env_parsed("WORKLOAD_MAX_CAPACITY", 8),
        }
    }
}

/// Insight generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightConfig {
    /// When enabled, generation skips inserts that would duplicate an
    /// existing (project, type, title) insight. Off by default: repeated
    /// generation appends to the history.
    pub dedupe_generated: bool,
}

impl InsightConfig {
    pub fn from_env() -> Self {
        Self {
            dedupe_generated: helpers::env_bool("INSIGHT_DEDUPE", false),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        Self {
            level: helpers::env_or("TEAMDECK_LOG_LEVEL", "info"),
        }
    }
}
