// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, deployment modes, and runtime configuration parsing
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Environment-based configuration management for production deployment

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::constants::defaults;

/// Strongly typed log level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to `tracing::Level`
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Error => tracing::Level::ERROR,
            Self::Warn => tracing::Level::WARN,
            Self::Info => tracing::Level::INFO,
            Self::Debug => tracing::Level::DEBUG,
            Self::Trace => tracing::Level::TRACE,
        }
    }

    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info, // Default fallback
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Environment type for security and other configurations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development, // Default fallback for unrecognized values
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Check if this is a development environment
    #[must_use]
    pub const fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Type-safe database location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// SQLite database with file path
    SQLite { path: PathBuf },
    /// In-memory SQLite (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse from string
    #[must_use]
    pub fn parse_url(s: &str) -> Self {
        let path_str = s.strip_prefix("sqlite:").unwrap_or(s);
        if path_str == ":memory:" {
            Self::Memory
        } else {
            Self::SQLite {
                path: PathBuf::from(path_str),
            }
        }
    }

    /// Convert to connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".to_string(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::parse_url(defaults::DATABASE_URL)
    }
}

impl std::fmt::Display for DatabaseUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_connection_string())
    }
}

/// Top-level server configuration loaded at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Deployment environment
    pub environment: Environment,
    /// Log level
    pub log_level: LogLevel,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Authentication configuration
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL (SQLite path or in-memory)
    pub url: DatabaseUrl,
    /// Enable database migrations on startup
    pub auto_migrate: bool,
}

/// JWT signing configuration for the two token contexts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Access-token signing secret
    pub jwt_secret: String,
    /// Refresh-token signing secret (independent of the access secret)
    pub jwt_refresh_secret: String,
    /// Access-token lifetime as a duration string (e.g. "15m")
    pub jwt_expiration: String,
    /// Refresh-token lifetime as a duration string (e.g. "7d")
    pub jwt_refresh_expiration: String,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable has an unparseable value or if a
    /// production deployment is missing its signing secrets
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        // Load .env file if it exists
        if let Err(e) = dotenvy::dotenv() {
            warn!("No .env file found or failed to load: {}", e);
        }

        let environment =
            Environment::from_str_or_default(&env_var_or("ENVIRONMENT", "development")?);

        let config = Self {
            environment: environment.clone(),
            log_level: LogLevel::from_str_or_default(&env_var_or(
                "LOG_LEVEL",
                defaults::LOG_LEVEL,
            )?),
            database: DatabaseConfig {
                url: DatabaseUrl::parse_url(&env_var_or("DATABASE_URL", defaults::DATABASE_URL)?),
                auto_migrate: env_var_or("AUTO_MIGRATE", "true")?
                    .parse()
                    .context("Invalid AUTO_MIGRATE value")?,
            },
            auth: AuthConfig {
                jwt_secret: env_var_or("JWT_SECRET", defaults::DEV_JWT_SECRET)?,
                jwt_refresh_secret: env_var_or(
                    "JWT_REFRESH_SECRET",
                    defaults::DEV_JWT_REFRESH_SECRET,
                )?,
                jwt_expiration: env_var_or("JWT_EXPIRATION", defaults::JWT_EXPIRATION)?,
                jwt_refresh_expiration: env_var_or(
                    "JWT_REFRESH_EXPIRATION",
                    defaults::JWT_REFRESH_EXPIRATION,
                )?,
            },
        };

        config.validate()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error when production deployments run with development
    /// signing secrets or shared key material between contexts
    pub fn validate(&self) -> Result<()> {
        if self.environment.is_production() {
            if self.auth.jwt_secret == defaults::DEV_JWT_SECRET
                || self.auth.jwt_refresh_secret == defaults::DEV_JWT_REFRESH_SECRET
            {
                return Err(anyhow::anyhow!(
                    "JWT_SECRET and JWT_REFRESH_SECRET must be set in production"
                ));
            }
        }

        // The two signing contexts must never share key material
        if self.auth.jwt_secret == self.auth.jwt_refresh_secret {
            warn!("JWT_SECRET and JWT_REFRESH_SECRET are identical; access and refresh tokens will verify in both contexts");
        }

        Ok(())
    }

    /// Get a summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Banquise Identity Configuration:\n\
             - Environment: {}\n\
             - Log Level: {}\n\
             - Database: {}\n\
             - Auto Migrate: {}\n\
             - Access Token Lifetime: {}\n\
             - Refresh Token Lifetime: {}",
            self.environment,
            self.log_level,
            self.database.url,
            self.database.auto_migrate,
            self.auth.jwt_expiration,
            self.auth.jwt_refresh_expiration
        )
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> Result<String> {
    Ok(env::var(key).unwrap_or_else(|_| default.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str_or_default("error"), LogLevel::Error);
        assert_eq!(LogLevel::from_str_or_default("WARN"), LogLevel::Warn);
        assert_eq!(LogLevel::from_str_or_default("info"), LogLevel::Info);
        assert_eq!(LogLevel::from_str_or_default("Debug"), LogLevel::Debug);
        assert_eq!(LogLevel::from_str_or_default("trace"), LogLevel::Trace);
        assert_eq!(LogLevel::from_str_or_default("invalid"), LogLevel::Info); // Default fallback
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!(
            Environment::from_str_or_default("production"),
            Environment::Production
        );
        assert_eq!(
            Environment::from_str_or_default("PROD"),
            Environment::Production
        );
        assert_eq!(
            Environment::from_str_or_default("test"),
            Environment::Testing
        );
        assert_eq!(
            Environment::from_str_or_default("anything-else"),
            Environment::Development
        );
    }

    #[test]
    fn test_database_url_parsing() {
        assert!(DatabaseUrl::parse_url("sqlite::memory:").is_memory());
        let url = DatabaseUrl::parse_url("sqlite:./data/identity.db");
        assert_eq!(url.to_connection_string(), "sqlite:./data/identity.db");
        // Bare paths are treated as SQLite files
        let url = DatabaseUrl::parse_url("./identity.db");
        assert_eq!(url.to_connection_string(), "sqlite:./identity.db");
    }

    #[test]
    #[serial]
    fn test_from_env_uses_defaults() {
        for key in [
            "ENVIRONMENT",
            "LOG_LEVEL",
            "DATABASE_URL",
            "AUTO_MIGRATE",
            "JWT_SECRET",
            "JWT_REFRESH_SECRET",
            "JWT_EXPIRATION",
            "JWT_REFRESH_EXPIRATION",
        ] {
            env::remove_var(key);
        }

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.auth.jwt_expiration, defaults::JWT_EXPIRATION);
        assert_eq!(
            config.auth.jwt_refresh_expiration,
            defaults::JWT_REFRESH_EXPIRATION
        );
        assert!(config.database.auto_migrate);
    }

    #[test]
    #[serial]
    fn test_production_rejects_dev_secrets() {
        env::set_var("ENVIRONMENT", "production");
        env::remove_var("JWT_SECRET");
        env::remove_var("JWT_REFRESH_SECRET");

        assert!(ServerConfig::from_env().is_err());

        env::set_var("JWT_SECRET", "prod-access");
        env::set_var("JWT_REFRESH_SECRET", "prod-refresh");
        assert!(ServerConfig::from_env().is_ok());

        for key in ["ENVIRONMENT", "JWT_SECRET", "JWT_REFRESH_SECRET"] {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_summary_excludes_secrets() {
        let config = ServerConfig {
            environment: Environment::Development,
            log_level: LogLevel::Info,
            database: DatabaseConfig {
                url: DatabaseUrl::default(),
                auto_migrate: true,
            },
            auth: AuthConfig {
                jwt_secret: "super-secret-access".into(),
                jwt_refresh_secret: "super-secret-refresh".into(),
                jwt_expiration: "15m".into(),
                jwt_refresh_expiration: "7d".into(),
            },
        };

        let summary = config.summary();
        assert!(!summary.contains("super-secret"));
        assert!(summary.contains("15m"));
    }
}
