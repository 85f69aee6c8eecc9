// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses database location, log level, LLM credentials, XP tuning and retry bounds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration
//!
//! All settings come from environment variables; there is no config file.
//! Unset variables fall back to the defaults in
//! [`strikelog_core::constants`].

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use strikelog_core::catalog::TechniqueCatalog;
use strikelog_core::constants::{categorization, env_config, retry};
use strikelog_intelligence::{ActivityXpPolicy, AttributionConfig, XpTable};
use tracing::{info, warn, Level};

/// Strongly typed log level configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    #[default]
    Info,
    /// Debug output
    Debug,
    /// Everything
    Trace,
}

impl LogLevel {
    /// Convert to `tracing::Level`
    #[must_use]
    pub const fn to_tracing_level(&self) -> Level {
        match self {
            Self::Error => Level::ERROR,
            Self::Warn => Level::WARN,
            Self::Info => Level::INFO,
            Self::Debug => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// Parse from string with fallback to `Info`
    ///
    /// Accepts full `RUST_LOG` directives such as `strikelog=debug,sqlx=warn`
    /// by reading the first bare level or the first `=level` suffix.
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        let first = s.split(',').next().unwrap_or_default();
        let level = first.rsplit('=').next().unwrap_or(first);
        match level.trim().to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" | "warning" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Deployment environment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback to `Development`
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Check if this is a testing environment
    #[must_use]
    pub const fn is_testing(&self) -> bool {
        matches!(self, Self::Testing)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Type-safe database location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// `SQLite` database file
    SQLite {
        /// Path to the database file
        path: PathBuf,
    },
    /// In-memory `SQLite` (tests, previews)
    Memory,
}

impl DatabaseUrl {
    /// Parse from string with validation
    ///
    /// # Errors
    ///
    /// Returns an error for empty values and for non-`SQLite` schemes
    pub fn parse_url(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(anyhow!("Database URL cannot be empty"));
        }
        if s.starts_with("postgres://") || s.starts_with("postgresql://") {
            return Err(anyhow!(
                "Only SQLite databases are supported, got a PostgreSQL URL"
            ));
        }
        let path = s
            .strip_prefix("sqlite://")
            .or_else(|| s.strip_prefix("sqlite:"))
            .unwrap_or(s);
        if path == ":memory:" {
            Ok(Self::Memory)
        } else if path.is_empty() {
            Err(anyhow!("SQLite database path cannot be empty"))
        } else {
            Ok(Self::SQLite {
                path: PathBuf::from(path),
            })
        }
    }

    /// Convert to a sqlx connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".to_owned(),
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
        Self::parse_url(env_config::DEFAULT_DATABASE_URL).unwrap_or(Self::Memory)
    }
}

impl fmt::Display for DatabaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_connection_string())
    }
}

/// Generative model credentials for unknown-technique categorization
#[derive(Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Gemini API key
    pub api_key: String,
    /// Model override; provider default when `None`
    pub model: Option<String>,
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .finish()
    }
}

/// XP attribution tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XpConfig {
    /// Minimum categorizer confidence
    pub min_confidence: f64,
    /// Scoring of combos without techniques
    pub activity_policy: ActivityXpPolicy,
    /// Optional JSON catalog replacing the builtin table
    pub catalog_path: Option<PathBuf>,
}

impl Default for XpConfig {
    fn default() -> Self {
        Self {
            min_confidence: categorization::MIN_CONFIDENCE,
            activity_policy: ActivityXpPolicy::default(),
            catalog_path: None,
        }
    }
}

impl XpConfig {
    /// Engine configuration derived from these settings
    #[must_use]
    pub fn attribution_config(&self) -> AttributionConfig {
        AttributionConfig {
            table: XpTable::standard(),
            activity_policy: self.activity_policy,
            min_confidence: self.min_confidence,
        }
    }

    /// Load the configured catalog, or the builtin one
    ///
    /// # Errors
    ///
    /// Returns an error if a configured catalog file cannot be loaded
    pub fn load_catalog(&self) -> Result<TechniqueCatalog> {
        match &self.catalog_path {
            Some(path) => TechniqueCatalog::from_path(path)
                .with_context(|| format!("Failed to load catalog from {}", path.display())),
            None => Ok(TechniqueCatalog::builtin()),
        }
    }
}

/// Bounds for retried operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum attempts, including the first
    pub max_attempts: u32,
    /// Delay before the second attempt
    pub initial_backoff: Duration,
    /// Cap on a single delay
    pub max_backoff: Duration,
    /// Overall deadline across attempts
    pub max_elapsed: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: retry::MAX_ATTEMPTS,
            initial_backoff: Duration::from_millis(retry::INITIAL_BACKOFF_MS),
            max_backoff: Duration::from_millis(retry::MAX_BACKOFF_MS),
            max_elapsed: Duration::from_millis(retry::MAX_ELAPSED_MS),
        }
    }
}

/// Complete runtime configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Deployment environment
    pub environment: Environment,
    /// Log level
    pub log_level: LogLevel,
    /// Database location
    pub database_url: DatabaseUrl,
    /// LLM credentials; categorization is offline when `None`
    pub llm: Option<LlmConfig>,
    /// XP tuning
    pub xp: XpConfig,
    /// Retry bounds
    pub retry: RetryConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            log_level: LogLevel::default(),
            database_url: DatabaseUrl::default(),
            llm: None,
            xp: XpConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if any variable is set to an unparseable value or
    /// the resulting configuration fails validation
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let database_url = DatabaseUrl::parse_url(&env_var_or(
            env_config::DATABASE_URL,
            env_config::DEFAULT_DATABASE_URL,
        ))
        .context("Invalid DATABASE_URL value")?;

        let llm = match env::var(env_config::GEMINI_API_KEY) {
            Ok(api_key) if !api_key.trim().is_empty() => Some(LlmConfig {
                api_key,
                model: env::var(env_config::LLM_MODEL)
                    .ok()
                    .filter(|model| !model.trim().is_empty()),
            }),
            _ => None,
        };

        let xp = XpConfig {
            min_confidence: env_var_or(
                env_config::MIN_CONFIDENCE,
                &categorization::MIN_CONFIDENCE.to_string(),
            )
            .parse()
            .context("Invalid STRIKELOG_MIN_CONFIDENCE value")?,
            activity_policy: env_var_or(env_config::ACTIVITY_XP_POLICY, "mode_scaled")
                .parse()
                .context("Invalid STRIKELOG_ACTIVITY_XP_POLICY value")?,
            catalog_path: env::var(env_config::CATALOG_PATH)
                .ok()
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
        };

        let defaults = RetryConfig::default();
        let retry = RetryConfig {
            max_attempts: env_var_or(
                env_config::RETRY_MAX_ATTEMPTS,
                &retry::MAX_ATTEMPTS.to_string(),
            )
            .parse()
            .context("Invalid STRIKELOG_RETRY_MAX_ATTEMPTS value")?,
            initial_backoff: Duration::from_millis(
                env_var_or(
                    env_config::RETRY_INITIAL_BACKOFF_MS,
                    &retry::INITIAL_BACKOFF_MS.to_string(),
                )
                .parse()
                .context("Invalid STRIKELOG_RETRY_INITIAL_BACKOFF_MS value")?,
            ),
            max_backoff: defaults.max_backoff,
            max_elapsed: Duration::from_millis(
                env_var_or(
                    env_config::RETRY_MAX_ELAPSED_MS,
                    &retry::MAX_ELAPSED_MS.to_string(),
                )
                .parse()
                .context("Invalid STRIKELOG_RETRY_MAX_ELAPSED_MS value")?,
            ),
        };

        let config = Self {
            environment: Environment::from_str_or_default(&env_var_or(
                env_config::ENVIRONMENT,
                "development",
            )),
            log_level: LogLevel::from_str_or_default(&env_var_or(env_config::RUST_LOG, "info")),
            database_url,
            llm,
            xp,
            retry,
        };

        config.validate()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if the confidence floor is outside `[0, 1]` or the
    /// retry bounds are zero
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.xp.min_confidence) {
            return Err(anyhow!(
                "STRIKELOG_MIN_CONFIDENCE must be within [0, 1], got {}",
                self.xp.min_confidence
            ));
        }
        if self.retry.max_attempts == 0 {
            return Err(anyhow!("STRIKELOG_RETRY_MAX_ATTEMPTS must be at least 1"));
        }
        if self.retry.max_elapsed.is_zero() {
            return Err(anyhow!("STRIKELOG_RETRY_MAX_ELAPSED_MS must be positive"));
        }
        if self.environment.is_production() && self.database_url.is_memory() {
            warn!("Production environment is using an in-memory database; progress will not persist");
        }
        if self.llm.is_none() {
            warn!("GEMINI_API_KEY not set; unknown techniques will not earn XP");
        }
        Ok(())
    }

    /// Human-readable summary without secrets
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Strikelog Configuration:\n\
             - Environment: {}\n\
             - Log Level: {}\n\
             - Database: {}\n\
             - Categorizer: {}\n\
             - Min Confidence: {}\n\
             - Activity XP Policy: {}\n\
             - Catalog: {}\n\
             - Retry: {} attempts within {}ms",
            self.environment,
            self.log_level,
            self.database_url,
            self.llm.as_ref().map_or("Disabled", |_| "Gemini"),
            self.xp.min_confidence,
            self.xp.activity_policy,
            self.xp
                .catalog_path
                .as_ref()
                .map_or_else(|| "builtin".to_owned(), |path| path.display().to_string()),
            self.retry.max_attempts,
            self.retry.max_elapsed.as_millis(),
        )
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_database_urls() {
        assert_eq!(
            DatabaseUrl::parse_url("sqlite::memory:").unwrap(),
            DatabaseUrl::Memory
        );
        assert_eq!(
            DatabaseUrl::parse_url("sqlite:./data/strikelog.db").unwrap(),
            DatabaseUrl::SQLite {
                path: PathBuf::from("./data/strikelog.db")
            }
        );
        assert_eq!(
            DatabaseUrl::parse_url("/tmp/x.db").unwrap().to_connection_string(),
            "sqlite:/tmp/x.db"
        );
        assert!(DatabaseUrl::parse_url("postgres://localhost/db").is_err());
        assert!(DatabaseUrl::parse_url("   ").is_err());
    }

    #[test]
    fn test_log_level_from_directive() {
        assert_eq!(LogLevel::from_str_or_default("debug"), LogLevel::Debug);
        assert_eq!(
            LogLevel::from_str_or_default("strikelog=trace,sqlx=warn"),
            LogLevel::Trace
        );
        assert_eq!(LogLevel::from_str_or_default("nonsense"), LogLevel::Info);
    }

    #[test]
    fn test_validate_rejects_bad_confidence() {
        let mut config = AppConfig::default();
        config.xp.min_confidence = 1.2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_llm_config_debug_redacts_key() {
        let config = LlmConfig {
            api_key: "secret-key".to_owned(),
            model: None,
        };
        assert!(!format!("{config:?}").contains("secret-key"));
    }
}
