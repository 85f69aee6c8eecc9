// ABOUTME: Logging configuration and structured logging setup for observability and debugging
// ABOUTME: Installs the tracing subscriber and provides structured XP and level event helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Structured logging configuration

use std::env;
use std::io;

use anyhow::Result;
use strikelog_core::constants::service_names;
use strikelog_core::models::{Category, LevelChange};
use tracing::{info, Level};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};
use uuid::Uuid;

/// Noise reduction applied regardless of `RUST_LOG`
const NOISE_DIRECTIVES: &[(&str, Level)] = &[
    ("hyper", Level::WARN),
    ("hyper::proto", Level::WARN),
    ("reqwest", Level::WARN),
    ("rustls", Level::WARN),
    ("sqlx", Level::WARN),
    ("sqlx::query", Level::WARN),
];

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format
    pub format: LogFormat,
    /// Include source file and line numbers
    pub include_location: bool,
    /// Include thread information
    pub include_thread: bool,
    /// Include span open/close events
    pub include_spans: bool,
    /// Service name for structured logging
    pub service_name: String,
    /// Service version
    pub service_version: String,
    /// Environment (development, testing, production)
    pub environment: String,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// `JSON` lines for production
    Json,
    /// Multi-line human output for development
    Pretty,
    /// Single-line output for the CLI
    Compact,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Pretty,
            include_location: false,
            include_thread: false,
            include_spans: false,
            service_name: service_names::STRIKELOG.into(),
            service_version: env!("CARGO_PKG_VERSION").to_owned(),
            environment: "development".into(),
        }
    }
}

impl LoggingConfig {
    /// Create logging configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let level = env::var("RUST_LOG").unwrap_or_else(|_| "info".into());

        let format = match env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            Ok("compact") => LogFormat::Compact,
            _ => LogFormat::Pretty,
        };

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let is_production = environment == "production";

        Self {
            level,
            format,
            include_location: is_production || env::var("LOG_INCLUDE_LOCATION").is_ok(),
            include_thread: is_production || env::var("LOG_INCLUDE_THREAD").is_ok(),
            include_spans: is_production || env::var("LOG_INCLUDE_SPANS").is_ok(),
            service_name: env::var("SERVICE_NAME")
                .unwrap_or_else(|_| service_names::STRIKELOG.into()),
            service_version: env!("CARGO_PKG_VERSION").to_owned(),
            environment,
        }
    }

    /// Command-line configuration: compact stderr output, `-v` picks the level
    ///
    /// Other settings still come from the environment.
    #[must_use]
    pub fn for_cli(verbose: u8) -> Self {
        let level = match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        Self {
            level: level.into(),
            format: LogFormat::Compact,
            ..Self::from_env()
        }
    }

    /// Build the filter: `RUST_LOG` (or the configured level) plus noise reduction
    #[must_use]
    pub fn env_filter(&self) -> EnvFilter {
        let base = env::var("RUST_LOG").map_or_else(
            |_| EnvFilter::new(&self.level),
            |directive| EnvFilter::new(&directive),
        );
        NOISE_DIRECTIVES
            .iter()
            .fold(base, |filter, (target, level)| {
                filter.add_directive(
                    format!("{target}={level}")
                        .parse()
                        .unwrap_or_else(|_| (*level).into()),
                )
            })
            .add_directive(
                format!("strikelog={}", self.level)
                    .parse()
                    .unwrap_or_else(|_| Level::INFO.into()),
            )
    }

    /// Initialize the global tracing subscriber
    ///
    /// # Errors
    ///
    /// Returns an error if a global subscriber is already installed
    pub fn init(&self) -> Result<()> {
        let registry = tracing_subscriber::registry().with(self.env_filter());
        let span_events = if self.include_spans {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };

        match self.format {
            LogFormat::Json => {
                let json_layer = fmt::layer()
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_thread_ids(self.include_thread)
                    .with_thread_names(self.include_thread)
                    .with_target(true)
                    .with_writer(io::stdout)
                    .with_span_events(span_events)
                    .json();
                registry.with(json_layer).try_init()?;
            }
            LogFormat::Pretty => {
                let pretty_layer = fmt::layer()
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_thread_ids(self.include_thread)
                    .with_thread_names(self.include_thread)
                    .with_target(true)
                    .with_writer(io::stdout)
                    .with_span_events(span_events);
                registry.with(pretty_layer).try_init()?;
            }
            LogFormat::Compact => {
                // CLI output goes to stdout, so logs stay on stderr
                let compact_layer = fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(io::stderr)
                    .with_span_events(FmtSpan::NONE);
                registry.with(compact_layer).try_init()?;
            }
        }

        self.log_startup_info();
        Ok(())
    }

    fn log_startup_info(&self) {
        info!(
            service.name = %self.service_name,
            service.version = %self.service_version,
            environment = %self.environment,
            log.level = %self.level,
            log.format = ?self.format,
            log.spans = self.include_spans,
            "Strikelog logging initialized"
        );
    }
}

/// Structured events for the XP pipeline
pub struct XpLogger;

impl XpLogger {
    /// A workout was committed
    pub fn log_workout_finalized(user_id: Uuid, workout_id: Uuid, combos: usize, total_xp: u64) {
        info!(
            user.id = %user_id,
            workout.id = %workout_id,
            workout.combos = combos,
            xp.total = total_xp,
            "Workout finalized"
        );
    }

    /// XP credited to one category
    pub fn log_xp_gain(user_id: Uuid, category: Category, xp_gained: u64, new_xp: u64) {
        info!(
            user.id = %user_id,
            xp.category = %category,
            xp.gained = xp_gained,
            xp.total = new_xp,
            "XP gained"
        );
    }

    /// A category crossed one or more level thresholds
    pub fn log_level_up(user_id: Uuid, change: &LevelChange) {
        info!(
            user.id = %user_id,
            xp.category = %change.category,
            level.previous = change.previous_level,
            level.new = change.new_level,
            xp.total = change.new_xp,
            "Level up"
        );
    }

    /// Database operation timing
    pub fn log_database_operation(operation: &str, table: &str, success: bool, duration_ms: u64) {
        info!(
            db.operation = %operation,
            db.table = %table,
            db.success = success,
            db.duration_ms = duration_ms,
            "Database operation"
        );
    }
}
