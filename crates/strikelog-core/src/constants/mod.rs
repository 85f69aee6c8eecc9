// ABOUTME: Constants module with domain-separated organization
// ABOUTME: XP values, leveling curve parameters, categorizer limits and environment defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped by domain rather than being kept in a single flat list.

/// Level progression curve
pub mod leveling {
    /// XP at which the geometric curve is anchored
    pub const BASE_XP: f64 = 1000.0;
    /// Growth factor between consecutive level thresholds
    pub const MULTIPLIER: f64 = 1.2;
    /// Level every category starts at
    pub const STARTING_LEVEL: u32 = 1;
}

/// Per-technique and per-activity XP values
pub mod xp {
    /// Base XP for a punch
    pub const PUNCHES: f64 = 80.0;
    /// Base XP for a kick
    pub const KICKS: f64 = 120.0;
    /// Base XP for an elbow
    pub const ELBOWS: f64 = 100.0;
    /// Base XP for a knee
    pub const KNEES: f64 = 100.0;
    /// Base XP for a footwork technique
    pub const FOOTWORK: f64 = 80.0;
    /// Base XP for a clinch technique
    pub const CLINCH: f64 = 120.0;
    /// Base XP for a defensive technique
    pub const DEFENSIVE: f64 = 100.0;
    /// Base XP for a sweep
    pub const SWEEPS: f64 = 150.0;
    /// Base XP for a feint
    pub const FEINTS: f64 = 60.0;
    /// Base XP for a category missing from a custom XP table
    pub const FALLBACK: f64 = 100.0;

    /// Fixed XP for a combo without techniques (skipping, running, ...)
    pub const ACTIVITY_BASE: f64 = 50.0;

    /// Bonus when a technique reaches more than one target region
    pub const MULTI_TARGET_BONUS: f64 = 1.1;
    /// Bonus when a technique works from more than one range band
    pub const MULTI_RANGE_BONUS: f64 = 1.1;
    /// Bonus for advanced techniques (see [`ADVANCED_KEYWORDS`])
    pub const ADVANCED_BONUS: f64 = 1.25;
    /// Name fragments marking an advanced technique, matched case-insensitively
    pub const ADVANCED_KEYWORDS: &[&str] = &["spinning", "jump", "switch", "flying"];

    /// Floor applied to time-mode durations, in minutes
    pub const MIN_TIME_MINUTES: f64 = 1.0;
}

/// Unknown-technique categorization
pub mod categorization {
    /// Minimum confidence for a categorizer guess to earn XP
    pub const MIN_CONFIDENCE: f64 = 0.7;
    /// Temperature used for categorization prompts
    pub const LLM_TEMPERATURE: f32 = 0.1;
    /// Token budget for a categorization response
    pub const LLM_MAX_TOKENS: u32 = 1024;
}

/// Retry and polling defaults
pub mod retry {
    /// Attempts before a poll or transaction gives up
    pub const MAX_ATTEMPTS: u32 = 5;
    /// First backoff delay in milliseconds
    pub const INITIAL_BACKOFF_MS: u64 = 50;
    /// Upper bound on a single backoff delay in milliseconds
    pub const MAX_BACKOFF_MS: u64 = 2_000;
    /// Overall deadline for a poll in milliseconds
    pub const MAX_ELAPSED_MS: u64 = 10_000;
    /// Backoff growth factor
    pub const BACKOFF_MULTIPLIER: f64 = 2.0;
}

/// Query limits
pub mod limits {
    /// Default number of history entries returned
    pub const DEFAULT_HISTORY_LIMIT: u32 = 50;
    /// Hard cap on history entries returned
    pub const MAX_HISTORY_LIMIT: u32 = 500;
    /// Default number of workouts returned
    pub const DEFAULT_WORKOUT_LIMIT: u32 = 20;
    /// Hard cap on workouts returned
    pub const MAX_WORKOUT_LIMIT: u32 = 200;
    /// Longest technique name accepted from user input
    pub const MAX_TECHNIQUE_NAME_LEN: usize = 80;
}

/// Environment variable names and defaults
pub mod env_config {
    /// Database connection string
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// Default database connection string
    pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/strikelog.db";
    /// Deployment environment
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
    /// Log filter
    pub const RUST_LOG: &str = "RUST_LOG";
    /// Gemini API key
    pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
    /// Model override for the categorizer
    pub const LLM_MODEL: &str = "STRIKELOG_LLM_MODEL";
    /// Minimum categorizer confidence
    pub const MIN_CONFIDENCE: &str = "STRIKELOG_MIN_CONFIDENCE";
    /// XP policy for combos without techniques
    pub const ACTIVITY_XP_POLICY: &str = "STRIKELOG_ACTIVITY_XP_POLICY";
    /// Optional JSON catalog replacing the builtin table
    pub const CATALOG_PATH: &str = "STRIKELOG_CATALOG_PATH";
    /// Retry attempts
    pub const RETRY_MAX_ATTEMPTS: &str = "STRIKELOG_RETRY_MAX_ATTEMPTS";
    /// Initial retry backoff
    pub const RETRY_INITIAL_BACKOFF_MS: &str = "STRIKELOG_RETRY_INITIAL_BACKOFF_MS";
    /// Retry deadline
    pub const RETRY_MAX_ELAPSED_MS: &str = "STRIKELOG_RETRY_MAX_ELAPSED_MS";
}

/// Service identity used in structured logs
pub mod service_names {
    /// Library / CLI service name
    pub const STRIKELOG: &str = "strikelog";
}
