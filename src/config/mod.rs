// ABOUTME: Configuration module for environment-driven runtime settings
// ABOUTME: Database location, logging level, LLM credentials, XP tuning and retry bounds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Environment-variable configuration loading
pub mod environment;

pub use environment::{AppConfig, DatabaseUrl, Environment, LlmConfig, LogLevel, RetryConfig, XpConfig};
