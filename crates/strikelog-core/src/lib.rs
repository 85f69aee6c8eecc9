// ABOUTME: Core types and constants for the Strikelog martial arts training tracker
// ABOUTME: Foundation crate with error handling, domain models, constants and technique catalog
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Strikelog Core
//!
//! Foundation crate providing shared types for the Strikelog XP and leveling
//! system. It changes infrequently, which keeps incremental builds of the
//! workspace fast.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode` and `AppResult`
//! - **constants**: XP values, leveling curve parameters and environment defaults
//! - **models**: Techniques, combos, category progress and workout history
//! - **catalog**: The read-only technique lookup table

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models
pub mod models;

/// Technique catalog
pub mod catalog;
