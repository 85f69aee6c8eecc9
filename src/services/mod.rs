// ABOUTME: Service layer tying drafts, XP attribution and persistence together
// ABOUTME: Exposes the workout finalizer used by the CLI and integration tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Preview and commit of workout drafts
pub mod workout_finalizer;

pub use workout_finalizer::{WorkoutFinalizer, WorkoutSummary};
