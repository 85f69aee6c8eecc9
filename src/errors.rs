// ABOUTME: Unified error types re-exported from strikelog-core
// ABOUTME: Keeps `strikelog::errors` import paths stable for binaries and tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use strikelog_core::errors::*;
