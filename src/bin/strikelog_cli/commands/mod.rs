// ABOUTME: Re-exports command modules for strikelog-cli
// ABOUTME: Catalog browsing, level lookup, workout preview/finalize and user progress commands
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub mod catalog;
pub mod level;
pub mod user;
pub mod workout;
