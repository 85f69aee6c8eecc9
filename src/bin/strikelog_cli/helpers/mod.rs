// ABOUTME: Re-exports helper modules for strikelog-cli
// ABOUTME: Provides setup of database, engine and categorizer plus display formatting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub mod display;
pub mod setup;
