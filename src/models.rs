// ABOUTME: Domain models re-exported from strikelog-core
// ABOUTME: Techniques, combos, category progress, XP history and workout records
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use strikelog_core::catalog::{normalize_name, CatalogFile, TechniqueCatalog};
pub use strikelog_core::models::*;
