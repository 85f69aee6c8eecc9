// ABOUTME: Technique catalog commands for strikelog-cli
// ABOUTME: Lists techniques by category and shows one technique with its XP value
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::{anyhow, Result};
use strikelog::config::AppConfig;
use strikelog::intelligence::XpAttributionEngine;
use strikelog::models::Category;

use crate::helpers::display::{display_technique, display_techniques};
use crate::helpers::setup::build_engine;

/// List the catalog, optionally one category only
pub fn list(config: &AppConfig, category: Option<&str>) -> Result<()> {
    let engine = build_engine(config)?;
    let catalog = engine.catalog();
    match category {
        Some(category) => {
            let category: Category = category.parse()?;
            display_techniques(catalog.by_category(category));
        }
        None => display_techniques(catalog.iter()),
    }
    println!("\n{} techniques, catalog version {}", catalog.len(), catalog.version());
    Ok(())
}

/// Show one technique
pub fn show(config: &AppConfig, name: &str) -> Result<()> {
    let engine = build_engine(config)?;
    let technique = engine
        .catalog()
        .lookup(name)
        .ok_or_else(|| anyhow!("'{name}' is not in the technique catalog"))?;
    display_technique(technique, engine.technique_xp(technique));
    if XpAttributionEngine::name_bonus(&technique.name) > 1.0 {
        println!("   Advanced technique bonus applied");
    }
    Ok(())
}
