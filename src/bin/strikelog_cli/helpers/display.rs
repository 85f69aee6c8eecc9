// ABOUTME: Output formatting helpers for strikelog-cli
// ABOUTME: Consistent tables for techniques, levels, XP reports, progress and history
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::Debug;

use strikelog::intelligence::{AttributionReport, LevelInfo, SkipReason, SkippedTechnique};
use strikelog::models::{CategoryProgress, Technique, WorkoutRecord, XpHistoryEntry};
use strikelog::services::WorkoutSummary;

const RULE_WIDTH: usize = 60;

fn rule() {
    println!("{}", "=".repeat(RULE_WIDTH));
}

fn join_debug<T: Debug>(items: impl IntoIterator<Item = T>) -> String {
    items
        .into_iter()
        .map(|item| format!("{item:?}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// One line per technique
pub fn display_techniques<'a>(techniques: impl IntoIterator<Item = &'a Technique>) {
    println!("{:<28} {:<10} {:<14} {}", "Name", "Category", "Side", "Ranges");
    rule();
    for technique in techniques {
        println!(
            "{:<28} {:<10} {:<14} {}",
            technique.name,
            technique.category.as_str(),
            format!("{:?}", technique.side),
            join_debug(&technique.ranges)
        );
    }
}

/// Full detail of one technique
pub fn display_technique(technique: &Technique, xp_per_rep: f64) {
    println!("{}", technique.name);
    rule();
    println!("   Id:       {}", technique.id);
    println!("   Category: {}", technique.category);
    println!("   Side:     {:?}", technique.side);
    println!("   Targets:  {}", join_debug(&technique.targets));
    println!("   Ranges:   {}", join_debug(&technique.ranges));
    println!("   XP:       {xp_per_rep:.1} per set/round/minute");
}

/// Position on the level curve
pub fn display_level_info(info: &LevelInfo) {
    println!("XP:              {}", info.xp);
    println!("Level:           {}", info.level);
    println!("Level starts at: {}", info.current_threshold);
    println!("Next level at:   {}", info.next_threshold);
    println!("XP to go:        {}", info.xp_to_next_level);
    println!("Progress:        {:.1}%", info.progress_percent);
}

/// XP per category plus the per-combo breakdown
pub fn display_report(report: &AttributionReport) {
    println!("XP PREVIEW");
    rule();
    for (category, xp) in report.category_xp.gains() {
        println!("   {:<10} +{xp}", category.as_str());
    }
    println!("   {:<10} {}", "Total", report.category_xp.total());

    if !report.combos.is_empty() {
        println!("\nPer combo:");
        for combo in &report.combos {
            println!(
                "   #{:<3} base {:>7.1} x {:<6.2} = {:>8.1}",
                combo.index + 1,
                combo.base_xp,
                combo.multiplier,
                combo.total_raw()
            );
        }
    }
    display_skipped(&report.skipped);
}

/// Result of a committed workout
pub fn display_summary(summary: &WorkoutSummary) {
    println!("Workout {} saved", summary.workout_id);
    rule();
    for (category, xp) in &summary.category_xp {
        println!("   {:<10} +{xp}", category.as_str());
    }
    println!("   {:<10} {}", "Total", summary.total_xp);

    let level_ups: Vec<_> = summary.level_ups().collect();
    if !level_ups.is_empty() {
        println!("\nLevel ups:");
        for change in level_ups {
            println!(
                "   {:<10} {} -> {}",
                change.category.as_str(),
                change.previous_level,
                change.new_level
            );
        }
    }
    display_skipped(&summary.skipped_techniques);
}

fn display_skipped(skipped: &[SkippedTechnique]) {
    if skipped.is_empty() {
        return;
    }
    println!("\nNo XP for:");
    for technique in skipped {
        let reason = match &technique.reason {
            SkipReason::Unresolved => "not in the catalog".to_owned(),
            SkipReason::LowConfidence {
                category,
                confidence,
            } => format!("guessed {category} with only {:.0}% confidence", confidence * 100.0),
            SkipReason::UnknownCategory { category } => format!("unknown category '{category}'"),
            SkipReason::CategorizerFailed { error } => format!("categorizer failed: {error}"),
        };
        println!("   {:<28} {reason}", technique.name);
    }
}

/// Every category's XP and level
pub fn display_progress(progress: &[CategoryProgress]) {
    println!("{:<10} {:>10} {:>6}", "Category", "XP", "Level");
    rule();
    for row in progress {
        println!("{:<10} {:>10} {:>6}", row.category.as_str(), row.xp, row.level);
    }
}

/// History rows, newest first
pub fn display_history(entries: &[XpHistoryEntry]) {
    if entries.is_empty() {
        println!("No XP history yet");
        return;
    }
    println!("{:<17} {:<10} {:>8}  Workout", "When", "Category", "XP");
    rule();
    for entry in entries {
        println!(
            "{:<17} {:<10} {:>8}  {}",
            entry.created_at.format("%Y-%m-%d %H:%M"),
            entry.category.as_str(),
            entry.xp_gained,
            entry.workout_id
        );
    }
}

/// Workouts with their combos
pub fn display_workouts(workouts: &[WorkoutRecord]) {
    if workouts.is_empty() {
        println!("No workouts yet");
        return;
    }
    for workout in workouts {
        println!(
            "{}  {}  {} XP",
            workout.created_at.format("%Y-%m-%d %H:%M"),
            workout.id,
            workout.total_xp
        );
        if let Some(notes) = &workout.notes {
            println!("   Notes: {notes}");
        }
        for combo in &workout.combos {
            let body = if combo.is_activity() {
                "(activity)".to_owned()
            } else {
                combo.techniques_joined()
            };
            println!("   - {} / {}: {body}", combo.training_type, combo.mode);
        }
    }
}
