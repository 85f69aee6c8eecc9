// ABOUTME: Builtin Muay Thai technique table compiled into the binary
// ABOUTME: Versioned, read-only data; replaceable at runtime by a JSON catalog file
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::models::Category::{
    Clinch, Defensive, Elbows, Feints, Footwork, Kicks, Knees, Punches, Sweeps,
};
use crate::models::Range::{Clinch as ClinchRange, Close, Long, Medium};
use crate::models::Side::{Both, Lead, NotApplicable, Rear};
use crate::models::Target::{Body, Head, Legs};
use crate::models::{Category, Range, Side, Target, Technique};

/// Version of the builtin table; bump whenever an entry changes
pub const BUILTIN_CATALOG_VERSION: u32 = 3;

type Row = (
    &'static str,
    &'static str,
    Category,
    Side,
    &'static [Target],
    &'static [Range],
);

const ROWS: &[Row] = &[
    // Punches
    ("jab", "Jab", Punches, Lead, &[Head, Body], &[Medium]),
    ("cross", "Cross", Punches, Rear, &[Head, Body], &[Medium]),
    ("lead_hook", "Lead Hook", Punches, Lead, &[Head, Body], &[Medium, Close]),
    ("rear_hook", "Rear Hook", Punches, Rear, &[Head, Body], &[Medium, Close]),
    ("lead_uppercut", "Lead Uppercut", Punches, Lead, &[Head, Body], &[Close]),
    ("rear_uppercut", "Rear Uppercut", Punches, Rear, &[Head, Body], &[Close]),
    ("overhand", "Overhand", Punches, Rear, &[Head], &[Medium]),
    ("superman_punch", "Superman Punch", Punches, Rear, &[Head], &[Long, Medium]),
    ("spinning_backfist", "Spinning Backfist", Punches, Both, &[Head], &[Medium]),
    // Kicks
    ("lead_roundhouse_kick", "Lead Roundhouse Kick", Kicks, Lead, &[Head, Body, Legs], &[Long]),
    ("rear_roundhouse_kick", "Rear Roundhouse Kick", Kicks, Rear, &[Head, Body, Legs], &[Long]),
    ("switch_kick", "Switch Kick", Kicks, Lead, &[Head, Body, Legs], &[Long]),
    ("lead_teep", "Lead Teep", Kicks, Lead, &[Head, Body, Legs], &[Long]),
    ("rear_teep", "Rear Teep", Kicks, Rear, &[Body], &[Long]),
    ("low_kick", "Low Kick", Kicks, Rear, &[Legs], &[Long, Medium]),
    ("calf_kick", "Calf Kick", Kicks, Rear, &[Legs], &[Medium]),
    ("side_kick", "Side Kick", Kicks, Lead, &[Body, Legs], &[Long]),
    ("axe_kick", "Axe Kick", Kicks, Rear, &[Head], &[Long]),
    ("question_mark_kick", "Question Mark Kick", Kicks, Rear, &[Head], &[Long]),
    ("spinning_back_kick", "Spinning Back Kick", Kicks, Both, &[Body], &[Long]),
    ("jumping_switch_kick", "Jumping Switch Kick", Kicks, Lead, &[Head, Body], &[Long]),
    // Elbows
    ("horizontal_elbow", "Horizontal Elbow", Elbows, Both, &[Head], &[Close]),
    ("uppercut_elbow", "Uppercut Elbow", Elbows, Both, &[Head], &[Close, ClinchRange]),
    ("downward_elbow", "Downward Elbow", Elbows, Both, &[Head], &[Close, ClinchRange]),
    ("diagonal_elbow", "Diagonal Elbow", Elbows, Both, &[Head], &[Close]),
    ("spear_elbow", "Spear Elbow", Elbows, Both, &[Head, Body], &[Close]),
    ("spinning_elbow", "Spinning Elbow", Elbows, Both, &[Head], &[Close]),
    ("jumping_elbow", "Jumping Elbow", Elbows, Rear, &[Head], &[Medium, Close]),
    // Knees
    ("straight_knee", "Straight Knee", Knees, Rear, &[Body], &[Close, ClinchRange]),
    ("diagonal_knee", "Diagonal Knee", Knees, Both, &[Body], &[Close, ClinchRange]),
    ("curving_knee", "Curving Knee", Knees, Both, &[Body, Legs], &[ClinchRange]),
    ("switch_knee", "Switch Knee", Knees, Lead, &[Body], &[Close]),
    ("flying_knee", "Flying Knee", Knees, Rear, &[Head, Body], &[Medium, Close]),
    // Footwork
    ("step_in", "Step In", Footwork, NotApplicable, &[], &[Long, Medium]),
    ("step_back", "Step Back", Footwork, NotApplicable, &[], &[Medium]),
    ("lateral_step", "Lateral Step", Footwork, NotApplicable, &[], &[Medium]),
    ("pivot", "Pivot", Footwork, Lead, &[], &[Medium, Close]),
    ("switch_stance", "Switch Stance", Footwork, NotApplicable, &[], &[Long]),
    // Clinch
    ("double_collar_tie", "Double Collar Tie", Clinch, Both, &[Head], &[ClinchRange]),
    ("arm_control", "Arm Control", Clinch, Both, &[Body], &[ClinchRange]),
    ("body_lock", "Body Lock", Clinch, Both, &[Body], &[ClinchRange]),
    ("clinch_turn", "Clinch Turn", Clinch, Both, &[Head, Body], &[ClinchRange]),
    // Defensive
    ("check", "Check", Defensive, Lead, &[Legs], &[Long]),
    ("parry", "Parry", Defensive, Both, &[Head, Body], &[Medium]),
    ("high_guard", "High Guard", Defensive, Both, &[Head], &[Medium, Close]),
    ("slip", "Slip", Defensive, NotApplicable, &[Head], &[Medium]),
    ("roll", "Roll", Defensive, NotApplicable, &[Head], &[Medium, Close]),
    ("lean_back", "Lean Back", Defensive, NotApplicable, &[Head], &[Long]),
    ("catch_kick", "Catch Kick", Defensive, Both, &[Body], &[Long]),
    // Sweeps
    ("kick_catch_sweep", "Kick Catch Sweep", Sweeps, Rear, &[Legs], &[Long]),
    ("clinch_sweep", "Clinch Sweep", Sweeps, Both, &[Legs], &[ClinchRange]),
    ("foot_sweep", "Foot Sweep", Sweeps, Lead, &[Legs], &[Close, ClinchRange]),
    ("dump", "Dump", Sweeps, Both, &[Body], &[ClinchRange]),
    // Feints
    ("jab_feint", "Jab Feint", Feints, Lead, &[Head], &[Medium]),
    ("teep_feint", "Teep Feint", Feints, Lead, &[Body], &[Long]),
    ("kick_feint", "Kick Feint", Feints, Rear, &[Body], &[Long]),
    ("shoulder_feint", "Shoulder Feint", Feints, NotApplicable, &[], &[Medium]),
];

/// Materialize the builtin table
pub(super) fn techniques() -> Vec<Technique> {
    ROWS.iter()
        .map(|&(id, name, category, side, targets, ranges)| {
            Technique::new(id, name, category, side, targets, ranges)
        })
        .collect()
}
