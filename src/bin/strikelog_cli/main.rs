// ABOUTME: Strikelog CLI - command-line tool for XP previews, workout finalization and progress
// ABOUTME: Browses the technique catalog, explains levels and reads history from the database
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Browse the technique catalog
//! strikelog-cli catalog list --category kicks
//! strikelog-cli catalog show "Flying Knee"
//!
//! # Where does 5000 XP land on the curve?
//! strikelog-cli level 5000
//!
//! # XP a workout file would earn, without touching the database
//! strikelog-cli preview workout.json
//!
//! # Create a user's progress rows, then commit a workout
//! strikelog-cli user init 0b9f4e52-5c4e-4f3a-9d65-0d7c1f5d8a11
//! strikelog-cli workout finalize 0b9f4e52-5c4e-4f3a-9d65-0d7c1f5d8a11 workout.json
//!
//! # Inspect progress and history
//! strikelog-cli progress 0b9f4e52-5c4e-4f3a-9d65-0d7c1f5d8a11
//! strikelog-cli history 0b9f4e52-5c4e-4f3a-9d65-0d7c1f5d8a11 --category knees --limit 20
//! ```

mod commands;
mod helpers;

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use strikelog::config::{AppConfig, DatabaseUrl};
use strikelog::logging::LoggingConfig;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Parser)]
#[command(
    name = "strikelog-cli",
    version,
    about = "Strikelog XP and leveling CLI",
    long_about = "Preview and commit martial arts workouts, and inspect category XP, levels and history."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Database URL override
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Technique catalog commands
    Catalog {
        #[command(subcommand)]
        action: CatalogCommand,
    },

    /// Show the level, thresholds and progress for an XP total
    Level {
        /// Cumulative XP
        xp: u64,
    },

    /// Preview the XP a workout file would earn, offline
    Preview {
        /// Workout JSON file with `notes` and `combos`
        file: PathBuf,
    },

    /// User management commands
    User {
        #[command(subcommand)]
        action: UserCommand,
    },

    /// Workout commands
    Workout {
        #[command(subcommand)]
        action: WorkoutCommand,
    },

    /// Show XP and level for every category
    Progress {
        /// User ID
        user_id: Uuid,
    },

    /// Show XP history, newest first
    History {
        /// User ID
        user_id: Uuid,

        /// Only show one category
        #[arg(long)]
        category: Option<String>,

        /// Maximum number of entries
        #[arg(long, default_value = "50")]
        limit: u32,
    },
}

#[non_exhaustive]
#[derive(Subcommand)]
enum CatalogCommand {
    /// List techniques
    List {
        /// Only list one category
        #[arg(long)]
        category: Option<String>,
    },

    /// Show one technique and the XP it earns
    Show {
        /// Technique name (case-insensitive)
        name: String,
    },
}

#[non_exhaustive]
#[derive(Subcommand)]
enum UserCommand {
    /// Create the user's category progress rows
    Init {
        /// User ID
        user_id: Uuid,
    },
}

#[non_exhaustive]
#[derive(Subcommand)]
enum WorkoutCommand {
    /// Commit a workout file: credit XP, update levels and append history
    Finalize {
        /// User ID
        user_id: Uuid,

        /// Workout JSON file with `notes` and `combos`
        file: PathBuf,
    },

    /// List recent workouts
    List {
        /// User ID
        user_id: Uuid,

        /// Maximum number of workouts
        #[arg(long, default_value = "20")]
        limit: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    LoggingConfig::for_cli(cli.verbose).init()?;

    let mut config = AppConfig::from_env()?;
    if let Some(url) = cli.database_url {
        config.database_url = DatabaseUrl::parse_url(&url)?;
    }
    debug!("{}", config.summary());
    info!("Strikelog CLI");

    match cli.command {
        Command::Catalog { action } => match action {
            CatalogCommand::List { category } => {
                commands::catalog::list(&config, category.as_deref())?;
            }
            CatalogCommand::Show { name } => commands::catalog::show(&config, &name)?,
        },
        Command::Level { xp } => commands::level::show(xp),
        Command::Preview { file } => commands::workout::preview(&config, &file).await?,
        Command::User { action } => match action {
            UserCommand::Init { user_id } => commands::user::init(&config, user_id).await?,
        },
        Command::Workout { action } => match action {
            WorkoutCommand::Finalize { user_id, file } => {
                commands::workout::finalize(&config, user_id, &file).await?;
            }
            WorkoutCommand::List { user_id, limit } => {
                commands::workout::list(&config, user_id, limit).await?;
            }
        },
        Command::Progress { user_id } => commands::user::progress(&config, user_id).await?,
        Command::History {
            user_id,
            category,
            limit,
        } => commands::user::history(&config, user_id, category.as_deref(), limit).await?,
    }

    Ok(())
}
