//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ll_core::DayKey;

/// Pickup and playtime reports from BetterGI logs.
///
/// Past days are parsed once and kept in a local database; today is
/// re-read from its log file on every run.
#[derive(Debug, Parser)]
#[command(name = "ll", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List dates with at least one pickup, most recent first.
    Dates {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Active duration per date.
    Durations {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Every recorded pickup.
    Items {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Total duration and pickup counts.
    Summary {
        /// Limit to one date (YYYYMMDD).
        #[arg(long)]
        date: Option<DayKey>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Pickups of one item per date.
    History {
        /// Item name, as written in the log.
        item: String,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Parse one log file without storing it, showing raw counts and anomalies.
    Inspect {
        /// Date of the log file (YYYYMMDD).
        date: DayKey,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show configured paths and what the database holds.
    Status,

    /// Drop a stored date so its log file is parsed again.
    Forget {
        /// Date to drop (YYYYMMDD).
        date: DayKey,
    },
}
