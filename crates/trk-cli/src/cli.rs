//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Nested task time tracker.
///
/// Records a day as an append-only log of timestamped events and derives
/// the currently active task from it, with nested sub-tasks and
/// pause/resume.
#[derive(Debug, Parser)]
#[command(name = "trk", version, about, long_about = None)]
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
    /// Start a new task, nested under the active one.
    Start {
        /// Record the new task as pausing the active one rather than
        /// refining it.
        #[arg(short, long)]
        pause: bool,

        /// Start time: "now", -N for N minutes ago, or HH:MM local.
        #[arg(long, default_value = "now", allow_hyphen_values = true)]
        at: String,

        /// Task name (words are joined with spaces).
        #[arg(required = true)]
        name: Vec<String>,
    },

    /// End the active task and start a sibling at the same level.
    Next {
        /// Start time: "now", -N for N minutes ago, or HH:MM local.
        #[arg(long, default_value = "now", allow_hyphen_values = true)]
        at: String,

        /// Task name (words are joined with spaces).
        #[arg(required = true)]
        name: Vec<String>,
    },

    /// Stop the active task, returning to its parent if any.
    Stop {
        /// Stop time: "now", -N for N minutes ago, or HH:MM local.
        #[arg(long, default_value = "now", allow_hyphen_values = true)]
        at: String,
    },

    /// Print a day's events as an indented text block.
    Print {
        /// Day to print: YYYY-MM-DD, YYYYMMDD, MM-DD or MMDD (current
        /// year). Defaults to today.
        date: Option<String>,
    },

    /// Edit a day's events in your editor, then replace the stored day.
    Edit {
        /// Day to edit, same formats as print. Defaults to today.
        date: Option<String>,
    },
}
