//! CLI command definitions.
//!
//! Player, hole and slot numbers are 1-based here and converted to indices
//! with [`to_index`] before reaching the scorecard.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::scorecard::CourseAction;

/// Convert a 1-based number from the command line to an index.
#[must_use]
pub fn to_index(number: u8) -> usize {
    usize::from(number).saturating_sub(1)
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Score command arguments.
#[derive(Debug, Args)]
pub struct ScoreCommand {
    /// Player number
    #[arg(value_parser = clap::value_parser!(u8).range(1..))]
    pub player: u8,

    /// Hole number
    #[arg(value_parser = clap::value_parser!(u8).range(1..))]
    pub hole: u8,

    /// Strokes to add (negative to remove)
    #[arg(allow_negative_numbers = true)]
    pub delta: i32,
}

/// Clear-hole command arguments.
#[derive(Debug, Args)]
pub struct ClearHoleCommand {
    /// Player number
    #[arg(value_parser = clap::value_parser!(u8).range(1..))]
    pub player: u8,

    /// Hole number
    #[arg(value_parser = clap::value_parser!(u8).range(1..))]
    pub hole: u8,
}

/// Name command arguments.
#[derive(Debug, Args)]
pub struct NameCommand {
    /// Player number
    #[arg(value_parser = clap::value_parser!(u8).range(1..))]
    pub player: u8,

    /// New name; omit to restore the default
    pub text: Option<String>,
}

/// Par command arguments.
#[derive(Debug, Args)]
pub struct ParCommand {
    /// Hole number
    #[arg(value_parser = clap::value_parser!(u8).range(1..))]
    pub hole: u8,

    /// Par for the hole (2-7)
    pub value: u8,
}

/// Course preset commands.
#[derive(Debug, Subcommand)]
pub enum CourseCommand {
    /// List all preset slots
    List,

    /// Start a new round on a saved course
    Load {
        /// Slot number
        #[arg(value_parser = clap::value_parser!(u8).range(1..))]
        slot: u8,
    },

    /// Save the current holes and par as a course
    Save {
        /// Slot number
        #[arg(value_parser = clap::value_parser!(u8).range(1..))]
        slot: u8,

        /// Course name; omit for "Course N"
        name: Option<String>,
    },

    /// Remove a saved course
    Delete {
        /// Slot number
        #[arg(value_parser = clap::value_parser!(u8).range(1..))]
        slot: u8,
    },
}

impl CourseCommand {
    /// The menu action and slot index, or `None` for `list`.
    #[must_use]
    pub fn selection(&self) -> Option<(CourseAction, usize)> {
        match self {
            Self::List => None,
            Self::Load { slot } => Some((CourseAction::Load, to_index(*slot))),
            Self::Save { slot, .. } => Some((CourseAction::Save, to_index(*slot))),
            Self::Delete { slot } => Some((CourseAction::Delete, to_index(*slot))),
        }
    }
}

/// Round history commands.
#[derive(Debug, Subcommand)]
pub enum HistoryCommand {
    /// Append the current round to the history log
    Export,

    /// Delete the history log
    Clear,

    /// Print the history log
    Show,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}
