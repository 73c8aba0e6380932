//! Command-line interface for golfscore.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    to_index, ClearHoleCommand, ConfigCommand, CourseCommand, HistoryCommand, NameCommand,
    ParCommand, ScoreCommand, ShowCommand,
};

/// golfscore - Keep score for a round of golf
///
/// Tracks strokes for up to four players over up to eighteen holes. Every
/// change is saved immediately; finished rounds go to a history log.
#[derive(Debug, Parser)]
#[command(name = "golfscore")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the scorecard
    Show(ShowCommand),

    /// Add or remove strokes on a hole
    Score(ScoreCommand),

    /// Erase a player's strokes on a hole
    ClearHole(ClearHoleCommand),

    /// Clear every player's strokes
    Reset,

    /// Set the number of players, or cycle 1-4 when omitted
    Players {
        /// Number of players
        count: Option<u8>,
    },

    /// Set the number of holes, or switch between 9 and 18 when omitted
    Holes {
        /// Number of holes
        count: Option<u8>,
    },

    /// Rename a player
    Name(NameCommand),

    /// Set the par of a hole
    Par(ParCommand),

    /// Save the round to history if every hole is scored
    Finish,

    /// Manage saved courses
    #[command(subcommand)]
    Course(CourseCommand),

    /// Manage the round history log
    #[command(subcommand)]
    History(HistoryCommand),

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.quiet, self.verbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "golfscore");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity() {
        let cli = Cli::try_parse_from(["golfscore", "-vv", "reset"]).unwrap();
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Trace);

        let cli = Cli::try_parse_from(["golfscore", "-q", "reset"]).unwrap();
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Quiet);
    }

    #[test]
    fn test_parse_show_json() {
        let cli = Cli::try_parse_from(["golfscore", "show", "--json"]).unwrap();
        assert!(matches!(cli.command, Command::Show(ShowCommand { json: true })));
    }

    #[test]
    fn test_parse_score_negative_delta() {
        let cli = Cli::try_parse_from(["golfscore", "score", "2", "7", "-3"]).unwrap();
        match cli.command {
            Command::Score(cmd) => {
                assert_eq!(cmd.player, 2);
                assert_eq!(cmd.hole, 7);
                assert_eq!(cmd.delta, -3);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_zero_player() {
        assert!(Cli::try_parse_from(["golfscore", "score", "0", "1", "1"]).is_err());
    }

    #[test]
    fn test_parse_players_without_count() {
        let cli = Cli::try_parse_from(["golfscore", "players"]).unwrap();
        assert!(matches!(cli.command, Command::Players { count: None }));
    }

    #[test]
    fn test_parse_course_save() {
        let cli = Cli::try_parse_from(["golfscore", "course", "save", "3", "Pine Hills"]).unwrap();
        match cli.command {
            Command::Course(CourseCommand::Save { slot, name }) => {
                assert_eq!(slot, 3);
                assert_eq!(name.as_deref(), Some("Pine Hills"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_history_export() {
        let cli = Cli::try_parse_from(["golfscore", "history", "export"]).unwrap();
        assert!(matches!(cli.command, Command::History(HistoryCommand::Export)));
    }

    #[test]
    fn test_parse_with_config() {
        let cli = Cli::try_parse_from(["golfscore", "-c", "/custom/config.toml", "show"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }
}
