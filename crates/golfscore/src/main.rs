//! `golfscore` - CLI for the golf scorecard
//!
//! Each invocation opens the saved round, applies one command and exits.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use clap::Parser;

use golfscore::cli::{
    to_index, Cli, Command, ConfigCommand, CourseCommand, HistoryCommand, NameCommand, ParCommand,
    ScoreCommand,
};
use golfscore::scorecard::display_relative;
use golfscore::storage::{LoadOutcome, ResetReason};
use golfscore::{init_logging, Config, Error, Scorecard};

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() -> CliResult {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone())?;

    match cli.command {
        Command::Config(config_cmd) => Ok(handle_config(&config, config_cmd)?),
        command => handle_round(&config, command),
    }
}

fn handle_round(config: &Config, command: Command) -> CliResult {
    let mut scorecard = Scorecard::open(config);
    report_load(scorecard.load_outcome());

    match command {
        Command::Show(cmd) => handle_show(&scorecard, cmd.json)?,
        Command::Score(cmd) => handle_score(&mut scorecard, &cmd),
        Command::ClearHole(cmd) => {
            if !scorecard.clear_hole(to_index(cmd.player), to_index(cmd.hole)) {
                dialog("Score", "Nothing to clear on that hole.");
            }
        }
        Command::Reset => {
            scorecard.reset_scores();
            dialog("Scores Reset", "All player strokes cleared.");
        }
        Command::Players { count } => {
            match count {
                Some(count) => scorecard.set_player_count(count),
                None => scorecard.cycle_player_count(),
            };
            println!("Players: {}", scorecard.state().player_count());
        }
        Command::Holes { count } => {
            match count {
                Some(count) => scorecard.set_hole_count(count),
                None => scorecard.toggle_hole_count(),
            };
            println!("Holes: {}", scorecard.state().hole_count());
        }
        Command::Name(cmd) => handle_name(&mut scorecard, &cmd),
        Command::Par(cmd) => handle_par(&mut scorecard, &cmd),
        Command::Finish => handle_finish(&mut scorecard),
        Command::Course(cmd) => handle_course(&mut scorecard, &cmd),
        Command::History(cmd) => handle_history(&mut scorecard, &cmd),
        Command::Config(_) => {}
    }

    if scorecard.has_unsaved_changes() {
        dialog("Storage", "Unable to save scorecard.");
    }
    Ok(())
}

fn dialog(title: &str, message: &str) {
    eprintln!("{title}: {message}");
}

fn report_failure(title: &str, action: &str, err: &Error) {
    tracing::error!("{err}");
    dialog(title, &err.dialog_message(action));
}

fn report_load(outcome: &LoadOutcome) {
    match outcome {
        LoadOutcome::Reinitialized {
            reason: ResetReason::Missing,
        }
        | LoadOutcome::Current => {}
        LoadOutcome::Migrated { from_version } => {
            dialog(
                "Scorecard",
                &format!("Saved round upgraded from version {from_version}."),
            );
        }
        LoadOutcome::Reinitialized { reason } => {
            dialog("Scorecard", &format!("Saved round was reset ({reason})."));
        }
    }
}

fn handle_show(scorecard: &Scorecard, json: bool) -> golfscore::Result<()> {
    let state = scorecard.state();
    let players = usize::from(state.player_count());
    let holes = usize::from(state.hole_count());

    if json {
        let totals: Vec<_> = (0..players)
            .map(|p| {
                serde_json::json!({
                    "player": state.player_name(p),
                    "total": state.total_score(p),
                    "relative": scorecard.relative_label(p),
                    "played": state.played_hole_count(p),
                })
            })
            .collect();
        let view = serde_json::json!({
            "state": state,
            "course_par": state.course_par(),
            "round_complete": scorecard.is_round_complete(),
            "totals": totals,
        });
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    let course = state.active_course_name().unwrap_or("Custom");
    println!("{course} - {holes} holes, par {}", state.course_par());
    println!();

    let mut line = format!("{:<16}", "Hole");
    for hole in 0..holes {
        line.push_str(&format!("{:>3}", hole + 1));
    }
    println!("{line}  Tot  Rel");

    let mut line = format!("{:<16}", "Par");
    for hole in 0..holes {
        line.push_str(&format!("{:>3}", state.par(hole)));
    }
    println!("{line}");

    for player in 0..players {
        let mut line = format!("{:<16}", scorecard.player_label(player).unwrap_or_default());
        for hole in 0..holes {
            match state.score(player, hole) {
                0 => line.push_str("  ."),
                strokes => line.push_str(&format!("{strokes:>3}")),
            }
        }
        println!(
            "{line}  {:>3}  {:>3}",
            state.total_score(player),
            scorecard.relative_label(player)
        );
    }

    if scorecard.is_round_complete() {
        println!();
        println!("Round complete. Run `golfscore finish` to save it to history.");
    }
    Ok(())
}

fn handle_score(scorecard: &mut Scorecard, cmd: &ScoreCommand) {
    let (player, hole) = (to_index(cmd.player), to_index(cmd.hole));
    if scorecard.adjust_score(player, hole, cmd.delta) {
        let state = scorecard.state();
        let relative = (state.played_hole_count(player) > 0).then(|| state.relative_to_par(player));
        println!(
            "{} hole {}: {} (total {}, {})",
            state.player_name(player).unwrap_or_default(),
            cmd.hole,
            state.score(player, hole),
            state.total_score(player),
            display_relative(relative)
        );
    } else {
        dialog("Score", "That player or hole is not in this round.");
    }
}

fn handle_name(scorecard: &mut Scorecard, cmd: &NameCommand) {
    let index = to_index(cmd.player);
    if scorecard.set_player_name(index, cmd.text.as_deref()) {
        println!(
            "Player {}: {}",
            cmd.player,
            scorecard.state().player_name(index).unwrap_or_default()
        );
    } else {
        dialog("Name", "No such player.");
    }
}

fn handle_par(scorecard: &mut Scorecard, cmd: &ParCommand) {
    let hole = to_index(cmd.hole);
    scorecard.set_par(hole, cmd.value);
    match scorecard.state().par_values().get(hole) {
        Some(par) => println!("Hole {} par: {par}", cmd.hole),
        None => dialog("Par", "No such hole."),
    }
}

fn handle_finish(scorecard: &mut Scorecard) {
    if scorecard.is_round_complete() {
        match scorecard.finish_round() {
            Ok(true) => dialog("Round", "Round saved to history."),
            Ok(false) => dialog("Round", "Round already saved."),
            Err(err) => report_failure("Round", "save round", &err),
        }
    } else {
        dialog("Round", "Round is not complete yet.");
    }
}

fn handle_course(scorecard: &mut Scorecard, cmd: &CourseCommand) {
    let Some((action, slot)) = cmd.selection() else {
        for (slot, course) in scorecard.state().courses().iter().enumerate() {
            let marker = if scorecard.state().active_course() == Some(slot) {
                "*"
            } else {
                " "
            };
            println!("{marker} {}", course.label(slot));
        }
        return;
    };

    let name = match cmd {
        CourseCommand::Save { name, .. } => name.as_deref(),
        _ => None,
    };
    let outcome = scorecard.course_item_selected(action, slot, name);
    dialog("Course", &outcome.message());
}

fn handle_history(scorecard: &mut Scorecard, cmd: &HistoryCommand) {
    match cmd {
        HistoryCommand::Export => match scorecard.export_round_history() {
            Ok(rows) => dialog("History", &format!("Exported {rows} player rows.")),
            Err(err) => report_failure("History", "export round", &err),
        },
        HistoryCommand::Clear => match scorecard.clear_round_history() {
            Ok(()) => dialog("History", "Round history cleared."),
            Err(err) => report_failure("History", "clear history", &err),
        },
        HistoryCommand::Show => match scorecard.read_round_history() {
            Ok(Some(contents)) => print!("{}", contents.replace("\r\n", "\n")),
            Ok(None) => dialog("History", "No rounds saved yet."),
            Err(err) => report_failure("History", "read history", &err),
        },
    }
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> golfscore::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Data directory: {}", config.data_dir().display());
                println!("  State file:     {}", config.state_path().display());
                println!("  History file:   {}", config.history_path().display());
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
