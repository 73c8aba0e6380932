//! The owning component for a round in progress.
//!
//! [`Scorecard`] holds the [`RoundState`] together with its state file and
//! history log. Every mutation that changes durable state is written to disk
//! straight away and then announced to the [`RefreshListener`].

use chrono::{Local, NaiveDateTime};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::history::HistoryLog;
use crate::model::RoundState;
use crate::storage::{LoadOutcome, StateStore};

/// Receives a redraw request after each durable change.
pub trait RefreshListener {
    /// The visible scorecard is out of date.
    fn request_refresh(&mut self);
}

/// Listener that ignores refresh requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRefresh;

impl RefreshListener for NoRefresh {
    fn request_refresh(&mut self) {}
}

/// What to do with the course slot picked from the course menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseAction {
    /// Start a new round on the slot's layout.
    Load,
    /// Store the current layout in the slot.
    Save,
    /// Empty the slot.
    Delete,
}

/// Result of [`Scorecard::course_item_selected`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CourseOutcome {
    /// A new round was started on the preset.
    Loaded {
        /// Slot index.
        slot: usize,
        /// Preset name.
        name: String,
    },
    /// The current layout was stored.
    Saved {
        /// Slot index.
        slot: usize,
        /// Name given to the preset.
        name: String,
    },
    /// The preset was removed.
    Deleted {
        /// Slot index.
        slot: usize,
    },
    /// Load was requested on an empty slot; nothing changed.
    EmptySlot {
        /// Slot index.
        slot: usize,
    },
    /// Delete was requested on an empty slot; nothing changed.
    NothingToRemove {
        /// Slot index.
        slot: usize,
    },
    /// The slot index does not exist; nothing changed.
    InvalidSlot {
        /// Slot index.
        slot: usize,
    },
}

impl CourseOutcome {
    /// Check if the round state was modified.
    #[must_use]
    pub fn changed_state(&self) -> bool {
        matches!(
            self,
            Self::Loaded { .. } | Self::Saved { .. } | Self::Deleted { .. }
        )
    }

    /// Text for the confirmation dialog.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Loaded { name, .. } => format!("Loaded {name}. Scores cleared."),
            Self::Saved { slot, name } => format!("Saved {name} to slot {}.", slot + 1),
            Self::Deleted { slot } => format!("Slot {} cleared.", slot + 1),
            Self::EmptySlot { slot } => format!("Slot {} is empty.", slot + 1),
            Self::NothingToRemove { slot } => format!("Slot {} has nothing to remove.", slot + 1),
            Self::InvalidSlot { slot } => format!("Slot {} does not exist.", slot + 1),
        }
    }
}

/// Relative-to-par as shown on the scorecard: `E`, `+N`, `-N`, or `--`
/// before anything is played.
#[must_use]
pub fn display_relative(relative: Option<i32>) -> String {
    match relative {
        None => "--".to_string(),
        Some(0) => "E".to_string(),
        Some(value) if value > 0 => format!("+{value}"),
        Some(value) => value.to_string(),
    }
}

/// A round in progress, backed by its state file and history log.
#[derive(Debug)]
pub struct Scorecard<L: RefreshListener = NoRefresh> {
    state: RoundState,
    store: StateStore,
    history: HistoryLog,
    listener: L,
    load_outcome: LoadOutcome,
    round_saved: bool,
    unsaved: bool,
}

impl Scorecard<NoRefresh> {
    /// Open the scorecard at the locations named by `config`.
    #[must_use]
    pub fn open(config: &Config) -> Self {
        Self::new(
            StateStore::new(config.state_path()),
            HistoryLog::new(config.history_path()),
            NoRefresh,
        )
    }
}

impl<L: RefreshListener> Scorecard<L> {
    /// Load the round from `store` and attach `listener`.
    ///
    /// Loading never fails; see [`StateStore::load`].
    pub fn new(store: StateStore, history: HistoryLog, listener: L) -> Self {
        let report = store.load();
        Self {
            state: report.state,
            store,
            history,
            listener,
            load_outcome: report.outcome,
            round_saved: false,
            unsaved: !report.persisted,
        }
    }

    /// The round state.
    #[must_use]
    pub fn state(&self) -> &RoundState {
        &self.state
    }

    /// How the state was obtained when the scorecard was opened.
    #[must_use]
    pub fn load_outcome(&self) -> &LoadOutcome {
        &self.load_outcome
    }

    /// The refresh listener.
    #[must_use]
    pub fn listener(&self) -> &L {
        &self.listener
    }

    /// The state file.
    #[must_use]
    pub fn store(&self) -> &StateStore {
        &self.store
    }

    /// The history log.
    #[must_use]
    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    /// Check if the last write of the round state failed.
    ///
    /// The in-memory state is still current; the file on disk is stale.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    /// Check if the current round has already been exported to history.
    #[must_use]
    pub fn is_round_saved(&self) -> bool {
        self.round_saved
    }

    /// Check if every active player has a score on every hole.
    #[must_use]
    pub fn is_round_complete(&self) -> bool {
        self.state.is_round_complete()
    }

    /// Display name of a player, tagged `(off)` when not in the round.
    #[must_use]
    pub fn player_label(&self, player: usize) -> Option<String> {
        let name = self.state.player_name(player)?;
        if player < usize::from(self.state.player_count()) {
            Some(name.to_string())
        } else {
            Some(format!("{name} (off)"))
        }
    }

    /// Relative-to-par for the scorecard, see [`display_relative`].
    #[must_use]
    pub fn relative_label(&self, player: usize) -> String {
        let played = self.state.played_hole_count(player) > 0;
        display_relative(played.then(|| self.state.relative_to_par(player)))
    }

    /// Adjust strokes on a hole. Returns `false` if the player or hole is
    /// not in the round.
    pub fn adjust_score(&mut self, player: usize, hole: usize, delta: i32) -> bool {
        let before = self.state.score(player, hole);
        if !self.state.adjust_score(player, hole, delta) {
            return false;
        }
        if self.state.score(player, hole) != before {
            self.round_saved = false;
        }
        self.commit();
        true
    }

    /// Erase the strokes on a hole. Returns `false` if nothing was recorded.
    pub fn clear_hole(&mut self, player: usize, hole: usize) -> bool {
        let current = self.state.score(player, hole);
        if current == 0 {
            return false;
        }
        self.adjust_score(player, hole, -i32::from(current))
    }

    /// Zero every stroke.
    pub fn reset_scores(&mut self) {
        self.state.reset_scores();
        self.round_saved = false;
        self.commit();
    }

    /// Set the number of active players.
    pub fn set_player_count(&mut self, count: u8) -> bool {
        let changed = self.state.set_player_count(count);
        self.commit_round_change(changed)
    }

    /// Advance the player count, wrapping from 4 to 1.
    pub fn cycle_player_count(&mut self) -> bool {
        let changed = self.state.cycle_player_count();
        self.commit_round_change(changed)
    }

    /// Set the number of holes.
    pub fn set_hole_count(&mut self, count: u8) -> bool {
        let changed = self.state.set_hole_count(count);
        self.commit_round_change(changed)
    }

    /// Switch between 9 and 18 holes.
    pub fn toggle_hole_count(&mut self) -> bool {
        let changed = self.state.toggle_hole_count();
        self.commit_round_change(changed)
    }

    /// Rename a player; blank text restores the default name.
    pub fn set_player_name(&mut self, index: usize, name: Option<&str>) -> bool {
        let changed = self.state.set_player_name(index, name);
        if changed {
            self.commit();
        }
        changed
    }

    /// Set the par of a hole.
    pub fn set_par(&mut self, hole: usize, value: u8) -> bool {
        let changed = self.state.set_par(hole, value);
        if changed {
            self.commit();
        }
        changed
    }

    /// Store the current layout in `slot` and make it the active course.
    ///
    /// # Errors
    ///
    /// Returns an error if `slot` is not a preset slot.
    pub fn save_course_preset(&mut self, slot: usize, name: Option<&str>) -> Result<()> {
        self.state.save_course_preset(slot, name)?;
        self.commit();
        Ok(())
    }

    /// Empty `slot`. Returns `false` if it was already empty.
    ///
    /// # Errors
    ///
    /// Returns an error if `slot` is not a preset slot.
    pub fn delete_course_preset(&mut self, slot: usize) -> Result<bool> {
        let deleted = self.state.delete_course_preset(slot)?;
        if deleted {
            self.commit();
        }
        Ok(deleted)
    }

    /// Start a new round on the preset in `slot`. Returns `false` if the
    /// slot is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if `slot` is not a preset slot.
    pub fn apply_course_preset(&mut self, slot: usize) -> Result<bool> {
        let applied = self.state.apply_course_preset(slot)?;
        if applied {
            self.round_saved = false;
            self.commit();
        }
        Ok(applied)
    }

    /// Carry out a course menu selection.
    pub fn course_item_selected(
        &mut self,
        action: CourseAction,
        slot: usize,
        name: Option<&str>,
    ) -> CourseOutcome {
        let outcome = match action {
            CourseAction::Load => match self.apply_course_preset(slot) {
                Ok(true) => CourseOutcome::Loaded {
                    slot,
                    name: self.preset_name(slot),
                },
                Ok(false) => CourseOutcome::EmptySlot { slot },
                Err(_) => CourseOutcome::InvalidSlot { slot },
            },
            CourseAction::Save => match self.save_course_preset(slot, name) {
                Ok(()) => CourseOutcome::Saved {
                    slot,
                    name: self.preset_name(slot),
                },
                Err(_) => CourseOutcome::InvalidSlot { slot },
            },
            CourseAction::Delete => match self.delete_course_preset(slot) {
                Ok(true) => CourseOutcome::Deleted { slot },
                Ok(false) => CourseOutcome::NothingToRemove { slot },
                Err(_) => CourseOutcome::InvalidSlot { slot },
            },
        };

        info!("Course {action:?} on slot {slot}: {}", outcome.message());
        outcome
    }

    /// Append the round to the history log, stamped with the local time.
    ///
    /// # Errors
    ///
    /// Returns an error if the log cannot be written.
    pub fn export_round_history(&mut self) -> Result<usize> {
        self.export_round_history_at(Local::now().naive_local())
    }

    /// Append the round to the history log with an explicit timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the log cannot be written.
    pub fn export_round_history_at(&mut self, recorded_at: NaiveDateTime) -> Result<usize> {
        let rows = self.history.export(&self.state, recorded_at)?;
        self.round_saved = true;
        Ok(rows)
    }

    /// Export the round if it is complete and not yet exported.
    ///
    /// Returns `true` if rows were written.
    ///
    /// # Errors
    ///
    /// Returns an error if the export was attempted and failed.
    pub fn finish_round(&mut self) -> Result<bool> {
        if !self.is_round_complete() || self.round_saved {
            return Ok(false);
        }
        self.export_round_history()?;
        Ok(true)
    }

    /// Delete the history log.
    ///
    /// # Errors
    ///
    /// Returns an error if the log can neither be deleted nor truncated.
    pub fn clear_round_history(&mut self) -> Result<()> {
        self.history.clear()
    }

    /// Contents of the history log, or `None` if it is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the log exists but cannot be read.
    pub fn read_round_history(&self) -> Result<Option<String>> {
        self.history.read()
    }

    /// Write the round state now.
    ///
    /// # Errors
    ///
    /// Returns an error if the state file cannot be written.
    pub fn save_state(&mut self) -> Result<()> {
        let result = self.store.save(&self.state);
        self.unsaved = result.is_err();
        result
    }

    fn preset_name(&self, slot: usize) -> String {
        self.state
            .course(slot)
            .map(|course| course.name().to_string())
            .unwrap_or_default()
    }

    fn commit_round_change(&mut self, changed: bool) -> bool {
        if changed {
            self.round_saved = false;
            self.commit();
        }
        changed
    }

    fn commit(&mut self) {
        if let Err(err) = self.save_state() {
            warn!("Round state kept in memory only: {err}");
        }
        self.listener.request_refresh();
    }
}
