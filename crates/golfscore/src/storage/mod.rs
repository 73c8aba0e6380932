//! Persistence for the round state.
//!
//! The state lives in a single fixed-size binary file that is rewritten in
//! full on every save. Loading never fails: unreadable or unrecognised files
//! are replaced with defaults, and whatever was loaded is written straight
//! back so the file on disk is always in the current layout.

pub mod format;
pub mod migrations;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::model::RoundState;

/// How the state returned by [`StateStore::load`] was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The file used the current layout.
    Current,
    /// The file used an older layout and was upgraded.
    Migrated {
        /// Version tag found on disk.
        from_version: u8,
    },
    /// The file was missing or unusable; defaults were used.
    Reinitialized {
        /// Why the file could not be used.
        reason: ResetReason,
    },
}

/// Why persisted state was discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetReason {
    /// No state file exists yet.
    Missing,
    /// The file exists but could not be read.
    Unreadable(String),
    /// The file matched no known layout.
    Unrecognized(String),
}

impl std::fmt::Display for ResetReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => write!(f, "no saved state"),
            Self::Unreadable(msg) => write!(f, "unreadable: {msg}"),
            Self::Unrecognized(msg) => write!(f, "unrecognized format: {msg}"),
        }
    }
}

/// Result of loading the round state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    /// The validated state.
    pub state: RoundState,
    /// Where the state came from.
    pub outcome: LoadOutcome,
    /// Whether out-of-range values had to be corrected.
    pub corrected: bool,
    /// Whether the state was written back successfully.
    pub persisted: bool,
}

/// File-backed store for the round state.
#[derive(Debug, Clone)]
pub struct StateStore {
    /// Path to the state file.
    path: PathBuf,
}

impl StateStore {
    /// Create a store for the state file at `path`.
    ///
    /// Nothing is touched on disk until the first load or save.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Get the path to the state file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load, upgrade and validate the round state, then write it back.
    ///
    /// Never fails. A missing, unreadable or unrecognised file yields the
    /// default state.
    pub fn load(&self) -> LoadReport {
        let (mut state, outcome) = match self.read_blob() {
            Ok(Some(bytes)) => match migrations::decode_any(&bytes) {
                Ok(decoded) if decoded.was_migrated() => (
                    decoded.state,
                    LoadOutcome::Migrated {
                        from_version: decoded.from_version,
                    },
                ),
                Ok(decoded) => (decoded.state, LoadOutcome::Current),
                Err(rejected) => {
                    warn!(
                        "Discarding round state at {}: {}",
                        self.path.display(),
                        rejected
                    );
                    (
                        RoundState::default(),
                        LoadOutcome::Reinitialized {
                            reason: ResetReason::Unrecognized(rejected.to_string()),
                        },
                    )
                }
            },
            Ok(None) => (
                RoundState::default(),
                LoadOutcome::Reinitialized {
                    reason: ResetReason::Missing,
                },
            ),
            Err(err) => {
                warn!("{err}");
                (
                    RoundState::default(),
                    LoadOutcome::Reinitialized {
                        reason: ResetReason::Unreadable(err.to_string()),
                    },
                )
            }
        };

        let corrected = state.enforce_invariants();
        let persisted = match self.save(&state) {
            Ok(()) => true,
            Err(err) => {
                warn!("Could not write back round state: {err}");
                false
            }
        };

        info!("Round state loaded from {} ({outcome:?})", self.path.display());
        LoadReport {
            state,
            outcome,
            corrected,
            persisted,
        }
    }

    /// Write the whole state in the current layout.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or the
    /// file cannot be written. The previous file may then be stale.
    pub fn save(&self, state: &RoundState) -> Result<()> {
        self.write_blob(&format::encode(state))?;
        debug!("Saved round state to {}", self.path.display());
        Ok(())
    }

    /// Read the raw state file. Returns `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn read_blob(&self) -> Result<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(Error::StateRead {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Replace the state file with `bytes`.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or the
    /// file cannot be written.
    pub fn write_blob(&self, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        fs::write(&self.path, bytes).map_err(|source| Error::StateWrite {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FixedName, DEFAULT_PAR};
    use super::format::{LegacyRecord, CURRENT_LEN, CURRENT_VERSION};
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, StateStore) {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let store = StateStore::new(dir.path().join("data").join("state.bin"));
        (dir, store)
    }

    #[test]
    fn test_load_missing_file_uses_defaults_and_writes_back() {
        let (_dir, store) = create_test_store();
        let report = store.load();

        assert_eq!(report.state, RoundState::default());
        assert_eq!(
            report.outcome,
            LoadOutcome::Reinitialized {
                reason: ResetReason::Missing
            }
        );
        assert!(report.persisted);
        let bytes = store.read_blob().unwrap().unwrap();
        assert_eq!(bytes.len(), CURRENT_LEN);
        assert_eq!(bytes[0], CURRENT_VERSION);
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let (_dir, store) = create_test_store();
        let mut state = RoundState::default();
        state.set_player_count(2);
        state.set_player_name(1, Some("Bo"));
        state.adjust_score(1, 3, 6);
        state.save_course_preset(0, Some("Home")).unwrap();
        store.save(&state).unwrap();

        let report = store.load();
        assert_eq!(report.outcome, LoadOutcome::Current);
        assert!(!report.corrected);
        assert_eq!(report.state, state);
    }

    #[test]
    fn test_names_with_nul_survive_save_and_load() {
        let (_dir, store) = create_test_store();
        let mut state = RoundState::default();
        state.set_player_name(0, Some("Al\0Bo"));
        state.set_player_name(1, Some("\0"));
        state.save_course_preset(0, Some("\0")).unwrap();
        store.save(&state).unwrap();

        let report = store.load();
        assert!(!report.corrected);
        assert_eq!(report.state, state);
        assert_eq!(report.state.player_name(0), Some("Al"));
        assert_eq!(report.state.player_name(1), Some("Player 2"));
        assert_eq!(report.state.active_course_name(), Some("Course 1"));
    }

    #[test]
    fn test_load_legacy_file_migrates() {
        let (_dir, store) = create_test_store();
        let mut strokes = [[0u8; 18]; 4];
        strokes[0][1] = 4;
        let record = LegacyRecord {
            player_count: 1,
            hole_count: 9,
            player_names: std::array::from_fn(FixedName::player_default),
            strokes,
            par: [DEFAULT_PAR; 18],
        };
        store.write_blob(&format::encode_legacy(&record)).unwrap();

        let report = store.load();
        assert_eq!(report.outcome, LoadOutcome::Migrated { from_version: 1 });
        assert_eq!(report.state.score(0, 1), 4);
        assert_eq!(report.state.active_course(), None);

        // The file was rewritten in the current layout.
        let bytes = store.read_blob().unwrap().unwrap();
        assert_eq!(bytes.len(), CURRENT_LEN);
        assert_eq!(store.load().outcome, LoadOutcome::Current);
    }

    #[test]
    fn test_load_garbage_reinitializes() {
        let (_dir, store) = create_test_store();
        store.write_blob(b"not a scorecard").unwrap();

        let report = store.load();
        assert!(matches!(
            report.outcome,
            LoadOutcome::Reinitialized {
                reason: ResetReason::Unrecognized(_)
            }
        ));
        assert_eq!(report.state, RoundState::default());
        assert_eq!(store.load().outcome, LoadOutcome::Current);
    }

    #[test]
    fn test_load_wrong_version_tag_reinitializes() {
        let (_dir, store) = create_test_store();
        let mut state = RoundState::default();
        state.adjust_score(0, 0, 3);
        let mut bytes = format::encode(&state);
        bytes[0] = 42;
        store.write_blob(&bytes).unwrap();

        let report = store.load();
        assert!(matches!(report.outcome, LoadOutcome::Reinitialized { .. }));
        assert_eq!(report.state.score(0, 0), 0);
    }

    #[test]
    fn test_load_corrects_invalid_values() {
        let (_dir, store) = create_test_store();
        let mut bytes = format::encode(&RoundState::default());
        bytes[1] = 0;
        bytes[2] = 99;
        let par_offset = format::LEGACY_LEN - 18;
        bytes[par_offset] = 0;
        bytes[par_offset + 1] = 9;
        store.write_blob(&bytes).unwrap();

        let report = store.load();
        assert_eq!(report.outcome, LoadOutcome::Current);
        assert!(report.corrected);
        assert_eq!(report.state.player_count(), 1);
        assert_eq!(report.state.hole_count(), 9);
        assert_eq!(report.state.par(0), DEFAULT_PAR);
        assert_eq!(report.state.par(1), DEFAULT_PAR);
    }

    #[test]
    fn test_load_resets_dangling_active_course() {
        let (_dir, store) = create_test_store();
        let mut bytes = format::encode(&RoundState::default());
        bytes[CURRENT_LEN - 1] = 3;
        store.write_blob(&bytes).unwrap();

        let report = store.load();
        assert_eq!(report.state.active_course(), None);
    }

    #[test]
    fn test_load_unreadable_path() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be cannot be read as a file.
        let store = StateStore::new(dir.path());
        let report = store.load();
        assert!(matches!(
            report.outcome,
            LoadOutcome::Reinitialized {
                reason: ResetReason::Unreadable(_)
            }
        ));
        assert!(!report.persisted);
        assert_eq!(report.state, RoundState::default());
    }

    #[test]
    fn test_save_error_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path());
        let err = store.save(&RoundState::default()).unwrap_err();
        assert!(matches!(err, Error::StateWrite { .. }));
        assert!(err.is_storage_error());
    }

    #[test]
    fn test_path() {
        let store = StateStore::new("/tmp/golfscore/state.bin");
        assert_eq!(store.path(), Path::new("/tmp/golfscore/state.bin"));
    }

    proptest! {
        #[test]
        fn prop_valid_state_survives_save_and_load(
            players in 1u8..=4,
            holes in 1u8..=18,
            deltas in proptest::collection::vec((0usize..4, 0usize..18, -5i32..120), 0..30),
            pars in proptest::collection::vec(2u8..=7, 18),
            preset in proptest::option::of(0usize..5),
            names in proptest::collection::vec(proptest::option::of("[a-zA-Z0-9 é\\x00]{0,20}"), 4),
            course_name in proptest::option::of("[a-zA-Z0-9 é\\x00]{0,20}"),
        ) {
            let (_dir, store) = create_test_store();
            let mut state = RoundState::default();
            state.set_player_count(players);
            state.set_hole_count(holes);
            for (hole, &par) in pars.iter().enumerate() {
                state.set_par(hole, par);
            }
            for (player, hole, delta) in deltas {
                state.adjust_score(player, hole, delta);
            }
            for (index, name) in names.iter().enumerate() {
                state.set_player_name(index, name.as_deref());
            }
            if let Some(slot) = preset {
                state.save_course_preset(slot, course_name.as_deref()).unwrap();
            }

            store.save(&state).unwrap();
            let report = store.load();
            prop_assert_eq!(report.outcome, LoadOutcome::Current);
            prop_assert_eq!(report.state, state);
        }
    }
}
