//! Append-only log of finished rounds.
//!
//! Each export appends one comma-separated row per active player. The file
//! starts with a header row and uses CRLF line endings.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::model::{RoundState, MAX_HOLES};

/// Line terminator used by the log.
pub const LINE_ENDING: &str = "\r\n";

/// Course column value when no preset is active.
pub const CUSTOM_COURSE: &str = "Custom";

/// Characters that would break a row apart.
static FIELD_BREAKERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,\r\n]").expect("static pattern is valid"));

/// Header row, without the line terminator.
#[must_use]
pub fn header() -> String {
    let mut columns: Vec<String> = ["Date", "Time", "Course", "HoleCount", "Player", "Total", "Relative"]
        .iter()
        .map(ToString::to_string)
        .collect();
    columns.extend((1..=MAX_HOLES).map(|hole| format!("H{hole}")));
    columns.join(",")
}

/// Replace separators and line breaks with spaces.
#[must_use]
pub fn sanitize_field(text: &str) -> String {
    FIELD_BREAKERS.replace_all(text, " ").into_owned()
}

/// Relative-to-par as written to the log: `+N`, `N`, or `--` if unplayed.
#[must_use]
pub fn format_relative(relative: Option<i32>) -> String {
    match relative {
        None => "--".to_string(),
        Some(value) if value > 0 => format!("+{value}"),
        Some(value) => value.to_string(),
    }
}

/// One player's line in the history log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// When the round was exported.
    pub recorded_at: NaiveDateTime,
    /// Active course name, or [`CUSTOM_COURSE`].
    pub course: String,
    /// Holes in the round.
    pub hole_count: u8,
    /// Player name.
    pub player: String,
    /// Total strokes.
    pub total: u16,
    /// Strokes relative to par, `None` if no hole was played.
    pub relative: Option<i32>,
    /// Strokes per hole, `None` for unplayed holes or holes outside the round.
    pub holes: [Option<u8>; MAX_HOLES],
}

impl HistoryEntry {
    /// Build the entry for `player` from the current round.
    #[must_use]
    pub fn from_round(state: &RoundState, player: usize, recorded_at: NaiveDateTime) -> Self {
        let holes = std::array::from_fn(|hole| Some(state.score(player, hole)).filter(|&s| s > 0));
        let relative = (state.played_hole_count(player) > 0).then(|| state.relative_to_par(player));

        Self {
            recorded_at,
            course: state.active_course_name().unwrap_or(CUSTOM_COURSE).to_string(),
            hole_count: state.hole_count(),
            player: state.player_name(player).unwrap_or_default().to_string(),
            total: state.total_score(player),
            relative,
            holes,
        }
    }

    /// Render as a log row, without the line terminator.
    #[must_use]
    pub fn to_row(&self) -> String {
        let mut fields = vec![
            self.recorded_at.format("%Y-%m-%d").to_string(),
            self.recorded_at.format("%H:%M:%S").to_string(),
            sanitize_field(&self.course),
            self.hole_count.to_string(),
            sanitize_field(&self.player),
            self.total.to_string(),
            format_relative(self.relative),
        ];
        fields.extend(
            self.holes
                .iter()
                .map(|hole| hole.map(|s| s.to_string()).unwrap_or_default()),
        );
        fields.join(",")
    }
}

/// The history log file.
#[derive(Debug, Clone)]
pub struct HistoryLog {
    /// Path to the log file.
    path: PathBuf,
}

impl HistoryLog {
    /// Create a handle for the log at `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Get the path to the log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one row per active player, writing the header first if the
    /// log is empty.
    ///
    /// Returns the number of player rows written. Rows already appended stay
    /// in the log if a later write fails.
    ///
    /// # Errors
    ///
    /// Returns an error if the log cannot be opened or a write fails.
    pub fn export(&self, state: &RoundState, recorded_at: NaiveDateTime) -> Result<usize> {
        let mut file = self.open_append()?;
        let is_empty = file.metadata().map_err(|e| self.write_error(e))?.len() == 0;

        if is_empty {
            let line = format!("{}{LINE_ENDING}", header());
            file.write_all(line.as_bytes())
                .map_err(|e| self.write_error(e))?;
        }

        let mut written = 0;
        for player in 0..usize::from(state.player_count()) {
            let row = HistoryEntry::from_round(state, player, recorded_at).to_row();
            if let Err(err) = file.write_all(format!("{row}{LINE_ENDING}").as_bytes()) {
                warn!("History export stopped after {written} rows");
                return Err(self.write_error(err));
            }
            written += 1;
        }

        info!("Exported {written} rows to {}", self.path.display());
        Ok(written)
    }

    /// Remove the log. Falls back to truncating it if it cannot be deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the log can neither be deleted nor truncated.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!("Cleared round history at {}", self.path.display());
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => {
                debug!("Could not delete history ({err}), truncating instead");
                File::create(&self.path)
                    .map(|_| ())
                    .map_err(|source| Error::HistoryClear {
                        path: self.path.clone(),
                        source,
                    })
            }
        }
    }

    /// Full contents of the log, or `None` if it is missing or empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the log exists but cannot be read.
    pub fn read(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.is_empty() => Ok(None),
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(Error::HistoryRead {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn open_append(&self) -> Result<File> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.write_error(e))
    }

    fn write_error(&self, source: std::io::Error) -> Error {
        Error::HistoryWrite {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 5, 17)
            .unwrap()
            .and_hms_opt(14, 3, 9)
            .unwrap()
    }

    fn create_test_log() -> (TempDir, HistoryLog) {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let log = HistoryLog::new(dir.path().join("history.csv"));
        (dir, log)
    }

    fn two_player_round() -> RoundState {
        let mut state = RoundState::default();
        state.set_player_count(2);
        state.set_hole_count(3);
        state.set_par(2, 5);
        state.set_player_name(0, Some("Ana"));
        state.set_player_name(1, Some("Smith, Jo"));
        state.adjust_score(0, 0, 5);
        state.adjust_score(0, 2, 6);
        state
    }

    #[test]
    fn test_header() {
        let header = header();
        assert!(header.starts_with("Date,Time,Course,HoleCount,Player,Total,Relative,H1,"));
        assert!(header.ends_with(",H18"));
        assert_eq!(header.split(',').count(), 7 + MAX_HOLES);
    }

    #[test]
    fn test_sanitize_field() {
        assert_eq!(sanitize_field("Smith, Jo"), "Smith  Jo");
        assert_eq!(sanitize_field("a\r\nb"), "a  b");
        assert_eq!(sanitize_field("plain"), "plain");
    }

    #[test]
    fn test_format_relative() {
        assert_eq!(format_relative(None), "--");
        assert_eq!(format_relative(Some(3)), "+3");
        assert_eq!(format_relative(Some(0)), "0");
        assert_eq!(format_relative(Some(-2)), "-2");
    }

    #[test]
    fn test_entry_from_round() {
        let entry = HistoryEntry::from_round(&two_player_round(), 0, timestamp());
        assert_eq!(entry.course, CUSTOM_COURSE);
        assert_eq!(entry.total, 11);
        assert_eq!(entry.relative, Some(2));
        assert_eq!(entry.holes[0], Some(5));
        assert_eq!(entry.holes[1], None);
        assert_eq!(entry.holes[2], Some(6));
        assert!(entry.holes[3..].iter().all(Option::is_none));
    }

    #[test]
    fn test_entry_row() {
        let row = HistoryEntry::from_round(&two_player_round(), 0, timestamp()).to_row();
        assert_eq!(row, "2026-05-17,14:03:09,Custom,3,Ana,11,+2,5,,6,,,,,,,,,,,,,,,");
        assert_eq!(row.split(',').count(), 7 + MAX_HOLES);
    }

    #[test]
    fn test_entry_row_unplayed_player() {
        let row = HistoryEntry::from_round(&two_player_round(), 1, timestamp()).to_row();
        assert!(row.contains(",Smith  Jo,0,--,"));
        assert_eq!(row.split(',').count(), 7 + MAX_HOLES);
    }

    #[test]
    fn test_entry_uses_active_course_name() {
        let mut state = two_player_round();
        state.save_course_preset(0, Some("Oak, North")).unwrap();
        let row = HistoryEntry::from_round(&state, 0, timestamp()).to_row();
        assert!(row.contains(",Oak  North,3,"));
    }

    #[test]
    fn test_strokes_beyond_hole_count_are_blank() {
        let mut state = RoundState::default();
        state.toggle_hole_count();
        state.adjust_score(0, 12, 4);
        state.toggle_hole_count();
        let entry = HistoryEntry::from_round(&state, 0, timestamp());
        assert_eq!(entry.holes[12], None);
    }

    #[test]
    fn test_export_writes_header_once() {
        let (_dir, log) = create_test_log();
        let state = two_player_round();

        assert_eq!(log.export(&state, timestamp()).unwrap(), 2);
        assert_eq!(log.export(&state, timestamp()).unwrap(), 2);

        let contents = log.read().unwrap().unwrap();
        let lines: Vec<&str> = contents.split_terminator(LINE_ENDING).collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], header());
        assert_eq!(contents.matches("Date,Time").count(), 1);
        assert!(contents.ends_with(LINE_ENDING));
    }

    #[test]
    fn test_export_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let log = HistoryLog::new(dir.path().join("nested").join("history.csv"));
        log.export(&RoundState::default(), timestamp()).unwrap();
        assert!(log.path().exists());
    }

    #[test]
    fn test_export_to_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let log = HistoryLog::new(dir.path());
        let err = log.export(&RoundState::default(), timestamp()).unwrap_err();
        assert!(matches!(err, Error::HistoryWrite { .. }));
    }

    #[test]
    fn test_read_missing_is_none() {
        let (_dir, log) = create_test_log();
        assert!(log.read().unwrap().is_none());
    }

    #[test]
    fn test_read_empty_is_none() {
        let (_dir, log) = create_test_log();
        File::create(log.path()).unwrap();
        assert!(log.read().unwrap().is_none());
    }

    #[test]
    fn test_clear() {
        let (_dir, log) = create_test_log();
        log.export(&two_player_round(), timestamp()).unwrap();
        log.clear().unwrap();
        assert!(!log.path().exists());
        assert!(log.read().unwrap().is_none());
    }

    #[test]
    fn test_clear_missing_is_ok() {
        let (_dir, log) = create_test_log();
        assert!(log.clear().is_ok());
    }
}
