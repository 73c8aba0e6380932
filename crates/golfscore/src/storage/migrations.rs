//! Version detection and upgrade of persisted round state.
//!
//! A blob is first decoded against the current layout. If that fails it is
//! tried against the single supported predecessor, and a match is upgraded
//! in memory. Anything else is rejected and the caller starts from defaults.

use tracing::{debug, info};

use crate::course::CoursePreset;
use crate::model::RoundState;

use super::format::{self, FormatError, LegacyRecord, CURRENT_VERSION, LEGACY_VERSION};

/// A blob that was recognised by one of the known layouts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// The decoded state, not yet validated.
    pub state: RoundState,
    /// Version tag found on disk.
    pub from_version: u8,
}

impl Decoded {
    /// Check if the blob had to be upgraded.
    #[must_use]
    pub fn was_migrated(&self) -> bool {
        self.from_version != CURRENT_VERSION
    }
}

/// Why a blob was rejected by every known layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rejected {
    /// Failure against the current layout.
    pub current: FormatError,
    /// Failure against the legacy layout.
    pub legacy: FormatError,
}

impl std::fmt::Display for Rejected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "not version {CURRENT_VERSION} ({}) nor version {LEGACY_VERSION} ({})",
            self.current, self.legacy
        )
    }
}

/// Decode a blob with the current layout, falling back to the legacy one.
///
/// # Errors
///
/// Returns [`Rejected`] when neither layout matches.
pub fn decode_any(bytes: &[u8]) -> Result<Decoded, Rejected> {
    let current = match format::decode_current(bytes) {
        Ok(state) => {
            debug!("Blob matches version {CURRENT_VERSION}");
            return Ok(Decoded {
                state,
                from_version: CURRENT_VERSION,
            });
        }
        Err(err) => err,
    };

    match format::decode_legacy(bytes) {
        Ok(record) => {
            info!("Upgrading round state from version {LEGACY_VERSION} to {CURRENT_VERSION}");
            Ok(Decoded {
                state: upgrade_legacy(record),
                from_version: LEGACY_VERSION,
            })
        }
        Err(legacy) => Err(Rejected { current, legacy }),
    }
}

/// Carry a legacy record forward to the current model.
///
/// Names, strokes and par are kept; course presets start empty and no
/// course is active.
#[must_use]
pub fn upgrade_legacy(record: LegacyRecord) -> RoundState {
    RoundState {
        player_count: record.player_count,
        hole_count: record.hole_count,
        player_names: record.player_names,
        strokes: record.strokes,
        par: record.par,
        courses: std::array::from_fn(|_| CoursePreset::empty()),
        active_course: None,
    }
}
