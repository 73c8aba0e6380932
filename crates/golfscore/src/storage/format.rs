//! Binary layouts of the persisted round state.
//!
//! Two layouts are understood. The current one (version 2):
//!
//! ```text
//! version:u8 playerCount:u8 holeCount:u8 reserved:u8
//! playerNames[4] of char[16]
//! strokes[4][18] of u8
//! par[18] of u8
//! courses[5] of { holeCount:u8 par[18] of u8 name:char[16] }
//! activeCourse:u8                      (0xFF = none)
//! ```
//!
//! The legacy one (version 1) stops after `par`. Each layout has its own
//! explicit decoder; nothing relies on in-memory struct layout.

use thiserror::Error;

use crate::course::CoursePreset;
use crate::model::{FixedName, RoundState, MAX_COURSES, MAX_HOLES, MAX_NAME_LEN, MAX_PLAYERS};

/// Version tag written by this build.
pub const CURRENT_VERSION: u8 = 2;

/// Version tag of the layout without course presets.
pub const LEGACY_VERSION: u8 = 1;

/// On-disk value of "no active course".
pub const NO_ACTIVE_COURSE: u8 = 0xFF;

const HEADER_LEN: usize = 4;
const NAMES_LEN: usize = MAX_PLAYERS * MAX_NAME_LEN;
const STROKES_LEN: usize = MAX_PLAYERS * MAX_HOLES;
const PAR_LEN: usize = MAX_HOLES;
const COURSE_LEN: usize = 1 + MAX_HOLES + MAX_NAME_LEN;

/// Size of a legacy (version 1) record.
pub const LEGACY_LEN: usize = HEADER_LEN + NAMES_LEN + STROKES_LEN + PAR_LEN;

/// Size of a current (version 2) record.
pub const CURRENT_LEN: usize = LEGACY_LEN + MAX_COURSES * COURSE_LEN + 1;

/// Reasons a blob does not match a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The blob is not the size of the layout.
    #[error("expected {expected} bytes, found {actual}")]
    UnexpectedLength {
        /// Size of the layout.
        expected: usize,
        /// Size of the blob.
        actual: usize,
    },

    /// The blob is the right size but carries another version tag.
    #[error("expected version {expected}, found {found}")]
    VersionMismatch {
        /// Version the layout requires.
        expected: u8,
        /// Version stored in the blob.
        found: u8,
    },
}

/// Fields shared by every layout, exactly as stored.
///
/// Values are not validated here; see [`RoundState::enforce_invariants`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyRecord {
    /// Stored player count.
    pub player_count: u8,
    /// Stored hole count.
    pub hole_count: u8,
    /// Stored player names.
    pub player_names: [FixedName; MAX_PLAYERS],
    /// Stored strokes.
    pub strokes: [[u8; MAX_HOLES]; MAX_PLAYERS],
    /// Stored par values.
    pub par: [u8; MAX_HOLES],
}

/// Encode a state using the current layout.
///
/// The version tag is always [`CURRENT_VERSION`] and the reserved byte is 0.
#[must_use]
pub fn encode(state: &RoundState) -> Vec<u8> {
    let mut out = Vec::with_capacity(CURRENT_LEN);
    out.extend_from_slice(&[CURRENT_VERSION, state.player_count, state.hole_count, 0]);
    for name in &state.player_names {
        out.extend_from_slice(&name.to_field());
    }
    for row in &state.strokes {
        out.extend_from_slice(row);
    }
    out.extend_from_slice(&state.par);
    for course in &state.courses {
        out.push(course.hole_count);
        out.extend_from_slice(&course.par);
        out.extend_from_slice(&course.name.to_field());
    }
    let active = state
        .active_course
        .and_then(|slot| u8::try_from(slot).ok())
        .unwrap_or(NO_ACTIVE_COURSE);
    out.push(active);
    debug_assert_eq!(out.len(), CURRENT_LEN);
    out
}

/// Decode a blob that must use the current layout.
///
/// # Errors
///
/// Returns a [`FormatError`] if the size or version tag does not match.
pub fn decode_current(bytes: &[u8]) -> Result<RoundState, FormatError> {
    check(bytes, CURRENT_LEN, CURRENT_VERSION)?;
    let mut reader = Reader::new(bytes);
    let record = read_shared(&mut reader);

    let courses = std::array::from_fn(|_| {
        let hole_count = reader.u8();
        let par = reader.array();
        let name = FixedName::from_field(reader.bytes(MAX_NAME_LEN));
        CoursePreset {
            hole_count,
            par,
            name,
        }
    });
    let active = reader.u8();

    Ok(RoundState {
        player_count: record.player_count,
        hole_count: record.hole_count,
        player_names: record.player_names,
        strokes: record.strokes,
        par: record.par,
        courses,
        active_course: (active != NO_ACTIVE_COURSE).then_some(usize::from(active)),
    })
}

/// Decode a blob that must use the legacy layout.
///
/// # Errors
///
/// Returns a [`FormatError`] if the size or version tag does not match.
pub fn decode_legacy(bytes: &[u8]) -> Result<LegacyRecord, FormatError> {
    check(bytes, LEGACY_LEN, LEGACY_VERSION)?;
    Ok(read_shared(&mut Reader::new(bytes)))
}

/// Encode a legacy record, as written by version 1 builds.
#[must_use]
pub fn encode_legacy(record: &LegacyRecord) -> Vec<u8> {
    let mut out = Vec::with_capacity(LEGACY_LEN);
    out.extend_from_slice(&[LEGACY_VERSION, record.player_count, record.hole_count, 0]);
    for name in &record.player_names {
        out.extend_from_slice(&name.to_field());
    }
    for row in &record.strokes {
        out.extend_from_slice(row);
    }
    out.extend_from_slice(&record.par);
    out
}

fn check(bytes: &[u8], expected_len: usize, expected_version: u8) -> Result<(), FormatError> {
    if bytes.len() != expected_len {
        return Err(FormatError::UnexpectedLength {
            expected: expected_len,
            actual: bytes.len(),
        });
    }
    if bytes[0] != expected_version {
        return Err(FormatError::VersionMismatch {
            expected: expected_version,
            found: bytes[0],
        });
    }
    Ok(())
}

fn read_shared(reader: &mut Reader<'_>) -> LegacyRecord {
    let _version = reader.u8();
    let player_count = reader.u8();
    let hole_count = reader.u8();
    let _reserved = reader.u8();
    let player_names = std::array::from_fn(|_| FixedName::from_field(reader.bytes(MAX_NAME_LEN)));
    let strokes = std::array::from_fn(|_| reader.array());
    let par = reader.array();

    LegacyRecord {
        player_count,
        hole_count,
        player_names,
        strokes,
        par,
    }
}

/// Cursor over a blob whose length has already been checked.
struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn bytes(&mut self, len: usize) -> &'a [u8] {
        let slice = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        slice
    }

    fn u8(&mut self) -> u8 {
        self.bytes(1)[0]
    }

    fn array<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(self.bytes(N));
        out
    }
}
