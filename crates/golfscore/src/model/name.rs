//! Fixed-capacity names for players and course presets.

use std::fmt;

use serde::Serialize;

use super::MAX_NAME_LEN;

/// A name that fits the on-disk `char[16]` field, terminator included.
///
/// Text longer than [`FixedName::CAPACITY`] bytes is cut at the last char
/// boundary that fits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FixedName(String);

impl FixedName {
    /// Maximum number of bytes a name may hold.
    pub const CAPACITY: usize = MAX_NAME_LEN - 1;

    /// Create a name from text, truncating to [`Self::CAPACITY`] bytes.
    ///
    /// Text after an embedded NUL is dropped, as the stored field ends there.
    #[must_use]
    pub fn new(text: &str) -> Self {
        let text = text.split('\0').next().unwrap_or_default();
        let mut end = text.len().min(Self::CAPACITY);
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        Self(text[..end].to_string())
    }

    /// Default name for the player at `index` (`"Player 1"` for index 0).
    #[must_use]
    pub fn player_default(index: usize) -> Self {
        Self(format!("Player {}", index + 1))
    }

    /// Default name for the course preset in `slot` (`"Course 1"` for slot 0).
    #[must_use]
    pub fn course_default(slot: usize) -> Self {
        Self(format!("Course {}", slot + 1))
    }

    /// Decode a NUL-padded field.
    ///
    /// Reads up to the first NUL, and never more than [`Self::CAPACITY`]
    /// bytes even when the field is unterminated. Invalid UTF-8 is replaced.
    #[must_use]
    pub fn from_field(raw: &[u8]) -> Self {
        let limit = raw.len().min(Self::CAPACITY);
        let end = raw[..limit].iter().position(|&b| b == 0).unwrap_or(limit);
        Self::new(&String::from_utf8_lossy(&raw[..end]))
    }

    /// Encode as a NUL-padded field.
    #[must_use]
    pub fn to_field(&self) -> [u8; MAX_NAME_LEN] {
        let mut field = [0u8; MAX_NAME_LEN];
        let bytes = self.0.as_bytes();
        field[..bytes.len()].copy_from_slice(bytes);
        field
    }

    /// Borrow the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check if the name is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FixedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FixedName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
