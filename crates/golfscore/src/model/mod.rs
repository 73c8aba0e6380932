//! The scoring model.
//!
//! [`RoundState`] holds everything that is persisted for a round: player
//! names, per-hole strokes, per-hole par and the course preset slots. Every
//! mutator keeps the state inside its valid ranges, so any value obtained
//! from it can be written to disk as-is.

mod name;

use serde::Serialize;
use tracing::debug;

use crate::course::CoursePreset;

pub use name::FixedName;

/// Maximum number of players in a round.
pub const MAX_PLAYERS: usize = 4;

/// Maximum number of holes in a round.
pub const MAX_HOLES: usize = 18;

/// Size of a stored name field, terminator included.
pub const MAX_NAME_LEN: usize = 16;

/// Number of course preset slots.
pub const MAX_COURSES: usize = 5;

/// Lowest par a hole can have.
pub const MIN_PAR: u8 = 2;

/// Highest par a hole can have.
pub const MAX_PAR: u8 = 7;

/// Par assigned to holes without a valid value.
pub const DEFAULT_PAR: u8 = 4;

/// Highest stroke count for a single hole.
pub const MAX_STROKES: u8 = 99;

/// Player count of a fresh round.
pub const DEFAULT_PLAYER_COUNT: u8 = 1;

/// Hole count of a fresh round.
pub const DEFAULT_HOLE_COUNT: u8 = 9;

/// State of the round in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundState {
    pub(crate) player_count: u8,
    pub(crate) hole_count: u8,
    pub(crate) player_names: [FixedName; MAX_PLAYERS],
    pub(crate) strokes: [[u8; MAX_HOLES]; MAX_PLAYERS],
    pub(crate) par: [u8; MAX_HOLES],
    pub(crate) courses: [CoursePreset; MAX_COURSES],
    pub(crate) active_course: Option<usize>,
}

impl Default for RoundState {
    fn default() -> Self {
        Self {
            player_count: DEFAULT_PLAYER_COUNT,
            hole_count: DEFAULT_HOLE_COUNT,
            player_names: std::array::from_fn(FixedName::player_default),
            strokes: [[0; MAX_HOLES]; MAX_PLAYERS],
            par: [DEFAULT_PAR; MAX_HOLES],
            courses: std::array::from_fn(|_| CoursePreset::empty()),
            active_course: None,
        }
    }
}

impl RoundState {
    /// Number of holes in the round.
    #[must_use]
    pub fn hole_count(&self) -> u8 {
        self.hole_count
    }

    /// Number of active players.
    #[must_use]
    pub fn player_count(&self) -> u8 {
        self.player_count
    }

    /// Name of the player at `index`, active or not.
    #[must_use]
    pub fn player_name(&self, index: usize) -> Option<&str> {
        self.player_names.get(index).map(FixedName::as_str)
    }

    /// Strokes for a player on a hole; 0 means unplayed or out of range.
    #[must_use]
    pub fn score(&self, player: usize, hole: usize) -> u8 {
        if player >= MAX_PLAYERS || hole >= self.holes() {
            return 0;
        }
        self.strokes[player][hole]
    }

    /// Sum of strokes over the round's holes. Unplayed holes count as 0.
    #[must_use]
    pub fn total_score(&self, player: usize) -> u16 {
        self.player_strokes(player)
            .iter()
            .map(|&s| u16::from(s))
            .sum()
    }

    /// Strokes minus par, counting only holes the player has played.
    ///
    /// Returns 0 when nothing has been played yet.
    #[must_use]
    pub fn relative_to_par(&self, player: usize) -> i32 {
        let (strokes, par) = self
            .player_strokes(player)
            .iter()
            .zip(&self.par)
            .filter(|&(&s, _)| s > 0)
            .fold((0i32, 0i32), |(total, par_total), (&s, &p)| {
                (total + i32::from(s), par_total + i32::from(p))
            });

        if par == 0 {
            return 0;
        }
        strokes - par
    }

    /// Par of a hole; 0 for holes beyond the round's hole count.
    #[must_use]
    pub fn par(&self, hole: usize) -> u8 {
        if hole >= self.holes() {
            return 0;
        }
        self.par[hole]
    }

    /// Par values for every hole slot, including those beyond the hole count.
    #[must_use]
    pub fn par_values(&self) -> &[u8; MAX_HOLES] {
        &self.par
    }

    /// Sum of par over the round's holes.
    #[must_use]
    pub fn course_par(&self) -> u16 {
        self.par[..self.holes()].iter().map(|&p| u16::from(p)).sum()
    }

    /// Number of holes with at least one stroke recorded.
    #[must_use]
    pub fn played_hole_count(&self, player: usize) -> u8 {
        let played = self.player_strokes(player).iter().filter(|&&s| s > 0).count();
        u8::try_from(played).unwrap_or(u8::MAX)
    }

    /// Check if every active player has a score on every hole.
    #[must_use]
    pub fn is_round_complete(&self) -> bool {
        (0..usize::from(self.player_count))
            .all(|player| self.player_strokes(player).iter().all(|&s| s > 0))
    }

    /// Adjust a player's strokes on a hole by `delta`, clamped to `0..=99`.
    ///
    /// Returns `false` without touching anything when the player or hole is
    /// not part of the current round.
    pub fn adjust_score(&mut self, player: usize, hole: usize, delta: i32) -> bool {
        if player >= usize::from(self.player_count) || hole >= self.holes() {
            return false;
        }

        let current = i32::from(self.strokes[player][hole]);
        let next = current
            .saturating_add(delta)
            .clamp(0, i32::from(MAX_STROKES));
        self.strokes[player][hole] = u8::try_from(next).unwrap_or(MAX_STROKES);
        true
    }

    /// Zero every stroke for every player.
    pub fn reset_scores(&mut self) {
        self.strokes = [[0; MAX_HOLES]; MAX_PLAYERS];
    }

    /// Set the number of active players, clamped to `1..=4`.
    ///
    /// Returns `false` if the clamped value equals the current one.
    pub fn set_player_count(&mut self, count: u8) -> bool {
        let count = count.clamp(1, MAX_PLAYERS as u8);
        if self.player_count == count {
            return false;
        }
        self.player_count = count;
        true
    }

    /// Advance the player count by one, wrapping from 4 back to 1.
    pub fn cycle_player_count(&mut self) -> bool {
        let next = if usize::from(self.player_count) >= MAX_PLAYERS {
            1
        } else {
            self.player_count + 1
        };
        self.set_player_count(next)
    }

    /// Set the number of holes, clamped to `1..=18`.
    ///
    /// Strokes already entered are kept; holes beyond the new count simply
    /// stop contributing to totals.
    pub fn set_hole_count(&mut self, count: u8) -> bool {
        let count = count.clamp(1, MAX_HOLES as u8);
        if self.hole_count == count {
            return false;
        }
        self.hole_count = count;
        true
    }

    /// Switch between a 9 and an 18 hole round.
    pub fn toggle_hole_count(&mut self) -> bool {
        let next = if usize::from(self.hole_count) == MAX_HOLES {
            9
        } else {
            MAX_HOLES as u8
        };
        self.set_hole_count(next)
    }

    /// Rename a player. Empty or missing text restores `"Player N"`.
    ///
    /// Returns `false` if `index` is not a player slot.
    pub fn set_player_name(&mut self, index: usize, name: Option<&str>) -> bool {
        let Some(slot) = self.player_names.get_mut(index) else {
            return false;
        };

        *slot = name
            .map(FixedName::new)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| FixedName::player_default(index));
        true
    }

    /// Set the par of a hole, clamped to `2..=7`.
    ///
    /// Returns `false` for an unknown hole or an unchanged value.
    pub fn set_par(&mut self, hole: usize, value: u8) -> bool {
        if hole >= MAX_HOLES {
            return false;
        }
        let value = value.clamp(MIN_PAR, MAX_PAR);
        if self.par[hole] == value {
            return false;
        }
        self.par[hole] = value;
        true
    }

    /// Bring freshly decoded data back inside every valid range.
    ///
    /// Returns `true` if anything had to be corrected.
    pub fn enforce_invariants(&mut self) -> bool {
        let before = self.clone();

        if !(1..=MAX_PLAYERS).contains(&usize::from(self.player_count)) {
            self.player_count = DEFAULT_PLAYER_COUNT;
        }

        if !(1..=MAX_HOLES).contains(&usize::from(self.hole_count)) {
            self.hole_count = DEFAULT_HOLE_COUNT;
        }

        for par in &mut self.par {
            if !(MIN_PAR..=MAX_PAR).contains(par) {
                *par = DEFAULT_PAR;
            }
        }

        for stroke in self.strokes.iter_mut().flatten() {
            *stroke = (*stroke).min(MAX_STROKES);
        }

        for (index, name) in self.player_names.iter_mut().enumerate() {
            if name.is_empty() {
                *name = FixedName::player_default(index);
            }
        }

        for (slot, course) in self.courses.iter_mut().enumerate() {
            course.normalize(slot);
        }

        if let Some(slot) = self.active_course {
            if !self.courses.get(slot).is_some_and(CoursePreset::is_in_use) {
                self.active_course = None;
            }
        }

        let corrected = *self != before;
        if corrected {
            debug!("Corrected out-of-range values in round state");
        }
        corrected
    }

    fn holes(&self) -> usize {
        usize::from(self.hole_count).min(MAX_HOLES)
    }

    fn player_strokes(&self, player: usize) -> &[u8] {
        match self.strokes.get(player) {
            Some(row) => &row[..self.holes()],
            None => &[],
        }
    }
}
