//! Course presets.
//!
//! A preset is a named hole count and par layout saved in one of
//! [`MAX_COURSES`] slots of the round state. Loading a preset starts a new
//! round on that layout.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::{FixedName, RoundState, DEFAULT_PAR, MAX_COURSES, MAX_HOLES, MAX_PAR, MIN_PAR};

/// A saved hole count and par layout.
///
/// A slot is empty when its hole count is 0; empty slots have a blank name
/// and all-zero par.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoursePreset {
    pub(crate) hole_count: u8,
    pub(crate) par: [u8; MAX_HOLES],
    pub(crate) name: FixedName,
}

impl CoursePreset {
    /// An unused slot.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            hole_count: 0,
            par: [0; MAX_HOLES],
            name: FixedName::default(),
        }
    }

    /// Check if the slot holds a preset.
    #[must_use]
    pub fn is_in_use(&self) -> bool {
        (1..=MAX_HOLES).contains(&usize::from(self.hole_count))
    }

    /// Number of holes in the preset; 0 for an empty slot.
    #[must_use]
    pub fn hole_count(&self) -> u8 {
        self.hole_count
    }

    /// Par layout of the preset.
    #[must_use]
    pub fn par(&self) -> &[u8; MAX_HOLES] {
        &self.par
    }

    /// Name of the preset; empty for an empty slot.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Total par over the preset's holes.
    #[must_use]
    pub fn total_par(&self) -> u16 {
        self.par[..usize::from(self.hole_count).min(MAX_HOLES)]
            .iter()
            .map(|&p| u16::from(p))
            .sum()
    }

    /// Short description used in course pickers.
    #[must_use]
    pub fn label(&self, slot: usize) -> String {
        if self.is_in_use() {
            format!(
                "{}. {} ({} holes, par {})",
                slot + 1,
                self.name,
                self.hole_count,
                self.total_par()
            )
        } else {
            format!("{}. <empty>", slot + 1)
        }
    }

    /// Blank out unused slots and repair the par and name of used ones.
    pub(crate) fn normalize(&mut self, slot: usize) {
        if !self.is_in_use() {
            *self = Self::empty();
            return;
        }

        for par in &mut self.par {
            if !(MIN_PAR..=MAX_PAR).contains(par) {
                *par = DEFAULT_PAR;
            }
        }

        if self.name.is_empty() {
            self.name = FixedName::course_default(slot);
        }
    }
}

impl Default for CoursePreset {
    fn default() -> Self {
        Self::empty()
    }
}

impl RoundState {
    /// All preset slots, empty ones included.
    #[must_use]
    pub fn courses(&self) -> &[CoursePreset; MAX_COURSES] {
        &self.courses
    }

    /// The preset in `slot`, if the index is valid.
    #[must_use]
    pub fn course(&self, slot: usize) -> Option<&CoursePreset> {
        self.courses.get(slot)
    }

    /// Slot of the preset the round was started from.
    #[must_use]
    pub fn active_course(&self) -> Option<usize> {
        self.active_course
    }

    /// Name of the active preset, if any.
    #[must_use]
    pub fn active_course_name(&self) -> Option<&str> {
        self.active_course
            .and_then(|slot| self.courses.get(slot))
            .filter(|course| course.is_in_use())
            .map(CoursePreset::name)
    }

    /// Check if `slot` holds a preset. Out-of-range slots are never in use.
    #[must_use]
    pub fn course_slot_in_use(&self, slot: usize) -> bool {
        self.courses.get(slot).is_some_and(CoursePreset::is_in_use)
    }

    /// Save the current hole count and par layout into `slot`.
    ///
    /// A blank name becomes `"Course N"`. The slot becomes the active course.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SlotOutOfRange`] if `slot` is not a preset slot.
    pub fn save_course_preset(&mut self, slot: usize, name: Option<&str>) -> Result<()> {
        let hole_count = self.hole_count.clamp(1, MAX_HOLES as u8);
        let par = self.par;
        let course = self
            .courses
            .get_mut(slot)
            .ok_or_else(|| Error::slot_out_of_range(slot))?;

        course.hole_count = hole_count;
        course.par = par;
        course.name = name
            .map(FixedName::new)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| FixedName::course_default(slot));
        self.active_course = Some(slot);
        Ok(())
    }

    /// Empty `slot`, clearing the active course if it pointed there.
    ///
    /// Returns `false` if the slot was already empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SlotOutOfRange`] if `slot` is not a preset slot.
    pub fn delete_course_preset(&mut self, slot: usize) -> Result<bool> {
        let course = self
            .courses
            .get_mut(slot)
            .ok_or_else(|| Error::slot_out_of_range(slot))?;

        if !course.is_in_use() {
            return Ok(false);
        }

        *course = CoursePreset::empty();
        if self.active_course == Some(slot) {
            self.active_course = None;
        }
        Ok(true)
    }

    /// Start a new round on the preset in `slot`.
    ///
    /// Copies the hole count and par, marks the slot active and zeroes every
    /// score. Returns `false` and changes nothing if the slot is empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SlotOutOfRange`] if `slot` is not a preset slot.
    pub fn apply_course_preset(&mut self, slot: usize) -> Result<bool> {
        let course = self
            .courses
            .get(slot)
            .ok_or_else(|| Error::slot_out_of_range(slot))?;

        if !course.is_in_use() {
            return Ok(false);
        }

        self.hole_count = course.hole_count;
        self.par = course.par;
        self.active_course = Some(slot);
        self.reset_scores();
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with_preset() -> RoundState {
        let mut state = RoundState::default();
        state.set_hole_count(3);
        state.set_par(0, 3);
        state.set_par(1, 5);
        state.save_course_preset(1, Some("Pine Hills")).unwrap();
        state
    }

    #[test]
    fn test_empty_slot() {
        let course = CoursePreset::empty();
        assert!(!course.is_in_use());
        assert_eq!(course.name(), "");
        assert_eq!(course.total_par(), 0);
        assert_eq!(course.label(2), "3. <empty>");
    }

    #[test]
    fn test_save_course_preset() {
        let state = state_with_preset();
        let course = state.course(1).unwrap();
        assert!(course.is_in_use());
        assert_eq!(course.hole_count(), 3);
        assert_eq!(course.name(), "Pine Hills");
        assert_eq!(course.par()[..3], [3, 5, 4]);
        assert_eq!(course.total_par(), 12);
        assert_eq!(state.active_course(), Some(1));
        assert_eq!(state.active_course_name(), Some("Pine Hills"));
        assert_eq!(course.label(1), "2. Pine Hills (3 holes, par 12)");
    }

    #[test]
    fn test_save_course_preset_default_name() {
        let mut state = RoundState::default();
        state.save_course_preset(4, Some("")).unwrap();
        assert_eq!(state.course(4).unwrap().name(), "Course 5");
        state.save_course_preset(0, None).unwrap();
        assert_eq!(state.course(0).unwrap().name(), "Course 1");
    }

    #[test]
    fn test_save_course_preset_name_with_nul() {
        let mut state = RoundState::default();
        state.save_course_preset(1, Some("\0Links")).unwrap();
        assert_eq!(state.course(1).unwrap().name(), "Course 2");
        state.save_course_preset(2, Some("Oak\0Hill")).unwrap();
        assert_eq!(state.course(2).unwrap().name(), "Oak");
    }

    #[test]
    fn test_save_course_preset_overwrites() {
        let mut state = state_with_preset();
        state.toggle_hole_count();
        state.save_course_preset(1, Some("Back Nine")).unwrap();
        let course = state.course(1).unwrap();
        assert_eq!(course.hole_count(), 18);
        assert_eq!(course.name(), "Back Nine");
    }

    #[test]
    fn test_slot_out_of_range_rejected() {
        let mut state = RoundState::default();
        let before = state.clone();
        assert!(matches!(
            state.save_course_preset(MAX_COURSES, Some("x")),
            Err(Error::SlotOutOfRange { slot: 5 })
        ));
        assert!(state.delete_course_preset(MAX_COURSES).is_err());
        assert!(state.apply_course_preset(99).is_err());
        assert_eq!(state, before);
        assert!(!state.course_slot_in_use(MAX_COURSES));
    }

    #[test]
    fn test_delete_course_preset_clears_active() {
        let mut state = state_with_preset();
        assert!(state.delete_course_preset(1).unwrap());
        assert!(!state.course_slot_in_use(1));
        assert_eq!(state.course(1).unwrap(), &CoursePreset::empty());
        assert_eq!(state.active_course(), None);
    }

    #[test]
    fn test_delete_other_slot_keeps_active() {
        let mut state = state_with_preset();
        state.save_course_preset(3, Some("Links")).unwrap();
        state.apply_course_preset(1).unwrap();
        assert!(state.delete_course_preset(3).unwrap());
        assert_eq!(state.active_course(), Some(1));
    }

    #[test]
    fn test_delete_empty_slot_is_noop() {
        let mut state = state_with_preset();
        let before = state.clone();
        assert!(!state.delete_course_preset(0).unwrap());
        assert_eq!(state, before);
    }

    #[test]
    fn test_apply_empty_slot_is_noop() {
        let mut state = state_with_preset();
        state.adjust_score(0, 0, 4);
        let before = state.clone();
        assert!(!state.apply_course_preset(2).unwrap());
        assert_eq!(state, before);
    }

    #[test]
    fn test_apply_course_preset_starts_new_round() {
        let mut state = state_with_preset();
        state.toggle_hole_count();
        state.set_par(0, 6);
        state.adjust_score(0, 0, 5);
        state.active_course = None;

        assert!(state.apply_course_preset(1).unwrap());
        assert_eq!(state.hole_count(), 3);
        assert_eq!(state.par(0), 3);
        assert_eq!(state.par(1), 5);
        assert_eq!(state.active_course(), Some(1));
        assert!(state.strokes.iter().flatten().all(|&s| s == 0));
    }

    #[test]
    fn test_normalize_blanks_unused_slot() {
        let mut course = CoursePreset {
            hole_count: 40,
            par: [3; MAX_HOLES],
            name: FixedName::new("Ghost"),
        };
        course.normalize(0);
        assert_eq!(course, CoursePreset::empty());
    }

    #[test]
    fn test_normalize_repairs_used_slot() {
        let mut course = CoursePreset {
            hole_count: 9,
            par: [0; MAX_HOLES],
            name: FixedName::default(),
        };
        course.normalize(2);
        assert!(course.par.iter().all(|&p| p == DEFAULT_PAR));
        assert_eq!(course.name(), "Course 3");
    }
}
