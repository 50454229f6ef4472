//! Button handling
//!
//! Brightness stepping and edge detection for the two momentary
//! buttons. Debouncing stays with the input collaborator.

use crate::config::UiConfig;
use crate::traits::ButtonEvent;

/// Backlight level stepped by the buttons within a fixed range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Brightness {
    level: u8,
    min: u8,
    max: u8,
    step: u8,
}

impl Brightness {
    /// Create a brightness level, clamping `level` into `[min, max]`
    pub fn new(level: u8, min: u8, max: u8, step: u8) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            level: level.clamp(min, max),
            min,
            max,
            step,
        }
    }

    pub fn from_config(ui: &UiConfig) -> Self {
        Self::new(ui.brightness, ui.brightness_min, ui.brightness_max, ui.brightness_step)
    }

    pub const fn level(&self) -> u8 {
        self.level
    }

    pub const fn range(&self) -> (u8, u8) {
        (self.min, self.max)
    }

    /// Apply a button press
    ///
    /// Returns true if the level changed.
    pub fn apply(&mut self, event: ButtonEvent) -> bool {
        let next = match event {
            ButtonEvent::Increase => self.level.saturating_add(self.step).min(self.max),
            ButtonEvent::Decrease => self.level.saturating_sub(self.step).max(self.min),
        };
        let changed = next != self.level;
        self.level = next;
        changed
    }
}

/// Press detector for an active-low button
///
/// Reports a press on the high-to-low transition only, so holding the
/// button produces a single event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EdgeDetector {
    prev_high: bool,
}

impl Default for EdgeDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl EdgeDetector {
    /// Buttons idle high (pull-up)
    pub const fn new() -> Self {
        Self { prev_high: true }
    }

    /// Feed the current pin level; returns true on a press
    pub fn update(&mut self, high: bool) -> bool {
        let pressed = self.prev_high && !high;
        self.prev_high = high;
        pressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_within_range() {
        let mut b = Brightness::new(100, 100, 250, 25);
        assert!(!b.apply(ButtonEvent::Decrease));
        assert_eq!(b.level(), 100);

        for expected in [125, 150, 175, 200, 225, 250] {
            assert!(b.apply(ButtonEvent::Increase));
            assert_eq!(b.level(), expected);
        }
        assert!(!b.apply(ButtonEvent::Increase));
        assert_eq!(b.level(), 250);
    }

    #[test]
    fn test_clamps_partial_step() {
        let mut b = Brightness::new(240, 100, 250, 25);
        assert!(b.apply(ButtonEvent::Increase));
        assert_eq!(b.level(), 250);

        let mut b = Brightness::new(110, 100, 250, 25);
        assert!(b.apply(ButtonEvent::Decrease));
        assert_eq!(b.level(), 100);
    }

    #[test]
    fn test_no_overflow_near_max() {
        let mut b = Brightness::new(250, 0, 255, 25);
        b.apply(ButtonEvent::Increase);
        assert_eq!(b.level(), 255);
    }

    #[test]
    fn test_initial_level_clamped() {
        assert_eq!(Brightness::new(20, 100, 250, 25).level(), 100);
        assert_eq!(Brightness::from_config(&UiConfig::default()).level(), 100);
    }

    #[test]
    fn test_edge_detector() {
        let mut edge = EdgeDetector::new();
        assert!(!edge.update(true));
        assert!(edge.update(false));
        // Held down
        assert!(!edge.update(false));
        assert!(!edge.update(true));
        assert!(edge.update(false));
    }
}
