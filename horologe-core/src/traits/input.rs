//! Button input and backlight output

/// Momentary button edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    /// Brightness up button pressed
    Increase,
    /// Brightness down button pressed
    Decrease,
}

/// Source of already-debounced button edges
pub trait InputSource {
    /// Take the next pending button edge, if any
    fn poll(&mut self) -> Option<ButtonEvent>;
}

/// Display backlight
pub trait Backlight {
    /// Apply a brightness level (0 = off, 255 = full)
    fn set_level(&mut self, level: u8);
}
