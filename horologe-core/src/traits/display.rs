//! Display primitives consumed by the render cache
//!
//! The display is organised as one base layer (the animation) plus one
//! overlay layer per cached region. Drawing calls address a region and
//! use coordinates relative to that region's top-left corner; only
//! regions the render cache marked dirty are ever drawn into. Once per
//! tick `compose` stacks the overlays onto the base layer and pushes the
//! finished frame to the panel.

use crate::render::{Color, Point, Rect, RegionId};

/// Errors that can occur while drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication with the panel failed
    Communication,
    /// Region has no backing layer
    NoSuchLayer,
    /// Requested animation frame does not exist
    NoSuchFrame,
    /// Display not initialized
    NotReady,
    /// Layer buffer smaller than its region
    BufferTooSmall,
}

/// Text size classes
///
/// Backends map these onto whatever fonts they carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Font {
    /// Status lines, FPS counter
    Small,
    /// Labels, weekday badge
    Medium,
    /// Clock digits
    Large,
}

/// Where a text position sits relative to the rendered string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Anchor {
    /// Position is the left edge, vertically centred
    MiddleLeft,
    /// Position is the centre of the string
    Center,
}

/// Text rendering parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TextStyle {
    pub font: Font,
    pub color: Color,
    pub background: Option<Color>,
    pub anchor: Anchor,
}

impl TextStyle {
    /// Centred text without a background fill
    pub const fn centered(font: Font, color: Color) -> Self {
        Self {
            font,
            color,
            background: None,
            anchor: Anchor::Center,
        }
    }

    /// Left-anchored text without a background fill
    pub const fn left(font: Font, color: Color) -> Self {
        Self {
            font,
            color,
            background: None,
            anchor: Anchor::MiddleLeft,
        }
    }

    /// Same style with an opaque background behind the glyphs
    pub const fn on(self, background: Color) -> Self {
        Self {
            background: Some(background),
            ..self
        }
    }
}

/// Trait for the display-primitive collaborator
pub trait DisplayBackend {
    /// Reset a region's layer to the transparent key colour
    fn clear_region(&mut self, region: RegionId) -> Result<(), DisplayError>;

    /// Fill a rectangle inside a region
    fn fill_rect(&mut self, region: RegionId, area: Rect, color: Color)
        -> Result<(), DisplayError>;

    /// Fill a rounded rectangle inside a region
    fn fill_round_rect(
        &mut self,
        region: RegionId,
        area: Rect,
        radius: u32,
        color: Color,
    ) -> Result<(), DisplayError>;

    /// Outline a rounded rectangle inside a region
    fn draw_round_rect(
        &mut self,
        region: RegionId,
        area: Rect,
        radius: u32,
        color: Color,
    ) -> Result<(), DisplayError>;

    /// Draw a filled circle with a one-pixel outline
    fn fill_circle(
        &mut self,
        region: RegionId,
        center: Point,
        radius: u32,
        fill: Color,
        outline: Color,
    ) -> Result<(), DisplayError>;

    /// Draw a string
    fn draw_text(
        &mut self,
        region: RegionId,
        text: &str,
        at: Point,
        style: TextStyle,
    ) -> Result<(), DisplayError>;

    /// Blit one animation frame onto the base layer
    fn draw_animation_frame(&mut self, frame: usize) -> Result<(), DisplayError>;

    /// Stack the overlay layers onto the base layer in `order` and push
    /// the finished frame to the panel
    fn compose(&mut self, order: &[RegionId]) -> Result<(), DisplayError>;
}
