//! Incremental rendering
//!
//! The screen is split into independently redrawable regions. Each tick
//! the render cache computes every region's intended content, compares it
//! with what was last drawn, and redraws only the regions that changed.
//! The animation region is the exception: it advances every frame.

pub mod animation;
pub mod cache;
pub mod draw;
pub mod fps;
pub mod geometry;
pub mod layout;
pub mod palette;
pub mod region;

pub use animation::AnimationCursor;
pub use cache::{RenderCache, RenderInputs, RenderOutcome};
pub use fps::FrameRateSample;
pub use geometry::{Point, Rect};
pub use layout::{Layout, SCREEN_HEIGHT, SCREEN_WIDTH};
pub use palette::{Color, Palette};
pub use region::{RegionId, RegionSet, RenderRegion, COMPOSITION_ORDER};
