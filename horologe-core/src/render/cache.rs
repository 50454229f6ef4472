//! Render cache
//!
//! Decides once per tick which regions changed, redraws only those, and
//! composes the frame. A region's cached value changes if and only if it
//! was successfully drawn.

use heapless::String;

use crate::config::{ClockConfig, MAX_BANNER_LEN};
use crate::link::StatusView;
use crate::time::TimeFields;
use crate::traits::{DisplayBackend, DisplayError};

use super::animation::AnimationCursor;
use super::draw;
use super::fps::FrameRateSample;
use super::geometry::Rect;
use super::layout::Layout;
use super::palette::Palette;
use super::region::{RegionId, RegionSet, RenderRegion, COMPOSITION_ORDER};

/// Everything the regions are computed from
#[derive(Debug, Clone, Copy)]
pub struct RenderInputs<'a> {
    /// Current time, `None` while unsynced
    pub time: Option<&'a TimeFields>,
    pub status: StatusView,
}

/// What one render pass did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RenderOutcome {
    /// Regions drawn this pass (the animation included)
    pub redrawn: RegionSet,
    /// Regions whose draw failed; they stay dirty
    pub failed: RegionSet,
    /// First display error seen, including from composing
    pub error: Option<DisplayError>,
}

impl RenderOutcome {
    fn record<T>(&mut self, region: RegionId, result: Result<T, DisplayError>) -> Option<T> {
        match result {
            Ok(value) => {
                self.redrawn.insert(region);
                Some(value)
            }
            Err(err) => {
                self.failed.insert(region);
                self.error.get_or_insert(err);
                None
            }
        }
    }
}

/// Per-region content cache with dirty tracking
#[derive(Debug, Clone)]
pub struct RenderCache {
    palette: Palette,
    banner_text: String<MAX_BANNER_LEN>,
    /// Redraw every region on the next pass
    force_redraw: bool,
    banner: RenderRegion<String<MAX_BANNER_LEN>>,
    clock: RenderRegion<String<5>>,
    date: RenderRegion<String<10>>,
    seconds: RenderRegion<String<2>>,
    weekday: RenderRegion<String<3>>,
    status: RenderRegion<StatusView>,
    fps: RenderRegion<u32>,
    animation_bounds: Rect,
    frame_rate: FrameRateSample,
    animation: AnimationCursor,
}

impl RenderCache {
    /// Create a cache with nothing drawn yet
    pub fn new(layout: Layout, palette: Palette, banner: &str, animation_frames: usize) -> Self {
        let region = |id| layout.bounds(id);
        let mut banner_text = String::new();
        for c in banner.chars() {
            if banner_text.push(c).is_err() {
                break;
            }
        }

        Self {
            palette,
            banner_text,
            force_redraw: true,
            banner: RenderRegion::new(RegionId::Banner, region(RegionId::Banner)),
            clock: RenderRegion::new(RegionId::Clock, region(RegionId::Clock)),
            date: RenderRegion::new(RegionId::Date, region(RegionId::Date)),
            seconds: RenderRegion::new(RegionId::Seconds, region(RegionId::Seconds)),
            weekday: RenderRegion::new(RegionId::Weekday, region(RegionId::Weekday)),
            status: RenderRegion::new(RegionId::Status, region(RegionId::Status)),
            fps: RenderRegion::new(RegionId::Fps, region(RegionId::Fps)),
            animation_bounds: region(RegionId::Animation),
            frame_rate: FrameRateSample::new(),
            animation: AnimationCursor::new(animation_frames),
        }
    }

    /// Create a cache for the default landscape layout
    pub fn from_config(config: &ClockConfig) -> Self {
        Self::new(
            Layout::landscape(),
            config.palette,
            config.banner().as_str(),
            usize::from(config.ui.animation_frames),
        )
    }

    /// Redraw every region on the next pass regardless of content
    pub fn request_full_redraw(&mut self) {
        self.force_redraw = true;
    }

    pub const fn force_redraw_pending(&self) -> bool {
        self.force_redraw
    }

    pub const fn fps(&self) -> u32 {
        self.frame_rate.fps()
    }

    /// Frame the next pass will draw
    pub const fn animation_frame(&self) -> usize {
        self.animation.current()
    }

    pub const fn animation_bounds(&self) -> Rect {
        self.animation_bounds
    }

    pub fn cached_clock(&self) -> Option<&str> {
        self.clock.cached().map(|s| s.as_str())
    }

    pub fn cached_seconds(&self) -> Option<&str> {
        self.seconds.cached().map(|s| s.as_str())
    }

    pub fn cached_status(&self) -> Option<&StatusView> {
        self.status.cached()
    }

    pub fn cached_fps(&self) -> Option<u32> {
        self.fps.cached().copied()
    }

    /// Draw the animation and every dirty region, then compose
    ///
    /// Regions are visited in [`COMPOSITION_ORDER`]. Time regions are
    /// skipped entirely while `inputs.time` is `None`.
    pub fn render<D: DisplayBackend>(
        &mut self,
        inputs: &RenderInputs<'_>,
        display: &mut D,
    ) -> RenderOutcome {
        let mut outcome = RenderOutcome::default();
        let force = self.force_redraw;

        let frame = self.animation.current();
        outcome.record(RegionId::Animation, display.draw_animation_frame(frame));

        refresh(&mut self.banner, self.banner_text.clone(), force, display, &mut outcome, |d, b, v| {
            draw::banner(d, b, v.as_str())
        });

        if let Some(time) = inputs.time {
            refresh(&mut self.clock, time.clock_text(), force, display, &mut outcome, |d, b, v| {
                draw::clock(d, b, v.as_str())
            });
            refresh(&mut self.date, time.date_text(), force, display, &mut outcome, |d, b, v| {
                draw::date(d, b, v.as_str())
            });
            refresh(&mut self.seconds, time.second.clone(), force, display, &mut outcome, |d, b, v| {
                draw::seconds(d, b, v.as_str())
            });
            refresh(&mut self.weekday, time.weekday_badge(), force, display, &mut outcome, |d, b, v| {
                draw::weekday(d, b, v.as_str())
            });
        }

        let palette = self.palette;
        refresh(&mut self.status, inputs.status, force, display, &mut outcome, |d, b, v| {
            draw::status(d, b, v, &palette)
        });
        refresh(&mut self.fps, self.frame_rate.fps(), force, display, &mut outcome, |d, b, v| {
            draw::fps(d, b, *v)
        });

        if let Err(err) = display.compose(&COMPOSITION_ORDER) {
            outcome.error.get_or_insert(err);
        }

        self.force_redraw = false;
        outcome
    }

    /// Account for a finished frame
    ///
    /// Counts the frame towards the FPS window and advances the
    /// animation. Returns the new FPS value when a window closed.
    pub fn end_frame(&mut self, now_ms: u64) -> Option<u32> {
        self.animation.advance();
        self.frame_rate.record_frame(now_ms)
    }
}

/// Redraw one region if its value changed or a redraw is forced
fn refresh<T, D, F>(
    region: &mut RenderRegion<T>,
    value: T,
    force: bool,
    display: &mut D,
    outcome: &mut RenderOutcome,
    draw: F,
) where
    T: PartialEq + Clone,
    D: DisplayBackend,
    F: FnOnce(&mut D, Rect, &T) -> Result<(), DisplayError>,
{
    if !region.mark(&value, force) {
        return;
    }
    let id = region.id();
    if outcome.record(id, draw(display, region.bounds(), &value)).is_some() {
        region.commit(value);
    }
}
