//! Per-region drawing
//!
//! Each function paints one region from scratch in region-local
//! coordinates. Callers only invoke them for regions that are dirty.

use core::fmt::Write;
use heapless::String;

use crate::link::{LinkState, StatusView};
use crate::traits::{DisplayBackend, DisplayError, Font, TextStyle};

use super::geometry::{Point, Rect};
use super::palette::{Color, Palette};
use super::region::RegionId;

/// Corner radius of every panel
const CORNER_RADIUS: u32 = 3;

/// Indicator dot radius
const DOT_RADIUS: u32 = 5;

/// Header banner: outlined box with the title text
pub fn banner<D: DisplayBackend>(
    display: &mut D,
    bounds: Rect,
    text: &str,
) -> Result<(), DisplayError> {
    let area = bounds.local();
    display.clear_region(RegionId::Banner)?;
    display.draw_round_rect(RegionId::Banner, area, CORNER_RADIUS, Color::WHITE)?;
    display.draw_text(
        RegionId::Banner,
        text,
        Point::new(8, area.center().y),
        TextStyle::left(Font::Medium, Color::WHITE),
    )
}

/// "HH:MM" on a white panel
pub fn clock<D: DisplayBackend>(
    display: &mut D,
    bounds: Rect,
    text: &str,
) -> Result<(), DisplayError> {
    panel_text(display, RegionId::Clock, bounds, text, Font::Large)
}

/// "DD Mon 'YY" on a white panel
pub fn date<D: DisplayBackend>(
    display: &mut D,
    bounds: Rect,
    text: &str,
) -> Result<(), DisplayError> {
    panel_text(display, RegionId::Date, bounds, text, Font::Small)
}

fn panel_text<D: DisplayBackend>(
    display: &mut D,
    region: RegionId,
    bounds: Rect,
    text: &str,
    font: Font,
) -> Result<(), DisplayError> {
    let area = bounds.local();
    display.clear_region(region)?;
    display.fill_round_rect(region, area, CORNER_RADIUS, Color::WHITE)?;
    display.draw_text(
        region,
        text,
        area.center(),
        TextStyle::centered(font, Color::PURPLE).on(Color::WHITE),
    )
}

/// Large seconds digits
pub fn seconds<D: DisplayBackend>(
    display: &mut D,
    bounds: Rect,
    text: &str,
) -> Result<(), DisplayError> {
    let area = bounds.local();
    display.clear_region(RegionId::Seconds)?;
    display.draw_text(
        RegionId::Seconds,
        text,
        area.center(),
        TextStyle::centered(Font::Large, Color::WHITE),
    )
}

/// Outlined weekday badge ("MON")
pub fn weekday<D: DisplayBackend>(
    display: &mut D,
    bounds: Rect,
    text: &str,
) -> Result<(), DisplayError> {
    let area = bounds.local();
    display.clear_region(RegionId::Weekday)?;
    display.draw_round_rect(RegionId::Weekday, area, CORNER_RADIUS, Color::WHITE)?;
    display.draw_text(
        RegionId::Weekday,
        text,
        area.center(),
        TextStyle::centered(Font::Medium, Color::WHITE),
    )
}

/// "WIFI:" label, indicator dot and address or state text
pub fn status<D: DisplayBackend>(
    display: &mut D,
    bounds: Rect,
    view: &StatusView,
    palette: &Palette,
) -> Result<(), DisplayError> {
    let area = bounds.local();
    let top = area.height as i32 / 4;
    let bottom = area.height as i32 * 3 / 4;

    display.clear_region(RegionId::Status)?;
    display.draw_text(
        RegionId::Status,
        "WIFI:",
        Point::new(area.center().x - 14, top),
        TextStyle::centered(Font::Small, Color::WHITE),
    )?;
    display.fill_circle(
        RegionId::Status,
        Point::new(area.center().x + 16, top),
        DOT_RADIUS,
        palette.color_for(view.state),
        Color::WHITE,
    )?;

    let detail = Point::new(area.center().x, bottom);
    let style = TextStyle::centered(Font::Small, Color::WHITE);
    match (view.state, view.address) {
        (LinkState::Connected, Some(address)) => {
            display.draw_text(RegionId::Status, address.to_text().as_str(), detail, style)
        }
        (state, _) => display.draw_text(RegionId::Status, state.label(), detail, style),
    }
}

/// Outlined frames-per-second counter
pub fn fps<D: DisplayBackend>(display: &mut D, bounds: Rect, fps: u32) -> Result<(), DisplayError> {
    let area = bounds.local();
    let mid = area.center().y;
    let mut digits: String<10> = String::new();
    // u32 always fits in 10 digits
    let _ = write!(digits, "{}", fps);

    display.clear_region(RegionId::Fps)?;
    display.draw_round_rect(RegionId::Fps, area, CORNER_RADIUS, Color::WHITE)?;
    display.draw_text(
        RegionId::Fps,
        digits.as_str(),
        Point::new(area.width as i32 * 3 / 10, mid),
        TextStyle::centered(Font::Small, Color::WHITE),
    )?;
    display.draw_text(
        RegionId::Fps,
        "FPS",
        Point::new(area.width as i32 * 2 / 3, mid),
        TextStyle::centered(Font::Small, Color::WHITE),
    )
}
