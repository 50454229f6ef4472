//! Frame task
//!
//! Owns the frame driver and runs the clock loop: one tick, then a short
//! yield so the modem and button tasks get to run.

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_rp::peripherals::SPI0;
use embassy_rp::spi::{Blocking, Spi};
use embassy_time::Timer;

use horologe_core::time::SyncOutcome;
use horologe_core::{FrameDriver, TickReport};
use horologe_display::{LayeredCanvas, RainbowBars};

use crate::clock::UptimeClock;
use crate::input::{ButtonQueue, PwmBacklight};
use crate::link::ModemTransport;
use crate::ntp::ModemTimeSource;
use crate::st7789::St7789;

/// The ST7789 on SPI0
pub type Panel = St7789<Spi<'static, SPI0, Blocking>, Output<'static>>;

/// Panel plus overlay layers
pub type Canvas = LayeredCanvas<'static, Panel, RainbowBars>;

/// Frame driver with the board's collaborators
pub type ClockDriver =
    FrameDriver<UptimeClock, ModemTransport, ModemTimeSource, Canvas, ButtonQueue, PwmBacklight>;

/// Frame task - ticks the driver forever
#[embassy_executor::task]
pub async fn frame_task(mut driver: ClockDriver, frame_delay_ms: u32) {
    info!("Frame task started");

    loop {
        let report = driver.tick();
        log_report(&report);
        Timer::after_millis(u64::from(frame_delay_ms)).await;
    }
}

fn log_report(report: &TickReport) {
    for transition in &report.transitions {
        info!(
            "Link {} -> {} on {:?}",
            transition.from.label(),
            transition.to.label(),
            transition.input
        );
    }

    match report.sync {
        Some(SyncOutcome::Synced { epoch, forced }) => {
            info!("Time synced: epoch {} (forced: {})", epoch, forced);
        }
        Some(SyncOutcome::Failed { forced }) => warn!("Time sync failed (forced: {})", forced),
        None => {}
    }

    trace!("Redrew {} region(s)", report.render.redrawn.len());
    if let Some(error) = report.render.error {
        warn!(
            "Render failed in {} region(s): {:?}",
            report.render.failed.len(),
            error
        );
    }

    if let Some(fps) = report.fps {
        debug!("{} fps", fps);
    }

    if let Some(level) = report.brightness {
        info!("Backlight level {}", level);
    }
}
