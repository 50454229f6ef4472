//! Monotonic clock backed by the embassy time driver

use embassy_time::Instant;

use horologe_core::traits::Clock;

/// Milliseconds since boot
#[derive(Debug, Clone, Copy, Default)]
pub struct UptimeClock;

impl Clock for UptimeClock {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }
}
