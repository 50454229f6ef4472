//! Button polling task
//!
//! Samples the two active-low brightness buttons and turns presses into
//! button events. A press is counted once, on the falling edge.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::{Duration, Ticker};

use horologe_core::input::EdgeDetector;
use horologe_core::traits::ButtonEvent;

use crate::channels::BUTTON_EVENTS;

/// Poll interval; long enough to ride out contact bounce
const BUTTON_POLL_MS: u64 = 20;

/// Button task - polls both buttons and queues their presses
#[embassy_executor::task]
pub async fn buttons_task(up: Input<'static>, down: Input<'static>) {
    info!("Buttons task started");

    let mut buttons = [
        (up, EdgeDetector::new(), ButtonEvent::Increase),
        (down, EdgeDetector::new(), ButtonEvent::Decrease),
    ];
    let mut ticker = Ticker::every(Duration::from_millis(BUTTON_POLL_MS));

    loop {
        ticker.next().await;

        for (pin, edge, event) in buttons.iter_mut() {
            if edge.update(pin.is_high()) {
                debug!("Button press: {:?}", event);
                // Send to button channel, dropping if full
                if BUTTON_EVENTS.try_send(*event).is_err() {
                    warn!("Button channel full, dropping event");
                }
            }
        }
    }
}
