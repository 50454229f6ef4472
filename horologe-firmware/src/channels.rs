//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! The frame task never awaits any of these: its adapters only use the
//! non-blocking `try_*` side.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use horologe_core::traits::{ButtonEvent, LinkEvent, NetAddress};

use crate::ntp::SntpAnswer;

/// Channel capacity for link events from the modem
const LINK_EVENT_CHANNEL_SIZE: usize = 4;

/// Channel capacity for button edges
const BUTTON_CHANNEL_SIZE: usize = 8;

/// Link layer view kept current by the modem task
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkStatus {
    pub up: bool,
    pub address: Option<NetAddress>,
}

/// Association changes reported by the radio module
pub static LINK_EVENTS: Channel<CriticalSectionRawMutex, LinkEvent, LINK_EVENT_CHANNEL_SIZE> =
    Channel::new();

/// Latest link status, readable without awaiting
pub static LINK_STATUS: Mutex<CriticalSectionRawMutex, Cell<LinkStatus>> =
    Mutex::new(Cell::new(LinkStatus {
        up: false,
        address: None,
    }));

/// Frame task wants a new association attempt
pub static CONNECT_REQUEST: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Frame task wants a fresh SNTP reading
pub static SYNC_REQUEST: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Newest SNTP reading (updated by the modem task)
pub static SNTP_ANSWER: Signal<CriticalSectionRawMutex, SntpAnswer> = Signal::new();

/// Debounced button edges
pub static BUTTON_EVENTS: Channel<CriticalSectionRawMutex, ButtonEvent, BUTTON_CHANNEL_SIZE> =
    Channel::new();

/// Read the current link status
pub fn link_status() -> LinkStatus {
    LINK_STATUS.lock(|status| status.get())
}

/// Replace the current link status
pub fn set_link_status(status: LinkStatus) {
    LINK_STATUS.lock(|cell| cell.set(status));
}
