//! Link transport adapter
//!
//! The modem task owns the radio; this side only posts requests and reads
//! what the modem task published.

use horologe_core::traits::{LinkEvent, NetAddress, Transport};

use crate::channels::{link_status, CONNECT_REQUEST, LINK_EVENTS};

/// [`Transport`] over the modem task's channels
#[derive(Debug, Default)]
pub struct ModemTransport;

impl Transport for ModemTransport {
    fn request_connect(&mut self) {
        CONNECT_REQUEST.signal(());
    }

    fn current_address(&self) -> Option<NetAddress> {
        link_status().address
    }

    fn is_link_up(&self) -> bool {
        link_status().up
    }

    fn poll_event(&mut self) -> Option<LinkEvent> {
        LINK_EVENTS.try_receive().ok()
    }
}
