//! Wireless link transport

use core::fmt::{self, Write};
use heapless::String;

/// Longest dotted-quad rendering ("255.255.255.255")
pub const ADDRESS_TEXT_LEN: usize = 15;

/// IPv4 address assigned to the station interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NetAddress(pub [u8; 4]);

impl NetAddress {
    /// Create an address from its four octets
    pub const fn new(a: u8, b: u8, c: u8, d: u8) -> Self {
        Self([a, b, c, d])
    }

    /// Get the octets
    pub const fn octets(&self) -> [u8; 4] {
        self.0
    }

    /// Parse a dotted quad such as "192.168.1.20"
    pub fn parse(text: &str) -> Option<Self> {
        let mut octets = [0u8; 4];
        let mut parts = text.split('.');
        for octet in &mut octets {
            let part = parts.next()?;
            if part.is_empty() || part.len() > 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            *octet = part.parse().ok()?;
        }
        if parts.next().is_some() {
            return None;
        }
        Some(Self(octets))
    }

    /// Render as a dotted quad for display
    pub fn to_text(&self) -> String<ADDRESS_TEXT_LEN> {
        let mut text = String::new();
        // Capacity covers the longest possible address
        let _ = write!(text, "{}", self);
        text
    }
}

impl fmt::Display for NetAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "{}.{}.{}.{}", a, b, c, d)
    }
}

/// Asynchronous link notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkEvent {
    /// Association complete and an address was assigned
    Established(NetAddress),
    /// Association dropped
    Lost,
}

/// Wireless link transport
///
/// Connecting is fire-and-forget: `request_connect` starts an attempt and
/// returns immediately. Completion (or loss) is reported later through
/// `poll_event`, which the frame driver drains once per tick.
pub trait Transport {
    /// Start (or restart) an association attempt
    fn request_connect(&mut self);

    /// Address currently assigned to the interface, if any
    fn current_address(&self) -> Option<NetAddress>;

    /// Whether the link layer currently reports the association as up
    fn is_link_up(&self) -> bool;

    /// Take the next pending link event, if any
    fn poll_event(&mut self) -> Option<LinkEvent>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dotted_quad() {
        assert_eq!(
            NetAddress::parse("192.168.1.20"),
            Some(NetAddress::new(192, 168, 1, 20))
        );
        assert_eq!(NetAddress::parse("0.0.0.0"), Some(NetAddress::new(0, 0, 0, 0)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(NetAddress::parse("192.168.1"), None);
        assert_eq!(NetAddress::parse("192.168.1.20.4"), None);
        assert_eq!(NetAddress::parse("256.1.1.1"), None);
        assert_eq!(NetAddress::parse("1..1.1"), None);
        assert_eq!(NetAddress::parse("+1.1.1.1"), None);
    }

    #[test]
    fn test_to_text() {
        let addr = NetAddress::new(255, 255, 255, 255);
        assert_eq!(addr.to_text().as_str(), "255.255.255.255");
        assert_eq!(NetAddress::new(10, 0, 0, 7).to_text().as_str(), "10.0.0.7");
    }
}
