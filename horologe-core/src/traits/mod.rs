//! Collaborator traits
//!
//! These traits define the interface between the application logic
//! and the services it drives: the tick source, the wireless link, the
//! authoritative time source, the display and the buttons.

pub mod clock;
pub mod display;
pub mod input;
pub mod time_source;
pub mod transport;

pub use clock::Clock;
pub use display::{Anchor, DisplayBackend, DisplayError, Font, TextStyle};
pub use input::{Backlight, ButtonEvent, InputSource};
pub use time_source::TimeSource;
pub use transport::{LinkEvent, NetAddress, Transport};
