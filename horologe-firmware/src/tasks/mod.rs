//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod buttons;
pub mod frame;
pub mod modem;

pub use buttons::buttons_task;
pub use frame::frame_task;
pub use modem::modem_task;
