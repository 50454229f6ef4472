//! Board-agnostic core logic for the network clock
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Collaborator traits (clock, transport, time source, display, input)
//! - Link supervisor state machine with bounded retries and cooldown
//! - Time authority extrapolating a wall clock between network syncs
//! - Render cache that redraws only the regions whose content changed
//! - Frame driver sequencing the above once per loop iteration
//! - Configuration types and a small TOML-subset parser
//!
//! Everything is polled from a single cooperative loop. No component
//! blocks; every wait is an elapsed-time comparison against the
//! injected [`traits::Clock`].

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod driver;
pub mod input;
pub mod link;
pub mod render;
pub mod time;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use driver::{FrameDriver, SystemState, TickReport};
