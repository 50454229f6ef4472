//! Layered embedded-graphics renderer for the Horologe clock
//!
//! This crate provides:
//! - `LayeredCanvas`, the core's display-primitive trait for any RGB565
//!   `DrawTarget` frame buffer
//! - `Layer`, an off-screen buffer per overlay region
//! - `AnimationFrames` sources: raw RGB565 frames or procedural bars
//!
//! # Architecture
//!
//! Overlay regions draw into their own layers in region-local
//! coordinates, so an unchanged region costs nothing per frame. Each
//! tick the animation is painted into the frame buffer and the layers
//! are stacked on top in composition order, skipping transparent
//! pixels. The finished frame is then handed to `Present`.

#![cfg_attr(not(test), no_std)]

pub mod animation;
pub mod canvas;
pub mod layer;

// Re-export key types
pub use animation::{AnimationFrames, RainbowBars, RawFrames};
pub use canvas::{overlay_pixels, LayeredCanvas, Present};
pub use layer::{Layer, TRANSPARENT};
