//! Off-screen RGB565 layer
//!
//! One layer backs each overlay region. Pixels equal to [`TRANSPARENT`]
//! are skipped when the layer is stacked onto the frame.

use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::pixelcolor::{IntoStorage, Rgb565};
use embedded_graphics::prelude::*;
use horologe_core::traits::DisplayError;

/// Colour key treated as "nothing drawn here"
pub const TRANSPARENT: Rgb565 = Rgb565::BLACK;

/// Region-sized pixel buffer borrowed from the caller
pub struct Layer<'a> {
    pixels: &'a mut [u16],
    size: Size,
}

impl<'a> Layer<'a> {
    /// Wrap a buffer of at least `size.width * size.height` pixels
    ///
    /// The layer starts out fully transparent.
    pub fn new(pixels: &'a mut [u16], size: Size) -> Result<Self, DisplayError> {
        let len = (size.width * size.height) as usize;
        if pixels.len() < len {
            return Err(DisplayError::BufferTooSmall);
        }
        let pixels = &mut pixels[..len];
        pixels.fill(TRANSPARENT.into_storage());
        Ok(Self { pixels, size })
    }

    /// Reset every pixel to the transparent key
    pub fn reset(&mut self) {
        self.pixels.fill(TRANSPARENT.into_storage());
    }

    /// Colour at a layer-local position, `None` outside the layer
    pub fn pixel(&self, at: Point) -> Option<Rgb565> {
        self.index(at)
            .map(|i| Rgb565::from(RawU16::new(self.pixels[i])))
    }

    /// Opaque pixels in layer-local coordinates, row by row
    pub fn opaque_pixels(&self) -> impl Iterator<Item = Pixel<Rgb565>> + '_ {
        let width = self.size.width as usize;
        let key = TRANSPARENT.into_storage();
        self.pixels
            .iter()
            .enumerate()
            .filter(move |(_, raw)| **raw != key)
            .map(move |(i, raw)| {
                let at = Point::new((i % width) as i32, (i / width) as i32);
                Pixel(at, Rgb565::from(RawU16::new(*raw)))
            })
    }

    fn index(&self, at: Point) -> Option<usize> {
        let (w, h) = (self.size.width as i32, self.size.height as i32);
        if at.x < 0 || at.y < 0 || at.x >= w || at.y >= h {
            return None;
        }
        Some((at.y * w + at.x) as usize)
    }
}

impl OriginDimensions for Layer<'_> {
    fn size(&self) -> Size {
        self.size
    }
}

impl DrawTarget for Layer<'_> {
    type Color = Rgb565;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(at, color) in pixels {
            // Clip silently, like a panel would
            if let Some(i) = self.index(at) {
                self.pixels[i] = color.into_storage();
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.pixels.fill(color.into_storage());
        Ok(())
    }
}
