//! Animation frame sources
//!
//! The frame drawn each tick comes from an [`AnimationFrames`]
//! implementation. Frame assets are supplied by the firmware; this crate
//! only knows how to put them on screen.

use embedded_graphics::image::{Image, ImageRawBE};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

/// A looping sequence of full-region frames
pub trait AnimationFrames {
    /// Number of frames in the loop
    fn frame_count(&self) -> usize;

    /// Draw frame `frame` with its top-left corner at the target origin
    ///
    /// Returns `false` if `frame` is out of range; nothing is drawn then.
    fn draw_frame<T>(&self, frame: usize, target: &mut T) -> Result<bool, T::Error>
    where
        T: DrawTarget<Color = Rgb565>;
}

/// Frames stored as raw big-endian RGB565 images
pub struct RawFrames<'a> {
    frames: &'a [&'a [u8]],
    width: u32,
}

impl<'a> RawFrames<'a> {
    /// Every frame must be `width` pixels wide, two bytes per pixel
    pub const fn new(frames: &'a [&'a [u8]], width: u32) -> Self {
        Self { frames, width }
    }
}

impl AnimationFrames for RawFrames<'_> {
    fn frame_count(&self) -> usize {
        self.frames.len()
    }

    fn draw_frame<T>(&self, frame: usize, target: &mut T) -> Result<bool, T::Error>
    where
        T: DrawTarget<Color = Rgb565>,
    {
        let Some(data) = self.frames.get(frame) else {
            return Ok(false);
        };
        let raw = ImageRawBE::<Rgb565>::new(data, self.width);
        Image::new(&raw, Point::zero()).draw(target)?;
        Ok(true)
    }
}

/// Procedural stand-in: vertical colour bars scrolling one bar per frame
pub struct RainbowBars {
    size: Size,
    frames: usize,
    bar_width: u32,
}

const BAR_COLORS: [Rgb565; 6] = [
    Rgb565::RED,
    Rgb565::YELLOW,
    Rgb565::GREEN,
    Rgb565::CYAN,
    Rgb565::BLUE,
    Rgb565::MAGENTA,
];

impl RainbowBars {
    pub const fn new(size: Size, frames: usize) -> Self {
        Self {
            size,
            frames,
            bar_width: 8,
        }
    }

    fn color_at(&self, bar: usize, frame: usize) -> Rgb565 {
        BAR_COLORS[(bar + frame) % BAR_COLORS.len()]
    }
}

impl AnimationFrames for RainbowBars {
    fn frame_count(&self) -> usize {
        self.frames
    }

    fn draw_frame<T>(&self, frame: usize, target: &mut T) -> Result<bool, T::Error>
    where
        T: DrawTarget<Color = Rgb565>,
    {
        if frame >= self.frames {
            return Ok(false);
        }
        let bars = self.size.width.div_ceil(self.bar_width) as usize;
        for bar in 0..bars {
            let x = (bar as u32 * self.bar_width) as i32;
            let width = self.bar_width.min(self.size.width - x as u32);
            Rectangle::new(Point::new(x, 0), Size::new(width, self.size.height))
                .into_styled(PrimitiveStyle::with_fill(self.color_at(bar, frame)))
                .draw(target)?;
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::mock_display::MockDisplay;

    #[test]
    fn test_rainbow_scrolls() {
        let bars = RainbowBars::new(Size::new(20, 4), 6);
        let mut display = MockDisplay::<Rgb565>::new();
        assert_eq!(bars.draw_frame(0, &mut display), Ok(true));
        assert_eq!(display.get_pixel(Point::new(0, 0)), Some(Rgb565::RED));
        assert_eq!(display.get_pixel(Point::new(8, 3)), Some(Rgb565::YELLOW));
        // Last bar is clipped to the region width
        assert_eq!(display.get_pixel(Point::new(19, 0)), Some(Rgb565::GREEN));
        assert_eq!(display.get_pixel(Point::new(20, 0)), None);

        let mut display = MockDisplay::<Rgb565>::new();
        bars.draw_frame(1, &mut display).unwrap();
        assert_eq!(display.get_pixel(Point::new(0, 0)), Some(Rgb565::YELLOW));
    }

    #[test]
    fn test_out_of_range_frame() {
        let bars = RainbowBars::new(Size::new(8, 8), 2);
        let mut display = MockDisplay::<Rgb565>::new();
        assert_eq!(bars.draw_frame(2, &mut display), Ok(false));
        assert_eq!(display.affected_area(), Rectangle::zero());
    }

    #[test]
    fn test_raw_frames() {
        // 2x1 frames: red then blue
        const RED: [u8; 4] = [0xF8, 0x00, 0xF8, 0x00];
        const BLUE: [u8; 4] = [0x00, 0x1F, 0x00, 0x1F];
        let frames: [&[u8]; 2] = [&RED, &BLUE];
        let raw = RawFrames::new(&frames, 2);
        assert_eq!(raw.frame_count(), 2);

        let mut display = MockDisplay::<Rgb565>::new();
        raw.draw_frame(1, &mut display).unwrap();
        assert_eq!(display.get_pixel(Point::new(1, 0)), Some(Rgb565::BLUE));
        assert_eq!(raw.draw_frame(5, &mut display), Ok(false));
    }
}
