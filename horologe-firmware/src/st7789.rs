//! ST7789 TFT Display Driver
//!
//! Driver for 320x170 ST7789-based IPS panels via SPI, drawing into a
//! full RGB565 frame buffer that is pushed to the panel in one pass.

use embassy_time::Timer;
use embedded_graphics::pixelcolor::{IntoStorage, Rgb565};
use embedded_graphics::prelude::*;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use horologe_core::render::{SCREEN_HEIGHT, SCREEN_WIDTH};
use horologe_display::Present;

/// Display dimensions
const WIDTH: usize = SCREEN_WIDTH as usize;
const HEIGHT: usize = SCREEN_HEIGHT as usize;

/// Pixels in one frame
pub const FRAME_PIXELS: usize = WIDTH * HEIGHT;

/// The 170-pixel axis sits in the middle of the controller's 240-line RAM
const ROW_OFFSET: u16 = 35;

/// ST7789 commands
#[allow(dead_code)]
mod cmd {
    pub const SWRESET: u8 = 0x01;
    pub const SLPOUT: u8 = 0x11;
    pub const NORON: u8 = 0x13;
    pub const INVON: u8 = 0x21;
    pub const DISPOFF: u8 = 0x28;
    pub const DISPON: u8 = 0x29;
    pub const CASET: u8 = 0x2A;
    pub const RASET: u8 = 0x2B;
    pub const RAMWR: u8 = 0x2C;
    pub const MADCTL: u8 = 0x36;
    pub const COLMOD: u8 = 0x3A;
}

/// Memory access control: row/column exchange for landscape, RGB order
const MADCTL_LANDSCAPE: u8 = 0x60;

/// 16 bits per pixel
const COLMOD_RGB565: u8 = 0x55;

/// Bus or pin failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    Spi,
    Pin,
}

/// ST7789 TFT driver
pub struct St7789<SPI, PIN> {
    spi: SPI,
    dc: PIN,
    cs: PIN,
    rst: PIN,
    /// Frame buffer, row major, native RGB565
    frame: &'static mut [u16; FRAME_PIXELS],
}

impl<SPI, PIN> St7789<SPI, PIN>
where
    SPI: SpiBus,
    PIN: OutputPin,
{
    /// Create a new ST7789 driver
    pub fn new(spi: SPI, dc: PIN, cs: PIN, rst: PIN, frame: &'static mut [u16; FRAME_PIXELS]) -> Self {
        Self {
            spi,
            dc,
            cs,
            rst,
            frame,
        }
    }

    /// Reset and initialize the panel
    pub async fn init(&mut self) -> Result<(), Error> {
        self.rst.set_low().map_err(|_| Error::Pin)?;
        Timer::after_millis(10).await;
        self.rst.set_high().map_err(|_| Error::Pin)?;
        Timer::after_millis(120).await;

        self.command(cmd::SWRESET, &[])?;
        Timer::after_millis(150).await;
        self.command(cmd::SLPOUT, &[])?;
        Timer::after_millis(10).await;
        self.command(cmd::COLMOD, &[COLMOD_RGB565])?;
        self.command(cmd::MADCTL, &[MADCTL_LANDSCAPE])?;
        // IPS panels need inversion for true colours
        self.command(cmd::INVON, &[])?;
        self.command(cmd::NORON, &[])?;
        self.command(cmd::DISPON, &[])?;
        Timer::after_millis(10).await;

        self.frame.fill(0);
        self.present()
    }

    /// Send a command followed by its parameter bytes
    fn command(&mut self, command: u8, params: &[u8]) -> Result<(), Error> {
        self.cs.set_low().map_err(|_| Error::Pin)?;
        self.dc.set_low().map_err(|_| Error::Pin)?;
        self.spi.write(&[command]).map_err(|_| Error::Spi)?;
        if !params.is_empty() {
            self.dc.set_high().map_err(|_| Error::Pin)?;
            self.spi.write(params).map_err(|_| Error::Spi)?;
        }
        self.spi.flush().map_err(|_| Error::Spi)?;
        self.cs.set_high().map_err(|_| Error::Pin)
    }

    /// Address the whole panel for a RAM write
    fn set_window(&mut self) -> Result<(), Error> {
        let x1 = (WIDTH - 1) as u16;
        let (y0, y1) = (ROW_OFFSET, ROW_OFFSET + HEIGHT as u16 - 1);
        self.command(cmd::CASET, &[0, 0, (x1 >> 8) as u8, x1 as u8])?;
        self.command(
            cmd::RASET,
            &[(y0 >> 8) as u8, y0 as u8, (y1 >> 8) as u8, y1 as u8],
        )
    }
}

impl<SPI, PIN> Present for St7789<SPI, PIN>
where
    SPI: SpiBus,
    PIN: OutputPin,
{
    type Error = Error;

    /// Flush the frame buffer to the display
    fn present(&mut self) -> Result<(), Error> {
        self.set_window()?;
        self.command(cmd::RAMWR, &[])?;

        self.cs.set_low().map_err(|_| Error::Pin)?;
        self.dc.set_high().map_err(|_| Error::Pin)?;
        let mut row = [0u8; WIDTH * 2];
        for line in self.frame.chunks_exact(WIDTH) {
            for (bytes, pixel) in row.chunks_exact_mut(2).zip(line) {
                bytes.copy_from_slice(&pixel.to_be_bytes());
            }
            self.spi.write(&row).map_err(|_| Error::Spi)?;
        }
        self.spi.flush().map_err(|_| Error::Spi)?;
        self.cs.set_high().map_err(|_| Error::Pin)
    }
}

impl<SPI, PIN> OriginDimensions for St7789<SPI, PIN> {
    fn size(&self) -> Size {
        Size::new(SCREEN_WIDTH, SCREEN_HEIGHT)
    }
}

impl<SPI, PIN> DrawTarget for St7789<SPI, PIN> {
    type Color = Rgb565;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(at, color) in pixels {
            if at.x < 0 || at.y < 0 || at.x >= WIDTH as i32 || at.y >= HEIGHT as i32 {
                continue;
            }
            self.frame[at.y as usize * WIDTH + at.x as usize] = color.into_storage();
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.frame.fill(color.into_storage());
        Ok(())
    }
}
