//! Horologe - Network Clock Firmware
//!
//! Main firmware binary for an RP2040 driving a 320x170 ST7789 panel, with
//! an ESP-AT module providing WiFi and SNTP over UART.
//!
//! Named after the old word for a timepiece - a clock that keeps its own
//! time between visits to the network.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::pwm::Pwm;
use embassy_rp::spi::{self, Spi};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embedded_graphics::prelude::Size;
use static_cell::{ConstStaticCell, StaticCell};
use {defmt_rtt as _, panic_probe as _};

use horologe_core::config::ClockConfig;
use horologe_core::render::{Layout, RegionId};
use horologe_core::FrameDriver;
use horologe_display::{overlay_pixels, LayeredCanvas, RainbowBars};

use crate::clock::UptimeClock;
use crate::input::{ButtonQueue, PwmBacklight};
use crate::link::ModemTransport;
use crate::ntp::ModemTimeSource;
use crate::st7789::{St7789, FRAME_PIXELS};

mod channels;
mod clock;
mod config;
mod input;
mod link;
mod ntp;
mod st7789;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

/// ST7789 SPI clock
const SPI_FREQUENCY_HZ: u32 = 62_500_000;

/// Pixels backing the overlay layers of the panel layout
const LAYER_POOL_PIXELS: usize = overlay_pixels(&Layout::landscape());

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 512]> = StaticCell::new();

// Configuration is shared by the modem and frame tasks
static CLOCK_CONFIG: StaticCell<ClockConfig> = StaticCell::new();

// Pixel buffers are too large for the stack; they live in .bss
static FRAME_BUFFER: ConstStaticCell<[u16; FRAME_PIXELS]> = ConstStaticCell::new([0; FRAME_PIXELS]);
static LAYER_POOL: ConstStaticCell<[u16; LAYER_POOL_PIXELS]> =
    ConstStaticCell::new([0; LAYER_POOL_PIXELS]);

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Horologe firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config: &'static ClockConfig = CLOCK_CONFIG.init(config::load());
    info!("Configuration loaded: {}", config.banner().as_str());

    // Setup UART for the radio module (GPIO0 TX, GPIO1 RX), 115200 8N1
    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 512]);
    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, UartConfig::default());
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized for radio module");

    // Setup SPI for the panel (GPIO18 SCK, GPIO19 MOSI, GPIO17 CS, GPIO16 DC, GPIO20 RST)
    let mut spi_config = spi::Config::default();
    spi_config.frequency = SPI_FREQUENCY_HZ;
    let spi = Spi::new_blocking_txonly(p.SPI0, p.PIN_18, p.PIN_19, spi_config);

    let mut panel = St7789::new(
        spi,
        Output::new(p.PIN_16, Level::Low),
        Output::new(p.PIN_17, Level::High),
        Output::new(p.PIN_20, Level::High),
        FRAME_BUFFER.take(),
    );
    if let Err(e) = panel.init().await {
        error!("Failed to initialize display: {:?}", e);
    } else {
        info!("Display initialized");
    }

    let layout = Layout::landscape();
    let stage = layout.bounds(RegionId::Animation);
    let animation = RainbowBars::new(
        Size::new(stage.width, stage.height),
        usize::from(config.ui.animation_frames),
    );
    let mut canvas = LayeredCanvas::new(panel, animation, layout);
    if let Err(e) = canvas.attach_layers(LAYER_POOL.take()) {
        error!("Failed to attach overlay layers: {:?}", e);
    }

    // Setup backlight PWM (GPIO21, slice 2 channel B)
    let backlight = PwmBacklight::new(Pwm::new_output_b(p.PWM_SLICE2, p.PIN_21, Default::default()));

    // Setup brightness buttons, active low (GPIO14 up, GPIO15 down)
    let up = Input::new(p.PIN_14, Pull::Up);
    let down = Input::new(p.PIN_15, Pull::Up);

    let driver = FrameDriver::new(
        config,
        UptimeClock,
        ModemTransport,
        ModemTimeSource,
        canvas,
        ButtonQueue,
        backlight,
    );

    // Spawn tasks
    spawner.spawn(tasks::modem_task(tx, rx, config)).unwrap();
    spawner.spawn(tasks::buttons_task(up, down)).unwrap();
    spawner
        .spawn(tasks::frame_task(driver, config.ui.frame_delay_ms))
        .unwrap();

    info!("All tasks spawned, clock running");
}
