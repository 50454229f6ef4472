//! Button and backlight adapters

use embassy_rp::pwm::{Config as PwmConfig, Pwm};

use horologe_core::traits::{Backlight, ButtonEvent, InputSource};

use crate::channels::BUTTON_EVENTS;

/// PWM counter wrap for the backlight (125 MHz / 4096 ≈ 30 kHz)
const BACKLIGHT_TOP: u16 = 4095;

/// [`InputSource`] draining the button task's channel
#[derive(Debug, Default)]
pub struct ButtonQueue;

impl InputSource for ButtonQueue {
    fn poll(&mut self) -> Option<ButtonEvent> {
        BUTTON_EVENTS.try_receive().ok()
    }
}

/// Backlight LED on PWM channel B
pub struct PwmBacklight {
    pwm: Pwm<'static>,
    config: PwmConfig,
}

impl PwmBacklight {
    /// Take over the slice, starting dark
    pub fn new(mut pwm: Pwm<'static>) -> Self {
        let mut config = PwmConfig::default();
        config.top = BACKLIGHT_TOP;
        config.compare_b = 0;
        pwm.set_config(&config);
        Self { pwm, config }
    }
}

impl Backlight for PwmBacklight {
    fn set_level(&mut self, level: u8) {
        self.config.compare_b = (u32::from(level) * u32::from(BACKLIGHT_TOP) / 255) as u16;
        self.pwm.set_config(&self.config);
    }
}
