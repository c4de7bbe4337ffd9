//! # Buzzer
//! Drives a passive piezo buzzer with a square wave from one PWM channel.
//!
//! The alarm core decides when and at what pitch the buzzer sounds; this module only turns a
//! pitch into a PWM period with 50% duty, or into silence.

use alarm_core::ToneOutput;
use defmt::{debug, info};
use embassy_rp::clocks::clk_sys_freq;
use embassy_rp::pwm::{Config, Pwm};

use crate::task::resources::BuzzerResources;

/// Clock divider of the PWM slice; keeps every audible pitch within the 16 bit counter
const PWM_DIVIDER: u8 = 64;

/// A buzzer on channel A of one PWM slice
pub struct PwmBuzzer {
    /// The PWM slice
    pwm: Pwm<'static>,
    /// The configuration last written to the slice
    config: Config,
}

impl PwmBuzzer {
    /// Set up the slice, silent
    pub fn new(r: BuzzerResources) -> Self {
        let mut config = Config::default();
        config.divider = PWM_DIVIDER.into();
        config.compare_a = 0;
        let pwm = Pwm::new_output_a(r.slice, r.pin, config.clone());
        info!("Buzzer ready");
        Self { pwm, config }
    }

    /// Counter top for a square wave at `pitch_hz`
    fn top_for(pitch_hz: u16) -> u16 {
        let ticks = clk_sys_freq() / u32::from(PWM_DIVIDER) / u32::from(pitch_hz.max(1));
        u16::try_from(ticks.saturating_sub(1)).unwrap_or(u16::MAX)
    }
}

impl ToneOutput for PwmBuzzer {
    fn start(&mut self, pitch_hz: u16) {
        let top = Self::top_for(pitch_hz);
        debug!("Buzzer {} Hz, top {}", pitch_hz, top);
        self.config.top = top;
        self.config.compare_a = top / 2;
        self.pwm.set_config(&self.config);
    }

    fn silence(&mut self) {
        self.config.compare_a = 0;
        self.pwm.set_config(&self.config);
    }
}
