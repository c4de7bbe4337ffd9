//! # Alarm core
//! Board-agnostic alarm engine of the ventilator controller.
//!
//! Everything that decides *whether* an alarm is on and *how* it is presented lives here,
//! independent of the RP2040 firmware that feeds it:
//!
//! - [`alarm`]: hysteresis debounce turning per-cycle conditions into latched alarms
//! - [`tone`]: polled, non-blocking tone sequences per alarm level
//! - [`beeper`]: tone arbitration and the timed snooze
//! - [`manager`]: the fixed alarm registry, priorities and display multiplexing
//! - [`display`]: the character-grid screen model the firmware renders
//! - [`health`]: task liveness for the watchdog feed
//!
//! The hardware seams are small traits ([`tone::ToneOutput`], [`beeper::SnoozeButton`],
//! [`display::TextDisplay`]) plus `embedded_hal::digital::OutputPin` for the alarm LED.
#![no_std]
#![deny(unsafe_code)]

// must stay first, the logging macros are used by the modules below
#[macro_use]
mod fmt;

pub mod alarm;
pub mod beeper;
pub mod config;
pub mod diagnostics;
pub mod display;
pub mod error;
pub mod health;
pub mod manager;
pub mod pulse;
pub mod registry;
pub mod time;
pub mod tone;

pub use alarm::{Alarm, AlarmLevel};
pub use beeper::{Beeper, SnoozeButton};
pub use diagnostics::Diagnostics;
pub use display::{Display, DisplayKey, TextDisplay, TextGrid};
pub use error::Error;
pub use health::TaskHealth;
pub use manager::AlarmManager;
pub use registry::{AlarmId, ConfirmSetting};
pub use time::Millis;
pub use tone::{Note, Tone, ToneOutput};
