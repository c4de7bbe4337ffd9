//! # Timing and layout constants
//! All alarm timing is fixed at compile time. The per-alarm thresholds live in
//! [`crate::registry::AlarmId::profile`].

/// Time during which alarms are silenced after a snooze press, in milliseconds
pub const SNOOZE_TIME: u32 = 2 * 60 * 1000;

/// Time each alarm text is displayed when several share a region, in milliseconds
pub const DISPLAY_TIME: u32 = 2 * 1000;

/// Period of the alarm LED pulse, in milliseconds
pub const LED_PULSE_PERIOD: u32 = 500;

/// On-time of the alarm LED within one pulse period (50% duty), in milliseconds
pub const LED_PULSE_ON: u32 = LED_PULSE_PERIOD / 2;

/// Width of the character display, in characters
pub const DISPLAY_COLS: usize = 20;

/// Height of the character display, in rows
pub const DISPLAY_ROWS: usize = 6;

/// Width of the alarm header and footer regions; alarm texts are padded or cut to this
pub const FOOTER_WIDTH: usize = DISPLAY_COLS;

/// Text shown in the header region while no setting waits for confirmation
pub const HEADER_TITLE: &str = "Set:       P(cmH2O):";
