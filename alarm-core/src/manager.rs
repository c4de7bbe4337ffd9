//! # Alarm manager
//! Owns the alarm registry and turns it into sound, light and text once per control cycle.
//!
//! The control loop first reports every condition through the named setters, then calls
//! [`AlarmManager::update`]. Each setter is tagged with the cycle number read from the shared
//! counter, so reporting a condition twice in one cycle counts once.
//!
//! Presentation is split in two regions. The header shows the "setting not confirmed"
//! alarms, the footer every other alarm. When several alarms share a region their texts take
//! turns, each for [`DISPLAY_TIME`], in registry order.

use embedded_hal::digital::OutputPin;
use portable_atomic::{AtomicU32, Ordering};

use crate::alarm::{Alarm, AlarmLevel};
use crate::beeper::{Beeper, SnoozeButton};
use crate::config::{DISPLAY_TIME, HEADER_TITLE, LED_PULSE_ON, LED_PULSE_PERIOD};
use crate::diagnostics::Diagnostics;
use crate::display::{Display, DisplayKey, TextDisplay};
use crate::error::Error;
use crate::pulse::Pulse;
use crate::registry::{AlarmId, ConfirmSetting};
use crate::time::Millis;
use crate::tone::ToneOutput;

/// Manages the alarm registry, the beeper and the alarm LED
pub struct AlarmManager<'a, T, B, L> {
    /// One alarm per [`AlarmId`], in registry order
    alarms: [Alarm; AlarmId::COUNT],
    /// Buzzer and snooze
    beeper: Beeper<T, B>,
    /// Alarm LED
    led: L,
    /// Blink pattern of the LED
    led_pulse: Pulse,
    /// Whether the LED was pulsing in the previous update
    led_active: bool,
    /// Control cycle number, advanced by the control loop
    cycle_count: &'a AtomicU32,
    /// Absorbed misuse
    diagnostics: Diagnostics,
}

impl<'a, T, B, L> AlarmManager<'a, T, B, L>
where
    T: ToneOutput,
    B: SnoozeButton,
    L: OutputPin,
{
    /// Create a manager with every alarm off
    pub fn new(beeper: Beeper<T, B>, led: L, cycle_count: &'a AtomicU32) -> Self {
        Self {
            alarms: AlarmId::ALL.map(AlarmId::build),
            beeper,
            led,
            led_pulse: Pulse::new(LED_PULSE_PERIOD, LED_PULSE_ON),
            led_active: false,
            cycle_count,
            diagnostics: Diagnostics::default(),
        }
    }

    /// Draw the alarm regions, silence the beeper and switch the LED off
    pub fn begin<D: TextDisplay>(&mut self, display: &mut Display<D>) {
        display.begin();
        display.write(DisplayKey::Snooze, "");
        self.beeper.begin();
        self.led_active = false;
        let _ = self.led.set_low();
        info!("Alarm manager started with {} alarms", AlarmId::COUNT);
    }

    /// Present the current alarm state: display texts, beeper and LED
    pub fn update<D: TextDisplay>(&mut self, now: Millis, display: &mut Display<D>) {
        display.write_header(self.header_text(now));
        display.write_footer(self.footer_text(now));

        if let Err(error) = self.beeper.update(self.highest_level(), now) {
            self.absorb(error);
        }

        self.update_led(now);

        display.write_snooze(self.beeper.remaining_snooze_time(now));
    }

    /// Turn every alarm off and clear its counters
    pub fn all_off(&mut self) {
        for alarm in &mut self.alarms {
            alarm.reset();
        }
        info!("All alarms cleared");
    }

    /// Peak pressure above the limit
    pub fn high_pressure(&mut self, value: bool) {
        self.set_condition(AlarmId::HighPressure, value);
    }

    /// Pressure too low, likely a disconnect
    pub fn low_pressure(&mut self, value: bool) {
        self.set_condition(AlarmId::LowPressure, value);
    }

    /// Plateau pressure too high
    pub fn bad_plateau(&mut self, value: bool) {
        self.set_condition(AlarmId::BadPlateau, value);
    }

    /// Tidal volume not reached
    pub fn unmet_volume(&mut self, value: bool) {
        self.set_condition(AlarmId::UnmetVolume, value);
    }

    /// No pressure during inspiration
    pub fn no_tidal_pressure(&mut self, value: bool) {
        self.set_condition(AlarmId::NoTidalPressure, value);
    }

    /// Motor current above the limit
    pub fn over_current(&mut self, value: bool) {
        self.set_condition(AlarmId::OverCurrent, value);
    }

    /// Mechanical failure of the compressor
    pub fn mechanical_failure(&mut self, value: bool) {
        self.set_condition(AlarmId::MechanicalFailure, value);
    }

    /// A setting shown at `key` was changed and awaits confirmation.
    ///
    /// While `value` is true, `message` replaces the alarm text. A key without a
    /// confirmation slot changes nothing.
    pub fn unconfirmed_change(&mut self, value: bool, message: &str, key: DisplayKey) {
        match ConfirmSetting::try_from(key) {
            Ok(setting) => {
                let id = setting.alarm_id();
                self.observe(id, value, value.then_some(message));
            }
            Err(error) => self.absorb(error),
        }
    }

    /// The controller is shutting down
    pub fn turning_off(&mut self, value: bool) {
        self.set_condition(AlarmId::TurningOff, value);
    }

    /// Whether the high pressure alarm is on
    pub fn is_high_pressure(&self) -> bool {
        self.is_on(AlarmId::HighPressure)
    }

    /// Whether the low pressure alarm is on
    pub fn is_low_pressure(&self) -> bool {
        self.is_on(AlarmId::LowPressure)
    }

    /// Whether the bad plateau alarm is on
    pub fn is_bad_plateau(&self) -> bool {
        self.is_on(AlarmId::BadPlateau)
    }

    /// Whether the unmet volume alarm is on
    pub fn is_unmet_volume(&self) -> bool {
        self.is_on(AlarmId::UnmetVolume)
    }

    /// Whether the no tidal pressure alarm is on
    pub fn is_no_tidal_pressure(&self) -> bool {
        self.is_on(AlarmId::NoTidalPressure)
    }

    /// Whether the over current alarm is on
    pub fn is_over_current(&self) -> bool {
        self.is_on(AlarmId::OverCurrent)
    }

    /// Whether the mechanical failure alarm is on
    pub fn is_mechanical_failure(&self) -> bool {
        self.is_on(AlarmId::MechanicalFailure)
    }

    /// Whether `setting` awaits confirmation
    pub fn is_unconfirmed(&self, setting: ConfirmSetting) -> bool {
        self.is_on(setting.alarm_id())
    }

    /// Whether the turning off alarm is on
    pub fn is_turning_off(&self) -> bool {
        self.is_on(AlarmId::TurningOff)
    }

    /// Whether the alarm in slot `id` is on
    pub fn is_on(&self, id: AlarmId) -> bool {
        self.alarm(id).is_on()
    }

    /// The alarm in slot `id`
    pub fn alarm(&self, id: AlarmId) -> &Alarm {
        &self.alarms[id.index()]
    }

    /// Number of alarms on
    pub fn num_on(&self) -> usize {
        self.alarms.iter().filter(|alarm| alarm.is_on()).count()
    }

    /// Number of "setting not confirmed" alarms on
    pub fn num_on_confirm(&self) -> usize {
        self.on_in_region(true).count()
    }

    /// Number of alarms on, except "setting not confirmed"
    pub fn num_on_non_confirm(&self) -> usize {
        self.on_in_region(false).count()
    }

    /// Highest level among the alarms on, `NoAlarm` when none is
    pub fn highest_level(&self) -> AlarmLevel {
        self.alarms
            .iter()
            .filter(|alarm| alarm.is_on())
            .map(Alarm::level)
            .max()
            .unwrap_or_default()
    }

    /// Text for the header region at `now`
    pub fn header_text(&self, now: Millis) -> &str {
        self.region_text(true, now).unwrap_or(HEADER_TITLE)
    }

    /// Text for the footer region at `now`, empty when no alarm is on
    pub fn footer_text(&self, now: Millis) -> &str {
        self.region_text(false, now).unwrap_or("")
    }

    /// Milliseconds until the snooze ends, 0 when not snoozed
    pub fn remaining_snooze_time(&self, now: Millis) -> u32 {
        self.beeper.remaining_snooze_time(now)
    }

    /// Counters of absorbed misuse
    pub const fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// The beeper
    pub const fn beeper(&self) -> &Beeper<T, B> {
        &self.beeper
    }

    /// The beeper, mutably
    pub const fn beeper_mut(&mut self) -> &mut Beeper<T, B> {
        &mut self.beeper
    }

    /// The alarm LED
    pub const fn led(&self) -> &L {
        &self.led
    }

    /// Record `value` for `id` in the current cycle
    fn set_condition(&mut self, id: AlarmId, value: bool) {
        self.observe(id, value, None);
    }

    /// Record `value` for `id` in the current cycle; `text` replaces the message only if the
    /// cycle is accepted
    fn observe(&mut self, id: AlarmId, value: bool, text: Option<&str>) {
        let seq = self.cycle_count.load(Ordering::Relaxed);
        if let Err(error) = self.alarm_mut(id).observe(value, seq, text) {
            debug!("{} rejected", id);
            self.absorb(error);
        }
    }

    /// Mutable access to the alarm in slot `id`
    fn alarm_mut(&mut self, id: AlarmId) -> &mut Alarm {
        &mut self.alarms[id.index()]
    }

    /// Alarms on in the header (`confirm`) or footer region, in registry order
    fn on_in_region(&self, confirm: bool) -> impl Iterator<Item = &Alarm> {
        AlarmId::ALL
            .into_iter()
            .zip(&self.alarms)
            .filter(move |(id, alarm)| id.is_confirm() == confirm && alarm.is_on())
            .map(|(_, alarm)| alarm)
    }

    /// Text of the region at `now`; several alarms take turns of [`DISPLAY_TIME`] each
    fn region_text(&self, confirm: bool, now: Millis) -> Option<&str> {
        let count = self.on_in_region(confirm).count();
        if count == 0 {
            return None;
        }
        let count = u32::try_from(count).unwrap_or(u32::MAX);
        let cycle = count.saturating_mul(DISPLAY_TIME);
        let slot = now.as_u32() % cycle / DISPLAY_TIME;
        self.on_in_region(confirm)
            .nth(usize::try_from(slot).unwrap_or(0))
            .map(Alarm::text)
    }

    /// Pulse the LED while any alarm is on, restarting the phase when the first comes on
    fn update_led(&mut self, now: Millis) {
        if self.num_on() == 0 {
            self.led_active = false;
            let _ = self.led.set_low();
            return;
        }
        if !self.led_active {
            self.led_active = true;
            self.led_pulse.restart(now);
        }
        let _ = if self.led_pulse.is_high(now) {
            self.led.set_high()
        } else {
            self.led.set_low()
        };
    }

    /// Count and log misuse; it never stops alarm processing
    fn absorb(&mut self, error: Error) {
        self.diagnostics.record(&error);
        warn!("Alarm request ignored: {}", error);
    }
}
