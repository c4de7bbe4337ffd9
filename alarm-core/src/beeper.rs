//! # Beeper
//! The alarm buzzer: plays the tone of the requested alarm level and handles snoozing.
//!
//! Snooze is a timed, global mute. A press of the snooze button toggles it; once
//! [`SNOOZE_TIME`] has passed it ends on its own, so a silenced emergency cannot stay
//! silent. Snooze only affects sound, never the alarms themselves.

use crate::alarm::AlarmLevel;
use crate::config::SNOOZE_TIME;
use crate::error::Error;
use crate::time::Millis;
use crate::tone::{EMERGENCY_NOTES, NOTIFY_NOTES, Note, OFF_NOTES, Tone, ToneOutput};

/// Debounced snooze button
pub trait SnoozeButton {
    /// `true` exactly once per press
    fn take_press(&mut self) -> bool;
}

/// Represents the alarm speaker/buzzer
#[derive(Debug)]
pub struct Beeper<T, B> {
    /// Where the tones are played
    output: T,
    /// Toggles snooze
    snooze_button: B,
    /// One tone per level that makes sound: notify, emergency, off
    tones: [Tone; 3],
    /// While snoozed, the instant the snooze ends
    snooze_deadline: Option<Millis>,
}

impl<T, B> Beeper<T, B>
where
    T: ToneOutput,
    B: SnoozeButton,
{
    /// Create a beeper with the standard tones
    pub const fn new(output: T, snooze_button: B) -> Self {
        Self::with_tones(output, snooze_button, &NOTIFY_NOTES, &EMERGENCY_NOTES, &OFF_NOTES)
    }

    /// Create a beeper with custom notify, emergency and off tones
    pub const fn with_tones(
        output: T,
        snooze_button: B,
        notify: &'static [Note],
        emergency: &'static [Note],
        off: &'static [Note],
    ) -> Self {
        Self {
            output,
            snooze_button,
            tones: [Tone::new(notify), Tone::new(emergency), Tone::new(off)],
            snooze_deadline: None,
        }
    }

    /// Start silent
    pub fn begin(&mut self) {
        self.stop();
        self.output.silence();
    }

    /// Update sound and snooze for this cycle.
    ///
    /// An expired snooze ends first, then a button press toggles snooze. Afterwards the tone
    /// of `alarm_level` plays, unless there is no alarm or the beeper is snoozed, in which
    /// case everything stops.
    pub fn update(&mut self, alarm_level: AlarmLevel, now: Millis) -> Result<(), Error> {
        if self.snooze_deadline.is_some_and(|deadline| now.has_reached(deadline)) {
            info!("Snooze expired");
            self.snooze_deadline = None;
        }

        if self.snooze_button.take_press() {
            self.toggle_snooze(now);
        }

        match tone_index(alarm_level) {
            Some(index) if !self.is_snoozed() => self.play(index, now),
            _ => {
                self.stop();
                Ok(())
            }
        }
    }

    /// Whether sound is currently suppressed
    pub const fn is_snoozed(&self) -> bool {
        self.snooze_deadline.is_some()
    }

    /// Milliseconds until the snooze ends, 0 when not snoozed
    pub fn remaining_snooze_time(&self, now: Millis) -> u32 {
        match self.snooze_deadline {
            Some(deadline) if !now.has_reached(deadline) => deadline.elapsed_since(now),
            _ => 0,
        }
    }

    /// The level whose tone is playing, if any
    pub fn playing_level(&self) -> Option<AlarmLevel> {
        [AlarmLevel::Notify, AlarmLevel::Emergency, AlarmLevel::OffLevel]
            .into_iter()
            .zip(&self.tones)
            .find_map(|(level, tone)| tone.is_playing().then_some(level))
    }

    /// The tone output
    pub const fn output(&self) -> &T {
        &self.output
    }

    /// The snooze button
    pub const fn snooze_button_mut(&mut self) -> &mut B {
        &mut self.snooze_button
    }

    /// Switch snooze on or off
    fn toggle_snooze(&mut self, now: Millis) {
        if self.is_snoozed() {
            info!("Snooze cancelled");
            self.snooze_deadline = None;
        } else {
            info!("Snoozed for {} ms", SNOOZE_TIME);
            self.snooze_deadline = Some(now.wrapping_add(SNOOZE_TIME));
        }
    }

    /// Play the tone at `index`, stopping all others
    fn play(&mut self, index: usize, now: Millis) -> Result<(), Error> {
        for (i, tone) in self.tones.iter_mut().enumerate() {
            if i != index {
                tone.stop(&mut self.output);
            }
        }
        match self.tones.get_mut(index) {
            Some(tone) => tone.play(now, &mut self.output),
            None => Ok(()),
        }
    }

    /// Stop every tone
    fn stop(&mut self) {
        for tone in &mut self.tones {
            tone.stop(&mut self.output);
        }
    }
}

/// Slot in [`Beeper::tones`] for a level, `None` for silence
const fn tone_index(level: AlarmLevel) -> Option<usize> {
    match level {
        AlarmLevel::NoAlarm => None,
        AlarmLevel::Notify => Some(0),
        AlarmLevel::Emergency => Some(1),
        AlarmLevel::OffLevel => Some(2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tone::pitches::{NOTE_B4, NOTE_G4};

    /// Buzzer double remembering the sounding pitch
    #[derive(Default)]
    struct Buzzer {
        /// Pitch sounding right now
        sounding: Option<u16>,
    }

    impl ToneOutput for Buzzer {
        fn start(&mut self, pitch_hz: u16) {
            self.sounding = Some(pitch_hz);
        }

        fn silence(&mut self) {
            self.sounding = None;
        }
    }

    /// Button double with a pending press flag
    #[derive(Default)]
    struct Button {
        /// Press not yet taken
        pending: bool,
    }

    impl SnoozeButton for Button {
        fn take_press(&mut self) -> bool {
            core::mem::take(&mut self.pending)
        }
    }

    fn press(beeper: &mut Beeper<Buzzer, Button>) {
        beeper.snooze_button_mut().pending = true;
    }

    #[test]
    fn plays_the_requested_level() {
        let mut beeper = Beeper::new(Buzzer::default(), Button::default());
        beeper.update(AlarmLevel::Notify, Millis::new(0)).unwrap();
        assert_eq!(beeper.output().sounding, Some(NOTE_B4));
        assert_eq!(beeper.playing_level(), Some(AlarmLevel::Notify));

        beeper.update(AlarmLevel::Emergency, Millis::new(20)).unwrap();
        assert_eq!(beeper.output().sounding, Some(NOTE_G4));
        assert_eq!(beeper.playing_level(), Some(AlarmLevel::Emergency));

        beeper.update(AlarmLevel::NoAlarm, Millis::new(40)).unwrap();
        assert_eq!(beeper.output().sounding, None);
        assert_eq!(beeper.playing_level(), None);
    }

    #[test]
    fn snooze_silences_immediately_and_expires() {
        let mut beeper = Beeper::new(Buzzer::default(), Button::default());
        beeper.update(AlarmLevel::Emergency, Millis::new(1_000)).unwrap();
        assert!(beeper.output().sounding.is_some());

        press(&mut beeper);
        beeper.update(AlarmLevel::Emergency, Millis::new(1_020)).unwrap();
        assert!(beeper.is_snoozed());
        assert_eq!(beeper.output().sounding, None);
        assert_eq!(beeper.remaining_snooze_time(Millis::new(1_020)), SNOOZE_TIME);

        let just_before = Millis::new(1_020 + SNOOZE_TIME - 1);
        beeper.update(AlarmLevel::Emergency, just_before).unwrap();
        assert_eq!(beeper.output().sounding, None);
        assert_eq!(beeper.remaining_snooze_time(just_before), 1);

        let expiry = Millis::new(1_020 + SNOOZE_TIME);
        assert_eq!(beeper.remaining_snooze_time(expiry), 0);
        beeper.update(AlarmLevel::Emergency, expiry).unwrap();
        assert!(!beeper.is_snoozed());
        assert_eq!(beeper.output().sounding, Some(NOTE_G4));
    }

    #[test]
    fn second_press_cancels_snooze() {
        let mut beeper = Beeper::new(Buzzer::default(), Button::default());
        press(&mut beeper);
        beeper.update(AlarmLevel::Notify, Millis::new(0)).unwrap();
        assert!(beeper.is_snoozed());

        press(&mut beeper);
        beeper.update(AlarmLevel::Notify, Millis::new(5_000)).unwrap();
        assert!(!beeper.is_snoozed());
        assert_eq!(beeper.output().sounding, Some(NOTE_B4));
    }

    #[test]
    fn press_after_expiry_starts_a_new_snooze() {
        let mut beeper = Beeper::new(Buzzer::default(), Button::default());
        press(&mut beeper);
        beeper.update(AlarmLevel::Emergency, Millis::new(0)).unwrap();

        // the expired snooze is cleared before the press is read, so this press snoozes again
        let later = Millis::new(SNOOZE_TIME + 10);
        press(&mut beeper);
        beeper.update(AlarmLevel::Emergency, later).unwrap();
        assert!(beeper.is_snoozed());
        assert_eq!(beeper.remaining_snooze_time(later), SNOOZE_TIME);
    }

    #[test]
    fn snooze_deadline_survives_clock_wraparound() {
        let mut beeper = Beeper::new(Buzzer::default(), Button::default());
        let start = Millis::new(u32::MAX - 1_000);
        press(&mut beeper);
        beeper.update(AlarmLevel::Emergency, start).unwrap();

        let wrapped = start.wrapping_add(60_000);
        beeper.update(AlarmLevel::Emergency, wrapped).unwrap();
        assert!(beeper.is_snoozed());
        assert_eq!(beeper.remaining_snooze_time(wrapped), SNOOZE_TIME - 60_000);

        beeper
            .update(AlarmLevel::Emergency, start.wrapping_add(SNOOZE_TIME))
            .unwrap();
        assert!(!beeper.is_snoozed());
    }

    #[test]
    fn empty_tone_is_reported_and_silent() {
        static NO_NOTES: [Note; 0] = [];
        let mut beeper = Beeper::with_tones(
            Buzzer::default(),
            Button::default(),
            &NO_NOTES,
            &EMERGENCY_NOTES,
            &OFF_NOTES,
        );
        assert_eq!(
            beeper.update(AlarmLevel::Notify, Millis::new(0)),
            Err(Error::EmptyTone)
        );
        assert_eq!(beeper.output().sounding, None);
    }
}
