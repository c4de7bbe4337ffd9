//! # Alarm
//! One latched alarm: a severity level, a fixed-width display text and a hysteresis counter
//! that converts the per-cycle boolean condition into the latched on/off state.
//!
//! An alarm turns ON after `min_bad_to_trigger` consecutive bad cycles and OFF after
//! `min_good_to_clear` consecutive good cycles. Each cycle is identified by the caller's
//! sequence number, so reporting the same cycle twice never counts twice.

use crate::config::FOOTER_WIDTH;
use crate::error::Error;
use crate::time::seq_is_after;
use heapless::String;

/// Alarm levels in order of increasing priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmLevel {
    /// Nothing to report
    #[default]
    NoAlarm,
    /// Operator attention needed, ventilation unaffected
    Notify,
    /// Patient at risk
    Emergency,
    /// The controller is shutting down; outranks every other alarm
    OffLevel,
}

impl AlarmLevel {
    /// Whether this level calls for any output at all
    pub const fn is_alarm(self) -> bool {
        !matches!(self, Self::NoAlarm)
    }
}

/// Display text of an alarm, always exactly [`FOOTER_WIDTH`] bytes once fitted
pub type AlarmText = String<FOOTER_WIDTH>;

/// Pad or cut `text` to the footer width
pub fn fit_text(text: &str) -> AlarmText {
    let mut fitted = AlarmText::new();
    for ch in text.chars() {
        if fitted.push(ch).is_err() {
            break;
        }
    }
    while fitted.push(' ').is_ok() {}
    fitted
}

/// Keeps track of the state of one specific alarm
#[derive(Debug, Clone)]
pub struct Alarm {
    /// Text restored by [`Alarm::reset`]
    default_text: &'static str,
    /// Text currently shown for this alarm
    text: AlarmText,
    /// Severity, fixed at construction
    level: AlarmLevel,
    /// Consecutive bad cycles needed to latch on
    min_bad_to_trigger: u32,
    /// Consecutive good cycles needed to latch off
    min_good_to_clear: u32,
    /// The latched state
    on: bool,
    /// Bad cycles counted since the last good one
    consecutive_bad: u32,
    /// Good cycles counted since the last bad one
    consecutive_good: u32,
    /// Cycle of the last counted bad observation
    last_bad_seq: Option<u32>,
    /// Cycle of the last counted good observation
    last_good_seq: Option<u32>,
}

impl Alarm {
    /// Create an alarm that is off with cleared counters
    pub fn new(
        default_text: &'static str,
        min_bad_to_trigger: u32,
        min_good_to_clear: u32,
        level: AlarmLevel,
    ) -> Self {
        Self {
            default_text,
            text: fit_text(default_text),
            level,
            min_bad_to_trigger,
            min_good_to_clear,
            on: false,
            consecutive_bad: 0,
            consecutive_good: 0,
            last_bad_seq: None,
            last_good_seq: None,
        }
    }

    /// Reset to the state right after construction
    pub fn reset(&mut self) {
        self.text = fit_text(self.default_text);
        self.on = false;
        self.consecutive_bad = 0;
        self.consecutive_good = 0;
        self.last_bad_seq = None;
        self.last_good_seq = None;
    }

    /// Record the condition observed in cycle `seq`.
    ///
    /// Turns ON once `bad` held for `min_bad_to_trigger` consecutive cycles, and OFF once it
    /// was clear for `min_good_to_clear` consecutive cycles. A cycle already counted for the
    /// same outcome, or one older than the newest counted cycle, is rejected without touching
    /// any state.
    pub fn set_condition(&mut self, bad: bool, seq: u32) -> Result<(), Error> {
        self.observe(bad, seq, None)
    }

    /// Like [`Alarm::set_condition`], and also replaces the text if the cycle is accepted
    pub fn observe(&mut self, bad: bool, seq: u32, text: Option<&str>) -> Result<(), Error> {
        let last_same = if bad {
            self.last_bad_seq
        } else {
            self.last_good_seq
        };
        if last_same == Some(seq) {
            return Err(Error::RepeatedSequence { seq });
        }
        if self.newest_seq().is_some_and(|newest| seq_is_after(newest, seq)) {
            return Err(Error::StaleSequence { seq });
        }

        if bad {
            self.last_bad_seq = Some(seq);
            self.consecutive_bad = self.consecutive_bad.saturating_add(1);
            self.consecutive_good = 0;
            if self.consecutive_bad >= self.min_bad_to_trigger {
                self.on = true;
            }
        } else {
            self.last_good_seq = Some(seq);
            self.consecutive_good = self.consecutive_good.saturating_add(1);
            self.consecutive_bad = 0;
            if self.consecutive_good >= self.min_good_to_clear {
                self.on = false;
            }
        }
        if let Some(text) = text {
            self.text = fit_text(text);
        }
        Ok(())
    }

    /// Set the alarm text, cut or padded to the footer width
    pub fn set_text(&mut self, text: &str) {
        self.text = fit_text(text);
    }

    /// Whether this alarm is latched on
    pub const fn is_on(&self) -> bool {
        self.on
    }

    /// The text of this alarm
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The level of this alarm
    pub const fn level(&self) -> AlarmLevel {
        self.level
    }

    /// The newest cycle counted for either outcome
    fn newest_seq(&self) -> Option<u32> {
        match (self.last_bad_seq, self.last_good_seq) {
            (Some(bad), Some(good)) => Some(if seq_is_after(bad, good) { bad } else { good }),
            (seq @ Some(_), None) | (None, seq) => seq,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn high_pressure() -> Alarm {
        Alarm::new("HIGH PRESSURE", 1, 2, AlarmLevel::Emergency)
    }

    #[test]
    fn levels_are_ordered_by_priority() {
        assert!(AlarmLevel::NoAlarm < AlarmLevel::Notify);
        assert!(AlarmLevel::Notify < AlarmLevel::Emergency);
        assert!(AlarmLevel::Emergency < AlarmLevel::OffLevel);
        assert!(!AlarmLevel::NoAlarm.is_alarm());
        assert!(AlarmLevel::OffLevel.is_alarm());
    }

    #[test]
    fn high_pressure_scenario() {
        let mut alarm = high_pressure();
        alarm.set_condition(true, 1).unwrap();
        assert!(alarm.is_on());
        alarm.set_condition(false, 2).unwrap();
        assert!(alarm.is_on());
        alarm.set_condition(false, 3).unwrap();
        assert!(!alarm.is_on());
    }

    #[test]
    fn same_cycle_counts_once() {
        let mut alarm = Alarm::new("NO TIDAL PRESSURE", 2, 1, AlarmLevel::Emergency);
        alarm.set_condition(true, 7).unwrap();
        assert_eq!(
            alarm.set_condition(true, 7),
            Err(Error::RepeatedSequence { seq: 7 })
        );
        assert!(!alarm.is_on());
        assert_eq!(alarm.consecutive_bad, 1);

        alarm.set_condition(true, 8).unwrap();
        assert!(alarm.is_on());
    }

    #[test]
    fn stale_cycle_is_rejected() {
        let mut alarm = Alarm::new("NO TIDAL PRESSURE", 2, 1, AlarmLevel::Emergency);
        alarm.set_condition(true, 10).unwrap();
        assert_eq!(
            alarm.set_condition(true, 9),
            Err(Error::StaleSequence { seq: 9 })
        );
        assert_eq!(
            alarm.set_condition(false, 3),
            Err(Error::StaleSequence { seq: 3 })
        );
        assert_eq!(alarm.consecutive_bad, 1);
        assert_eq!(alarm.consecutive_good, 0);
    }

    #[test]
    fn rejected_cycle_keeps_the_text() {
        let mut alarm = Alarm::new("CONFIRM?", 1, 1, AlarmLevel::Notify);
        alarm.observe(true, 10, Some("RR 18?")).unwrap();
        assert_eq!(
            alarm.observe(true, 5, Some("LATE")),
            Err(Error::StaleSequence { seq: 5 })
        );
        assert_eq!(
            alarm.observe(true, 10, Some("TWICE")),
            Err(Error::RepeatedSequence { seq: 10 })
        );
        assert_eq!(alarm.text(), "RR 18?              ");
    }

    #[test]
    fn opposite_outcome_in_same_cycle_wins() {
        let mut alarm = high_pressure();
        alarm.set_condition(true, 4).unwrap();
        alarm.set_condition(false, 4).unwrap();
        assert_eq!(alarm.consecutive_bad, 0);
        assert_eq!(alarm.consecutive_good, 1);
        // one good cycle is not enough to clear
        assert!(alarm.is_on());
    }

    #[test]
    fn interleaved_good_restarts_the_count() {
        let mut alarm = Alarm::new("SLOW", 3, 1, AlarmLevel::Notify);
        alarm.set_condition(true, 1).unwrap();
        alarm.set_condition(true, 2).unwrap();
        alarm.set_condition(false, 3).unwrap();
        alarm.set_condition(true, 4).unwrap();
        alarm.set_condition(true, 5).unwrap();
        assert!(!alarm.is_on());
        alarm.set_condition(true, 6).unwrap();
        assert!(alarm.is_on());
    }

    #[test]
    fn cycle_zero_counts() {
        let mut alarm = high_pressure();
        alarm.set_condition(true, 0).unwrap();
        assert!(alarm.is_on());
    }

    #[test]
    fn sequence_wraparound_keeps_counting() {
        let mut alarm = Alarm::new("NO TIDAL PRESSURE", 2, 1, AlarmLevel::Emergency);
        alarm.set_condition(true, u32::MAX).unwrap();
        alarm.set_condition(true, 0).unwrap();
        assert!(alarm.is_on());
    }

    #[test]
    fn reset_restores_construction_state() {
        let mut alarm = Alarm::new("CONFIRM?", 1, 1, AlarmLevel::Notify);
        alarm.set_text("VOLUME CHANGED");
        alarm.set_condition(true, 12).unwrap();
        assert!(alarm.is_on());

        alarm.reset();
        assert!(!alarm.is_on());
        assert_eq!(alarm.consecutive_bad, 0);
        assert_eq!(alarm.consecutive_good, 0);
        assert_eq!(alarm.text(), "CONFIRM?            ");
        // the same cycle counts again after a reset, like on a fresh alarm
        alarm.set_condition(true, 12).unwrap();
        assert!(alarm.is_on());
    }

    #[test]
    fn text_is_padded_and_cut() {
        let mut alarm = high_pressure();
        assert_eq!(alarm.text(), "HIGH PRESSURE       ");
        alarm.set_text("A MESSAGE THAT IS FAR TOO LONG");
        assert_eq!(alarm.text(), "A MESSAGE THAT IS FA");
        assert_eq!(alarm.text().len(), FOOTER_WIDTH);
    }
}
