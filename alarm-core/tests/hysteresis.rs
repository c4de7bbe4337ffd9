//! Properties of the alarm hysteresis over random thresholds and observation sequences

use alarm_core::{Alarm, AlarmLevel};
use proptest::prelude::*;

fn threshold() -> impl Strategy<Value = u32> {
    1u32..6
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// N consecutive bad cycles latch on at the Nth, never earlier
    #[test]
    fn latches_on_exactly_at_threshold(min_bad in threshold(), min_good in threshold(), first in any::<u32>()) {
        let mut alarm = Alarm::new("TEST", min_bad, min_good, AlarmLevel::Emergency);
        for i in 0..min_bad {
            prop_assert!(!alarm.is_on());
            prop_assert!(alarm.set_condition(true, first.wrapping_add(i)).is_ok());
        }
        prop_assert!(alarm.is_on());
    }

    /// N consecutive good cycles latch off at the Nth, never earlier
    #[test]
    fn latches_off_exactly_at_threshold(min_bad in threshold(), min_good in threshold(), first in any::<u32>()) {
        let mut alarm = Alarm::new("TEST", min_bad, min_good, AlarmLevel::Notify);
        let mut seq = first;
        for _ in 0..min_bad {
            alarm.set_condition(true, seq).unwrap();
            seq = seq.wrapping_add(1);
        }
        prop_assert!(alarm.is_on());
        for _ in 0..min_good {
            prop_assert!(alarm.is_on());
            alarm.set_condition(false, seq).unwrap();
            seq = seq.wrapping_add(1);
        }
        prop_assert!(!alarm.is_on());
    }

    /// A bad run interrupted by a good cycle never latches on before a full run completes
    #[test]
    fn interrupted_runs_never_latch(min_bad in 2u32..6, pattern in prop::collection::vec(any::<bool>(), 1..40)) {
        let mut alarm = Alarm::new("TEST", min_bad, 1, AlarmLevel::Emergency);
        let mut run = 0;
        for (seq, bad) in (0u32..).zip(pattern) {
            alarm.set_condition(bad, seq).unwrap();
            run = if bad { run + 1 } else { 0 };
            prop_assert_eq!(alarm.is_on(), run >= min_bad);
        }
    }

    /// Repeating a cycle any number of times counts it once
    #[test]
    fn repeated_cycles_count_once(min_bad in 2u32..6, repeats in 1usize..5, seq in any::<u32>()) {
        let mut alarm = Alarm::new("TEST", min_bad, 1, AlarmLevel::Emergency);
        alarm.set_condition(true, seq).unwrap();
        for _ in 0..repeats {
            prop_assert!(alarm.set_condition(true, seq).is_err());
        }
        prop_assert!(!alarm.is_on());
    }

    /// After a reset any cycle behaves as on a new alarm
    #[test]
    fn reset_matches_a_new_alarm(pattern in prop::collection::vec(any::<bool>(), 0..20), probe in any::<bool>(), seq in any::<u32>()) {
        let mut used = Alarm::new("TEST", 2, 2, AlarmLevel::Notify);
        for (offset, bad) in (0u32..).zip(pattern) {
            let _ = used.set_condition(bad, seq.wrapping_add(offset));
        }
        used.reset();

        let mut fresh = Alarm::new("TEST", 2, 2, AlarmLevel::Notify);
        for offset in 0..3 {
            let at = seq.wrapping_add(offset);
            prop_assert_eq!(used.set_condition(probe, at), fresh.set_condition(probe, at));
            prop_assert_eq!(used.is_on(), fresh.is_on());
        }
    }
}
