//! # Snooze button task
//! Debounces the snooze button and latches each press until the control task takes it.
//!
//! Only the press edge counts. Holding the button does nothing more, so a held button can
//! never keep renewing the snooze.

use alarm_core::SnoozeButton;
use defmt::info;
use embassy_rp::gpio::{Input, Level, Pull};
use embassy_time::{Duration, Timer};
use portable_atomic::{AtomicBool, Ordering};

use crate::task::resources::SnoozeResources;

/// Stable time after an edge before the level is trusted
const DEBOUNCE_DURATION: Duration = Duration::from_millis(80);

/// Set by the button task on a press, cleared when the control task takes it
static SNOOZE_PRESSED: AtomicBool = AtomicBool::new(false);

/// The snooze button as seen by the beeper
pub struct LatchedSnooze;

impl SnoozeButton for LatchedSnooze {
    fn take_press(&mut self) -> bool {
        SNOOZE_PRESSED.swap(false, Ordering::AcqRel)
    }
}

/// Debounces a button wired to ground with the internal pull-up
struct Debouncer<'a> {
    /// The input pin for the button
    input: Input<'a>,
}

impl<'a> Debouncer<'a> {
    /// Create a new `Debouncer`
    const fn new(input: Input<'a>) -> Self {
        Self { input }
    }

    /// Wait until the level changed and stayed changed for the debounce duration, then return it
    async fn debounce(&mut self) -> Level {
        loop {
            let l1 = self.input.get_level();

            self.input.wait_for_any_edge().await;

            Timer::after(DEBOUNCE_DURATION).await;

            let l2 = self.input.get_level();
            if l1 != l2 {
                break l2;
            }
        }
    }
}

/// Latches every debounced press of the snooze button
#[embassy_executor::task]
pub async fn snooze_button(r: SnoozeResources) {
    let mut button = Debouncer::new(Input::new(r.button_pin, Pull::Up));
    info!("Snooze button task started");

    loop {
        // the button pulls low when pressed
        if button.debounce().await == Level::Low {
            info!("Snooze button pressed");
            SNOOZE_PRESSED.store(true, Ordering::Release);
        }
    }
}
