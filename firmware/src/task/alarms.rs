//! # Alarm control task
//! The fixed-rate control loop around the alarm core.
//!
//! Every cycle advances the shared cycle counter, applies the events reported since the last
//! cycle, then updates the alarms. That drives the buzzer and LED directly and redraws the
//! screen model, which is published to the display task when it changed.

use alarm_core::display::Screen;
use alarm_core::{AlarmManager, Beeper, Display, Millis};
use defmt::{info, warn};
use embassy_rp::gpio::{Level, Output};
use embassy_time::{Duration, Instant, Ticker};
use portable_atomic::{AtomicU32, Ordering};

use crate::event::{Event, Readout, try_receive_event};
use crate::task::{
    buttons::LatchedSnooze,
    display::publish_frame,
    resources::{BuzzerResources, LedResources},
    sound::PwmBuzzer,
    watchdog::{TaskId, report_task_success},
};

/// Length of one control cycle
const CONTROL_PERIOD: Duration = Duration::from_millis(20);

/// Cycles between frame publications when nothing changed, one second
const REPUBLISH_CYCLES: u32 = 50;

/// Cycles between diagnostics reports, one minute
const DIAGNOSTICS_CYCLES: u32 = 3_000;

/// Control cycle number, read by the alarm setters
static CYCLE_COUNT: AtomicU32 = AtomicU32::new(0);

/// The alarm manager on this board
type Manager = AlarmManager<'static, PwmBuzzer, LatchedSnooze, Output<'static>>;

/// Milliseconds since boot, wrapping like the core expects
#[allow(clippy::cast_possible_truncation)]
pub fn now() -> Millis {
    Millis::new(Instant::now().as_millis() as u32)
}

/// Apply one reported event
fn apply(alarms: &mut Manager, screen: &mut Display<Screen>, event: Event) {
    match event {
        Event::HighPressure(value) => alarms.high_pressure(value),
        Event::LowPressure(value) => alarms.low_pressure(value),
        Event::BadPlateau(value) => alarms.bad_plateau(value),
        Event::UnmetVolume(value) => alarms.unmet_volume(value),
        Event::NoTidalPressure(value) => alarms.no_tidal_pressure(value),
        Event::OverCurrent(value) => alarms.over_current(value),
        Event::MechanicalFailure(value) => alarms.mechanical_failure(value),
        Event::UnconfirmedChange {
            value,
            message,
            key,
        } => alarms.unconfirmed_change(value, message, key),
        Event::TurningOff(value) => alarms.turning_off(value),
        Event::AllOff => alarms.all_off(),
        Event::Readout(readout) => match readout {
            Readout::Volume(percent) => screen.write_volume(percent),
            Readout::Bpm(bpm) => screen.write_bpm(bpm),
            Readout::IeRatio(ratio) => screen.write_ie_ratio(ratio),
            Readout::AcTrigger(threshold) => screen.write_ac_trigger(threshold),
            Readout::Peak(pressure) => screen.write_peak(pressure),
            Readout::Plateau(pressure) => screen.write_plateau(pressure),
            Readout::Peep(pressure) => screen.write_peep(pressure),
        },
    }
}

/// Runs the alarm core at a fixed rate; owns the buzzer and the alarm LED
#[embassy_executor::task]
pub async fn alarm_control(buzzer: BuzzerResources, led: LedResources) {
    info!("Alarm control task started");

    let beeper = Beeper::new(PwmBuzzer::new(buzzer), LatchedSnooze);
    let led = Output::new(led.led_pin, Level::Low);
    let mut alarms: Manager = AlarmManager::new(beeper, led, &CYCLE_COUNT);

    let mut screen = Display::new(Screen::new());
    alarms.begin(&mut screen);
    let mut published = screen.inner().clone();
    publish_frame(&published).await;

    let mut ticker = Ticker::every(CONTROL_PERIOD);
    loop {
        let cycle = CYCLE_COUNT.fetch_add(1, Ordering::Relaxed).wrapping_add(1);

        // all conditions of this cycle are in before the alarms are evaluated
        while let Some(event) = try_receive_event() {
            apply(&mut alarms, &mut screen, event);
        }
        alarms.update(now(), &mut screen);

        if *screen.inner() != published || cycle % REPUBLISH_CYCLES == 0 {
            published.clone_from(screen.inner());
            publish_frame(&published).await;
        }

        if cycle % DIAGNOSTICS_CYCLES == 0 && alarms.diagnostics().total() > 0 {
            warn!("Ignored alarm requests: {}", alarms.diagnostics());
        }

        report_task_success(TaskId::Control).await;
        ticker.next().await;
    }
}
