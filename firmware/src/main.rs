//! # Ventilator alarms
//! Firmware for the alarm board of the ventilator: buzzer, snooze button, alarm LED and OLED,
//! driven by the board-agnostic alarm core.
//!
//! Alarm conditions reach the control task through the event channel in [`event`].

// we are in an environment with constrained resources, so we do not use the standard library and we define a different entry point.
#![no_std]
#![no_main]

use crate::task::resources::{
    AssignedResources, BuzzerResources, DisplayResources, LedResources, PowerSenseResources,
    SnoozeResources, WatchdogResources,
};
use defmt::{info, unwrap};
use embassy_executor::Spawner;
use {defmt_rtt as _, panic_probe as _};

mod event;
// `split_resources!` is generated in `task::resources`
#[macro_use]
mod task;

// Entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Program start");

    // Initialize the peripherals for the RP2040
    let p = embassy_rp::init(Default::default());
    // and distribute them to the tasks
    let r = split_resources!(p);

    // the watchdog first, so a hang anywhere during startup resets the board
    unwrap!(spawner.spawn(task::watchdog::watchdog_task(r.watchdog)));

    // the alarm loop owns the buzzer and the LED
    unwrap!(spawner.spawn(task::alarms::alarm_control(r.buzzer, r.led)));

    unwrap!(spawner.spawn(task::buttons::snooze_button(r.snooze)));

    unwrap!(spawner.spawn(task::power::power_sense(r.power)));

    // the display comes last; the alarms run without it if it fails
    unwrap!(spawner.spawn(task::display::display(r.display)));

    info!("All tasks spawned");
}
