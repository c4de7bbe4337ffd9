//! # Power
//! Watch the supply sense input and raise the "turning off" alarm while the supply is off.
//!
//! Note: the supply is sensed through a voltage divider on a GPIO pin, so the pin reads high
//! while the controller is powered normally.

use defmt::info;
use embassy_rp::gpio::{Input, Pull};

use crate::event::{Event, send_event};
use crate::task::resources::PowerSenseResources;

/// Reports the supply state on every edge of the sense input
#[embassy_executor::task]
pub async fn power_sense(r: PowerSenseResources) {
    info!("Power sense task started");
    let mut sense = Input::new(r.sense_pin, Pull::None);
    loop {
        let powered = sense.is_high();
        info!("Supply {}", if powered { "on" } else { "off" });
        send_event(Event::TurningOff(!powered)).await;
        sense.wait_for_any_edge().await;
    }
}
