//! Events and system channel for reporting alarm conditions to the control task
//!
//! Conditions are evaluated elsewhere in the firmware and sent here as booleans. The control
//! task drains the channel at the start of every cycle, before it updates the alarms, so all
//! conditions of one cycle are counted together.

use alarm_core::DisplayKey;
use defmt::Format;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

/// The capacity of the event channel
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// System event channel for sending and receiving events
pub static EVENT_CHANNEL: Channel<CriticalSectionRawMutex, Event, EVENT_CHANNEL_CAPACITY> =
    Channel::new();

/// Sends an event to the control task, waiting while the channel is full
pub async fn send_event(event: Event) {
    EVENT_CHANNEL.sender().send(event).await;
}

/// Takes the next pending event, if any
pub fn try_receive_event() -> Option<Event> {
    EVENT_CHANNEL.receiver().try_receive().ok()
}

/// A measured value shown on the screen
#[derive(PartialEq, Debug, Format, Clone, Copy)]
pub enum Readout {
    /// Set tidal volume in percent
    Volume(i32),
    /// Set breaths per minute
    Bpm(i32),
    /// Set I:E ratio
    IeRatio(f32),
    /// Assist-control trigger, `None` when off
    AcTrigger(Option<f32>),
    /// Peak pressure in cmH2O
    Peak(i32),
    /// Plateau pressure in cmH2O
    Plateau(i32),
    /// PEEP in cmH2O
    Peep(i32),
}

/// The event type used in the system; alarm conditions carry `true` while the condition is bad
#[derive(PartialEq, Debug, Format, Clone, Copy)]
pub enum Event {
    /// Peak pressure above the limit
    HighPressure(bool),
    /// Pressure too low
    LowPressure(bool),
    /// Plateau pressure too high
    BadPlateau(bool),
    /// Tidal volume not reached
    UnmetVolume(bool),
    /// No pressure during inspiration
    NoTidalPressure(bool),
    /// Motor current above the limit
    OverCurrent(bool),
    /// Mechanical failure
    MechanicalFailure(bool),
    /// A setting changed and waits for confirmation
    UnconfirmedChange {
        /// Whether the change is still unconfirmed
        value: bool,
        /// Message shown while unconfirmed
        message: &'static str,
        /// Field of the changed setting
        key: DisplayKey,
    },
    /// The controller is shutting down
    TurningOff(bool),
    /// Clear every alarm
    AllOff,
    /// A new value for a screen field
    Readout(Readout),
}
