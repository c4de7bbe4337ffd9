//! Tasks that make up the application as well as the resources they use.
pub mod alarms;
pub mod buttons;
pub mod display;
pub mod power;
#[macro_use]
pub mod resources;
pub mod sound;
pub mod watchdog;
