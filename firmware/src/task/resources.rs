//! # Resources
//! Pin and peripheral assignment of the alarm board. The groups are split in `main.rs` and
//! handed to the task that owns them.
use assign_resources::assign_resources;
use embassy_rp::i2c::InterruptHandler as I2cInterruptHandler;
use embassy_rp::peripherals::I2C0;
use embassy_rp::{Peri, bind_interrupts, peripherals};

assign_resources! {
    buzzer: BuzzerResources {
        // GPIO 8 is channel A of PWM slice 4
        slice: PWM_SLICE4,
        pin: PIN_8,
    },
    snooze: SnoozeResources {
        button_pin: PIN_20,
    },
    led: LedResources {
        led_pin: PIN_25,
    },
    power: PowerSenseResources {
        // supply voltage through a divider, high while the supply is on
        sense_pin: PIN_22,
    },
    display: DisplayResources {
        scl: PIN_13,
        sda: PIN_12,
        i2c0: I2C0,
    },
    watchdog: WatchdogResources {
        watchdog: WATCHDOG,
    },
}

bind_interrupts!(pub struct Irqs {
    I2C0_IRQ => I2cInterruptHandler<I2C0>;
});
