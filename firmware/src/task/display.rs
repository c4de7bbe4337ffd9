//! # Display task
//! Renders the character grid published by the control task on the SSD1306 OLED.
//!
//! The 20x6 grid maps onto the 128x64 panel with a 6x10 font. If the panel fails to
//! initialize the task ends; the alarms, buzzer and LED keep running without it.
use alarm_core::display::Screen;
use defmt::{Debug2Format, error, info, warn};
use embassy_rp::i2c::{Config, I2c};
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, mutex::Mutex, signal::Signal};
use embedded_graphics::{
    mono_font::{MonoTextStyleBuilder, ascii::FONT_6X10},
    pixelcolor::BinaryColor,
    prelude::*,
    text::{Baseline, Text},
};
use ssd1306_async::{I2CDisplayInterface, Ssd1306, prelude::*};

use crate::task::{
    resources::{DisplayResources, Irqs},
    watchdog::{TaskId, report_task_failure, report_task_success},
};

/// Height of one text row in pixels
const ROW_HEIGHT: i32 = 10;

/// The latest frame of the control task
static FRAME: Mutex<CriticalSectionRawMutex, Screen> = Mutex::new(Screen::new());

/// Signal for a new frame in `FRAME`
static DISPLAY_SIGNAL: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Publish a new frame and wake the display task
pub async fn publish_frame(frame: &Screen) {
    FRAME.lock().await.clone_from(frame);
    DISPLAY_SIGNAL.signal(());
}

/// Draws every published frame on the OLED
#[embassy_executor::task]
pub async fn display(r: DisplayResources) {
    info!("Display task started");

    let mut config = Config::default();
    config.frequency = 400_000;
    let i2c = I2c::new_async(r.i2c0, r.scl, r.sda, Irqs, config);

    let interface = I2CDisplayInterface::new(i2c);
    let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
        .into_buffered_graphics_mode();
    if let Err(e) = display.init().await {
        error!("Failed to initialize display: {}", Debug2Format(&e));
        return;
    }

    let text_style = MonoTextStyleBuilder::new()
        .font(&FONT_6X10)
        .text_color(BinaryColor::On)
        .build();

    loop {
        // Wait for a signal to update the display
        DISPLAY_SIGNAL.wait().await;

        // copy the frame out of the mutex and release it before talking to the panel
        let frame = FRAME.lock().await.clone();

        // nothing is sent to the display before flush()
        display.clear();
        let mut origin = Point::zero();
        for row in frame.rows() {
            // the buffered mode draws into RAM and cannot fail
            let _ = Text::with_baseline(row, origin, text_style, Baseline::Top).draw(&mut display);
            origin.y += ROW_HEIGHT;
        }

        match display.flush().await {
            Ok(()) => report_task_success(TaskId::Display).await,
            Err(e) => {
                warn!("Failed to flush display: {}", Debug2Format(&e));
                report_task_failure(TaskId::Display).await;
            }
        }
    }
}
