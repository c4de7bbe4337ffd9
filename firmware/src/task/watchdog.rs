//! Watchdog task to reset the system if the alarm tasks stop running
//!
//! The control task and the display task report after every iteration. The hardware
//! watchdog is started at boot and fed only while the control loop keeps reporting, so a
//! hung control loop ends in a reset. A failing display is only logged; the alarms, buzzer
//! and LED keep running without it.

use alarm_core::TaskHealth;
use defmt::{Format, info, warn};
use embassy_rp::watchdog::Watchdog;
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, mutex::Mutex};
use embassy_time::{Duration, Timer};

use crate::task::{alarms::now, resources::WatchdogResources};

/// How often task health is checked and the hardware watchdog fed
const HEALTH_CHECK_INTERVAL: Duration = Duration::from_millis(500);
/// Hardware watchdog timeout; must exceed the check interval with margin
const HARDWARE_WATCHDOG_TIMEOUT: Duration = Duration::from_secs(2);

/// Task identifiers for health tracking
#[derive(Debug, Clone, Copy, Eq, PartialEq, Format)]
pub enum TaskId {
    /// Alarm control loop - reports every cycle
    Control,
    /// Display task - reports after every frame
    Display,
}

impl TaskId {
    /// All monitored tasks, in index order
    const ALL: [Self; 2] = [Self::Control, Self::Display];

    /// Health tracker for this task; only the control loop can hold back the watchdog
    const fn health(self) -> TaskHealth {
        match self {
            Self::Control => TaskHealth::new(500, true),
            // the control task republishes the frame at least once a second
            Self::Display => TaskHealth::new(10_000, false),
        }
    }
}

/// Health of every monitored task, by `TaskId` index
static SYSTEM_HEALTH: Mutex<CriticalSectionRawMutex, [TaskHealth; 2]> =
    Mutex::new([TaskId::Control.health(), TaskId::Display.health()]);

/// Report a successful task iteration
pub async fn report_task_success(task_id: TaskId) {
    let mut health = SYSTEM_HEALTH.lock().await;
    if let Some(task) = health.get_mut(task_id as usize) {
        task.report_success(now());
    }
}

/// Report a failed task iteration; the task counts as stale until it reports success again
pub async fn report_task_failure(task_id: TaskId) {
    warn!("Task {:?} reported failure", task_id);
    let mut health = SYSTEM_HEALTH.lock().await;
    if let Some(task) = health.get_mut(task_id as usize) {
        task.report_failure(now());
    }
}

/// Whether the watchdog may be fed; logs every stale task
async fn may_feed() -> bool {
    let health = SYSTEM_HEALTH.lock().await;
    let now = now();
    let mut feed = true;
    for (task_id, task) in TaskId::ALL.iter().zip(health.iter()) {
        if task.is_stale(now) {
            if task.is_critical() {
                warn!("Task {:?} is unhealthy", task_id);
            } else {
                warn!("Task {:?} is unhealthy, running without it", task_id);
            }
        }
        feed &= !task.blocks_feed(now);
    }
    feed
}

/// Watchdog task that feeds the hardware watchdog while all critical tasks are healthy
#[embassy_executor::task]
pub async fn watchdog_task(r: WatchdogResources) {
    let mut wd = Watchdog::new(r.watchdog);
    wd.pause_on_debug(true);
    wd.start(HARDWARE_WATCHDOG_TIMEOUT);
    info!(
        "Watchdog started - timeout {}ms, checks every {}ms",
        HARDWARE_WATCHDOG_TIMEOUT.as_millis(),
        HEALTH_CHECK_INTERVAL.as_millis()
    );

    loop {
        if may_feed().await {
            wd.feed();
        } else {
            warn!("Not feeding the watchdog - reset in at most {}ms", HARDWARE_WATCHDOG_TIMEOUT.as_millis());
        }

        Timer::after(HEALTH_CHECK_INTERVAL).await;
    }
}
