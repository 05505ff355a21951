//! Fixed-interval auto-run scheduling.
//!
//! At most one schedule is active at a time; setting a new interval
//! replaces the previous job and re-arms the countdown. A single background
//! thread polls roughly once per second and runs the organizer on this
//! thread when the deadline passes. There is no cancel operation: the loop
//! lives for the rest of the process.

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crate::organizer;
use crate::state::AppState;

/// How often the background loop checks for a due job.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Rejected schedule input.
#[derive(Debug)]
pub enum ScheduleError {
    /// The interval must be at least one minute.
    NonPositive,
    /// The interval does not fit in a `Duration` of seconds.
    TooLarge,
}

impl std::fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositive => write!(f, "Interval must be a positive number of minutes."),
            Self::TooLarge => write!(f, "Interval is too large to schedule."),
        }
    }
}

impl std::error::Error for ScheduleError {}

struct ScheduleSlot {
    interval: Option<Duration>,
    next_due: Option<Instant>,
    loop_running: bool,
}

/// Drives periodic organizing runs against the shared state.
pub struct Scheduler {
    state: Arc<AppState>,
    slot: Mutex<ScheduleSlot>,
}

impl Scheduler {
    pub fn new(state: Arc<AppState>) -> Arc<Self> {
        Arc::new(Self {
            state,
            slot: Mutex::new(ScheduleSlot {
                interval: None,
                next_due: None,
                loop_running: false,
            }),
        })
    }

    /// Sets or replaces the schedule.
    ///
    /// A zero or overflowing interval is rejected without touching the
    /// existing schedule. On valid input the countdown restarts from now,
    /// and the background loop thread is spawned if this is the first
    /// schedule.
    pub fn set_schedule(self: &Arc<Self>, minutes: u64) -> Result<(), ScheduleError> {
        if minutes == 0 {
            return Err(ScheduleError::NonPositive);
        }
        let seconds = minutes.checked_mul(60).ok_or(ScheduleError::TooLarge)?;
        let interval = Duration::from_secs(seconds);

        let mut slot = self.slot.lock().expect("scheduler mutex poisoned");
        slot.interval = Some(interval);
        slot.next_due = Some(Instant::now() + interval);
        let spawn_loop = !slot.loop_running;
        slot.loop_running = true;
        drop(slot);

        if spawn_loop {
            let scheduler = Arc::clone(self);
            thread::spawn(move || scheduler.poll_loop());
        }

        log::info!("Auto-organize scheduled every {} minute(s)", minutes);
        Ok(())
    }

    /// The active interval in minutes, if a schedule is set.
    pub fn current_interval_minutes(&self) -> Option<u64> {
        self.slot
            .lock()
            .expect("scheduler mutex poisoned")
            .interval
            .map(|d| d.as_secs() / 60)
    }

    fn poll_loop(&self) {
        loop {
            thread::sleep(POLL_INTERVAL);
            self.fire_due(Instant::now());
        }
    }

    /// Fires one run if the deadline has passed at `now`, re-arming the
    /// next deadline first. Returns whether a run was fired.
    ///
    /// The folder path is read from the shared state inside the organizer,
    /// i.e. at fire time, so a folder changed after scheduling is picked up
    /// by the next fire.
    pub fn fire_due(&self, now: Instant) -> bool {
        let mut slot = self.slot.lock().expect("scheduler mutex poisoned");
        let (Some(interval), Some(due)) = (slot.interval, slot.next_due) else {
            return false;
        };
        if now < due {
            return false;
        }
        slot.next_due = Some(now + interval);
        drop(slot);

        match organizer::organize(&self.state) {
            Ok(report) => {
                log::info!(
                    "Scheduled run: {} moved, {} failed",
                    report.moved(),
                    report.failed()
                );
                if let Some(e) = &report.log_error {
                    log::warn!("Scheduled run could not write the run log: {}", e);
                }
            }
            Err(e) => log::warn!("Scheduled run did nothing: {}", e),
        }
        true
    }
}
