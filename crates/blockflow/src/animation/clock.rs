//! The phase clock.
//!
//! A [`PhaseClock`] owns the single recurring timer of a scene. Each time the
//! interval elapses it advances a shared phase counter modulo `phase_count`
//! and notifies the host over a channel so it can re-render.
//!
//! Two drivers are available:
//!
//! - [`ClockDriver::Thread`]: a background thread sleeps on a condition
//!   variable and wakes every interval.
//! - [`ClockDriver::Manual`]: the host advances simulated time with
//!   [`PhaseClock::tick`]. Used for headless frame export and tests.
//!
//! Stopping is synchronous. Once [`PhaseClock::stop`] returns the thread has
//! been joined and the phase can no longer change.

use std::{
    sync::{
        Arc, Condvar, Mutex, PoisonError,
        atomic::{AtomicUsize, Ordering},
        mpsc,
    },
    thread,
    time::{Duration, Instant},
};

use log::{debug, trace, warn};
use thiserror::Error;

use crate::config::AnimationConfig;

/// Errors of the clock lifecycle.
#[derive(Debug, Error)]
pub enum AnimationError {
    #[error("phase clock is already running")]
    AlreadyRunning,

    #[error("phase interval must be greater than zero")]
    ZeroInterval,

    #[error("phase count must be greater than zero")]
    ZeroPhaseCount,

    #[error("failed to spawn the phase clock thread: {0}")]
    Spawn(#[source] std::io::Error),
}

/// What advances the clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClockDriver {
    #[default]
    Thread,
    Manual,
}

/// Stop flag and wakeup shared by a clock and its timer thread.
#[derive(Default)]
struct Shutdown {
    stopped: Mutex<bool>,
    wake: Condvar,
}

impl Shutdown {
    /// Sleeps for `interval`, then runs `on_elapsed` with the flag still
    /// locked so no step can land after [`Shutdown::trigger`] returns.
    ///
    /// Returns `false`, without running `on_elapsed`, once triggered.
    fn sleep_then(&self, interval: Duration, on_elapsed: impl FnOnce()) -> bool {
        let deadline = Instant::now() + interval;
        let mut stopped = self.stopped.lock().unwrap_or_else(PoisonError::into_inner);
        while !*stopped {
            let now = Instant::now();
            if now >= deadline {
                on_elapsed();
                return true;
            }
            stopped = self
                .wake
                .wait_timeout(stopped, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
        false
    }

    fn trigger(&self) {
        let mut stopped = self.stopped.lock().unwrap_or_else(PoisonError::into_inner);
        *stopped = true;
        self.wake.notify_all();
    }
}

enum Running {
    Thread {
        shutdown: Arc<Shutdown>,
        handle: Option<thread::JoinHandle<()>>,
    },
    Manual {
        sender: mpsc::Sender<usize>,
        accumulated: Duration,
    },
}

enum ClockState {
    Idle,
    Running(Running),
    Stopped,
}

/// Advances `phase` by one step modulo `count` and returns the new value.
fn advance(phase: &AtomicUsize, count: usize) -> usize {
    let next = (phase.load(Ordering::Acquire) + 1) % count;
    phase.store(next, Ordering::Release);
    next
}

/// The recurring timer driving staggered marker animation.
///
/// Only the owning clock writes the phase; any number of readers may observe
/// it through [`PhaseClock::phase_reader`].
///
/// ```
/// # use std::time::Duration;
/// # use blockflow::animation::{ClockDriver, PhaseClock};
/// let mut clock = PhaseClock::new(Duration::from_secs(6), 3, ClockDriver::Manual).unwrap();
/// let ticks = clock.start().unwrap();
///
/// clock.tick(Duration::from_secs(13));
/// assert_eq!(clock.phase(), 2);
/// assert_eq!(ticks.try_iter().collect::<Vec<_>>(), vec![1, 2]);
///
/// clock.stop();
/// clock.tick(Duration::from_secs(60));
/// assert_eq!(clock.phase(), 2);
/// ```
pub struct PhaseClock {
    phase: Arc<AtomicUsize>,
    phase_count: usize,
    interval: Duration,
    driver: ClockDriver,
    state: ClockState,
}

impl std::fmt::Debug for PhaseClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhaseClock")
            .field("phase", &self.phase())
            .field("phase_count", &self.phase_count)
            .field("interval", &self.interval)
            .field("driver", &self.driver)
            .field("running", &self.is_running())
            .field("stopped", &self.is_stopped())
            .finish()
    }
}

impl PhaseClock {
    /// Creates an idle clock at phase 0.
    ///
    /// # Errors
    ///
    /// Returns [`AnimationError::ZeroInterval`] or
    /// [`AnimationError::ZeroPhaseCount`] for degenerate settings.
    pub fn new(
        interval: Duration,
        phase_count: usize,
        driver: ClockDriver,
    ) -> Result<Self, AnimationError> {
        if interval.is_zero() {
            return Err(AnimationError::ZeroInterval);
        }
        if phase_count == 0 {
            return Err(AnimationError::ZeroPhaseCount);
        }
        Ok(Self {
            phase: Arc::new(AtomicUsize::new(0)),
            phase_count,
            interval,
            driver,
            state: ClockState::Idle,
        })
    }

    /// Creates a clock from the animation settings.
    pub fn from_config(
        config: &AnimationConfig,
        driver: ClockDriver,
    ) -> Result<Self, AnimationError> {
        Self::new(config.phase_interval(), config.phase_count(), driver)
    }

    /// Latest phase value.
    pub fn phase(&self) -> usize {
        self.phase.load(Ordering::Acquire)
    }

    /// Shared read handle to the phase counter.
    pub fn phase_reader(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.phase)
    }

    pub fn phase_count(&self) -> usize {
        self.phase_count
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn driver(&self) -> ClockDriver {
        self.driver
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, ClockState::Running(_))
    }

    /// `true` once a started clock has been stopped, until it is restarted.
    ///
    /// A clock that was never started is not stopped.
    pub fn is_stopped(&self) -> bool {
        matches!(self.state, ClockState::Stopped)
    }

    /// Starts the clock and returns the phase notification channel.
    ///
    /// Each advance sends the new phase. Dropping the receiver does not stop
    /// the clock. A stopped clock may be started again and resumes from its
    /// current phase.
    ///
    /// # Errors
    ///
    /// - [`AnimationError::AlreadyRunning`] if the clock is running
    /// - [`AnimationError::Spawn`] if the timer thread cannot be created
    pub fn start(&mut self) -> Result<mpsc::Receiver<usize>, AnimationError> {
        if self.is_running() {
            return Err(AnimationError::AlreadyRunning);
        }

        let (sender, receiver) = mpsc::channel();
        let running = match self.driver {
            ClockDriver::Manual => Running::Manual {
                sender,
                accumulated: Duration::ZERO,
            },
            ClockDriver::Thread => {
                let shutdown = Arc::new(Shutdown::default());
                let timer_shutdown = Arc::clone(&shutdown);
                let phase = Arc::clone(&self.phase);
                let count = self.phase_count;
                let interval = self.interval;
                let handle = thread::Builder::new()
                    .name("blockflow-phase-clock".to_string())
                    .spawn(move || run_timer(&timer_shutdown, &phase, count, interval, sender))
                    .map_err(AnimationError::Spawn)?;
                Running::Thread {
                    shutdown,
                    handle: Some(handle),
                }
            }
        };

        debug!(
            driver:? = self.driver,
            interval_ms = self.interval.as_millis() as u64,
            phase = self.phase();
            "Phase clock started"
        );
        self.state = ClockState::Running(running);
        Ok(receiver)
    }

    /// Advances simulated time for the manual driver.
    ///
    /// Ignored unless the clock is running with [`ClockDriver::Manual`].
    /// Returns the phase after the tick.
    pub fn tick(&mut self, dt: Duration) -> usize {
        let ClockState::Running(Running::Manual {
            sender,
            accumulated,
        }) = &mut self.state
        else {
            trace!(dt_ms = dt.as_millis() as u64; "Ignoring tick on inactive manual clock");
            return self.phase();
        };

        *accumulated += dt;
        while *accumulated >= self.interval {
            *accumulated -= self.interval;
            let next = advance(&self.phase, self.phase_count);
            trace!(phase = next; "Phase advanced");
            // A dropped receiver only means nobody is listening
            let _ = sender.send(next);
        }
        self.phase()
    }

    /// Stops the clock, joining the timer thread.
    ///
    /// Idempotent. No phase advance happens after this returns.
    pub fn stop(&mut self) {
        let previous = std::mem::replace(&mut self.state, ClockState::Stopped);
        match previous {
            ClockState::Running(Running::Thread {
                shutdown,
                mut handle,
            }) => {
                shutdown.trigger();
                if let Some(handle) = handle.take() {
                    if handle.join().is_err() {
                        warn!("Phase clock thread panicked");
                    }
                }
                debug!(phase = self.phase(); "Phase clock stopped");
            }
            ClockState::Running(Running::Manual { .. }) => {
                debug!(phase = self.phase(); "Phase clock stopped");
            }
            ClockState::Idle => self.state = ClockState::Idle,
            ClockState::Stopped => {}
        }
    }
}

impl Drop for PhaseClock {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_timer(
    shutdown: &Shutdown,
    phase: &AtomicUsize,
    count: usize,
    interval: Duration,
    sender: mpsc::Sender<usize>,
) {
    let mut ticks: u64 = 0;
    let mut next = 0;
    while shutdown.sleep_then(interval, || next = advance(phase, count)) {
        ticks += 1;
        trace!(phase = next, ticks; "Phase advanced");
        let _ = sender.send(next);
    }
    trace!(ticks; "Phase clock thread exiting");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_degenerate_settings() {
        assert!(matches!(
            PhaseClock::new(Duration::ZERO, 3, ClockDriver::Manual),
            Err(AnimationError::ZeroInterval)
        ));
        assert!(matches!(
            PhaseClock::new(Duration::from_secs(1), 0, ClockDriver::Thread),
            Err(AnimationError::ZeroPhaseCount)
        ));
    }

    #[test]
    fn test_manual_clock_cycles() {
        let mut clock = PhaseClock::new(Duration::from_secs(6), 3, ClockDriver::Manual).unwrap();
        let ticks = clock.start().unwrap();

        assert_eq!(clock.tick(Duration::from_secs(5)), 0);
        assert_eq!(clock.tick(Duration::from_secs(1)), 1);
        assert_eq!(clock.tick(Duration::from_secs(12)), 0);
        assert_eq!(ticks.try_iter().collect::<Vec<_>>(), vec![1, 2, 0]);
    }

    #[test]
    fn test_tick_before_start_is_ignored() {
        let mut clock = PhaseClock::new(Duration::from_secs(1), 3, ClockDriver::Manual).unwrap();
        assert_eq!(clock.tick(Duration::from_secs(10)), 0);
        assert!(!clock.is_running());
    }

    #[test]
    fn test_manual_phase_frozen_after_stop() {
        let mut clock = PhaseClock::new(Duration::from_secs(6), 3, ClockDriver::Manual).unwrap();
        let _ticks = clock.start().unwrap();
        clock.tick(Duration::from_secs(6));
        clock.stop();

        let frozen = clock.phase();
        clock.tick(Duration::from_secs(6));
        assert_eq!(clock.phase(), frozen);
    }

    #[test]
    fn test_thread_phase_frozen_after_stop() {
        let mut clock =
            PhaseClock::new(Duration::from_millis(5), 1000, ClockDriver::Thread).unwrap();
        let ticks = clock.start().unwrap();
        ticks
            .recv_timeout(Duration::from_secs(5))
            .expect("clock should tick");
        clock.stop();

        let frozen = clock.phase();
        thread::sleep(Duration::from_millis(50));
        assert_eq!(clock.phase(), frozen);
        assert!(frozen > 0);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut clock = PhaseClock::new(Duration::from_millis(10), 3, ClockDriver::Thread).unwrap();
        let _ticks = clock.start().unwrap();
        clock.stop();
        clock.stop();
        assert!(!clock.is_running());
    }

    #[test]
    fn test_stopped_state() {
        let mut clock = PhaseClock::new(Duration::from_secs(6), 3, ClockDriver::Manual).unwrap();
        assert!(!clock.is_stopped());
        clock.stop();
        assert!(!clock.is_stopped());

        let _ticks = clock.start().unwrap();
        assert!(!clock.is_stopped());
        clock.stop();
        assert!(clock.is_stopped());

        let _ticks = clock.start().unwrap();
        assert!(clock.is_running());
        assert!(!clock.is_stopped());
    }

    #[test]
    fn test_shutdown_skips_step_once_triggered() {
        let shutdown = Shutdown::default();
        let mut steps = 0;
        assert!(shutdown.sleep_then(Duration::from_millis(1), || steps += 1));
        shutdown.trigger();
        assert!(!shutdown.sleep_then(Duration::from_secs(60), || steps += 1));
        assert_eq!(steps, 1);
    }

    #[test]
    fn test_start_twice_fails() {
        let mut clock = PhaseClock::new(Duration::from_secs(60), 3, ClockDriver::Thread).unwrap();
        let _ticks = clock.start().unwrap();
        assert!(matches!(clock.start(), Err(AnimationError::AlreadyRunning)));
        clock.stop();
    }

    #[test]
    fn test_restart_keeps_phase() {
        let mut clock = PhaseClock::new(Duration::from_secs(1), 3, ClockDriver::Manual).unwrap();
        let _first = clock.start().unwrap();
        clock.tick(Duration::from_secs(1));
        clock.stop();

        let second = clock.start().unwrap();
        assert_eq!(clock.phase(), 1);
        clock.tick(Duration::from_secs(1));
        assert_eq!(second.try_recv().unwrap(), 2);
    }

    #[test]
    fn test_dropped_receiver_keeps_clock_running() {
        let mut clock = PhaseClock::new(Duration::from_secs(1), 4, ClockDriver::Manual).unwrap();
        drop(clock.start().unwrap());
        assert_eq!(clock.tick(Duration::from_secs(2)), 2);
        assert!(clock.is_running());
    }

    #[test]
    fn test_drop_joins_thread() {
        let mut clock = PhaseClock::new(Duration::from_millis(5), 3, ClockDriver::Thread).unwrap();
        let reader = clock.phase_reader();
        let ticks = clock.start().unwrap();
        drop(clock);

        let frozen = reader.load(Ordering::Acquire);
        thread::sleep(Duration::from_millis(30));
        assert_eq!(reader.load(Ordering::Acquire), frozen);
        // Sender went away with the thread
        while ticks.try_recv().is_ok() {}
        assert!(matches!(
            ticks.try_recv(),
            Err(mpsc::TryRecvError::Disconnected)
        ));
    }
}
