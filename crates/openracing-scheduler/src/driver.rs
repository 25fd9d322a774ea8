//! One-shot timer thread that drives the tick.
//!
//! The thread sleeps on a condition variable while the timer is stopped and
//! until the next deadline while it runs. The deadline is cleared before every
//! tick, so a [`TimerHandle::start`] issued while a tick is deciding to stop
//! re-arms the timer instead of being lost.

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use tracing::{debug, error, info, trace};

/// Thread name of the tick driver.
pub const TIMER_THREAD_NAME: &str = "ffb-timer";

/// Work run on every timer expiry.
pub trait TickTarget: Send + Sync + 'static {
    /// Runs one tick. Returns the delay until the next one, or `None` to stop
    /// the timer.
    fn on_timer(&self) -> Option<u32>;
}

#[derive(Debug, Default)]
struct TimerState {
    deadline: Option<Instant>,
    in_tick: bool,
    shutdown: bool,
}

#[derive(Debug, Default)]
struct TimerShared {
    state: Mutex<TimerState>,
    wake: Condvar,
}

/// Control side of the timer, cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct TimerHandle {
    shared: Arc<TimerShared>,
}

impl TimerHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the timer to fire after `delay_ms` unless it is already armed.
    ///
    /// Returns `true` when this call armed it.
    pub fn start(&self, delay_ms: u32) -> bool {
        let mut state = self.shared.state.lock();
        if state.shutdown || state.deadline.is_some() {
            return false;
        }
        state.deadline = Some(Instant::now() + Duration::from_millis(u64::from(delay_ms)));
        drop(state);
        self.shared.wake.notify_one();
        debug!(delay_ms, "Timer armed");
        true
    }

    /// Whether a tick is pending or running.
    pub fn is_active(&self) -> bool {
        let state = self.shared.state.lock();
        state.deadline.is_some() || state.in_tick
    }

    /// Disarms the timer without stopping the thread.
    pub fn cancel(&self) {
        self.shared.state.lock().deadline = None;
    }

    /// Stops the timer thread after its current tick.
    pub fn shutdown(&self) {
        let mut state = self.shared.state.lock();
        state.shutdown = true;
        state.deadline = None;
        drop(state);
        self.shared.wake.notify_all();
    }

    fn is_shutdown(&self) -> bool {
        self.shared.state.lock().shutdown
    }

    /// Blocks until the deadline passes. Returns `false` on shutdown.
    fn wait_for_deadline(&self) -> bool {
        let mut state = self.shared.state.lock();
        loop {
            if state.shutdown {
                return false;
            }
            match state.deadline {
                None => self.shared.wake.wait(&mut state),
                Some(deadline) if Instant::now() >= deadline => {
                    state.deadline = None;
                    state.in_tick = true;
                    return true;
                }
                Some(deadline) => {
                    // The deadline is re-read on the next pass either way.
                    if !self.shared.wake.wait_until(&mut state, deadline).timed_out() {
                        trace!("Timer woken before its deadline");
                    }
                }
            }
        }
    }

    fn finish_tick(&self, next_delay_ms: Option<u32>) {
        let mut state = self.shared.state.lock();
        state.in_tick = false;
        if state.shutdown {
            return;
        }
        match next_delay_ms {
            Some(delay_ms) => {
                state.deadline = Some(Instant::now() + Duration::from_millis(u64::from(delay_ms)));
            }
            None if state.deadline.is_some() => debug!("Timer re-armed during tick"),
            None => debug!("Timer stopped"),
        }
    }
}

/// Owns the timer thread. Dropping it shuts the thread down and joins it.
#[derive(Debug)]
pub struct TimerDriver {
    handle: TimerHandle,
    thread: Option<JoinHandle<()>>,
}

impl TimerDriver {
    /// Spawns the timer thread for `target`, controlled through `handle`.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the thread cannot be spawned.
    pub fn spawn<T: TickTarget>(handle: TimerHandle, target: Arc<T>) -> io::Result<Self> {
        let thread_handle = handle.clone();
        let thread = thread::Builder::new()
            .name(TIMER_THREAD_NAME.to_string())
            .spawn(move || Self::run(thread_handle, target))?;
        info!("Timer thread started");
        Ok(Self {
            handle,
            thread: Some(thread),
        })
    }

    pub fn handle(&self) -> &TimerHandle {
        &self.handle
    }

    /// Stops the thread and waits for it.
    pub fn shutdown(&mut self) {
        self.handle.shutdown();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!("Timer thread panicked");
            }
            info!("Timer thread stopped");
        }
    }

    fn run<T: TickTarget>(handle: TimerHandle, target: Arc<T>) {
        while handle.wait_for_deadline() {
            let next = target.on_timer();
            handle.finish_tick(next);
            if handle.is_shutdown() {
                break;
            }
        }
    }
}

impl Drop for TimerDriver {
    fn drop(&mut self) {
        self.shutdown();
    }
}
