//! Test harness for driving the engine without hardware or wall time
//!
//! [`ManualClock`] lets a test choose the millisecond timestamp of every tick
//! and [`RecordingChannel`] captures every command the engine queues, with
//! switches to simulate a backed-up or failing transport.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use openracing_errors::TransportError;
use openracing_ffb::Timestamp;
use parking_lot::Mutex;
use racing_wheel_hid_logitech_protocol::Command;

use crate::ports::{Clock, CommandChannel};

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: AtomicU32,
}

impl ManualClock {
    pub fn new(start_ms: u32) -> Self {
        Self {
            now_ms: AtomicU32::new(start_ms),
        }
    }

    pub fn set(&self, now_ms: u32) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }

    /// Move forward by `ms`, wrapping like the real clock.
    pub fn advance(&self, ms: u32) -> Timestamp {
        let previous = self.now_ms.fetch_add(ms, Ordering::SeqCst);
        Timestamp::from_millis(previous.wrapping_add(ms))
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_millis(self.now_ms.load(Ordering::SeqCst))
    }
}

/// Channel that records commands instead of sending them.
#[derive(Debug, Default)]
pub struct RecordingChannel {
    sent: Mutex<Vec<Command>>,
    busy: AtomicBool,
    failure: Mutex<Option<TransportError>>,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report the queue as not drained, as a slow device would.
    pub fn set_busy(&self, busy: bool) {
        self.busy.store(busy, Ordering::SeqCst);
    }

    /// Reject every following send with `failure`, or accept again with `None`.
    pub fn set_failure(&self, failure: Option<TransportError>) {
        *self.failure.lock() = failure;
    }

    /// Every command accepted so far.
    pub fn sent(&self) -> Vec<Command> {
        self.sent.lock().clone()
    }

    /// Commands accepted since the last call.
    pub fn take(&self) -> Vec<Command> {
        std::mem::take(&mut *self.sent.lock())
    }

    pub fn clear(&self) {
        self.sent.lock().clear();
    }
}

impl CommandChannel for RecordingChannel {
    fn send(&self, command: &Command) -> Result<(), TransportError> {
        if let Some(failure) = *self.failure.lock() {
            return Err(failure);
        }
        self.sent.lock().push(*command);
        Ok(())
    }

    fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    fn wait_for_drain(&self) {}
}
