//! Port traits for clean architecture boundaries
//!
//! The engine talks to the outside world through three narrow ports: the
//! outbound command queue, the raw report sink the queue drains into, and the
//! millisecond clock used to timestamp effect state.

use std::time::Instant;

use openracing_errors::TransportError;
use openracing_ffb::Timestamp;
use racing_wheel_hid_logitech_protocol::Command;

/// Outbound queue of 7-byte device commands.
///
/// Implementations are internally synchronized: the tick sends from the timer
/// thread while control calls send from the caller's thread.
pub trait CommandChannel: Send + Sync {
    /// Queue one command without blocking.
    fn send(&self, command: &Command) -> Result<(), TransportError>;

    /// Whether previously queued commands have not reached the device yet.
    ///
    /// This is the signal the backpressure policies react to, so it must be
    /// cheap and must not block.
    fn is_busy(&self) -> bool;

    /// Block until every queued command has been written. Control path only.
    fn wait_for_drain(&self);
}

/// Sink that delivers one report to the device.
///
/// Writes may block; they only ever run on the channel's writer thread.
pub trait ReportWriter: Send + 'static {
    fn write_report(&mut self, report: &Command) -> Result<(), TransportError>;
}

impl<F> ReportWriter for F
where
    F: FnMut(&Command) -> Result<(), TransportError> + Send + 'static,
{
    fn write_report(&mut self, report: &Command) -> Result<(), TransportError> {
        self(report)
    }
}

/// Millisecond time source for effect timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall-independent clock counting milliseconds since construction.
///
/// The counter wraps after about 49 days; effect state compares timestamps
/// with modular arithmetic, so the wrap is harmless.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    epoch: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Timestamp {
        let elapsed = Instant::now().saturating_duration_since(self.epoch);
        let wrapped = elapsed.as_millis() % (u128::from(u32::MAX) + 1);
        Timestamp::from_millis(u32::try_from(wrapped).unwrap_or(u32::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_monotonic_clock_advances() {
        let clock = MonotonicClock::new();
        let start = clock.now();
        thread::sleep(Duration::from_millis(5));
        let later = clock.now();
        assert!(later.since(start) >= 5);
    }

    #[test]
    fn test_closure_is_a_report_writer() -> Result<(), Box<dyn std::error::Error>> {
        let written = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&written);
        let mut writer = move |report: &Command| {
            sink.lock().push(*report);
            Ok::<(), TransportError>(())
        };
        writer.write_report(&[1, 2, 3, 4, 5, 6, 7])?;
        assert_eq!(*written.lock(), vec![[1, 2, 3, 4, 5, 6, 7]]);
        Ok(())
    }
}
