//! Atomic counters for RT-safe engine diagnostics.
//!
//! This module provides [`EngineCounters`], a collection of atomic counters that can
//! be safely incremented from the tick path without allocations or blocking.
//!
//! # RT Safety
//!
//! All methods on [`EngineCounters`] are RT-safe:
//! - Use `Ordering::Relaxed` for performance (correctness is maintained)
//! - No heap allocations
//! - No syscalls
//! - Bounded execution time (single atomic instruction)

use core::sync::atomic::{AtomicU64, Ordering};

/// Counter snapshot returned by [`EngineCounters::snapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CounterSnapshot {
    /// Ticks that evaluated the effect set
    pub total_ticks: u64,
    /// Ticks skipped because of backpressure or lock contention
    pub deferred_ticks: u64,
    /// Commands handed to the transport
    pub commands_sent: u64,
    /// Commands dropped because the outbound queue was full
    pub dropped_commands: u64,
    /// Commands the transport refused for good (closed or failed writes)
    pub transmit_errors: u64,
}

/// Atomic counters for the force feedback tick.
///
/// # Thread Safety
///
/// All counters use `AtomicU64` with `Ordering::Relaxed` semantics, which is
/// sufficient for diagnostic counters where:
/// - We don't need synchronization with other memory operations
/// - Counter values are eventually consistent
///
/// # Example
///
/// ```rust
/// use openracing_atomic::EngineCounters;
///
/// let counters = EngineCounters::new();
///
/// // Tick path
/// counters.inc_tick();
/// counters.inc_commands_sent(2);
///
/// // Control path
/// let snapshot = counters.snapshot();
/// assert_eq!(snapshot.total_ticks, 1);
/// assert_eq!(snapshot.commands_sent, 2);
/// ```
#[derive(Debug)]
pub struct EngineCounters {
    total_ticks: AtomicU64,
    deferred_ticks: AtomicU64,
    commands_sent: AtomicU64,
    dropped_commands: AtomicU64,
    transmit_errors: AtomicU64,
}

impl Default for EngineCounters {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineCounters {
    /// Create a new `EngineCounters` with all counters initialized to zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            total_ticks: AtomicU64::new(0),
            deferred_ticks: AtomicU64::new(0),
            commands_sent: AtomicU64::new(0),
            dropped_commands: AtomicU64::new(0),
            transmit_errors: AtomicU64::new(0),
        }
    }

    /// Create a new `EngineCounters` with initial values.
    ///
    /// Useful for testing or for resuming from a previous state.
    #[must_use]
    pub fn with_values(snapshot: CounterSnapshot) -> Self {
        Self {
            total_ticks: AtomicU64::new(snapshot.total_ticks),
            deferred_ticks: AtomicU64::new(snapshot.deferred_ticks),
            commands_sent: AtomicU64::new(snapshot.commands_sent),
            dropped_commands: AtomicU64::new(snapshot.dropped_commands),
            transmit_errors: AtomicU64::new(snapshot.transmit_errors),
        }
    }

    /// Increment the productive tick counter.
    #[inline]
    pub fn inc_tick(&self) {
        self.total_ticks.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the deferred tick counter.
    #[inline]
    pub fn inc_deferred(&self) {
        self.deferred_ticks.fetch_add(1, Ordering::Relaxed);
    }

    /// Add `count` transmitted commands.
    #[inline]
    pub fn inc_commands_sent(&self, count: u64) {
        self.commands_sent.fetch_add(count, Ordering::Relaxed);
    }

    /// Increment the dropped command counter.
    #[inline]
    pub fn inc_dropped(&self) {
        self.dropped_commands.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the transmit error counter.
    #[inline]
    pub fn inc_transmit_error(&self) {
        self.transmit_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Read all counters.
    #[must_use]
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            total_ticks: self.total_ticks.load(Ordering::Relaxed),
            deferred_ticks: self.deferred_ticks.load(Ordering::Relaxed),
            commands_sent: self.commands_sent.load(Ordering::Relaxed),
            dropped_commands: self.dropped_commands.load(Ordering::Relaxed),
            transmit_errors: self.transmit_errors.load(Ordering::Relaxed),
        }
    }

    /// Read all counters and zero them.
    ///
    /// Each counter is swapped individually, so increments racing with this
    /// call land either in the returned snapshot or in the next one.
    pub fn snapshot_and_reset(&self) -> CounterSnapshot {
        CounterSnapshot {
            total_ticks: self.total_ticks.swap(0, Ordering::Relaxed),
            deferred_ticks: self.deferred_ticks.swap(0, Ordering::Relaxed),
            commands_sent: self.commands_sent.swap(0, Ordering::Relaxed),
            dropped_commands: self.dropped_commands.swap(0, Ordering::Relaxed),
            transmit_errors: self.transmit_errors.swap(0, Ordering::Relaxed),
        }
    }

    /// Zero every counter.
    pub fn reset(&self) {
        for counter in [
            &self.total_ticks,
            &self.deferred_ticks,
            &self.commands_sent,
            &self.dropped_commands,
            &self.transmit_errors,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }

    /// Productive ticks so far.
    #[must_use]
    pub fn total_ticks(&self) -> u64 {
        self.total_ticks.load(Ordering::Relaxed)
    }

    /// Deferred ticks so far.
    #[must_use]
    pub fn deferred_ticks(&self) -> u64 {
        self.deferred_ticks.load(Ordering::Relaxed)
    }

    /// Transmitted commands so far.
    #[must_use]
    pub fn commands_sent(&self) -> u64 {
        self.commands_sent.load(Ordering::Relaxed)
    }

    /// Commands dropped on a full queue so far.
    #[must_use]
    pub fn dropped_commands(&self) -> u64 {
        self.dropped_commands.load(Ordering::Relaxed)
    }

    /// Transmit failures so far.
    #[must_use]
    pub fn transmit_errors(&self) -> u64 {
        self.transmit_errors.load(Ordering::Relaxed)
    }
}
