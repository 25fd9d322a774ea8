//! Per-tick admission and rescheduling decisions.
//!
//! The tick itself is owned by the engine; this module only decides whether a
//! tick may do work and when the next one should fire.

use tracing::{debug, info};

use crate::policy::{BackpressurePolicy, SchedulerConfig};

/// Whether a tick may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Do the work.
    Run,
    /// Skip the work and fire again after `retry_after_ms`.
    Defer { retry_after_ms: u32 },
}

/// What the timer does after a productive tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    /// Fire again after `delay_ms`.
    Restart { delay_ms: u32 },
    /// Nothing left to play; stay idle until the next start.
    Stop,
}

impl TimerAction {
    /// Delay before the next tick, `None` when the timer should stop.
    pub fn delay_ms(self) -> Option<u32> {
        match self {
            TimerAction::Restart { delay_ms } => Some(delay_ms),
            TimerAction::Stop => None,
        }
    }
}

/// Tick admission state machine.
///
/// # Examples
///
/// ```
/// use openracing_scheduler::{Admission, BackpressurePolicy, SchedulerConfig, TickScheduler};
///
/// let mut scheduler = TickScheduler::new(SchedulerConfig::new(2, BackpressurePolicy::Static));
/// assert_eq!(scheduler.admit(true), Admission::Defer { retry_after_ms: 2 });
/// assert_eq!(scheduler.period_ms(), 4);
/// assert_eq!(scheduler.admit(false), Admission::Run);
/// ```
#[derive(Debug, Clone)]
pub struct TickScheduler {
    policy: BackpressurePolicy,
    period_ms: u32,
    deferred: u64,
}

impl TickScheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            policy: config.policy,
            period_ms: config.period_ms.max(1),
            deferred: 0,
        }
    }

    /// Current tick period. Only ever grows under the static policy.
    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }

    pub fn policy(&self) -> BackpressurePolicy {
        self.policy
    }

    /// Ticks skipped because of backpressure or contention.
    pub fn deferred(&self) -> u64 {
        self.deferred
    }

    /// Decides whether this tick may run given the state of the outbound queue.
    pub fn admit(&mut self, queue_busy: bool) -> Admission {
        if !queue_busy || !self.policy.observes_queue() {
            return Admission::Run;
        }

        let retry_after_ms = self.period_ms;
        self.deferred += 1;
        match self.policy {
            BackpressurePolicy::Static => {
                self.period_ms = self.period_ms.saturating_mul(2);
                info!(
                    period_ms = self.period_ms,
                    "Commands stacking up, increasing timer period"
                );
            }
            BackpressurePolicy::Dynamic => {
                debug!(retry_after_ms, "Command queue busy, deferring tick");
            }
            BackpressurePolicy::Fixed => {}
        }
        Admission::Defer { retry_after_ms }
    }

    /// Tick that could not take the table lock: retry after one period.
    pub fn contended(&mut self) -> Admission {
        self.deferred += 1;
        debug!(retry_after_ms = self.period_ms, "Effect table busy, deferring tick");
        Admission::Defer {
            retry_after_ms: self.period_ms,
        }
    }

    /// Rescheduling decision after a productive tick.
    pub fn after_tick(&self, active_effects: usize) -> TimerAction {
        if active_effects > 0 {
            TimerAction::Restart {
                delay_ms: self.period_ms,
            }
        } else {
            TimerAction::Stop
        }
    }
}
