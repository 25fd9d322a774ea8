//! Backpressure policy and scheduler configuration.

use serde::{Deserialize, Serialize};

/// How a tick reacts when the outbound command queue is still draining.
///
/// Backpressure scheduling trades update rate for queue depth: rather than
/// piling more commands on a busy transport, the tick is skipped and retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackpressurePolicy {
    /// Ignore the queue and tick every period.
    Fixed,
    /// Skip the tick and double the period for good.
    Static,
    /// Skip the tick and retry after one unchanged period.
    #[default]
    Dynamic,
}

impl BackpressurePolicy {
    /// Whether the policy looks at the queue at all.
    pub fn observes_queue(self) -> bool {
        self != BackpressurePolicy::Fixed
    }

    pub fn name(self) -> &'static str {
        match self {
            BackpressurePolicy::Fixed => "fixed",
            BackpressurePolicy::Static => "static",
            BackpressurePolicy::Dynamic => "dynamic",
        }
    }
}

/// Scheduler configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Tick period in milliseconds.
    pub period_ms: u32,

    /// Reaction to a busy command queue.
    pub policy: BackpressurePolicy,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            period_ms: crate::DEFAULT_PERIOD_MS,
            policy: BackpressurePolicy::default(),
        }
    }
}

impl SchedulerConfig {
    pub fn new(period_ms: u32, policy: BackpressurePolicy) -> Self {
        Self { period_ms, policy }.normalized()
    }

    /// Set the tick period.
    pub fn with_period_ms(mut self, period_ms: u32) -> Self {
        self.period_ms = period_ms;
        self.normalized()
    }

    /// Set the backpressure policy.
    pub fn with_policy(mut self, policy: BackpressurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// A zero period would spin the timer thread.
    fn normalized(mut self) -> Self {
        self.period_ms = self.period_ms.max(1);
        self
    }
}
