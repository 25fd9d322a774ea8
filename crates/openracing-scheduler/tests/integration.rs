//! Integration tests for the scheduler crate.

use openracing_scheduler::{
    Admission, BackpressurePolicy, SchedulerConfig, TickScheduler, TickTarget, TimerAction,
    TimerDriver, TimerHandle,
};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Tick target that mimics an engine: it owns a scheduler and a count of
/// active effects and records every admission.
struct FakeEngine {
    scheduler: Mutex<TickScheduler>,
    active: Mutex<usize>,
    busy_ticks: Mutex<u32>,
    log: Mutex<Vec<Admission>>,
}

impl FakeEngine {
    fn new(policy: BackpressurePolicy, active: usize, busy_ticks: u32) -> Arc<Self> {
        Arc::new(Self {
            scheduler: Mutex::new(TickScheduler::new(SchedulerConfig::new(1, policy))),
            active: Mutex::new(active),
            busy_ticks: Mutex::new(busy_ticks),
            log: Mutex::new(Vec::new()),
        })
    }
}

impl TickTarget for FakeEngine {
    fn on_timer(&self) -> Option<u32> {
        let busy = {
            let mut remaining = self.busy_ticks.lock();
            let busy = *remaining > 0;
            *remaining = remaining.saturating_sub(1);
            busy
        };
        let mut scheduler = self.scheduler.lock();
        let admission = scheduler.admit(busy);
        self.log.lock().push(admission);
        if let Admission::Defer { retry_after_ms } = admission {
            return Some(retry_after_ms);
        }
        let mut active = self.active.lock();
        *active = active.saturating_sub(1);
        scheduler.after_tick(*active).delay_ms()
    }
}

fn wait_until(mut done: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if done() {
            return true;
        }
        thread::sleep(Duration::from_millis(1));
    }
    false
}

#[test]
fn test_driver_stops_when_no_effects_remain() -> Result<(), Box<dyn std::error::Error>> {
    let engine = FakeEngine::new(BackpressurePolicy::Dynamic, 3, 2);
    let handle = TimerHandle::new();
    let _driver = TimerDriver::spawn(handle.clone(), Arc::clone(&engine))?;

    handle.start(0);
    assert!(wait_until(|| !handle.is_active() && *engine.active.lock() == 0));

    let log = engine.log.lock().clone();
    assert_eq!(
        log,
        vec![
            Admission::Defer { retry_after_ms: 1 },
            Admission::Defer { retry_after_ms: 1 },
            Admission::Run,
            Admission::Run,
            Admission::Run,
        ]
    );
    Ok(())
}

#[test]
fn test_static_policy_slows_the_driver_down() -> Result<(), Box<dyn std::error::Error>> {
    let engine = FakeEngine::new(BackpressurePolicy::Static, 1, 3);
    let handle = TimerHandle::new();
    let _driver = TimerDriver::spawn(handle.clone(), Arc::clone(&engine))?;

    handle.start(0);
    assert!(wait_until(|| !handle.is_active() && *engine.active.lock() == 0));
    assert_eq!(engine.scheduler.lock().period_ms(), 8);
    assert_eq!(engine.scheduler.lock().deferred(), 3);
    Ok(())
}

#[test]
fn test_restart_after_stop() -> Result<(), Box<dyn std::error::Error>> {
    let engine = FakeEngine::new(BackpressurePolicy::Fixed, 1, 0);
    let handle = TimerHandle::new();
    let _driver = TimerDriver::spawn(handle.clone(), Arc::clone(&engine))?;

    handle.start(0);
    assert!(wait_until(|| !handle.is_active()));

    *engine.active.lock() = 2;
    assert!(handle.start(1));
    assert!(wait_until(|| !handle.is_active() && *engine.active.lock() == 0));
    assert_eq!(engine.log.lock().len(), 3);
    Ok(())
}

#[test]
fn test_after_tick_uses_current_period() {
    let mut s = TickScheduler::new(SchedulerConfig::new(3, BackpressurePolicy::Static));
    s.admit(true);
    assert_eq!(s.after_tick(2), TimerAction::Restart { delay_ms: 6 });
}
