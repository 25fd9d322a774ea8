//! Concurrent access tests: tick-path writers racing diagnostics readers.

use openracing_atomic::{EngineCounters, PeakLevel};
use std::sync::Arc;
use std::thread;

#[test]
fn test_concurrent_increments_are_not_lost() -> Result<(), Box<dyn std::error::Error>> {
    let counters = Arc::new(EngineCounters::new());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let counters = Arc::clone(&counters);
            thread::spawn(move || {
                for _ in 0..10_000 {
                    counters.inc_tick();
                    counters.inc_commands_sent(2);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().map_err(|_| "worker panicked")?;
    }
    assert_eq!(counters.total_ticks(), 40_000);
    assert_eq!(counters.commands_sent(), 80_000);
    Ok(())
}

#[test]
fn test_snapshot_and_reset_under_contention_sums_up() -> Result<(), Box<dyn std::error::Error>> {
    let counters = Arc::new(EngineCounters::new());
    let writer = {
        let counters = Arc::clone(&counters);
        thread::spawn(move || {
            for _ in 0..50_000 {
                counters.inc_deferred();
            }
        })
    };
    let mut collected = 0;
    while !writer.is_finished() {
        collected += counters.snapshot_and_reset().deferred_ticks;
    }
    writer.join().map_err(|_| "writer panicked")?;
    collected += counters.snapshot_and_reset().deferred_ticks;
    assert_eq!(collected, 50_000);
    Ok(())
}

#[test]
fn test_concurrent_peak_records_global_maximum() -> Result<(), Box<dyn std::error::Error>> {
    let peak = Arc::new(PeakLevel::new());
    let handles: Vec<_> = (0..4u32)
        .map(|worker| {
            let peak = Arc::clone(&peak);
            thread::spawn(move || {
                for level in 0..1_000u32 {
                    peak.record(level * 4 + worker);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().map_err(|_| "worker panicked")?;
    }
    assert_eq!(peak.get(), 999 * 4 + 3);
    Ok(())
}
