//! Lock-free running maximum.

use core::sync::atomic::{AtomicU32, Ordering};

/// Running peak of the per-tick force level.
///
/// The tick path records every level; readers see the largest value since
/// the last reset.
///
/// ```rust
/// use openracing_atomic::PeakLevel;
///
/// let peak = PeakLevel::new();
/// peak.record(1200);
/// peak.record(800);
/// assert_eq!(peak.get(), 1200);
///
/// assert_eq!(peak.take(), 1200);
/// assert_eq!(peak.get(), 0);
/// ```
#[derive(Debug, Default)]
pub struct PeakLevel {
    value: AtomicU32,
}

impl PeakLevel {
    /// Create a tracker starting at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            value: AtomicU32::new(0),
        }
    }

    /// Raise the peak to `level` if it is larger.
    #[inline]
    pub fn record(&self, level: u32) {
        self.value.fetch_max(level, Ordering::Relaxed);
    }

    /// Current peak.
    #[must_use]
    pub fn get(&self) -> u32 {
        self.value.load(Ordering::Relaxed)
    }

    /// Overwrite the peak, typically with 0 to restart the measurement.
    pub fn set(&self, level: u32) {
        self.value.store(level, Ordering::Relaxed);
    }

    /// Read the peak and restart the measurement.
    pub fn take(&self) -> u32 {
        self.value.swap(0, Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keeps_maximum() {
        let peak = PeakLevel::new();
        for level in [5, 50, 7, 49] {
            peak.record(level);
        }
        assert_eq!(peak.get(), 50);
    }

    #[test]
    fn test_set_overrides() {
        let peak = PeakLevel::new();
        peak.record(900);
        peak.set(10);
        peak.record(5);
        assert_eq!(peak.get(), 10);
    }
}
