//! Fixed-capacity effect table.

use openracing_errors::{FfbError, FfbResult};

use crate::constants::MAX_EFFECTS;
use crate::effects::{Effect, EffectPayload};
use crate::state::{EffectState, Expiry};
use crate::time::Timestamp;

/// What a `play` call did to the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// Idle entry started; the active count went up
    Activated,
    /// Running entry restarted from scratch
    Restarted,
    /// Running entry stopped; the active count went down
    Stopped,
    /// Stop request for an entry that was not running
    Ignored,
}

impl PlayOutcome {
    /// Whether the caller must make sure the tick source is running.
    pub fn needs_timer(self) -> bool {
        self == PlayOutcome::Activated
    }
}

/// Storage for every effect slot plus the count of started entries.
///
/// # Examples
///
/// ```
/// use openracing_ffb::{ConstantForce, Effect, EffectTable, PlayOutcome, Timestamp};
///
/// let mut table = EffectTable::new();
/// let now = Timestamp::from_millis(0);
///
/// table.upload(Effect::constant(0, ConstantForce::new(8000)), now)?;
/// assert_eq!(table.play(0, 1, now)?, PlayOutcome::Activated);
/// assert_eq!(table.active_count(), 1);
///
/// assert_eq!(table.play(0, 0, now)?, PlayOutcome::Stopped);
/// assert_eq!(table.active_count(), 0);
/// # Ok::<(), openracing_errors::FfbError>(())
/// ```
#[derive(Debug, Clone)]
pub struct EffectTable {
    states: [EffectState; MAX_EFFECTS],
    active: usize,
}

impl Default for EffectTable {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectTable {
    pub fn new() -> Self {
        Self {
            states: [EffectState::default(); MAX_EFFECTS],
            active: 0,
        }
    }

    /// Number of started entries.
    pub fn active_count(&self) -> usize {
        self.active
    }

    pub fn state(&self, id: usize) -> Option<&EffectState> {
        self.states.get(id)
    }

    /// Stores `effect` at its id.
    ///
    /// # Errors
    ///
    /// - [`FfbError::InvalidEffectId`] when the id is outside the table
    /// - [`FfbError::ZeroPeriod`] for a periodic effect with period 0
    /// - [`FfbError::TypeMismatch`] when a started entry would change class
    ///
    /// A rejected upload leaves the table untouched.
    pub fn upload(&mut self, effect: Effect, now: Timestamp) -> FfbResult {
        let id = effect.id;
        let state = self.states.get_mut(id).ok_or(FfbError::InvalidEffectId {
            id,
            capacity: MAX_EFFECTS,
        })?;

        if matches!(&effect.payload, EffectPayload::Periodic(p) if p.period_ms == 0) {
            return Err(FfbError::ZeroPeriod { id });
        }

        if let Some(stored) = state.effect().filter(|_| state.is_started()) {
            if stored.kind() != effect.kind() {
                return Err(FfbError::TypeMismatch {
                    id,
                    stored: stored.kind().name(),
                    requested: effect.kind().name(),
                });
            }
        }

        state.store(effect, now);
        Ok(())
    }

    /// Starts `id` for `count` iterations, or stops it when `count` is 0.
    ///
    /// # Errors
    ///
    /// - [`FfbError::InvalidEffectId`] when the id is outside the table
    /// - [`FfbError::NotUploaded`] when starting an id that holds no effect
    pub fn play(&mut self, id: usize, count: u32, now: Timestamp) -> FfbResult<PlayOutcome> {
        let state = self.states.get_mut(id).ok_or(FfbError::InvalidEffectId {
            id,
            capacity: MAX_EFFECTS,
        })?;

        if count == 0 {
            if !state.is_started() {
                return Ok(PlayOutcome::Ignored);
            }
            state.stop();
            self.active = self.active.saturating_sub(1);
            return Ok(PlayOutcome::Stopped);
        }

        if state.effect().is_none() {
            return Err(FfbError::NotUploaded { id });
        }

        let outcome = if state.is_started() {
            PlayOutcome::Restarted
        } else {
            self.active += 1;
            PlayOutcome::Activated
        };
        state.start(count, now);
        Ok(outcome)
    }

    /// Forgets every effect and stops everything.
    pub fn clear(&mut self) {
        self.states = [EffectState::default(); MAX_EFFECTS];
        self.active = 0;
    }

    /// Runs one tick of the lifecycle over all started entries, in id order,
    /// and hands every entry that ends up playing to `visit`.
    pub fn for_each_playing(&mut self, now: Timestamp, mut visit: impl FnMut(&EffectState)) {
        for state in self.states.iter_mut() {
            if !state.is_started() {
                continue;
            }
            if state.expire(now) == Expiry::Finished {
                self.active = self.active.saturating_sub(1);
                continue;
            }
            state.advance(now);
            if state.is_playing() {
                visit(state);
            }
        }
    }
}
