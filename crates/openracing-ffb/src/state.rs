//! Per-effect runtime state and its lifecycle transitions.

use crate::effects::{Effect, EffectPayload, PeriodicForce, RampForce};
use crate::fixed::direction_gain;
use crate::time::Timestamp;

/// Lifecycle stage of a table entry.
///
/// `Armed` means the timing of the current run has been latched by a tick but
/// the effect has not yet entered its playing window (e.g. still in its delay).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Lifecycle {
    #[default]
    Idle,
    Started,
    Armed,
    Playing,
}

/// Result of the expiry check that precedes [`EffectState::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// Still running (or infinite)
    Running,
    /// Last iteration finished; the entry is now idle
    Finished,
    /// One iteration finished, the next starts at the old stop time
    Repeated,
}

/// One table entry: the stored effect plus everything the tick derives from it.
#[derive(Debug, Clone, Copy, Default)]
pub struct EffectState {
    pub(crate) effect: Option<Effect>,
    pub(crate) lifecycle: Lifecycle,
    pub(crate) update_pending: bool,
    pub(crate) start_at: Timestamp,
    pub(crate) play_at: Timestamp,
    pub(crate) stop_at: Timestamp,
    pub(crate) phase_origin: Timestamp,
    pub(crate) time_playing: u32,
    pub(crate) phase: u32,
    pub(crate) phase_adj: u32,
    pub(crate) count: u32,
    pub(crate) direction_gain: i32,
    pub(crate) slope: i64,
}

impl EffectState {
    pub fn effect(&self) -> Option<&Effect> {
        self.effect.as_ref()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_started(&self) -> bool {
        self.lifecycle != Lifecycle::Idle
    }

    /// Timing of the current run has been latched.
    pub fn is_latched(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Armed | Lifecycle::Playing)
    }

    pub fn is_playing(&self) -> bool {
        self.lifecycle == Lifecycle::Playing
    }

    pub fn update_pending(&self) -> bool {
        self.update_pending
    }

    /// Milliseconds since the playing window opened.
    pub fn time_playing(&self) -> u32 {
        self.time_playing
    }

    /// Current waveform phase in degrees (0..720). The initial offset is not
    /// folded back into the first turn.
    pub fn phase(&self) -> u32 {
        self.phase
    }

    /// Remaining iterations, including the current one.
    pub fn remaining(&self) -> u32 {
        self.count
    }

    pub fn play_at(&self) -> Timestamp {
        self.play_at
    }

    pub fn stop_at(&self) -> Timestamp {
        self.stop_at
    }

    /// Q15 direction gain latched for the current run.
    pub fn direction_gain(&self) -> i32 {
        self.direction_gain
    }

    /// Q16 ramp slope computed by the last tick.
    pub fn slope(&self) -> i64 {
        self.slope
    }

    /// Replaces the stored effect. A running effect picks the change up on the next tick.
    pub(crate) fn store(&mut self, effect: Effect, now: Timestamp) {
        self.effect = Some(effect);
        if self.is_started() {
            self.update_pending = true;
            self.phase_origin = now;
        }
    }

    /// Starts (or restarts) the entry for `count` iterations.
    pub(crate) fn start(&mut self, count: u32, now: Timestamp) {
        self.stop();
        self.lifecycle = Lifecycle::Started;
        self.start_at = now;
        self.count = count;
    }

    pub(crate) fn stop(&mut self) {
        self.lifecycle = Lifecycle::Idle;
        self.update_pending = false;
    }

    /// Ends the current iteration once a finite run reaches its stop time.
    pub(crate) fn expire(&mut self, now: Timestamp) -> Expiry {
        let finite = self
            .effect
            .as_ref()
            .is_some_and(|effect| !effect.replay.is_infinite());
        if !self.is_latched() || !finite || now.is_before(self.stop_at) {
            return Expiry::Running;
        }

        self.stop();
        self.count = self.count.saturating_sub(1);
        if self.count == 0 {
            return Expiry::Finished;
        }
        self.lifecycle = Lifecycle::Started;
        self.start_at = self.stop_at;
        Expiry::Repeated
    }

    /// Per-tick state update: latch timing, consume pending updates, enter the
    /// playing window and refresh the playback clock and phase.
    pub(crate) fn advance(&mut self, now: Timestamp) {
        let Some(effect) = self.effect else {
            return;
        };
        if self.lifecycle == Lifecycle::Idle {
            return;
        }
        let periodic = match effect.payload {
            EffectPayload::Periodic(p) => Some(p),
            _ => None,
        };

        if self.lifecycle == Lifecycle::Started {
            self.lifecycle = Lifecycle::Armed;
            self.latch_timing(&effect);
            if !self.update_pending {
                self.phase_origin = self.play_at;
            }
            if let Some(p) = &periodic {
                self.phase_adj = initial_phase(p);
            }
        }

        if self.update_pending {
            self.update_pending = false;
            if self.lifecycle == Lifecycle::Playing {
                self.lifecycle = Lifecycle::Armed;
            }
            self.latch_timing(&effect);
            if periodic.is_some() {
                self.phase_adj = self.phase;
            }
        }

        self.slope = match effect.payload {
            EffectPayload::Ramp(ramp) if !effect.replay.is_infinite() => {
                ramp_slope(&ramp, effect.replay.length_ms)
            }
            _ => 0,
        };

        if self.lifecycle == Lifecycle::Armed
            && now.is_at_or_after(self.play_at)
            && (effect.replay.is_infinite() || now.is_before(self.stop_at))
        {
            self.lifecycle = Lifecycle::Playing;
        }

        if self.lifecycle == Lifecycle::Playing {
            self.time_playing = now.since(self.play_at);
            if let Some(p) = &periodic {
                let period = u32::from(p.period_ms).max(1);
                let elapsed = now.since(self.phase_origin) % period;
                self.phase = elapsed * 360 / period + self.phase_adj % 360;
            }
        }
    }

    fn latch_timing(&mut self, effect: &Effect) {
        self.play_at = self
            .start_at
            .wrapping_add_ms(u32::from(effect.replay.delay_ms));
        self.direction_gain = direction_gain(effect.direction);
        if !effect.replay.is_infinite() {
            self.stop_at = self
                .play_at
                .wrapping_add_ms(u32::from(effect.replay.length_ms));
        }
    }
}

fn initial_phase(p: &PeriodicForce) -> u32 {
    (u32::from(p.phase) * 360)
        .checked_div(u32::from(p.period_ms))
        .unwrap_or(0)
}

/// Q16 slope of the ramp body. Zero when the envelope leaves no room for it.
pub(crate) fn ramp_slope(ramp: &RampForce, length_ms: u16) -> i64 {
    let span = i64::from(length_ms)
        - i64::from(ramp.envelope.attack_length)
        - i64::from(ramp.envelope.fade_length);
    if span <= 0 {
        return 0;
    }
    ((i64::from(ramp.end_level) - i64::from(ramp.start_level)) << 16) / span
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{ConstantForce, Envelope, Replay, Waveform};

    fn ts(ms: u32) -> Timestamp {
        Timestamp::from_millis(ms)
    }

    fn started(effect: Effect, at: u32) -> EffectState {
        let mut state = EffectState::default();
        state.store(effect, ts(at));
        state.start(1, ts(at));
        state
    }

    #[test]
    fn test_first_tick_latches_and_plays() {
        let effect =
            Effect::constant(0, ConstantForce::new(100)).with_replay(Replay::new(100, 10));
        let mut state = started(effect, 1000);

        state.advance(ts(1005));
        assert_eq!(state.lifecycle(), Lifecycle::Armed);
        assert_eq!(state.play_at(), ts(1010));
        assert_eq!(state.stop_at(), ts(1110));

        state.advance(ts(1010));
        assert_eq!(state.lifecycle(), Lifecycle::Playing);
        assert_eq!(state.time_playing(), 0);

        state.advance(ts(1060));
        assert_eq!(state.time_playing(), 50);
    }

    #[test]
    fn test_expiry_is_closed_at_stop_time() {
        let effect = Effect::constant(0, ConstantForce::new(100)).with_replay(Replay::new(50, 0));
        let mut state = started(effect, 0);
        state.advance(ts(0));
        assert!(state.is_playing());

        assert_eq!(state.expire(ts(49)), Expiry::Running);
        assert_eq!(state.expire(ts(50)), Expiry::Finished);
        assert!(!state.is_started());
    }

    #[test]
    fn test_repeat_restarts_at_stop_time() {
        let effect = Effect::constant(0, ConstantForce::new(100)).with_replay(Replay::new(50, 0));
        let mut state = EffectState::default();
        state.store(effect, ts(0));
        state.start(2, ts(0));
        state.advance(ts(0));

        assert_eq!(state.expire(ts(52)), Expiry::Repeated);
        assert_eq!(state.lifecycle(), Lifecycle::Started);
        state.advance(ts(52));
        assert_eq!(state.play_at(), ts(50));
        assert_eq!(state.time_playing(), 2);
        assert_eq!(state.expire(ts(100)), Expiry::Finished);
    }

    #[test]
    fn test_update_relatches_timing_but_keeps_start() {
        let effect = Effect::constant(0, ConstantForce::new(100)).with_replay(Replay::new(100, 0));
        let mut state = started(effect, 0);
        state.advance(ts(10));
        assert!(state.is_playing());

        let longer = effect.with_replay(Replay::new(300, 0));
        state.store(longer, ts(20));
        assert!(state.update_pending());

        state.advance(ts(20));
        assert!(!state.update_pending());
        assert!(state.is_playing());
        assert_eq!(state.stop_at(), ts(300));
        assert_eq!(state.time_playing(), 20);
    }

    #[test]
    fn test_restart_clears_pending_update() {
        let effect = Effect::constant(0, ConstantForce::new(100));
        let mut state = started(effect, 0);
        state.advance(ts(2));
        state.store(effect, ts(3));
        assert!(state.update_pending());

        state.start(1, ts(4));
        assert!(!state.update_pending());
        assert_eq!(state.lifecycle(), Lifecycle::Started);
    }

    #[test]
    fn test_periodic_phase_tracks_time() {
        let force = crate::effects::PeriodicForce::new(Waveform::Sine, 100, 1000);
        let mut state = started(Effect::periodic(0, force), 0);
        state.advance(ts(0));
        assert_eq!(state.phase(), 0);
        state.advance(ts(25));
        assert_eq!(state.phase(), 90);
        state.advance(ts(175));
        assert_eq!(state.phase(), 270);
    }

    #[test]
    fn test_periodic_initial_phase_offset() {
        let force =
            crate::effects::PeriodicForce::new(Waveform::Square, 100, 1000).with_phase(50);
        let mut state = started(Effect::periodic(0, force), 0);
        state.advance(ts(0));
        assert_eq!(state.phase(), 180);
        state.advance(ts(60));
        assert_eq!(state.phase(), 396);

        // Past the first turn: square is in its negative half, triangle overshoots.
        let sample = |waveform, phase| crate::evaluate::waveform_sample(waveform, phase, 1000);
        assert_eq!(sample(Waveform::Square, state.phase()), -1000);
        assert_eq!(sample(Waveform::Triangle, state.phase()), 1400);
        assert_eq!(sample(Waveform::Sine, state.phase()), sample(Waveform::Sine, 36));
    }

    #[test]
    fn test_ramp_slope() {
        let ramp = RampForce::new(0, 1000).with_envelope(Envelope::attack(10, 0).with_fade(10, 0));
        assert_eq!(ramp_slope(&ramp, 120), (1000_i64 << 16) / 100);
        assert_eq!(ramp_slope(&ramp, 20), 0);
        assert_eq!(ramp_slope(&ramp, 5), 0);
    }
}
