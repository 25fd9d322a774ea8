//! Timer-driven force feedback compositor.
//!
//! The engine owns two locks that are never nested on the same thread:
//! the effect table domain ([`Core`]) and the tick scheduler. A control call
//! releases the table lock before it reads the scheduler (`play` does, to arm
//! the timer); the tick takes the scheduler, then *tries* the table lock and
//! backs off by one period if a control call holds it. Device commands are
//! always queued after the table lock is released.

use std::io;
use std::sync::Arc;

use openracing_atomic::{CounterSnapshot, EngineCounters, PeakLevel};
use openracing_errors::{FfbError, FfbResult, OpenRacingError, TransportError, ValidationError};
use openracing_ffb::{Effect, EffectTable, MixSettings, Mixer, PlayOutcome, Timestamp};
use openracing_scheduler::{
    Admission, TickScheduler, TickTarget, TimerAction, TimerDriver, TimerHandle,
};
use parking_lot::Mutex;
use racing_wheel_hid_logitech_protocol::{
    AutocenterStyle, Command, RangeStyle, SlotBank, build_autocenter_ffex_report,
    build_fixed_loop_report, build_set_autocenter_reports, build_set_leds_report,
    build_set_range_dfp_reports, build_set_range_report, build_stop_all_report,
};
use tracing::{debug, info, trace, warn};

use crate::config::EngineConfig;
use crate::device::DeviceDescriptor;
use crate::leds::{LevelClass, LevelMeter, LevelObserver};
use crate::ports::{Clock, CommandChannel, MonotonicClock};

/// Result of one timer expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickReport {
    /// No work done; fire again after `retry_after_ms`.
    Deferred { retry_after_ms: u32 },
    /// Effects evaluated and dirty slots transmitted.
    Completed {
        /// Slot and LED commands accepted by the channel.
        commands_sent: usize,
        /// Combined force level of this tick.
        ffb_level: u32,
        /// Level class published when a meter window closed.
        level: Option<LevelClass>,
        next: TimerAction,
    },
}

impl TickReport {
    /// Delay until the next tick, `None` when the timer should stop.
    pub fn next_delay_ms(self) -> Option<u32> {
        match self {
            TickReport::Deferred { retry_after_ms } => Some(retry_after_ms),
            TickReport::Completed { next, .. } => next.delay_ms(),
        }
    }
}

/// Everything guarded by the effect table lock.
#[derive(Debug)]
struct Core {
    table: EffectTable,
    slots: SlotBank,
    mixer: Mixer,
    settings: MixSettings,
    meter: LevelMeter,
    range: u16,
}

/// Force feedback engine for one wheel.
///
/// Wrap it in an [`Arc`] and call [`Engine::spawn_timer`] to drive it from a
/// dedicated thread, or call [`Engine::tick`] directly.
pub struct Engine {
    device: DeviceDescriptor,
    config: EngineConfig,
    core: Mutex<Core>,
    scheduler: Mutex<TickScheduler>,
    channel: Arc<dyn CommandChannel>,
    clock: Arc<dyn Clock>,
    observer: Option<Arc<dyn LevelObserver>>,
    timer: TimerHandle,
    counters: EngineCounters,
    peak: PeakLevel,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("device", &self.device)
            .field("config", &self.config)
            .field("counters", &self.counters.snapshot())
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Create an engine that sends device commands through `channel`.
    ///
    /// # Errors
    ///
    /// Returns the validation error if `config` is out of range.
    pub fn new(
        device: DeviceDescriptor,
        config: EngineConfig,
        channel: Arc<dyn CommandChannel>,
    ) -> Result<Self, ValidationError> {
        config.validate()?;
        info!(
            model = ?device.model(),
            period_ms = config.timer_period_ms,
            policy = config.backpressure.name(),
            "Creating force feedback engine"
        );

        let (_, max_range) = device.range_limits();
        Ok(Self {
            device,
            core: Mutex::new(Core {
                table: EffectTable::new(),
                slots: SlotBank::new(),
                mixer: Mixer::new(),
                settings: config.mix_settings(),
                meter: LevelMeter::new(config.ffb_leds, config.level_meter_window_ms),
                range: max_range,
            }),
            scheduler: Mutex::new(TickScheduler::new(config.scheduler_config())),
            config,
            channel,
            clock: Arc::new(MonotonicClock::new()),
            observer: None,
            timer: TimerHandle::new(),
            counters: EngineCounters::new(),
            peak: PeakLevel::new(),
        })
    }

    /// Replace the millisecond clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Receive one level class per meter window.
    pub fn with_level_observer(mut self, observer: Arc<dyn LevelObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn device(&self) -> &DeviceDescriptor {
        &self.device
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Handle of the timer that drives [`Engine::tick`].
    pub fn timer(&self) -> &TimerHandle {
        &self.timer
    }

    /// Spawn the timer thread. Ticks start with the first played effect.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the thread cannot be spawned.
    pub fn spawn_timer(self: &Arc<Self>) -> io::Result<TimerDriver> {
        TimerDriver::spawn(self.timer.clone(), Arc::clone(self))
    }

    /// Store `effect` in its table slot.
    ///
    /// # Errors
    ///
    /// - [`FfbError::UnsupportedEffect`] if the wheel does not accept the class
    /// - [`FfbError::InvalidEffectId`], [`FfbError::ZeroPeriod`] and
    ///   [`FfbError::TypeMismatch`] from the table; nothing is changed
    pub fn upload(&self, effect: Effect) -> FfbResult {
        let kind = effect.kind();
        if !self.device.supports(kind) {
            return Err(FfbError::UnsupportedEffect { kind: kind.name() });
        }
        let now = self.clock.now();
        let result = self.core.lock().table.upload(effect, now);
        match result {
            Ok(()) => debug!(id = effect.id, kind = kind.name(), "Effect uploaded"),
            Err(e) if e.is_invalid_parameter() => {
                debug!(id = effect.id, error = %e, "Effect upload rejected")
            }
            Err(e) => warn!(id = effect.id, error = %e, "Effect upload failed"),
        }
        result
    }

    /// Start (`count > 0`, repeated `count` times) or stop (`count == 0`)
    /// effect `id`. Starting the first effect starts the timer.
    ///
    /// # Errors
    ///
    /// [`FfbError::InvalidEffectId`] or [`FfbError::NotUploaded`].
    pub fn play(&self, id: usize, count: u32) -> FfbResult<PlayOutcome> {
        let now = self.clock.now();
        let outcome = self.core.lock().table.play(id, count, now)?;
        match outcome {
            PlayOutcome::Restarted => debug!(id, count, "Effect restarted"),
            PlayOutcome::Ignored => trace!(id, "Stop of idle effect ignored"),
            _ => debug!(id, count, ?outcome, "Effect playback changed"),
        }

        if outcome.needs_timer() {
            let period_ms = self.scheduler.lock().period_ms();
            if self.timer.start(period_ms) {
                info!(period_ms, "Starting force feedback timer");
            }
        }
        Ok(outcome)
    }

    /// Number of started effects.
    pub fn active_effects(&self) -> usize {
        self.core.lock().table.active_count()
    }

    /// Application gain, applied on the next tick.
    pub fn set_gain(&self, gain: u16) {
        self.core.lock().settings.device_gain = gain;
    }

    /// User-facing master gain, applied on the next tick.
    pub fn set_master_gain(&self, gain: u16) {
        self.core.lock().settings.master_gain = gain;
    }

    /// Gains and condition intensities currently in effect.
    pub fn mix_settings(&self) -> MixSettings {
        self.core.lock().settings
    }

    /// Show or stop showing the force level on the rev lights.
    pub fn set_ffb_leds(&self, enabled: bool) {
        self.core.lock().meter.set_enabled(enabled);
    }

    /// Put the wheel in fixed loop mode as configured, forget every effect and
    /// push the neutral command of each slot.
    ///
    /// # Errors
    ///
    /// The first transport error; later commands are still attempted.
    pub fn init_slots(&self) -> Result<(), TransportError> {
        let mut result = self.transmit(&build_fixed_loop_report(self.config.fixed_loop));
        let batch = {
            let mut core = self.core.lock();
            core.table.clear();
            core.slots.reset();
            core.mixer.reset();
            core.slots.initialize()
        };
        for command in batch.iter() {
            result = result.and(self.transmit(command));
        }
        info!(fixed_loop = self.config.fixed_loop, "Force feedback slots initialized");
        result
    }

    /// Forget every effect and tell the wheel to stop all forces.
    ///
    /// # Errors
    ///
    /// The transport error if the command cannot be queued.
    pub fn stop_all(&self) -> Result<(), TransportError> {
        self.core.lock().table.clear();
        info!("Stopping all effects");
        self.transmit(&build_stop_all_report())
    }

    /// Set the centering spring strength (0 disables it).
    ///
    /// # Errors
    ///
    /// The first transport error.
    pub fn set_autocenter(&self, magnitude: u16) -> Result<(), TransportError> {
        debug!(magnitude, "Setting autocenter");
        match self.device.autocenter_style() {
            AutocenterStyle::None => {
                debug!("Wheel has no autocenter spring");
                Ok(())
            }
            AutocenterStyle::FormulaForceEx => {
                self.transmit(&build_autocenter_ffex_report(magnitude))
            }
            style @ (AutocenterStyle::Default | AutocenterStyle::Momo) => {
                let momo = style == AutocenterStyle::Momo;
                let sequence = build_set_autocenter_reports(magnitude, momo);
                self.transmit_all(sequence.as_slice())
            }
        }
    }

    /// Set the rotation range in degrees. `0` selects the wheel's maximum.
    ///
    /// Returns the range now in effect.
    ///
    /// # Errors
    ///
    /// A validation error if the wheel has a fixed range or `degrees` is
    /// outside its limits, a transport error if the command cannot be queued.
    pub fn set_range(&self, degrees: u16) -> Result<u16, OpenRacingError> {
        let (min, max) = self.device.range_limits();
        let degrees = if degrees == 0 { max } else { degrees };

        let style = self.device.range_style();
        if style == RangeStyle::None {
            return Err(ValidationError::constraint(format!(
                "{:?} has a fixed rotation range",
                self.device.model()
            ))
            .into());
        }
        if degrees < min || degrees > max {
            return Err(ValidationError::out_of_range("range", degrees, min, max).into());
        }

        match style {
            RangeStyle::DrivingForcePro => {
                self.transmit_all(build_set_range_dfp_reports(degrees).as_slice())?
            }
            _ => self.transmit(&build_set_range_report(degrees))?,
        }
        self.core.lock().range = degrees;
        info!(degrees, "Rotation range set");
        Ok(degrees)
    }

    /// Rotation range last set, initially the wheel's maximum.
    pub fn range(&self) -> u16 {
        self.core.lock().range
    }

    /// Highest force level since the last reset.
    pub fn peak_level(&self) -> u32 {
        self.peak.get()
    }

    /// Reset the peak level to `level`, usually 0.
    pub fn reset_peak_level(&self, level: u32) {
        self.peak.set(level);
    }

    pub fn counters(&self) -> CounterSnapshot {
        self.counters.snapshot()
    }

    /// Current tick period. Grows under the static backpressure policy.
    pub fn period_ms(&self) -> u32 {
        self.scheduler.lock().period_ms()
    }

    /// Block until every queued command has reached the wheel.
    pub fn flush(&self) {
        self.channel.wait_for_drain();
    }

    /// Run one tick: evaluate every started effect, mix, encode and transmit
    /// the slots whose bytes changed.
    pub fn tick(&self) -> TickReport {
        self.counters.inc_tick();
        let mut scheduler = self.scheduler.lock();

        if let Admission::Defer { retry_after_ms } = scheduler.admit(self.channel.is_busy()) {
            self.counters.inc_deferred();
            return TickReport::Deferred { retry_after_ms };
        }

        let now = self.clock.now();
        let Some(mut guard) = self.core.try_lock() else {
            self.counters.inc_deferred();
            let retry_after_ms = match scheduler.contended() {
                Admission::Defer { retry_after_ms } => retry_after_ms,
                Admission::Run => scheduler.period_ms(),
            };
            return TickReport::Deferred { retry_after_ms };
        };

        let (batch, ffb_level, active, level) = {
            let core = &mut *guard;
            Self::compose(core, now);
            let ffb_level = core.mixer.finish(&core.settings);
            let batch = core.slots.encode(core.mixer.channels());
            let active = core.table.active_count();
            let level = core.meter.observe(ffb_level, active, scheduler.period_ms());
            (batch, ffb_level, active, level)
        };
        drop(guard);

        self.peak.record(ffb_level);
        let mut commands_sent = 0;
        for command in batch.iter() {
            if self.transmit(command).is_ok() {
                commands_sent += 1;
            }
        }

        if let Some(class) = level {
            if self.device.has_leds() {
                let leds = build_set_leds_report(class.led_mask());
                if self.transmit(&leds).is_ok() {
                    commands_sent += 1;
                }
            }
            if let Some(observer) = &self.observer {
                observer.on_level(class);
            }
        }

        let next = scheduler.after_tick(active);
        if next == TimerAction::Stop {
            info!("No active effects, stopping force feedback timer");
        }
        trace!(ffb_level, commands_sent, active, "Tick completed");
        TickReport::Completed {
            commands_sent,
            ffb_level,
            level,
            next,
        }
    }

    /// Evaluate the table into the mixer for time `now`.
    fn compose(core: &mut Core, now: Timestamp) {
        let Core { table, mixer, .. } = core;
        mixer.reset();
        table.for_each_playing(now, |state| mixer.accumulate(state));
    }

    fn transmit(&self, command: &Command) -> Result<(), TransportError> {
        match self.channel.send(command) {
            Ok(()) => {
                self.counters.inc_commands_sent(1);
                Ok(())
            }
            Err(e) if e.is_transient() => {
                self.counters.inc_dropped();
                debug!(error = %e, "Dropped command {:02X?}", command);
                Err(e)
            }
            Err(e) => {
                self.counters.inc_transmit_error();
                warn!(error = %e, "Failed to queue command {:02X?}", command);
                Err(e)
            }
        }
    }

    fn transmit_all(&self, commands: &[Command]) -> Result<(), TransportError> {
        commands
            .iter()
            .try_for_each(|command| self.transmit(command))
    }
}

impl TickTarget for Engine {
    fn on_timer(&self) -> Option<u32> {
        self.tick().next_delay_ms()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_harness::{ManualClock, RecordingChannel};
    use openracing_ffb::{ConstantForce, EffectKind};
    use racing_wheel_hid_logitech_protocol::LogitechModel;

    fn engine() -> Result<(Engine, Arc<RecordingChannel>, Arc<ManualClock>), ValidationError> {
        let channel = Arc::new(RecordingChannel::new());
        let clock = Arc::new(ManualClock::new(0));
        let engine = Engine::new(
            DeviceDescriptor::from_model(LogitechModel::G27),
            EngineConfig::default(),
            channel.clone(),
        )?
        .with_clock(clock.clone());
        Ok((engine, channel, clock))
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = EngineConfig {
            spring_level: 150,
            ..EngineConfig::default()
        };
        let result = Engine::new(
            DeviceDescriptor::from_model(LogitechModel::G27),
            config,
            Arc::new(RecordingChannel::new()),
        );
        assert!(matches!(result, Err(ValidationError::OutOfRange { .. })));
    }

    #[test]
    fn test_unsupported_class_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
        let channel = Arc::new(RecordingChannel::new());
        let device = DeviceDescriptor::from_model(LogitechModel::G27)
            .with_effects(openracing_ffb::EffectClassSet::empty().with(EffectKind::Spring));
        let engine = Engine::new(device, EngineConfig::default(), channel)?;

        let result = engine.upload(Effect::constant(0, ConstantForce::new(100)));
        assert_eq!(result, Err(FfbError::UnsupportedEffect { kind: "constant" }));
        Ok(())
    }

    #[test]
    fn test_play_starts_timer_once() -> Result<(), Box<dyn std::error::Error>> {
        let (engine, _channel, _clock) = engine()?;
        engine.upload(Effect::constant(0, ConstantForce::new(100)))?;
        engine.upload(Effect::constant(1, ConstantForce::new(100)))?;

        assert!(!engine.timer().is_active());
        assert_eq!(engine.play(0, 1)?, PlayOutcome::Activated);
        assert!(engine.timer().is_active());
        assert_eq!(engine.play(1, 1)?, PlayOutcome::Activated);
        assert_eq!(engine.active_effects(), 2);
        engine.timer().cancel();
        Ok(())
    }

    #[test]
    fn test_tick_stops_when_idle() -> Result<(), Box<dyn std::error::Error>> {
        let (engine, channel, _clock) = engine()?;
        let report = engine.tick();
        assert_eq!(report.next_delay_ms(), None);
        // Nothing played yet, but the first encode sends every slot once.
        assert_eq!(channel.sent().len(), 4);
        Ok(())
    }

    #[test]
    fn test_contended_tick_defers() -> Result<(), Box<dyn std::error::Error>> {
        let (engine, channel, _clock) = engine()?;
        let guard = engine.core.lock();
        assert_eq!(engine.tick(), TickReport::Deferred { retry_after_ms: 2 });
        drop(guard);
        assert!(channel.sent().is_empty());
        assert_eq!(engine.counters().deferred_ticks, 1);
        Ok(())
    }

    #[test]
    fn test_fixed_range_wheel() -> Result<(), Box<dyn std::error::Error>> {
        let channel = Arc::new(RecordingChannel::new());
        let engine = Engine::new(
            DeviceDescriptor::from_model(LogitechModel::Momo),
            EngineConfig::default(),
            channel.clone(),
        )?;
        assert!(matches!(
            engine.set_range(200),
            Err(OpenRacingError::Validation(ValidationError::ConstraintViolation(_)))
        ));
        assert!(channel.sent().is_empty());
        assert_eq!(engine.range(), 270);
        Ok(())
    }
}
