//! Auto-variation: keeps the animation alive when nobody turns a knob.
//!
//! Amplitude and frequency each get their own update interval. At elapsed
//! time `t` the update step is `k = t / interval`; whenever `k` changes (and
//! `k >= 1`) a new target is computed as a pure function of `k` and written
//! through the store's clamping setter. Targets never depend on the previous
//! value, so a stalled clock that skips several steps lands directly on the
//! current step's value instead of compounding.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use wobble_core::config::{Param, VariationMode, WobbleConfig};
use wobble_core::params::{Bounds, ParameterStore};
use wobble_core::sine::fast_sin;

use crate::control::LiveChannels;

/// Oscillation advance per update step, in radians: a sweep of 0.02 and
/// 0.015 rad per frame, applied every 50 frames.
const AMPLITUDE_STEP_ANGLE: f32 = 1.0;
const FREQUENCY_STEP_ANGLE: f32 = 0.75;

#[derive(Copy, Clone, Debug)]
struct Schedule {
    param: Param,
    interval_ms: u32,
    step_angle: f32,
    salt: u64,
    last_step: u64,
}

impl Schedule {
    fn new(param: Param, interval_ms: u32, step_angle: f32, salt: u64) -> Self {
        Self { param, interval_ms, step_angle, salt, last_step: 0 }
    }

    /// Step index at `elapsed_ms`, or `None` if this schedule is off.
    #[inline]
    fn step_at(&self, elapsed_ms: u64) -> Option<u64> {
        (self.interval_ms > 0).then(|| elapsed_ms / u64::from(self.interval_ms))
    }
}

#[derive(Clone, Debug)]
pub struct AutoVariation {
    enabled: bool,
    mode: VariationMode,
    seed: u64,
    schedules: [Schedule; 2],
}

impl AutoVariation {
    pub fn new(config: &WobbleConfig) -> Self {
        let timing = &config.timing;
        Self {
            enabled: config.variation.enabled,
            mode: config.variation.mode,
            seed: config.variation.seed,
            schedules: [
                Schedule::new(Param::Amplitude, timing.amplitude_update_interval_ms, AMPLITUDE_STEP_ANGLE, 0xA3),
                Schedule::new(Param::Frequency, timing.frequency_update_interval_ms, FREQUENCY_STEP_ANGLE, 0xF7),
            ],
        }
    }

    #[inline] pub fn enabled(&self) -> bool { self.enabled }
    #[inline] pub fn set_enabled(&mut self, on: bool) { self.enabled = on; }
    #[inline] pub fn mode(&self) -> VariationMode { self.mode }

    /// Target for `param` at update step `step`. Pure in `(mode, seed, step)`.
    pub fn target(&self, param: Param, step: u64, bounds: Bounds) -> f32 {
        let Some(schedule) = self.schedules.iter().find(|s| s.param == param) else {
            return bounds.clamp(bounds.min);
        };
        match self.mode {
            VariationMode::Oscillate => {
                // reduce the step first so large step counts keep f32 precision
                let turns = (step as f64 * f64::from(schedule.step_angle)) % core::f64::consts::TAU;
                bounds.lerp(0.5 + 0.5 * fast_sin(turns as f32))
            }
            VariationMode::Random => {
                let mixed = self.seed ^ schedule.salt.rotate_left(32) ^ step.wrapping_mul(0x9E37_79B9_7F4A_7C15);
                let mut rng = StdRng::seed_from_u64(mixed);
                bounds.lerp(rng.gen::<f32>())
            }
        }
    }

    /// Apply any due updates for parameters that are not under live control.
    /// Returns how many parameters changed target this call.
    pub fn update(&mut self, elapsed_ms: u64, live: LiveChannels, store: &mut ParameterStore) -> usize {
        if !self.enabled {
            return 0;
        }
        let mut applied = 0;
        for i in 0..self.schedules.len() {
            let schedule = self.schedules[i];
            if live.is_live(schedule.param) {
                continue;
            }
            let Some(step) = schedule.step_at(elapsed_ms) else { continue };
            if step == 0 || step == schedule.last_step {
                continue;
            }
            let value = self.target(schedule.param, step, store.bounds_of(schedule.param));
            store.set(schedule.param, value);
            self.schedules[i].last_step = step;
            applied += 1;
            log::debug!("auto-variation step {step}: {} -> {value:.3}", schedule.param.name());
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(mode: VariationMode) -> (WobbleConfig, ParameterStore, AutoVariation) {
        let mut config = WobbleConfig::default();
        config.variation.mode = mode;
        let store = ParameterStore::new(&config);
        let variation = AutoVariation::new(&config);
        (config, store, variation)
    }

    #[test]
    fn nothing_changes_before_first_interval() {
        let (_, mut store, mut v) = setup(VariationMode::Oscillate);
        assert_eq!(v.update(2999, LiveChannels::default(), &mut store), 0);
        assert_eq!(store.snapshot(), store.defaults());
    }

    #[test]
    fn intervals_are_independent() {
        let (_, mut store, mut v) = setup(VariationMode::Oscillate);
        // frequency every 3 s, amplitude every 5 s
        assert_eq!(v.update(3000, LiveChannels::default(), &mut store), 1);
        assert_eq!(store.amplitude(), 0.7);
        assert_ne!(store.frequency(), 2.0);
        assert_eq!(v.update(5000, LiveChannels::default(), &mut store), 1);
        assert_ne!(store.amplitude(), 0.7);
        // same steps again: no-op
        assert_eq!(v.update(5500, LiveChannels::default(), &mut store), 0);
    }

    #[test]
    fn skipped_steps_do_not_compound() {
        let (_, mut a, mut va) = setup(VariationMode::Oscillate);
        let (_, mut b, mut vb) = setup(VariationMode::Oscillate);
        // `a` ticks every 50 ms, `b` stalls and wakes at the same instant
        let mut t = 0;
        while t <= 60_000 {
            va.update(t, LiveChannels::default(), &mut a);
            t += 50;
        }
        vb.update(60_000, LiveChannels::default(), &mut b);
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn random_mode_is_deterministic_and_bounded() {
        let (config, mut store, mut v) = setup(VariationMode::Random);
        let b = config.bounds.frequency;
        let first = v.target(Param::Frequency, 7, b);
        assert_eq!(first, v.target(Param::Frequency, 7, b));
        for t in (0..120_000).step_by(1000) {
            v.update(t, LiveChannels::default(), &mut store);
            assert!(config.bounds.amplitude.contains(store.amplitude()));
            assert!(b.contains(store.frequency()));
        }
    }

    #[test]
    fn live_and_disabled_parameters_are_left_alone() {
        let (_, mut store, mut v) = setup(VariationMode::Oscillate);
        let live = LiveChannels { frequency: true, ..Default::default() };
        v.update(3000, live, &mut store);
        assert_eq!(store.frequency(), 2.0);

        v.set_enabled(false);
        assert_eq!(v.update(50_000, LiveChannels::default(), &mut store), 0);
        assert_eq!(store.snapshot(), store.defaults());
    }

    #[test]
    fn zero_interval_turns_a_schedule_off() {
        let mut config = WobbleConfig::default();
        config.timing.amplitude_update_interval_ms = 0;
        let mut store = ParameterStore::new(&config);
        let mut v = AutoVariation::new(&config);
        v.update(100_000, LiveChannels::default(), &mut store);
        assert_eq!(store.amplitude(), 0.7);
        assert_ne!(store.frequency(), 2.0);
    }
}
