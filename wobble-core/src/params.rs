//! Parameter store: the only owner of the live wave parameters.
//!
//! Every write goes through a clamping setter, so readers can rely on all
//! three values always lying within their configured bounds. Out-of-range
//! input is normalized, never rejected; a NaN reading is ignored.

use crate::config::{BoundsConfig, Param, WobbleConfig};
use crate::dsp::clamp;

/// Closed range `[min, max]`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds {
    pub min: f32,
    pub max: f32,
}

impl Bounds {
    #[inline]
    pub const fn new(min: f32, max: f32) -> Self { Self { min, max } }

    #[inline]
    pub fn clamp(&self, v: f32) -> f32 { clamp(v, self.min, self.max) }

    #[inline]
    pub fn contains(&self, v: f32) -> bool { v >= self.min && v <= self.max }

    /// Map `t` in `[0, 1]` onto the range (clamped). Exact at both ends.
    #[inline]
    pub fn lerp(&self, t: f32) -> f32 {
        let t = clamp(t, 0.0, 1.0);
        self.clamp(self.min * (1.0 - t) + self.max * t)
    }
}

/// Snapshot of the live parameters.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct WobbleParameters {
    pub amplitude: f32,
    pub frequency: f32,
    pub phase_increment: f32,
}

#[derive(Clone, Debug)]
pub struct ParameterStore {
    bounds: BoundsConfig,
    defaults: WobbleParameters,
    current: WobbleParameters,
}

impl ParameterStore {
    /// Store initialised with the configured defaults, clamped into bounds.
    pub fn new(config: &WobbleConfig) -> Self {
        let bounds = config.bounds;
        let defaults = WobbleParameters {
            amplitude: bounds.amplitude.clamp(config.wave.amplitude),
            frequency: bounds.frequency.clamp(config.wave.frequency),
            phase_increment: bounds.phase_increment.clamp(config.wave.phase_increment),
        };
        Self { bounds, defaults, current: defaults }
    }

    #[inline] pub fn amplitude(&self) -> f32 { self.current.amplitude }
    #[inline] pub fn frequency(&self) -> f32 { self.current.frequency }
    #[inline] pub fn phase_increment(&self) -> f32 { self.current.phase_increment }

    #[inline] pub fn snapshot(&self) -> WobbleParameters { self.current }
    #[inline] pub fn defaults(&self) -> WobbleParameters { self.defaults }
    #[inline] pub fn bounds(&self) -> &BoundsConfig { &self.bounds }

    pub fn bounds_of(&self, param: Param) -> Bounds {
        match param {
            Param::Amplitude => self.bounds.amplitude,
            Param::Frequency => self.bounds.frequency,
            Param::PhaseIncrement => self.bounds.phase_increment,
        }
    }

    #[inline] pub fn set_amplitude(&mut self, v: f32) { self.set(Param::Amplitude, v); }
    #[inline] pub fn set_frequency(&mut self, v: f32) { self.set(Param::Frequency, v); }
    #[inline] pub fn set_phase_increment(&mut self, v: f32) { self.set(Param::PhaseIncrement, v); }

    /// Clamp `v` into the parameter's bounds and store it.
    pub fn set(&mut self, param: Param, v: f32) {
        if v.is_nan() {
            return;
        }
        let v = self.bounds_of(param).clamp(v);
        match param {
            Param::Amplitude => self.current.amplitude = v,
            Param::Frequency => self.current.frequency = v,
            Param::PhaseIncrement => self.current.phase_increment = v,
        }
    }

    pub fn get(&self, param: Param) -> f32 {
        match param {
            Param::Amplitude => self.current.amplitude,
            Param::Frequency => self.current.frequency,
            Param::PhaseIncrement => self.current.phase_increment,
        }
    }

    /// Back to the configured defaults.
    pub fn reset(&mut self) { self.current = self.defaults; }
}
