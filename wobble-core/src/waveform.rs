//! Waveform evaluator: primary sine plus a smaller, faster "wobble" sine.
//!
//! ```text
//! x_norm  = 2π · x / width
//! primary = A     · sin(f     · x_norm + phase)
//! wobble  = A · r · sin(m · f · x_norm + phase)
//! ```
//!
//! Mapping columns into a fixed angular domain keeps the same number of
//! periods on screen whatever the resolution. The result is bounded by
//! [`Waveform::peak`] for every sine mode.

use crate::config::WobbleConfig;
use crate::dsp::TAU;
use crate::params::WobbleParameters;
use crate::sine::{Sine, SineMode};

#[derive(Copy, Clone, Debug)]
pub struct Waveform {
    width: u32,
    frequency_multiplier: f32,
    amplitude_ratio: f32,
    sine: Sine,
}

impl Waveform {
    pub fn new(config: &WobbleConfig) -> Self {
        Self {
            width: config.display.width.max(1),
            frequency_multiplier: config.wave.frequency_multiplier,
            amplitude_ratio: config.wave.amplitude_ratio,
            sine: Sine::new(config.performance.sine),
        }
    }

    #[inline] pub fn width(&self) -> u32 { self.width }
    #[inline] pub fn sine_mode(&self) -> SineMode { self.sine.mode() }

    /// Swap the sine backend (the table is built on demand).
    pub fn set_sine_mode(&mut self, mode: SineMode) {
        if mode != self.sine.mode() {
            self.sine = Sine::new(mode);
        }
    }

    /// Column index mapped into `[0, 2π)`.
    #[inline]
    pub fn normalize_x(&self, x: u32) -> f32 {
        TAU * x as f32 / self.width as f32
    }

    /// Displacement at column `x` for the given phase and parameters.
    #[inline]
    pub fn evaluate(&self, x: u32, phase: f32, params: &WobbleParameters) -> f32 {
        let xn = self.normalize_x(x);
        let a = params.amplitude;
        let f = params.frequency;
        let primary = a * self.sine.sin(f * xn + phase);
        let wobble = (a * self.amplitude_ratio) * self.sine.sin(self.frequency_multiplier * f * xn + phase);
        primary + wobble
    }

    /// Largest possible `|evaluate(..)|` for this amplitude.
    #[inline]
    pub fn peak(&self, amplitude: f32) -> f32 {
        amplitude + amplitude * self.amplitude_ratio
    }

    /// Fill `out` with displacements for columns `0, step, 2·step, …`.
    /// Returns the number of values written.
    pub fn evaluate_row(&self, params: &WobbleParameters, phase: f32, step: u32, out: &mut [f32]) -> usize {
        let step = step.max(1) as usize;
        let mut n = 0;
        for (slot, x) in out.iter_mut().zip((0..self.width).step_by(step)) {
            *slot = self.evaluate(x, phase, params);
            n += 1;
        }
        n
    }

    /// Number of sampled columns for a given stride.
    #[inline]
    pub fn sample_count(&self, step: u32) -> usize {
        let step = step.max(1);
        self.width.div_ceil(step) as usize
    }
}
