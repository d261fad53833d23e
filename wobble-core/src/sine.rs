//! Sine backends: exact, polynomial and lookup-table.
//!
//! The waveform evaluator calls sine twice per column, every frame, so on
//! small targets the approximations matter. Both approximations are bounded:
//!
//! | mode         | method                                        | max abs error |
//! |--------------|-----------------------------------------------|---------------|
//! | `Exact`      | backend `sin` (std / libm / micromath)         | -             |
//! | `Polynomial` | quadrant fold to [-π/2, π/2], 7th-order odd poly | ~1.6e-4     |
//! | `Table`      | 256 segments over one period, linear interpolation | ~7.5e-5   |
//!
//! [`FAST_SINE_MAX_ERROR`] is the documented bound for both and is what the
//! tests assert. Neither approximation leaves `[-1, 1]`: the truncated Taylor
//! series always under-shoots in magnitude on the folded range, and table
//! interpolation is clamped.

use crate::dsp::{clamp, lerp, m_sin, reduce_pi, wrap_phase, HALF_PI, TAU};
use core::f32::consts::PI;
#[allow(unused_imports)]
use num_traits::float::FloatCore;

/// Documented worst-case absolute error of the fast sine modes.
pub const FAST_SINE_MAX_ERROR: f32 = 1.0e-3;

/// Number of interpolation segments in [`SineTable`].
pub const SINE_TABLE_SEGMENTS: usize = 256;

/// Sine evaluation strategy.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SineMode {
    Exact,
    Polynomial,
    Table,
}

impl Default for SineMode {
    fn default() -> Self {
        if cfg!(feature = "fast-math") { SineMode::Polynomial } else { SineMode::Exact }
    }
}

impl SineMode {
    #[inline]
    pub fn is_fast(self) -> bool {
        !matches!(self, SineMode::Exact)
    }

    pub fn name(self) -> &'static str {
        match self {
            SineMode::Exact => "exact",
            SineMode::Polynomial => "polynomial",
            SineMode::Table => "table",
        }
    }
}

/// Fast sine with quadrant folding and a 7th-order odd polynomial:
/// `sin(x) ≈ x - x³/6 + x⁵/120 - x⁷/5040` on `[-π/2, π/2]`.
#[inline]
pub fn fast_sin(x: f32) -> f32 {
    let mut xr = reduce_pi(x);
    // sin(π - x) = sin(x) folds the outer quadrants inwards
    if xr > HALF_PI {
        xr = PI - xr;
    } else if xr < -HALF_PI {
        xr = -PI - xr;
    }

    let x2 = xr * xr;
    xr * (1.0 + x2 * (-1.0 / 6.0 + x2 * (1.0 / 120.0 + x2 * (-1.0 / 5040.0))))
}

/// One period of sine sampled at `SINE_TABLE_SEGMENTS + 1` points.
#[derive(Copy, Clone)]
pub struct SineTable {
    table: [f32; SINE_TABLE_SEGMENTS + 1],
}

impl core::fmt::Debug for SineTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SineTable")
            .field("segments", &SINE_TABLE_SEGMENTS)
            .finish()
    }
}

impl SineTable {
    pub fn new() -> Self {
        let mut table = [0.0; SINE_TABLE_SEGMENTS + 1];
        for (i, slot) in table.iter_mut().enumerate() {
            *slot = m_sin(TAU * i as f32 / SINE_TABLE_SEGMENTS as f32);
        }
        // close the period exactly so interpolation across the seam is clean
        table[SINE_TABLE_SEGMENTS] = table[0];
        Self { table }
    }

    #[inline]
    pub fn sin(&self, x: f32) -> f32 {
        let pos = wrap_phase(x) * (SINE_TABLE_SEGMENTS as f32 / TAU);
        let idx = (pos.floor() as usize).min(SINE_TABLE_SEGMENTS - 1);
        let frac = clamp(pos - idx as f32, 0.0, 1.0);
        clamp(lerp(self.table[idx], self.table[idx + 1], frac), -1.0, 1.0)
    }
}

impl Default for SineTable {
    fn default() -> Self { Self::new() }
}

/// A configured sine backend. Build once, evaluate many times.
#[derive(Copy, Clone, Debug)]
pub enum Sine {
    Exact,
    Polynomial,
    Table(SineTable),
}

impl Sine {
    pub fn new(mode: SineMode) -> Self {
        match mode {
            SineMode::Exact => Sine::Exact,
            SineMode::Polynomial => Sine::Polynomial,
            SineMode::Table => Sine::Table(SineTable::new()),
        }
    }

    #[inline]
    pub fn sin(&self, x: f32) -> f32 {
        match self {
            Sine::Exact => m_sin(x),
            Sine::Polynomial => fast_sin(x),
            Sine::Table(t) => t.sin(x),
        }
    }

    pub fn mode(&self) -> SineMode {
        match self {
            Sine::Exact => SineMode::Exact,
            Sine::Polynomial => SineMode::Polynomial,
            Sine::Table(_) => SineMode::Table,
        }
    }
}
