//! Math backend and small numeric helpers.
//!
//! Design goals:
//! - `no_std` ready (guarded by the crate feature `no-std`)
//! - Math backend selection that works in both `std` and `no_std` contexts
//! - Clean, side-effect free helpers that are easy to test
//!
//! Features used by this file:
//! - `no-std`    : route transcendental functions through `libm`
//! - `micromath` : route them through `micromath` instead
//!
//! Rounding helpers (`floor`, `round`, `abs`) come from
//! [`num_traits::float::FloatCore`] so they are available without `std`.

#![allow(clippy::excessive_precision)]

use core::f32::consts::PI;

use cfg_if::cfg_if;
#[allow(unused_imports)]
use num_traits::float::FloatCore;

// ----------------------------- Math backend selection -----------------------------

cfg_if! {
    // micromath preferred if explicitly requested (works in no_std)
    if #[cfg(feature = "micromath")] {
        use micromath::F32Ext as _;
        #[inline] pub(crate) fn m_sin(x: f32) -> f32 { x.sin() }
        #[inline] pub(crate) fn m_exp(x: f32) -> f32 { x.exp() }
    // libm (C math) in no_std
    } else if #[cfg(feature = "no-std")] {
        #[inline] pub(crate) fn m_sin(x: f32) -> f32 { libm::sinf(x) }
        #[inline] pub(crate) fn m_exp(x: f32) -> f32 { libm::expf(x) }
    // std backend
    } else {
        #[inline] pub(crate) fn m_sin(x: f32) -> f32 { x.sin() }
        #[inline] pub(crate) fn m_exp(x: f32) -> f32 { x.exp() }
    }
}

// --------------------------------- Constants -------------------------------------

/// 2π, the period of every sine term in this crate.
pub const TAU: f32 = 2.0 * PI;

/// π/2
pub const HALF_PI: f32 = 0.5 * PI;

// --------------------------------- Utilities -------------------------------------

#[inline]
pub fn clamp(x: f32, lo: f32, hi: f32) -> f32 {
    if x < lo { lo } else if x > hi { hi } else { x }
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Wrap an angle into `[0, 2π)`.
#[inline]
pub fn wrap_phase(p: f32) -> f32 {
    let w = p - TAU * (p / TAU).floor();
    // `p` just below a multiple of 2π can round up to exactly TAU
    if w >= TAU || w < 0.0 { 0.0 } else { w }
}

/// Reduce an angle into `[-π, π]` (nearest multiple of 2π removed).
#[inline]
pub fn reduce_pi(x: f32) -> f32 {
    x - (x / TAU).round() * TAU
}

/// Shortest angular distance between two phases, in `[0, π]`.
#[inline]
pub fn phase_distance(a: f32, b: f32) -> f32 {
    reduce_pi(a - b).abs()
}

// --------------------------------- Smoothing -------------------------------------

/// One-pole smoothing coefficient for a time constant `t_ms` (milliseconds)
/// at an update rate of `rate_hz` updates per second.
///
/// The discrete one-pole form is `y += (x - y) * (1 - a)` with
/// `a = exp(-1/(tau * rate))`. `t_ms <= 0` yields `0.0` (no smoothing).
#[inline]
pub fn one_pole_coeff_ms(t_ms: f32, rate_hz: f32) -> f32 {
    if t_ms <= 0.0 || rate_hz <= 0.0 { return 0.0; }
    let tau = t_ms * 0.001;
    m_exp(-1.0 / (tau * rate_hz))
}

/// One-pole slew/smoother: `y += (x - y) * (1 - a)`.
///
/// Used to calm jittery control inputs. The first `process` after
/// construction or `unseed` jumps straight to the input.
#[derive(Copy, Clone, Debug)]
pub struct SlewLimiter {
    alpha:  f32,
    y:      f32,
    seeded: bool,
}

impl SlewLimiter {
    #[inline]
    pub fn new(t_ms: f32, rate_hz: f32) -> Self {
        Self { alpha: one_pole_coeff_ms(t_ms, rate_hz), y: 0.0, seeded: false }
    }

    #[inline]
    pub fn set_time_ms(&mut self, t_ms: f32, rate_hz: f32) {
        self.alpha = one_pole_coeff_ms(t_ms, rate_hz);
    }

    #[inline]
    pub fn reset(&mut self, y0: f32) { self.y = y0; self.seeded = true; }

    #[inline]
    pub fn unseed(&mut self) { self.seeded = false; }

    #[inline]
    pub fn process(&mut self, x: f32) -> f32 {
        if self.seeded {
            self.y += (x - self.y) * (1.0 - self.alpha);
        } else {
            self.reset(x);
        }
        self.y
    }

    #[inline]
    pub fn value(&self) -> f32 { self.y }
}

// --------------------------------- Tests (std only) ------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_limits_both_sides() {
        assert_eq!(clamp(2.0, 0.0, 1.0), 1.0);
        assert_eq!(clamp(-2.0, 0.0, 1.0), 0.0);
        assert_eq!(clamp(0.25, 0.0, 1.0), 0.25);
    }

    #[test]
    fn wrap_phase_stays_in_range() {
        for p in [-20.0, -TAU, -0.1, 0.0, 0.1, TAU, TAU + 0.5, 100.0] {
            let w = wrap_phase(p);
            assert!((0.0..TAU).contains(&w), "p={p} w={w}");
            assert!(phase_distance(w, p) < 1e-4, "p={p} w={w}");
        }
    }

    #[test]
    fn slew_moves_towards_target() {
        let rate = 20.0;
        let mut s = SlewLimiter::new(200.0, rate);
        s.process(0.0);
        for _ in 0..200 { s.process(1.0); }
        assert!(s.value() > 0.99);
    }

    #[test]
    fn slew_seeds_on_first_sample() {
        let mut s = SlewLimiter::new(500.0, 20.0);
        assert_eq!(s.process(0.75), 0.75);
        let next = s.process(0.0);
        assert!(next > 0.0 && next < 0.75, "next={next}");
    }

    #[test]
    fn zero_time_constant_disables_smoothing() {
        let mut s = SlewLimiter::new(0.0, 20.0);
        s.process(0.2);
        assert_eq!(s.process(0.9), 0.9);
    }
}
