#![cfg_attr(not(feature = "std"), no_std)]
//! Wobble Core: no_std-ready math and data for the sine "wobble" generator.
//!
//! Features
//! - `std`       : (default) use the Rust standard library
//! - `no-std`    : build with `#![no_std]` and use the `libm` math backend
//! - `micromath` : use `micromath` as the math backend instead
//! - `fast-math` : make the polynomial sine the default [`sine::SineMode`]
//!
//! Modules
//! - [`dsp`]      : math backend, phase wrapping, one-pole smoothing
//! - [`sine`]     : exact / polynomial / lookup-table sine
//! - [`config`]   : the configuration object, display presets, validation
//! - [`params`]   : clamping parameter store
//! - [`waveform`] : primary + wobble displacement evaluator
//!
//! Design
//! - No heap allocations; everything here runs on a microcontroller
//! - Configuration is an explicit value passed by reference, never a global

pub mod config;
pub mod dsp;
pub mod params;
pub mod sine;
pub mod waveform;

/// Commonly used types/functions for convenience:
pub mod prelude {
    pub use crate::config::{
        ConfigError, CurveStyle, DisplayKind, EraseMode, Param, VariationMode, WobbleConfig,
    };
    pub use crate::dsp::{clamp, lerp, one_pole_coeff_ms, wrap_phase, SlewLimiter, TAU};
    pub use crate::params::{Bounds, ParameterStore, WobbleParameters};
    pub use crate::sine::{fast_sin, Sine, SineMode, FAST_SINE_MAX_ERROR};
    pub use crate::waveform::Waveform;
}
