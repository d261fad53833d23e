//! Wobble Engine: the tick-driven animation on top of `wobble-core`.
//!
//! Crate layout:
//! - [`display`]   : `Display` seam, `Ink`, Bresenham lines, `FrameBuffer`
//! - [`control`]   : `AnalogInput` seam and the potentiometer sampler
//! - [`variation`] : time-driven auto-variation of amplitude and frequency
//! - [`render`]    : displacement → rows, overlays, curve drawing
//! - [`debug`]     : `DebugSink` seam, interval gate, line formats
//! - [`clock`]     : `Clock` seam with wall and manual clocks
//! - [`animator`]  : `Animator<D, A, S>` tying it all together
//!
//! The engine is single-threaded and cooperative. All mutation goes through
//! `&mut Animator`; there are no locks and no globals.

pub mod animator;
pub mod clock;
pub mod control;
pub mod debug;
pub mod display;
pub mod render;
pub mod variation;

pub use animator::Animator;
pub use clock::{Clock, ManualClock, SystemClock};
pub use control::{AnalogInput, Channel, ControlSampler, LatchedInput, LiveChannels, NullInput};
pub use debug::{BufferSink, DebugSink, IntervalGate, LogSink, NullSink};
pub use display::{Display, FrameBuffer, Ink, Point, Size};
pub use render::{RenderFrame, Renderer};
pub use variation::AutoVariation;
