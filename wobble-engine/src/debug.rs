//! Debug output: a text sink, a rate gate, and the two line formats.

use core::fmt::Write as _;

use wobble_core::params::WobbleParameters;

use crate::display::Point;

/// Only columns that are multiples of this are listed in coordinate output.
pub const COORDINATE_COLUMN_PITCH: u32 = 8;

/// Where debug lines go.
pub trait DebugSink {
    fn emit(&mut self, text: &str);
}

impl<S: DebugSink + ?Sized> DebugSink for Box<S> {
    #[inline]
    fn emit(&mut self, text: &str) { (**self).emit(text) }
}

/// Forwards to the `log` facade under the `wobble::debug` target.
#[derive(Copy, Clone, Debug, Default)]
pub struct LogSink;

impl DebugSink for LogSink {
    fn emit(&mut self, text: &str) {
        log::info!(target: "wobble::debug", "{text}");
    }
}

#[derive(Copy, Clone, Debug, Default)]
pub struct NullSink;

impl DebugSink for NullSink {
    fn emit(&mut self, _text: &str) {}
}

/// Keeps every line; handy for tests and for hosts that render a log pane.
#[derive(Clone, Debug, Default)]
pub struct BufferSink {
    pub lines: Vec<String>,
}

impl DebugSink for BufferSink {
    fn emit(&mut self, text: &str) {
        self.lines.push(text.to_owned());
    }
}

/// Fires at most once per `interval_ms`. The first observation only arms
/// the gate, so nothing is emitted on the very first tick.
#[derive(Copy, Clone, Debug)]
pub struct IntervalGate {
    interval_ms: u64,
    last: Option<u64>,
}

impl IntervalGate {
    pub fn new(interval_ms: u32) -> Self {
        Self { interval_ms: u64::from(interval_ms), last: None }
    }

    /// True if at least one interval has passed since the gate last fired.
    pub fn ready(&mut self, now_ms: u64) -> bool {
        match self.last {
            None => {
                self.last = Some(now_ms);
                false
            }
            Some(last) if now_ms.saturating_sub(last) >= self.interval_ms => {
                self.last = Some(now_ms);
                true
            }
            Some(_) => false,
        }
    }

    pub fn reset(&mut self) { self.last = None; }
}

/// `amp=0.700 freq=2.000 speed=0.100 phase=1.234`
pub fn format_parameters(params: &WobbleParameters, phase: f32) -> String {
    format!(
        "amp={:.3} freq={:.3} speed={:.3} phase={:.3}",
        params.amplitude, params.frequency, params.phase_increment, phase
    )
}

/// `X: 0 Y:32 | X: 8 Y:20 | …` for every point on a column multiple of 8.
pub fn format_coordinates(points: &[Point]) -> String {
    let mut out = String::new();
    for p in points.iter().filter(|p| p.x % COORDINATE_COLUMN_PITCH == 0) {
        if !out.is_empty() {
            out.push_str(" | ");
        }
        let _ = write!(out, "X:{:2} Y:{:2}", p.x, p.y);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_arms_then_fires_once_per_interval() {
        let mut g = IntervalGate::new(2000);
        assert!(!g.ready(0));
        assert!(!g.ready(1999));
        assert!(g.ready(2000));
        assert!(!g.ready(2001));
        assert!(!g.ready(3999));
        assert!(g.ready(4100));
        g.reset();
        assert!(!g.ready(9000));
    }

    #[test]
    fn zero_interval_fires_every_call_after_arming() {
        let mut g = IntervalGate::new(0);
        assert!(!g.ready(5));
        assert!(g.ready(5));
        assert!(g.ready(6));
    }

    #[test]
    fn parameter_line() {
        let p = WobbleParameters { amplitude: 0.7, frequency: 2.0, phase_increment: 0.1 };
        assert_eq!(format_parameters(&p, 1.5), "amp=0.700 freq=2.000 speed=0.100 phase=1.500");
    }

    #[test]
    fn coordinate_line_lists_every_eighth_column() {
        let points: Vec<Point> = (0..20).map(|x| Point::new(x, 30 + x % 3)).collect();
        assert_eq!(format_coordinates(&points), "X: 0 Y:30 | X: 8 Y:32 | X:16 Y:31");
        // stride 3 only hits multiples of 8 at 0 and 24
        let strided: Vec<Point> = (0..10).map(|i| Point::new(i * 3, 5)).collect();
        assert_eq!(format_coordinates(&strided), "X: 0 Y: 5 | X:24 Y: 5");
        assert_eq!(format_coordinates(&[]), "");
    }

    #[test]
    fn boxed_sink_forwards() {
        let mut sink: Box<BufferSink> = Box::default();
        DebugSink::emit(&mut sink, "hello");
        assert_eq!(sink.lines, vec!["hello".to_owned()]);
        NullSink.emit("dropped");
        LogSink.emit("logged");
    }
}
