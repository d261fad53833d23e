//! The animation loop.
//!
//! An [`Animator`] owns the parameter store, the phase and every per-tick
//! component, plus the three host seams (display, analog input, debug sink).
//! It is generic over the seams so a concrete host pays no dynamic dispatch;
//! boxed trait objects work too for hosts that pick a display at runtime.
//!
//! Each [`Animator::tick`] runs, in this order:
//! 1. control sampling
//! 2. auto-variation
//! 3. phase advance, wrapped into `[0, 2π)`
//! 4. rendering
//! 5. rate-limited debug output, at most one sink emit per debug interval

use wobble_core::config::{ConfigError, DebugConfig, WobbleConfig};
use wobble_core::dsp::wrap_phase;
use wobble_core::params::{ParameterStore, WobbleParameters};
use wobble_core::waveform::Waveform;

use crate::clock::Clock;
use crate::control::{AnalogInput, ControlSampler};
use crate::debug::{format_coordinates, format_parameters, DebugSink, IntervalGate};
use crate::display::Display;
use crate::render::{RenderFrame, Renderer};
use crate::variation::AutoVariation;

pub struct Animator<D: Display, A: AnalogInput, S: DebugSink> {
    config: WobbleConfig,
    store: ParameterStore,
    sampler: ControlSampler,
    variation: AutoVariation,
    waveform: Waveform,
    renderer: Renderer,
    display: D,
    input: A,
    sink: S,
    phase: f32,
    start_ms: Option<u64>,
    frames: u64,
    debug: DebugConfig,
    debug_gate: IntervalGate,
    coordinate_gate: IntervalGate,
    /// Coordinate gate fired since the last emit.
    coordinates_due: bool,
}

impl<D: Display, A: AnalogInput, S: DebugSink> Animator<D, A, S> {
    /// Validate `config` and wire up every component.
    pub fn new(config: WobbleConfig, display: D, input: A, sink: S) -> Result<Self, ConfigError> {
        config.validate()?;

        let size = display.size();
        if (size.width, size.height) != (config.display.width, config.display.height) {
            log::warn!(
                "display reports {}x{} but the configuration says {}x{}; drawing to the configured geometry",
                size.width,
                size.height,
                config.display.width,
                config.display.height
            );
        }
        log::info!(
            "wobble animator: {} {}x{}, sine={}, step={}, variation={}",
            config.display.kind.name(),
            config.display.width,
            config.display.height,
            config.performance.sine.name(),
            config.performance.calculation_step,
            if config.variation.enabled { "on" } else { "off" },
        );

        Ok(Self {
            store: ParameterStore::new(&config),
            sampler: ControlSampler::new(&config),
            variation: AutoVariation::new(&config),
            waveform: Waveform::new(&config),
            renderer: Renderer::new(&config),
            display,
            input,
            sink,
            phase: 0.0,
            start_ms: None,
            frames: 0,
            debug: config.debug,
            debug_gate: IntervalGate::new(config.timing.debug_print_interval_ms),
            coordinate_gate: IntervalGate::new(config.timing.coordinate_interval_ms),
            coordinates_due: false,
            config,
        })
    }

    /// Advance the animation by one frame at wall time `now_ms`.
    pub fn tick(&mut self, now_ms: u64) -> &RenderFrame {
        let start = *self.start_ms.get_or_insert(now_ms);
        let elapsed = now_ms.saturating_sub(start);

        let live = self.sampler.sample(&mut self.input, &mut self.store);
        self.variation.update(elapsed, live, &mut self.store);

        let params = self.store.snapshot();
        self.phase = wrap_phase(self.phase + params.phase_increment);

        self.renderer.render(&mut self.display, &self.waveform, &params, self.phase);
        self.frames += 1;
        log::trace!("frame {} at {} ms, phase {:.4}", self.frames, elapsed, self.phase);

        self.emit_debug(now_ms, &params);
        self.renderer.frame()
    }

    fn emit_debug(&mut self, now_ms: u64, params: &WobbleParameters) {
        if !self.debug.enabled {
            return;
        }
        if self.debug.coordinates && self.coordinate_gate.ready(now_ms) {
            self.coordinates_due = true;
        }
        if !self.debug_gate.ready(now_ms) {
            return;
        }
        let mut text = format_parameters(params, self.phase);
        if self.coordinates_due {
            text.push('\n');
            text.push_str(&format_coordinates(&self.renderer.frame().points));
            self.coordinates_due = false;
        }
        self.sink.emit(&text);
    }

    /// Tick, then sleep the frame delay, until `max_frames` have run (or
    /// forever when `None`). Returns the number of frames run.
    pub fn run<C: Clock + ?Sized>(&mut self, clock: &mut C, max_frames: Option<u64>) -> u64 {
        let delay = self.config.timing.frame_delay_ms;
        let mut n = 0;
        while max_frames.map_or(true, |max| n < max) {
            self.tick(clock.now_ms());
            n += 1;
            clock.sleep_ms(delay);
        }
        log::debug!("animation stopped after {n} frames");
        n
    }

    #[inline] pub fn config(&self) -> &WobbleConfig { &self.config }
    #[inline] pub fn phase(&self) -> f32 { self.phase }
    #[inline] pub fn frames(&self) -> u64 { self.frames }
    #[inline] pub fn frame(&self) -> &RenderFrame { self.renderer.frame() }
    #[inline] pub fn params(&self) -> WobbleParameters { self.store.snapshot() }

    #[inline] pub fn store(&self) -> &ParameterStore { &self.store }
    #[inline] pub fn store_mut(&mut self) -> &mut ParameterStore { &mut self.store }
    #[inline] pub fn waveform(&self) -> &Waveform { &self.waveform }
    #[inline] pub fn waveform_mut(&mut self) -> &mut Waveform { &mut self.waveform }
    #[inline] pub fn sampler(&self) -> &ControlSampler { &self.sampler }
    #[inline] pub fn sampler_mut(&mut self) -> &mut ControlSampler { &mut self.sampler }
    #[inline] pub fn variation_mut(&mut self) -> &mut AutoVariation { &mut self.variation }
    #[inline] pub fn renderer_mut(&mut self) -> &mut Renderer { &mut self.renderer }

    #[inline] pub fn display(&self) -> &D { &self.display }
    #[inline] pub fn display_mut(&mut self) -> &mut D { &mut self.display }
    #[inline] pub fn input_mut(&mut self) -> &mut A { &mut self.input }
    #[inline] pub fn sink(&self) -> &S { &self.sink }
    #[inline] pub fn sink_mut(&mut self) -> &mut S { &mut self.sink }

    /// Restart from phase 0 with default parameters; the next tick becomes
    /// the new time origin.
    pub fn restart(&mut self) {
        self.store.reset();
        self.phase = 0.0;
        self.start_ms = None;
        self.frames = 0;
        self.variation = AutoVariation::new(&self.config);
        self.debug_gate.reset();
        self.coordinate_gate.reset();
        self.coordinates_due = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::control::{LatchedInput, NullInput};
    use crate::debug::{BufferSink, NullSink};
    use crate::display::FrameBuffer;
    use wobble_core::config::PIN_A2;

    fn animator(config: WobbleConfig) -> Animator<FrameBuffer, NullInput, BufferSink> {
        let fb = FrameBuffer::new(config.display.width, config.display.height);
        Animator::new(config, fb, NullInput, BufferSink::default()).unwrap()
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = WobbleConfig::default();
        config.performance.calculation_step = 0;
        let r = Animator::new(config, FrameBuffer::new(128, 64), NullInput, NullSink);
        assert!(matches!(r, Err(ConfigError::ZeroStep)));
    }

    #[test]
    fn tick_advances_phase_and_presents() {
        let mut a = animator(WobbleConfig::default());
        a.tick(0);
        assert!((a.phase() - 0.1).abs() < 1e-6);
        a.tick(50);
        assert!((a.phase() - 0.2).abs() < 1e-6);
        assert_eq!(a.display().presented(), 2);
        assert_eq!(a.frame().points.len(), 128);
    }

    #[test]
    fn run_uses_the_frame_delay() {
        let mut a = animator(WobbleConfig::default());
        let mut clock = ManualClock::default();
        assert_eq!(a.run(&mut clock, Some(10)), 10);
        assert_eq!(clock.now_ms(), 500);
        assert_eq!(a.frames(), 10);
    }

    #[test]
    fn debug_lines_are_rate_limited() {
        let mut config = WobbleConfig::default();
        config.debug.coordinates = true;
        let mut a = animator(config);
        let mut clock = ManualClock::default();
        // 0..=4950 ms: gates arm at 0 and fire at 2000 and 4000
        a.run(&mut clock, Some(100));
        let lines = &a.sink().lines;
        assert_eq!(lines.len(), 2);
        for line in lines {
            let (params, coords) = line.split_once('\n').unwrap();
            assert!(params.starts_with("amp="));
            assert!(coords.starts_with("X: 0 Y:"));
        }
    }

    #[test]
    fn one_emit_per_debug_interval_with_coordinates_on() {
        let mut config = WobbleConfig::default();
        config.debug.coordinates = true;
        let mut a = animator(config);
        let mut emitted_at = Vec::new();
        for t in (0..10_000).step_by(50) {
            let before = a.sink().lines.len();
            a.tick(t);
            let after = a.sink().lines.len();
            assert!(after - before <= 1, "{} emits at {t} ms", after - before);
            if after > before {
                emitted_at.push(t);
            }
        }
        assert_eq!(emitted_at, vec![2000, 4000, 6000, 8000]);
    }

    #[test]
    fn slower_coordinate_interval_rides_on_the_next_debug_emit() {
        let mut config = WobbleConfig::default();
        config.debug.coordinates = true;
        config.timing.coordinate_interval_ms = 5000;
        let mut a = animator(config);
        for t in (0..=8000).step_by(50) {
            a.tick(t);
        }
        // debug at 2000/4000/6000/8000; coordinates due at 5000
        let with_coords: Vec<bool> = a.sink().lines.iter().map(|l| l.contains("\nX: 0")).collect();
        assert_eq!(with_coords, vec![false, false, true, false]);
    }

    #[test]
    fn debug_can_be_silenced() {
        let mut config = WobbleConfig::default();
        config.debug.enabled = false;
        let mut a = animator(config);
        a.run(&mut ManualClock::default(), Some(200));
        assert!(a.sink().lines.is_empty());
    }

    #[test]
    fn speed_knob_drives_phase_increment() {
        let mut config = WobbleConfig::default();
        config.control.speed.enabled = true;
        let mut input = LatchedInput::new();
        input.set(PIN_A2, 1023);
        let mut a = Animator::new(config, FrameBuffer::new(128, 64), input, NullSink).unwrap();
        a.tick(0);
        assert_eq!(a.params().phase_increment, 0.5);
        a.input_mut().set(PIN_A2, 0);
        a.tick(50);
        assert_eq!(a.params().phase_increment, 0.01);
    }

    #[test]
    fn restart_returns_to_defaults() {
        let mut a = animator(WobbleConfig::default());
        a.run(&mut ManualClock::default(), Some(400));
        a.restart();
        assert_eq!(a.params(), a.store().defaults());
        assert_eq!(a.phase(), 0.0);
    }
}
