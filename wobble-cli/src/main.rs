//! Wobble CLI: preview the sine wobble animation in a terminal.

mod host;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use wobble_core::config::{CurveStyle, DisplayKind, EraseMode, VariationMode, WobbleConfig};
use wobble_core::params::Bounds;
use wobble_core::sine::SineMode;
use wobble_engine::{Animator, Channel, Display, LogSink, SystemClock};

use crate::host::{SerialDisplay, SimulatedKnobs, TerminalDisplay};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum DisplayArg {
    Ssd1306,
    St7735,
    St7789,
    Serial,
    Custom,
}

impl From<DisplayArg> for DisplayKind {
    fn from(d: DisplayArg) -> Self {
        match d {
            DisplayArg::Ssd1306 => DisplayKind::Ssd1306Oled,
            DisplayArg::St7735 => DisplayKind::St7735Tft,
            DisplayArg::St7789 => DisplayKind::St7789Tft,
            DisplayArg::Serial => DisplayKind::Serial,
            DisplayArg::Custom => DisplayKind::Custom,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum SineArg {
    Exact,
    Polynomial,
    Table,
}

impl From<SineArg> for SineMode {
    fn from(s: SineArg) -> Self {
        match s {
            SineArg::Exact => SineMode::Exact,
            SineArg::Polynomial => SineMode::Polynomial,
            SineArg::Table => SineMode::Table,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum VariationArg {
    Off,
    Oscillate,
    Random,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum KnobArg {
    Amplitude,
    Frequency,
    Speed,
}

impl From<KnobArg> for Channel {
    fn from(k: KnobArg) -> Self {
        match k {
            KnobArg::Amplitude => Channel::Amplitude,
            KnobArg::Frequency => Channel::Frequency,
            KnobArg::Speed => Channel::Speed,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "wobble")]
#[command(about = "Real-time sine wobble animation, previewed in the terminal")]
struct Args {
    /// Display preset (sets geometry and pinout).
    #[arg(long, value_enum, default_value_t = DisplayArg::Ssd1306)]
    display: DisplayArg,
    #[arg(long)]
    width: Option<u32>,
    #[arg(long)]
    height: Option<u32>,
    /// Stop after this many frames (runs until interrupted otherwise).
    #[arg(short = 'n', long)]
    frames: Option<u64>,
    /// Milliseconds between frames.
    #[arg(long)]
    frame_delay: Option<u32>,
    #[arg(long)]
    amplitude: Option<f32>,
    #[arg(long)]
    frequency: Option<f32>,
    /// Phase increment per frame, in radians.
    #[arg(long)]
    speed: Option<f32>,
    #[arg(long, value_enum)]
    sine_mode: Option<SineArg>,
    /// Evaluate every Nth column.
    #[arg(long, default_value_t = 1)]
    step: u32,
    #[arg(long)]
    grid: bool,
    #[arg(long)]
    no_center_line: bool,
    #[arg(long)]
    no_amplitude_marks: bool,
    /// Connect sampled columns with line segments.
    #[arg(long)]
    lines: bool,
    /// Clear the whole frame instead of erasing only the previous curve.
    #[arg(long)]
    full_clear: bool,
    #[arg(long, value_enum, default_value_t = VariationArg::Oscillate)]
    variation: VariationArg,
    #[arg(long)]
    seed: Option<u64>,
    /// Drive a parameter from a simulated potentiometer (repeatable).
    #[arg(long, value_enum)]
    knob: Vec<KnobArg>,
    /// Knob smoothing time constant in milliseconds.
    #[arg(long, default_value_t = 0.0)]
    smoothing: f32,
    /// Also log sampled coordinates.
    #[arg(long)]
    coordinates: bool,
    /// Do not clear the terminal between frames.
    #[arg(long)]
    no_ansi: bool,
    #[arg(long)]
    list_displays: bool,
    /// Cycle through a few hand-picked parameter sets.
    #[arg(long)]
    demo: bool,
}

/// `(amplitude, frequency, description)`
const DEMO_PRESETS: [(f32, f32, &str); 4] = [
    (0.4, 1.0, "small amplitude, low frequency"),
    (0.9, 1.0, "large amplitude, low frequency"),
    (0.6, 3.0, "medium amplitude, high frequency"),
    (0.8, 1.5, "default parameters"),
];
const DEMO_FRAMES: u64 = 10;
const DEMO_SPEED: f32 = 0.2;
const DEMO_FRAME_DELAY_MS: u32 = 300;

fn override_param(slot: &mut f32, value: Option<f32>, bounds: Bounds, name: &str) {
    if let Some(v) = value {
        if !bounds.contains(v) {
            log::warn!("{name} {v} is outside [{}, {}] and will be clamped", bounds.min, bounds.max);
        }
        *slot = v;
    }
}

fn build_config(args: &Args) -> Result<WobbleConfig> {
    let mut config = WobbleConfig::for_display(args.display.into());
    if let Some(w) = args.width {
        config.display.width = w;
    }
    if let Some(h) = args.height {
        config.display.height = h;
    }
    if let Some(ms) = args.frame_delay {
        config.timing.frame_delay_ms = ms;
    }

    let bounds = config.bounds;
    override_param(&mut config.wave.amplitude, args.amplitude, bounds.amplitude, "amplitude");
    override_param(&mut config.wave.frequency, args.frequency, bounds.frequency, "frequency");
    override_param(&mut config.wave.phase_increment, args.speed, bounds.phase_increment, "speed");

    if let Some(mode) = args.sine_mode {
        config.performance.sine = mode.into();
    }
    config.performance.calculation_step = args.step;

    config.overlay.grid = args.grid;
    config.overlay.center_line = !args.no_center_line;
    config.overlay.amplitude_marks = !args.no_amplitude_marks;
    config.overlay.curve = if args.lines { CurveStyle::Lines } else { CurveStyle::Points };
    config.overlay.erase = if args.full_clear { EraseMode::Full } else { EraseMode::Targeted };

    match args.variation {
        VariationArg::Off => config.variation.enabled = false,
        VariationArg::Oscillate => config.variation.mode = VariationMode::Oscillate,
        VariationArg::Random => config.variation.mode = VariationMode::Random,
    }
    if let Some(seed) = args.seed {
        config.variation.seed = seed;
    }

    for &knob in &args.knob {
        match knob {
            KnobArg::Amplitude => config.control.amplitude.enabled = true,
            KnobArg::Frequency => config.control.frequency.enabled = true,
            KnobArg::Speed => config.control.speed.enabled = true,
        }
    }
    config.control.smoothing_ms = args.smoothing;
    config.debug.coordinates = args.coordinates;

    if args.demo {
        config.variation.enabled = false;
        config.timing.frame_delay_ms = DEMO_FRAME_DELAY_MS;
        if !args.knob.is_empty() {
            bail!("--demo drives the parameters itself and cannot be combined with --knob");
        }
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn list_displays() {
    println!("Available displays:");
    for kind in DisplayKind::ALL {
        let (w, h) = kind.geometry();
        println!("- {:<8} {w}x{h}  {:?}", kind.name(), kind.default_pins());
    }
}

fn make_display(config: &WobbleConfig, ansi: bool) -> Box<dyn Display> {
    let (w, h) = (config.display.width, config.display.height);
    match config.display.kind {
        DisplayKind::Serial => Box::new(SerialDisplay::new(w, h)),
        _ => Box::new(TerminalDisplay::new(w, h, ansi)),
    }
}

fn run_demo<D: Display>(animator: &mut Animator<D, SimulatedKnobs, LogSink>, clock: &mut SystemClock) {
    for (amplitude, frequency, description) in DEMO_PRESETS {
        log::info!("showing: {description} (amplitude {amplitude}, frequency {frequency})");
        animator.restart();
        let store = animator.store_mut();
        store.set_amplitude(amplitude);
        store.set_frequency(frequency);
        store.set_phase_increment(DEMO_SPEED);
        animator.run(clock, Some(DEMO_FRAMES));
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if args.list_displays {
        list_displays();
        return Ok(());
    }

    let config = build_config(&args)?;
    let display = make_display(&config, !args.no_ansi);
    let input = SimulatedKnobs::new(config.control.raw_max);
    let mut animator =
        Animator::new(config, display, input, LogSink).context("failed to start the animation")?;
    for &knob in &args.knob {
        log::info!("simulated knob on {}", Channel::from(knob).name());
    }

    let mut clock = SystemClock::new();
    if args.demo {
        run_demo(&mut animator, &mut clock);
    } else {
        let frames = animator.run(&mut clock, args.frames);
        log::info!("rendered {frames} frames");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("wobble").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_follow_the_display_preset() {
        let config = build_config(&parse(&["--display", "st7789"])).unwrap();
        assert_eq!((config.display.width, config.display.height), (240, 240));
        assert!(config.variation.enabled);
        assert_eq!(config.overlay.erase, EraseMode::Targeted);
    }

    #[test]
    fn flags_map_onto_the_config() {
        let args = parse(&[
            "--width", "64", "--height", "32", "--step", "4", "--lines", "--full-clear", "--grid",
            "--no-center-line", "--variation", "random", "--seed", "7", "--knob", "speed",
            "--knob", "amplitude", "--sine-mode", "table", "--amplitude", "3.0",
        ]);
        let config = build_config(&args).unwrap();
        assert_eq!((config.display.width, config.display.height), (64, 32));
        assert_eq!(config.performance.calculation_step, 4);
        assert_eq!(config.performance.sine, SineMode::Table);
        assert_eq!(config.overlay.curve, CurveStyle::Lines);
        assert_eq!(config.overlay.erase, EraseMode::Full);
        assert!(config.overlay.grid && !config.overlay.center_line);
        assert_eq!(config.variation.mode, VariationMode::Random);
        assert_eq!(config.variation.seed, 7);
        assert!(config.control.speed.enabled && config.control.amplitude.enabled);
        assert!(!config.control.frequency.enabled);
        // out-of-range values pass through; the store clamps them
        assert_eq!(config.wave.amplitude, 3.0);
    }

    #[test]
    fn invalid_settings_are_reported() {
        assert!(build_config(&parse(&["--step", "0"])).is_err());
        assert!(build_config(&parse(&["--width", "0"])).is_err());
        assert!(build_config(&parse(&["--width", "4000000", "--height", "4000000"])).is_err());
        assert!(build_config(&parse(&["--demo", "--knob", "speed"])).is_err());
    }

    #[test]
    fn demo_turns_variation_off() {
        let config = build_config(&parse(&["--demo"])).unwrap();
        assert!(!config.variation.enabled);
        assert_eq!(config.timing.frame_delay_ms, DEMO_FRAME_DELAY_MS);
    }
}
