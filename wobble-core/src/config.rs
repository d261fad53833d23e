//! Configuration object for the whole generator.
//!
//! Every tunable of the generator lives here, grouped by concern.
//! A [`WobbleConfig`] is built once at startup, validated with
//! [`WobbleConfig::validate`], and then passed by reference to every
//! component. Nothing reads configuration from globals.

use core::fmt;

use crate::params::Bounds;
use crate::sine::SineMode;

/// Supported display families. Each carries a default geometry and pinout.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DisplayKind {
    Ssd1306Oled,
    St7735Tft,
    St7789Tft,
    Serial,
    Custom,
}

impl DisplayKind {
    pub const ALL: [DisplayKind; 5] = [
        DisplayKind::Ssd1306Oled,
        DisplayKind::St7735Tft,
        DisplayKind::St7789Tft,
        DisplayKind::Serial,
        DisplayKind::Custom,
    ];

    /// Native `(width, height)` in pixels.
    pub fn geometry(self) -> (u32, u32) {
        match self {
            DisplayKind::Ssd1306Oled => (128, 64),
            DisplayKind::St7735Tft => (128, 160),
            DisplayKind::St7789Tft => (240, 240),
            DisplayKind::Serial | DisplayKind::Custom => (128, 64),
        }
    }

    pub fn default_pins(self) -> DisplayPins {
        match self {
            DisplayKind::Ssd1306Oled => DisplayPins::Oled { reset: -1, address: 0x3C },
            DisplayKind::St7735Tft | DisplayKind::St7789Tft => {
                DisplayPins::Tft { cs: 10, rst: 9, dc: 8 }
            }
            DisplayKind::Serial | DisplayKind::Custom => DisplayPins::None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DisplayKind::Ssd1306Oled => "ssd1306",
            DisplayKind::St7735Tft => "st7735",
            DisplayKind::St7789Tft => "st7789",
            DisplayKind::Serial => "serial",
            DisplayKind::Custom => "custom",
        }
    }
}

/// Wiring of the display. Informational for hosts that drive real panels.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DisplayPins {
    /// I²C OLED; `reset == -1` means the reset line is shared with the MCU.
    Oled { reset: i8, address: u8 },
    /// SPI TFT chip-select, reset and data/command pins.
    Tft { cs: u8, rst: u8, dc: u8 },
    None,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DisplayConfig {
    pub kind: DisplayKind,
    pub width: u32,
    pub height: u32,
    pub pins: DisplayPins,
}

impl DisplayConfig {
    pub fn for_kind(kind: DisplayKind) -> Self {
        let (width, height) = kind.geometry();
        Self { kind, width, height, pins: kind.default_pins() }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self::for_kind(DisplayKind::Custom)
    }
}

/// Startup values of the live parameters plus the fixed wobble shape.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WaveConfig {
    pub amplitude: f32,
    pub frequency: f32,
    pub phase_increment: f32,
    /// Secondary wave frequency as a multiple of the primary.
    pub frequency_multiplier: f32,
    /// Secondary wave amplitude as a ratio of the primary.
    pub amplitude_ratio: f32,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            amplitude: 0.7,
            frequency: 2.0,
            phase_increment: 0.1,
            frequency_multiplier: 3.0,
            amplitude_ratio: 0.1,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundsConfig {
    pub amplitude: Bounds,
    pub frequency: Bounds,
    pub phase_increment: Bounds,
}

impl Default for BoundsConfig {
    fn default() -> Self {
        Self {
            amplitude: Bounds::new(0.1, 1.0),
            frequency: Bounds::new(0.1, 5.0),
            phase_increment: Bounds::new(0.01, 0.5),
        }
    }
}

/// Analog pin identifier. `A0` is pin 14 on the classic boards.
pub type Pin = u8;

pub const PIN_A0: Pin = 14;
pub const PIN_A1: Pin = 15;
pub const PIN_A2: Pin = 16;

/// Largest accepted `width · height`; 2048x2048.
pub const MAX_PIXELS: u64 = 1 << 22;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ChannelConfig {
    pub enabled: bool,
    pub pin: Pin,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ControlConfig {
    pub amplitude: ChannelConfig,
    pub frequency: ChannelConfig,
    /// Drives the phase increment (animation speed).
    pub speed: ChannelConfig,
    /// Largest raw reading the analog input can return.
    pub raw_max: u16,
    /// One-pole smoothing time constant for control samples; 0 disables it.
    pub smoothing_ms: f32,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            amplitude: ChannelConfig { enabled: false, pin: PIN_A0 },
            frequency: ChannelConfig { enabled: false, pin: PIN_A1 },
            speed: ChannelConfig { enabled: false, pin: PIN_A2 },
            raw_max: 1023,
            smoothing_ms: 0.0,
        }
    }
}

/// All intervals are milliseconds.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TimingConfig {
    pub frame_delay_ms: u32,
    pub debug_print_interval_ms: u32,
    pub coordinate_interval_ms: u32,
    pub amplitude_update_interval_ms: u32,
    pub frequency_update_interval_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            frame_delay_ms: 50,
            debug_print_interval_ms: 2000,
            coordinate_interval_ms: 2000,
            amplitude_update_interval_ms: 5000,
            frequency_update_interval_ms: 3000,
        }
    }
}

impl TimingConfig {
    /// Ticks per second implied by the frame delay (a zero delay counts as 1 ms).
    pub fn frame_rate_hz(&self) -> f32 {
        1000.0 / self.frame_delay_ms.max(1) as f32
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VariationMode {
    /// Smooth back-and-forth sweep through the parameter range.
    Oscillate,
    /// Seeded pseudo-random jumps within the range.
    Random,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VariationConfig {
    pub enabled: bool,
    pub mode: VariationMode,
    pub seed: u64,
}

impl Default for VariationConfig {
    fn default() -> Self {
        Self { enabled: true, mode: VariationMode::Oscillate, seed: 0x5EED }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PerformanceConfig {
    pub sine: SineMode,
    /// Evaluate every Nth column (1 = every column).
    pub calculation_step: u32,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self { sine: SineMode::default(), calculation_step: 1 }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CurveStyle {
    /// One pixel per sampled column.
    Points,
    /// Line segment from the previous sampled column.
    Lines,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EraseMode {
    /// Clear the whole frame before drawing.
    Full,
    /// Repaint only the previous curve with background ink.
    Targeted,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OverlayConfig {
    pub center_line: bool,
    pub amplitude_marks: bool,
    pub grid: bool,
    pub curve: CurveStyle,
    pub erase: EraseMode,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            center_line: true,
            amplitude_marks: true,
            grid: false,
            curve: CurveStyle::Points,
            erase: EraseMode::Targeted,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DebugConfig {
    pub enabled: bool,
    /// Also print sampled wave coordinates.
    pub coordinates: bool,
    pub serial_baud: u32,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self { enabled: true, coordinates: false, serial_baud: 9600 }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct WobbleConfig {
    pub display: DisplayConfig,
    pub wave: WaveConfig,
    pub bounds: BoundsConfig,
    pub control: ControlConfig,
    pub timing: TimingConfig,
    pub variation: VariationConfig,
    pub performance: PerformanceConfig,
    pub overlay: OverlayConfig,
    pub debug: DebugConfig,
}

impl WobbleConfig {
    /// Defaults with the geometry and pinout of `kind`.
    pub fn for_display(kind: DisplayKind) -> Self {
        Self { display: DisplayConfig::for_kind(kind), ..Self::default() }
    }

    /// Reject configurations the animation loop cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.display.width == 0 || self.display.height == 0 {
            return Err(ConfigError::EmptyGeometry {
                width: self.display.width,
                height: self.display.height,
            });
        }
        let pixels = u64::from(self.display.width) * u64::from(self.display.height);
        if pixels > MAX_PIXELS {
            return Err(ConfigError::GeometryTooLarge {
                width: self.display.width,
                height: self.display.height,
            });
        }
        if self.performance.calculation_step == 0 {
            return Err(ConfigError::ZeroStep);
        }
        if self.control.raw_max == 0 {
            return Err(ConfigError::ZeroRawRange);
        }
        for (param, bounds) in [
            (Param::Amplitude, self.bounds.amplitude),
            (Param::Frequency, self.bounds.frequency),
            (Param::PhaseIncrement, self.bounds.phase_increment),
        ] {
            if !bounds.min.is_finite() || !bounds.max.is_finite() {
                return Err(ConfigError::NonFinite { param });
            }
            if bounds.min > bounds.max {
                return Err(ConfigError::InvertedBounds { param, min: bounds.min, max: bounds.max });
            }
        }
        let wave = &self.wave;
        for (param, value) in [
            (Param::Amplitude, wave.amplitude),
            (Param::Frequency, wave.frequency),
            (Param::PhaseIncrement, wave.phase_increment),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { param });
            }
        }
        let multiplier_ok = wave.frequency_multiplier.is_finite() && wave.frequency_multiplier >= 0.0;
        let ratio_ok = wave.amplitude_ratio.is_finite() && wave.amplitude_ratio >= 0.0;
        if !multiplier_ok || !ratio_ok {
            return Err(ConfigError::InvalidWobble {
                multiplier: wave.frequency_multiplier,
                ratio: wave.amplitude_ratio,
            });
        }
        if !self.control.smoothing_ms.is_finite() || self.control.smoothing_ms < 0.0 {
            return Err(ConfigError::InvalidSmoothing(self.control.smoothing_ms));
        }
        Ok(())
    }
}

/// The three live parameters.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Param {
    Amplitude,
    Frequency,
    PhaseIncrement,
}

impl Param {
    pub fn name(self) -> &'static str {
        match self {
            Param::Amplitude => "amplitude",
            Param::Frequency => "frequency",
            Param::PhaseIncrement => "phase increment",
        }
    }
}

/// Startup configuration errors. The animation loop itself has no error path.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    EmptyGeometry { width: u32, height: u32 },
    GeometryTooLarge { width: u32, height: u32 },
    ZeroStep,
    ZeroRawRange,
    InvertedBounds { param: Param, min: f32, max: f32 },
    NonFinite { param: Param },
    InvalidWobble { multiplier: f32, ratio: f32 },
    InvalidSmoothing(f32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyGeometry { width, height } => {
                write!(f, "display geometry must be non-empty, got {width}x{height}")
            }
            ConfigError::GeometryTooLarge { width, height } => {
                write!(f, "display geometry {width}x{height} exceeds {MAX_PIXELS} pixels")
            }
            ConfigError::ZeroStep => write!(f, "calculation step must be at least 1"),
            ConfigError::ZeroRawRange => write!(f, "analog raw range must be non-zero"),
            ConfigError::InvertedBounds { param, min, max } => {
                write!(f, "{} bounds are inverted: min {min} > max {max}", param.name())
            }
            ConfigError::NonFinite { param } => {
                write!(f, "{} configuration contains a non-finite value", param.name())
            }
            ConfigError::InvalidWobble { multiplier, ratio } => write!(
                f,
                "wobble multiplier and ratio must be finite and non-negative, got {multiplier} and {ratio}"
            ),
            ConfigError::InvalidSmoothing(ms) => {
                write!(f, "control smoothing must be finite and non-negative, got {ms} ms")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_firmware_values() {
        let c = WobbleConfig::default();
        assert_eq!((c.display.width, c.display.height), (128, 64));
        assert_eq!(c.wave.amplitude, 0.7);
        assert_eq!(c.wave.frequency_multiplier, 3.0);
        assert_eq!(c.bounds.frequency, Bounds::new(0.1, 5.0));
        assert_eq!(c.timing.frame_delay_ms, 50);
        assert_eq!(c.control.speed.pin, PIN_A2);
        assert!(!c.control.amplitude.enabled);
        assert!(c.overlay.center_line && c.overlay.amplitude_marks && !c.overlay.grid);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn display_presets_carry_geometry_and_pins() {
        let c = WobbleConfig::for_display(DisplayKind::St7789Tft);
        assert_eq!((c.display.width, c.display.height), (240, 240));
        assert_eq!(c.display.pins, DisplayPins::Tft { cs: 10, rst: 9, dc: 8 });
        let oled = WobbleConfig::for_display(DisplayKind::Ssd1306Oled);
        assert_eq!(oled.display.pins, DisplayPins::Oled { reset: -1, address: 0x3C });
        assert_eq!(DisplayKind::St7735Tft.geometry(), (128, 160));
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let mut c = WobbleConfig::default();
        c.bounds.frequency = Bounds { min: 5.0, max: 0.1 };
        match c.validate() {
            Err(ConfigError::InvertedBounds { param: Param::Frequency, .. }) => {}
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn degenerate_settings_are_rejected() {
        let mut c = WobbleConfig::default();
        c.performance.calculation_step = 0;
        assert_eq!(c.validate(), Err(ConfigError::ZeroStep));

        let mut c = WobbleConfig::default();
        c.display.height = 0;
        assert!(matches!(c.validate(), Err(ConfigError::EmptyGeometry { .. })));

        let mut c = WobbleConfig::default();
        c.wave.amplitude_ratio = -0.5;
        assert!(matches!(c.validate(), Err(ConfigError::InvalidWobble { .. })));

        let mut c = WobbleConfig::default();
        c.bounds.amplitude.max = f32::NAN;
        assert_eq!(c.validate(), Err(ConfigError::NonFinite { param: Param::Amplitude }));
    }

    #[test]
    fn oversized_geometry_is_rejected() {
        let mut c = WobbleConfig::default();
        c.display.width = u32::MAX;
        c.display.height = u32::MAX;
        assert_eq!(
            c.validate(),
            Err(ConfigError::GeometryTooLarge { width: u32::MAX, height: u32::MAX })
        );

        c.display.width = 2048;
        c.display.height = 2048;
        assert!(c.validate().is_ok());
        c.display.height = 2049;
        assert!(matches!(c.validate(), Err(ConfigError::GeometryTooLarge { .. })));
    }

    #[test]
    fn defaults_outside_bounds_are_not_an_error() {
        // out-of-range defaults are clamped by the store, not rejected
        let mut c = WobbleConfig::default();
        c.wave.amplitude = 3.0;
        assert!(c.validate().is_ok());
    }

    #[test]
    fn frame_rate_follows_delay() {
        let t = TimingConfig::default();
        assert_eq!(t.frame_rate_hz(), 20.0);
    }
}
