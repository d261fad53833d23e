//! Control sampler: optional potentiometer channels feeding the store.
//!
//! Each enabled channel is read once per tick, normalized from the device's
//! raw range to `[0, 1]`, optionally smoothed, then mapped linearly into the
//! parameter's bounds and written through the store's clamping setter.
//! Disabled channels are never read.

use wobble_core::config::{ChannelConfig, Param, Pin, WobbleConfig};
use wobble_core::dsp::{clamp, SlewLimiter};
use wobble_core::params::ParameterStore;

/// Analog input seam: one raw reading per call, in `0..=raw_max`.
pub trait AnalogInput {
    fn read_channel(&mut self, pin: Pin) -> u16;
}

impl<A: AnalogInput + ?Sized> AnalogInput for Box<A> {
    #[inline]
    fn read_channel(&mut self, pin: Pin) -> u16 { (**self).read_channel(pin) }
}

/// Always reads zero. For hosts without any control wiring.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullInput;

impl AnalogInput for NullInput {
    fn read_channel(&mut self, _pin: Pin) -> u16 { 0 }
}

/// Holds the last raw value written per pin; a host (FFI, UI thread
/// hand-off, tests) pushes readings in and the sampler pulls them out.
#[derive(Clone, Debug, Default)]
pub struct LatchedInput {
    values: Vec<(Pin, u16)>,
}

impl LatchedInput {
    pub fn new() -> Self { Self::default() }

    pub fn set(&mut self, pin: Pin, raw: u16) {
        match self.values.iter_mut().find(|(p, _)| *p == pin) {
            Some(slot) => slot.1 = raw,
            None => self.values.push((pin, raw)),
        }
    }

    pub fn get(&self, pin: Pin) -> u16 {
        self.values.iter().find(|(p, _)| *p == pin).map_or(0, |(_, v)| *v)
    }
}

impl AnalogInput for LatchedInput {
    fn read_channel(&mut self, pin: Pin) -> u16 { self.get(pin) }
}

/// Raw reading to `[0, 1]`; readings above `raw_max` saturate.
#[inline]
pub fn normalize_raw(raw: u16, raw_max: u16) -> f32 {
    clamp(f32::from(raw) / f32::from(raw_max.max(1)), 0.0, 1.0)
}

/// The three controllable channels.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Channel {
    Amplitude,
    Frequency,
    Speed,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Amplitude, Channel::Frequency, Channel::Speed];

    pub fn param(self) -> Param {
        match self {
            Channel::Amplitude => Param::Amplitude,
            Channel::Frequency => Param::Frequency,
            Channel::Speed => Param::PhaseIncrement,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Channel::Amplitude => "amplitude",
            Channel::Frequency => "frequency",
            Channel::Speed => "speed",
        }
    }

    fn config(self, config: &WobbleConfig) -> ChannelConfig {
        match self {
            Channel::Amplitude => config.control.amplitude,
            Channel::Frequency => config.control.frequency,
            Channel::Speed => config.control.speed,
        }
    }
}

/// Per-channel runtime state.
#[derive(Copy, Clone, Debug)]
pub struct ControlChannelState {
    pub channel: Channel,
    pub pin: Pin,
    pub enabled: bool,
    /// Last normalized (and smoothed) sample in `[0, 1]`.
    pub last_sample: f32,
    smoother: SlewLimiter,
}

/// Which parameters were driven by a live control this tick.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LiveChannels {
    pub amplitude: bool,
    pub frequency: bool,
    pub speed: bool,
}

impl LiveChannels {
    pub fn is_live(&self, param: Param) -> bool {
        match param {
            Param::Amplitude => self.amplitude,
            Param::Frequency => self.frequency,
            Param::PhaseIncrement => self.speed,
        }
    }

    fn mark(&mut self, channel: Channel) {
        match channel {
            Channel::Amplitude => self.amplitude = true,
            Channel::Frequency => self.frequency = true,
            Channel::Speed => self.speed = true,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ControlSampler {
    channels: [ControlChannelState; 3],
    raw_max: u16,
}

impl ControlSampler {
    pub fn new(config: &WobbleConfig) -> Self {
        let rate = config.timing.frame_rate_hz();
        let smoothing_ms = config.control.smoothing_ms;
        let channels = Channel::ALL.map(|channel| {
            let cc = channel.config(config);
            ControlChannelState {
                channel,
                pin: cc.pin,
                enabled: cc.enabled,
                last_sample: 0.0,
                smoother: SlewLimiter::new(smoothing_ms, rate),
            }
        });
        Self { channels, raw_max: config.control.raw_max.max(1) }
    }

    pub fn state(&self, channel: Channel) -> &ControlChannelState {
        &self.channels[channel as usize]
    }

    pub fn set_enabled(&mut self, channel: Channel, enabled: bool) {
        let state = &mut self.channels[channel as usize];
        if state.enabled != enabled {
            state.enabled = enabled;
            state.smoother.unseed();
        }
    }

    /// Read every enabled channel and push the mapped values into `store`.
    pub fn sample<A: AnalogInput + ?Sized>(&mut self, input: &mut A, store: &mut ParameterStore) -> LiveChannels {
        let mut live = LiveChannels::default();
        let raw_max = self.raw_max;
        for state in self.channels.iter_mut().filter(|s| s.enabled) {
            let raw = input.read_channel(state.pin);
            let norm = normalize_raw(raw, raw_max);
            state.last_sample = clamp(state.smoother.process(norm), 0.0, 1.0);
            let param = state.channel.param();
            let value = store.bounds_of(param).lerp(state.last_sample);
            store.set(param, value);
            live.mark(state.channel);
            log::trace!("control {}: raw {} -> {:.3}", state.channel.name(), raw, value);
        }
        live
    }
}
