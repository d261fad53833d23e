//! C ABI wrapper for the wobble engine.
//!
//! Exposes functions to create/destroy an animator that draws into an
//! in-memory frame buffer, push analog readings, tick the animation and read
//! back the curve points or the packed 1-bit bitmap.
//!
//! ABI notes
//! - All functions are `extern "C"` and `#[no_mangle]`.
//! - Opaque handle type: `WobbleHandle` (heap-allocated; you own/delete it).
//! - Null handles and null buffers are ignored; getters then return 0.
//!
//! Threading
//! - The object is NOT thread-safe; call all functions from the same thread.

use wobble_core::config::{DisplayKind, WobbleConfig};
use wobble_core::sine::SineMode;
use wobble_engine::{Animator, Channel, FrameBuffer, LatchedInput, LogSink};

pub const WOBBLE_DISPLAY_SSD1306: u32 = 0;
pub const WOBBLE_DISPLAY_ST7735: u32 = 1;
pub const WOBBLE_DISPLAY_ST7789: u32 = 2;
pub const WOBBLE_DISPLAY_SERIAL: u32 = 3;
pub const WOBBLE_DISPLAY_CUSTOM: u32 = 4;

pub const WOBBLE_SINE_EXACT: u32 = 0;
pub const WOBBLE_SINE_POLYNOMIAL: u32 = 1;
pub const WOBBLE_SINE_TABLE: u32 = 2;

pub const WOBBLE_CHANNEL_AMPLITUDE: u32 = 0;
pub const WOBBLE_CHANNEL_FREQUENCY: u32 = 1;
pub const WOBBLE_CHANNEL_SPEED: u32 = 2;

type Inner = Animator<FrameBuffer, LatchedInput, LogSink>;

/// Opaque animator wrapper we hand to C.
pub struct WobbleHandle {
    inner: Inner,
}

impl WobbleHandle {
    fn new(config: WobbleConfig) -> Option<Self> {
        config.validate().ok()?;
        let fb = FrameBuffer::try_new(config.display.width, config.display.height)?;
        Animator::new(config, fb, LatchedInput::new(), LogSink).ok().map(|inner| Self { inner })
    }
}

fn display_kind(kind: u32) -> Option<DisplayKind> {
    match kind {
        WOBBLE_DISPLAY_SSD1306 => Some(DisplayKind::Ssd1306Oled),
        WOBBLE_DISPLAY_ST7735 => Some(DisplayKind::St7735Tft),
        WOBBLE_DISPLAY_ST7789 => Some(DisplayKind::St7789Tft),
        WOBBLE_DISPLAY_SERIAL => Some(DisplayKind::Serial),
        WOBBLE_DISPLAY_CUSTOM => Some(DisplayKind::Custom),
        _ => None,
    }
}

fn channel(index: u32) -> Option<Channel> {
    match index {
        WOBBLE_CHANNEL_AMPLITUDE => Some(Channel::Amplitude),
        WOBBLE_CHANNEL_FREQUENCY => Some(Channel::Frequency),
        WOBBLE_CHANNEL_SPEED => Some(Channel::Speed),
        _ => None,
    }
}

fn into_raw(handle: Option<WobbleHandle>) -> *mut WobbleHandle {
    handle.map_or(std::ptr::null_mut(), |h| Box::into_raw(Box::new(h)))
}

/// Borrow the handle mutably, or `None` for null.
///
/// # Safety
/// `handle` must be null or a live pointer from `wobble_create*`.
unsafe fn handle_mut<'a>(handle: *mut WobbleHandle) -> Option<&'a mut Inner> {
    handle.as_mut().map(|h| &mut h.inner)
}

unsafe fn handle_ref<'a>(handle: *const WobbleHandle) -> Option<&'a Inner> {
    handle.as_ref().map(|h| &h.inner)
}

// --- Creation / destruction -------------------------------------------------------

/// Create an animator with default settings and a custom geometry.
/// Returns null if the geometry is empty or larger than 2048x2048 pixels.
#[no_mangle]
pub extern "C" fn wobble_create(width: u32, height: u32) -> *mut WobbleHandle {
    let mut config = WobbleConfig::default();
    config.display.width = width;
    config.display.height = height;
    into_raw(WobbleHandle::new(config))
}

/// Create an animator with the geometry of a display preset
/// (`WOBBLE_DISPLAY_*`). Returns null for an unknown kind.
#[no_mangle]
pub extern "C" fn wobble_create_for_display(kind: u32) -> *mut WobbleHandle {
    into_raw(display_kind(kind).and_then(|k| WobbleHandle::new(WobbleConfig::for_display(k))))
}

/// Destroy an animator previously returned by `wobble_create*`.
#[no_mangle]
pub extern "C" fn wobble_destroy(handle: *mut WobbleHandle) {
    if !handle.is_null() {
        unsafe { drop(Box::from_raw(handle)); }
    }
}

// --- Parameters -------------------------------------------------------------------

/// Values outside the configured bounds are clamped; NaN is ignored.
#[no_mangle]
pub extern "C" fn wobble_set_amplitude(handle: *mut WobbleHandle, value: f32) {
    if let Some(a) = unsafe { handle_mut(handle) } {
        a.store_mut().set_amplitude(value);
    }
}

#[no_mangle]
pub extern "C" fn wobble_set_frequency(handle: *mut WobbleHandle, value: f32) {
    if let Some(a) = unsafe { handle_mut(handle) } {
        a.store_mut().set_frequency(value);
    }
}

#[no_mangle]
pub extern "C" fn wobble_set_phase_increment(handle: *mut WobbleHandle, value: f32) {
    if let Some(a) = unsafe { handle_mut(handle) } {
        a.store_mut().set_phase_increment(value);
    }
}

#[no_mangle]
pub extern "C" fn wobble_get_amplitude(handle: *const WobbleHandle) -> f32 {
    unsafe { handle_ref(handle) }.map_or(0.0, |a| a.params().amplitude)
}

#[no_mangle]
pub extern "C" fn wobble_get_frequency(handle: *const WobbleHandle) -> f32 {
    unsafe { handle_ref(handle) }.map_or(0.0, |a| a.params().frequency)
}

#[no_mangle]
pub extern "C" fn wobble_get_phase_increment(handle: *const WobbleHandle) -> f32 {
    unsafe { handle_ref(handle) }.map_or(0.0, |a| a.params().phase_increment)
}

/// Current phase in `[0, 2π)`.
#[no_mangle]
pub extern "C" fn wobble_get_phase(handle: *const WobbleHandle) -> f32 {
    unsafe { handle_ref(handle) }.map_or(0.0, |a| a.phase())
}

/// Select the sine backend (`WOBBLE_SINE_*`). Returns 1 on success, 0 otherwise.
#[no_mangle]
pub extern "C" fn wobble_set_sine_mode(handle: *mut WobbleHandle, mode: u32) -> u32 {
    let mode = match mode {
        WOBBLE_SINE_EXACT => SineMode::Exact,
        WOBBLE_SINE_POLYNOMIAL => SineMode::Polynomial,
        WOBBLE_SINE_TABLE => SineMode::Table,
        _ => return 0,
    };
    match unsafe { handle_mut(handle) } {
        Some(a) => {
            a.waveform_mut().set_sine_mode(mode);
            1
        }
        None => 0,
    }
}

/// Turn automatic parameter variation on or off.
#[no_mangle]
pub extern "C" fn wobble_set_variation(handle: *mut WobbleHandle, enabled: bool) {
    if let Some(a) = unsafe { handle_mut(handle) } {
        a.variation_mut().set_enabled(enabled);
    }
}

// --- Controls ---------------------------------------------------------------------

/// Latch a raw analog reading (`0..=1023` by default) for a control channel
/// (`WOBBLE_CHANNEL_*`). It is picked up on the next tick if the channel is
/// enabled.
#[no_mangle]
pub extern "C" fn wobble_set_control_raw(handle: *mut WobbleHandle, channel_index: u32, raw: u16) {
    let (Some(a), Some(ch)) = (unsafe { handle_mut(handle) }, channel(channel_index)) else { return };
    let pin = a.sampler().state(ch).pin;
    a.input_mut().set(pin, raw);
}

#[no_mangle]
pub extern "C" fn wobble_enable_control(handle: *mut WobbleHandle, channel_index: u32, enabled: bool) {
    let (Some(a), Some(ch)) = (unsafe { handle_mut(handle) }, channel(channel_index)) else { return };
    a.sampler_mut().set_enabled(ch, enabled);
}

// --- Evaluation / rendering -------------------------------------------------------

/// Displacement at column `x` for an explicit phase, with the current
/// parameters. Does not advance the animation.
#[no_mangle]
pub extern "C" fn wobble_evaluate(handle: *const WobbleHandle, x: u32, phase: f32) -> f32 {
    unsafe { handle_ref(handle) }.map_or(0.0, |a| a.waveform().evaluate(x, phase, &a.params()))
}

/// Advance one frame at host time `now_ms`. Returns the number of curve
/// points in the new frame.
#[no_mangle]
pub extern "C" fn wobble_tick(handle: *mut WobbleHandle, now_ms: u64) -> u32 {
    unsafe { handle_mut(handle) }.map_or(0, |a| a.tick(now_ms).points.len() as u32)
}

/// Copy up to `cap` curve points of the last frame into `xs`/`ys`.
/// Returns the number of points written.
#[no_mangle]
pub extern "C" fn wobble_frame_points(handle: *const WobbleHandle, xs: *mut u32, ys: *mut u32, cap: u32) -> u32 {
    if xs.is_null() || ys.is_null() || cap == 0 {
        return 0;
    }
    let Some(a) = (unsafe { handle_ref(handle) }) else { return 0 };
    let points = &a.frame().points;
    let n = points.len().min(cap as usize);
    let xs = unsafe { std::slice::from_raw_parts_mut(xs, n) };
    let ys = unsafe { std::slice::from_raw_parts_mut(ys, n) };
    for (i, p) in points[..n].iter().enumerate() {
        xs[i] = p.x;
        ys[i] = p.y;
    }
    n as u32
}

/// Pack the frame buffer as 1 bit per pixel, row-major, MSB first, rows padded
/// to whole bytes. Returns bytes written, or 0 if `len` is too small.
#[no_mangle]
pub extern "C" fn wobble_frame_buffer(handle: *const WobbleHandle, out: *mut u8, len: usize) -> usize {
    if out.is_null() || len == 0 {
        return 0;
    }
    let Some(a) = (unsafe { handle_ref(handle) }) else { return 0 };
    let out = unsafe { std::slice::from_raw_parts_mut(out, len) };
    a.display().pack_bits(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_tick_read_destroy() {
        let h = wobble_create(128, 64);
        assert!(!h.is_null());
        assert_eq!(wobble_set_sine_mode(h, WOBBLE_SINE_EXACT), 1);
        assert_eq!(wobble_tick(h, 0), 128);

        let mut xs = [0u32; 200];
        let mut ys = [0u32; 200];
        assert_eq!(wobble_frame_points(h, xs.as_mut_ptr(), ys.as_mut_ptr(), 200), 128);
        assert_eq!(xs[10], 10);
        assert!(ys.iter().take(128).all(|&y| y < 64));
        assert_eq!(wobble_frame_points(h, xs.as_mut_ptr(), ys.as_mut_ptr(), 16), 16);

        let mut bits = vec![0u8; 128 / 8 * 64];
        assert_eq!(wobble_frame_buffer(h, bits.as_mut_ptr(), bits.len()), bits.len());
        assert!(bits.iter().any(|&b| b != 0));
        assert_eq!(wobble_frame_buffer(h, bits.as_mut_ptr(), 10), 0);

        wobble_destroy(h);
    }

    #[test]
    fn setters_clamp_and_getters_read_back() {
        let h = wobble_create_for_display(WOBBLE_DISPLAY_ST7789);
        assert!(!h.is_null());
        wobble_set_amplitude(h, 9.0);
        wobble_set_frequency(h, 0.5);
        wobble_set_phase_increment(h, -1.0);
        assert_eq!(wobble_get_amplitude(h), 1.0);
        assert_eq!(wobble_get_frequency(h), 0.5);
        assert_eq!(wobble_get_phase_increment(h), 0.01);
        assert_eq!(wobble_set_sine_mode(h, 99), 0);
        wobble_destroy(h);
    }

    #[test]
    fn controls_feed_the_next_tick() {
        let h = wobble_create(128, 64);
        wobble_set_variation(h, false);
        wobble_enable_control(h, WOBBLE_CHANNEL_FREQUENCY, true);
        wobble_set_control_raw(h, WOBBLE_CHANNEL_FREQUENCY, 1023);
        wobble_tick(h, 0);
        assert_eq!(wobble_get_frequency(h), 5.0);
        wobble_set_control_raw(h, 7, 0);
        wobble_destroy(h);
    }

    #[test]
    fn null_and_invalid_inputs_are_harmless() {
        let null = std::ptr::null_mut();
        assert!(wobble_create(0, 64).is_null());
        assert!(wobble_create(u32::MAX, u32::MAX).is_null());
        assert!(wobble_create(100_000, 100_000).is_null());
        assert!(wobble_create_for_display(42).is_null());
        wobble_destroy(null);
        wobble_set_amplitude(null, 0.5);
        assert_eq!(wobble_get_amplitude(null), 0.0);
        assert_eq!(wobble_tick(null, 0), 0);
        assert_eq!(wobble_evaluate(null, 0, 0.0), 0.0);
        assert_eq!(wobble_frame_points(null, std::ptr::null_mut(), std::ptr::null_mut(), 4), 0);
    }
}
