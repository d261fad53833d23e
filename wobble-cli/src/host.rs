//! Terminal-side implementations of the engine seams.

use std::io::{self, Write};

use wobble_core::config::{Pin, PIN_A0, PIN_A1, PIN_A2};
use wobble_engine::debug::format_coordinates;
use wobble_engine::{AnalogInput, Display, FrameBuffer, Ink, Point, Size};

const CLEAR_HOME: &str = "\x1b[2J\x1b[H";

fn glyph(ink: Ink) -> char {
    match ink {
        Ink::Curve => '*',
        Ink::Overlay => '-',
        Ink::Background => ' ',
    }
}

/// Draws each presented frame as ASCII art inside a border.
pub struct TerminalDisplay {
    fb: FrameBuffer,
    ansi: bool,
}

impl TerminalDisplay {
    pub fn new(width: u32, height: u32, ansi: bool) -> Self {
        Self { fb: FrameBuffer::new(width, height), ansi }
    }

    /// The frame as text lines, border included.
    pub fn lines(&self) -> Vec<String> {
        let Size { width, height } = self.fb.size();
        let rule = format!("+{}+", "-".repeat(width as usize));
        let mut out = Vec::with_capacity(height as usize + 2);
        out.push(rule.clone());
        for y in 0..height {
            let body: String = self.fb.row(y).iter().map(|&ink| glyph(ink)).collect();
            out.push(format!("|{body}|"));
        }
        out.push(rule);
        out
    }
}

impl Display for TerminalDisplay {
    fn size(&self) -> Size { self.fb.size() }
    fn clear(&mut self) { self.fb.clear() }
    fn draw_pixel(&mut self, x: u32, y: u32, ink: Ink) { self.fb.draw_pixel(x, y, ink) }

    fn present(&mut self) {
        self.fb.present();
        let mut text = String::new();
        if self.ansi {
            text.push_str(CLEAR_HOME);
        }
        for line in self.lines() {
            text.push_str(&line);
            text.push('\n');
        }
        let mut stdout = io::stdout().lock();
        // a closed pipe just ends the preview
        let _ = stdout.write_all(text.as_bytes()).and_then(|()| stdout.flush());
    }
}

/// Serial-monitor stand-in: prints the curve's coordinates instead of pixels.
pub struct SerialDisplay {
    fb: FrameBuffer,
}

impl SerialDisplay {
    pub fn new(width: u32, height: u32) -> Self {
        Self { fb: FrameBuffer::new(width, height) }
    }

    /// Topmost curve pixel of every column that has one.
    pub fn curve_points(&self) -> Vec<Point> {
        let Size { width, height } = self.fb.size();
        (0..width)
            .filter_map(|x| (0..height).find(|&y| self.fb.get(x, y) == Ink::Curve).map(|y| Point::new(x, y)))
            .collect()
    }
}

impl Display for SerialDisplay {
    fn size(&self) -> Size { self.fb.size() }
    fn clear(&mut self) { self.fb.clear() }
    fn draw_pixel(&mut self, x: u32, y: u32, ink: Ink) { self.fb.draw_pixel(x, y, ink) }

    fn present(&mut self) {
        self.fb.present();
        println!("{}", format_coordinates(&self.curve_points()));
    }
}

/// Potentiometers that sweep back and forth on their own, one triangle wave
/// per pin, each with its own period so they drift apart.
#[derive(Clone, Debug)]
pub struct SimulatedKnobs {
    raw_max: u16,
    reads: u64,
}

impl SimulatedKnobs {
    pub fn new(raw_max: u16) -> Self {
        Self { raw_max, reads: 0 }
    }

    fn period(pin: Pin) -> u64 {
        match pin {
            PIN_A0 => 240,
            PIN_A1 => 330,
            PIN_A2 => 420,
            _ => 300,
        }
    }
}

impl AnalogInput for SimulatedKnobs {
    fn read_channel(&mut self, pin: Pin) -> u16 {
        self.reads += 1;
        let period = Self::period(pin);
        let pos = self.reads % period;
        let half = period / 2;
        let up = if pos < half { pos } else { period - pos };
        let raw = u64::from(self.raw_max) * up / half;
        u16::try_from(raw).unwrap_or(self.raw_max)
    }
}
