//! Frame renderer: displacement → screen rows, overlays, curve, present.
//!
//! Row mapping:
//!
//! ```text
//! scale = (height/2 − 1) / (max_amplitude · (1 + r))
//! row   = round(height/2 + displacement · scale)   clamped to [0, height−1]
//! ```
//!
//! Screen y grows downward and so does positive displacement. The
//! scale is fixed by the amplitude upper bound, not the live amplitude, so
//! the whole range of the control fits on screen and the curve visibly grows
//! and shrinks.
//!
//! Draw order per frame is erase, overlays, curve, present. The curve is last
//! so overlays never cover it.

use wobble_core::config::{CurveStyle, EraseMode, OverlayConfig, WobbleConfig};
use wobble_core::params::WobbleParameters;
use wobble_core::waveform::Waveform;

use crate::display::{Display, Ink, Point};

/// Grid spacing in pixels.
pub const GRID_SPACING: u32 = 16;
/// Dot pitch along grid lines.
const GRID_DOT: u32 = 4;
/// Length of the amplitude tick marks at each edge.
const MARK_LEN: u32 = 4;

/// The last rendered frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderFrame {
    /// One point per sampled column, left to right.
    pub points: Vec<Point>,
    /// Parameters the frame was drawn with.
    pub params: WobbleParameters,
    pub phase: f32,
    /// Curve draw calls issued (one per sampled column).
    pub curve_calls: usize,
}

#[derive(Clone, Debug)]
pub struct Renderer {
    width: u32,
    height: u32,
    step: u32,
    center: f32,
    scale: f32,
    overlay: OverlayConfig,
    frame: RenderFrame,
    /// Rows of last frame's amplitude ticks, for targeted erase.
    marks: Option<(u32, u32)>,
    scratch: Vec<f32>,
}

impl Renderer {
    pub fn new(config: &WobbleConfig) -> Self {
        let width = config.display.width.max(1);
        let height = config.display.height.max(1);
        let center = height as f32 / 2.0;
        let peak = config.bounds.amplitude.max.abs() * (1.0 + config.wave.amplitude_ratio);
        let scale = (center - 1.0).max(0.0) / peak.max(f32::EPSILON);
        Self {
            width,
            height,
            step: config.performance.calculation_step.max(1),
            center,
            scale,
            overlay: config.overlay,
            frame: RenderFrame::default(),
            marks: None,
            scratch: Vec::with_capacity(width as usize),
        }
    }

    #[inline] pub fn scale(&self) -> f32 { self.scale }
    #[inline] pub fn step(&self) -> u32 { self.step }
    #[inline] pub fn frame(&self) -> &RenderFrame { &self.frame }
    #[inline] pub fn overlay(&self) -> &OverlayConfig { &self.overlay }

    /// Screen row for a displacement.
    #[inline]
    pub fn row_for(&self, displacement: f32) -> u32 {
        let row = (self.center + displacement * self.scale).round();
        if row.is_nan() {
            return self.center as u32;
        }
        row.clamp(0.0, (self.height - 1) as f32) as u32
    }

    #[inline]
    fn center_row(&self) -> u32 {
        (self.center as u32).min(self.height - 1)
    }

    /// Draw one frame and present it.
    pub fn render<D: Display + ?Sized>(
        &mut self,
        display: &mut D,
        waveform: &Waveform,
        params: &WobbleParameters,
        phase: f32,
    ) -> &RenderFrame {
        self.erase(display);

        let peak = waveform.peak(params.amplitude);
        self.draw_overlays(display, peak);

        self.scratch.resize(waveform.sample_count(self.step), 0.0);
        let n = waveform.evaluate_row(params, phase, self.step, &mut self.scratch);
        let mut points = core::mem::take(&mut self.frame.points);
        points.clear();
        for (i, &d) in self.scratch[..n].iter().enumerate() {
            points.push(Point::new(i as u32 * self.step, self.row_for(d)));
        }

        let curve_calls = self.draw_curve(display, &points, Ink::Curve);
        display.present();

        self.frame = RenderFrame { points, params: *params, phase, curve_calls };
        &self.frame
    }

    fn erase<D: Display + ?Sized>(&mut self, display: &mut D) {
        match self.overlay.erase {
            EraseMode::Full => display.clear(),
            EraseMode::Targeted => {
                let old = core::mem::take(&mut self.frame.points);
                self.draw_curve(display, &old, Ink::Background);
                self.frame.points = old;
                if let Some((top, bottom)) = self.marks.take() {
                    self.draw_marks(display, top, bottom, Ink::Background);
                }
            }
        }
    }

    fn draw_overlays<D: Display + ?Sized>(&mut self, display: &mut D, peak: f32) {
        if self.overlay.grid {
            self.draw_grid(display);
        }
        if self.overlay.center_line {
            display.draw_hline(0, self.center_row(), self.width, Ink::Overlay);
        }
        if self.overlay.amplitude_marks {
            let top = self.row_for(-peak);
            let bottom = self.row_for(peak);
            self.draw_marks(display, top, bottom, Ink::Overlay);
            self.marks = Some((top, bottom));
        }
    }

    fn draw_grid<D: Display + ?Sized>(&self, display: &mut D) {
        for y in 0..self.height {
            for x in 0..self.width {
                let on_vertical = x % GRID_SPACING == 0 && y % GRID_DOT == 0;
                let on_horizontal = y % GRID_SPACING == 0 && x % GRID_DOT == 0;
                if on_vertical || on_horizontal {
                    display.draw_pixel(x, y, Ink::Overlay);
                }
            }
        }
    }

    fn draw_marks<D: Display + ?Sized>(&self, display: &mut D, top: u32, bottom: u32, ink: Ink) {
        let len = MARK_LEN.min(self.width);
        let right = self.width - len;
        for row in [top, bottom] {
            display.draw_hline(0, row, len, ink);
            display.draw_hline(right, row, len, ink);
        }
    }

    /// One draw call per point; returns the number of calls.
    fn draw_curve<D: Display + ?Sized>(&self, display: &mut D, points: &[Point], ink: Ink) -> usize {
        let mut prev: Option<Point> = None;
        for &p in points {
            match (self.overlay.curve, prev) {
                (CurveStyle::Lines, Some(from)) => display.draw_line(from, p, ink),
                _ => display.draw_pixel(p.x, p.y, ink),
            }
            prev = Some(p);
        }
        points.len()
    }
}
