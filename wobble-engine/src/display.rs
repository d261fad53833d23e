//! Display seam and an in-memory frame buffer.
//!
//! The engine never talks to hardware. Anything that can plot a pixel, clear
//! and present implements [`Display`]; OLED/TFT drivers, the terminal host and
//! the C ABI all sit behind it. Coordinates are origin top-left,
//! `x ∈ [0, width)`, `y ∈ [0, height)`; out-of-range draws are ignored.

use line_2d::Coord;
use wobble_core::config::MAX_PIXELS;

/// What a draw call paints.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Ink {
    #[default]
    Background,
    Overlay,
    Curve,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    #[inline] pub const fn new(x: u32, y: u32) -> Self { Self { x, y } }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

pub trait Display {
    fn size(&self) -> Size;

    /// Erase the whole frame to background.
    fn clear(&mut self);

    fn draw_pixel(&mut self, x: u32, y: u32, ink: Ink);

    /// Straight segment, both ends inclusive. The default rasterizes with
    /// Bresenham over `draw_pixel`; drivers with a hardware line override it.
    fn draw_line(&mut self, from: Point, to: Point, ink: Ink) {
        for p in line_points(from, to) {
            self.draw_pixel(p.x, p.y, ink);
        }
    }

    /// Horizontal run starting at `(x, y)`, `len` pixels long.
    fn draw_hline(&mut self, x: u32, y: u32, len: u32, ink: Ink) {
        for dx in 0..len {
            self.draw_pixel(x + dx, y, ink);
        }
    }

    /// Push the finished frame to the panel.
    fn present(&mut self);
}

impl<D: Display + ?Sized> Display for Box<D> {
    #[inline] fn size(&self) -> Size { (**self).size() }
    #[inline] fn clear(&mut self) { (**self).clear() }
    #[inline] fn draw_pixel(&mut self, x: u32, y: u32, ink: Ink) { (**self).draw_pixel(x, y, ink) }
    #[inline] fn draw_line(&mut self, from: Point, to: Point, ink: Ink) { (**self).draw_line(from, to, ink) }
    #[inline] fn draw_hline(&mut self, x: u32, y: u32, len: u32, ink: Ink) { (**self).draw_hline(x, y, len, ink) }
    #[inline] fn present(&mut self) { (**self).present() }
}

fn to_coord(p: Point) -> Coord {
    Coord { x: p.x as i32, y: p.y as i32 }
}

/// Pixels on the segment `from → to`, both ends included.
pub fn line_points(from: Point, to: Point) -> impl Iterator<Item = Point> {
    let start = core::iter::once(from);
    let body = line_2d::coords_between(to_coord(from), to_coord(to))
        .into_iter()
        .filter(|c| c.x >= 0 && c.y >= 0)
        .map(|c| Point::new(c.x as u32, c.y as u32));
    let end = core::iter::once(to);
    start.chain(body).chain(end)
}

/// Monochrome-with-ink frame buffer. Used by tests, the C ABI and the
/// terminal host.
#[derive(Clone, Debug)]
pub struct FrameBuffer {
    size: Size,
    cells: Vec<Ink>,
    presented: u64,
}

impl FrameBuffer {
    /// `None` if `width · height` exceeds [`MAX_PIXELS`].
    pub fn try_new(width: u32, height: u32) -> Option<Self> {
        let pixels = u64::from(width).checked_mul(u64::from(height))?;
        if pixels > MAX_PIXELS {
            return None;
        }
        let len = usize::try_from(pixels).ok()?;
        Some(Self { size: Size { width, height }, cells: vec![Ink::Background; len], presented: 0 })
    }

    /// Like [`FrameBuffer::try_new`], but an oversized geometry yields an
    /// empty 0x0 buffer that ignores every draw.
    pub fn new(width: u32, height: u32) -> Self {
        Self::try_new(width, height).unwrap_or_else(|| {
            log::warn!("frame buffer {width}x{height} exceeds {MAX_PIXELS} pixels; using an empty buffer");
            Self { size: Size { width: 0, height: 0 }, cells: Vec::new(), presented: 0 }
        })
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.size.width && y < self.size.height {
            Some(y as usize * self.size.width as usize + x as usize)
        } else {
            None
        }
    }

    pub fn get(&self, x: u32, y: u32) -> Ink {
        self.index(x, y).map_or(Ink::Background, |i| self.cells[i])
    }

    /// Row `y` as a slice of inks.
    pub fn row(&self, y: u32) -> &[Ink] {
        let w = self.size.width as usize;
        let start = y as usize * w;
        &self.cells[start..start + w]
    }

    pub fn count(&self, ink: Ink) -> usize {
        self.cells.iter().filter(|&&c| c == ink).count()
    }

    /// Number of `present` calls so far.
    pub fn presented(&self) -> u64 { self.presented }

    /// Row-major 1 bit per pixel, MSB first; any non-background ink is set.
    /// Returns the number of bytes written (0 if `out` is too small).
    pub fn pack_bits(&self, out: &mut [u8]) -> usize {
        let stride = self.size.width.div_ceil(8) as usize;
        let needed = stride * self.size.height as usize;
        if out.len() < needed {
            return 0;
        }
        out[..needed].fill(0);
        for y in 0..self.size.height {
            for (x, ink) in self.row(y).iter().enumerate() {
                if *ink != Ink::Background {
                    out[y as usize * stride + x / 8] |= 0x80 >> (x % 8);
                }
            }
        }
        needed
    }
}

impl Display for FrameBuffer {
    fn size(&self) -> Size { self.size }

    fn clear(&mut self) {
        self.cells.fill(Ink::Background);
    }

    fn draw_pixel(&mut self, x: u32, y: u32, ink: Ink) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = ink;
        }
    }

    fn present(&mut self) {
        self.presented += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_draws_are_ignored() {
        let mut fb = FrameBuffer::new(4, 3);
        fb.draw_pixel(4, 0, Ink::Curve);
        fb.draw_pixel(0, 3, Ink::Curve);
        assert_eq!(fb.count(Ink::Curve), 0);
        fb.draw_pixel(3, 2, Ink::Curve);
        assert_eq!(fb.get(3, 2), Ink::Curve);
    }

    #[test]
    fn line_covers_both_ends_and_is_connected() {
        let pts: Vec<Point> = line_points(Point::new(0, 0), Point::new(5, 3)).collect();
        assert!(pts.contains(&Point::new(0, 0)));
        assert!(pts.contains(&Point::new(5, 3)));
        for x in 0..=5 {
            assert!(pts.iter().any(|p| p.x == x), "gap at x={x}");
        }
    }

    #[test]
    fn hline_and_clear() {
        let mut fb = FrameBuffer::new(8, 2);
        fb.draw_hline(2, 1, 4, Ink::Overlay);
        assert_eq!(fb.count(Ink::Overlay), 4);
        assert_eq!(fb.row(1)[2], Ink::Overlay);
        fb.clear();
        assert_eq!(fb.count(Ink::Background), 16);
    }

    #[test]
    fn oversized_buffers_are_refused_not_allocated() {
        assert!(FrameBuffer::try_new(u32::MAX, u32::MAX).is_none());
        assert!(FrameBuffer::try_new(4096, 4096).is_none());
        assert!(FrameBuffer::try_new(2048, 2048).is_some());

        let mut fb = FrameBuffer::new(u32::MAX, u32::MAX);
        assert_eq!(fb.size(), Size { width: 0, height: 0 });
        fb.draw_pixel(0, 0, Ink::Curve);
        assert_eq!(fb.count(Ink::Curve), 0);
        assert_eq!(fb.pack_bits(&mut []), 0);
    }

    #[test]
    fn pack_bits_is_msb_first() {
        let mut fb = FrameBuffer::new(10, 2);
        fb.draw_pixel(0, 0, Ink::Curve);
        fb.draw_pixel(9, 1, Ink::Overlay);
        let mut out = [0xFF_u8; 4];
        assert_eq!(fb.pack_bits(&mut out), 4);
        assert_eq!(out, [0x80, 0x00, 0x00, 0x40]);
        assert_eq!(fb.pack_bits(&mut [0u8; 3]), 0);
    }

    #[test]
    fn boxed_display_forwards() {
        let mut d: Box<dyn Display> = Box::new(FrameBuffer::new(3, 3));
        d.draw_line(Point::new(0, 0), Point::new(2, 2), Ink::Curve);
        d.present();
        assert_eq!(d.size(), Size { width: 3, height: 3 });
    }
}
