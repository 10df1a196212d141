/// RGBA colour, alpha used for blending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Scale RGB by `factor`, saturating
    pub fn scaled(self, factor: f32) -> Self {
        let f = factor.max(0.0);
        Self {
            r: (self.r as f32 * f).min(255.0) as u8,
            g: (self.g as f32 * f).min(255.0) as u8,
            b: (self.b as f32 * f).min(255.0) as u8,
            a: self.a,
        }
    }

    /// Saturating per-channel add, keeps own alpha
    pub fn saturating_add(self, other: Self) -> Self {
        Self {
            r: self.r.saturating_add(other.r),
            g: self.g.saturating_add(other.g),
            b: self.b.saturating_add(other.b),
            a: self.a,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
    pub color: Rgba,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dot {
    pub x: f32,
    pub y: f32,
    /// Edge length in pixels
    pub size: f32,
    pub color: Rgba,
}

/// Backend-free draw list for one frame.
///
/// Effects push primitives here; the display replays them.
#[derive(Debug, Clone)]
pub struct Frame {
    width: u32,
    height: u32,
    pub background: Rgba,
    pub lines: Vec<Line>,
    pub dots: Vec<Dot>,
}

impl Frame {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: Rgba::opaque(0, 0, 0),
            lines: Vec::with_capacity(4096),
            dots: Vec::with_capacity(1024),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Drop all primitives and set the background
    pub fn clear(&mut self, background: Rgba) {
        self.background = background;
        self.lines.clear();
        self.dots.clear();
    }

    pub fn line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgba) {
        if color.a == 0 {
            return;
        }
        self.lines.push(Line {
            x0,
            y0,
            x1,
            y1,
            color,
        });
    }

    pub fn dot(&mut self, x: f32, y: f32, size: f32, color: Rgba) {
        if color.a == 0 || x < 0.0 || y < 0.0 || x >= self.width as f32 || y >= self.height as f32
        {
            return;
        }
        self.dots.push(Dot { x, y, size, color });
    }
}
