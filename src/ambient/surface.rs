//! Colour grid the ambient scene is painted on.
//!
//! One entry per terminal cell. Colours are kept as floats so repeated
//! fading toward the background converges smoothly instead of getting stuck
//! on integer rounding.

/// An RGB colour with channels in 0..=255.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Mixes `other` over `self` with the given opacity.
    #[must_use]
    pub fn blend(self, other: Rgb, alpha: f32) -> Rgb {
        let a = alpha.clamp(0.0, 1.0);
        Rgb {
            r: self.r + (other.r - self.r) * a,
            g: self.g + (other.g - self.g) * a,
            b: self.b + (other.b - self.b) * a,
        }
    }

    /// Returns the colour as terminal-ready bytes.
    #[must_use]
    pub fn to_u8(self) -> (u8, u8, u8) {
        let channel = |v: f32| v.round().clamp(0.0, 255.0) as u8;
        (channel(self.r), channel(self.g), channel(self.b))
    }
}

/// Dark navy the scene fades toward.
pub const BACKGROUND: Rgb = Rgb::new(10.0, 14.0, 39.0);

/// A width x height grid of colours, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    width: u16,
    height: u16,
    pixels: Vec<Rgb>,
}

impl Surface {
    /// Creates a surface filled with the background colour.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            pixels: vec![BACKGROUND; usize::from(width) * usize::from(height)],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Resizes the surface, clearing it to the background.
    pub fn resize(&mut self, width: u16, height: u16) {
        *self = Self::new(width, height);
    }

    /// Fills every cell with `color`.
    pub fn clear(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    /// Moves every cell `alpha` of the way toward `color`.
    pub fn fade(&mut self, color: Rgb, alpha: f32) {
        for pixel in &mut self.pixels {
            *pixel = pixel.blend(color, alpha);
        }
    }

    /// Blends `color` into one cell. Out-of-bounds coordinates are ignored.
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Rgb, alpha: f32) {
        if let Some(index) = self.index(x, y) {
            self.pixels[index] = self.pixels[index].blend(color, alpha);
        }
    }

    /// Returns the colour of one cell.
    pub fn get(&self, x: i32, y: i32) -> Option<Rgb> {
        self.index(x, y).map(|index| self.pixels[index])
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        let width = usize::from(self.width);
        if x >= width || y >= usize::from(self.height) {
            return None;
        }
        Some(y * width + x)
    }
}
