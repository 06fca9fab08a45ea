use crate::foundation::error::{SketchError, SketchResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Logical size of the drawing surface in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> SketchResult<Self> {
        if width == 0 || height == 0 {
            return Err(SketchError::validation("surface size must be non-zero"));
        }
        if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
            return Err(SketchError::validation("surface size exceeds u16"));
        }
        Ok(Self { width, height })
    }

    pub fn width_f64(self) -> f64 {
        f64::from(self.width)
    }

    pub fn height_f64(self) -> f64 {
        f64::from(self.height)
    }
}

/// Straight (non-premultiplied) RGBA8 color as used by the scripted drawing API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Default for Rgba8 {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Rgba8 {
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Build a color from script-side channel values, clamping each to `0..=255`.
    pub fn from_f64(r: f64, g: f64, b: f64, a: f64) -> Self {
        fn channel(v: f64) -> u8 {
            if v.is_nan() {
                return 0;
            }
            v.round().clamp(0.0, 255.0) as u8
        }
        Self::new(channel(r), channel(g), channel(b), channel(a))
    }

    pub fn is_opaque_white(self) -> bool {
        self == Self::WHITE
    }

    pub fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// Premultiplied channel bytes.
    pub fn premul(self) -> [u8; 4] {
        let a = u16::from(self.a);
        let premul = |c: u8| -> u8 { (((u16::from(c) * a) + 127) / 255) as u8 };
        [premul(self.r), premul(self.g), premul(self.b), self.a]
    }

    pub(crate) fn to_cpu_color(self) -> vello_cpu::peniko::Color {
        vello_cpu::peniko::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
