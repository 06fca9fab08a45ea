//! Anchor-mode resolution for the scripted primitives.
//!
//! All functions here work in logical coordinates (origin bottom-left, Y up). Conversion to
//! surface coordinates (origin top-left, Y down) happens once, in [`LogicalBox::to_surface`]
//! and [`flip_y`].

use kurbo::{Point, Rect, Vec2};

use crate::render::state::AnchorMode;

/// Convert a logical Y to a surface Y.
pub fn flip_y(y: f64, surface_height: f64) -> f64 {
    surface_height - y
}

/// Axis-aligned box in logical coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LogicalBox {
    pub left: f64,
    pub bottom: f64,
    pub width: f64,
    pub height: f64,
}

impl LogicalBox {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn top(&self) -> f64 {
        self.bottom + self.height
    }

    /// Surface-space rectangle, normalized to non-negative size.
    pub fn to_surface(self, surface_height: f64) -> Rect {
        let top = surface_height - self.bottom - self.height;
        Rect::new(
            self.left,
            top,
            self.left + self.width,
            top + self.height,
        )
        .abs()
    }

    /// Surface-space rectangle that keeps the box's orientation: `x0`/`y0` is where the image's
    /// top-left corner lands. A negative width or height gives `x1 < x0` or `y1 < y0`, which
    /// mirrors an image drawn into it.
    pub fn to_surface_oriented(self, surface_height: f64) -> Rect {
        Rect::new(
            self.left,
            surface_height - self.bottom - self.height,
            self.left + self.width,
            surface_height - self.bottom,
        )
    }
}

/// Fill box of `rect(x, y, w, h)`, inset by half the stroke width on every side so the
/// outline does not overdraw the fill.
pub fn rect_box(mode: AnchorMode, x: f64, y: f64, w: f64, h: f64, stroke_width: f64) -> LogicalBox {
    let half = stroke_width / 2.0;
    let mut b = LogicalBox {
        left: x + half,
        bottom: y + half,
        width: w - stroke_width,
        height: h - stroke_width,
    };
    match mode {
        AnchorMode::Corner => {}
        AnchorMode::Center => {
            b.left = x - w / 2.0 + half;
            b.bottom = y - h / 2.0 + half;
        }
        AnchorMode::Radius => {
            b.left = x - w + half;
            b.bottom = y - h + half;
            b.width = w * 2.0 - stroke_width;
            b.height = h * 2.0 - stroke_width;
        }
        AnchorMode::Corners => {
            b.width = w - x - stroke_width;
            b.height = h - y - stroke_width;
        }
    }
    b
}

/// Ellipse resolved to a logical center and radii.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EllipseGeom {
    pub center: Point,
    pub radii: Vec2,
}

/// Geometry of `ellipse(x, y, w, h)`. Radii shrink by the full stroke width; `None` when a
/// radius would be negative.
pub fn ellipse_geom(
    mode: AnchorMode,
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    stroke_width: f64,
) -> Option<EllipseGeom> {
    let (mut cx, mut cy, mut ew, mut eh) = (x, y, w, h);
    match mode {
        AnchorMode::Center => {}
        AnchorMode::Radius => {
            ew = w * 2.0;
            eh = h * 2.0;
        }
        AnchorMode::Corner => {
            cx = x + w / 2.0;
            cy = y + h / 2.0;
        }
        AnchorMode::Corners => {
            ew = w - x;
            eh = h - y;
            cx = x + ew / 2.0;
            cy = y + eh / 2.0;
        }
    }
    let rx = ew / 2.0 - stroke_width;
    let ry = eh / 2.0 - stroke_width;
    if !(rx >= 0.0 && ry >= 0.0) {
        return None;
    }
    Some(EllipseGeom {
        center: Point::new(cx, cy),
        radii: Vec2::new(rx, ry),
    })
}

/// Destination box of `sprite(img, x, y, w, h)` once `w`/`h` are resolved.
pub fn sprite_box(mode: AnchorMode, x: f64, y: f64, w: f64, h: f64) -> LogicalBox {
    match mode {
        AnchorMode::Corner => LogicalBox {
            left: x,
            bottom: y,
            width: w,
            height: h,
        },
        AnchorMode::Center => LogicalBox {
            left: x - w / 2.0,
            bottom: y - h / 2.0,
            width: w,
            height: h,
        },
        AnchorMode::Radius => LogicalBox {
            left: x - w,
            bottom: y - h,
            width: w * 2.0,
            height: h * 2.0,
        },
        AnchorMode::Corners => LogicalBox {
            left: x,
            bottom: y,
            width: w - x,
            height: h - y,
        },
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/geometry.rs"]
mod tests;
