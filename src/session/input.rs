use crate::foundation::core::{Point, SurfaceSize};

/// Pointer phase as delivered to scripts (`BEGAN = 0`, `MOVING = 1`, `ENDED = 2`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchPhase {
    Began,
    Moving,
    Ended,
}

impl TouchPhase {
    pub fn code(self) -> i64 {
        match self {
            Self::Began => 0,
            Self::Moving => 1,
            Self::Ended => 2,
        }
    }
}

/// Pointer event in logical coordinates.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TouchEvent {
    pub phase: TouchPhase,
    pub x: f64,
    pub y: f64,
}

/// Map a device position (origin top-left of the displayed surface, which is `display_w` by
/// `display_h` pixels on screen) to logical coordinates. Returns `None` when the display size
/// is zero, negative, or not finite.
pub fn map_pointer(
    device: Point,
    display_w: f64,
    display_h: f64,
    surface: SurfaceSize,
) -> Option<Point> {
    let usable = |v: f64| v.is_finite() && v > 0.0;
    if !usable(display_w) || !usable(display_h) {
        return None;
    }
    Some(Point::new(
        device.x / display_w * surface.width_f64(),
        (display_h - device.y) / display_h * surface.height_f64(),
    ))
}

/// Turns raw press/move/release into script events. Moves are only reported between a press
/// and its release.
#[derive(Clone, Copy, Debug, Default)]
pub struct PointerTracker {
    touching: bool,
}

impl PointerTracker {
    pub fn is_touching(&self) -> bool {
        self.touching
    }

    pub fn press(&mut self, at: Point) -> TouchEvent {
        self.touching = true;
        event(TouchPhase::Began, at)
    }

    pub fn motion(&mut self, at: Point) -> Option<TouchEvent> {
        self.touching.then(|| event(TouchPhase::Moving, at))
    }

    pub fn release(&mut self, at: Point) -> TouchEvent {
        self.touching = false;
        event(TouchPhase::Ended, at)
    }
}

fn event(phase: TouchPhase, at: Point) -> TouchEvent {
    TouchEvent {
        phase,
        x: at.x,
        y: at.y,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/input.rs"]
mod tests;
