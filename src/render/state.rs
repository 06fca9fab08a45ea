use crate::foundation::core::Rgba8;

/// Anchor convention deciding which point of a shape `(x, y)` refers to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorMode {
    #[default]
    Corner,
    Corners,
    Center,
    Radius,
}

impl AnchorMode {
    /// Map the scripted API's numeric constants (`CORNER = 0`, `CORNERS = 1`, `CENTER = 2`,
    /// `RADIUS = 3`).
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Corner),
            1 => Some(Self::Corners),
            2 => Some(Self::Center),
            3 => Some(Self::Radius),
            _ => None,
        }
    }
}

/// Line alignment inside multi-line text (`LEFT = 0`, `RIGHT = 1`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    #[default]
    Left,
    Right,
}

impl TextAlign {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Left),
            1 => Some(Self::Right),
            _ => None,
        }
    }
}

/// Live drawing attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawingState {
    pub fill: Rgba8,
    pub stroke: Rgba8,
    pub tint: Rgba8,
    pub stroke_width: f64,
    pub font_size: f32,
    pub font_name: String,
    pub text_align: TextAlign,
    pub rect_mode: AnchorMode,
    pub ellipse_mode: AnchorMode,
    pub sprite_mode: AnchorMode,
    pub text_mode: AnchorMode,
    /// Smooth (filtered) image sampling.
    pub smooth: bool,
}

impl Default for DrawingState {
    fn default() -> Self {
        Self {
            fill: Rgba8::new(127, 127, 127, 255),
            stroke: Rgba8::WHITE,
            tint: Rgba8::WHITE,
            stroke_width: 0.0,
            font_size: 17.0,
            font_name: "Helvetica".to_string(),
            text_align: TextAlign::Left,
            rect_mode: AnchorMode::Corner,
            ellipse_mode: AnchorMode::Center,
            sprite_mode: AnchorMode::Center,
            text_mode: AnchorMode::Center,
            smooth: true,
        }
    }
}

/// Attributes captured by `pushStyle`.
///
/// Fill, stroke, and tint colors are not captured: `popStyle` leaves them as they are.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleSnapshot {
    stroke_width: f64,
    font_size: f32,
    font_name: String,
    text_align: TextAlign,
    rect_mode: AnchorMode,
    ellipse_mode: AnchorMode,
    sprite_mode: AnchorMode,
    text_mode: AnchorMode,
    smooth: bool,
}

impl DrawingState {
    pub fn snapshot(&self) -> StyleSnapshot {
        StyleSnapshot {
            stroke_width: self.stroke_width,
            font_size: self.font_size,
            font_name: self.font_name.clone(),
            text_align: self.text_align,
            rect_mode: self.rect_mode,
            ellipse_mode: self.ellipse_mode,
            sprite_mode: self.sprite_mode,
            text_mode: self.text_mode,
            smooth: self.smooth,
        }
    }

    pub fn restore(&mut self, snapshot: StyleSnapshot) {
        self.stroke_width = snapshot.stroke_width;
        self.font_size = snapshot.font_size;
        self.font_name = snapshot.font_name;
        self.text_align = snapshot.text_align;
        self.rect_mode = snapshot.rect_mode;
        self.ellipse_mode = snapshot.ellipse_mode;
        self.sprite_mode = snapshot.sprite_mode;
        self.text_mode = snapshot.text_mode;
        self.smooth = snapshot.smooth;
    }
}

/// LIFO stack of style snapshots. Popping an empty stack does nothing.
#[derive(Clone, Debug, Default)]
pub struct StyleStack {
    entries: Vec<StyleSnapshot>,
}

impl StyleStack {
    pub fn push(&mut self, state: &DrawingState) {
        self.entries.push(state.snapshot());
    }

    /// Restore the most recent snapshot into `state`. Returns whether one was present.
    pub fn pop_into(&mut self, state: &mut DrawingState) -> bool {
        match self.entries.pop() {
            Some(snapshot) => {
                state.restore(snapshot);
                true
            }
            None => false,
        }
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/state.rs"]
mod tests;
