//! Serializable draw commands.
//!
//! A JSON list of [`DrawCommand`]s drives a [`Renderer`] without an execution engine, which is
//! how the CLI renders single frames.

use crate::assets::resolve::{AssetRef, AssetResolver};
use crate::foundation::core::Rgba8;
use crate::foundation::error::{SketchError, SketchResult};
use crate::render::renderer::Renderer;
use crate::render::state::{AnchorMode, TextAlign};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Background { color: Rgba8 },
    Fill { color: Rgba8 },
    Stroke { color: Rgba8 },
    Tint { color: Rgba8 },
    StrokeWidth { width: f64 },
    Font { name: String },
    FontSize { size: f32 },
    TextMode { mode: AnchorMode },
    TextAlign { align: TextAlign },
    RectMode { mode: AnchorMode },
    EllipseMode { mode: AnchorMode },
    SpriteMode { mode: AnchorMode },
    Smooth,
    NoSmooth,
    PushStyle,
    PopStyle,
    PushMatrix,
    PopMatrix,
    ResetMatrix,
    Translate { x: f64, y: f64 },
    Scale { x: f64, y: f64 },
    Rect { x: f64, y: f64, w: f64, h: f64 },
    Ellipse { x: f64, y: f64, w: f64, h: f64 },
    Line { x1: f64, y1: f64, x2: f64, y2: f64 },
    Sprite {
        asset: String,
        x: f64,
        y: f64,
        #[serde(default)]
        w: Option<f64>,
        #[serde(default)]
        h: Option<f64>,
    },
    Text { text: String, x: f64, y: f64 },
}

impl DrawCommand {
    /// Execute against `renderer`. Sprites whose asset does not resolve draw nothing.
    pub fn apply(&self, renderer: &mut Renderer, assets: &AssetResolver<'_>) -> SketchResult<()> {
        match self {
            Self::Background { color } => renderer.background(*color),
            Self::Fill { color } => renderer.fill(*color),
            Self::Stroke { color } => renderer.stroke(*color),
            Self::Tint { color } => renderer.tint(*color),
            Self::StrokeWidth { width } => renderer.stroke_width(*width),
            Self::Font { name } => renderer.font(name),
            Self::FontSize { size } => renderer.font_size(*size),
            Self::TextMode { mode } => renderer.text_mode(*mode),
            Self::TextAlign { align } => renderer.text_align(*align),
            Self::RectMode { mode } => renderer.rect_mode(*mode),
            Self::EllipseMode { mode } => renderer.ellipse_mode(*mode),
            Self::SpriteMode { mode } => renderer.sprite_mode(*mode),
            Self::Smooth => renderer.smooth(),
            Self::NoSmooth => renderer.no_smooth(),
            Self::PushStyle => renderer.push_style(),
            Self::PopStyle => renderer.pop_style(),
            Self::PushMatrix => renderer.push_matrix(),
            Self::PopMatrix => renderer.pop_matrix(),
            Self::ResetMatrix => renderer.reset_matrix(),
            Self::Translate { x, y } => renderer.translate(*x, *y),
            Self::Scale { x, y } => renderer.scale(*x, *y),
            Self::Rect { x, y, w, h } => renderer.rect(*x, *y, *w, *h),
            Self::Ellipse { x, y, w, h } => renderer.ellipse(*x, *y, *w, *h),
            Self::Line { x1, y1, x2, y2 } => renderer.line(*x1, *y1, *x2, *y2),
            Self::Sprite { asset, x, y, w, h } => {
                let image = AssetRef::parse(asset)
                    .as_ref()
                    .and_then(|r| assets.image(r));
                match image {
                    Some(image) => renderer.sprite(image.materialize(), *x, *y, *w, *h)?,
                    None => tracing::debug!(asset = %asset, "sprite asset not found"),
                }
            }
            Self::Text { text, x, y } => renderer.text(text, *x, *y)?,
        }
        Ok(())
    }
}

pub fn parse_commands(json: &str) -> SketchResult<Vec<DrawCommand>> {
    serde_json::from_str(json).map_err(|e| SketchError::serde(format!("invalid draw commands: {e}")))
}

/// Apply every command in order, then rasterize.
pub fn replay(
    commands: &[DrawCommand],
    renderer: &mut Renderer,
    assets: &AssetResolver<'_>,
) -> SketchResult<()> {
    for cmd in commands {
        cmd.apply(renderer, assets)?;
    }
    renderer.present();
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/command.rs"]
mod tests;
