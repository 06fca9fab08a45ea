use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{SketchError, SketchResult};
use crate::render::state::TextAlign;

/// Font registered with the engine: the family name Parley resolves it by, and the same bytes
/// as `vello_cpu` glyph-run font data.
#[derive(Clone)]
pub(crate) struct LoadedFont {
    family: String,
    pub(crate) data: vello_cpu::peniko::FontData,
}

/// Laid-out text ready to be drawn. Glyph positions are relative to the top-left of the text
/// box.
pub struct TextLayout {
    pub(crate) layout: parley::Layout<Rgba8>,
    pub(crate) font: vello_cpu::peniko::FontData,
}

impl TextLayout {
    pub fn width(&self) -> f64 {
        f64::from(self.layout.width())
    }

    pub fn height(&self) -> f64 {
        f64::from(self.layout.height())
    }
}

/// Stateful helper for shaping text with Parley from raw font bytes.
///
/// Fonts are looked up by family name; unknown names fall back to the first font registered,
/// so scripts asking for platform fonts such as `Helvetica` still render.
pub struct TextEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<Rgba8>,
    fonts: HashMap<String, LoadedFont>,
    fallback: Option<String>,
}

impl Default for TextEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TextEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextEngine")
            .field("fonts", &self.fonts.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl TextEngine {
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            fonts: HashMap::new(),
            fallback: None,
        }
    }

    /// Register a TTF/OTF font and return its family name.
    pub fn register_font(&mut self, font_bytes: Vec<u8>) -> SketchResult<String> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            SketchError::validation("no font families registered from font bytes")
        })?;
        let family = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| SketchError::validation("registered font family has no name"))?
            .to_string();

        let data = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);
        tracing::debug!(family = %family, "registered font");
        self.fonts.insert(
            family.clone(),
            LoadedFont {
                family: family.clone(),
                data,
            },
        );
        if self.fallback.is_none() {
            self.fallback = Some(family.clone());
        }
        Ok(family)
    }

    pub fn register_font_path(&mut self, path: &Path) -> SketchResult<String> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read font file {}", path.display()))?;
        self.register_font(bytes)
    }

    pub fn has_fonts(&self) -> bool {
        !self.fonts.is_empty()
    }

    fn font_for(&self, name: &str) -> Option<&LoadedFont> {
        self.fonts
            .get(name)
            .or_else(|| self.fallback.as_ref().and_then(|f| self.fonts.get(f)))
    }

    /// Shape and lay out `text`. Explicit newlines start new lines; `align` positions shorter
    /// lines inside the widest one.
    pub fn layout(
        &mut self,
        text: &str,
        font_name: &str,
        size_px: f32,
        align: TextAlign,
        brush: Rgba8,
    ) -> SketchResult<TextLayout> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(SketchError::validation(
                "font size must be finite and > 0",
            ));
        }
        let font = self
            .font_for(font_name)
            .cloned()
            .ok_or_else(|| SketchError::validation("no font registered"))?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(font.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<Rgba8> = builder.build(text);
        layout.break_all_lines(None);
        let alignment = match align {
            TextAlign::Left => parley::Alignment::Start,
            TextAlign::Right => parley::Alignment::End,
        };
        let width = layout.width();
        layout.align(Some(width), alignment, parley::AlignmentOptions::default());

        Ok(TextLayout {
            layout,
            font: font.data,
        })
    }

    /// Width and height of `text` as it would be drawn.
    pub fn measure(&mut self, text: &str, font_name: &str, size_px: f32) -> SketchResult<(f64, f64)> {
        let layout = self.layout(text, font_name, size_px, TextAlign::Left, Rgba8::WHITE)?;
        Ok((layout.width(), layout.height()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
