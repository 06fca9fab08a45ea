use crate::catalog::image::DecodedImage;
use crate::foundation::core::{Point, Rgba8, SurfaceSize};
use crate::foundation::error::SketchResult;
use crate::render::geometry::{ellipse_geom, flip_y, rect_box, sprite_box};
use crate::render::state::{AnchorMode, DrawingState, StyleStack, TextAlign};
use crate::render::surface::{ImageDraw, Surface};
use crate::render::text::TextEngine;
use crate::render::tint::{tint_image, tint_opacity};

/// Readable image handed to scripts by `readImage`; `copy` cuts sub-images out of it.
#[derive(Clone, Debug)]
pub struct ImageRegion {
    image: DecodedImage,
}

impl ImageRegion {
    pub fn new(image: DecodedImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width
    }

    pub fn height(&self) -> u32 {
        self.image.height
    }

    pub fn image(&self) -> &DecodedImage {
        &self.image
    }

    /// Sub-image with `(x, y)` as its 1-based bottom-left corner.
    pub fn copy(&self, x: i64, y: i64, w: u32, h: u32) -> ImageRegion {
        ImageRegion {
            image: self.image.copy_region(x, y, w, h),
        }
    }
}

/// Immediate-mode drawing API over a retained surface.
///
/// Callers work in logical coordinates (origin bottom-left, Y up). Every primitive resolves its
/// anchor mode against the live [`DrawingState`] and flips Y before touching the surface.
#[derive(Debug)]
pub struct Renderer {
    surface: Surface,
    state: DrawingState,
    styles: StyleStack,
    text: TextEngine,
}

impl Renderer {
    pub fn new(size: SurfaceSize) -> Self {
        Self::with_text_engine(size, TextEngine::new())
    }

    pub fn with_text_engine(size: SurfaceSize, text: TextEngine) -> Self {
        Self {
            surface: Surface::new(size),
            state: DrawingState::default(),
            styles: StyleStack::default(),
            text,
        }
    }

    pub fn size(&self) -> SurfaceSize {
        self.surface.size()
    }

    pub fn state(&self) -> &DrawingState {
        &self.state
    }

    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    pub fn background(&mut self, color: Rgba8) {
        self.surface.clear(color);
    }

    pub fn fill(&mut self, color: Rgba8) {
        self.state.fill = color;
    }

    pub fn stroke(&mut self, color: Rgba8) {
        self.state.stroke = color;
    }

    pub fn tint(&mut self, color: Rgba8) {
        self.state.tint = color;
    }

    /// Negative and non-finite widths become 0, which disables outlines.
    pub fn stroke_width(&mut self, width: f64) {
        self.state.stroke_width = if width.is_finite() { width.max(0.0) } else { 0.0 };
    }

    pub fn font(&mut self, name: &str) {
        self.state.font_name = name.to_string();
    }

    pub fn font_size(&mut self, size: f32) {
        if size.is_finite() && size > 0.0 {
            self.state.font_size = size;
        } else {
            tracing::debug!(size, "ignoring invalid font size");
        }
    }

    pub fn text_mode(&mut self, mode: AnchorMode) {
        self.state.text_mode = mode;
    }

    pub fn text_align(&mut self, align: TextAlign) {
        self.state.text_align = align;
    }

    pub fn rect_mode(&mut self, mode: AnchorMode) {
        self.state.rect_mode = mode;
    }

    pub fn ellipse_mode(&mut self, mode: AnchorMode) {
        self.state.ellipse_mode = mode;
    }

    pub fn sprite_mode(&mut self, mode: AnchorMode) {
        self.state.sprite_mode = mode;
    }

    pub fn smooth(&mut self) {
        self.state.smooth = true;
    }

    pub fn no_smooth(&mut self) {
        self.state.smooth = false;
    }

    pub fn push_style(&mut self) {
        self.styles.push(&self.state);
    }

    pub fn pop_style(&mut self) {
        self.styles.pop_into(&mut self.state);
    }

    pub fn style_depth(&self) -> usize {
        self.styles.depth()
    }

    pub fn push_matrix(&mut self) {
        self.surface.push_matrix();
    }

    pub fn pop_matrix(&mut self) {
        self.surface.pop_matrix();
    }

    pub fn reset_matrix(&mut self) {
        self.surface.reset_matrix();
    }

    /// Translate in logical space (Y up).
    pub fn translate(&mut self, x: f64, y: f64) {
        self.surface.translate(x, -y);
    }

    pub fn scale(&mut self, x: f64, y: f64) {
        self.surface.scale(x, y);
    }

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        let sw = self.state.stroke_width;
        let area = rect_box(self.state.rect_mode, x, y, w, h, sw).to_surface(self.surface.height());
        self.surface.fill_rect(area, self.state.fill);
        if sw > 0.0 {
            self.surface.stroke_rect(area, self.state.stroke, sw);
        }
    }

    pub fn ellipse(&mut self, x: f64, y: f64, w: f64, h: f64) {
        let sw = self.state.stroke_width;
        let Some(geom) = ellipse_geom(self.state.ellipse_mode, x, y, w, h, sw) else {
            tracing::debug!(x, y, w, h, stroke_width = sw, "ellipse radius below zero");
            return;
        };
        let center = Point::new(geom.center.x, flip_y(geom.center.y, self.surface.height()));
        self.surface.fill_ellipse(center, geom.radii, self.state.fill);
        if sw > 0.0 {
            self.surface
                .stroke_ellipse(center, geom.radii, self.state.stroke, sw);
        }
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        let sw = self.state.stroke_width;
        if sw <= 0.0 {
            return;
        }
        let h = self.surface.height();
        self.surface.stroke_line(
            Point::new(x1, flip_y(y1, h)),
            Point::new(x2, flip_y(y2, h)),
            self.state.stroke,
            sw,
        );
    }

    /// Draw an image. Omitted `w`/`h` default to the image's own size; a non-white tint draws
    /// a color-multiplied copy at the tint's alpha.
    pub fn sprite(
        &mut self,
        image: &DecodedImage,
        x: f64,
        y: f64,
        w: Option<f64>,
        h: Option<f64>,
    ) -> SketchResult<()> {
        if image.is_empty() {
            return Ok(());
        }
        let w = w.unwrap_or(f64::from(image.width));
        let h = h.unwrap_or(f64::from(image.height));
        let dest = sprite_box(self.state.sprite_mode, x, y, w, h)
            .to_surface_oriented(self.surface.height());

        let tint = self.state.tint;
        if tint.is_opaque_white() {
            return self.surface.draw_image(
                image,
                dest,
                ImageDraw {
                    smooth: self.state.smooth,
                    opacity: 1.0,
                    cache: true,
                },
            );
        }
        let tinted = tint_image(image, tint);
        self.surface.draw_image(
            &tinted,
            dest,
            ImageDraw {
                smooth: self.state.smooth,
                opacity: tint_opacity(tint),
                cache: false,
            },
        )
    }

    /// Draw `msg` in the fill color. CENTER centers the text box on `(x, y)`; every other mode
    /// puts the box's bottom-left corner there.
    pub fn text(&mut self, msg: &str, x: f64, y: f64) -> SketchResult<()> {
        if !self.text.has_fonts() {
            tracing::debug!("no font configured; skipping text");
            return Ok(());
        }
        let layout = self.text.layout(
            msg,
            &self.state.font_name,
            self.state.font_size,
            self.state.text_align,
            self.state.fill,
        )?;
        let sy = flip_y(y, self.surface.height());
        let origin = match self.state.text_mode {
            AnchorMode::Center => Point::new(x - layout.width() / 2.0, sy - layout.height() / 2.0),
            _ => Point::new(x, sy - layout.height()),
        };
        self.surface.draw_text(&layout, origin, self.state.fill);
        Ok(())
    }

    /// Width and height of `msg` in the current font. `(0, 0)` without a font.
    pub fn text_size(&mut self, msg: &str) -> SketchResult<(f64, f64)> {
        if !self.text.has_fonts() {
            return Ok((0.0, 0.0));
        }
        self.text
            .measure(msg, &self.state.font_name, self.state.font_size)
    }

    pub fn read_image(&self, image: &DecodedImage) -> ImageRegion {
        ImageRegion::new(image.clone())
    }

    /// Rasterize everything drawn so far.
    pub fn present(&mut self) {
        self.surface.flush();
    }

    /// Pixel at logical coordinates, premultiplied.
    pub fn pixel(&mut self, x: u32, y: u32) -> Option<[u8; 4]> {
        let size = self.surface.size();
        if x >= size.width || y >= size.height {
            return None;
        }
        self.surface.pixel(x, size.height - 1 - y)
    }

    pub fn frame_rgba8(&mut self) -> Vec<u8> {
        self.surface.to_rgba8_straight()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/renderer.rs"]
mod tests;
