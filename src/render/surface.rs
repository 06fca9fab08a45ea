//! Retained pixel surface on top of `vello_cpu`.
//!
//! `vello_cpu` records draw commands and rasterizes them on flush. The surface keeps the last
//! rasterized frame as a pixmap and replays it as the first command after every flush, so
//! drawing accumulates across frames the way a canvas does until `background` paints over it.

use std::collections::HashMap;
use std::sync::Arc;

use kurbo::Shape;

use crate::catalog::image::{DecodedImage, unpremultiply_rgba8_in_place};
use crate::foundation::core::{Affine, Point, Rect, Rgba8, SurfaceSize, Vec2};
use crate::foundation::error::{SketchError, SketchResult};
use crate::render::text::TextLayout;

const IMAGE_CACHE_CAP: usize = 128;
const ELLIPSE_TOLERANCE: f64 = 0.1;

/// How an image is sampled when drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImageDraw {
    pub smooth: bool,
    pub opacity: f32,
    /// Keep the converted pixmap for later draws of the same image. Off for one-off images
    /// such as tinted copies.
    pub cache: bool,
}

impl Default for ImageDraw {
    fn default() -> Self {
        Self {
            smooth: true,
            opacity: 1.0,
            cache: true,
        }
    }
}

struct CachedPixmap {
    // Keeps the source buffer alive so its address stays a valid cache key.
    _source: Arc<Vec<u8>>,
    pixmap: Arc<vello_cpu::Pixmap>,
}

pub struct Surface {
    size: SurfaceSize,
    ctx: vello_cpu::RenderContext,
    committed: Arc<vello_cpu::Pixmap>,
    pending: bool,
    transform: Affine,
    saved: Vec<Affine>,
    images: HashMap<usize, CachedPixmap>,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("size", &self.size)
            .field("pending", &self.pending)
            .field("transform", &self.transform)
            .field("saved", &self.saved.len())
            .finish()
    }
}

impl Surface {
    /// Create a transparent surface.
    pub fn new(size: SurfaceSize) -> Self {
        let (w, h) = (size.width as u16, size.height as u16);
        Self {
            size,
            ctx: vello_cpu::RenderContext::new(w, h),
            committed: Arc::new(vello_cpu::Pixmap::new(w, h)),
            pending: false,
            transform: Affine::IDENTITY,
            saved: Vec::new(),
            images: HashMap::new(),
        }
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn height(&self) -> f64 {
        self.size.height_f64()
    }

    pub fn transform(&self) -> Affine {
        self.transform
    }

    pub fn matrix_depth(&self) -> usize {
        self.saved.len()
    }

    pub fn push_matrix(&mut self) {
        self.saved.push(self.transform);
    }

    /// Restore the last saved transform. Popping an empty stack keeps the current transform.
    pub fn pop_matrix(&mut self) {
        if let Some(t) = self.saved.pop() {
            self.transform = t;
        }
    }

    pub fn reset_matrix(&mut self) {
        self.transform = Affine::IDENTITY;
    }

    /// Post-multiply a translation in surface space.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.transform = self.transform * Affine::translate(Vec2::new(dx, dy));
    }

    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.transform = self.transform * Affine::scale_non_uniform(sx, sy);
    }

    fn begin(&mut self, transform: Affine) {
        self.pending = true;
        self.ctx
            .set_blend_mode(vello_cpu::peniko::BlendMode::default());
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(affine_to_cpu(transform));
    }

    /// Fill the whole surface with `color` under the current transform.
    pub fn clear(&mut self, color: Rgba8) {
        if color.a == 255 && self.transform == Affine::IDENTITY {
            // Everything drawn so far is covered.
            self.ctx.reset();
        }
        let full = Rect::new(0.0, 0.0, self.size.width_f64(), self.size.height_f64());
        self.fill_rect(full, color);
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Rgba8) {
        self.begin(self.transform);
        self.ctx.set_paint(color.to_cpu_color());
        self.ctx.fill_rect(&rect_to_cpu(rect));
    }

    pub fn stroke_rect(&mut self, rect: Rect, color: Rgba8, width: f64) {
        self.begin(self.transform);
        self.ctx.set_paint(color.to_cpu_color());
        self.ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
        self.ctx.stroke_rect(&rect_to_cpu(rect));
    }

    pub fn fill_ellipse(&mut self, center: Point, radii: Vec2, color: Rgba8) {
        let path = ellipse_path(center, radii);
        self.begin(self.transform);
        self.ctx.set_paint(color.to_cpu_color());
        self.ctx.fill_path(&path);
    }

    pub fn stroke_ellipse(&mut self, center: Point, radii: Vec2, color: Rgba8, width: f64) {
        let path = ellipse_path(center, radii);
        self.begin(self.transform);
        self.ctx.set_paint(color.to_cpu_color());
        self.ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
        self.ctx.stroke_path(&path);
    }

    pub fn stroke_line(&mut self, from: Point, to: Point, color: Rgba8, width: f64) {
        let mut path = vello_cpu::kurbo::BezPath::new();
        path.move_to(vello_cpu::kurbo::Point::new(from.x, from.y));
        path.line_to(vello_cpu::kurbo::Point::new(to.x, to.y));
        self.begin(self.transform);
        self.ctx.set_paint(color.to_cpu_color());
        self.ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
        self.ctx.stroke_path(&path);
    }

    /// Draw `image` scaled into `dest`, with the image's top-left corner at `(dest.x0, dest.y0)`.
    /// An inverted `dest` (`x1 < x0` or `y1 < y0`) mirrors the image along that axis. Empty
    /// images and zero-area destinations draw nothing.
    pub fn draw_image(&mut self, image: &DecodedImage, dest: Rect, opts: ImageDraw) -> SketchResult<()> {
        let (dw, dh) = (dest.width(), dest.height());
        if image.is_empty()
            || dw == 0.0
            || dh == 0.0
            || !dw.is_finite()
            || !dh.is_finite()
            || opts.opacity <= 0.0
        {
            return Ok(());
        }
        let pixmap = if opts.cache {
            self.pixmap_for(image)?
        } else {
            Arc::new(pixmap_from_premul_bytes(
                &image.rgba8_premul,
                image.width,
                image.height,
            )?)
        };
        let quality = if opts.smooth {
            vello_cpu::peniko::ImageQuality::Medium
        } else {
            vello_cpu::peniko::ImageQuality::Low
        };
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(pixmap),
            sampler: vello_cpu::peniko::ImageSampler {
                quality,
                ..vello_cpu::peniko::ImageSampler::default()
            },
        };

        let sx = dw / f64::from(image.width);
        let sy = dh / f64::from(image.height);
        let tr = self.transform
            * Affine::translate(Vec2::new(dest.x0, dest.y0))
            * Affine::scale_non_uniform(sx, sy);
        self.begin(tr);
        self.ctx.set_paint(paint);
        if opts.opacity < 1.0 {
            self.ctx.push_opacity_layer(opts.opacity);
        }
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(image.width),
            f64::from(image.height),
        ));
        if opts.opacity < 1.0 {
            self.ctx.pop_layer();
        }
        Ok(())
    }

    /// Fill the glyphs of `text` with its top-left corner at `origin`.
    pub fn draw_text(&mut self, text: &TextLayout, origin: Point, color: Rgba8) {
        self.begin(self.transform * Affine::translate(origin.to_vec2()));
        self.ctx.set_paint(color.to_cpu_color());
        for line in text.layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                self.ctx
                    .glyph_run(&text.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    }

    /// Rasterize pending commands into the retained frame.
    pub fn flush(&mut self) {
        if !self.pending {
            return;
        }
        let (w, h) = (self.size.width as u16, self.size.height as u16);
        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        self.committed = Arc::new(pixmap);
        self.ctx.reset();
        self.pending = false;

        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(self.committed.clone()),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        });
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(w),
            f64::from(h),
        ));
    }

    /// Premultiplied pixel at surface coordinates (top-left origin).
    pub fn pixel(&mut self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        self.flush();
        let i = ((y as usize) * (self.size.width as usize) + (x as usize)) * 4;
        let px = self.committed.data_as_u8_slice().get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Current frame as a decoded (premultiplied) image.
    pub fn snapshot(&mut self) -> DecodedImage {
        self.flush();
        DecodedImage {
            width: self.size.width,
            height: self.size.height,
            rgba8_premul: Arc::new(self.committed.data_as_u8_slice().to_vec()),
        }
    }

    /// Current frame as straight RGBA8, ready for PNG encoding.
    pub fn to_rgba8_straight(&mut self) -> Vec<u8> {
        self.flush();
        let mut out = self.committed.data_as_u8_slice().to_vec();
        unpremultiply_rgba8_in_place(&mut out);
        out
    }

    #[cfg(test)]
    pub(crate) fn cached_images(&self) -> usize {
        self.images.len()
    }

    fn pixmap_for(&mut self, image: &DecodedImage) -> SketchResult<Arc<vello_cpu::Pixmap>> {
        let key = Arc::as_ptr(&image.rgba8_premul) as usize;
        if let Some(hit) = self.images.get(&key) {
            return Ok(hit.pixmap.clone());
        }
        let pixmap = Arc::new(pixmap_from_premul_bytes(
            &image.rgba8_premul,
            image.width,
            image.height,
        )?);
        if self.images.len() >= IMAGE_CACHE_CAP {
            self.images.clear();
        }
        self.images.insert(
            key,
            CachedPixmap {
                _source: image.rgba8_premul.clone(),
                pixmap: pixmap.clone(),
            },
        );
        Ok(pixmap)
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn ellipse_path(center: Point, radii: Vec2) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let ellipse = kurbo::Ellipse::new(center, radii, 0.0);
    let mut out = vello_cpu::kurbo::BezPath::new();
    for el in ellipse.path_elements(ELLIPSE_TOLERANCE) {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> SketchResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| SketchError::validation("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| SketchError::validation("image height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(SketchError::validation("image byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
