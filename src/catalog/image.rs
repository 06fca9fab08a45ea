use std::sync::{Arc, OnceLock};

use anyhow::Context;

use crate::foundation::error::{SketchError, SketchResult};

/// Decoded raster image in premultiplied RGBA8 form.
#[derive(Clone)]
pub struct DecodedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl std::fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes_len", &self.rgba8_premul.len())
            .finish()
    }
}

impl DecodedImage {
    /// Zero-sized placeholder used when decoding fails.
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            rgba8_premul: Arc::new(Vec::new()),
        }
    }

    /// Build from premultiplied RGBA8 bytes, checking the buffer length.
    pub fn from_premul(width: u32, height: u32, rgba8_premul: Vec<u8>) -> SketchResult<Self> {
        let expected = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4);
        if rgba8_premul.len() != expected {
            return Err(SketchError::validation("image byte len mismatch"));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Premultiplied pixel at `(x, y)` with a top-left origin.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.rgba8_premul.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Copy a `w`×`h` region addressed the way scripts address image pixels: `(x, y)` is the
    /// bottom-left corner of the region, counted from 1 with the origin at the bottom-left of
    /// the image. Pixels outside the source are transparent.
    pub fn copy_region(&self, x: i64, y: i64, w: u32, h: u32) -> DecodedImage {
        let src_left = x - 1;
        let src_top = i64::from(self.height) - y - i64::from(h) + 1;

        let mut out = vec![0u8; (w as usize) * (h as usize) * 4];
        for row in 0..h {
            let sy = src_top + i64::from(row);
            if sy < 0 || sy >= i64::from(self.height) {
                continue;
            }
            for col in 0..w {
                let sx = src_left + i64::from(col);
                if sx < 0 || sx >= i64::from(self.width) {
                    continue;
                }
                let Some(px) = self.pixel(sx as u32, sy as u32) else {
                    continue;
                };
                let di = ((row as usize) * (w as usize) + (col as usize)) * 4;
                out[di..di + 4].copy_from_slice(&px);
            }
        }

        DecodedImage {
            width: w,
            height: h,
            rgba8_premul: Arc::new(out),
        }
    }
}

/// Decode encoded image bytes and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> SketchResult<DecodedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(DecodedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        px[0] = ((px[0] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[1] = ((px[1] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[2] = ((px[2] as u16 * 255 + a / 2) / a).min(255) as u8;
    }
}

/// Project image: raw encoded bytes ingested from the archive, decoded on first use.
///
/// Width and height read 0 until [`ImageAsset::materialize`] has run. A failed decode is
/// memoized as a 0×0 image so later draws skip it instead of retrying.
#[derive(Clone, Debug)]
pub struct ImageAsset {
    bytes: Arc<Vec<u8>>,
    decoded: OnceLock<DecodedImage>,
}

impl ImageAsset {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Arc::new(bytes),
            decoded: OnceLock::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.decoded.get().map_or(0, |d| d.width)
    }

    pub fn height(&self) -> u32 {
        self.decoded.get().map_or(0, |d| d.height)
    }

    pub fn is_materialized(&self) -> bool {
        self.decoded.get().is_some()
    }

    /// Decoded pixels, if already materialized.
    pub fn decoded(&self) -> Option<&DecodedImage> {
        self.decoded.get()
    }

    /// Decode once and memoize. Safe to call concurrently.
    pub fn materialize(&self) -> &DecodedImage {
        self.decoded
            .get_or_init(|| match decode_image(&self.bytes) {
                Ok(img) => img,
                Err(e) => {
                    tracing::warn!(error = %e, bytes = self.bytes.len(), "image decode failed");
                    DecodedImage::empty()
                }
            })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/image.rs"]
mod tests;
