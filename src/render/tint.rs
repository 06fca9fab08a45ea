use crate::catalog::image::DecodedImage;
use crate::foundation::core::Rgba8;

/// Multiply the color channels of a premultiplied image by `tint`, keeping each pixel's own
/// alpha.
///
/// Because channels stay premultiplied against an unchanged alpha, transparent pixels stay
/// transparent and coverage is preserved. The tint's own alpha is not applied here; callers
/// composite the result with `tint.a` as a global opacity.
pub fn tint_image(src: &DecodedImage, tint: Rgba8) -> DecodedImage {
    let mul = |c: u8, t: u8| -> u8 { ((u16::from(c) * u16::from(t) + 127) / 255) as u8 };
    let mut out = src.rgba8_premul.as_ref().clone();
    for px in out.chunks_exact_mut(4) {
        px[0] = mul(px[0], tint.r);
        px[1] = mul(px[1], tint.g);
        px[2] = mul(px[2], tint.b);
    }
    DecodedImage {
        width: src.width,
        height: src.height,
        rgba8_premul: std::sync::Arc::new(out),
    }
}

/// Global opacity for a tinted draw.
pub fn tint_opacity(tint: Rgba8) -> f32 {
    f32::from(tint.a) / 255.0
}

#[cfg(test)]
#[path = "../../tests/unit/render/tint.rs"]
mod tests;
