use std::io::Cursor;

use super::*;

fn png_bytes(width: u32, height: u32, rgba: Vec<u8>) -> Vec<u8> {
    let img = image::RgbaImage::from_raw(width, height, rgba).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let buf = png_bytes(1, 1, vec![100u8, 50u8, 200u8, 128u8]);
    let decoded = decode_image(&buf).unwrap();
    assert_eq!(decoded.width, 1);
    assert_eq!(decoded.height, 1);
    assert_eq!(
        decoded.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn dimensions_are_zero_until_materialized() {
    let asset = ImageAsset::from_bytes(png_bytes(2, 3, vec![255; 2 * 3 * 4]));
    assert_eq!((asset.width(), asset.height()), (0, 0));
    assert!(!asset.is_materialized());

    let decoded = asset.materialize();
    assert_eq!((decoded.width, decoded.height), (2, 3));
    assert_eq!((asset.width(), asset.height()), (2, 3));
}

#[test]
fn failed_decode_memoizes_empty_placeholder() {
    let asset = ImageAsset::from_bytes(b"not a png".to_vec());
    assert!(asset.materialize().is_empty());
    assert!(asset.is_materialized());
    assert_eq!((asset.width(), asset.height()), (0, 0));
}

#[test]
fn copy_region_uses_bottom_left_one_based_addressing() {
    // 2x2 image, top row red/green, bottom row blue/white.
    let rgba = vec![
        255, 0, 0, 255, 0, 255, 0, 255, //
        0, 0, 255, 255, 255, 255, 255, 255,
    ];
    let img = DecodedImage::from_premul(2, 2, rgba).unwrap();

    let bottom_left = img.copy_region(1, 1, 1, 1);
    assert_eq!(bottom_left.pixel(0, 0), Some([0, 0, 255, 255]));

    let top_right = img.copy_region(2, 2, 1, 1);
    assert_eq!(top_right.pixel(0, 0), Some([0, 255, 0, 255]));

    let outside = img.copy_region(5, 5, 1, 1);
    assert_eq!(outside.pixel(0, 0), Some([0, 0, 0, 0]));
}

#[test]
fn unpremultiply_inverts_premultiply_for_opaque_and_clear() {
    let mut px = vec![10, 20, 30, 255, 9, 9, 9, 0];
    premultiply_rgba8_in_place(&mut px);
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![10, 20, 30, 255, 0, 0, 0, 0]);
}
