//! In-memory archive and image builders for integration tests.
#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::PathBuf;

pub fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "sketchrun_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let opts =
        zip::write::FileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    for (name, bytes) in entries {
        zip.start_file(*name, opts).unwrap();
        zip.write_all(bytes).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

pub fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let pixels = rgba.repeat((width * height) as usize);
    let img = image::RgbaImage::from_raw(width, height, pixels).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

pub fn info_plist(buffer_order: &[&str], dependencies: &[&str]) -> Vec<u8> {
    let array = |items: &[&str]| {
        items
            .iter()
            .map(|s| format!("<string>{s}</string>"))
            .collect::<String>()
    };
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<plist version="1.0"><dict>
<key>Buffer Order</key><array>{}</array>
<key>Dependencies</key><array>{}</array>
</dict></plist>"#,
        array(buffer_order),
        array(dependencies)
    )
    .into_bytes()
}

/// A library project, a game depending on it, and an asset pack, split over two archives.
pub fn write_game_archives(dir: &std::path::Path) -> (PathBuf, PathBuf) {
    let lib_info = info_plist(&["Main", "Vec"], &[]);
    let game_info = info_plist(&["Main", "Player"], &["someone:Lib"]);
    let hero = png_bytes(4, 4, [0, 255, 0, 255]);

    let lib = zip_bytes(&[
        ("Lib.codea/Info.plist", &lib_info),
        ("Lib.codea/Main.lua", b"-- lib main"),
        ("Lib.codea/Vec.lua", b"Vec = {}"),
    ]);
    let game = zip_bytes(&[
        ("Game.codea/Info.plist", &game_info),
        ("Game.codea/Main.lua", b"function draw() end"),
        ("Game.codea/Player.lua", b"Player = {}"),
        ("Game.codea/Hero.png", &hero),
        ("Tunes.assets/Theme.m4a", b"m4a"),
        ("Tunes.assets/Jump.wav", b"wav"),
        ("__MACOSX/Game.codea/._Main.lua", b"junk"),
    ]);

    let lib_path = dir.join("lib.zip");
    let game_path = dir.join("game.zip");
    std::fs::write(&lib_path, lib).unwrap();
    std::fs::write(&game_path, game).unwrap();
    (lib_path, game_path)
}

pub fn exe() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_sketchrun"))
}
