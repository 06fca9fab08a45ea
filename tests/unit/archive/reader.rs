use super::*;
use crate::testing::{info_plist, png_bytes, zip_bytes};

fn project_items(contents: &ArchiveContents, name: &str) -> Vec<ProjectItem> {
    contents
        .entries
        .iter()
        .filter_map(|e| match e {
            IngestedEntry::Project { project, item } if project == name => item.clone(),
            _ => None,
        })
        .collect()
}

#[test]
fn routes_project_and_pack_entries() {
    let png = png_bytes(2, 2, [255, 0, 0, 255]);
    let info = info_plist(&["Main", "Util"], &["Common"]);
    let bytes = zip_bytes(&[
        ("Game.codea/", b""),
        ("Game.codea/Main.lua", b"function setup() end"),
        ("Game.codea/Util.lua", b"x = 1"),
        ("Game.codea/Hero Sprite.png", &png),
        ("Game.codea/Info.plist", &info),
        ("Sounds.assets/Jump.wav", b"RIFF"),
        ("Sounds.assets/Theme.m4a", b"m4a"),
        ("__MACOSX/Game.codea/._Main.lua", b"junk"),
        ("README.txt", b"hello"),
    ]);

    let contents = read_archive(&bytes).unwrap();
    assert_eq!(contents.ignored, 2);
    assert_eq!(contents.failed, 0);

    let items = project_items(&contents, "Game");
    assert_eq!(items.len(), 4);
    assert!(items.iter().any(|i| matches!(
        i,
        ProjectItem::Script { module, source } if module == "Main" && source == "function setup() end"
    )));
    assert!(items.iter().any(|i| matches!(
        i,
        ProjectItem::Image { name, .. } if name == "Hero_Sprite"
    )));
    assert!(items.iter().any(|i| matches!(
        i,
        ProjectItem::Info(info) if info.dependencies == vec!["Common".to_string()]
    )));

    let audio: Vec<_> = contents
        .entries
        .iter()
        .filter_map(|e| match e {
            IngestedEntry::Pack {
                pack,
                item: Some(PackItem::Audio { kind, name, .. }),
            } => Some((pack.clone(), *kind, name.clone())),
            _ => None,
        })
        .collect();
    assert!(audio.contains(&("Sounds".to_string(), AudioKind::Sound, "Jump".to_string())));
    assert!(audio.contains(&("Sounds".to_string(), AudioKind::Music, "Theme".to_string())));
}

#[test]
fn entries_keep_archive_order() {
    let bytes = zip_bytes(&[
        ("P.codea/A.lua", b"a"),
        ("P.codea/B.lua", b"b"),
        ("P.codea/C.lua", b"c"),
    ]);
    let contents = read_archive(&bytes).unwrap();
    let modules: Vec<_> = project_items(&contents, "P")
        .into_iter()
        .filter_map(|i| match i {
            ProjectItem::Script { module, .. } => Some(module),
            _ => None,
        })
        .collect();
    assert_eq!(modules, vec!["A", "B", "C"]);
}

#[test]
fn bad_metadata_degrades_without_aborting_other_entries() {
    let bytes = zip_bytes(&[
        ("P.codea/Info.plist", b"<<<garbage"),
        ("P.codea/Main.lua", b"print(1)"),
        ("P.codea/Broken.png", b"not a png"),
    ]);
    let contents = read_archive(&bytes).unwrap();
    assert_eq!(contents.failed, 1);
    let items = project_items(&contents, "P");
    // The broken image is still ingested; decoding happens later.
    assert_eq!(items.len(), 2);
}

#[test]
fn corrupt_archive_is_an_archive_error() {
    let err = read_archive(b"definitely not a zip").unwrap_err();
    assert!(matches!(err, SketchError::Archive(_)));
}

#[test]
fn empty_images_and_clips_are_still_registered() {
    let bytes = zip_bytes(&[
        ("P.codea/Empty.png", b""),
        ("P.codea/Main.lua", b"-- main"),
        ("Fx.assets/Silence.wav", b""),
        ("Fx.assets/Quiet.m4a", b""),
    ]);
    let mut catalog = crate::catalog::graph::AssetCatalog::new();
    let contents = read_archive(&bytes).unwrap();
    catalog.merge(contents);

    let project = catalog.project("P").unwrap();
    let image = project.image("Empty").unwrap();
    assert_eq!(image.materialize().width, 0);
    assert_eq!(image.width(), 0);
    assert_eq!(image.height(), 0);

    let pack = catalog.pack("Fx").unwrap();
    assert!(pack.sounds.contains_key("Silence"));
    assert!(pack.musics.contains_key("Quiet"));
}
