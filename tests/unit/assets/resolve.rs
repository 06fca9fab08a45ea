use super::*;
use crate::testing::{png_bytes, zip_bytes};

fn catalog() -> AssetCatalog {
    let png = png_bytes(1, 1, [1, 2, 3, 255]);
    let bytes = zip_bytes(&[
        ("Game.codea/My File's.png", &png),
        ("A Hero's Quest.assets/Boss Theme.m4a", b"music"),
        ("Game Sounds One.assets/Pick Up.wav", b"sound"),
    ]);
    let mut catalog = AssetCatalog::new();
    catalog.load_archive_bytes("test", &bytes).unwrap();
    catalog
}

#[test]
fn parses_each_reference_shape() {
    assert_eq!(AssetRef::parse("asset.Hero"), Some(AssetRef::local("Hero")));
    assert_eq!(AssetRef::parse("Hero"), Some(AssetRef::local("Hero")));
    assert_eq!(
        AssetRef::parse("A Hero's Quest:Boss Theme"),
        Some(AssetRef::pack("A Hero's Quest", "Boss Theme"))
    );
    assert_eq!(
        AssetRef::parse("asset.downloaded.Game_Sounds_One.Pick_Up"),
        Some(AssetRef::DownloadedPackAsset {
            pack: "Game_Sounds_One".to_string(),
            name: "Pick_Up".to_string()
        })
    );
    assert_eq!(AssetRef::parse("a:b:c"), None);
    assert_eq!(AssetRef::parse("asset.downloaded.only"), None);
}

#[test]
fn display_round_trips_through_parse() {
    for r in [
        AssetRef::local("Hero"),
        AssetRef::pack("Pack", "Clip"),
        AssetRef::DownloadedPackAsset {
            pack: "Pack".to_string(),
            name: "Clip".to_string(),
        },
    ] {
        assert_eq!(AssetRef::parse(&r.to_string()), Some(r));
    }
}

#[test]
fn normalization_applies_on_lookup() {
    let catalog = catalog();
    let resolver = AssetResolver::new(&catalog, Some("Game"));

    let a = resolver.image(&AssetRef::local("My File's")).unwrap();
    let b = resolver.image(&AssetRef::local("My_File_s")).unwrap();
    assert!(std::ptr::eq(a, b));

    assert!(
        resolver
            .audio(AudioKind::Music, &AssetRef::pack("A Hero's Quest", "Boss Theme"))
            .is_some()
    );
    assert!(
        resolver
            .audio(
                AudioKind::Sound,
                &AssetRef::parse("asset.downloaded.Game_Sounds_One.Pick_Up").unwrap()
            )
            .is_some()
    );
}

#[test]
fn unresolvable_references_are_none() {
    let catalog = catalog();
    let resolver = AssetResolver::new(&catalog, Some("Game"));
    assert!(resolver.image(&AssetRef::local("missing")).is_none());
    assert!(
        resolver
            .audio(AudioKind::Sound, &AssetRef::pack("Nope", "Nothing"))
            .is_none()
    );
    // Music clips are not visible on the sound channel.
    assert!(
        resolver
            .audio(AudioKind::Sound, &AssetRef::pack("A Hero's Quest", "Boss Theme"))
            .is_none()
    );

    let no_project = AssetResolver::new(&catalog, None);
    assert!(no_project.image(&AssetRef::local("My_File_s")).is_none());
}
