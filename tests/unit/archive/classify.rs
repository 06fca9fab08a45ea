use super::*;

fn project(project: &str, entry: ProjectEntry) -> EntryClass {
    EntryClass::Project {
        project: project.to_string(),
        entry,
    }
}

#[test]
fn root_and_nested_project_folders() {
    assert_eq!(
        classify_entry("Game.codea/Main.lua"),
        project(
            "Game",
            ProjectEntry::Script {
                module: "Main".to_string()
            }
        )
    );
    assert_eq!(
        classify_entry("Projects/Lost Controls.codea/Info.plist"),
        project("Lost Controls", ProjectEntry::Info)
    );
}

#[test]
fn image_names_are_normalized_but_modules_are_not() {
    assert_eq!(
        classify_entry("Game.codea/My File's.png"),
        project(
            "Game",
            ProjectEntry::Image {
                name: "My_File_s".to_string()
            }
        )
    );
    assert_eq!(
        classify_entry("Game.codea/Enemy AI.lua"),
        project(
            "Game",
            ProjectEntry::Script {
                module: "Enemy AI".to_string()
            }
        )
    );
}

#[test]
fn unknown_project_files_still_name_the_project() {
    assert_eq!(
        classify_entry("Game.codea/notes.txt"),
        project("Game", ProjectEntry::Other)
    );
    assert_eq!(classify_entry("Game.codea/"), project("Game", ProjectEntry::Other));
}

#[test]
fn pack_audio_kinds_by_extension() {
    assert_eq!(
        classify_entry("Game Sounds One.assets/Jump 1.wav"),
        EntryClass::Pack {
            pack: "Game_Sounds_One".to_string(),
            entry: PackEntry::Audio {
                kind: AudioKind::Sound,
                name: "Jump_1".to_string()
            }
        }
    );
    assert_eq!(
        classify_entry("Tunes.assets/Theme.m4a"),
        EntryClass::Pack {
            pack: "Tunes".to_string(),
            entry: PackEntry::Audio {
                kind: AudioKind::Music,
                name: "Theme".to_string()
            }
        }
    );
    assert_eq!(
        classify_entry("Tunes.assets/Blip.caf"),
        EntryClass::Pack {
            pack: "Tunes".to_string(),
            entry: PackEntry::Audio {
                kind: AudioKind::Sound,
                name: "Blip".to_string()
            }
        }
    );
    assert_eq!(
        classify_entry("Tunes.assets/cover.png"),
        EntryClass::Pack {
            pack: "Tunes".to_string(),
            entry: PackEntry::Other
        }
    );
}

#[test]
fn system_and_unmatched_entries_are_ignored() {
    assert_eq!(
        classify_entry("__MACOSX/Game.codea/._Main.lua"),
        EntryClass::Ignored
    );
    assert_eq!(classify_entry("readme.md"), EntryClass::Ignored);
    assert_eq!(classify_entry("v1.2/Tunes.assets/a.wav"), EntryClass::Ignored);
}
