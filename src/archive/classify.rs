use std::sync::LazyLock;

use regex::Regex;

use crate::foundation::naming::{file_stem, normalize_asset_name};

static NESTED_PROJECT_DIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/([^/]+)\.codea/").expect("static regex"));
static ROOT_PROJECT_DIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^.]+)\.codea/").expect("static regex"));
static ROOT_PACK_DIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^.]+)\.assets/").expect("static regex"));

/// Directory written by macOS archivers; never holds project content.
const SYSTEM_DIR_MARKER: &str = "__MACOSX";

/// What a project-folder entry contributes to its project.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProjectEntry {
    /// PNG image keyed by its normalized file stem.
    Image { name: String },
    /// Lua module keyed by its raw file stem.
    Script { module: String },
    /// `Info.plist` metadata descriptor.
    Info,
    /// Any other file inside the project folder. The project record still gets created.
    Other,
}

/// Audio channel an asset-pack entry belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioKind {
    Music,
    Sound,
}

/// What a pack-folder entry contributes to its pack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PackEntry {
    Audio { kind: AudioKind, name: String },
    Other,
}

/// Routing decision for one archive entry path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntryClass {
    Project { project: String, entry: ProjectEntry },
    Pack { pack: String, entry: PackEntry },
    Ignored,
}

/// Classify an archive entry path by folder convention and extension.
///
/// Project folders (`<name>.codea/`) are matched first, nested anywhere or at the root;
/// pack folders (`<name>.assets/`) only at the root. Everything else is ignored.
pub fn classify_entry(path: &str) -> EntryClass {
    if path.contains(SYSTEM_DIR_MARKER) {
        return EntryClass::Ignored;
    }

    if let Some(project) = project_name(path) {
        let entry = if path.ends_with(".png") {
            ProjectEntry::Image {
                name: normalize_asset_name(file_stem(path)),
            }
        } else if path.ends_with(".lua") {
            ProjectEntry::Script {
                module: file_stem(path).to_string(),
            }
        } else if path.ends_with("Info.plist") {
            ProjectEntry::Info
        } else {
            ProjectEntry::Other
        };
        return EntryClass::Project { project, entry };
    }

    if let Some(caps) = ROOT_PACK_DIR.captures(path) {
        let pack = normalize_asset_name(&caps[1]);
        let kind = if path.ends_with(".m4a") {
            Some(AudioKind::Music)
        } else if path.ends_with(".caf") || path.ends_with(".wav") {
            Some(AudioKind::Sound)
        } else {
            None
        };
        let entry = match kind {
            Some(kind) => PackEntry::Audio {
                kind,
                name: normalize_asset_name(file_stem(path)),
            },
            None => PackEntry::Other,
        };
        return EntryClass::Pack { pack, entry };
    }

    EntryClass::Ignored
}

fn project_name(path: &str) -> Option<String> {
    NESTED_PROJECT_DIR
        .captures(path)
        .or_else(|| ROOT_PROJECT_DIR.captures(path))
        .map(|caps| caps[1].to_string())
}

#[cfg(test)]
#[path = "../../tests/unit/archive/classify.rs"]
mod tests;
