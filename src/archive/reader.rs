use std::io::{Cursor, Read};

use rayon::prelude::*;

use crate::{
    archive::{
        classify::{AudioKind, EntryClass, PackEntry, ProjectEntry, classify_entry},
        info::{ProjectInfo, parse_project_info},
    },
    catalog::{image::ImageAsset, model::AudioClip},
    foundation::error::{SketchError, SketchResult},
};

/// Typed contribution of one project-folder entry.
#[derive(Clone, Debug)]
pub enum ProjectItem {
    Image { name: String, asset: ImageAsset },
    Script { module: String, source: String },
    Info(ProjectInfo),
}

/// Typed contribution of one pack-folder entry.
#[derive(Clone, Debug)]
pub enum PackItem {
    Audio {
        kind: AudioKind,
        name: String,
        clip: AudioClip,
    },
}

/// One routed archive entry. `item` is `None` when the entry only names its project or pack
/// (directories, unrecognized files, metadata that failed to parse).
#[derive(Clone, Debug)]
pub enum IngestedEntry {
    Project {
        project: String,
        item: Option<ProjectItem>,
    },
    Pack {
        pack: String,
        item: Option<PackItem>,
    },
}

/// Everything ingested from a single archive, in archive directory order.
#[derive(Clone, Debug, Default)]
pub struct ArchiveContents {
    pub entries: Vec<IngestedEntry>,
    /// Entries matching neither folder convention.
    pub ignored: usize,
    /// Entries whose bytes or metadata could not be read.
    pub failed: usize,
}

struct RawEntry {
    path: String,
    class: EntryClass,
    bytes: Vec<u8>,
}

/// Read a zip archive and ingest every project and pack entry.
///
/// Entry payloads are processed concurrently; results keep archive order so merging stays
/// deterministic. Images and audio are registered even when their bytes are empty or could not
/// be read; they degrade when used. Only an archive whose directory cannot be read fails as a
/// whole.
#[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
pub fn read_archive(bytes: &[u8]) -> SketchResult<ArchiveContents> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| SketchError::archive(format!("cannot open zip archive: {e}")))?;

    let mut contents = ArchiveContents::default();
    let mut raw = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let mut file = match archive.by_index(index) {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!(index, error = %e, "skipping unreadable archive entry");
                contents.failed += 1;
                continue;
            }
        };
        let path = file.name().to_string();
        let class = classify_entry(&path);
        if class == EntryClass::Ignored {
            contents.ignored += 1;
            continue;
        }

        let mut bytes = Vec::new();
        if !file.is_dir()
            && wants_bytes(&class)
            && let Err(e) = file.read_to_end(&mut bytes)
        {
            tracing::warn!(%path, error = %e, "archive entry has corrupt data");
            contents.failed += 1;
            bytes.clear();
        }
        raw.push(RawEntry { path, class, bytes });
    }

    let ingested: Vec<(IngestedEntry, bool)> =
        raw.into_par_iter().filter_map(ingest_entry).collect();
    for (entry, ok) in ingested {
        if !ok {
            contents.failed += 1;
        }
        contents.entries.push(entry);
    }

    tracing::debug!(
        entries = contents.entries.len(),
        ignored = contents.ignored,
        failed = contents.failed,
        "archive ingested"
    );
    Ok(contents)
}

fn wants_bytes(class: &EntryClass) -> bool {
    match class {
        EntryClass::Project { entry, .. } => !matches!(entry, ProjectEntry::Other),
        EntryClass::Pack { entry, .. } => !matches!(entry, PackEntry::Other),
        EntryClass::Ignored => false,
    }
}

fn ingest_entry(raw: RawEntry) -> Option<(IngestedEntry, bool)> {
    let RawEntry { path, class, bytes } = raw;
    match class {
        EntryClass::Project { project, entry } => {
            let (item, ok) = match entry {
                ProjectEntry::Image { name } => (
                    Some(ProjectItem::Image {
                        name,
                        asset: ImageAsset::from_bytes(bytes),
                    }),
                    true,
                ),
                ProjectEntry::Script { module } => (
                    Some(ProjectItem::Script {
                        module,
                        source: String::from_utf8_lossy(&bytes).into_owned(),
                    }),
                    true,
                ),
                ProjectEntry::Info => match parse_project_info(&bytes) {
                    Ok(info) => (Some(ProjectItem::Info(info)), true),
                    Err(e) => {
                        tracing::warn!(%path, error = %e, "ignoring unreadable project metadata");
                        (None, false)
                    }
                },
                ProjectEntry::Other => (None, true),
            };
            Some((IngestedEntry::Project { project, item }, ok))
        }
        EntryClass::Pack { pack, entry } => {
            let item = match entry {
                PackEntry::Audio { kind, name } => Some(PackItem::Audio {
                    kind,
                    name,
                    clip: AudioClip::from_bytes(bytes),
                }),
                PackEntry::Other => None,
            };
            Some((IngestedEntry::Pack { pack, item }, true))
        }
        EntryClass::Ignored => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/archive/reader.rs"]
mod tests;
