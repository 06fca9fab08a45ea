use std::{collections::BTreeMap, path::Path};

use anyhow::Context;

use crate::{
    archive::reader::{ArchiveContents, IngestedEntry, PackItem, ProjectItem, read_archive},
    catalog::model::{AssetPack, Project},
    foundation::error::{SketchError, SketchResult},
};

/// Counts reported after merging one archive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct MergeSummary {
    pub projects: usize,
    pub packs: usize,
    pub images: usize,
    pub modules: usize,
    pub audio: usize,
    pub ignored: usize,
    pub failed: usize,
}

/// Session-wide registry of every loaded project and asset pack.
///
/// Repeated loads merge into existing records: images, modules, and audio clips overwrite
/// same-named keys, while dependency and load-order lists append, so loading the same
/// metadata twice duplicates their entries.
#[derive(Clone, Debug, Default)]
pub struct AssetCatalog {
    projects: BTreeMap<String, Project>,
    packs: BTreeMap<String, AssetPack>,
}

impl AssetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn project(&self, name: &str) -> Option<&Project> {
        self.projects.get(name)
    }

    /// Project by name, or a resolution error naming what was requested.
    pub fn require_project(&self, name: &str) -> SketchResult<&Project> {
        self.projects
            .get(name)
            .ok_or_else(|| SketchError::resolution(format!("unknown project '{name}'")))
    }

    pub fn projects(&self) -> impl Iterator<Item = &Project> {
        self.projects.values()
    }

    pub fn pack(&self, name: &str) -> Option<&AssetPack> {
        self.packs.get(name)
    }

    pub fn packs(&self) -> impl Iterator<Item = &AssetPack> {
        self.packs.values()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty() && self.packs.is_empty()
    }

    /// Parse archive bytes and merge them. A corrupt archive leaves the catalog untouched.
    #[tracing::instrument(skip(self, bytes), fields(len = bytes.len()))]
    pub fn load_archive_bytes(&mut self, label: &str, bytes: &[u8]) -> SketchResult<MergeSummary> {
        tracing::info!("loading {label}...");
        let contents = read_archive(bytes).map_err(|e| {
            tracing::error!(error = %e, "error reading archive {label}");
            e
        })?;
        Ok(self.merge(contents))
    }

    /// Read an archive from disk and merge it.
    pub fn load_archive_path(&mut self, path: &Path) -> SketchResult<MergeSummary> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read archive '{}'", path.display()))?;
        self.load_archive_bytes(&path.display().to_string(), &bytes)
    }

    /// Merge ingested archive contents in archive order.
    pub fn merge(&mut self, contents: ArchiveContents) -> MergeSummary {
        let mut summary = MergeSummary {
            ignored: contents.ignored,
            failed: contents.failed,
            ..MergeSummary::default()
        };
        let mut touched_projects = Vec::<String>::new();
        let mut touched_packs = Vec::<String>::new();

        for entry in contents.entries {
            match entry {
                IngestedEntry::Project { project, item } => {
                    if !touched_projects.contains(&project) {
                        touched_projects.push(project.clone());
                    }
                    let record = self
                        .projects
                        .entry(project.clone())
                        .or_insert_with(|| Project::new(project));
                    match item {
                        Some(ProjectItem::Image { name, asset }) => {
                            record.images.insert(name, asset);
                            summary.images += 1;
                        }
                        Some(ProjectItem::Script { module, source }) => {
                            record.code.insert(module, source);
                            summary.modules += 1;
                        }
                        Some(ProjectItem::Info(info)) => {
                            record.dependencies.extend(info.dependencies);
                            record.load_order.extend(info.buffer_order);
                        }
                        None => {}
                    }
                }
                IngestedEntry::Pack { pack, item } => {
                    if !touched_packs.contains(&pack) {
                        touched_packs.push(pack.clone());
                    }
                    let record = self
                        .packs
                        .entry(pack.clone())
                        .or_insert_with(|| AssetPack::new(pack));
                    if let Some(PackItem::Audio { kind, name, clip }) = item {
                        record.clips_mut(kind).insert(name, clip);
                        summary.audio += 1;
                    }
                }
            }
        }

        summary.projects = touched_projects.len();
        summary.packs = touched_packs.len();
        tracing::debug!(?summary, "archive merged");
        summary
    }
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/graph.rs"]
mod tests;
