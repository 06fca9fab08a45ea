use std::fmt;

use crate::{
    archive::classify::AudioKind,
    catalog::{
        graph::AssetCatalog,
        image::ImageAsset,
        model::{AudioClip, Project},
    },
    foundation::naming::normalize_asset_name,
};

const LOCAL_PREFIX: &str = "asset.";
const DOWNLOADED_PREFIX: &str = "asset.downloaded.";

/// Symbolic reference to a loaded image or audio clip.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetRef {
    /// `asset.<name>`: an image of the active project.
    Local(String),
    /// `<pack>:<name>`: a clip in a named asset pack.
    PackAsset { pack: String, name: String },
    /// `asset.downloaded.<pack>.<name>`: a clip in a downloaded asset pack.
    DownloadedPackAsset { pack: String, name: String },
}

impl AssetRef {
    /// Parse a script-side identifier. Returns `None` for malformed pack references.
    pub fn parse(key: &str) -> Option<Self> {
        if let Some(rest) = key.strip_prefix(DOWNLOADED_PREFIX) {
            let mut parts = rest.split('.');
            return match (parts.next(), parts.next(), parts.next()) {
                (Some(pack), Some(name), None) => Some(Self::DownloadedPackAsset {
                    pack: pack.to_string(),
                    name: name.to_string(),
                }),
                _ => None,
            };
        }
        if key.contains(':') {
            let mut parts = key.split(':');
            return match (parts.next(), parts.next(), parts.next()) {
                (Some(pack), Some(name), None) => Some(Self::PackAsset {
                    pack: pack.to_string(),
                    name: name.to_string(),
                }),
                _ => None,
            };
        }
        let local = key.strip_prefix(LOCAL_PREFIX).unwrap_or(key);
        Some(Self::Local(local.to_string()))
    }

    pub fn local(name: impl Into<String>) -> Self {
        Self::Local(name.into())
    }

    pub fn pack(pack: impl Into<String>, name: impl Into<String>) -> Self {
        Self::PackAsset {
            pack: pack.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(name) => write!(f, "{LOCAL_PREFIX}{name}"),
            Self::PackAsset { pack, name } => write!(f, "{pack}:{name}"),
            Self::DownloadedPackAsset { pack, name } => write!(f, "{DOWNLOADED_PREFIX}{pack}.{name}"),
        }
    }
}

/// Read-only view resolving [`AssetRef`]s against the catalog and the active project.
///
/// Names are normalized before every lookup. Unresolvable references yield `None`.
#[derive(Clone, Copy)]
pub struct AssetResolver<'a> {
    catalog: &'a AssetCatalog,
    project: Option<&'a Project>,
}

impl<'a> AssetResolver<'a> {
    pub fn new(catalog: &'a AssetCatalog, active_project: Option<&str>) -> Self {
        Self {
            catalog,
            project: active_project.and_then(|name| catalog.project(name)),
        }
    }

    pub fn active_project(&self) -> Option<&'a Project> {
        self.project
    }

    /// Image for a local reference. Pack references never name images.
    pub fn image(&self, asset: &AssetRef) -> Option<&'a ImageAsset> {
        match asset {
            AssetRef::Local(name) => self.project?.image(name),
            AssetRef::PackAsset { .. } | AssetRef::DownloadedPackAsset { .. } => None,
        }
    }

    /// Audio clip of `kind` for a pack reference. Local references never name audio.
    pub fn audio(&self, kind: AudioKind, asset: &AssetRef) -> Option<&'a AudioClip> {
        let (pack, name) = match asset {
            AssetRef::PackAsset { pack, name } | AssetRef::DownloadedPackAsset { pack, name } => {
                (pack, name)
            }
            AssetRef::Local(_) => return None,
        };
        self.catalog
            .pack(&normalize_asset_name(pack))?
            .clips(kind)
            .get(&normalize_asset_name(name))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/resolve.rs"]
mod tests;
