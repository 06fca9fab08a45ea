use std::{collections::BTreeMap, sync::Arc};

use crate::{archive::classify::AudioKind, catalog::image::ImageAsset};

/// Opaque handle to encoded audio bytes from an asset pack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AudioClip {
    bytes: Arc<Vec<u8>>,
}

impl AudioClip {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Arc::new(bytes),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Named bundle of script modules, images, and load metadata.
#[derive(Clone, Debug, Default)]
pub struct Project {
    /// Project name taken from the `<name>.codea/` folder.
    pub name: String,
    /// Images keyed by normalized file stem.
    pub images: BTreeMap<String, ImageAsset>,
    /// Module sources keyed by file stem.
    pub code: BTreeMap<String, String>,
    /// Dependency project names in declaration order, duplicates kept.
    pub dependencies: Vec<String>,
    /// Module names in load order.
    pub load_order: Vec<String>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Image by name, normalizing the lookup key the same way ingestion does.
    pub fn image(&self, name: &str) -> Option<&ImageAsset> {
        self.images
            .get(&crate::foundation::naming::normalize_asset_name(name))
    }
}

/// Named bundle of audio resources independent of any project.
#[derive(Clone, Debug, Default)]
pub struct AssetPack {
    /// Normalized pack name.
    pub name: String,
    /// Music clips keyed by normalized name.
    pub musics: BTreeMap<String, AudioClip>,
    /// Sound-effect clips keyed by normalized name.
    pub sounds: BTreeMap<String, AudioClip>,
}

impl AssetPack {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn clips(&self, kind: AudioKind) -> &BTreeMap<String, AudioClip> {
        match kind {
            AudioKind::Music => &self.musics,
            AudioKind::Sound => &self.sounds,
        }
    }

    pub fn clips_mut(&mut self, kind: AudioKind) -> &mut BTreeMap<String, AudioClip> {
        match kind {
            AudioKind::Music => &mut self.musics,
            AudioKind::Sound => &mut self.sounds,
        }
    }
}
