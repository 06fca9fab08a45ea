//! Archive retrieval: local files, remote URLs, and a local byte-store cache in front of them.

use std::path::{Path, PathBuf};

use anyhow::Context;
use sha2::{Digest, Sha256};

use crate::foundation::error::{SketchError, SketchResult};

/// Where an archive comes from, and whether to serve it from the local cache.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ArchiveSource {
    /// File path or `http(s)://` URL. Also the cache key.
    pub location: String,
    #[serde(default)]
    pub cache: bool,
}

impl ArchiveSource {
    pub fn local(path: impl Into<String>) -> Self {
        Self {
            location: path.into(),
            cache: false,
        }
    }

    pub fn remote(url: impl Into<String>, cache: bool) -> Self {
        Self {
            location: url.into(),
            cache,
        }
    }

    pub fn is_remote(&self) -> bool {
        self.location.starts_with("http://") || self.location.starts_with("https://")
    }

    /// Short name for logs: the last path segment.
    pub fn label(&self) -> &str {
        self.location
            .rsplit(['/', '\\'])
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.location)
    }
}

/// Key-value byte storage used to cache fetched archives.
pub trait ByteStore: Send + Sync {
    fn get(&self, key: &str) -> SketchResult<Option<Vec<u8>>>;
    fn put(&self, key: &str, bytes: &[u8]) -> SketchResult<()>;
}

/// [`ByteStore`] keeping one file per key, named by the SHA-256 of the key.
#[derive(Clone, Debug)]
pub struct DirByteStore {
    root: PathBuf,
}

impl DirByteStore {
    pub fn open(root: impl Into<PathBuf>) -> SketchResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)
            .with_context(|| format!("create cache dir {}", root.display()))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(sha256_hex(key.as_bytes()))
    }
}

impl ByteStore for DirByteStore {
    fn get(&self, key: &str) -> SketchResult<Option<Vec<u8>>> {
        let path = self.path_for(key);
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("read cache entry {}", path.display()))
                .into()),
        }
    }

    fn put(&self, key: &str, bytes: &[u8]) -> SketchResult<()> {
        let path = self.path_for(key);
        let tmp = path.with_extension("part");
        std::fs::write(&tmp, bytes)
            .with_context(|| format!("write cache entry {}", tmp.display()))?;
        std::fs::rename(&tmp, &path)
            .with_context(|| format!("commit cache entry {}", path.display()))?;
        Ok(())
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Fetches archive bytes, consulting the byte store first for sources marked `cache`.
pub struct Fetcher {
    store: Option<Box<dyn ByteStore>>,
}

impl std::fmt::Debug for Fetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fetcher")
            .field("has_store", &self.store.is_some())
            .finish()
    }
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Fetcher {
    pub fn new(store: Option<Box<dyn ByteStore>>) -> Self {
        Self { store }
    }

    /// Open a directory-backed cache. A cache that cannot be opened is reported and the fetcher
    /// works without one.
    pub fn open(cache_dir: Option<&Path>) -> Self {
        let store = cache_dir.and_then(|dir| match DirByteStore::open(dir) {
            Ok(store) => Some(Box::new(store) as Box<dyn ByteStore>),
            Err(e) => {
                tracing::warn!(
                    dir = %dir.display(),
                    "archive cache unavailable: {e}"
                );
                None
            }
        });
        Self::new(store)
    }

    pub fn has_store(&self) -> bool {
        self.store.is_some()
    }

    #[tracing::instrument(skip(self), fields(location = %source.location))]
    pub fn fetch(&self, source: &ArchiveSource) -> SketchResult<Vec<u8>> {
        let store = self.store.as_deref().filter(|_| source.cache);
        if let Some(store) = store {
            match store.get(&source.location) {
                Ok(Some(bytes)) => {
                    tracing::debug!(bytes = bytes.len(), "archive served from cache");
                    return Ok(bytes);
                }
                Ok(None) => {}
                Err(e) => tracing::warn!("cache lookup failed: {e}"),
            }
        }

        let bytes = if source.is_remote() {
            fetch_http(&source.location)?
        } else {
            std::fs::read(&source.location)
                .with_context(|| format!("read archive {}", source.location))?
        };

        if let Some(store) = store
            && let Err(e) = store.put(&source.location, &bytes)
        {
            tracing::warn!("cache store failed: {e}");
        }
        Ok(bytes)
    }
}

#[cfg(feature = "http")]
fn fetch_http(url: &str) -> SketchResult<Vec<u8>> {
    use std::io::Read;

    let response = ureq::get(url)
        .call()
        .map_err(|e| SketchError::archive(format!("download {url}: {e}")))?;
    let mut bytes = Vec::new();
    response
        .into_reader()
        .read_to_end(&mut bytes)
        .map_err(|e| SketchError::archive(format!("download {url}: {e}")))?;
    Ok(bytes)
}

#[cfg(not(feature = "http"))]
fn fetch_http(url: &str) -> SketchResult<Vec<u8>> {
    Err(SketchError::archive(format!(
        "remote archive {url} needs the `http` feature"
    )))
}

#[cfg(test)]
#[path = "../../tests/unit/fetch/mod.rs"]
mod tests;
