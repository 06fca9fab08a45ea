use super::*;
use crate::testing::temp_dir;

#[test]
fn source_labels_and_kinds() {
    let remote = ArchiveSource::remote("https://host/packs/Tunes.assets.zip", true);
    assert!(remote.is_remote());
    assert_eq!(remote.label(), "Tunes.assets.zip");

    let local = ArchiveSource::local("Common.zip");
    assert!(!local.is_remote());
    assert!(!local.cache);
    assert_eq!(local.label(), "Common.zip");
}

#[test]
fn source_cache_defaults_to_false_in_json() {
    let src: ArchiveSource = serde_json::from_str(r#"{"location": "a.zip"}"#).unwrap();
    assert_eq!(src, ArchiveSource::local("a.zip"));
}

#[test]
fn dir_store_round_trips_under_hashed_names() {
    let dir = temp_dir("store");
    let store = DirByteStore::open(dir.join("cache")).unwrap();
    assert_eq!(store.get("https://x/y.zip").unwrap(), None);

    store.put("https://x/y.zip", b"bytes").unwrap();
    assert_eq!(store.get("https://x/y.zip").unwrap(), Some(b"bytes".to_vec()));

    let names: Vec<String> = std::fs::read_dir(store.root())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec![sha256_hex(b"https://x/y.zip")]);
    assert_eq!(names[0].len(), 64);
}

#[test]
fn reads_local_file_without_store() {
    let dir = temp_dir("local");
    let path = dir.join("Common.zip");
    std::fs::write(&path, b"zip").unwrap();

    let fetcher = Fetcher::default();
    assert!(!fetcher.has_store());
    let src = ArchiveSource::local(path.to_string_lossy());
    assert_eq!(fetcher.fetch(&src).unwrap(), b"zip");
}

#[test]
fn missing_local_file_is_an_error() {
    let fetcher = Fetcher::default();
    let src = ArchiveSource::local("definitely/not/here.zip");
    assert!(fetcher.fetch(&src).is_err());
}

#[test]
fn cached_sources_are_served_from_store() {
    let dir = temp_dir("cached");
    let path = dir.join("Pack.assets.zip");
    std::fs::write(&path, b"first").unwrap();

    let fetcher = Fetcher::open(Some(&dir.join("cache")));
    assert!(fetcher.has_store());
    let src = ArchiveSource {
        location: path.to_string_lossy().into_owned(),
        cache: true,
    };
    assert_eq!(fetcher.fetch(&src).unwrap(), b"first");

    std::fs::remove_file(&path).unwrap();
    assert_eq!(fetcher.fetch(&src).unwrap(), b"first");
}

#[test]
fn uncached_sources_bypass_store() {
    let dir = temp_dir("uncached");
    let path = dir.join("Common.zip");
    std::fs::write(&path, b"v1").unwrap();

    let fetcher = Fetcher::open(Some(&dir.join("cache")));
    let src = ArchiveSource::local(path.to_string_lossy());
    assert_eq!(fetcher.fetch(&src).unwrap(), b"v1");

    std::fs::write(&path, b"v2").unwrap();
    assert_eq!(fetcher.fetch(&src).unwrap(), b"v2");
}

#[test]
fn unusable_cache_dir_degrades_to_no_store() {
    let dir = temp_dir("blocked");
    let blocker = dir.join("not-a-dir");
    std::fs::write(&blocker, b"file").unwrap();

    let fetcher = Fetcher::open(Some(&blocker));
    assert!(!fetcher.has_store());
}

struct BrokenStore;

impl ByteStore for BrokenStore {
    fn get(&self, _key: &str) -> SketchResult<Option<Vec<u8>>> {
        Err(SketchError::archive("store offline"))
    }

    fn put(&self, _key: &str, _bytes: &[u8]) -> SketchResult<()> {
        Err(SketchError::archive("store offline"))
    }
}

#[test]
fn store_failures_fall_back_to_source() {
    let dir = temp_dir("broken");
    let path = dir.join("a.zip");
    std::fs::write(&path, b"data").unwrap();

    let fetcher = Fetcher::new(Some(Box::new(BrokenStore)));
    let src = ArchiveSource {
        location: path.to_string_lossy().into_owned(),
        cache: true,
    };
    assert_eq!(fetcher.fetch(&src).unwrap(), b"data");
}

#[cfg(not(feature = "http"))]
#[test]
fn remote_sources_need_http_feature() {
    let err = Fetcher::default()
        .fetch(&ArchiveSource::remote("https://example.invalid/a.zip", false))
        .unwrap_err();
    assert!(matches!(err, SketchError::Archive(_)));
}
