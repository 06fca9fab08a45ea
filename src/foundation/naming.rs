//! Name handling shared by archive ingestion and asset lookup.
//!
//! Image, pack, and audio names are keyed by their normalized form. Both the indexing side
//! (archive ingestion) and the lookup side (asset references) go through
//! [`normalize_asset_name`], otherwise lookups silently miss.

/// Replace spaces and apostrophes with underscores.
pub fn normalize_asset_name(name: &str) -> String {
    name.chars()
        .map(|c| if c == ' ' || c == '\'' { '_' } else { c })
        .collect()
}

/// Final path segment with its extension stripped.
///
/// `"Game.codea/Sprites/My File's.png"` becomes `"My File's"`. A segment without a dot is
/// returned whole.
pub fn file_stem(path: &str) -> &str {
    let base = match path.rfind('/') {
        Some(i) => &path[i + 1..],
        None => path,
    };
    match base.rfind('.') {
        Some(i) => &base[..i],
        None => base,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/naming.rs"]
mod tests;
