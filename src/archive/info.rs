use std::io::Cursor;

use crate::foundation::error::{SketchError, SketchResult};

const DEPENDENCIES_KEY: &str = "Dependencies";
const BUFFER_ORDER_KEY: &str = "Buffer Order";

/// Declarations read from a project's `Info.plist`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProjectInfo {
    /// Dependency project names in declaration order, duplicates kept.
    pub dependencies: Vec<String>,
    /// Module names in load order.
    pub buffer_order: Vec<String>,
}

/// Parse an `Info.plist` (XML or binary property list).
///
/// Dependency entries of the form `owner:name` keep only the segment after the last colon.
/// A key whose value is not an array contributes nothing.
pub fn parse_project_info(bytes: &[u8]) -> SketchResult<ProjectInfo> {
    let value = plist::Value::from_reader(Cursor::new(bytes))
        .map_err(|e| SketchError::decode(format!("invalid Info.plist: {e}")))?;
    let Some(dict) = value.as_dictionary() else {
        return Err(SketchError::decode("Info.plist root is not a dictionary"));
    };

    let dependencies = string_array(dict.get(DEPENDENCIES_KEY))
        .map(|dep| match dep.rfind(':') {
            Some(i) => dep[i + 1..].to_string(),
            None => dep.to_string(),
        })
        .collect();
    let buffer_order = string_array(dict.get(BUFFER_ORDER_KEY))
        .map(str::to_string)
        .collect();

    Ok(ProjectInfo {
        dependencies,
        buffer_order,
    })
}

fn string_array(value: Option<&plist::Value>) -> impl Iterator<Item = &str> {
    value
        .and_then(plist::Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(plist::Value::as_string)
}

#[cfg(test)]
#[path = "../../tests/unit/archive/info.rs"]
mod tests;
