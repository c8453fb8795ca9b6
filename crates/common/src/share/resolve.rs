use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::blob_ref::BlobRef;

use super::error::ValidationError;

pub const BLOB_REF_KEY: &str = "blobRef";
pub const IS_DIR_KEY: &str = "isDir";

/// One entry of a user selection, as handed over by the selection source.
///
/// The source is not trusted: the expected keys are `"blobRef"` (a content
/// reference) and `"isDir"` (a boolean string), but either may be missing,
/// of the wrong JSON type or malformed until [`resolve_selection`] has
/// checked them. Other keys are carried along and ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectedItem(BTreeMap<String, Value>);

impl SelectedItem {
    pub fn new(blob_ref: impl Into<String>, is_dir: bool) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(BLOB_REF_KEY.to_string(), Value::String(blob_ref.into()));
        fields.insert(IS_DIR_KEY.to_string(), Value::String(is_dir.to_string()));
        Self(fields)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }
}

impl From<BTreeMap<String, Value>> for SelectedItem {
    fn from(fields: BTreeMap<String, Value>) -> Self {
        Self(fields)
    }
}

/// A validated selection entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedItem {
    pub blob_ref: BlobRef,
    pub is_dir: bool,
}

/// Validate a raw selection, preserving order.
///
/// Fails on the first bad entry. An empty selection is rejected rather than
///  producing a share of nothing.
pub fn resolve_selection(selection: &[SelectedItem]) -> Result<Vec<ResolvedItem>, ValidationError> {
    if selection.is_empty() {
        return Err(ValidationError::EmptySelection);
    }

    selection.iter().map(resolve_item).collect()
}

fn resolve_item(item: &SelectedItem) -> Result<ResolvedItem, ValidationError> {
    let raw_ref = item
        .get(BLOB_REF_KEY)
        .ok_or(ValidationError::MissingBlobRef)?;
    let blob_ref = raw_ref
        .as_str()
        .and_then(|s| BlobRef::parse(s).ok())
        .ok_or_else(|| ValidationError::InvalidBlobRef(display_value(raw_ref)))?;

    let raw_is_dir = item.get(IS_DIR_KEY).ok_or(ValidationError::MissingIsDir)?;
    let is_dir = raw_is_dir
        .as_str()
        .and_then(parse_bool)
        .ok_or_else(|| ValidationError::InvalidIsDir(display_value(raw_is_dir)))?;

    Ok(ResolvedItem { blob_ref, is_dir })
}

/// Strings as they are, anything else as its JSON text
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Accepts the usual spellings of a boolean: 1, t, T, TRUE, true, True and
///  their false counterparts.
pub fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
