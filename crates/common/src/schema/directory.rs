use serde::{Deserialize, Serialize};

use crate::blob_ref::BlobRef;

use super::{SchemaBlob, CAMLI_VERSION};

/// A named directory whose entries are the members of one static set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Directory {
    camli_version: u32,
    camli_type: String,
    file_name: String,
    entries: BlobRef,
}

impl SchemaBlob for Directory {
    const CAMLI_TYPE: &'static str = "directory";

    fn camli_type(&self) -> &str {
        &self.camli_type
    }
}

impl Directory {
    pub fn new(file_name: impl Into<String>, entries: BlobRef) -> Self {
        Self {
            camli_version: CAMLI_VERSION,
            camli_type: Self::CAMLI_TYPE.to_string(),
            file_name: file_name.into(),
            entries,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Reference of the static set holding the directory's children
    pub fn entries(&self) -> &BlobRef {
        &self.entries
    }
}
