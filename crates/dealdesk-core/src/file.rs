use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// A file picked for upload: name, MIME type, and the raw bytes.
///
/// `Bytes` keeps clones cheap, so the session can hand the payload to a
/// transport attempt while retaining the set for retry after a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, data: Bytes) -> Self {
        SelectedFile {
            name: name.into(),
            content_type: content_type.into(),
            data,
        }
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn meta(&self) -> FileMeta {
        FileMeta {
            name: self.name.clone(),
            content_type: self.content_type.clone(),
            size: self.size(),
        }
    }
}

/// Metadata projection of a [`SelectedFile`], published in session snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMeta {
    pub name: String,
    pub content_type: String,
    pub size: u64,
}
