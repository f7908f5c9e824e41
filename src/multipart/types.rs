//! Multipart upload types

use serde::{Deserialize, Serialize};

// ============================================================================
// Constants
// ============================================================================

/// Minimum size of every part except the last: 5 MiB
pub const MIN_PART_SIZE: u64 = 5 * 1024 * 1024;

/// Maximum part size: 5 × 1025 MiB (a little over 5 GiB)
pub const MAX_PART_SIZE: u64 = 5 * 1025 * 1024 * 1024;

/// Number of parts the part size is planned against
pub const PLANNED_PART_COUNT: u64 = 9999;

/// Hard cap on part numbers
pub const MAX_PART_NUMBER: u32 = 10_000;

/// Maximum object size: 5 TiB
pub const MAX_OBJECT_SIZE: u64 = 5 * 1024 * 1024 * 1024 * 1024;

/// Content type used when the caller gives none
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

// ============================================================================
// Session
// ============================================================================

/// An open multipart upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadSession {
    pub bucket: String,
    pub key: String,
    pub content_type: String,
    /// Server-issued upload identifier
    pub upload_id: String,
}

impl UploadSession {
    pub fn new(bucket: &str, key: &str, content_type: &str, upload_id: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            key: key.to_string(),
            content_type: effective_content_type(content_type).to_string(),
            upload_id: upload_id.to_string(),
        }
    }
}

/// `content_type`, or the generic binary type when it is empty
pub fn effective_content_type(content_type: &str) -> &str {
    if content_type.trim().is_empty() {
        DEFAULT_CONTENT_TYPE
    } else {
        content_type
    }
}

// ============================================================================
// Parts
// ============================================================================

/// One part produced from the input stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartDescriptor {
    /// 1-based part number
    pub part_number: u32,
    pub size: u64,
    /// Lowercase hex MD5 of the part's bytes, computed only when a resume
    /// record has to be compared against it
    pub hash: Option<String>,
}

/// A part uploaded by an earlier run, used to resume
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedPart {
    pub part_number: u32,
    pub size: u64,
    /// Lowercase hex MD5 of the part's bytes
    pub hash: String,
    /// Entity tag the server returned for this part
    pub etag: String,
}

/// One entry of the completion manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedPart {
    pub part_number: u32,
    pub etag: String,
}

impl CompletedPart {
    pub fn new(part_number: u32, etag: &str) -> Self {
        Self {
            part_number,
            etag: etag.to_string(),
        }
    }
}

// ============================================================================
// Manifest
// ============================================================================

/// Append-only record of every part of the upload, in part-number order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionManifest {
    parts: Vec<CompletedPart>,
    /// Size of each part, parallel to `parts`
    sizes: Vec<u64>,
    /// Parts taken from the resume manifest instead of uploaded
    resumed: usize,
}

impl CompletionManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_uploaded(&mut self, part: &PartDescriptor, etag: &str) {
        self.parts.push(CompletedPart::new(part.part_number, etag));
        self.sizes.push(part.size);
    }

    pub(crate) fn push_resumed(&mut self, part: &PartDescriptor, etag: &str) {
        self.push_uploaded(part, etag);
        self.resumed += 1;
    }

    pub fn parts(&self) -> &[CompletedPart] {
        &self.parts
    }

    pub fn into_parts(self) -> Vec<CompletedPart> {
        self.parts
    }

    /// Number of parts reused from the resume manifest
    pub fn resumed_count(&self) -> usize {
        self.resumed
    }

    /// Number of parts sent in this run
    pub fn uploaded_count(&self) -> usize {
        self.parts.len() - self.resumed
    }

    /// Total bytes covered by the manifest
    pub fn total_size(&self) -> u64 {
        self.sizes.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(part_number: u32, size: u64) -> PartDescriptor {
        PartDescriptor {
            part_number,
            size,
            hash: None,
        }
    }

    #[test]
    fn test_session_default_content_type() {
        let session = UploadSession::new("books", "novel.epub", "", "id");
        assert_eq!(session.content_type, DEFAULT_CONTENT_TYPE);

        let session = UploadSession::new("books", "novel.epub", "application/epub+zip", "id");
        assert_eq!(session.content_type, "application/epub+zip");
    }

    #[test]
    fn test_manifest_counts() {
        let mut manifest = CompletionManifest::new();
        manifest.push_resumed(&descriptor(1, 10), "\"a\"");
        manifest.push_uploaded(&descriptor(2, 10), "\"b\"");
        manifest.push_uploaded(&descriptor(3, 4), "\"c\"");

        assert_eq!(manifest.parts().len(), 3);
        assert_eq!(manifest.resumed_count(), 1);
        assert_eq!(manifest.uploaded_count(), 2);
        assert_eq!(manifest.total_size(), 24);
        assert_eq!(manifest.parts()[2], CompletedPart::new(3, "\"c\""));
    }

    #[test]
    fn test_limits() {
        assert_eq!(MAX_PART_SIZE, 5_373_952_000);
        assert_eq!(MAX_OBJECT_SIZE, 5_497_558_138_880);
    }
}
