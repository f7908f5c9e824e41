//! XML documents exchanged with the server
//!
//! Request bodies are serialized and response bodies deserialized with
//! quick-xml's serde support.

use serde::{Deserialize, Serialize};

use crate::error::{Result, UploadError};
use crate::multipart::types::CompletedPart;

// ============================================================================
// Initiate
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InitiateMultipartUploadResult {
    #[serde(default)]
    upload_id: Option<String>,
}

/// Extract `UploadId` from an initiate response body
pub fn parse_upload_id(body: &str) -> Result<String> {
    let result: InitiateMultipartUploadResult = quick_xml::de::from_str(body)
        .map_err(|e| UploadError::Protocol(format!("Malformed initiate response: {}", e)))?;

    result
        .upload_id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .ok_or_else(UploadError::missing_upload_id)
}

// ============================================================================
// Complete
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename = "CompleteMultipartUpload")]
pub struct CompleteMultipartUpload {
    #[serde(rename = "Part", default)]
    pub parts: Vec<CompletePartEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletePartEntry {
    #[serde(rename = "PartNumber")]
    pub part_number: u32,
    #[serde(rename = "ETag")]
    pub etag: String,
}

/// Serialize the completion document, ordered by part number
pub fn completion_document(parts: &[CompletedPart]) -> Result<String> {
    let mut entries: Vec<CompletePartEntry> = parts
        .iter()
        .map(|p| CompletePartEntry {
            part_number: p.part_number,
            etag: p.etag.clone(),
        })
        .collect();
    entries.sort_by_key(|e| e.part_number);

    let document = CompleteMultipartUpload { parts: entries };
    Ok(quick_xml::se::to_string(&document)?)
}

/// Parse a completion document back into its entries
pub fn parse_completion_document(body: &str) -> Result<Vec<CompletePartEntry>> {
    let document: CompleteMultipartUpload = quick_xml::de::from_str(body)?;
    Ok(document.parts)
}

// ============================================================================
// List Parts
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListPartsResult {
    #[serde(default)]
    pub is_truncated: bool,
    #[serde(default)]
    pub next_part_number_marker: Option<u32>,
    #[serde(rename = "Part", default)]
    pub parts: Vec<ListedPart>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListedPart {
    pub part_number: u32,
    #[serde(rename = "ETag")]
    pub etag: String,
    #[serde(default)]
    pub size: u64,
}

pub fn parse_list_parts(body: &str) -> Result<ListPartsResult> {
    quick_xml::de::from_str(body)
        .map_err(|e| UploadError::Protocol(format!("Malformed list parts response: {}", e)))
}

// ============================================================================
// Error
// ============================================================================

/// Body of a non-success response
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub resource: Option<String>,
    #[serde(default)]
    pub request_id: Option<String>,
}

pub fn parse_error_body(body: &str) -> Option<ErrorBody> {
    if body.trim().is_empty() {
        return None;
    }
    quick_xml::de::from_str(body).ok()
}
