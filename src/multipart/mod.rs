//! Multipart Upload Module
//!
//! Implements resumable S3 multipart uploads with:
//! - Part sizing within the protocol's 5 MiB..5 GiB and 10,000-part limits
//! - MD5 part integrity (`Content-MD5`) and SHA-256 request signing
//! - Resume support: parts whose hash matches an earlier upload are not re-sent
//!
//! Protocol Flow:
//! 1. Client opens a session and receives an upload id
//! 2. Client splits the input stream into fixed-size parts
//! 3. Client uploads every part the resume manifest does not cover
//! 4. Client completes the upload with the ordered part manifest

pub mod complete;
pub mod initiate;
pub mod list_parts;
pub mod part;
pub mod part_size;
pub mod splitter;
pub mod types;

pub use complete::complete_upload;
pub use initiate::initiate_upload;
pub use list_parts::list_parts;
pub use part::{put_object, upload_part};
pub use part_size::{calculate_part_size, part_count};
pub use splitter::upload_parts;
pub use types::*;

use crate::error::{Result, UploadError};

/// Reject empty bucket names and object keys
pub(crate) fn validate_object(bucket: &str, key: &str) -> Result<()> {
    if bucket.is_empty() {
        return Err(UploadError::InvalidArgument("bucket name cannot be empty".to_string()));
    }
    if key.is_empty() {
        return Err(UploadError::InvalidArgument("object key cannot be empty".to_string()));
    }
    Ok(())
}

/// Reject declared sizes above the protocol maximum
pub(crate) fn check_object_size(total_size: u64) -> Result<()> {
    if total_size > MAX_OBJECT_SIZE {
        return Err(UploadError::ObjectTooLarge {
            size: total_size,
            max: MAX_OBJECT_SIZE,
        });
    }
    Ok(())
}
