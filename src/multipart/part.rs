//! Part upload
//!
//! One PUT per part. The same request shape, minus the multipart query,
//! stores a small object in a single request.

use bytes::Bytes;

use crate::client::UploadContext;
use crate::error::{Result, UploadError};
use crate::hash::{md5_base64, sha256_hex};
use crate::request::{Method, RequestDescriptor};

use super::types::{effective_content_type, UploadSession, MAX_PART_NUMBER};
use super::validate_object;

/// Target of a PUT: a part of an upload, or a whole object when
/// `part_number` is 0
#[derive(Debug, Clone, Copy)]
pub struct PutTarget<'a> {
    pub bucket: &'a str,
    pub key: &'a str,
    pub content_type: &'a str,
    pub upload_id: &'a str,
    pub part_number: u32,
}

impl<'a> PutTarget<'a> {
    pub fn part(session: &'a UploadSession, part_number: u32) -> Self {
        Self {
            bucket: &session.bucket,
            key: &session.key,
            content_type: &session.content_type,
            upload_id: &session.upload_id,
            part_number,
        }
    }

    pub fn object(bucket: &'a str, key: &'a str, content_type: &'a str) -> Self {
        Self {
            bucket,
            key,
            content_type,
            upload_id: "",
            part_number: 0,
        }
    }

    fn request(&self, ctx: &UploadContext, size: u64, content_md5: String) -> RequestDescriptor {
        let mut request = RequestDescriptor::for_object(&ctx.config().endpoint, Method::Put, self.bucket, self.key);

        if self.part_number > 0 {
            request = request
                .with_query("partNumber", self.part_number.to_string())
                .with_query("uploadId", self.upload_id);
        }

        request
            .with_header("content-length", size.to_string())
            .with_header("content-type", effective_content_type(self.content_type))
            .with_header("content-md5", content_md5)
    }
}

/// PUT `data` to `target` and return the entity tag from the reply
///
/// `data` must be exactly `declared_size` bytes; otherwise nothing is sent.
pub async fn put(ctx: &UploadContext, target: PutTarget<'_>, data: Bytes, declared_size: u64) -> Result<String> {
    let actual = data.len() as u64;
    if actual != declared_size {
        return Err(UploadError::SizeMismatch {
            expected: declared_size,
            actual,
        });
    }

    let payload_sha256 = sha256_hex(&data);
    let content_md5 = md5_base64(&data);
    let request = target.request(ctx, actual, content_md5);

    let response = ctx.execute_with_hash(request, data, &payload_sha256).await?;

    let etag = response
        .header("etag")
        .map(str::to_string)
        .ok_or_else(|| UploadError::Protocol(format!("missing ETag for {}/{}", target.bucket, target.key)))?;

    tracing::debug!(
        key = %target.key,
        part_number = target.part_number,
        size = actual,
        etag = %etag,
        "Part stored"
    );

    Ok(etag)
}

/// Upload part `part_number` of `session`
pub async fn upload_part(
    ctx: &UploadContext,
    session: &UploadSession,
    part_number: u32,
    data: Bytes,
    declared_size: u64,
) -> Result<String> {
    if part_number == 0 || part_number > MAX_PART_NUMBER {
        return Err(UploadError::InvalidArgument(format!(
            "part number {} outside 1..={}",
            part_number, MAX_PART_NUMBER
        )));
    }
    put(ctx, PutTarget::part(session, part_number), data, declared_size).await
}

/// Store `data` as `bucket/key` with a single PUT
pub async fn put_object(
    ctx: &UploadContext,
    bucket: &str,
    key: &str,
    content_type: &str,
    data: Bytes,
    declared_size: u64,
) -> Result<String> {
    validate_object(bucket, key)?;
    put(ctx, PutTarget::object(bucket, key, content_type), data, declared_size).await
}
