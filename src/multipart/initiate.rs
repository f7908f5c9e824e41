//! Upload initiation

use bytes::Bytes;

use crate::client::UploadContext;
use crate::error::Result;
use crate::request::{Method, RequestDescriptor};
use crate::xml::parse_upload_id;

use super::types::{effective_content_type, UploadSession};
use super::validate_object;

/// Open a multipart upload for `bucket/key`
///
/// Sends `POST /{bucket}/{key}?uploads` and reads `UploadId` from the reply.
/// A success reply without an upload id is a protocol error, distinct from
/// the server errors produced for non-success statuses.
pub async fn initiate_upload(
    ctx: &UploadContext,
    bucket: &str,
    key: &str,
    content_type: &str,
) -> Result<UploadSession> {
    validate_object(bucket, key)?;
    let content_type = effective_content_type(content_type);

    let request = RequestDescriptor::for_object(&ctx.config().endpoint, Method::Post, bucket, key)
        .with_query("uploads", "")
        .with_header("content-type", content_type);

    let response = ctx.execute(request, Bytes::new()).await?;
    let upload_id = parse_upload_id(&response.body_text())?;

    tracing::info!(
        bucket = %bucket,
        key = %key,
        upload_id = %upload_id,
        "Multipart upload initiated"
    );

    Ok(UploadSession::new(bucket, key, content_type, &upload_id))
}
