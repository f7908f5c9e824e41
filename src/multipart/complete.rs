//! Upload completion

use bytes::Bytes;

use crate::client::UploadContext;
use crate::error::{Result, UploadError};
use crate::request::{Method, RequestDescriptor};
use crate::xml::completion_document;

use super::types::{CompletedPart, UploadSession};

/// Complete `session` with `parts`
///
/// The document lists parts in ascending part-number order whatever order
/// `parts` is in. A 200 reply can still carry an `<Error>` document when the
/// server fails while assembling the object; that is reported as a server
/// error too.
pub async fn complete_upload(ctx: &UploadContext, session: &UploadSession, parts: &[CompletedPart]) -> Result<()> {
    if parts.is_empty() {
        return Err(UploadError::InvalidArgument(
            "cannot complete an upload without parts".to_string(),
        ));
    }

    let document = completion_document(parts)?;

    let request = RequestDescriptor::for_object(&ctx.config().endpoint, Method::Post, &session.bucket, &session.key)
        .with_query("uploadId", session.upload_id.as_str())
        .with_header("content-type", "application/xml");

    let response = ctx.execute(request, Bytes::from(document)).await?;

    if response.body_text().contains("<Error>") {
        return Err(ctx.error_parser().parse(&response));
    }

    tracing::info!(
        key = %session.key,
        upload_id = %session.upload_id,
        parts = parts.len(),
        "Multipart upload completed"
    );

    Ok(())
}
