//! Listing parts already stored for an upload
//!
//! Produces the resume manifest for an interrupted upload. A part's ETag is
//! the MD5 of its bytes, so it doubles as the stored hash.

use bytes::Bytes;

use crate::client::UploadContext;
use crate::error::Result;
use crate::hash::normalize_etag;
use crate::request::{Method, RequestDescriptor};
use crate::xml::parse_list_parts;

use super::types::{UploadSession, UploadedPart};

/// Every part the server holds for `session`, ascending by part number
pub async fn list_parts(ctx: &UploadContext, session: &UploadSession) -> Result<Vec<UploadedPart>> {
    let mut parts = Vec::new();
    let mut marker: Option<u32> = None;

    loop {
        let mut request = RequestDescriptor::for_object(&ctx.config().endpoint, Method::Get, &session.bucket, &session.key)
            .with_query("uploadId", session.upload_id.as_str());
        if let Some(marker) = marker {
            request = request.with_query("part-number-marker", marker.to_string());
        }

        let response = ctx.execute(request, Bytes::new()).await?;
        let page = parse_list_parts(&response.body_text())?;

        parts.extend(page.parts.into_iter().map(|p| UploadedPart {
            part_number: p.part_number,
            size: p.size,
            hash: normalize_etag(&p.etag),
            etag: p.etag,
        }));

        match (page.is_truncated, page.next_part_number_marker) {
            (true, Some(next)) if Some(next) != marker => marker = Some(next),
            _ => break,
        }
    }

    parts.sort_by_key(|p| p.part_number);

    tracing::debug!(
        key = %session.key,
        upload_id = %session.upload_id,
        parts = parts.len(),
        "Listed uploaded parts"
    );

    Ok(parts)
}
