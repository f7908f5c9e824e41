//! Upload Stream Splitter
//!
//! Regroups an input stream into fixed-size parts and uploads, in order,
//! every part the resume manifest does not already cover.
//!
//! Parts are processed one at a time: the next chunk is not pulled from the
//! stream until the current part has been uploaded or matched. The first
//! failure ends the upload; no later part is hashed or sent.

use std::collections::VecDeque;

use bytes::{Bytes, BytesMut};
use futures::{Stream, StreamExt};

use crate::client::UploadContext;
use crate::error::{Result, UploadError};
use crate::hash::{md5_hex, normalize_etag};

use super::check_object_size;
use super::part::upload_part;
use super::part_size::{calculate_part_size, part_count};
use super::types::{CompletionManifest, PartDescriptor, UploadSession, UploadedPart, MAX_PART_NUMBER};

/// Upload `stream` (declared to be `total_size` bytes) as the parts of `session`
///
/// `resume` lists parts from an earlier run in ascending part-number order.
/// A part whose MD5 equals the record with the same part number reuses that
/// record's entity tag instead of being uploaded.
pub async fn upload_parts<S, E>(
    ctx: &UploadContext,
    session: &UploadSession,
    stream: S,
    total_size: u64,
    resume: Vec<UploadedPart>,
) -> Result<CompletionManifest>
where
    S: Stream<Item = std::result::Result<Bytes, E>>,
    E: Into<UploadError>,
{
    check_object_size(total_size)?;

    let part_size = calculate_part_size(total_size);
    let mut splitter = Splitter::new(ctx, session, total_size, part_size, resume);
    let mut buffer = BytesMut::new();

    tracing::info!(
        key = %session.key,
        upload_id = %session.upload_id,
        total_size = total_size,
        part_size = part_size,
        parts = part_count(total_size, part_size),
        "Splitting upload stream"
    );

    futures::pin_mut!(stream);
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(Into::into)?;
        buffer.extend_from_slice(&chunk);

        while buffer.len() as u64 >= part_size {
            let part = buffer.split_to(part_size as usize).freeze();
            splitter.process(part).await?;
        }
    }

    // The remainder is the final, short part. An empty object still gets one.
    if !buffer.is_empty() || splitter.part_number == 0 {
        splitter.process(buffer.freeze()).await?;
    }

    splitter.finish()
}

// ============================================================================
// Splitter State
// ============================================================================

struct Splitter<'a> {
    ctx: &'a UploadContext,
    session: &'a UploadSession,
    total_size: u64,
    part_size: u64,
    part_number: u32,
    bytes_seen: u64,
    resume: VecDeque<UploadedPart>,
    manifest: CompletionManifest,
}

impl<'a> Splitter<'a> {
    fn new(
        ctx: &'a UploadContext,
        session: &'a UploadSession,
        total_size: u64,
        part_size: u64,
        resume: Vec<UploadedPart>,
    ) -> Self {
        Self {
            ctx,
            session,
            total_size,
            part_size,
            part_number: 0,
            bytes_seen: 0,
            resume: resume.into(),
            manifest: CompletionManifest::new(),
        }
    }

    /// Validate, then resume or upload one part
    async fn process(&mut self, data: Bytes) -> Result<()> {
        let size = data.len() as u64;
        let remaining = self.total_size - self.bytes_seen;

        // A part may never run past the declared total, and a short part must
        // be exactly what is left of it.
        if size > remaining || (size < self.part_size && size != remaining) {
            return Err(UploadError::SizeMismatch {
                expected: self.total_size,
                actual: self.bytes_seen + size,
            });
        }

        let part_number = self.part_number + 1;
        if part_number > MAX_PART_NUMBER {
            return Err(UploadError::TooManyParts {
                part_number,
                max: MAX_PART_NUMBER,
            });
        }
        self.part_number = part_number;

        let mut part = PartDescriptor {
            part_number,
            size,
            hash: None,
        };

        if let Some(record) = self.take_resume_record(part_number) {
            let hash = part.hash.insert(md5_hex(&data));

            if *hash == normalize_etag(&record.hash) {
                tracing::debug!(
                    part_number = part_number,
                    hash = %hash,
                    etag = %record.etag,
                    "Part unchanged, reusing earlier upload"
                );
                self.manifest.push_resumed(&part, &record.etag);
                self.bytes_seen += size;
                return Ok(());
            }

            tracing::debug!(
                part_number = part_number,
                hash = %hash,
                recorded = %record.hash,
                "Part changed since earlier upload"
            );
        }

        let etag = upload_part(self.ctx, self.session, part_number, data, size).await?;
        self.manifest.push_uploaded(&part, &etag);
        self.bytes_seen += size;

        Ok(())
    }

    /// Pop the resume record for `part_number`, dropping stale records before it
    fn take_resume_record(&mut self, part_number: u32) -> Option<UploadedPart> {
        while let Some(head) = self.resume.front() {
            if head.part_number < part_number {
                self.resume.pop_front();
            } else if head.part_number == part_number {
                return self.resume.pop_front();
            } else {
                return None;
            }
        }
        None
    }

    fn finish(self) -> Result<CompletionManifest> {
        if self.bytes_seen != self.total_size {
            return Err(UploadError::SizeMismatch {
                expected: self.total_size,
                actual: self.bytes_seen,
            });
        }

        if !self.resume.is_empty() {
            tracing::debug!(
                leftover = self.resume.len(),
                "Ignoring resume records past the last part"
            );
        }

        tracing::info!(
            key = %self.session.key,
            parts = self.manifest.parts().len(),
            uploaded = self.manifest.uploaded_count(),
            resumed = self.manifest.resumed_count(),
            "All parts stored"
        );

        Ok(self.manifest)
    }
}
