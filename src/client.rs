//! Multipart upload client
//!
//! [`UploadContext`] carries the connection settings and the injected
//! collaborators (transport, signer, error parser) that every operation
//! needs. [`MultipartClient`] wraps a context and exposes the operations as
//! methods, plus the end-to-end [`MultipartClient::upload_stream`].

use std::sync::Arc;

use bytes::Bytes;
use futures::Stream;

use crate::config::ClientConfig;
use crate::error::{Result, UploadError};
use crate::error_parser::{ErrorParser, XmlErrorParser};
use crate::hash::sha256_hex;
use crate::multipart::{self, CompletedPart, CompletionManifest, UploadSession, UploadedPart};
use crate::request::RequestDescriptor;
use crate::signer::{SigV4Signer, Signer};
use crate::transport::{ReqwestTransport, Transport, TransportResponse};

// ============================================================================
// Upload Context
// ============================================================================

/// Connection settings plus the collaborators used to sign, send and
/// interpret requests
#[derive(Clone)]
pub struct UploadContext {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    signer: Arc<dyn Signer>,
    error_parser: Arc<dyn ErrorParser>,
}

impl UploadContext {
    pub fn new(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        signer: Arc<dyn Signer>,
        error_parser: Arc<dyn ErrorParser>,
    ) -> Self {
        Self {
            config,
            transport,
            signer,
            error_parser,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn error_parser(&self) -> &dyn ErrorParser {
        self.error_parser.as_ref()
    }

    /// Sign and send `request`, hashing `body` for the signature
    pub(crate) async fn execute(&self, request: RequestDescriptor, body: Bytes) -> Result<TransportResponse> {
        let payload_sha256 = sha256_hex(&body);
        self.execute_with_hash(request, body, &payload_sha256).await
    }

    /// Sign and send `request` with a precomputed payload hash
    ///
    /// Non-success responses are handed to the error parser.
    pub(crate) async fn execute_with_hash(
        &self,
        request: RequestDescriptor,
        body: Bytes,
        payload_sha256: &str,
    ) -> Result<TransportResponse> {
        let method = request.method;
        let target = request.path_and_query();

        let signed = self
            .signer
            .sign(request, payload_sha256, &self.config.credentials)?;
        let response = self.transport.send(signed, body).await?;

        if !response.is_success() {
            tracing::warn!(
                method = method.as_str(),
                target = %target,
                status = response.status,
                "Request rejected by server"
            );
            return Err(self.error_parser.parse(&response));
        }

        Ok(response)
    }
}

// ============================================================================
// Client
// ============================================================================

/// Summary of a finished upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSummary {
    pub session: UploadSession,
    pub parts: Vec<CompletedPart>,
    pub uploaded_parts: usize,
    pub resumed_parts: usize,
    pub size: u64,
}

/// Resumable multipart upload client
#[derive(Clone)]
pub struct MultipartClient {
    context: UploadContext,
}

impl MultipartClient {
    /// Client using reqwest, SigV4 and S3 XML error parsing
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new()?;
        let signer = SigV4Signer::new(&config.region);

        Ok(Self::with_collaborators(
            config,
            Arc::new(transport),
            Arc::new(signer),
            Arc::new(XmlErrorParser),
        ))
    }

    /// Client built from `S3_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn with_collaborators(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        signer: Arc<dyn Signer>,
        error_parser: Arc<dyn ErrorParser>,
    ) -> Self {
        Self {
            context: UploadContext::new(config, transport, signer, error_parser),
        }
    }

    pub fn context(&self) -> &UploadContext {
        &self.context
    }

    /// Open a multipart upload
    pub async fn initiate(&self, bucket: &str, key: &str, content_type: &str) -> Result<UploadSession> {
        multipart::initiate_upload(&self.context, bucket, key, content_type).await
    }

    /// Upload one part of `session`, returning its entity tag
    pub async fn upload_part(
        &self,
        session: &UploadSession,
        part_number: u32,
        data: Bytes,
        declared_size: u64,
    ) -> Result<String> {
        multipart::upload_part(&self.context, session, part_number, data, declared_size).await
    }

    /// Store `data` as a whole object with a single PUT
    pub async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        content_type: &str,
        data: Bytes,
        declared_size: u64,
    ) -> Result<String> {
        multipart::put_object(&self.context, bucket, key, content_type, data, declared_size).await
    }

    /// Split `stream` into parts and upload the ones `resume` does not cover
    pub async fn upload_parts<S, E>(
        &self,
        session: &UploadSession,
        stream: S,
        total_size: u64,
        resume: Vec<UploadedPart>,
    ) -> Result<CompletionManifest>
    where
        S: Stream<Item = std::result::Result<Bytes, E>>,
        E: Into<UploadError>,
    {
        multipart::upload_parts(&self.context, session, stream, total_size, resume).await
    }

    /// Finish `session` with the given parts
    pub async fn complete(&self, session: &UploadSession, parts: &[CompletedPart]) -> Result<()> {
        multipart::complete_upload(&self.context, session, parts).await
    }

    /// Parts the server already holds for `session`
    pub async fn list_parts(&self, session: &UploadSession) -> Result<Vec<UploadedPart>> {
        multipart::list_parts(&self.context, session).await
    }

    /// Upload `stream` as a new object: initiate, split and upload, complete
    pub async fn upload_stream<S, E>(
        &self,
        bucket: &str,
        key: &str,
        content_type: &str,
        stream: S,
        total_size: u64,
    ) -> Result<UploadSummary>
    where
        S: Stream<Item = std::result::Result<Bytes, E>>,
        E: Into<UploadError>,
    {
        multipart::check_object_size(total_size)?;
        let session = self.initiate(bucket, key, content_type).await?;
        self.resume_stream(session, stream, total_size, Vec::new()).await
    }

    /// Continue `session`, skipping parts recorded in `resume`, then complete it
    pub async fn resume_stream<S, E>(
        &self,
        session: UploadSession,
        stream: S,
        total_size: u64,
        resume: Vec<UploadedPart>,
    ) -> Result<UploadSummary>
    where
        S: Stream<Item = std::result::Result<Bytes, E>>,
        E: Into<UploadError>,
    {
        let manifest = self.upload_parts(&session, stream, total_size, resume).await?;
        self.complete(&session, manifest.parts()).await?;

        Ok(UploadSummary {
            uploaded_parts: manifest.uploaded_count(),
            resumed_parts: manifest.resumed_count(),
            size: manifest.total_size(),
            parts: manifest.into_parts(),
            session,
        })
    }
}
