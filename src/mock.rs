//! Test doubles for the transport and signer

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;

use crate::client::UploadContext;
use crate::config::{ClientConfig, Credentials};
use crate::error::Result;
use crate::error_parser::XmlErrorParser;
use crate::request::RequestDescriptor;
use crate::signer::Signer;
use crate::transport::{Transport, TransportResponse};

type Handler = dyn Fn(&RequestDescriptor, &Bytes) -> Result<TransportResponse> + Send + Sync;

/// A request as the transport received it
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub request: RequestDescriptor,
    pub body: Bytes,
}

/// Transport that records every request and answers through a closure
#[derive(Clone)]
pub struct MockTransport {
    handler: Arc<Handler>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockTransport {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&RequestDescriptor, &Bytes) -> Result<TransportResponse> + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: RequestDescriptor, body: Bytes) -> Result<TransportResponse> {
        let response = (self.handler)(&request, &body);
        self.requests
            .lock()
            .unwrap()
            .push(RecordedRequest { request, body });
        response
    }
}

/// Signer that only records the payload hash
pub struct NoopSigner;

impl Signer for NoopSigner {
    fn sign(
        &self,
        request: RequestDescriptor,
        payload_sha256: &str,
        _credentials: &Credentials,
    ) -> Result<RequestDescriptor> {
        Ok(request.with_header("x-amz-content-sha256", payload_sha256))
    }
}

pub fn test_context(transport: MockTransport) -> UploadContext {
    UploadContext::new(
        ClientConfig::default(),
        Arc::new(transport),
        Arc::new(NoopSigner),
        Arc::new(XmlErrorParser),
    )
}
