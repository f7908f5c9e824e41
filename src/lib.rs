//! Amnesia Multipart
//!
//! Client for resumable S3 multipart uploads. An input byte stream of known
//! length is split into protocol-sized parts, each part is uploaded with a
//! `Content-MD5` integrity header, parts already stored by an interrupted
//! run are skipped, and the object is finished with an ordered part manifest.
//!
//! # Modules
//!
//! - `multipart`: initiate, upload parts, split a stream, complete, list parts
//! - `client`: `MultipartClient` and the `UploadContext` operations run against
//! - `signer` / `transport` / `error_parser`: the injectable collaborators
//!
//! ## Usage
//!
//! ```rust,ignore
//! use amnesia_multipart::MultipartClient;
//!
//! let client = MultipartClient::from_env()?;
//! let summary = client
//!     .upload_stream("library", "books/novel.epub", "application/epub+zip", stream, size)
//!     .await?;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod error_parser;
pub mod hash;
pub mod multipart;
pub mod request;
pub mod signer;
pub mod transport;
pub mod xml;

#[cfg(test)]
mod mock;

pub use client::{MultipartClient, UploadContext, UploadSummary};
pub use config::{ClientConfig, Credentials, Endpoint, Protocol};
pub use error::{Result, UploadError};
pub use error_parser::{ErrorParser, XmlErrorParser};
pub use multipart::{
    calculate_part_size, CompletedPart, CompletionManifest, PartDescriptor, UploadSession, UploadedPart,
};
pub use request::{Method, RequestDescriptor};
pub use signer::{SigV4Signer, Signer};
pub use transport::{ReqwestTransport, Transport, TransportResponse};
