//! Configuration for the multipart upload client

use serde::Deserialize;
use std::env;

use crate::error::{Result, UploadError};

/// Default region used when none is configured
pub const DEFAULT_REGION: &str = "us-east-1";

#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    pub endpoint: Endpoint,
    pub region: String,
    pub credentials: Credentials,
}

/// Where requests are sent
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Endpoint {
    pub protocol: Protocol,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    Https,
}

#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub access_key: String,
    pub secret_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }

    pub fn default_port(&self) -> u16 {
        match self {
            Protocol::Http => 80,
            Protocol::Https => 443,
        }
    }
}

impl Endpoint {
    /// Parse an endpoint URL such as `http://localhost:9000`
    pub fn parse(url: &str) -> Result<Self> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|e| UploadError::InvalidArgument(format!("Invalid endpoint {}: {}", url, e)))?;

        let protocol = match parsed.scheme() {
            "http" => Protocol::Http,
            "https" => Protocol::Https,
            other => {
                return Err(UploadError::InvalidArgument(format!(
                    "Unsupported endpoint scheme: {}",
                    other
                )))
            }
        };

        let host = parsed
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| UploadError::InvalidArgument(format!("Endpoint has no host: {}", url)))?
            .to_string();

        let port = parsed.port().unwrap_or_else(|| protocol.default_port());

        Ok(Self { protocol, host, port })
    }

    /// Value of the `Host` header; the port is omitted when it is the scheme default
    pub fn host_header(&self) -> String {
        if self.port == self.protocol.default_port() {
            self.host.clone()
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            endpoint: Endpoint {
                protocol: Protocol::Http,
                host: "localhost".to_string(),
                port: 9000,
            },
            region: DEFAULT_REGION.to_string(),
            credentials: Credentials {
                access_key: "admin".to_string(),
                secret_key: "password123".to_string(),
            },
        }
    }
}

impl ClientConfig {
    /// Load configuration from the environment (and a `.env` file if present)
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let endpoint = required_var("S3_ENDPOINT")?;

        Ok(ClientConfig {
            endpoint: Endpoint::parse(&endpoint)?,
            region: env::var("S3_REGION").unwrap_or_else(|_| DEFAULT_REGION.to_string()),
            credentials: Credentials {
                access_key: required_var("S3_ACCESS_KEY")?,
                secret_key: required_var("S3_SECRET_KEY")?,
            },
        })
    }
}

fn required_var(name: &str) -> Result<String> {
    env::var(name).map_err(|e| UploadError::Config(format!("{}: {}", name, e)))
}
