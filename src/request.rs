//! Request descriptors
//!
//! A [`RequestDescriptor`] is everything the signer and the transport need to
//! know about a request except its body. Headers are kept with lowercase names
//! in a sorted map so signing sees them in canonical order.

use std::collections::BTreeMap;

use crate::config::{Endpoint, Protocol};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Put,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Post => "POST",
        }
    }
}

/// A request ready to be signed and sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub method: Method,
    pub protocol: Protocol,
    pub host: String,
    pub port: u16,
    /// Already escaped path, e.g. `/bucket/some%20key`
    pub path: String,
    /// Query parameters in wire order; an empty value renders as a bare key
    pub query: Vec<(String, String)>,
    pub headers: BTreeMap<String, String>,
}

impl RequestDescriptor {
    /// Build a request for an object, with the `host` header already set
    pub fn for_object(endpoint: &Endpoint, method: Method, bucket: &str, key: &str) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("host".to_string(), endpoint.host_header());

        Self {
            method,
            protocol: endpoint.protocol,
            host: endpoint.host.clone(),
            port: endpoint.port,
            path: object_path(bucket, key),
            query: Vec::new(),
            headers,
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// Query string as sent on the wire (`uploads`, `partNumber=1&uploadId=x`)
    pub fn wire_query(&self) -> String {
        self.query
            .iter()
            .map(|(k, v)| {
                if v.is_empty() {
                    urlencoding::encode(k).into_owned()
                } else {
                    format!("{}={}", urlencoding::encode(k), urlencoding::encode(v))
                }
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Query string in SigV4 canonical form: sorted, every key carries `=`
    pub fn canonical_query(&self) -> String {
        let mut pairs: Vec<(String, String)> = self
            .query
            .iter()
            .map(|(k, v)| {
                (
                    urlencoding::encode(k).into_owned(),
                    urlencoding::encode(v).into_owned(),
                )
            })
            .collect();
        pairs.sort();
        pairs
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Path plus wire query
    pub fn path_and_query(&self) -> String {
        let query = self.wire_query();
        if query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, query)
        }
    }

    /// Full URL for the transport
    pub fn url(&self) -> String {
        format!(
            "{}://{}:{}{}",
            self.protocol.as_str(),
            self.host,
            self.port,
            self.path_and_query()
        )
    }
}

/// `/{bucket}/{key}` with every key segment URI-escaped and `/` kept
pub fn object_path(bucket: &str, key: &str) -> String {
    let escaped_key = key
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/");
    format!("/{}/{}", bucket, escaped_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;

    #[test]
    fn test_object_path_escapes_segments() {
        assert_eq!(object_path("books", "a b/c+d.epub"), "/books/a%20b/c%2Bd.epub");
        assert_eq!(object_path("books", "plain"), "/books/plain");
    }

    #[test]
    fn test_wire_query_bare_key() {
        let endpoint = ClientConfig::default().endpoint;
        let req = RequestDescriptor::for_object(&endpoint, Method::Post, "b", "k")
            .with_query("uploads", "");
        assert_eq!(req.path_and_query(), "/b/k?uploads");
        assert_eq!(req.canonical_query(), "uploads=");
    }

    #[test]
    fn test_part_query_order() {
        let endpoint = ClientConfig::default().endpoint;
        let req = RequestDescriptor::for_object(&endpoint, Method::Put, "b", "k")
            .with_query("partNumber", "3")
            .with_query("uploadId", "abc/def");
        assert_eq!(req.wire_query(), "partNumber=3&uploadId=abc%2Fdef");
        assert_eq!(req.url(), "http://localhost:9000/b/k?partNumber=3&uploadId=abc%2Fdef");
    }

    #[test]
    fn test_canonical_query_sorted() {
        let endpoint = ClientConfig::default().endpoint;
        let req = RequestDescriptor::for_object(&endpoint, Method::Get, "b", "k")
            .with_query("uploadId", "x")
            .with_query("part-number-marker", "2");
        assert_eq!(req.canonical_query(), "part-number-marker=2&uploadId=x");
    }

    #[test]
    fn test_headers_are_lowercased() {
        let endpoint = ClientConfig::default().endpoint;
        let req = RequestDescriptor::for_object(&endpoint, Method::Put, "b", "k")
            .with_header("Content-Type", "text/plain");
        assert_eq!(req.header("content-type"), Some("text/plain"));
        assert_eq!(req.header("Host"), Some("localhost:9000"));
    }
}
