//! Non-success response interpretation

use crate::error::UploadError;
use crate::transport::TransportResponse;
use crate::xml::parse_error_body;

/// Turns a non-success response into an [`UploadError`]
pub trait ErrorParser: Send + Sync {
    fn parse(&self, response: &TransportResponse) -> UploadError;
}

/// Parses S3 `<Error>` documents
///
/// Responses without a readable body (HEAD-style replies, proxies answering
/// with HTML) still produce `UploadError::Server` carrying the status.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlErrorParser;

impl ErrorParser for XmlErrorParser {
    fn parse(&self, response: &TransportResponse) -> UploadError {
        let body = parse_error_body(&response.body_text()).unwrap_or_default();

        UploadError::Server {
            status: response.status,
            code: body.code.unwrap_or_else(|| fallback_code(response.status).to_string()),
            message: body
                .message
                .unwrap_or_else(|| format!("Request failed with status {}", response.status)),
            resource: body.resource,
            request_id: body
                .request_id
                .or_else(|| response.header("x-amz-request-id").map(str::to_string)),
        }
    }
}

fn fallback_code(status: u16) -> &'static str {
    match status {
        301 => "MovedPermanently",
        400 => "BadRequest",
        403 => "AccessDenied",
        404 => "NotFound",
        405 => "MethodNotAllowed",
        409 => "Conflict",
        412 => "PreconditionFailed",
        501 => "NotImplemented",
        503 => "ServiceUnavailable",
        _ => "UnknownError",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_xml_error() {
        let response = TransportResponse::new(404).with_body(
            "<Error><Code>NoSuchBucket</Code><Message>The specified bucket does not exist</Message><Resource>/books</Resource></Error>",
        );
        match XmlErrorParser.parse(&response) {
            UploadError::Server { status, code, message, resource, .. } => {
                assert_eq!(status, 404);
                assert_eq!(code, "NoSuchBucket");
                assert_eq!(message, "The specified bucket does not exist");
                assert_eq!(resource.as_deref(), Some("/books"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_empty_body_uses_status() {
        let response = TransportResponse::new(403).with_header("x-amz-request-id", "req-1");
        match XmlErrorParser.parse(&response) {
            UploadError::Server { code, request_id, .. } => {
                assert_eq!(code, "AccessDenied");
                assert_eq!(request_id.as_deref(), Some("req-1"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
