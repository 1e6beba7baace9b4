//! Domain Entities - Core proxying objects
//!
//! These entities represent the request/response envelopes crossing the
//! gateway boundary. They carry no transport types: headers are plain
//! name/value pairs so neither the server nor the client library leaks
//! into the domain layer.

use bytes::Bytes;

/// A single header as received or forwarded.
///
/// Values are raw bytes: header values are not required to be UTF-8.
pub type HeaderPair = (String, Vec<u8>);

/// Body of a request crossing the gateway, tagged by representation.
///
/// The variant is selected from the request method and content type:
/// multipart payloads stay opaque binary, structured payloads stay text,
/// and `GET`/`HEAD` (or an empty payload) carry nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum ProxyBody {
    /// No body is forwarded.
    Empty,
    /// Textual body forwarded verbatim (JSON and other text payloads).
    Text(String),
    /// Opaque binary blob forwarded without inspection (multipart, or any
    /// payload that is not valid UTF-8).
    Binary(Bytes),
}

impl ProxyBody {
    /// Classify an already-read payload by its content type.
    ///
    /// The caller is responsible for not reading the payload at all on
    /// `GET`/`HEAD`; this only decides the representation of what was read.
    /// Payloads that are not valid UTF-8 stay binary regardless of the
    /// declared content type, so the bytes round-trip exactly.
    pub fn classify(content_type: Option<&str>, raw: Bytes) -> Self {
        if content_type
            .map(|ct| ct.to_ascii_lowercase().contains("multipart/form-data"))
            .unwrap_or(false)
        {
            return ProxyBody::Binary(raw);
        }
        if raw.is_empty() {
            return ProxyBody::Empty;
        }
        match String::from_utf8(raw.to_vec()) {
            Ok(text) => ProxyBody::Text(text),
            Err(_) => ProxyBody::Binary(raw),
        }
    }

    /// Whether this body is forwarded as an opaque blob.
    pub fn is_binary(&self) -> bool {
        matches!(self, ProxyBody::Binary(_))
    }
}

/// A fully constructed request ready to be sent to the backend.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    /// HTTP method, verbatim from the inbound request.
    pub method: String,
    /// Absolute target URL (origin + path + query).
    pub target: String,
    /// Sanitized headers (never contains `host`).
    pub headers: Vec<HeaderPair>,
    pub body: ProxyBody,
}

/// A response received from the backend, relayed to the caller.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: u16,
    pub headers: Vec<HeaderPair>,
    pub body: Bytes,
}

impl UpstreamResponse {
    /// Looks up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&[u8]> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_slice())
    }

    /// Whether the status is a redirect (3xx).
    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_multipart_is_binary() {
        let raw = Bytes::from_static(b"--X\r\ncontent\r\n--X--");
        let body = ProxyBody::classify(Some("multipart/form-data; boundary=X"), raw.clone());
        assert_eq!(body, ProxyBody::Binary(raw));
    }

    #[test]
    fn test_classify_json_is_text() {
        let body = ProxyBody::classify(
            Some("application/json"),
            Bytes::from_static(b"{\"message\":\"hi\"}"),
        );
        assert_eq!(body, ProxyBody::Text("{\"message\":\"hi\"}".to_string()));
    }

    #[test]
    fn test_classify_plain_text_without_content_type() {
        let body = ProxyBody::classify(None, Bytes::from_static(b"hello"));
        assert_eq!(body, ProxyBody::Text("hello".to_string()));
    }

    #[test]
    fn test_classify_empty_payload() {
        assert_eq!(ProxyBody::classify(Some("application/json"), Bytes::new()), ProxyBody::Empty);
        assert_eq!(ProxyBody::classify(None, Bytes::new()), ProxyBody::Empty);
    }

    #[test]
    fn test_classify_non_utf8_payload_stays_binary() {
        let raw = Bytes::from_static(&[0xFF, 0x61]);
        let body = ProxyBody::classify(Some("application/octet-stream"), raw.clone());
        assert_eq!(body, ProxyBody::Binary(raw));
    }

    #[test]
    fn test_classify_multipart_case_insensitive() {
        let raw = Bytes::from_static(b"payload");
        let body = ProxyBody::classify(Some("Multipart/Form-Data; boundary=abc"), raw.clone());
        assert!(body.is_binary());
    }

    #[test]
    fn test_response_header_lookup_is_case_insensitive() {
        let resp = UpstreamResponse {
            status: 302,
            headers: vec![("Location".to_string(), b"http://backend:8000/x".to_vec())],
            body: Bytes::new(),
        };
        assert_eq!(resp.header("location"), Some(b"http://backend:8000/x".as_slice()));
        assert!(resp.is_redirect());
    }

    #[test]
    fn test_response_redirect_range() {
        let mut resp = UpstreamResponse {
            status: 200,
            headers: vec![],
            body: Bytes::new(),
        };
        assert!(!resp.is_redirect());
        resp.status = 399;
        assert!(resp.is_redirect());
        resp.status = 400;
        assert!(!resp.is_redirect());
    }
}
