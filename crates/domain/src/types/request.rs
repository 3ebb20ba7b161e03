//! Request and response value types carried through the gateway
//!
//! A [`RequestDescriptor`] describes one outgoing call and is immutable once
//! sent; the builder methods consume and return the value, so every transform
//! in the interceptor chain produces a new descriptor.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(10_000);

/// HTTP method of an outgoing call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// True for every method except `GET`. Mutating requests trigger
    /// related-key cache invalidation and are never served from cache.
    pub fn is_mutating(self) -> bool {
        !matches!(self, Self::Get)
    }

    /// Canonical wire representation
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field of a multipart form body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartField {
    /// Form field name
    pub name: String,
    /// Field content
    pub part: MultipartPart,
}

/// Content of a multipart field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultipartPart {
    /// Plain text value
    Text(String),
    /// File upload
    File {
        /// Original file name reported to the backend
        filename: String,
        /// MIME type of the file content
        content_type: String,
        /// Raw file bytes
        data: Vec<u8>,
    },
}

/// Body of an outgoing request
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// JSON payload, sent with `Content-Type: application/json`
    Json(Value),
    /// Multipart form payload. The content type header is left to the
    /// transport so it can generate the boundary itself.
    Multipart(Vec<MultipartField>),
}

impl RequestBody {
    /// True when the body is a multipart form
    pub fn is_multipart(&self) -> bool {
        matches!(self, Self::Multipart(_))
    }
}

/// Immutable description of one outgoing call
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    /// HTTP method
    pub method: HttpMethod,
    /// Path relative to the configured base URL, e.g. `/brand/42`
    pub url: String,
    /// Explicit request headers
    pub headers: BTreeMap<String, String>,
    /// Optional request body
    pub body: Option<RequestBody>,
    /// Per-request timeout enforced by the transport
    pub timeout: Duration,
}

impl RequestDescriptor {
    /// Create a descriptor with the default timeout and no headers or body.
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: BTreeMap::new(),
            body: None,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// `GET` descriptor
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    /// `POST` descriptor
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    /// `PUT` descriptor
    pub fn put(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, url)
    }

    /// `PATCH` descriptor
    pub fn patch(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, url)
    }

    /// `DELETE` descriptor
    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, url)
    }

    /// Set a header, replacing any previous value for the same name.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Remove a header by name, case-insensitively.
    pub fn without_header(mut self, name: &str) -> Self {
        self.headers.retain(|k, _| !k.eq_ignore_ascii_case(name));
        self
    }

    /// Attach a JSON body.
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    /// Attach a multipart form body.
    pub fn multipart(mut self, fields: Vec<MultipartField>) -> Self {
        self.body = Some(RequestBody::Multipart(fields));
        self
    }

    /// Override the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// True when the body is a multipart form
    pub fn is_multipart(&self) -> bool {
        self.body.as_ref().is_some_and(RequestBody::is_multipart)
    }

    /// Look up a header value case-insensitively.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Deep, serializable copy of a response
///
/// Snapshots are what the cache stores: plain data, never references into
/// live request state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseSnapshot {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: BTreeMap<String, String>,
    /// Parsed JSON body (`null` for empty bodies)
    pub body: Value,
}

impl ResponseSnapshot {
    /// True for 2xx statuses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Response handed back to domain stores
///
/// A cache hit is indistinguishable from a live response except for the
/// `served_from_cache` flag.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// The response data
    pub snapshot: ResponseSnapshot,
    /// Whether the snapshot was served from the TTL cache
    pub served_from_cache: bool,
}

impl ApiResponse {
    /// Wrap a fresh network response.
    pub fn from_network(snapshot: ResponseSnapshot) -> Self {
        Self { snapshot, served_from_cache: false }
    }

    /// Wrap a cached snapshot.
    pub fn from_cache(snapshot: ResponseSnapshot) -> Self {
        Self { snapshot, served_from_cache: true }
    }

    /// Response body
    pub fn body(&self) -> &Value {
        &self.snapshot.body
    }

    /// HTTP status code
    pub fn status(&self) -> u16 {
        self.snapshot.status
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn builder_produces_expected_descriptor() {
        let descriptor = RequestDescriptor::put("/brand/42")
            .header("X-Request-Id", "abc")
            .json(json!({ "name": "Acme" }))
            .timeout(Duration::from_secs(5));

        assert_eq!(descriptor.method, HttpMethod::Put);
        assert_eq!(descriptor.url, "/brand/42");
        assert_eq!(descriptor.header_value("x-request-id"), Some("abc"));
        assert_eq!(descriptor.timeout, Duration::from_secs(5));
        assert!(!descriptor.is_multipart());
    }

    #[test]
    fn without_header_is_case_insensitive() {
        let descriptor = RequestDescriptor::post("/brand/42/logo")
            .header("Content-Type", "application/json")
            .without_header("content-type");

        assert_eq!(descriptor.header_value("Content-Type"), None);
    }

    #[test]
    fn only_get_is_non_mutating() {
        assert!(!HttpMethod::Get.is_mutating());
        for method in [HttpMethod::Post, HttpMethod::Put, HttpMethod::Patch, HttpMethod::Delete] {
            assert!(method.is_mutating());
        }
    }

    #[test]
    fn cache_hits_are_flagged() {
        let snapshot =
            ResponseSnapshot { status: 200, headers: BTreeMap::new(), body: json!([]) };
        assert!(ApiResponse::from_cache(snapshot.clone()).served_from_cache);
        assert!(!ApiResponse::from_network(snapshot).served_from_cache);
    }
}
