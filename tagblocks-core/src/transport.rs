//! HTTP transport seam
//!
//! The tracker and reporter only ever need "send this request, tell me if it
//! succeeded". [`Transport`] is that primitive; [`ReqwestTransport`] is the
//! production implementation. A call either resolves to a 2xx [`Response`]
//! or rejects with a [`RequestFailure`] describing whatever the server (if
//! any) sent back.

use std::fmt;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;

use crate::error::{Error, Result};

/// Request body, already tagged with its encoding.
///
/// Kept as data until the transport sends it, so callers and tests can
/// inspect exactly what would go on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Serialized as JSON
    Json(serde_json::Value),
    /// Serialized as `application/x-www-form-urlencoded`
    Form(Vec<(String, String)>),
}

/// A single outbound HTTP request
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: String,
    /// Headers in insertion order, sent as given
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl OutboundRequest {
    /// Start a POST request
    pub fn post(url: impl Into<String>, body: RequestBody) -> Self {
        Self {
            method: Method::POST,
            url: url.into(),
            headers: Vec::new(),
            body,
        }
    }

    /// Append a header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Look up a header value (case-insensitive)
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A successful (2xx) response
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

/// A rejected call
///
/// `status` and `response_text` are set when the server answered with a
/// non-2xx status. `response_json` is set when that body parsed as JSON.
/// A call that never got a response leaves all three empty and carries the
/// transport error in `detail`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestFailure {
    pub status: Option<u16>,
    pub response_text: Option<String>,
    pub response_json: Option<serde_json::Value>,
    /// Transport-level cause, for logs only
    pub detail: Option<String>,
}

impl RequestFailure {
    /// Failure built from an error response body
    pub fn from_response(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let response_json = serde_json::from_str(&body).ok();
        Self {
            status: Some(status),
            response_text: Some(body),
            response_json,
            detail: None,
        }
    }

    /// Failure where no response was received
    pub fn no_response(detail: impl Into<String>) -> Self {
        Self {
            detail: Some(detail.into()),
            ..Default::default()
        }
    }
}

impl fmt::Display for RequestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.status, &self.detail) {
            (Some(status), _) => write!(f, "HTTP {}", status),
            (None, Some(detail)) => write!(f, "request failed: {}", detail),
            (None, None) => write!(f, "request failed"),
        }
    }
}

/// "Send HTTP request, return response-or-error"
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        request: OutboundRequest,
    ) -> std::result::Result<Response, RequestFailure>;
}

/// [`Transport`] backed by `reqwest`
///
/// No timeout is set beyond reqwest's defaults; calls are never retried.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http_client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with a fresh HTTP client
    pub fn new() -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::Transport(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { http_client })
    }

    /// Wrap an existing client
    pub fn with_client(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }
}

/// Build the header map for a request.
///
/// Values are taken as raw bytes, so a referrer carrying non-ASCII
/// characters (e.g. an IDN host) is still sent.
fn header_map(headers: &[(String, String)]) -> std::result::Result<HeaderMap, RequestFailure> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            RequestFailure::no_response(format!("invalid header name {}: {}", name, e))
        })?;
        let value = HeaderValue::from_bytes(value.as_bytes()).map_err(|e| {
            RequestFailure::no_response(format!("invalid header value for {}: {}", name, e))
        })?;
        map.insert(name, value);
    }
    Ok(map)
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(
        &self,
        request: OutboundRequest,
    ) -> std::result::Result<Response, RequestFailure> {
        let headers = header_map(&request.headers)?;

        let builder = self
            .http_client
            .request(request.method.clone(), &request.url)
            .headers(headers);

        let builder = match &request.body {
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Form(fields) => builder.form(fields),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| RequestFailure::no_response(e.to_string()))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status.is_success() {
            Ok(Response {
                status: status.as_u16(),
                body,
            })
        } else {
            Err(RequestFailure::from_response(status.as_u16(), body))
        }
    }
}
