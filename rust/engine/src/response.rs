//! Response model shared by `inject` and the HTTP server.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use hyper::{Response, StatusCode};
use serde_json::json;
use std::collections::HashMap;

/// Response payload; decides the default `content-type`.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// No body.
    Empty,
    /// Serialized as JSON.
    Json(serde_json::Value),
    /// Plain UTF-8 text.
    Text(String),
    /// Raw bytes.
    Binary(Vec<u8>),
}

/// **HTTP RESPONSE**
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    /// HTTP status.
    pub status_code: u16,
    /// Lower-cased header names.
    pub headers: HashMap<String, String>,
    /// Payload.
    pub body: ResponseBody,
}

impl HttpResponse {
    /// Response with the body's default `content-type`.
    pub fn new(status: u16, body: ResponseBody) -> Self {
        let mut headers = HashMap::new();
        let content_type = match &body {
            ResponseBody::Json(_) => Some("application/json; charset=utf-8"),
            ResponseBody::Text(_) => Some("text/plain; charset=utf-8"),
            ResponseBody::Binary(_) => Some("application/octet-stream"),
            ResponseBody::Empty => None,
        };
        if let Some(content_type) = content_type {
            headers.insert("content-type".to_string(), content_type.to_string());
        }
        Self {
            status_code: status,
            headers,
            body,
        }
    }

    /// `text/plain` response.
    pub fn text(status: u16, text: impl Into<String>) -> Self {
        Self::new(status, ResponseBody::Text(text.into()))
    }

    /// `application/json` response.
    pub fn json(status: u16, value: serde_json::Value) -> Self {
        Self::new(status, ResponseBody::Json(value))
    }

    /// **ERROR REPLY** - `{statusCode, error, message}` with the canonical reason phrase
    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self::json(
            status,
            json!({
                "statusCode": status,
                "error": reason_phrase(status),
                "message": message.into(),
            }),
        )
    }

    /// Sets a header, replacing any previous value.
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Serialized body.
    pub fn body_bytes(&self) -> Vec<u8> {
        match &self.body {
            ResponseBody::Empty => vec![],
            ResponseBody::Json(value) => serde_json::to_vec(value).unwrap_or_default(),
            ResponseBody::Text(text) => text.as_bytes().to_vec(),
            ResponseBody::Binary(data) => data.clone(),
        }
    }

    /// Body as text, the way an HTTP client would read it.
    pub fn payload(&self) -> String {
        String::from_utf8_lossy(&self.body_bytes()).into_owned()
    }

    /// Convert into a hyper response, falling back to a bare 500 when a header is unusable.
    pub fn into_hyper(self) -> Response<Full<Bytes>> {
        let mut builder = Response::builder().status(self.status_code);
        for (key, value) in &self.headers {
            if let (Ok(name), Ok(val)) = (
                HeaderName::from_bytes(key.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                builder = builder.header(name, val);
            }
        }
        builder
            .body(Full::from(self.body_bytes()))
            .unwrap_or_else(|e| {
                log::error!("Failed to build response: {e}");
                let mut fallback = Response::new(Full::from(FALLBACK.to_vec()));
                *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
                fallback
                    .headers_mut()
                    .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                fallback
            })
    }
}

const FALLBACK: &[u8] =
    b"{\"statusCode\":500,\"error\":\"Internal Server Error\",\"message\":\"Internal Server Error\"}";

/// Canonical reason phrase, or `"Error"` for codes without one.
pub fn reason_phrase(status: u16) -> &'static str {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or("Error")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_shape() {
        let response = HttpResponse::error(412, "This constraint return only #schema1");
        assert_eq!(response.status_code, 412);
        assert_eq!(
            response.body,
            ResponseBody::Json(json!({
                "statusCode": 412,
                "error": "Precondition Failed",
                "message": "This constraint return only #schema1"
            }))
        );
        assert_eq!(
            response.headers.get("content-type").map(String::as_str),
            Some("application/json; charset=utf-8")
        );
    }

    #[test]
    fn test_reason_phrase_fallback() {
        assert_eq!(reason_phrase(400), "Bad Request");
        assert_eq!(reason_phrase(500), "Internal Server Error");
        assert_eq!(reason_phrase(599), "Error");
    }

    #[test]
    fn test_into_hyper() {
        let response = HttpResponse::text(200, "hi").with_header("X-Trace", "abc").into_hyper();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-trace"], "abc");
    }
}
