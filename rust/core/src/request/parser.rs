//! Query string, header and body decoding.

use crate::request::types::RequestBody;
use std::collections::HashMap;

/// Errors raised while decoding a request into an [`HttpRequest`](crate::request::HttpRequest).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Body is not valid JSON.
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),
    /// Form body is not UTF-8.
    #[error("Invalid UTF-8 in form body: {0}")]
    InvalidUtf8(String),
}

/// Decode `a=1&b=two` pairs. `+` means space; undecodable pairs are dropped.
pub fn parse_query_string(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let mut parts = pair.splitn(2, '=');
            let key = parts.next()?;
            let value = parts.next().unwrap_or("");
            Some((
                urlencoding::decode(&key.replace('+', " ")).ok()?.into_owned(),
                urlencoding::decode(&value.replace('+', " ")).ok()?.into_owned(),
            ))
        })
        .collect()
}

/// Decode a JSON body.
pub fn parse_json_body(data: &[u8]) -> Result<serde_json::Value, ParseError> {
    serde_json::from_slice(data).map_err(|e| ParseError::InvalidJson(e.to_string()))
}

/// Decode a url-encoded form body.
pub fn parse_form_body(data: &[u8]) -> Result<HashMap<String, String>, ParseError> {
    let body_str =
        std::str::from_utf8(data).map_err(|e| ParseError::InvalidUtf8(e.to_string()))?;

    Ok(parse_query_string(body_str))
}

/// Lower-case header names; later duplicates overwrite earlier ones.
pub fn parse_headers<'a, I>(headers: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    headers
        .into_iter()
        .map(|(name, value)| (name.to_ascii_lowercase(), value.to_string()))
        .collect()
}

/// Decode a body according to its content type. Unknown types stay raw.
pub fn parse_body(content_type: Option<&str>, data: &[u8]) -> Result<RequestBody, ParseError> {
    if data.is_empty() {
        return Ok(RequestBody::Empty);
    }
    let mime = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase());
    match mime.as_deref() {
        Some("application/json") => parse_json_body(data).map(RequestBody::Json),
        Some("application/x-www-form-urlencoded") => parse_form_body(data).map(RequestBody::Form),
        _ => Ok(RequestBody::Raw(data.to_vec())),
    }
}
