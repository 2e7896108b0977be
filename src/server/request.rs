use std::collections::HashMap;
use std::io::Read;

use http::Method;
use may_minihttp::Request;
use tracing::debug;

use crate::error::RequestError;

/// Raw HTTP request data extracted before dispatch.
#[derive(Debug, Clone)]
pub struct ParsedRequest {
    pub method: Method,
    /// Raw request target, query suffix included.
    pub target: String,
    /// Path portion of the target; this is what patterns match against.
    pub path: String,
    /// Header names lower-cased.
    pub headers: HashMap<String, String>,
    /// Fully buffered body text. Bounded by the configured body limit.
    pub body: String,
}

/// Extract method, target, headers and a bounded body from a raw request.
///
/// The method is normalized to uppercase so matching is case-insensitive.
/// Body buffering completes here, before any routing work, and is capped at
/// `max_body_bytes` - an oversized body is refused rather than accumulated.
pub fn parse_request(req: Request, max_body_bytes: usize) -> Result<ParsedRequest, RequestError> {
    let raw_method = req.method().to_string();
    let method = Method::from_bytes(raw_method.to_ascii_uppercase().as_bytes())
        .map_err(|_| RequestError::BadMethod(raw_method))?;

    let target = req.path().to_string();
    let path = target.split('?').next().unwrap_or("/").to_string();

    let headers: HashMap<String, String> = req
        .headers()
        .iter()
        .map(|h| {
            (
                h.name.to_ascii_lowercase(),
                String::from_utf8_lossy(h.value).to_string(),
            )
        })
        .collect();

    let mut body = String::new();
    let read = req
        .body()
        .take(max_body_bytes as u64 + 1)
        .read_to_string(&mut body)
        .map_err(|_| RequestError::BodyNotUtf8)?;
    if read > max_body_bytes {
        return Err(RequestError::BodyTooLarge(max_body_bytes));
    }

    debug!(
        method = %method,
        target = %target,
        header_count = headers.len(),
        body_bytes = read,
        "request parsed"
    );

    Ok(ParsedRequest {
        method,
        target,
        path,
        headers,
        body,
    })
}
