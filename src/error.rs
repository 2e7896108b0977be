//! Error taxonomy for the routing core.
//!
//! Everything here is converted to an HTTP response at the dispatcher or
//! service boundary; none of these types ever terminates the serving task.
//! 4xx responses carry the error's short reason, 5xx responses carry only a
//! generic body while the detail goes to the log.

use std::path::PathBuf;
use thiserror::Error;

/// Registration-time pattern errors. Raised by [`crate::router::compile`] and
/// surfaced through the builder's route methods.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("route pattern must not be empty")]
    EmptyPattern,
    #[error("route pattern `{0}` must begin with '/'")]
    MissingLeadingSlash(String),
    #[error("route pattern `{0}` has a ':' with no parameter name")]
    EmptyParamName(String),
    #[error("route pattern `{pattern}` declares parameter `{name}` more than once")]
    DuplicateParam { pattern: String, name: String },
}

/// Malformed query strings. The dispatcher answers these with 400.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryDecodeError {
    #[error("malformed percent-encoding in `{0}`")]
    BadEscape(String),
    #[error("percent-decoded bytes in `{0}` are not valid UTF-8")]
    NotUtf8(String),
}

/// Request-level failures detected before dispatch.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("unsupported HTTP method `{0}`")]
    BadMethod(String),
    #[error("request body is not valid UTF-8")]
    BodyNotUtf8,
    #[error("request body exceeds the {0} byte limit")]
    BodyTooLarge(usize),
}

impl RequestError {
    /// Status code this failure maps to on the wire.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            RequestError::BadMethod(_) | RequestError::BodyNotUtf8 => 400,
            RequestError::BodyTooLarge(_) => 413,
        }
    }
}

/// Configuration errors raised while constructing the application, before
/// any socket is opened. An unsupported view engine fails here, not at
/// render time.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unsupported view engine `{0}`")]
    UnsupportedViewEngine(String),
    #[error("template directory `{0}` does not exist")]
    MissingTemplateDir(PathBuf),
}

/// Template rendering failures, surfaced to handlers as [`HandlerError`].
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("view `{0}` escapes the template directory")]
    InvalidViewPath(String),
    #[error("view `{0}` not found")]
    ViewNotFound(String),
    #[error("failed to read view `{view}`: {source}")]
    Io {
        view: String,
        source: std::io::Error,
    },
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),
}

/// Failures a handler may return. The handler coroutine logs the detail and
/// replies with a generic 500.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("response serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Other(String),
}

impl HandlerError {
    pub fn msg(message: impl Into<String>) -> Self {
        HandlerError::Other(message.into())
    }
}

/// A middleware's explicit refusal to proceed. The handler is skipped and
/// the client receives a generic 500; `reason` is logged, never sent.
#[derive(Debug, Error, Clone)]
#[error("middleware rejected the request: {reason}")]
pub struct MiddlewareRejection {
    pub reason: String,
}

impl MiddlewareRejection {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}
