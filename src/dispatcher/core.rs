use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

use http::Method;
use may::coroutine;
use may::sync::mpsc;
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use crate::config::BodyParseMode;
use crate::error::HandlerError;
use crate::ids::RequestId;
use crate::query;
use crate::router::{RouteTable, TableMatch};
use crate::server::ParsedRequest;

/// Channel sender feeding a handler coroutine.
pub type HandlerSender = mpsc::Sender<HandlerRequest>;

/// What a handler returns; `Err` is logged and answered with a generic 500.
pub type HandlerResult = Result<HandlerResponse, HandlerError>;

/// A fully populated request as seen by middleware and handlers.
#[derive(Debug, Clone)]
pub struct HandlerRequest {
    /// Correlates every log line emitted for this request.
    pub request_id: RequestId,
    pub method: Method,
    /// Path portion of the request target.
    pub path: String,
    /// Pattern the matched route was registered under.
    pub pattern: String,
    /// Captured path parameters; empty when the pattern declared none.
    pub params: HashMap<String, String>,
    /// Decoded query pairs; empty when the target carried no `?`.
    pub query: HashMap<String, String>,
    /// Header names lower-cased.
    pub headers: HashMap<String, String>,
    /// Body per the configured parse mode (`json`: parsed value, empty body
    /// becomes `{}`; `raw`: the body text as a JSON string).
    pub body: Value,
    /// Channel for the response back to the dispatcher.
    pub reply_tx: mpsc::Sender<HandlerResponse>,
}

impl HandlerRequest {
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    /// Header lookup, case-insensitive per RFC 9110.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Response body kinds and the content type each defaults to on the wire.
#[derive(Debug, Clone)]
pub enum ResponseBody {
    /// `text/plain`
    Text(String),
    /// `application/json`
    Json(Value),
    /// `text/html`
    Html(String),
}

#[derive(Debug, Clone)]
pub struct HandlerResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: ResponseBody,
}

impl HandlerResponse {
    #[must_use]
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: ResponseBody::Text(body.into()),
        }
    }

    #[must_use]
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: ResponseBody::Json(body),
        }
    }

    #[must_use]
    pub fn html(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: ResponseBody::Html(body.into()),
        }
    }

    /// The 404 answer: plain text naming the unmatched path.
    #[must_use]
    pub fn not_found(path: &str) -> Self {
        Self::text(404, format!("{path} Route Not Found"))
    }

    /// Generic 500. Detail belongs in the log, never in the body.
    #[must_use]
    pub fn internal_error() -> Self {
        Self::text(500, "Internal Server Error")
    }

    /// Set a header, replacing any existing value case-insensitively.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.retain(|k, _| !k.eq_ignore_ascii_case(name));
        self.headers.insert(name.to_string(), value.into());
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Spawn the long-lived coroutine backing one `(pattern, method)` handler
/// and return the channel into it.
///
/// The coroutine drains its channel for the life of the route. A handler
/// `Err` or panic is logged and converted to a generic 500 reply; the
/// coroutine itself keeps serving.
pub(crate) fn spawn_handler<F>(
    pattern: &str,
    method: &Method,
    stack_size: usize,
    handler: F,
) -> HandlerSender
where
    F: Fn(HandlerRequest) -> HandlerResult + Send + 'static,
{
    let (tx, rx) = mpsc::channel::<HandlerRequest>();
    let route = format!("{method} {pattern}");

    // SAFETY: may's spawn is unsafe because a coroutine must not borrow
    // stack data from its spawner; this closure is Send + 'static and owns
    // everything it touches.
    let spawned = unsafe {
        coroutine::Builder::new()
            .stack_size(stack_size)
            .spawn(move || {
                debug!(route = %route, "handler coroutine started");
                for req in rx.iter() {
                    let reply_tx = req.reply_tx.clone();
                    let request_id = req.request_id;
                    let response = match catch_unwind(AssertUnwindSafe(|| handler(req))) {
                        Ok(Ok(response)) => response,
                        Ok(Err(err)) => {
                            error!(
                                request_id = %request_id,
                                route = %route,
                                error = %err,
                                "handler failed"
                            );
                            HandlerResponse::internal_error()
                        }
                        Err(panic) => {
                            error!(
                                request_id = %request_id,
                                route = %route,
                                panic = %format!("{panic:?}"),
                                "handler panicked"
                            );
                            HandlerResponse::internal_error()
                        }
                    };
                    let _ = reply_tx.send(response);
                }
            })
    };
    if let Err(err) = spawned {
        // The unused receiver is already gone; dispatch sees a closed
        // channel and answers 500.
        error!(error = %err, stack_size, "failed to spawn handler coroutine");
    }
    tx
}

/// Drives the request lifecycle against a frozen route table.
///
/// The table is read-only once the dispatcher exists, so any number of
/// connection coroutines may dispatch concurrently without locks.
pub struct Dispatcher {
    table: RouteTable,
    body_parse: BodyParseMode,
}

impl Dispatcher {
    #[must_use]
    pub fn new(table: RouteTable, body_parse: BodyParseMode) -> Self {
        Self { table, body_parse }
    }

    #[must_use]
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Run one parsed request through matching, extraction, middleware and
    /// the handler. Every failure class maps onto a response; nothing
    /// escapes to the caller.
    pub fn dispatch(&self, parsed: &ParsedRequest) -> HandlerResponse {
        let request_id = RequestId::new();

        let Some(found) = self.table.find(&parsed.method, &parsed.path) else {
            warn!(
                request_id = %request_id,
                method = %parsed.method,
                path = %parsed.path,
                "no route matched"
            );
            return HandlerResponse::not_found(&parsed.path);
        };
        let TableMatch {
            entry,
            slot,
            params,
        } = found;
        debug!(
            request_id = %request_id,
            pattern = %entry.pattern,
            params = ?params,
            "route matched"
        );

        let query = match query::decode(&parsed.target) {
            Ok(query) => query,
            Err(err) => {
                warn!(request_id = %request_id, error = %err, "query decode failed");
                return HandlerResponse::text(400, format!("Bad Request: {err}"));
            }
        };

        let body = match self.body_parse {
            BodyParseMode::Json => {
                if parsed.body.is_empty() {
                    json!({})
                } else {
                    match serde_json::from_str(&parsed.body) {
                        Ok(value) => value,
                        Err(err) => {
                            warn!(request_id = %request_id, error = %err, "body parse failed");
                            return HandlerResponse::text(400, "Bad Request: malformed JSON body");
                        }
                    }
                }
            }
            BodyParseMode::Raw => Value::String(parsed.body.clone()),
        };

        let (reply_tx, reply_rx) = mpsc::channel();
        let mut request = HandlerRequest {
            request_id,
            method: parsed.method.clone(),
            path: parsed.path.clone(),
            pattern: entry.pattern.clone(),
            params,
            query,
            headers: parsed.headers.clone(),
            body,
            reply_tx,
        };

        if let Some(middleware) = &slot.middleware {
            if let Err(rejection) = middleware.before(&mut request) {
                error!(
                    request_id = %request_id,
                    pattern = %entry.pattern,
                    reason = %rejection,
                    "middleware rejected request"
                );
                return HandlerResponse::internal_error();
            }
        }

        let start = Instant::now();
        if slot.handler.send(request.clone()).is_err() {
            error!(
                request_id = %request_id,
                pattern = %entry.pattern,
                "handler channel closed"
            );
            return HandlerResponse::internal_error();
        }
        let mut response = match reply_rx.recv() {
            Ok(response) => response,
            Err(_) => {
                error!(
                    request_id = %request_id,
                    pattern = %entry.pattern,
                    "handler dropped the reply channel"
                );
                return HandlerResponse::internal_error();
            }
        };
        let latency = start.elapsed();

        if let Some(middleware) = &slot.middleware {
            middleware.after(&request, &mut response, latency);
        }

        info!(
            request_id = %request_id,
            method = %parsed.method,
            path = %parsed.path,
            status = response.status,
            latency_ms = latency.as_millis() as u64,
            "request handled"
        );
        response
    }
}
