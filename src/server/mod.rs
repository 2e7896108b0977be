//! HTTP plumbing on top of `may_minihttp`: request parsing, response
//! writing, the per-connection service and the server handle.

mod http_server;
mod request;
mod response;
mod service;

pub use http_server::{HttpServer, ServerHandle};
pub use request::{parse_request, ParsedRequest};
pub use response::{status_reason, write_response};
pub use service::AppService;
