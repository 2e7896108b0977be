use std::time::Duration;

use crate::dispatcher::{HandlerRequest, HandlerResponse};
use crate::error::MiddlewareRejection;

/// Per-route middleware.
///
/// `before` runs after the request is fully populated (params, query, body)
/// and before the handler. Returning `Err` rejects the request: the handler
/// is never invoked and the client receives a generic 500. `after` runs once
/// the handler has replied and may adjust the response.
pub trait Middleware: Send + Sync {
    fn before(&self, _req: &mut HandlerRequest) -> Result<(), MiddlewareRejection> {
        Ok(())
    }

    fn after(&self, _req: &HandlerRequest, _res: &mut HandlerResponse, _latency: Duration) {}
}
