use std::time::Duration;

use tracing::{debug, info};

use super::Middleware;
use crate::dispatcher::{HandlerRequest, HandlerResponse};
use crate::error::MiddlewareRejection;

/// Logs every request it wraps: a debug line on entry and an info line with
/// status and latency once the handler has replied.
pub struct RequestLogger;

impl Middleware for RequestLogger {
    fn before(&self, req: &mut HandlerRequest) -> Result<(), MiddlewareRejection> {
        debug!(
            request_id = %req.request_id,
            method = %req.method,
            path = %req.path,
            "request accepted"
        );
        Ok(())
    }

    fn after(&self, req: &HandlerRequest, res: &mut HandlerResponse, latency: Duration) {
        info!(
            request_id = %req.request_id,
            method = %req.method,
            path = %req.path,
            status = res.status,
            latency_ms = latency.as_millis() as u64,
            "request completed"
        );
    }
}
