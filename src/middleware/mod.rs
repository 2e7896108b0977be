//! Per-route middleware.
//!
//! A route's middleware is an explicit `Option<Arc<dyn Middleware>>` at
//! registration; absence means the dispatcher proceeds straight to the
//! handler. Rejection is an explicit `Err` value, not an unresolved
//! continuation.

mod core;
mod logging;

pub use self::core::Middleware;
pub use self::logging::RequestLogger;
