//! Request dispatch.
//!
//! Each registered `(pattern, method)` pair is backed by a long-lived
//! coroutine that drains an mpsc channel of [`HandlerRequest`]s and replies
//! over a per-request channel. The [`Dispatcher`] drives the lifecycle:
//!
//! 1. scan the route table in registration order (first match with the
//!    requested method wins; no match is a 404 naming the path)
//! 2. extract path parameters and decode the query (malformed → 400)
//! 3. attach the body per the configured parse mode (malformed JSON → 400)
//! 4. run the route's middleware, if any (rejection → 500, handler skipped)
//! 5. send to the handler coroutine and wait for the reply (handler error,
//!    panic, or a dead channel → generic 500)
//!
//! For a single request, body buffering strictly precedes the middleware,
//! which strictly precedes the handler. Requests are independent of each
//! other; the only shared state is the frozen route table.

mod core;

pub use self::core::{
    Dispatcher, HandlerRequest, HandlerResponse, HandlerResult, HandlerSender, ResponseBody,
};
pub(crate) use self::core::spawn_handler;
