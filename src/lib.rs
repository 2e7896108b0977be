//! # presto
//!
//! **presto** is a minimal HTTP router and middleware dispatcher powered by
//! the [`may`] coroutine runtime. Routes are declared as path patterns with
//! named `:param` segments, registered per HTTP method with an optional
//! middleware, and dispatched to handler coroutines over channels.
//!
//! ## Architecture
//!
//! - **[`router`]** - pattern compilation and the registration-ordered route
//!   table (first registered pattern wins)
//! - **[`query`]** - strict query-string decoding with last-wins duplicates
//! - **[`dispatcher`]** - the request lifecycle: match, extract, middleware,
//!   handler, and the mapping of every failure class onto an HTTP response
//! - **[`middleware`]** - the per-route [`Middleware`](middleware::Middleware)
//!   trait and built-ins
//! - **[`server`]** - HTTP plumbing on top of `may_minihttp`
//! - **[`static_files`]** / **[`views`]** - the asset and template collaborators
//! - **[`app`]** - the application builder: register routes, freeze the
//!   table, listen
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use presto::{App, AppConfig, HandlerResponse, RequestLogger};
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut builder = App::builder(AppConfig::default())?;
//!     builder.get("/pets/:id", Some(Arc::new(RequestLogger)), |req| {
//!         Ok(HandlerResponse::json(
//!             200,
//!             serde_json::json!({ "id": req.params["id"] }),
//!         ))
//!     })?;
//!     let app = builder.build();
//!     let handle = app.listen("127.0.0.1:3000")?;
//!     handle.join().ok();
//!     Ok(())
//! }
//! ```
//!
//! The route table is built before the listening socket opens and is frozen
//! into an `Arc` at [`AppBuilder::build`](app::AppBuilder::build); dispatch
//! reads it concurrently without locks.

pub mod app;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod ids;
pub mod middleware;
pub mod query;
pub mod router;
pub mod server;
pub mod static_files;
pub mod views;

pub use app::{App, AppBuilder, RouteGroup};
pub use config::{AppConfig, BodyParseMode};
pub use dispatcher::{Dispatcher, HandlerRequest, HandlerResponse, HandlerResult, ResponseBody};
pub use error::{
    ConfigError, HandlerError, MiddlewareRejection, QueryDecodeError, RenderError, RequestError,
    RouteError,
};
pub use ids::RequestId;
pub use middleware::{Middleware, RequestLogger};
pub use router::{CompiledPattern, RouteTable};
pub use server::{AppService, HttpServer, ServerHandle};
pub use views::{ViewEngine, ViewEngineConfig};
