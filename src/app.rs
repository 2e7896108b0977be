//! Application assembly.
//!
//! Routes are registered on an [`AppBuilder`] - one call per HTTP verb, with
//! middleware as an explicit `Option` rather than inferred from arity - and
//! the builder is then frozen into an [`App`]. Registration must finish
//! before [`App::listen`] opens the socket; after that the route table is
//! shared read-only across all connection coroutines.

use std::sync::Arc;

use http::Method;
use tracing::info;

use crate::config::{stack_size_from_env, AppConfig};
use crate::dispatcher::{spawn_handler, Dispatcher, HandlerRequest, HandlerResult};
use crate::error::{ConfigError, RouteError};
use crate::middleware::Middleware;
use crate::router::RouteTable;
use crate::server::{AppService, HttpServer, ServerHandle};
use crate::static_files::StaticFiles;
use crate::views::ViewEngine;

/// Handler stored by [`RouteGroup`] before its prefix is known.
pub type BoxedHandler = Box<dyn Fn(HandlerRequest) -> HandlerResult + Send>;

pub struct AppBuilder {
    config: AppConfig,
    table: RouteTable,
    views: Option<Arc<ViewEngine>>,
    stack_size: usize,
}

pub struct App {
    service: AppService,
}

impl App {
    /// Validate `config` and start collecting routes.
    ///
    /// View-engine validation happens here: an unsupported engine name or a
    /// missing template directory never survives to render time.
    pub fn builder(config: AppConfig) -> Result<AppBuilder, ConfigError> {
        let views = match &config.view_engine {
            Some(view_config) => Some(Arc::new(ViewEngine::from_config(view_config)?)),
            None => None,
        };
        Ok(AppBuilder {
            config,
            table: RouteTable::new(),
            views,
            stack_size: stack_size_from_env(),
        })
    }

    #[must_use]
    pub fn service(&self) -> &AppService {
        &self.service
    }

    /// Bind `addr` and serve until the returned handle is stopped.
    pub fn listen<A: std::net::ToSocketAddrs>(&self, addr: A) -> std::io::Result<ServerHandle> {
        let handle = HttpServer(self.service.clone()).start(addr)?;
        info!(addr = %handle.addr(), routes = self.service.dispatcher.table().len(), "listening");
        Ok(handle)
    }
}

impl AppBuilder {
    /// Register `handler` for `method` on `pattern`, spawning its backing
    /// coroutine. Re-registering the same `(pattern, method)` replaces the
    /// handler without touching sibling methods.
    pub fn route<F>(
        &mut self,
        method: Method,
        pattern: &str,
        middleware: Option<Arc<dyn Middleware>>,
        handler: F,
    ) -> Result<(), RouteError>
    where
        F: Fn(HandlerRequest) -> HandlerResult + Send + 'static,
    {
        let sender = spawn_handler(pattern, &method, self.stack_size, handler);
        self.table.register(pattern, method, middleware, sender)
    }

    pub fn get<F>(
        &mut self,
        pattern: &str,
        middleware: Option<Arc<dyn Middleware>>,
        handler: F,
    ) -> Result<(), RouteError>
    where
        F: Fn(HandlerRequest) -> HandlerResult + Send + 'static,
    {
        self.route(Method::GET, pattern, middleware, handler)
    }

    pub fn post<F>(
        &mut self,
        pattern: &str,
        middleware: Option<Arc<dyn Middleware>>,
        handler: F,
    ) -> Result<(), RouteError>
    where
        F: Fn(HandlerRequest) -> HandlerResult + Send + 'static,
    {
        self.route(Method::POST, pattern, middleware, handler)
    }

    pub fn put<F>(
        &mut self,
        pattern: &str,
        middleware: Option<Arc<dyn Middleware>>,
        handler: F,
    ) -> Result<(), RouteError>
    where
        F: Fn(HandlerRequest) -> HandlerResult + Send + 'static,
    {
        self.route(Method::PUT, pattern, middleware, handler)
    }

    pub fn delete<F>(
        &mut self,
        pattern: &str,
        middleware: Option<Arc<dyn Middleware>>,
        handler: F,
    ) -> Result<(), RouteError>
    where
        F: Fn(HandlerRequest) -> HandlerResult + Send + 'static,
    {
        self.route(Method::DELETE, pattern, middleware, handler)
    }

    /// Register every route in `group` under its prefix.
    pub fn mount(&mut self, group: RouteGroup) -> Result<(), RouteError> {
        let RouteGroup { prefix, routes } = group;
        for route in routes {
            let pattern = join_prefix(&prefix, &route.path);
            let sender = spawn_handler(&pattern, &route.method, self.stack_size, route.handler);
            self.table
                .register(&pattern, route.method, route.middleware, sender)?;
        }
        Ok(())
    }

    /// The configured view engine, for handlers that render templates.
    #[must_use]
    pub fn views(&self) -> Option<Arc<ViewEngine>> {
        self.views.clone()
    }

    /// Freeze the route table and assemble the application.
    #[must_use]
    pub fn build(self) -> App {
        let AppBuilder { config, table, .. } = self;
        let dispatcher = Arc::new(Dispatcher::new(table, config.body_parse));
        let assets = StaticFiles::new(config.assets_root.clone());
        App {
            service: AppService {
                dispatcher,
                config: Arc::new(config),
                assets,
            },
        }
    }
}

/// A set of routes registered together under a common prefix.
///
/// The prefix is prepended verbatim and a single trailing `/` is stripped
/// from the result, so `("/welcome", "/")` registers `/welcome` and
/// `("/welcome", "/home")` registers `/welcome/home`. An empty or `/`
/// prefix leaves paths untouched.
pub struct RouteGroup {
    prefix: String,
    routes: Vec<GroupRoute>,
}

struct GroupRoute {
    method: Method,
    path: String,
    middleware: Option<Arc<dyn Middleware>>,
    handler: BoxedHandler,
}

impl RouteGroup {
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            routes: Vec::new(),
        }
    }

    #[must_use]
    pub fn route<F>(
        mut self,
        method: Method,
        path: &str,
        middleware: Option<Arc<dyn Middleware>>,
        handler: F,
    ) -> Self
    where
        F: Fn(HandlerRequest) -> HandlerResult + Send + 'static,
    {
        self.routes.push(GroupRoute {
            method,
            path: path.to_string(),
            middleware,
            handler: Box::new(handler),
        });
        self
    }

    #[must_use]
    pub fn get<F>(
        self,
        path: &str,
        middleware: Option<Arc<dyn Middleware>>,
        handler: F,
    ) -> Self
    where
        F: Fn(HandlerRequest) -> HandlerResult + Send + 'static,
    {
        self.route(Method::GET, path, middleware, handler)
    }

    #[must_use]
    pub fn post<F>(
        self,
        path: &str,
        middleware: Option<Arc<dyn Middleware>>,
        handler: F,
    ) -> Self
    where
        F: Fn(HandlerRequest) -> HandlerResult + Send + 'static,
    {
        self.route(Method::POST, path, middleware, handler)
    }

    #[must_use]
    pub fn put<F>(
        self,
        path: &str,
        middleware: Option<Arc<dyn Middleware>>,
        handler: F,
    ) -> Self
    where
        F: Fn(HandlerRequest) -> HandlerResult + Send + 'static,
    {
        self.route(Method::PUT, path, middleware, handler)
    }

    #[must_use]
    pub fn delete<F>(
        self,
        path: &str,
        middleware: Option<Arc<dyn Middleware>>,
        handler: F,
    ) -> Self
    where
        F: Fn(HandlerRequest) -> HandlerResult + Send + 'static,
    {
        self.route(Method::DELETE, path, middleware, handler)
    }
}

fn join_prefix(prefix: &str, path: &str) -> String {
    if prefix.is_empty() || prefix == "/" {
        return path.to_string();
    }
    let joined = format!("{prefix}{path}");
    let trimmed = joined.strip_suffix('/').unwrap_or(&joined);
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}
