//! The route table.
//!
//! One entry per registered pattern, in registration order; each entry holds
//! the compiled matcher and a per-method record of handler channel plus
//! optional middleware. Lookup is a linear scan in registration order - the
//! first pattern that matches the path *and* carries the requested method
//! wins, even if a later pattern would match more specifically. This is a
//! deliberate first-registered-first-matched policy, not best-match.

use std::collections::HashMap;
use std::sync::Arc;

use http::Method;
use tracing::warn;

use super::pattern::{compile, CompiledPattern};
use crate::dispatcher::HandlerSender;
use crate::error::RouteError;
use crate::middleware::Middleware;

/// What one method slot of a route entry carries: the channel into the
/// handler coroutine and the optional per-route middleware.
pub struct MethodSlot {
    pub handler: HandlerSender,
    pub middleware: Option<Arc<dyn Middleware>>,
}

/// One registered pattern with its compiled matcher and method slots.
pub struct RouteEntry {
    pub pattern: String,
    pub matcher: CompiledPattern,
    pub methods: HashMap<Method, MethodSlot>,
}

/// A successful table lookup: the entry, the slot for the requested method,
/// and the captured path parameters.
pub struct TableMatch<'a> {
    pub entry: &'a RouteEntry,
    pub slot: &'a MethodSlot,
    pub params: HashMap<String, String>,
}

#[derive(Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
    by_pattern: HashMap<String, usize>,
}

impl RouteTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` (and optional `middleware`) for `(pattern, method)`.
    ///
    /// The pattern is compiled on first sight and the entry keeps its
    /// position in registration order. Registering an existing
    /// `(pattern, method)` pair replaces that slot only - sibling methods on
    /// the same pattern are untouched, and dropping the old sender retires
    /// its handler coroutine.
    pub fn register(
        &mut self,
        pattern: &str,
        method: Method,
        middleware: Option<Arc<dyn Middleware>>,
        handler: HandlerSender,
    ) -> Result<(), RouteError> {
        let idx = match self.by_pattern.get(pattern) {
            Some(&idx) => idx,
            None => {
                let matcher = compile(pattern)?;
                self.entries.push(RouteEntry {
                    pattern: pattern.to_string(),
                    matcher,
                    methods: HashMap::new(),
                });
                let idx = self.entries.len() - 1;
                self.by_pattern.insert(pattern.to_string(), idx);
                idx
            }
        };

        let entry = &mut self.entries[idx];
        if entry
            .methods
            .insert(method.clone(), MethodSlot { handler, middleware })
            .is_some()
        {
            warn!(
                pattern = %entry.pattern,
                method = %method,
                "replaced existing route registration"
            );
        }
        Ok(())
    }

    /// Entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &RouteEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Scan in registration order for the first entry whose matcher accepts
    /// `path` and whose record carries `method`.
    ///
    /// A path match without the requested method is not a verdict - later
    /// patterns may still carry it, so the scan continues.
    #[must_use]
    pub fn find(&self, method: &Method, path: &str) -> Option<TableMatch<'_>> {
        for entry in &self.entries {
            let Some(params) = entry.matcher.match_path(path) else {
                continue;
            };
            if let Some(slot) = entry.methods.get(method) {
                return Some(TableMatch {
                    entry,
                    slot,
                    params,
                });
            }
        }
        None
    }
}
