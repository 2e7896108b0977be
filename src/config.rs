//! Application configuration.
//!
//! All of this is write-once: an [`AppConfig`] is handed to
//! [`App::builder`](crate::app::App::builder) and frozen into the service at
//! build time, so concurrent dispatch reads it without synchronization.
//!
//! The handler coroutine stack size is the one runtime knob read from the
//! environment:
//!
//! - `PRESTO_STACK_SIZE` - decimal (`16384`) or hex (`0x4000`), default 16 KiB.

use std::env;
use std::path::PathBuf;

use crate::views::ViewEngineConfig;

/// How request bodies are attached to [`HandlerRequest`](crate::dispatcher::HandlerRequest).
///
/// In `Json` mode an empty body becomes `{}` and a malformed body is a 400;
/// in `Raw` mode the body text passes through untouched as a JSON string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyParseMode {
    #[default]
    Json,
    Raw,
}

pub const DEFAULT_MAX_BODY_BYTES: usize = 1 << 20;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Request paths beginning with this prefix bypass routing and are
    /// served from `assets_root`.
    pub assets_prefix: String,
    /// Directory the asset prefix maps into. The full request path (prefix
    /// included) is resolved beneath it.
    pub assets_root: PathBuf,
    pub body_parse: BodyParseMode,
    /// Upper bound on buffered request bodies; overflow answers 413.
    pub max_body_bytes: usize,
    /// Optional view engine; validated at configuration time.
    pub view_engine: Option<ViewEngineConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            assets_prefix: "/public".to_string(),
            assets_root: PathBuf::from("."),
            body_parse: BodyParseMode::Json,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            view_engine: None,
        }
    }
}

/// Stack size for handler coroutines, from `PRESTO_STACK_SIZE`.
#[must_use]
pub fn stack_size_from_env() -> usize {
    match env::var("PRESTO_STACK_SIZE") {
        Ok(val) => {
            if let Some(hex) = val.strip_prefix("0x") {
                usize::from_str_radix(hex, 16).unwrap_or(0x4000)
            } else {
                val.parse().unwrap_or(0x4000)
            }
        }
        Err(_) => 0x4000,
    }
}
