//! View-engine collaborator.
//!
//! Templates are plain files rendered with `minijinja`. The engine is
//! selected by name in the configuration; an unsupported name is a
//! configuration error raised when the application is built, long before any
//! `render` call.

use std::fs;
use std::path::{Component, Path, PathBuf};

use minijinja::Environment;
use serde_json::Value;

use crate::dispatcher::HandlerResponse;
use crate::error::{ConfigError, RenderError};

/// The engine name this build supports.
pub const SUPPORTED_ENGINE: &str = "minijinja";

/// View-engine descriptor: engine name plus the template directory.
#[derive(Debug, Clone)]
pub struct ViewEngineConfig {
    pub name: String,
    pub directory: PathBuf,
}

impl ViewEngineConfig {
    pub fn new(name: impl Into<String>, directory: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            directory: directory.into(),
        }
    }
}

/// File-backed template renderer.
#[derive(Debug, Clone)]
pub struct ViewEngine {
    directory: PathBuf,
}

impl ViewEngine {
    /// Validate the descriptor and build the engine. Fails fast on an
    /// unknown engine name or a missing template directory.
    pub fn from_config(config: &ViewEngineConfig) -> Result<Self, ConfigError> {
        if !config.name.eq_ignore_ascii_case(SUPPORTED_ENGINE) {
            return Err(ConfigError::UnsupportedViewEngine(config.name.clone()));
        }
        if !config.directory.is_dir() {
            return Err(ConfigError::MissingTemplateDir(config.directory.clone()));
        }
        Ok(Self {
            directory: config.directory.clone(),
        })
    }

    fn view_path(&self, view: &str) -> Option<PathBuf> {
        let mut full = self.directory.clone();
        for comp in Path::new(view).components() {
            match comp {
                Component::Normal(part) => full.push(part),
                Component::CurDir => {}
                _ => return None,
            }
        }
        Some(full)
    }

    /// Render the template file `view` with `ctx` into a `text/html`
    /// response.
    pub fn render(&self, view: &str, ctx: &Value) -> Result<HandlerResponse, RenderError> {
        let path = self
            .view_path(view)
            .ok_or_else(|| RenderError::InvalidViewPath(view.to_string()))?;
        if !path.is_file() {
            return Err(RenderError::ViewNotFound(view.to_string()));
        }
        let source = fs::read_to_string(&path).map_err(|source| RenderError::Io {
            view: view.to_string(),
            source,
        })?;

        let mut env = Environment::new();
        env.add_template(view, &source)?;
        let template = env.get_template(view)?;
        let html = template.render(ctx)?;
        Ok(HandlerResponse::html(200, html))
    }
}
