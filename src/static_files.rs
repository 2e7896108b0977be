//! Static-asset collaborator.
//!
//! Requests under the configured asset prefix bypass routing entirely and
//! are answered from disk, bytes passed through verbatim. Path resolution
//! refuses every component that could escape the root.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
}

impl StaticFiles {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, url_path: &str) -> Option<PathBuf> {
        let mut full = self.root.clone();
        for comp in Path::new(url_path.trim_start_matches('/')).components() {
            match comp {
                Component::Normal(part) => full.push(part),
                Component::CurDir => {}
                // `..`, drive prefixes, a second root: refuse outright.
                _ => return None,
            }
        }
        Some(full)
    }

    fn content_type(path: &Path) -> &'static str {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase()
            .as_str()
        {
            "html" => "text/html",
            "css" => "text/css",
            "js" => "application/javascript",
            "json" => "application/json",
            "txt" => "text/plain",
            "svg" => "image/svg+xml",
            "png" => "image/png",
            "ico" => "image/x-icon",
            _ => "application/octet-stream",
        }
    }

    /// Load the file `url_path` maps to beneath the root, returning its
    /// bytes and extension-derived content type.
    pub fn load(&self, url_path: &str) -> io::Result<(Vec<u8>, &'static str)> {
        let path = self.resolve(url_path).ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "path escapes the asset root")
        })?;
        if !path.is_file() {
            return Err(io::Error::new(io::ErrorKind::NotFound, "file not found"));
        }
        let bytes = fs::read(&path)?;
        Ok((bytes, Self::content_type(&path)))
    }
}
