//! Path-pattern compilation.
//!
//! A pattern such as `/home/:id/:slug` compiles into an anchored regex with
//! one positional capture group per `:param`. Parameter names are kept in an
//! ordered side list instead of regex named groups, so captures zip back to
//! names at match time.

use regex::Regex;
use std::collections::HashMap;

use crate::error::RouteError;

/// A compiled, anchored matcher for one path pattern.
///
/// Compilation is a pure function of the pattern string; the table caches
/// the result at registration and reuses it for every request.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: String,
    regex: Regex,
    params: Vec<String>,
}

fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Compile `pattern` into a [`CompiledPattern`].
///
/// Literal characters are escaped so that `/v1.0/users` matches only itself.
/// A `:` introduces a parameter consuming the maximal run of word
/// characters; each parameter matches `[0-9A-Za-z_]+` and therefore cannot
/// span a `/`. Empty and duplicate parameter names are registration errors.
pub fn compile(pattern: &str) -> Result<CompiledPattern, RouteError> {
    if pattern.is_empty() {
        return Err(RouteError::EmptyPattern);
    }
    if !pattern.starts_with('/') {
        return Err(RouteError::MissingLeadingSlash(pattern.to_string()));
    }

    let mut regex_src = String::with_capacity(pattern.len() + 8);
    regex_src.push('^');
    let mut params: Vec<String> = Vec::new();
    let mut literal = String::new();
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        if c == ':' {
            let mut name = String::new();
            while let Some(&next) = chars.peek() {
                if !is_word(next) {
                    break;
                }
                name.push(next);
                chars.next();
            }
            if name.is_empty() {
                return Err(RouteError::EmptyParamName(pattern.to_string()));
            }
            if params.contains(&name) {
                return Err(RouteError::DuplicateParam {
                    pattern: pattern.to_string(),
                    name,
                });
            }
            if !literal.is_empty() {
                regex_src.push_str(&regex::escape(&literal));
                literal.clear();
            }
            regex_src.push_str("([0-9A-Za-z_]+)");
            params.push(name);
        } else {
            literal.push(c);
        }
    }
    if !literal.is_empty() {
        regex_src.push_str(&regex::escape(&literal));
    }
    regex_src.push('$');

    let regex = Regex::new(&regex_src).expect("escaped pattern must compile");
    Ok(CompiledPattern {
        source: pattern.to_string(),
        regex,
        params,
    })
}

impl CompiledPattern {
    /// The pattern string this matcher was compiled from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Declared parameter names, in pattern order.
    #[must_use]
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Match `path` in full (both ends anchored) and return the captured
    /// parameters, or `None` when the path does not match.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<HashMap<String, String>> {
        let caps = self.regex.captures(path)?;
        let mut out = HashMap::with_capacity(self.params.len());
        for (name, capture) in self.params.iter().zip(caps.iter().skip(1).flatten()) {
            out.insert(name.clone(), capture.as_str().to_string());
        }
        Some(out)
    }
}
