//! Specifier resolution and resource loading.
//!
//! The bundler core never touches the filesystem directly; it goes through
//! the [`Resolve`] and [`Load`] traits. The default implementations are
//! lexical filesystem-relative resolution and plain file reads. An in-memory
//! loader is provided for tests and embedders that already hold the sources.

use std::collections::HashMap;
use std::fs;
use std::io;

use crate::error::{BundleError, BundleResult};

/// Maps a textual import specifier plus the referrer's directory to a
/// canonical module location.
///
/// Must be deterministic for equal inputs. Two specifiers that denote the
/// same module must resolve to equal locations; the loader deduplicates on
/// the resolved string.
pub trait Resolve {
    fn resolve(&self, specifier: &str, referrer_dir: &str) -> BundleResult<String>;
}

/// Produces the source text for a canonical module location.
pub trait Load {
    fn load(&self, location: &str) -> BundleResult<String>;
}

/// Lexical filesystem-relative resolver.
///
/// Relative specifiers are joined onto the referrer directory and `.` / `..`
/// segments are collapsed without consulting the filesystem. A specifier
/// whose final segment has no extension gets `.js` appended, so `./util`
/// and `./util.js` name the same module.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileSystemResolver;

impl Resolve for FileSystemResolver {
    fn resolve(&self, specifier: &str, referrer_dir: &str) -> BundleResult<String> {
        let joined = if specifier.starts_with('/') || referrer_dir.is_empty() {
            specifier.to_string()
        } else {
            format!("{}/{}", referrer_dir.trim_end_matches('/'), specifier)
        };
        Ok(with_default_extension(normalize(&joined)))
    }
}

/// Loader that reads module sources from the filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileLoader;

impl Load for FileLoader {
    fn load(&self, location: &str) -> BundleResult<String> {
        fs::read_to_string(location).map_err(|e| BundleError::load(location, e))
    }
}

/// Loader backed by an in-memory map of location to source.
#[derive(Debug, Default, Clone)]
pub struct MemoryLoader {
    modules: HashMap<String, String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module source under a canonical location.
    pub fn insert(&mut self, location: impl Into<String>, source: impl Into<String>) {
        self.modules.insert(location.into(), source.into());
    }
}

impl Load for MemoryLoader {
    fn load(&self, location: &str) -> BundleResult<String> {
        self.modules.get(location).cloned().ok_or_else(|| {
            BundleError::load(
                location,
                io::Error::new(io::ErrorKind::NotFound, "no such module"),
            )
        })
    }
}

/// Directory of a location, up to and including the final `/`.
///
/// Matches the `file.slice(0, file.lastIndexOf("/") + 1)` computation the
/// emitted harness performs for `__dirname`.
pub fn parent_dir(location: &str) -> &str {
    match location.rfind('/') {
        Some(idx) => &location[..=idx],
        None => "",
    }
}

/// Collapse `.` and `..` segments, `/`-separated, purely lexically.
fn normalize(path: &str) -> String {
    let absolute = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if matches!(parts.last(), Some(&last) if last != "..") {
                    parts.pop();
                } else if !absolute {
                    parts.push("..");
                }
            }
            other => parts.push(other),
        }
    }
    let joined = parts.join("/");
    if absolute {
        format!("/{joined}")
    } else {
        joined
    }
}

fn with_default_extension(location: String) -> String {
    let file = match location.rfind('/') {
        Some(idx) => &location[idx + 1..],
        None => &location,
    };
    if file.is_empty() || file.contains('.') {
        location
    } else {
        format!("{location}.js")
    }
}
