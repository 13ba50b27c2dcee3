//! The bundling entry points.

use std::path::Path;

use swc_ecma_ast::Script;
use tracing::debug;

use crate::error::BundleResult;
use crate::graph::ModuleGraph;
use crate::harness::emit_bundle;
use crate::loader::{FileLoader, FileSystemResolver, Load, Resolve};

/// Bundle the module at `entry` with the default filesystem resolver and
/// loader.
pub fn bundle(entry: impl AsRef<Path>) -> BundleResult<Script> {
    bundle_with(entry, &FileSystemResolver, &FileLoader)
}

/// Bundle the module at `entry` with injected resolver and loader.
pub fn bundle_with(
    entry: impl AsRef<Path>,
    resolver: &dyn Resolve,
    loader: &dyn Load,
) -> BundleResult<Script> {
    let location = location_of(entry.as_ref());
    let source = loader.load(&location)?;
    bundle_source(&source, &location, resolver, loader)
}

/// Bundle a module whose source is supplied directly; `entry` is the
/// location dependencies are resolved against.
pub fn bundle_string(
    source: &str,
    entry: impl AsRef<Path>,
    resolver: &dyn Resolve,
    loader: &dyn Load,
) -> BundleResult<Script> {
    bundle_source(source, &location_of(entry.as_ref()), resolver, loader)
}

fn bundle_source(
    source: &str,
    location: &str,
    resolver: &dyn Resolve,
    loader: &dyn Load,
) -> BundleResult<Script> {
    let graph = ModuleGraph::load(location, source, resolver, loader)?;
    debug!(entry = %location, modules = graph.len(), "dependency graph complete");
    let records = graph.into_records()?;
    Ok(emit_bundle(records))
}

fn location_of(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
