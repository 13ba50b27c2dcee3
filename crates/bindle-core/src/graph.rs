//! Module dependency graph.
//!
//! Breadth-first discovery of every module statically reachable from the
//! entry. Each loaded module is parsed and has its specifiers canonicalized
//! before it is stored, so the graph is keyed by canonical location and
//! deduplicates modules whose specifiers differ only by relative path.
//! Cycles terminate through the membership check; they need no breaking at
//! runtime because the emitted `require` publishes `module.exports` to its
//! cache before running the module body.

use std::collections::{HashMap, VecDeque};

use swc_ecma_ast::{Module, ModuleDecl, ModuleItem};
use tracing::debug;

use crate::error::{BundleError, BundleResult};
use crate::loader::{Load, Resolve, parent_dir};
use crate::parse::parse_module;
use crate::rewrite::{resolve_specifiers, rewrite_specifiers, str_value};

/// A module ready for emission: canonical location, assigned id, and the
/// AST with all specifiers rewritten to ids.
#[derive(Debug)]
pub struct ModuleRecord {
    pub location: String,
    pub id: String,
    pub module: Module,
}

/// Insertion-ordered map of canonical location to resolved module AST.
///
/// Iteration order is BFS discovery order with the entry module first; that
/// order is what makes id assignment and emission reproducible.
#[derive(Debug)]
pub struct ModuleGraph {
    order: Vec<String>,
    modules: HashMap<String, Module>,
}

impl ModuleGraph {
    /// Load the entry module and every module it transitively references.
    ///
    /// The entry source is supplied by the caller (it may not exist on any
    /// filesystem); everything else goes through the loader. Any parse,
    /// load or resolution failure aborts the traversal; no partial graph
    /// escapes.
    pub fn load(
        entry_location: &str,
        entry_source: &str,
        resolver: &dyn Resolve,
        loader: &dyn Load,
    ) -> BundleResult<Self> {
        let mut entry = parse_module(entry_source, entry_location)?;
        resolve_specifiers(&mut entry, parent_dir(entry_location), resolver)?;

        let mut graph = Self {
            order: Vec::new(),
            modules: HashMap::new(),
        };
        graph.insert(entry_location.to_string(), entry);

        let mut queue = VecDeque::from([entry_location.to_string()]);
        while let Some(location) = queue.pop_front() {
            for dep in graph.direct_dependencies(&location) {
                if graph.modules.contains_key(&dep) {
                    continue;
                }
                debug!(location = %dep, referrer = %location, "loading module");
                let source = loader.load(&dep)?;
                let mut module = parse_module(&source, &dep)?;
                resolve_specifiers(&mut module, parent_dir(&dep), resolver)?;
                graph.insert(dep.clone(), module);
                queue.push_back(dep);
            }
        }

        Ok(graph)
    }

    fn insert(&mut self, location: String, module: Module) {
        self.order.push(location.clone());
        self.modules.insert(location, module);
    }

    fn direct_dependencies(&self, location: &str) -> Vec<String> {
        self.modules
            .get(location)
            .map(|module| collect_direct_dependencies(module))
            .unwrap_or_default()
    }

    /// Number of modules in the graph.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Canonical locations in graph order (entry first).
    pub fn locations(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Assign module ids and rewrite every specifier to its id.
    ///
    /// Ids are decimal strings counting from `"1"` in graph order, so the
    /// entry module is always `"1"` and equal inputs produce equal output.
    /// Absolute locations never survive into the emitted script.
    pub fn into_records(mut self) -> BundleResult<Vec<ModuleRecord>> {
        let ids: HashMap<String, String> = self
            .order
            .iter()
            .enumerate()
            .map(|(index, location)| (location.clone(), (index + 1).to_string()))
            .collect();

        let mut records = Vec::with_capacity(self.order.len());
        for location in std::mem::take(&mut self.order) {
            let Some(mut module) = self.modules.remove(&location) else {
                continue;
            };
            rewrite_specifiers(&mut module, |specifier| {
                ids.get(specifier)
                    .cloned()
                    .ok_or_else(|| BundleError::resolve(specifier, &location))
            })?;
            let Some(id) = ids.get(&location).cloned() else {
                continue;
            };
            records.push(ModuleRecord {
                location,
                id,
                module,
            });
        }
        Ok(records)
    }
}

/// Specifiers of the statically-referencing forms of a module, in source
/// order: `import ... from`, `export { ... } from`, `export * from`. A local
/// `export { x }` contributes nothing.
pub fn collect_direct_dependencies(module: &Module) -> Vec<String> {
    let mut deps = Vec::new();
    let mut push = |specifier: String| {
        if !deps.contains(&specifier) {
            deps.push(specifier);
        }
    };
    for item in &module.body {
        match item {
            ModuleItem::ModuleDecl(ModuleDecl::Import(import)) => {
                push(str_value(&import.src));
            }
            ModuleItem::ModuleDecl(ModuleDecl::ExportNamed(export)) => {
                if let Some(src) = &export.src {
                    push(str_value(src));
                }
            }
            ModuleItem::ModuleDecl(ModuleDecl::ExportAll(export)) => {
                push(str_value(&export.src));
            }
            _ => {}
        }
    }
    deps
}
