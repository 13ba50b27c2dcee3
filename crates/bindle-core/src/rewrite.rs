//! In-place rewriting of module specifiers.
//!
//! Specifiers appear on exactly three top-level forms: `import ... from`,
//! `export { ... } from` and `export * from`. The rewriter substitutes each
//! specifier through a caller-supplied rename function and leaves every
//! other node untouched. It runs twice per module: once to canonicalize
//! specifiers against the resolver, once to replace canonical locations
//! with short module ids.

use swc_ecma_ast::{ExportAll, ImportDecl, Module, NamedExport, Str};
use swc_ecma_visit::{VisitMut, VisitMutWith};

use crate::error::{BundleError, BundleResult};
use crate::loader::Resolve;

/// Read the value of a string literal.
pub(crate) fn str_value(s: &Str) -> String {
    s.value.as_str().to_string()
}

struct SpecifierRewriter<F> {
    rename: F,
    error: Option<BundleError>,
}

impl<F> SpecifierRewriter<F>
where
    F: FnMut(&str) -> BundleResult<String>,
{
    fn rewrite(&mut self, src: &mut Str) {
        if self.error.is_some() {
            return;
        }
        match (self.rename)(&str_value(src)) {
            Ok(renamed) => {
                src.value = renamed.into();
                src.raw = None;
            }
            Err(e) => self.error = Some(e),
        }
    }
}

impl<F> VisitMut for SpecifierRewriter<F>
where
    F: FnMut(&str) -> BundleResult<String>,
{
    fn visit_mut_import_decl(&mut self, node: &mut ImportDecl) {
        self.rewrite(&mut node.src);
    }

    fn visit_mut_named_export(&mut self, node: &mut NamedExport) {
        if let Some(src) = &mut node.src {
            self.rewrite(src);
        }
    }

    fn visit_mut_export_all(&mut self, node: &mut ExportAll) {
        self.rewrite(&mut node.src);
    }
}

/// Replace every module specifier with `rename(specifier)`.
///
/// Specifiers are visited in source order; the first rename failure aborts
/// the rewrite and is returned. The module may be left partially rewritten
/// in that case, which is fine because errors abort the whole bundle.
pub fn rewrite_specifiers<F>(module: &mut Module, rename: F) -> BundleResult<()>
where
    F: FnMut(&str) -> BundleResult<String>,
{
    let mut rewriter = SpecifierRewriter {
        rename,
        error: None,
    };
    module.visit_mut_with(&mut rewriter);
    match rewriter.error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Canonicalize every specifier in a module against the resolver.
///
/// `referrer_dir` is the directory containing the module being rewritten,
/// used to interpret relative specifiers.
pub fn resolve_specifiers(
    module: &mut Module,
    referrer_dir: &str,
    resolver: &dyn Resolve,
) -> BundleResult<()> {
    rewrite_specifiers(module, |specifier| {
        resolver.resolve(specifier, referrer_dir)
    })
}
