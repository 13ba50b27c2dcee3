//! ESM-to-function-body lowering.
//!
//! Rewrites every `import` / `export` declaration of a module into plain
//! statements over the `module` / `exports` pair and the ambient `require`
//! of the emitted harness, so the module body can run as
//! `function (module, exports, __dirname, __filename) { ... }`.
//!
//! ```javascript
//! // Before:                          // After:
//! import x from "2";                  var x = require("2", module).default;
//! export var y = x + 1;               var y = x + 1;
//!                                     exports.y = y;
//! ```
//!
//! Import bindings are hoisted to the top of the body (after the directive
//! prologue); export assignments stay at the position of the original export
//! item so a cyclic partner reading the cache mid-evaluation observes every
//! export made so far. Because exports are plain property writes evaluated
//! once, live bindings degrade to value snapshots; modules that reassign an
//! exported `let` after the fact will not propagate the new value.

use swc_ecma_ast::*;

use crate::ast;
use crate::rewrite::str_value;

/// Names introduced by the `export * from` expansion. Function-scoped `var`s,
/// so they redeclare harmlessly across multiple `export *` items and are
/// shadowable by module code.
const STAR_TMP: &str = "star$";
const STAR_KEY: &str = "key$";

/// Lower a module into the statement list of its registry function body.
///
/// The input must already have its specifiers rewritten to module ids. The
/// output contains no `import` or `export` forms of any kind.
pub fn lower_module(module: Module) -> Vec<Stmt> {
    let mut directives = Vec::new();
    let mut imports = Vec::new();
    let mut body = Vec::new();
    let mut in_prologue = true;

    for item in module.body {
        if in_prologue {
            match item {
                ModuleItem::Stmt(stmt) if is_directive(&stmt) => {
                    directives.push(stmt);
                    continue;
                }
                _ => in_prologue = false,
            }
        }
        match item {
            ModuleItem::ModuleDecl(decl) => lower_decl(decl, &mut imports, &mut body),
            ModuleItem::Stmt(stmt) => body.push(stmt),
        }
    }

    directives
        .into_iter()
        .chain(imports)
        .chain(body)
        .collect()
}

fn is_directive(stmt: &Stmt) -> bool {
    matches!(
        stmt,
        Stmt::Expr(ExprStmt { expr, .. }) if matches!(&**expr, Expr::Lit(Lit::Str(_)))
    )
}

/// `require("<id>", module)`, the exports object of the referenced module.
fn require_call(id: &str) -> Expr {
    ast::call(
        ast::ident_expr("require"),
        vec![ast::str_lit(id), ast::ident_expr("module")],
    )
}

/// `exports.<name> = value;`
fn export_assign(name: &str, value: Expr) -> Stmt {
    ast::expr_stmt(ast::assign(
        ast::member_or_indexed(ast::ident_expr("exports"), name),
        value,
    ))
}

fn export_name(name: &ModuleExportName) -> String {
    match name {
        ModuleExportName::Ident(id) => id.sym.as_str().to_string(),
        ModuleExportName::Str(s) => str_value(s),
    }
}

fn lower_decl(decl: ModuleDecl, imports: &mut Vec<Stmt>, body: &mut Vec<Stmt>) {
    match decl {
        ModuleDecl::Import(import) => lower_import(import, imports),
        ModuleDecl::ExportDecl(export) => lower_export_decl(export.decl, body),
        ModuleDecl::ExportDefaultExpr(export) => {
            body.push(export_assign("default", *export.expr));
        }
        ModuleDecl::ExportDefaultDecl(export) => lower_export_default_decl(export.decl, body),
        ModuleDecl::ExportNamed(export) => lower_export_named(export, body),
        ModuleDecl::ExportAll(export) => lower_export_all(&export, body),
        // TypeScript-only forms; unreachable under plain ES syntax.
        _ => {}
    }
}

fn lower_import(import: ImportDecl, imports: &mut Vec<Stmt>) {
    let id = str_value(&import.src);

    if import.specifiers.is_empty() {
        // import "id" is evaluated for effect only.
        imports.push(ast::expr_stmt(require_call(&id)));
        return;
    }

    for specifier in import.specifiers {
        match specifier {
            ImportSpecifier::Default(default) => {
                imports.push(ast::var_stmt(
                    default.local.sym.as_str(),
                    Some(ast::member(require_call(&id), "default")),
                ));
            }
            ImportSpecifier::Named(named) => {
                let imported = named
                    .imported
                    .as_ref()
                    .map(export_name)
                    .unwrap_or_else(|| named.local.sym.as_str().to_string());
                imports.push(ast::var_stmt(
                    named.local.sym.as_str(),
                    Some(ast::member_or_indexed(require_call(&id), &imported)),
                ));
            }
            ImportSpecifier::Namespace(ns) => {
                imports.push(ast::var_stmt(ns.local.sym.as_str(), Some(require_call(&id))));
            }
        }
    }
}

fn lower_export_decl(decl: Decl, body: &mut Vec<Stmt>) {
    let mut names = Vec::new();
    match &decl {
        Decl::Var(var) => {
            for declarator in &var.decls {
                collect_pattern_names(&declarator.name, &mut names);
            }
        }
        Decl::Fn(f) => names.push(f.ident.sym.as_str().to_string()),
        Decl::Class(c) => names.push(c.ident.sym.as_str().to_string()),
        _ => {}
    }
    body.push(Stmt::Decl(decl));
    for name in names {
        body.push(export_assign(&name, ast::ident_expr(&name)));
    }
}

fn lower_export_default_decl(decl: DefaultDecl, body: &mut Vec<Stmt>) {
    match decl {
        DefaultDecl::Fn(f) => match f.ident {
            // A named default function keeps its declaration (and its
            // hoisting within the module body).
            Some(ident) => {
                let name = ident.sym.as_str().to_string();
                body.push(Stmt::Decl(Decl::Fn(FnDecl {
                    ident,
                    declare: false,
                    function: f.function,
                })));
                body.push(export_assign("default", ast::ident_expr(&name)));
            }
            None => {
                body.push(export_assign(
                    "default",
                    Expr::Fn(FnExpr {
                        ident: None,
                        function: f.function,
                    }),
                ));
            }
        },
        DefaultDecl::Class(c) => match c.ident {
            Some(ident) => {
                let name = ident.sym.as_str().to_string();
                body.push(Stmt::Decl(Decl::Class(ClassDecl {
                    ident,
                    declare: false,
                    class: c.class,
                })));
                body.push(export_assign("default", ast::ident_expr(&name)));
            }
            None => {
                body.push(export_assign(
                    "default",
                    Expr::Class(ClassExpr {
                        ident: None,
                        class: c.class,
                    }),
                ));
            }
        },
        DefaultDecl::TsInterfaceDecl(_) => {}
    }
}

fn lower_export_named(export: NamedExport, body: &mut Vec<Stmt>) {
    match &export.src {
        // export { a, b as c } from "id" / export * as ns from "id"
        Some(src) => {
            let id = str_value(src);
            for specifier in &export.specifiers {
                match specifier {
                    ExportSpecifier::Named(named) => {
                        let orig = export_name(&named.orig);
                        let exported = named
                            .exported
                            .as_ref()
                            .map(export_name)
                            .unwrap_or_else(|| orig.clone());
                        body.push(export_assign(
                            &exported,
                            ast::member_or_indexed(require_call(&id), &orig),
                        ));
                    }
                    ExportSpecifier::Namespace(ns) => {
                        body.push(export_assign(&export_name(&ns.name), require_call(&id)));
                    }
                    ExportSpecifier::Default(_) => {
                        body.push(export_assign(
                            "default",
                            ast::member(require_call(&id), "default"),
                        ));
                    }
                }
            }
        }
        // export { a, b as c } over local bindings
        None => {
            for specifier in &export.specifiers {
                if let ExportSpecifier::Named(named) = specifier {
                    let orig = export_name(&named.orig);
                    let exported = named
                        .exported
                        .as_ref()
                        .map(export_name)
                        .unwrap_or_else(|| orig.clone());
                    body.push(export_assign(&exported, ast::ident_expr(&orig)));
                }
            }
        }
    }
}

/// export * from "id"
///
/// ```javascript
/// var star$ = require("id", module);
/// for (var key$ in star$)
///     if ({}.hasOwnProperty.call(star$, key$) && key$ !== "default")
///         exports[key$] = star$[key$];
/// ```
///
/// Own-property and `default` filtering per the ESM `export *` contract.
fn lower_export_all(export: &ExportAll, body: &mut Vec<Stmt>) {
    let id = str_value(&export.src);
    body.push(ast::var_stmt(STAR_TMP, Some(require_call(&id))));

    let own = ast::call(
        ast::member(ast::member(ast::empty_object(), "hasOwnProperty"), "call"),
        vec![ast::ident_expr(STAR_TMP), ast::ident_expr(STAR_KEY)],
    );
    let not_default = ast::bin(
        BinaryOp::NotEqEq,
        ast::ident_expr(STAR_KEY),
        ast::str_lit("default"),
    );
    let copy = ast::expr_stmt(ast::assign(
        ast::computed_member(ast::ident_expr("exports"), ast::ident_expr(STAR_KEY)),
        ast::computed_member(ast::ident_expr(STAR_TMP), ast::ident_expr(STAR_KEY)),
    ));
    body.push(ast::for_in_stmt(
        STAR_KEY,
        ast::ident_expr(STAR_TMP),
        ast::if_stmt(ast::bin(BinaryOp::LogicalAnd, own, not_default), copy),
    ));
}

/// Every name bound by a binding pattern, destructuring included.
fn collect_pattern_names(pat: &Pat, names: &mut Vec<String>) {
    match pat {
        Pat::Ident(ident) => names.push(ident.sym.as_str().to_string()),
        Pat::Object(obj) => {
            for prop in &obj.props {
                match prop {
                    ObjectPatProp::KeyValue(kv) => collect_pattern_names(&kv.value, names),
                    ObjectPatProp::Assign(assign) => {
                        names.push(assign.key.sym.as_str().to_string());
                    }
                    ObjectPatProp::Rest(rest) => collect_pattern_names(&rest.arg, names),
                }
            }
        }
        Pat::Array(arr) => {
            for elem in arr.elems.iter().flatten() {
                collect_pattern_names(elem, names);
            }
        }
        Pat::Rest(rest) => collect_pattern_names(&rest.arg, names),
        Pat::Assign(assign) => collect_pattern_names(&assign.left, names),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::script_to_string;
    use crate::parse::parse_module;
    use swc_common::DUMMY_SP;

    fn lower_to_js(source: &str) -> String {
        let module = parse_module(source, "/test.js").unwrap();
        let script = Script {
            span: DUMMY_SP,
            body: lower_module(module),
            shebang: None,
        };
        script_to_string(&script).unwrap()
    }

    #[test]
    fn test_import_default() {
        let js = lower_to_js(r#"import foo from "2";"#);
        assert!(js.contains(r#"var foo = require("2", module).default;"#));
    }

    #[test]
    fn test_import_named_with_alias() {
        let js = lower_to_js(r#"import { a, b as c } from "2";"#);
        assert!(js.contains(r#"var a = require("2", module).a;"#));
        assert!(js.contains(r#"var c = require("2", module).b;"#));
    }

    #[test]
    fn test_import_namespace() {
        let js = lower_to_js(r#"import * as ns from "2";"#);
        assert!(js.contains(r#"var ns = require("2", module);"#));
    }

    #[test]
    fn test_import_for_effect() {
        let js = lower_to_js(r#"import "2";"#);
        assert!(js.contains(r#"require("2", module);"#));
        assert!(!js.contains("var"));
    }

    #[test]
    fn test_imports_hoisted_above_statements() {
        let js = lower_to_js(
            r#"
            var first = 1;
            import foo from "2";
            "#,
        );
        let import_at = js.find("var foo").unwrap();
        let stmt_at = js.find("var first").unwrap();
        assert!(import_at < stmt_at);
    }

    #[test]
    fn test_directive_stays_first() {
        let js = lower_to_js(
            r#""use strict";
            import foo from "2";
            foo();
            "#,
        );
        assert!(js.trim_start().starts_with(r#""use strict";"#));
    }

    #[test]
    fn test_export_default_expr_in_place() {
        let js = lower_to_js("export default 42;");
        assert!(js.contains("exports.default = 42;"));
    }

    #[test]
    fn test_export_default_named_function() {
        let js = lower_to_js("export default function f() { return 9; }");
        assert!(js.contains("function f()"));
        assert!(js.contains("exports.default = f;"));
    }

    #[test]
    fn test_export_default_anonymous_function() {
        let js = lower_to_js("export default function () { return 9; }");
        assert!(js.contains("exports.default = function"));
    }

    #[test]
    fn test_export_var() {
        let js = lower_to_js("export var y = 7;");
        assert!(js.contains("var y = 7;"));
        assert!(js.contains("exports.y = y;"));
    }

    #[test]
    fn test_export_const_destructuring() {
        let js = lower_to_js("export const { a, b: renamed } = obj;");
        assert!(js.contains("exports.a = a;"));
        assert!(js.contains("exports.renamed = renamed;"));
    }

    #[test]
    fn test_export_function_and_class() {
        let js = lower_to_js(
            r#"
            export function f() {}
            export class C {}
            "#,
        );
        assert!(js.contains("exports.f = f;"));
        assert!(js.contains("exports.C = C;"));
    }

    #[test]
    fn test_export_named_local_with_alias() {
        let js = lower_to_js("var a = 1, b = 2; export { a, b as c };");
        assert!(js.contains("exports.a = a;"));
        assert!(js.contains("exports.c = b;"));
    }

    #[test]
    fn test_export_named_from() {
        let js = lower_to_js(r#"export { y as z } from "2";"#);
        assert!(js.contains(r#"exports.z = require("2", module).y;"#));
        assert!(!js.contains("exports.y"));
    }

    #[test]
    fn test_export_namespace_from() {
        let js = lower_to_js(r#"export * as ns from "2";"#);
        assert!(js.contains(r#"exports.ns = require("2", module);"#));
    }

    #[test]
    fn test_export_all_skips_default() {
        let js = lower_to_js(r#"export * from "2";"#);
        assert!(js.contains(r#"var star$ = require("2", module);"#));
        assert!(js.contains("for (var key$ in star$)"));
        assert!(js.contains(r#"key$ !== "default""#));
        assert!(js.contains("hasOwnProperty"));
    }

    #[test]
    fn test_export_string_name_uses_computed_member() {
        let js = lower_to_js(r#"var a = 1; export { a as "not ident" };"#);
        assert!(js.contains(r#"exports["not ident"] = a;"#));
    }

    #[test]
    fn test_no_module_decls_survive() {
        let source = r#"
            import a from "2";
            export { b } from "3";
            export * from "4";
            export default a;
        "#;
        let module = parse_module(source, "/test.js").unwrap();
        // Vec<Stmt> by type: nothing import/export-shaped can remain.
        // import -> 1, export-from -> 1, export * -> 2, default -> 1.
        let stmts = lower_module(module);
        assert_eq!(stmts.len(), 5);
    }

    #[test]
    fn test_plain_statements_kept_in_order() {
        let js = lower_to_js("var a = 1; a += 1; export default a;");
        let a_decl = js.find("var a = 1;").unwrap();
        let bump = js.find("a += 1;").unwrap();
        let def = js.find("exports.default = a;").unwrap();
        assert!(a_decl < bump && bump < def);
    }
}
