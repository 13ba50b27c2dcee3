//! Emission of the self-contained bundle script.
//!
//! The whole bundle is one expression statement:
//!
//! ```javascript
//! (function(global) {
//!     "use strict";
//!     function require(file, parentModule) { ... }
//!     require.modules = {};
//!     require.cache = {};
//!     require.resolve = function(file) { ... };
//!     require.define = function(file, fn) { require.modules[file] = fn; };
//!     require.define("1", function(module, exports, __dirname, __filename) { ... });
//!     ...
//!     return require("1");
//! }).call(this, this);
//! ```
//!
//! `require` publishes `module$.exports` to its cache before invoking the
//! module body, so cyclic imports observe the partially populated exports
//! object instead of recursing. Membership tests go through
//! `{}.hasOwnProperty.call` so a module that shadows `hasOwnProperty` on its
//! exports cannot confuse the harness. Module bodies are invoked with an
//! `undefined` receiver, preserving ESM's top-level `this`.

use swc_common::DUMMY_SP;
use swc_ecma_ast::*;

use crate::ast;
use crate::graph::ModuleRecord;
use crate::lower::lower_module;

/// Build the bundle script for a set of module records.
///
/// Records must be in graph order with the entry module first; one
/// `require.define` is emitted per record, in that order.
pub fn emit_bundle(records: Vec<ModuleRecord>) -> Script {
    let entry_id = records.first().map(|r| r.id.clone()).unwrap_or_default();

    let mut body = vec![
        require_fn(),
        init_member("modules"),
        init_member("cache"),
        resolve_fn(),
        define_fn(),
    ];
    for record in records {
        body.push(define_call(&record.id, lower_module(record.module)));
    }
    body.push(ast::return_stmt(Some(ast::call(
        ast::ident_expr("require"),
        vec![ast::str_lit(&entry_id)],
    ))));

    // "use strict" directive, then the harness body.
    let mut stmts = vec![ast::expr_stmt(ast::str_lit("use strict"))];
    stmts.extend(body);

    // (function(global) { ... }).call(this, this)
    let iife = ast::call(
        ast::member(ast::fn_expr(&["global"], stmts), "call"),
        vec![ast::this_expr(), ast::this_expr()],
    );

    Script {
        span: DUMMY_SP,
        body: vec![ast::expr_stmt(iife)],
        shebang: None,
    }
}

/// `{}.hasOwnProperty.call(obj, key)`
fn has_own(obj: Expr, key: Expr) -> Expr {
    ast::call(
        ast::member(ast::member(ast::empty_object(), "hasOwnProperty"), "call"),
        vec![obj, key],
    )
}

fn require_member(name: &str) -> Expr {
    ast::member(ast::ident_expr("require"), name)
}

/// `require.<name>[file]`
fn require_member_indexed(name: &str) -> Expr {
    ast::computed_member(require_member(name), ast::ident_expr("file"))
}

/// `function require(file, parentModule) { ... }`
fn require_fn() -> Stmt {
    let body = vec![
        // if ({}.hasOwnProperty.call(require.cache, file)) return require.cache[file];
        ast::if_stmt(
            has_own(require_member("cache"), ast::ident_expr("file")),
            ast::return_stmt(Some(require_member_indexed("cache"))),
        ),
        // var resolved = require.resolve(file);
        ast::var_stmt(
            "resolved",
            Some(ast::call(
                require_member("resolve"),
                vec![ast::ident_expr("file")],
            )),
        ),
        // if (!resolved) throw new Error("Failed to resolve module " + file);
        ast::if_stmt(
            ast::not(ast::ident_expr("resolved")),
            ast::throw_stmt(ast::new_expr(
                ast::ident_expr("Error"),
                vec![ast::bin(
                    BinaryOp::Add,
                    ast::str_lit("Failed to resolve module "),
                    ast::ident_expr("file"),
                )],
            )),
        ),
        // var module$ = { id: file, require: require, filename: file,
        //                 exports: {}, loaded: false, parent: parentModule,
        //                 children: [] };
        ast::var_stmt(
            "module$",
            Some(ast::object(vec![
                ("id", ast::ident_expr("file")),
                ("require", ast::ident_expr("require")),
                ("filename", ast::ident_expr("file")),
                ("exports", ast::empty_object()),
                ("loaded", ast::bool_lit(false)),
                ("parent", ast::ident_expr("parentModule")),
                ("children", ast::empty_array()),
            ])),
        ),
        // if (parentModule) parentModule.children.push(module$);
        ast::if_stmt(
            ast::ident_expr("parentModule"),
            ast::expr_stmt(ast::call(
                ast::member(
                    ast::member(ast::ident_expr("parentModule"), "children"),
                    "push",
                ),
                vec![ast::ident_expr("module$")],
            )),
        ),
        // var dirname = file.slice(0, file.lastIndexOf("/") + 1);
        ast::var_stmt(
            "dirname",
            Some(ast::call(
                ast::member(ast::ident_expr("file"), "slice"),
                vec![
                    ast::num_lit(0.0),
                    ast::bin(
                        BinaryOp::Add,
                        ast::call(
                            ast::member(ast::ident_expr("file"), "lastIndexOf"),
                            vec![ast::str_lit("/")],
                        ),
                        ast::num_lit(1.0),
                    ),
                ],
            )),
        ),
        // require.cache[file] = module$.exports;
        ast::expr_stmt(ast::assign(
            require_member_indexed("cache"),
            ast::member(ast::ident_expr("module$"), "exports"),
        )),
        // resolved.call(void 0, module$, module$.exports, dirname, file);
        // Module top-level `this` is undefined.
        ast::expr_stmt(ast::call(
            ast::member(ast::ident_expr("resolved"), "call"),
            vec![
                ast::undefined(),
                ast::ident_expr("module$"),
                ast::member(ast::ident_expr("module$"), "exports"),
                ast::ident_expr("dirname"),
                ast::ident_expr("file"),
            ],
        )),
        // module$.loaded = true;
        ast::expr_stmt(ast::assign(
            ast::member(ast::ident_expr("module$"), "loaded"),
            ast::bool_lit(true),
        )),
        // return require.cache[file] = module$.exports;
        // Re-published: the body may have reassigned module.exports.
        ast::return_stmt(Some(ast::assign(
            require_member_indexed("cache"),
            ast::member(ast::ident_expr("module$"), "exports"),
        ))),
    ];
    ast::fn_decl("require", &["file", "parentModule"], body)
}

/// `require.<name> = {};`
fn init_member(name: &str) -> Stmt {
    ast::expr_stmt(ast::assign(require_member(name), ast::empty_object()))
}

/// `require.resolve = function(file) { return {}.hasOwnProperty.call(require.modules, file) ? require.modules[file] : void 0; };`
fn resolve_fn() -> Stmt {
    let body = vec![ast::return_stmt(Some(ast::cond(
        has_own(require_member("modules"), ast::ident_expr("file")),
        require_member_indexed("modules"),
        ast::undefined(),
    )))];
    ast::expr_stmt(ast::assign(
        require_member("resolve"),
        ast::fn_expr(&["file"], body),
    ))
}

/// `require.define = function(file, fn) { require.modules[file] = fn; };`
fn define_fn() -> Stmt {
    let body = vec![ast::expr_stmt(ast::assign(
        require_member_indexed("modules"),
        ast::ident_expr("fn"),
    ))];
    ast::expr_stmt(ast::assign(
        require_member("define"),
        ast::fn_expr(&["file", "fn"], body),
    ))
}

/// `require.define("<id>", function(module, exports, __dirname, __filename) { ... });`
fn define_call(id: &str, body: Vec<Stmt>) -> Stmt {
    ast::expr_stmt(ast::call(
        require_member("define"),
        vec![
            ast::str_lit(id),
            ast::fn_expr(&["module", "exports", "__dirname", "__filename"], body),
        ],
    ))
}
