//! End-to-end bundling tests over in-memory module trees.

use bindle_core::{
    BundleError, FileSystemResolver, MemoryLoader, bundle, bundle_string, bundle_with,
    script_to_string,
};

fn bundle_js(entry: &str, modules: &[(&str, &str)]) -> String {
    let mut loader = MemoryLoader::new();
    for (location, source) in modules {
        loader.insert(*location, *source);
    }
    let script = bundle_with(entry, &FileSystemResolver, &loader).unwrap();
    script_to_string(&script).unwrap()
}

#[test]
fn test_single_module_no_imports() {
    let js = bundle_js("/a.js", &[("/a.js", "export default 42;")]);
    assert!(js.contains(r#"require.define("1", function(module, exports, __dirname, __filename)"#));
    assert!(js.contains("exports.default = 42;"));
    assert!(js.contains(r#"return require("1");"#));
    assert_eq!(js.matches("require.define(\"").count(), 1);
}

#[test]
fn test_default_import_chain() {
    let js = bundle_js(
        "/a.js",
        &[
            ("/a.js", r#"import x from "./b"; export default x + 1;"#),
            ("/b.js", "export default 41;"),
        ],
    );
    assert!(js.contains(r#"var x = require("2", module).default;"#));
    assert!(js.contains("exports.default = x + 1;"));
    assert_eq!(js.matches("require.define(\"").count(), 2);
}

#[test]
fn test_named_reexport() {
    let js = bundle_js(
        "/a.js",
        &[
            ("/a.js", r#"export { y as z } from "./b";"#),
            ("/b.js", "export var y = 7;"),
        ],
    );
    assert!(js.contains(r#"exports.z = require("2", module).y;"#));
    // The entry module body never assigns an own `y`.
    let entry_body = &js[js.find(r#"require.define("1""#).unwrap()
        ..js.find(r#"require.define("2""#).unwrap()];
    assert!(!entry_body.contains("exports.y"));
}

#[test]
fn test_namespace_import() {
    let js = bundle_js(
        "/a.js",
        &[
            ("/a.js", r#"import * as B from "./b"; export default B.f();"#),
            ("/b.js", "export function f() { return 9; }"),
        ],
    );
    assert!(js.contains(r#"var B = require("2", module);"#));
    assert!(js.contains("exports.default = B.f();"));
    assert!(js.contains("exports.f = f;"));
}

#[test]
fn test_diamond_defines_each_module_once() {
    let js = bundle_js(
        "/a.js",
        &[
            (
                "/a.js",
                r#"import b from "./b"; import c from "./c"; export default b + c;"#,
            ),
            ("/b.js", r#"import d from "./d"; export default d;"#),
            ("/c.js", r#"import d from "./d"; export default d;"#),
            (
                "/d.js",
                "globalThis.tick = (globalThis.tick || 0) + 1; export default 1;",
            ),
        ],
    );
    assert_eq!(js.matches("require.define(\"").count(), 4);
    // The side effect is defined once; `require.cache` keeps it to one run.
    assert_eq!(js.matches("globalThis.tick").count(), 2);
}

#[test]
fn test_unresolved_specifier_fails_with_resolve_error() {
    struct FailingResolver;
    impl bindle_core::Resolve for FailingResolver {
        fn resolve(&self, specifier: &str, referrer_dir: &str) -> bindle_core::BundleResult<String> {
            Err(BundleError::resolve(specifier, referrer_dir))
        }
    }

    let mut loader = MemoryLoader::new();
    loader.insert("/a.js", r#"import x from "./missing";"#);
    let err = bundle_with("/a.js", &FailingResolver, &loader).unwrap_err();
    match err {
        BundleError::Resolve { specifier, referrer } => {
            assert_eq!(specifier, "./missing");
            assert_eq!(referrer, "/");
        }
        other => panic!("expected resolve error, got {other}"),
    }
    let display = format!(
        "{}",
        BundleError::resolve("./missing", "/")
    );
    assert!(display.contains("./missing"));
    assert!(display.contains("'/'"));
}

#[test]
fn test_cycle_bundles_and_terminates() {
    let js = bundle_js(
        "/a.js",
        &[
            ("/a.js", r#"import b from "./b"; export var a = 1;"#),
            ("/b.js", r#"import a from "./a"; export default 2;"#),
        ],
    );
    assert_eq!(js.matches("require.define(\"").count(), 2);
}

#[test]
fn test_directive_preserved_in_lowered_body() {
    let js = bundle_js(
        "/a.js",
        &[("/a.js", "\"use strict\";\nexport default 1;")],
    );
    let body_at = js.find(r#"require.define("1""#).unwrap();
    let directive_at = js[body_at..].find(r#""use strict";"#);
    assert!(directive_at.is_some());
}

#[test]
fn test_repeated_bundling_is_reproducible() {
    let modules: &[(&str, &str)] = &[
        ("/a.js", r#"import b from "./b"; export default b;"#),
        ("/b.js", "export default 1;"),
    ];
    let first = bundle_js("/a.js", modules);
    let second = bundle_js("/a.js", modules);
    assert_eq!(first, second);
}

#[test]
fn test_bundle_string_supplies_entry_source() {
    let mut loader = MemoryLoader::new();
    loader.insert("/lib/b.js", "export default 41;");
    let script = bundle_string(
        r#"import x from "./b"; export default x + 1;"#,
        "/lib/a.js",
        &FileSystemResolver,
        &loader,
    )
    .unwrap();
    let js = script_to_string(&script).unwrap();
    assert!(js.contains(r#"var x = require("2", module).default;"#));
}

#[test]
fn test_bundle_reads_from_filesystem() {
    let dir = tempfile::tempdir().unwrap();
    let entry = dir.path().join("a.js");
    std::fs::write(&entry, "import x from \"./b\";\nexport default x + 1;\n").unwrap();
    std::fs::write(dir.path().join("b.js"), "export default 41;\n").unwrap();

    let script = bundle(&entry).unwrap();
    let js = script_to_string(&script).unwrap();
    assert!(js.contains("exports.default = x + 1;"));
    assert!(js.contains("exports.default = 41;"));
    // Absolute paths never leak into the output.
    assert!(!js.contains(&dir.path().to_string_lossy().into_owned()));
}

#[test]
fn test_bundle_missing_entry_is_load_error() {
    let err = bundle("/definitely/not/here.js").unwrap_err();
    assert!(matches!(err, BundleError::Load { .. }));
}

#[test]
fn test_export_star_bundle() {
    let js = bundle_js(
        "/a.js",
        &[
            ("/a.js", r#"export * from "./b";"#),
            ("/b.js", "export var x = 1; export default 2;"),
        ],
    );
    assert!(js.contains(r#"var star$ = require("2", module);"#));
    assert!(js.contains(r#"key$ !== "default""#));
}
