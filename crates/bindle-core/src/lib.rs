//! bindle-core - ES module bundler core.
//!
//! Takes an entry-point ES module and produces a single self-contained
//! script that needs no loader, filesystem or module host at runtime.
//!
//! # How it works
//!
//! Every reachable module is parsed, its specifiers canonicalized and then
//! replaced by short opaque ids, and its `import` / `export` declarations
//! lowered into reads and writes on a synthesized `module` / `exports`
//! pair. The modules are registered in an embedded registry and driven by a
//! tiny `require` implementation:
//!
//! ```javascript
//! (function(global) {
//!     "use strict";
//!     function require(file, parentModule) { /* cache, resolve, invoke */ }
//!     require.modules = {};
//!     require.cache = {};
//!     require.resolve = function(file) { /* registry lookup */ };
//!     require.define = function(file, fn) { require.modules[file] = fn; };
//!     require.define("1", function(module, exports, __dirname, __filename) {
//!         var x = require("2", module).default;
//!         exports.default = x + 1;
//!     });
//!     require.define("2", function(module, exports, __dirname, __filename) {
//!         exports.default = 41;
//!     });
//!     return require("1");
//! }).call(this, this);
//! ```
//!
//! Evaluating the bundle evaluates each reached module body exactly once,
//! in the order induced by `require` chains from the entry, and yields the
//! entry module's exports object.
//!
//! # Example
//!
//! ```no_run
//! let script = bindle_core::bundle("src/main.js")?;
//! let js = bindle_core::script_to_string(&script)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Limitations
//!
//! Exports are value snapshots, not ESM live bindings: a module that
//! reassigns an exported `let` after evaluation will not propagate the new
//! value to importers. Dynamic `import()`, `import.meta` and top-level
//! `await` are out of scope. The names `module$`, `star$` and `key$` are
//! reserved inside bundled module bodies.

pub mod ast;
pub mod bundle;
pub mod codegen;
pub mod error;
pub mod graph;
pub mod harness;
pub mod loader;
pub mod lower;
pub mod parse;
pub mod rewrite;

pub use bundle::{bundle, bundle_string, bundle_with};
pub use codegen::script_to_string;
pub use error::{BundleError, BundleResult};
pub use graph::{ModuleGraph, ModuleRecord, collect_direct_dependencies};
pub use loader::{FileLoader, FileSystemResolver, Load, MemoryLoader, Resolve};
