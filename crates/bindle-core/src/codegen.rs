//! Script-to-source serialization.

use std::io;

use swc_common::{SourceMap, sync::Lrc};
use swc_ecma_ast::Script;
use swc_ecma_codegen::{Emitter, Node, text_writer::JsWriter};

/// Print a script AST as JavaScript source.
pub fn script_to_string(script: &Script) -> io::Result<String> {
    let cm: Lrc<SourceMap> = Default::default();
    let mut buf = Vec::new();
    {
        let mut emitter = Emitter {
            cfg: swc_ecma_codegen::Config::default().with_minify(false),
            cm: cm.clone(),
            comments: None,
            wr: JsWriter::new(cm.clone(), "\n", &mut buf, None),
        };
        script.emit_with(&mut emitter)?;
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use swc_common::DUMMY_SP;

    use crate::ast;

    #[test]
    fn test_prints_statements() {
        let script = Script {
            span: DUMMY_SP,
            body: vec![ast::var_stmt("x", Some(ast::num_lit(1.0)))],
            shebang: None,
        };
        assert_eq!(script_to_string(&script).unwrap().trim(), "var x = 1;");
    }
}
