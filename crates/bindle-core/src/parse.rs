//! Module parsing via SWC.

use swc_common::{FileName, SourceMap, Spanned, sync::Lrc};
use swc_ecma_ast::{EsVersion, Module};
use swc_ecma_parser::{EsSyntax, Parser, StringInput, Syntax, lexer::Lexer};

use crate::error::{BundleError, BundleResult};

/// Parse a module source to an AST.
///
/// Any syntax error, fatal or recovered, rejects the module: a bundle is
/// never produced from sources the parser complained about.
pub fn parse_module(source: &str, location: &str) -> BundleResult<Module> {
    let cm: Lrc<SourceMap> = Default::default();
    let fm = cm.new_source_file(
        Lrc::new(FileName::Custom(location.to_string())),
        source.to_string(),
    );

    let lexer = Lexer::new(
        Syntax::Es(EsSyntax::default()),
        EsVersion::Es2022,
        StringInput::from(&*fm),
        None,
    );
    let mut parser = Parser::new_from(lexer);

    let module = parser
        .parse_module()
        .map_err(|e| parse_error(&cm, location, &e))?;

    if let Some(recovered) = parser.take_errors().into_iter().next() {
        return Err(parse_error(&cm, location, &recovered));
    }

    Ok(module)
}

fn parse_error(
    cm: &Lrc<SourceMap>,
    location: &str,
    error: &swc_ecma_parser::error::Error,
) -> BundleError {
    let pos = cm.lookup_char_pos(error.span().lo);
    BundleError::parse(
        location,
        format!(
            "{} at {}:{}",
            error.kind().msg(),
            pos.line,
            pos.col_display
        ),
    )
}
