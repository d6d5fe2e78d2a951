use anyhow::{Result, anyhow};
use log::{debug, trace};
use oxc_allocator::Allocator;
use oxc_ast::ast::*;
use oxc_ast_visit::{Visit, walk};
use oxc_parser::{Parser as OxcParser, ParserReturn};
use std::path::Path;

use crate::dialect::Dialect;

/// Parses `text` and returns the specifier of every static import
/// declaration, in source order.
///
/// Any parser diagnostic makes the whole file a failure; the error message
/// joins all diagnostics with `"; "`.
pub fn imports_for(path: &Path, text: &str) -> Result<Vec<String>> {
    let dialect = Dialect::detect(path, text);
    trace!("Parsing {} as {:?}", path.display(), dialect);

    let allocator = Allocator::default();
    let ParserReturn { program, errors, panicked, .. } =
        OxcParser::new(&allocator, text, dialect.source_type()).parse();

    if !errors.is_empty() {
        let reason = errors.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; ");
        return Err(anyhow!(reason));
    }
    if panicked {
        return Err(anyhow!("Parser aborted"));
    }

    let specs = extract_imports(&program);
    debug!("Found {} import declarations in {}", specs.len(), path.display());
    Ok(specs)
}

/// Collects the source of every `ImportDeclaration` in pre-order, walking
/// the whole tree so declarations nested in any body are found too.
pub fn extract_imports(program: &Program<'_>) -> Vec<String> {
    let mut collector = ImportCollector::default();
    collector.visit_program(program);
    collector.specifiers
}

#[derive(Default)]
struct ImportCollector {
    specifiers: Vec<String>,
}

impl<'a> Visit<'a> for ImportCollector {
    fn visit_import_declaration(&mut self, decl: &ImportDeclaration<'a>) {
        trace!("Found import declaration: '{}'", decl.source.value);
        self.specifiers.push(decl.source.value.to_string());
        walk::walk_import_declaration(self, decl);
    }
}
