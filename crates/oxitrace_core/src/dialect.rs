use oxc_span::SourceType;
use std::path::Path;

use crate::constants::TYPED_EXTENSIONS;

/// Syntax variant a file is parsed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Modern JavaScript with JSX
    Plain,
    /// TypeScript, picked from the file extension
    Typed,
    /// Flow-annotated JavaScript, picked from an `// @flow` pragma
    Flow,
}

impl Dialect {
    /// Chooses the dialect from the file path and its decoded text.
    ///
    /// A typed extension always wins over a flow pragma.
    pub fn detect(path: &Path, text: &str) -> Self {
        let is_typed = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| TYPED_EXTENSIONS.contains(&ext));

        if is_typed {
            Dialect::Typed
        } else if has_flow_pragma(text) {
            Dialect::Flow
        } else {
            Dialect::Plain
        }
    }

    /// Parser configuration for this dialect.
    ///
    /// Every dialect parses as an ES module with JSX enabled. oxc has no Flow
    /// grammar, so Flow files are parsed with TypeScript syntax, which
    /// accepts the common annotation forms (`x: T`, `import type`, `type A = B`).
    pub fn source_type(self) -> SourceType {
        let st = SourceType::mjs().with_module(true).with_jsx(true);
        match self {
            Dialect::Plain => st,
            Dialect::Typed | Dialect::Flow => st.with_typescript(true),
        }
    }
}

/// A line whose first non-blank text is `//`, then optional blanks, then
/// `@flow`. Blanks may span line breaks on both sides of the `//`.
fn has_flow_pragma(text: &str) -> bool {
    let line_starts = std::iter::once(0).chain(text.match_indices('\n').map(|(i, _)| i + 1));
    line_starts.into_iter().any(|start| {
        text[start..]
            .trim_start()
            .strip_prefix("//")
            .is_some_and(|comment| comment.trim_start().starts_with("@flow"))
    })
}
