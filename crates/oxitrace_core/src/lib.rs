//! Local import tracing for JavaScript/TypeScript files.
//!
//! Starting from an entry file, this crate parses each file with oxc, collects
//! its static `import` declarations, resolves the local ones (`./`, `../`, `/`)
//! to files on disk and recurses, producing a tree of [`FileRecord`]s.
//!
//! - Bare package imports and `.json` imports are ignored
//! - Extensionless specifiers try `.js`, `.jsx`, `.ts`, `.tsx`, then `index.*`
//! - Every file is expanded at most once per trace, so cycles terminate
//! - Binary files and files with syntax errors are recorded as leaves
//!
//! # Examples
//!
//! ```no_run
//! use oxitrace_core::{FileStatus, trace};
//!
//! # fn main() -> anyhow::Result<()> {
//! if let Some(tree) = trace(std::path::Path::new("src/index.ts"))? {
//!     for record in tree.iter().filter(|r| r.status == FileStatus::ParseError) {
//!         eprintln!("{}: {:?}", record.path.display(), record.parse_error);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod constants;
mod dialect;
mod parser;
mod resolver;
mod sniff;
mod tracer;
mod types;

// Re-export public API
pub use constants::{INDEX_FILES, SOURCE_EXTENSIONS, TYPED_EXTENSIONS};
pub use dialect::Dialect;
pub use parser::{extract_imports, imports_for};
pub use resolver::{is_local, resolve};
pub use sniff::{decode_text, looks_binary};
pub use tracer::trace;
pub use types::{FileRecord, FileStatus, Iter, TraceSummary};
