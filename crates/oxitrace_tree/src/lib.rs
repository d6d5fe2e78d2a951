//! Dependency-tree reporting for JavaScript/TypeScript entry files.
//!
//! Wraps [`oxitrace_core::trace`] for one or more entries and renders the
//! resulting trees as JSON or as a readable tree.
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```no_run
//! use oxitrace_tree::{Config, OutputFormat, run_dependency_trace};
//! use std::io::{BufWriter, Write};
//!
//! # fn main() -> anyhow::Result<()> {
//! let cfg = Config {
//!     entries: vec![std::path::PathBuf::from("src/index.ts")],
//!     format: OutputFormat::Tree,
//!     compact: false,
//!     no_content: true,
//! };
//!
//! let result = run_dependency_trace(&cfg)?;
//!
//! // Use buffered output for better performance
//! let mut stdout = BufWriter::new(std::io::stdout());
//! oxitrace_tree::print_tree(&mut stdout, &result)?;
//! stdout.flush()?;
//! # Ok(())
//! # }
//! ```

mod checker;
mod config;
mod reporter;
mod types;

// Re-export public API
pub use checker::run_dependency_trace;
pub use config::{Config, OutputFormat};
pub use reporter::{print_json, print_tree};
pub use types::{EntryTrace, TraceResult};
