//! Constants for file extensions and resolution order.
//!
//! Everything that decides which files a specifier may land on lives here so
//! the resolver and the dialect selector agree on what counts as source.
//!
//! ## Resolution order
//!
//! An extensionless specifier tries `SOURCE_EXTENSIONS` appended to the path
//! first, then `INDEX_FILES` inside the path treated as a directory. The
//! order is fixed; the first regular file wins.

/// Extensions a specifier may name explicitly, also the order in which they
/// are appended to an extensionless specifier.
pub const SOURCE_EXTENSIONS: &[&str] = &[
    "js",  // JavaScript
    "jsx", // JavaScript with JSX
    "ts",  // TypeScript
    "tsx", // TypeScript with JSX
];

/// Index file names tried when an extensionless specifier names a directory
pub const INDEX_FILES: &[&str] = &["index.js", "index.jsx", "index.ts", "index.tsx"];

/// Extensions parsed with TypeScript syntax enabled
pub const TYPED_EXTENSIONS: &[&str] = &["ts", "tsx"];

/// Suffix of data imports, which are never traced
pub const DATA_IMPORT_SUFFIX: &str = ".json";
