use log::trace;
use path_clean::clean;
use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};

use crate::constants::{DATA_IMPORT_SUFFIX, INDEX_FILES, SOURCE_EXTENSIONS};

/// Relative (`./`, `../`) and absolute (`/`) specifiers are local; bare
/// package names are not.
pub fn is_local(request: &str) -> bool {
    request.starts_with('.') || request.starts_with('/')
}

/// Resolves a local import specifier against `from_dir`.
///
/// Returns `None` for bare specifiers and `.json` imports without touching the
/// filesystem, and for specifiers that match no regular file. A specifier
/// with an explicit extension must name an existing `js`/`jsx`/`ts`/`tsx`
/// file; an extensionless one tries `SOURCE_EXTENSIONS` then `INDEX_FILES`.
pub fn resolve(from_dir: &Path, request: &str) -> Option<PathBuf> {
    if !is_local(request) {
        trace!("Skipping non-local import: '{}'", request);
        return None;
    }
    if request.ends_with(DATA_IMPORT_SUFFIX) {
        trace!("Skipping data import: '{}'", request);
        return None;
    }

    let base = clean(from_dir.join(request));
    trace!("Resolving '{}' from {} as {}", request, from_dir.display(), base.display());

    if let Some(ext) = base.extension() {
        let known = ext.to_str().is_some_and(|e| SOURCE_EXTENSIONS.contains(&e));
        if !known {
            trace!("Unrecognized extension for '{}'", request);
            return None;
        }
        return is_regular_file(&base).then_some(base);
    }

    let resolved = candidates(&base).into_iter().find(|c| is_regular_file(c));
    match &resolved {
        Some(p) => trace!("Resolved '{}' to {}", request, p.display()),
        None => trace!("Failed to resolve '{}'", request),
    }
    resolved
}

fn candidates(base: &Path) -> Vec<PathBuf> {
    let with_ext = SOURCE_EXTENSIONS.iter().map(|ext| append_extension(base, ext));
    let index = INDEX_FILES.iter().map(|index_file| base.join(index_file));
    with_ext.chain(index).collect()
}

fn append_extension(base: &Path, ext: &str) -> PathBuf {
    let mut s = OsString::from(base.as_os_str());
    s.push(".");
    s.push(ext);
    PathBuf::from(s)
}

/// Metadata errors count as "not a file".
pub(crate) fn is_regular_file(p: &Path) -> bool {
    fs::metadata(p).map(|m| m.is_file()).unwrap_or(false)
}
