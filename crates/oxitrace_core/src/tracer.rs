use anyhow::{Context, Result};
use log::{debug, trace, warn};
use path_clean::clean;
use std::{
    collections::HashSet,
    env, fs,
    path::{Path, PathBuf},
};

use crate::{
    parser::imports_for,
    resolver::{is_regular_file, resolve},
    sniff::{decode_text, looks_binary},
    types::FileRecord,
};

/// Files already entered during one top-level [`trace`] call.
#[derive(Debug, Default)]
struct TraceContext {
    visited: HashSet<PathBuf>,
}

impl TraceContext {
    /// Returns `false` if the file was entered before.
    fn enter(&mut self, path: &Path) -> bool {
        self.visited.insert(path.to_path_buf())
    }
}

/// Traces the local import tree rooted at `entry`.
///
/// Returns `Ok(None)` when the entry does not exist or is not a regular file.
/// Each distinct file is expanded once; later imports of it are left out of
/// `children`. Binary files and files that fail to parse become leaves.
///
/// # Errors
///
/// Fails if a regular file cannot be read (for example permission denied) or
/// if the current directory is needed for a relative entry and unavailable.
pub fn trace(entry: &Path) -> Result<Option<FileRecord>> {
    let mut ctx = TraceContext::default();
    let record = trace_file(entry, &mut ctx)?;
    debug!("Traced {} files from {}", ctx.visited.len(), entry.display());
    Ok(record)
}

fn trace_file(path: &Path, ctx: &mut TraceContext) -> Result<Option<FileRecord>> {
    let path = absolutize(path)?;

    if !is_regular_file(&path) {
        trace!("Not a regular file: {}", path.display());
        return Ok(None);
    }
    if !ctx.enter(&path) {
        trace!("Already visited: {}", path.display());
        return Ok(None);
    }

    let bytes = fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
    if looks_binary(&bytes) {
        debug!("Skipping binary file: {}", path.display());
        return Ok(Some(FileRecord::binary(path)));
    }

    let content = decode_text(&bytes);
    let specs = match imports_for(&path, &content) {
        Ok(specs) => specs,
        Err(e) => {
            warn!("Parse failed: {}", path.display());
            warn!("Reason: {}", e);
            return Ok(Some(FileRecord::parse_error(path, content, e.to_string())));
        }
    };

    let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let mut children = Vec::new();
    for request in &specs {
        let Some(resolved) = resolve(&dir, request) else {
            continue;
        };
        if let Some(child) = trace_file(&resolved, ctx)? {
            children.push(child);
        }
    }

    trace!("{} has {} children", path.display(), children.len());
    Ok(Some(FileRecord::ok(path, content, children)))
}

/// Makes `path` absolute and normalizes it textually; symlinks are kept.
fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(clean(path));
    }
    let cwd = env::current_dir().context("Failed to read current directory")?;
    Ok(clean(cwd.join(path)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FileStatus;
    use tempfile::TempDir;

    fn create_test_file(dir: &Path, path: &str, content: &str) -> PathBuf {
        let file_path = dir.join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    // canonicalize the temp root so paths match on systems where /tmp is a symlink
    fn setup() -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().canonicalize().unwrap();
        (temp_dir, root)
    }

    fn child_paths(record: &FileRecord) -> Vec<PathBuf> {
        record.children.iter().map(|c| c.path.clone()).collect()
    }

    #[test]
    fn test_single_file() {
        let (_tmp, root) = setup();
        let entry = create_test_file(&root, "index.js", "export const x = 1;");

        let record = trace(&entry).unwrap().unwrap();
        assert_eq!(record.path, entry);
        assert_eq!(record.status, FileStatus::Ok);
        assert_eq!(record.content.as_deref(), Some("export const x = 1;"));
        assert!(record.parse_error.is_none());
        assert!(record.children.is_empty());
    }

    #[test]
    fn test_missing_entry() {
        let (_tmp, root) = setup();
        assert!(trace(&root.join("nope.js")).unwrap().is_none());
    }

    #[test]
    fn test_directory_entry() {
        let (_tmp, root) = setup();
        create_test_file(&root, "src/index.js", "");
        assert!(trace(&root.join("src")).unwrap().is_none());
    }

    #[test]
    fn test_entry_path_is_normalized() {
        let (_tmp, root) = setup();
        let entry = create_test_file(&root, "src/index.js", "");
        let record = trace(&root.join("src/../src/./index.js")).unwrap().unwrap();
        assert_eq!(record.path, entry);
    }

    #[test]
    fn test_nested_imports() {
        let (_tmp, root) = setup();
        let entry = create_test_file(&root, "src/index.js", "import './a';");
        let a = create_test_file(&root, "src/a.js", "import b from '../lib/b';");
        let b = create_test_file(&root, "lib/b.ts", "export default 1 as number;");

        let record = trace(&entry).unwrap().unwrap();
        assert_eq!(child_paths(&record), vec![a]);
        assert_eq!(child_paths(&record.children[0]), vec![b]);
        assert_eq!(record.children[0].children[0].status, FileStatus::Ok);
    }

    #[test]
    fn test_children_follow_import_order() {
        let (_tmp, root) = setup();
        let entry =
            create_test_file(&root, "index.js", "import './c';\nimport './a';\nimport './b';");
        let a = create_test_file(&root, "a.js", "");
        let b = create_test_file(&root, "b.js", "");
        let c = create_test_file(&root, "c.js", "");

        let record = trace(&entry).unwrap().unwrap();
        assert_eq!(child_paths(&record), vec![c, a, b]);
    }

    #[test]
    fn test_cycle_terminates() {
        let (_tmp, root) = setup();
        let a = create_test_file(&root, "a.js", "import './b';");
        let b = create_test_file(&root, "b.js", "import './a';");

        let record = trace(&a).unwrap().unwrap();
        assert_eq!(child_paths(&record), vec![b]);
        assert!(record.children[0].children.is_empty());
    }

    #[test]
    fn test_self_import_pruned() {
        let (_tmp, root) = setup();
        let a = create_test_file(&root, "a.js", "import './a.js';");
        let record = trace(&a).unwrap().unwrap();
        assert!(record.children.is_empty());
    }

    #[test]
    fn test_shared_dependency_expanded_once() {
        let (_tmp, root) = setup();
        let entry = create_test_file(&root, "index.js", "import './a';\nimport './b';");
        let a = create_test_file(&root, "a.js", "import './c';");
        let b = create_test_file(&root, "b.js", "import './c';");
        let c = create_test_file(&root, "c.js", "import './d';");
        let d = create_test_file(&root, "d.js", "");

        let record = trace(&entry).unwrap().unwrap();
        assert_eq!(child_paths(&record), vec![a, b]);
        assert_eq!(child_paths(&record.children[0]), vec![c.clone()]);
        assert!(record.children[1].children.is_empty());
        assert_eq!(record.iter().filter(|r| r.path == c).count(), 1);
        assert_eq!(record.iter().filter(|r| r.path == d).count(), 1);
        assert_eq!(record.summary().files, 5);
    }

    #[test]
    fn test_same_file_through_different_specifiers() {
        let (_tmp, root) = setup();
        let entry = create_test_file(
            &root,
            "src/index.js",
            "import './util';\nimport './util.js';\nimport '../src/util';",
        );
        let util = create_test_file(&root, "src/util.js", "");

        let record = trace(&entry).unwrap().unwrap();
        assert_eq!(child_paths(&record), vec![util]);
    }

    #[test]
    fn test_extension_inference_prefers_js() {
        let (_tmp, root) = setup();
        let entry = create_test_file(&root, "index.ts", "import { foo } from './foo';");
        create_test_file(&root, "foo.ts", "export const foo: number = 1;");
        let js = create_test_file(&root, "foo.js", "export const foo = 1;");

        let record = trace(&entry).unwrap().unwrap();
        assert_eq!(child_paths(&record), vec![js]);
    }

    #[test]
    fn test_directory_index_fallback() {
        let (_tmp, root) = setup();
        let entry = create_test_file(&root, "index.js", "import lib from './lib';");
        let index = create_test_file(&root, "lib/index.ts", "export default {};");

        let record = trace(&entry).unwrap().unwrap();
        assert_eq!(child_paths(&record), vec![index]);
    }

    #[test]
    fn test_binary_file_short_circuits() {
        let (_tmp, root) = setup();
        let blob = root.join("blob.js");
        fs::write(&blob, b"import './a';\0\x01\x02").unwrap();
        create_test_file(&root, "a.js", "");

        let record = trace(&blob).unwrap().unwrap();
        assert_eq!(record.status, FileStatus::Binary);
        assert!(record.content.is_none());
        assert!(record.parse_error.is_none());
        assert!(record.children.is_empty());
    }

    #[test]
    fn test_binary_child_is_leaf() {
        let (_tmp, root) = setup();
        let entry = create_test_file(&root, "index.js", "import './asset.js';");
        fs::write(root.join("asset.js"), [0u8, 159, 146, 150]).unwrap();

        let record = trace(&entry).unwrap().unwrap();
        assert_eq!(record.children.len(), 1);
        assert_eq!(record.children[0].status, FileStatus::Binary);
    }

    #[test]
    fn test_non_local_imports_ignored() {
        let (_tmp, root) = setup();
        let entry = create_test_file(
            &root,
            "index.js",
            "import React from 'react';\nimport { u } from './util.js';",
        );
        create_test_file(&root, "node_modules/react/index.js", "");
        create_test_file(&root, "react.js", "");
        let util = create_test_file(&root, "util.js", "");

        let record = trace(&entry).unwrap().unwrap();
        assert_eq!(child_paths(&record), vec![util]);
    }

    #[test]
    fn test_json_imports_ignored() {
        let (_tmp, root) = setup();
        let entry = create_test_file(&root, "index.js", "import data from './data.json';");
        create_test_file(&root, "data.json", "{\"a\": 1}");

        let record = trace(&entry).unwrap().unwrap();
        assert!(record.children.is_empty());
    }

    #[test]
    fn test_unresolved_imports_pruned() {
        let (_tmp, root) = setup();
        let entry = create_test_file(
            &root,
            "index.js",
            "import './missing';\nimport './style.css';\nimport './ok';",
        );
        create_test_file(&root, "style.css", "body {}");
        let ok = create_test_file(&root, "ok.jsx", "export default () => <div />;");

        let record = trace(&entry).unwrap().unwrap();
        assert_eq!(child_paths(&record), vec![ok]);
    }

    #[test]
    fn test_nested_import_traced() {
        let (_tmp, root) = setup();
        let entry = create_test_file(
            &root,
            "index.js",
            "function load() {\n  import helper from './helper';\n}\nimport './main';",
        );
        let helper = create_test_file(&root, "helper.js", "");
        let main = create_test_file(&root, "main.js", "");

        let record = trace(&entry).unwrap().unwrap();
        assert_eq!(record.status, FileStatus::Ok);
        assert_eq!(child_paths(&record), vec![helper, main]);
    }

    #[test]
    fn test_dynamic_import_not_traced() {
        let (_tmp, root) = setup();
        let entry = create_test_file(&root, "index.js", "const m = import('./lazy');");
        create_test_file(&root, "lazy.js", "");

        let record = trace(&entry).unwrap().unwrap();
        assert!(record.children.is_empty());
    }

    #[test]
    fn test_syntax_error_isolated() {
        let (_tmp, root) = setup();
        let entry = create_test_file(
            &root,
            "index.js",
            "import './broken';\nimport './after';",
        );
        let broken = create_test_file(&root, "broken.js", "import './a';\nimport {");
        let after = create_test_file(&root, "after.js", "import './a';");
        let a = create_test_file(&root, "a.js", "");

        let record = trace(&entry).unwrap().unwrap();
        assert_eq!(record.status, FileStatus::Ok);
        assert_eq!(child_paths(&record), vec![broken, after]);

        let broken_record = &record.children[0];
        assert_eq!(broken_record.status, FileStatus::ParseError);
        assert!(broken_record.parse_error.as_deref().is_some_and(|e| !e.is_empty()));
        assert_eq!(broken_record.content.as_deref(), Some("import './a';\nimport {"));
        assert!(broken_record.children.is_empty());

        // the broken file's import was never followed, so the sibling still reaches it
        assert_eq!(child_paths(&record.children[1]), vec![a]);
    }

    #[test]
    fn test_syntax_error_entry() {
        let (_tmp, root) = setup();
        let entry = create_test_file(&root, "index.js", "const = ;");
        let record = trace(&entry).unwrap().unwrap();
        assert_eq!(record.status, FileStatus::ParseError);
        assert!(record.children.is_empty());
    }

    #[test]
    fn test_typescript_annotations_only_in_typed_files() {
        let (_tmp, root) = setup();
        let entry = create_test_file(&root, "index.js", "import './typed';\nimport './untyped';");
        create_test_file(&root, "typed.ts", "const n: number = 1;");
        create_test_file(&root, "untyped.js", "const n: number = 1;");

        let record = trace(&entry).unwrap().unwrap();
        assert_eq!(record.children[0].status, FileStatus::Ok);
        assert_eq!(record.children[1].status, FileStatus::ParseError);
    }

    #[test]
    fn test_flow_file_traced() {
        let (_tmp, root) = setup();
        let entry = create_test_file(
            &root,
            "index.js",
            "// @flow\nimport type { T } from './types';\nconst x: number = 1;",
        );
        let types = create_test_file(&root, "types.js", "// @flow\nexport type T = string;");

        let record = trace(&entry).unwrap().unwrap();
        assert_eq!(record.status, FileStatus::Ok);
        assert_eq!(child_paths(&record), vec![types]);
        assert_eq!(record.children[0].status, FileStatus::Ok);
    }

    #[test]
    fn test_bom_stripped() {
        let (_tmp, root) = setup();
        let entry = create_test_file(&root, "index.js", "\u{FEFF}import './a';");
        let a = create_test_file(&root, "a.js", "");

        let record = trace(&entry).unwrap().unwrap();
        assert_eq!(record.content.as_deref(), Some("import './a';"));
        assert_eq!(child_paths(&record), vec![a]);
    }

    #[test]
    fn test_independent_invocations() {
        let (_tmp, root) = setup();
        let entry = create_test_file(&root, "index.js", "import './a';");
        let a = create_test_file(&root, "a.js", "");

        let first = trace(&entry).unwrap().unwrap();
        let second = trace(&entry).unwrap().unwrap();
        assert_eq!(child_paths(&first), vec![a.clone()]);
        assert_eq!(first, second);
        assert_eq!(trace(&a).unwrap().unwrap().path, a);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_file_propagates_error() {
        use std::os::unix::fs::PermissionsExt;

        let (_tmp, root) = setup();
        let entry = create_test_file(&root, "index.js", "import './secret';");
        let secret = create_test_file(&root, "secret.js", "");
        fs::set_permissions(&secret, fs::Permissions::from_mode(0o000)).unwrap();

        // privileged users can read it anyway
        if fs::read(&secret).is_ok() {
            return;
        }

        let err = trace(&entry).unwrap_err();
        assert!(format!("{:#}", err).contains("secret.js"));
    }
}
