use std::{
    env,
    io::{self, Write},
    path::{Component, Path, PathBuf},
};

use colored::Colorize;
use log::{debug, trace};
use oxitrace_core::{FileRecord, FileStatus, TraceSummary};

use crate::types::TraceResult;

/// Writes the traced trees as JSON.
///
/// A single entry prints its record (or `null`); several entries print an
/// array in entry order.
pub fn print_json<W: Write>(writer: &mut W, result: &TraceResult, compact: bool) -> io::Result<()> {
    debug!("Printing JSON for {} entries", result.traces.len());
    let value = match result.traces.as_slice() {
        [single] => serde_json::to_value(&single.tree)?,
        traces => serde_json::to_value(traces.iter().map(|t| &t.tree).collect::<Vec<_>>())?,
    };

    if compact {
        serde_json::to_writer(&mut *writer, &value)?;
    } else {
        serde_json::to_writer_pretty(&mut *writer, &value)?;
    }
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Writes each traced tree with box-drawing branches, followed by a summary.
pub fn print_tree<W: Write>(writer: &mut W, result: &TraceResult) -> io::Result<()> {
    let cwd = env::current_dir().ok();
    let cwd = cwd.as_deref();

    for entry_trace in &result.traces {
        match &entry_trace.tree {
            Some(tree) => {
                writeln!(writer, "{}", describe(tree, cwd).bold())?;
                print_children(writer, tree, "", cwd)?;
            }
            None => {
                writeln!(
                    writer,
                    "{} {} {}",
                    "✗".red().bold(),
                    entry_trace.entry.display(),
                    "(not found)".red()
                )?;
            }
        }
        writeln!(writer)?;
    }

    print_summary(writer, result)?;
    writer.flush()?;
    Ok(())
}

fn print_children<W: Write>(
    writer: &mut W,
    record: &FileRecord,
    prefix: &str,
    cwd: Option<&Path>,
) -> io::Result<()> {
    for (idx, child) in record.children.iter().enumerate() {
        let is_last = idx == record.children.len() - 1;
        let branch = if is_last { "└──" } else { "├──" };
        writeln!(writer, "{}{} {}", prefix.dimmed(), branch.dimmed(), describe(child, cwd))?;

        let nested = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
        print_children(writer, child, &nested, cwd)?;
    }
    Ok(())
}

fn describe(record: &FileRecord, cwd: Option<&Path>) -> String {
    let path = display_path(&record.path, cwd);
    match record.status {
        FileStatus::Ok => path,
        FileStatus::Binary => format!("{} {}", path.dimmed(), "(binary)".dimmed()),
        FileStatus::ParseError => {
            let reason = record
                .parse_error
                .as_deref()
                .unwrap_or_default()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ");
            format!("{} {}", path.yellow(), format!("(parse error: {})", reason).red())
        }
    }
}

fn print_summary<W: Write>(writer: &mut W, result: &TraceResult) -> io::Result<()> {
    let mut totals = TraceSummary::default();
    for tree in result.traces.iter().filter_map(|t| t.tree.as_ref()) {
        let summary = tree.summary();
        totals.files += summary.files;
        totals.ok += summary.ok;
        totals.binary += summary.binary;
        totals.parse_errors += summary.parse_errors;
    }
    let missing = result.missing_entries().len();

    writeln!(writer, "{}", "─".repeat(60).dimmed())?;
    writeln!(writer, "{}", "Summary".bold())?;
    if missing > 0 {
        writeln!(
            writer,
            "  Entries: {} ({} missing)",
            result.traces.len().to_string().cyan(),
            missing.to_string().red().bold()
        )?;
    } else {
        writeln!(writer, "  Entries: {}", result.traces.len().to_string().cyan())?;
    }
    writeln!(writer, "  Files: {}", totals.files.to_string().cyan())?;
    if totals.parse_errors > 0 {
        writeln!(writer, "  Parse errors: {}", totals.parse_errors.to_string().yellow().bold())?;
    }
    if totals.binary > 0 {
        writeln!(writer, "  Binary files: {}", totals.binary.to_string().dimmed())?;
    }
    Ok(())
}

/// Shows `path` relative to `cwd` when they share a directory, otherwise as is.
fn display_path(path: &Path, cwd: Option<&Path>) -> String {
    let shown = cwd.and_then(|cwd| make_relative(path, cwd));
    trace!("Displaying {} as {:?}", path.display(), shown);
    shown.as_deref().unwrap_or(path).display().to_string()
}

/// Relative path from `base` to `target`; `None` unless both are absolute and
/// share at least one directory below the root.
fn make_relative(target: &Path, base: &Path) -> Option<PathBuf> {
    if !target.is_absolute() || !base.is_absolute() {
        return None;
    }

    let target: Vec<Component> = target.components().collect();
    let base: Vec<Component> = base.components().collect();
    let common = target.iter().zip(&base).take_while(|(t, b)| t == b).count();

    if !target[..common].iter().any(|c| matches!(c, Component::Normal(_))) {
        return None;
    }

    let mut result = PathBuf::new();
    for _ in common..base.len() {
        result.push("..");
    }
    for component in &target[common..] {
        result.push(component.as_os_str());
    }

    if result.as_os_str().is_empty() { Some(PathBuf::from(".")) } else { Some(result) }
}
