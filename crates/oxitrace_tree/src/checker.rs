use anyhow::{Context, Result};
use log::{debug, info, warn};
use rayon::prelude::*;
use std::thread;

use oxitrace_core::trace;

use crate::{
    config::Config,
    types::{EntryTrace, TraceResult},
};

/// Traces every entry in `cfg` on the rayon pool.
///
/// Each entry gets its own visited set, so a file reachable from two entries
/// is expanded under both. Results keep the order of `cfg.entries`.
pub fn run_dependency_trace(cfg: &Config) -> Result<TraceResult> {
    info!("Starting dependency trace for {} entries", cfg.entries.len());

    let traces = cfg
        .entries
        .par_iter()
        .map(|entry| -> Result<EntryTrace> {
            debug!("Thread {:?} tracing: {}", thread::current().id(), entry.display());

            let mut tree =
                trace(entry).with_context(|| format!("Failed to trace {}", entry.display()))?;

            match tree.as_mut() {
                Some(record) if cfg.no_content => record.strip_content(),
                Some(_) => {}
                None => warn!("Entry is missing or not a regular file: {}", entry.display()),
            }

            Ok(EntryTrace { entry: entry.clone(), tree })
        })
        .collect::<Result<Vec<_>>>()?;

    let files_analyzed =
        traces.iter().filter_map(|t| t.tree.as_ref()).map(|t| t.summary().files).sum();

    info!("Dependency trace complete. Visited {} files", files_analyzed);
    Ok(TraceResult { traces, files_analyzed })
}
