use oxitrace_core::FileRecord;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct EntryTrace {
    /// The entry path as given on the command line
    pub entry: PathBuf,
    /// `None` when the entry is missing or not a regular file
    pub tree: Option<FileRecord>,
}

#[derive(Debug, Clone)]
pub struct TraceResult {
    pub traces: Vec<EntryTrace>,
    pub files_analyzed: usize,
}

impl TraceResult {
    pub fn missing_entries(&self) -> Vec<&PathBuf> {
        self.traces.iter().filter(|t| t.tree.is_none()).map(|t| &t.entry).collect()
    }
}
