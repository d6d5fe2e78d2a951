use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileStatus {
    Ok,
    Binary,
    ParseError,
}

/// One traced file and the files its local imports led to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    /// Absolute, normalized path; identity of the file within a trace
    pub path: PathBuf,
    pub status: FileStatus,
    /// Decoded text, `None` for binary files
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_error: Option<String>,
    /// Records for resolved, first-seen imports in source order
    pub children: Vec<FileRecord>,
}

impl FileRecord {
    pub(crate) fn ok(path: PathBuf, content: String, children: Vec<FileRecord>) -> Self {
        Self { path, status: FileStatus::Ok, content: Some(content), parse_error: None, children }
    }

    pub(crate) fn binary(path: PathBuf) -> Self {
        Self {
            path,
            status: FileStatus::Binary,
            content: None,
            parse_error: None,
            children: Vec::new(),
        }
    }

    pub(crate) fn parse_error(path: PathBuf, content: String, reason: String) -> Self {
        Self {
            path,
            status: FileStatus::ParseError,
            content: Some(content),
            parse_error: Some(reason),
            children: Vec::new(),
        }
    }

    /// Pre-order iterator over this record and all of its descendants.
    pub fn iter(&self) -> Iter<'_> {
        Iter { stack: vec![self] }
    }

    pub fn summary(&self) -> TraceSummary {
        let mut summary = TraceSummary::default();
        for record in self.iter() {
            summary.files += 1;
            match record.status {
                FileStatus::Ok => summary.ok += 1,
                FileStatus::Binary => summary.binary += 1,
                FileStatus::ParseError => summary.parse_errors += 1,
            }
        }
        summary
    }

    /// Drops the content of this record and every descendant.
    pub fn strip_content(&mut self) {
        self.content = None;
        for child in &mut self.children {
            child.strip_content();
        }
    }
}

pub struct Iter<'a> {
    stack: Vec<&'a FileRecord>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a FileRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.stack.pop()?;
        self.stack.extend(record.children.iter().rev());
        Some(record)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraceSummary {
    pub files: usize,
    pub ok: usize,
    pub binary: usize,
    pub parse_errors: usize,
}
