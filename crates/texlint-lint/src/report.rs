//! Lint messages and the per-file report.

use std::fmt;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use serde::Serialize;

/// Message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("WARNING"),
            Severity::Error => f.write_str("ERROR"),
        }
    }
}

/// A single finding for one asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintMessage {
    pub severity: Severity,
    pub text: String,
}

impl LintMessage {
    pub fn warning(text: impl Into<String>) -> Self {
        Self { severity: Severity::Warning, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { severity: Severity::Error, text: text.into() }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for LintMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.text)
    }
}

/// Messages for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub messages: Vec<LintMessage>,
}

/// Findings of a scan, keyed by file path in the order files were linted.
///
/// Every linted file gets an entry, clean files included, so callers can
/// tell "linted and clean" from "never linted".
#[derive(Debug, Default, Clone, Serialize)]
pub struct LintReport {
    files: Vec<FileReport>,
    #[serde(skip)]
    index: FxHashMap<PathBuf, usize>,
}

impl LintReport {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&mut self, path: &Path) -> &mut FileReport {
        let idx = match self.index.get(path) {
            Some(&idx) => idx,
            None => {
                let idx = self.files.len();
                self.files.push(FileReport { path: path.to_path_buf(), messages: Vec::new() });
                self.index.insert(path.to_path_buf(), idx);
                idx
            }
        };
        &mut self.files[idx]
    }

    /// Append the messages produced for `path`, creating its entry if needed.
    pub fn record(&mut self, path: &Path, messages: impl IntoIterator<Item = LintMessage>) {
        self.entry(path).messages.extend(messages);
    }

    /// Append a single message for `path`.
    pub fn push(&mut self, path: &Path, message: LintMessage) {
        self.entry(path).messages.push(message);
    }

    /// Messages for `path`; empty if the file is clean or unknown.
    pub fn messages(&self, path: &Path) -> &[LintMessage] {
        self.index
            .get(path)
            .map(|&idx| self.files[idx].messages.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.index.contains_key(path)
    }

    /// All linted files in order.
    pub fn iter(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter()
    }

    /// Linted files that have at least one message.
    pub fn files_with_findings(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|f| !f.messages.is_empty())
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    fn count(&self, severity: Severity) -> usize {
        self.files
            .iter()
            .flat_map(|f| &f.messages)
            .filter(|m| m.severity == severity)
            .count()
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    /// No messages at all.
    pub fn is_clean(&self) -> bool {
        self.files.iter().all(|f| f.messages.is_empty())
    }
}

impl fmt::Display for LintReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for file in self.files_with_findings() {
            writeln!(f, "{}", file.path.display())?;
            for message in &file.messages {
                writeln!(f, "  {message}")?;
            }
        }
        Ok(())
    }
}
