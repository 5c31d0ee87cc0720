use crate::comparison::{Comparison, FileComparator};
use confdiff_common::{ComparisonConfig, ConfDiffError, DiffStatus, Result};
use glob::Pattern;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One common file name and how its pair compared
#[derive(Debug, Clone, Serialize)]
pub struct BatchEntry {
    pub name: String,
    pub status: DiffStatus,
    pub comparison: Option<Comparison>,
    /// Read or render failure for this pair
    pub error: Option<String>,
}

/// Counts over all compared pairs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub identical: usize,
    pub different: usize,
    pub failed: usize,
    pub total: usize,
}

/// Result of comparing two directories
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// Common names, sorted
    pub entries: Vec<BatchEntry>,
    /// Matching names found only in the left directory
    pub left_only: Vec<String>,
    /// Matching names found only in the right directory
    pub right_only: Vec<String>,
}

impl BatchReport {
    pub fn summary(&self) -> BatchSummary {
        let mut summary = BatchSummary {
            total: self.entries.len(),
            ..Default::default()
        };
        for entry in &self.entries {
            match entry.status {
                DiffStatus::Same => summary.identical += 1,
                DiffStatus::Different => summary.different += 1,
                DiffStatus::Failed => summary.failed += 1,
            }
        }
        summary
    }

    /// True when every common pair compared identical
    pub fn all_identical(&self) -> bool {
        self.entries
            .iter()
            .all(|entry| entry.status == DiffStatus::Same)
    }
}

/// Runs the file comparator over the files two directories share
#[derive(Debug, Clone, Copy)]
pub struct BatchComparator {
    comparator: FileComparator,
}

impl BatchComparator {
    pub fn new(config: ComparisonConfig) -> Self {
        Self {
            comparator: FileComparator::new(config),
        }
    }

    /// Compare every regular file whose name matches `pattern` in both
    /// directories.
    ///
    /// Only the top level of each directory is matched. A pair that cannot be
    /// read is recorded as failed and the batch continues.
    pub fn compare_dirs(
        &self,
        left_dir: &Path,
        right_dir: &Path,
        pattern: &str,
    ) -> Result<BatchReport> {
        let left_names = matching_file_names(left_dir, pattern)?;
        let right_names = matching_file_names(right_dir, pattern)?;

        let common: Vec<&String> = left_names.intersection(&right_names).collect();
        debug!(
            "Found {} common files ({} left, {} right)",
            common.len(),
            left_names.len(),
            right_names.len()
        );

        let entries = common
            .into_iter()
            .map(|name| self.compare_pair(name, &left_dir.join(name), &right_dir.join(name)))
            .collect();

        Ok(BatchReport {
            entries,
            left_only: left_names.difference(&right_names).cloned().collect(),
            right_only: right_names.difference(&left_names).cloned().collect(),
        })
    }

    fn compare_pair(&self, name: &str, left: &Path, right: &Path) -> BatchEntry {
        match self.comparator.compare_files(left, right) {
            Ok(comparison) => BatchEntry {
                name: name.to_string(),
                status: comparison.status(),
                comparison: Some(comparison),
                error: None,
            },
            Err(err) => {
                warn!("Failed to compare {}: {}", name, err);
                BatchEntry {
                    name: name.to_string(),
                    status: DiffStatus::Failed,
                    comparison: None,
                    error: Some(err.to_string()),
                }
            }
        }
    }
}

/// Base names of the regular files in `dir` matching `pattern`
fn matching_file_names(dir: &Path, pattern: &str) -> Result<BTreeSet<String>> {
    if !dir.is_dir() {
        return Err(ConfDiffError::Directory(dir.display().to_string()));
    }

    let full_pattern: PathBuf = PathBuf::from(Pattern::escape(&dir.to_string_lossy())).join(pattern);
    let paths = glob::glob(&full_pattern.to_string_lossy())
        .map_err(|e| ConfDiffError::Pattern(format!("{}: {}", pattern, e)))?;

    let mut names = BTreeSet::new();
    for path in paths {
        let path = match path {
            Ok(path) => path,
            Err(e) => {
                debug!("Skipping unreadable glob entry: {}", e);
                continue;
            }
        };
        if !path.is_file() {
            continue;
        }
        if let Some(name) = path.file_name() {
            names.insert(name.to_string_lossy().to_string());
        }
    }

    Ok(names)
}
