use crate::canonical::canonicalize;
use crate::format::detect_format;
use crate::normalize::normalize_text;
use crate::text_diff::{DiffResult, TextDiffEngine};
use confdiff_common::{ComparisonConfig, ConfDiffError, DiffStatus, FormatKind, Result};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Report text for a pair with no differences
pub const IDENTICAL_REPORT: &str = "files identical";

/// Something the user should know about how a pair was compared
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComparisonNote {
    /// A structured file failed to parse; both sides were compared as text
    StructuredFallback { label: String, reason: String },
    /// The two files have different extensions; the left one decided
    FormatMismatch { left: FormatKind, right: FormatKind },
}

impl fmt::Display for ComparisonNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparisonNote::StructuredFallback { label, reason } => write!(
                f,
                "structured parse of {} failed, falling back to text comparison: {}",
                label, reason
            ),
            ComparisonNote::FormatMismatch { left, right } => write!(
                f,
                "files have different formats ({} vs {}), comparing both as {}",
                left, right, left
            ),
        }
    }
}

/// Result of comparing one file pair
#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub format: FormatKind,
    pub outcome: DiffResult,
    pub notes: Vec<ComparisonNote>,
}

impl Comparison {
    pub fn is_identical(&self) -> bool {
        self.outcome.is_identical()
    }

    pub fn status(&self) -> DiffStatus {
        if self.is_identical() {
            DiffStatus::Same
        } else {
            DiffStatus::Different
        }
    }

    /// The identical-files message or the rendered unified diff
    pub fn report(&self) -> &str {
        self.outcome.diff_text().unwrap_or(IDENTICAL_REPORT)
    }
}

/// Compares a single pair of configuration files
#[derive(Debug, Clone, Copy)]
pub struct FileComparator {
    config: ComparisonConfig,
    engine: TextDiffEngine,
}

impl FileComparator {
    pub fn new(config: ComparisonConfig) -> Self {
        Self {
            config,
            engine: TextDiffEngine::new(config.context_lines).with_algorithm(config.algorithm),
        }
    }

    pub fn config(&self) -> &ComparisonConfig {
        &self.config
    }

    /// Read both files and compare them. The format comes from the left
    /// file's extension.
    pub fn compare_files(&self, left: &Path, right: &Path) -> Result<Comparison> {
        let left_content = read_file(left)?;
        let right_content = read_file(right)?;

        let mut notes = Vec::new();
        let format = detect_format(left);
        let right_format = detect_format(right);
        if right_format != format {
            debug!("Format mismatch: {} vs {}", format, right_format);
            notes.push(ComparisonNote::FormatMismatch {
                left: format,
                right: right_format,
            });
        }

        let left_label = left.display().to_string();
        let right_label = right.display().to_string();
        let mut comparison = self.compare_as(
            format,
            &left_label,
            &left_content,
            &right_label,
            &right_content,
        )?;
        notes.append(&mut comparison.notes);
        comparison.notes = notes;
        Ok(comparison)
    }

    /// Compare in-memory contents; the format is detected from `left_label`
    pub fn compare_contents(
        &self,
        left_label: &str,
        left: &str,
        right_label: &str,
        right: &str,
    ) -> Result<Comparison> {
        let format = detect_format(Path::new(left_label));
        self.compare_as(format, left_label, left, right_label, right)
    }

    fn compare_as(
        &self,
        format: FormatKind,
        left_label: &str,
        left: &str,
        right_label: &str,
        right: &str,
    ) -> Result<Comparison> {
        let mut notes = Vec::new();

        let structured = if format.is_structured() {
            match self.canonicalize_pair(format, left_label, left, right_label, right) {
                Ok(pair) => Some(pair),
                Err((label, err)) => {
                    debug!("Falling back to text comparison for {}: {}", label, err);
                    notes.push(ComparisonNote::StructuredFallback {
                        label,
                        reason: err.to_string(),
                    });
                    None
                }
            }
        } else {
            None
        };

        let (left_text, right_text) = match structured {
            Some(pair) => pair,
            None => (
                normalize_text(left, &self.config),
                normalize_text(right, &self.config),
            ),
        };

        let outcome = self
            .engine
            .diff(&left_text, &right_text, left_label, right_label)?;

        Ok(Comparison {
            format,
            outcome,
            notes,
        })
    }

    fn canonicalize_pair(
        &self,
        format: FormatKind,
        left_label: &str,
        left: &str,
        right_label: &str,
        right: &str,
    ) -> std::result::Result<(String, String), (String, ConfDiffError)> {
        let ignore_order = self.config.ignore_key_order;
        let left_text = canonicalize(left, format, ignore_order)
            .map_err(|e| (left_label.to_string(), e))?;
        let right_text = canonicalize(right, format, ignore_order)
            .map_err(|e| (right_label.to_string(), e))?;
        Ok((left_text, right_text))
    }
}

impl Default for FileComparator {
    fn default() -> Self {
        Self::new(ComparisonConfig::default())
    }
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| ConfDiffError::file_read(path, e))
}
