use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison strategy selected from a file's extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatKind {
    Yaml,
    Json,
    /// INI-like and arbitrary text, compared line by line
    Text,
}

impl FormatKind {
    /// Whether the format is parsed into a tree before diffing
    pub fn is_structured(self) -> bool {
        matches!(self, FormatKind::Yaml | FormatKind::Json)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FormatKind::Yaml => "yaml",
            FormatKind::Json => "json",
            FormatKind::Text => "text",
        }
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Line matching algorithm used by the diff engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffAlgorithm {
    /// Minimal edit script (default)
    #[default]
    Myers,
    /// Anchors on unique lines; often reads better for reordered blocks
    Patience,
    /// Classic longest common subsequence table
    Lcs,
}

/// Equivalence rules for one invocation.
///
/// Built once from the command line and passed by value to every core
/// operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonConfig {
    /// Drop `#` comment lines and trailing `#` fragments from text input
    pub ignore_comments: bool,
    /// Drop lines that are empty after trimming
    pub ignore_blank_lines: bool,
    /// Sort mapping keys of YAML/JSON documents before diffing
    pub ignore_key_order: bool,
    /// Unchanged lines shown around each change
    pub context_lines: usize,
    #[serde(default)]
    pub algorithm: DiffAlgorithm,
}

impl ComparisonConfig {
    pub fn new() -> Self {
        Self {
            ignore_comments: true,
            ignore_blank_lines: true,
            ignore_key_order: false,
            context_lines: 3,
            algorithm: DiffAlgorithm::Myers,
        }
    }

    pub fn with_ignore_comments(mut self, enabled: bool) -> Self {
        self.ignore_comments = enabled;
        self
    }

    pub fn with_ignore_blank_lines(mut self, enabled: bool) -> Self {
        self.ignore_blank_lines = enabled;
        self
    }

    pub fn with_ignore_key_order(mut self, enabled: bool) -> Self {
        self.ignore_key_order = enabled;
        self
    }

    pub fn with_context_lines(mut self, lines: usize) -> Self {
        self.context_lines = lines;
        self
    }

    pub fn with_algorithm(mut self, algorithm: DiffAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Status of a file pair comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffStatus {
    /// Canonical forms are identical
    Same,
    /// A diff was produced
    Different,
    /// The pair could not be compared (read or render failure)
    Failed,
}
