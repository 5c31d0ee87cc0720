use confdiff_common::{ConfDiffError, DiffAlgorithm, Result};
use serde::Serialize;
use similar::{Algorithm, ChangeTag, DiffOp, DiffTag, TextDiff};
use std::fmt::Write;
use std::ops::Range;

/// Outcome of diffing two canonical texts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "diff", rename_all = "lowercase")]
pub enum DiffResult {
    Identical,
    /// Rendered unified diff, headers included
    Different(String),
}

impl DiffResult {
    pub fn is_identical(&self) -> bool {
        matches!(self, DiffResult::Identical)
    }

    pub fn diff_text(&self) -> Option<&str> {
        match self {
            DiffResult::Identical => None,
            DiffResult::Different(text) => Some(text),
        }
    }
}

/// Line-level unified diff engine
#[derive(Debug, Clone, Copy)]
pub struct TextDiffEngine {
    context_lines: usize,
    algorithm: DiffAlgorithm,
}

impl TextDiffEngine {
    pub fn new(context_lines: usize) -> Self {
        Self {
            context_lines,
            algorithm: DiffAlgorithm::Myers,
        }
    }

    pub fn with_algorithm(mut self, algorithm: DiffAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn context_lines(&self) -> usize {
        self.context_lines
    }

    /// Diff two texts and render the changed regions as a unified diff.
    ///
    /// Line endings are part of each line, so a missing final newline is a
    /// difference and is marked in the output. Hunks whose context windows
    /// touch or overlap are merged.
    pub fn diff(
        &self,
        left: &str,
        right: &str,
        left_label: &str,
        right_label: &str,
    ) -> Result<DiffResult> {
        let diff = TextDiff::configure()
            .algorithm(to_similar_algorithm(self.algorithm))
            .diff_lines(left, right);

        let mut groups = diff.grouped_ops(self.context_lines);
        groups.retain(|group| group.iter().any(|op| op.tag() != DiffTag::Equal));

        if groups.is_empty() {
            return Ok(DiffResult::Identical);
        }

        let mut output = String::new();
        render_unified(&diff, &groups, left_label, right_label, &mut output)
            .map_err(|e| ConfDiffError::DiffRender(e.to_string()))?;

        Ok(DiffResult::Different(output))
    }
}

impl Default for TextDiffEngine {
    fn default() -> Self {
        Self::new(3)
    }
}

fn to_similar_algorithm(algorithm: DiffAlgorithm) -> Algorithm {
    match algorithm {
        DiffAlgorithm::Myers => Algorithm::Myers,
        DiffAlgorithm::Patience => Algorithm::Patience,
        DiffAlgorithm::Lcs => Algorithm::Lcs,
    }
}

const NO_NEWLINE_MARKER: &str = "\\ No newline at end of file\n";

fn render_unified(
    diff: &TextDiff<'_, '_, '_, str>,
    groups: &[Vec<DiffOp>],
    left_label: &str,
    right_label: &str,
    out: &mut String,
) -> std::fmt::Result {
    writeln!(out, "--- {}", left_label)?;
    writeln!(out, "+++ {}", right_label)?;

    for group in groups {
        let (Some(first), Some(last)) = (group.first(), group.last()) else {
            continue;
        };
        let old_range = first.old_range().start..last.old_range().end;
        let new_range = first.new_range().start..last.new_range().end;

        writeln!(
            out,
            "@@ -{} +{} @@",
            format_range(&old_range),
            format_range(&new_range)
        )?;

        for op in group {
            for change in diff.iter_changes(op) {
                let sign = match change.tag() {
                    ChangeTag::Equal => ' ',
                    ChangeTag::Delete => '-',
                    ChangeTag::Insert => '+',
                };
                let value = change.value();
                out.push(sign);
                out.push_str(value);
                if !value.ends_with('\n') {
                    out.push('\n');
                    out.push_str(NO_NEWLINE_MARKER);
                }
            }
        }
    }

    Ok(())
}

/// `start,len` with a 1-based start; an empty range names the line before it
fn format_range(range: &Range<usize>) -> String {
    let len = range.end - range.start;
    let start = if len == 0 { range.start } else { range.start + 1 };
    format!("{},{}", start, len)
}
