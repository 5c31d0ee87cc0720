pub mod batch;
pub mod canonical;
pub mod comparison;
pub mod format;
pub mod normalize;
pub mod style;
pub mod text_diff;

pub use batch::{BatchComparator, BatchEntry, BatchReport, BatchSummary};
pub use canonical::{canonicalize, CanonicalValue};
pub use comparison::{Comparison, ComparisonNote, FileComparator, IDENTICAL_REPORT};
pub use format::detect_format;
pub use normalize::{normalize_lines, normalize_text};
pub use style::colorize;
pub use text_diff::{DiffResult, TextDiffEngine};
