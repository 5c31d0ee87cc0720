use clap::{Parser, ValueEnum};
use confdiff_common::{ComparisonConfig, DiffAlgorithm, DiffStatus, FormatKind};
use confdiff_core::style::{paint, Color};
use confdiff_core::{
    colorize, detect_format, BatchComparator, BatchReport, BatchSummary, Comparison,
    FileComparator, IDENTICAL_REPORT,
};
use serde::Serialize;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const RULE_WIDTH: usize = 60;

#[derive(Parser)]
#[command(name = "confdiff")]
#[command(author = "ConfDiff Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Semantics-aware diff for YAML, JSON and INI-style configuration files", long_about = None)]
struct Cli {
    /// First file (or directory with --directory)
    file1: PathBuf,

    /// Second file (or directory with --directory)
    file2: PathBuf,

    /// Compare two directories instead of two files
    #[arg(short, long)]
    directory: bool,

    /// File name pattern for directory mode
    #[arg(short, long, default_value = "*")]
    pattern: String,

    /// Ignore mapping key order in YAML/JSON
    #[arg(long)]
    ignore_order: bool,

    /// Keep comments when comparing text files
    #[arg(long)]
    no_ignore_comments: bool,

    /// Keep blank lines when comparing text files
    #[arg(long)]
    no_ignore_blank: bool,

    /// Number of context lines around each change
    #[arg(short, long, default_value_t = 3)]
    context: usize,

    /// Line matching algorithm
    #[arg(long, value_enum, default_value_t = AlgorithmArg::Myers)]
    algorithm: AlgorithmArg,

    /// Disable ANSI colors in output
    #[arg(long)]
    no_color: bool,

    /// Output results as JSON
    #[arg(long)]
    json: bool,

    /// List files present in only one directory
    #[arg(long, requires = "directory")]
    show_orphans: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum AlgorithmArg {
    Myers,
    Patience,
    Lcs,
}

impl From<AlgorithmArg> for DiffAlgorithm {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::Myers => DiffAlgorithm::Myers,
            AlgorithmArg::Patience => DiffAlgorithm::Patience,
            AlgorithmArg::Lcs => DiffAlgorithm::Lcs,
        }
    }
}

impl Cli {
    fn comparison_config(&self) -> ComparisonConfig {
        ComparisonConfig::new()
            .with_ignore_comments(!self.no_ignore_comments)
            .with_ignore_blank_lines(!self.no_ignore_blank)
            .with_ignore_key_order(self.ignore_order)
            .with_context_lines(self.context)
            .with_algorithm(self.algorithm.into())
    }
}

fn main() {
    // Logs go to stderr so the report on stdout stays clean
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version are not failures
            std::process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };

    let config = cli.comparison_config();
    let use_color = !cli.no_color && !cli.json && std::io::stdout().is_terminal();
    debug!("Comparison config: {:?}", config);

    let result = if cli.directory {
        run_directory(&cli, config, use_color)
    } else {
        run_single(&cli, config, use_color)
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            print_error(&e, cli.json, use_color);
            std::process::exit(1);
        }
    }
}

fn run_single(cli: &Cli, config: ComparisonConfig, use_color: bool) -> anyhow::Result<bool> {
    let comparator = FileComparator::new(config);

    if cli.json {
        let comparison = comparator.compare_files(&cli.file1, &cli.file2)?;
        let report = build_file_report(&cli.file1, &cli.file2, &comparison);
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(comparison.is_identical());
    }

    print_banner(&cli.file1, &cli.file2, detect_format(&cli.file1), use_color);
    let comparison = comparator.compare_files(&cli.file1, &cli.file2)?;
    print_comparison(&comparison, use_color);

    Ok(comparison.is_identical())
}

fn run_directory(cli: &Cli, config: ComparisonConfig, use_color: bool) -> anyhow::Result<bool> {
    let report = BatchComparator::new(config).compare_dirs(&cli.file1, &cli.file2, &cli.pattern)?;

    if cli.json {
        let json_report = build_batch_report(
            &cli.file1,
            &cli.file2,
            &cli.pattern,
            &report,
            cli.show_orphans,
        );
        println!("{}", serde_json::to_string_pretty(&json_report)?);
        return Ok(report.all_identical());
    }

    if cli.show_orphans {
        print_orphans(&cli.file1, &report.left_only, use_color);
        print_orphans(&cli.file2, &report.right_only, use_color);
    }

    println!(
        "\n{}\n",
        paint(
            &format!("Comparing common files ({}):", report.entries.len()),
            Color::Cyan,
            use_color
        )
    );

    for entry in &report.entries {
        let rule = "=".repeat(RULE_WIDTH);
        println!("\n{}", paint(&rule, Color::Cyan, use_color));
        println!("{}", paint(&format!("Compare: {}", entry.name), Color::Cyan, use_color));
        println!("{}\n", paint(&rule, Color::Cyan, use_color));

        match (&entry.comparison, &entry.error) {
            (Some(comparison), _) => print_comparison(comparison, use_color),
            (None, Some(error)) => {
                println!("{}", paint(&format!("Error: {}", error), Color::Red, use_color))
            }
            (None, None) => {}
        }
    }

    print_summary(&report.summary(), use_color);

    Ok(report.all_identical())
}

fn print_banner(left: &Path, right: &Path, format: FormatKind, use_color: bool) {
    println!("{}", paint(&format!("Format: {}", format), Color::Cyan, use_color));
    println!("{}", paint(&format!("File 1: {}", left.display()), Color::Cyan, use_color));
    println!("{}", paint(&format!("File 2: {}", right.display()), Color::Cyan, use_color));
    println!("{}\n", paint(&"=".repeat(RULE_WIDTH), Color::Cyan, use_color));
}

fn print_comparison(comparison: &Comparison, use_color: bool) {
    for note in &comparison.notes {
        println!("{}", paint(&format!("Warning: {}", note), Color::Yellow, use_color));
    }

    if comparison.is_identical() {
        println!("{}", paint(IDENTICAL_REPORT, Color::Green, use_color));
    } else {
        print!("{}", colorize(comparison.report(), use_color));
    }
}

fn print_orphans(dir: &Path, names: &[String], use_color: bool) {
    if names.is_empty() {
        return;
    }
    println!(
        "\n{}",
        paint(&format!("Only in {}:", dir.display()), Color::Yellow, use_color)
    );
    for name in names {
        println!("  {}", name);
    }
}

fn print_summary(summary: &BatchSummary, use_color: bool) {
    let rule = "=".repeat(RULE_WIDTH);
    println!("\n{}", paint(&rule, Color::Cyan, use_color));
    println!("{}", paint("Summary", Color::Cyan, use_color));
    println!("{}", paint(&rule, Color::Cyan, use_color));
    println!(
        "{}",
        paint(&format!("Identical: {}", summary.identical), Color::Green, use_color)
    );
    println!(
        "{}",
        paint(&format!("Different: {}", summary.different), Color::Red, use_color)
    );
    if summary.failed > 0 {
        println!(
            "{}",
            paint(&format!("Failed:    {}", summary.failed), Color::Red, use_color)
        );
    }
    println!("Total:     {}", summary.total);
}

/// Errors keep stdout machine-readable in `--json` mode
fn print_error(error: &anyhow::Error, json: bool, use_color: bool) {
    if json {
        match serde_json::to_string_pretty(&build_error_report(error)) {
            Ok(text) => {
                println!("{}", text);
                return;
            }
            Err(e) => debug!("Failed to serialize error report: {}", e),
        }
    }
    println!("{}", paint(&format!("Error: {}", error), Color::Red, use_color));
}

#[derive(Serialize)]
struct JsonErrorReport {
    error: String,
}

fn build_error_report(error: &anyhow::Error) -> JsonErrorReport {
    JsonErrorReport {
        error: error.to_string(),
    }
}

#[derive(Serialize)]
struct JsonFileReport {
    left: String,
    right: String,
    format: FormatKind,
    identical: bool,
    diff: Option<String>,
    warnings: Vec<String>,
}

#[derive(Serialize)]
struct JsonBatchReport {
    left: String,
    right: String,
    pattern: String,
    summary: BatchSummary,
    entries: Vec<JsonBatchEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    left_only: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    right_only: Option<Vec<String>>,
}

#[derive(Serialize)]
struct JsonBatchEntry {
    name: String,
    status: DiffStatus,
    format: Option<FormatKind>,
    diff: Option<String>,
    warnings: Vec<String>,
    error: Option<String>,
}

fn build_file_report(left: &Path, right: &Path, comparison: &Comparison) -> JsonFileReport {
    JsonFileReport {
        left: left.to_string_lossy().to_string(),
        right: right.to_string_lossy().to_string(),
        format: comparison.format,
        identical: comparison.is_identical(),
        diff: comparison.outcome.diff_text().map(str::to_string),
        warnings: comparison.notes.iter().map(ToString::to_string).collect(),
    }
}

fn build_batch_report(
    left: &Path,
    right: &Path,
    pattern: &str,
    report: &BatchReport,
    show_orphans: bool,
) -> JsonBatchReport {
    let entries = report
        .entries
        .iter()
        .map(|entry| JsonBatchEntry {
            name: entry.name.clone(),
            status: entry.status,
            format: entry.comparison.as_ref().map(|c| c.format),
            diff: entry
                .comparison
                .as_ref()
                .and_then(|c| c.outcome.diff_text())
                .map(str::to_string),
            warnings: entry
                .comparison
                .as_ref()
                .map(|c| c.notes.iter().map(ToString::to_string).collect())
                .unwrap_or_default(),
            error: entry.error.clone(),
        })
        .collect();

    JsonBatchReport {
        left: left.to_string_lossy().to_string(),
        right: right.to_string_lossy().to_string(),
        pattern: pattern.to_string(),
        summary: report.summary(),
        entries,
        left_only: show_orphans.then(|| report.left_only.clone()),
        right_only: show_orphans.then(|| report.right_only.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use confdiff_common::ConfDiffError;
    use confdiff_core::{BatchEntry, ComparisonNote, DiffResult};

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("confdiff").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_default_flags() {
        let cli = parse(&["a.yaml", "b.yaml"]);
        let config = cli.comparison_config();
        assert_eq!(config, ComparisonConfig::default());
        assert!(!cli.directory);
        assert_eq!(cli.pattern, "*");
    }

    #[test]
    fn test_inverse_flags() {
        let cli = parse(&[
            "--ignore-order",
            "--no-ignore-comments",
            "--no-ignore-blank",
            "-c",
            "7",
            "--algorithm",
            "patience",
            "a.json",
            "b.json",
        ]);
        let config = cli.comparison_config();
        assert!(config.ignore_key_order);
        assert!(!config.ignore_comments);
        assert!(!config.ignore_blank_lines);
        assert_eq!(config.context_lines, 7);
        assert_eq!(config.algorithm, DiffAlgorithm::Patience);
    }

    #[test]
    fn test_directory_flags() {
        let cli = parse(&["-d", "-p", "*.conf", "--show-orphans", "prod", "stage"]);
        assert!(cli.directory);
        assert!(cli.show_orphans);
        assert_eq!(cli.pattern, "*.conf");
    }

    #[test]
    fn test_show_orphans_requires_directory() {
        let result = Cli::try_parse_from(["confdiff", "--show-orphans", "a", "b"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_negative_context_rejected() {
        let result = Cli::try_parse_from(["confdiff", "-c", "-1", "a", "b"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_build_file_report() {
        let comparison = Comparison {
            format: FormatKind::Json,
            outcome: DiffResult::Different(String::from("--- a\n+++ b\n")),
            notes: vec![ComparisonNote::FormatMismatch {
                left: FormatKind::Json,
                right: FormatKind::Yaml,
            }],
        };

        let report = build_file_report(Path::new("a.json"), Path::new("b.yml"), &comparison);
        assert_eq!(report.left, "a.json");
        assert!(!report.identical);
        assert_eq!(report.diff.as_deref(), Some("--- a\n+++ b\n"));
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_build_batch_report_orphans_gated() {
        let report = BatchReport {
            entries: vec![
                BatchEntry {
                    name: String::from("app.yaml"),
                    status: DiffStatus::Same,
                    comparison: Some(Comparison {
                        format: FormatKind::Yaml,
                        outcome: DiffResult::Identical,
                        notes: Vec::new(),
                    }),
                    error: None,
                },
                BatchEntry {
                    name: String::from("broken.conf"),
                    status: DiffStatus::Failed,
                    comparison: None,
                    error: Some(String::from("Failed to read broken.conf")),
                },
            ],
            left_only: vec![String::from("old.conf")],
            right_only: Vec::new(),
        };

        let hidden = build_batch_report(Path::new("/l"), Path::new("/r"), "*", &report, false);
        assert!(hidden.left_only.is_none());
        assert_eq!(hidden.summary.total, 2);
        assert_eq!(hidden.summary.identical, 1);
        assert_eq!(hidden.summary.failed, 1);
        assert_eq!(hidden.entries[0].format, Some(FormatKind::Yaml));
        assert!(hidden.entries[0].diff.is_none());
        assert!(hidden.entries[1].error.is_some());

        let shown = build_batch_report(Path::new("/l"), Path::new("/r"), "*", &report, true);
        assert_eq!(shown.left_only, Some(vec![String::from("old.conf")]));
        assert_eq!(shown.right_only, Some(Vec::new()));
    }

    #[test]
    fn test_build_error_report() {
        let error = anyhow::Error::from(ConfDiffError::Directory(String::from("/missing")));
        let report = build_error_report(&error);
        assert_eq!(report.error, "Not a directory: /missing");

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["error"], "Not a directory: /missing");
    }
}
