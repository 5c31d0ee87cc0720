use confdiff_common::FormatKind;
use std::path::Path;

/// Map a file name to its comparison strategy.
///
/// Only the extension is consulted, case-insensitively. Anything that is not
/// YAML or JSON (`.ini`, `.conf`, `.cfg`, no extension...) is plain text.
pub fn detect_format(path: &Path) -> FormatKind {
    let Some(ext) = path.extension() else {
        return FormatKind::Text;
    };

    match ext.to_string_lossy().to_lowercase().as_str() {
        "yaml" | "yml" => FormatKind::Yaml,
        "json" => FormatKind::Json,
        _ => FormatKind::Text,
    }
}
