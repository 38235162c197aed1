use std::fs;
use std::path::Path;

/// Shortest round-trip text for a float, keeping a trailing `.0` on
/// integral values (`26.9815385`, `63.546`, `1.0`).
pub fn format_float(value: f64) -> String {
    format!("{value:?}")
}

pub fn normalize_text_artifact(content: &str) -> String {
    let mut normalized = content.replace("\r\n", "\n").replace('\r', "\n");
    if !normalized.is_empty() && !normalized.ends_with('\n') {
        normalized.push('\n');
    }
    normalized
}

pub fn write_text_artifact(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, normalize_text_artifact(content))
}
