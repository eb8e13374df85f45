//! PDF collaborators: text extraction via `pdftotext` and folder listing.

use std::path::Path;
use std::process::Command;

use crate::exit_codes::EXIT_IO_ERROR;
use crate::CliError;

/// Run `pdftotext -layout <file> -` and capture stdout.
pub fn extract_text(file: &Path) -> Result<String, CliError> {
    which::which("pdftotext").map_err(|_| CliError {
        code: EXIT_IO_ERROR,
        message: "pdftotext not installed (poppler-utils)".to_string(),
        hint: Some("Install with: apt install poppler-utils / brew install poppler".to_string()),
    })?;

    let file_str = file
        .to_str()
        .ok_or_else(|| CliError::args(format!("invalid file path: {}", file.display())))?;

    let output = Command::new("pdftotext")
        .args(["-layout", file_str, "-"])
        .output()
        .map_err(|e| CliError::io(format!("failed to run pdftotext: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(CliError::io(format!(
            "pdftotext failed (exit {}): {}",
            output.status.code().unwrap_or(-1),
            stderr.trim(),
        )));
    }

    let text = String::from_utf8_lossy(&output.stdout).to_string();
    if text.trim().is_empty() {
        return Err(CliError::parse(
            "PDF appears scanned/image-only, text extraction failed",
        ));
    }

    Ok(text)
}

/// List the `.pdf` file names in a folder, sorted so runs are
/// deterministic.
pub fn list_pdf_files(dir: &Path) -> Result<Vec<String>, CliError> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| CliError::io(format!("cannot read {}: {}", dir.display(), e)))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| CliError::io(e.to_string()))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.to_lowercase().ends_with(".pdf") {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}
