//! Document fetcher: local files through the converters.

use std::path::Path;
use websurfer_core::{Error, Result};

use super::Page;
use crate::markdown;
use crate::office;

/// Convert a local file into page text. Unsupported extensions are fetch
/// errors, not empty pages.
pub fn fetch_document(path: &Path) -> Result<Page> {
    if !path.exists() {
        return Err(Error::Fetch(format!("No such file: {}", path.display())));
    }

    let title = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.to_string());
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let text = match ext.as_str() {
        "pdf" => pdf_extract::extract_text(path)
            .map_err(|e| Error::Fetch(format!("Failed to extract PDF text: {}", e)))?,
        "xlsx" | "xls" | "docx" | "pptx" => office::read_office_file(path)?,
        "html" | "htm" => {
            let html = std::fs::read_to_string(path)?;
            markdown::html_to_markdown(&html)
        }
        "txt" | "md" | "markdown" | "csv" | "json" | "jsonl" | "xml" | "log" | "" => {
            std::fs::read_to_string(path)?
        }
        other => {
            return Err(Error::Fetch(format!(
                "Unsupported file extension '.{}' for {}",
                other,
                path.display()
            )))
        }
    };

    Ok(Page { title, text })
}
