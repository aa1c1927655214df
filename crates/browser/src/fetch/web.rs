//! Web fetcher: HTTP GET with content-type-driven conversion.
//!
//! HTML is converted to markdown, JSON is pretty-printed, PDFs are
//! downloaded to the scratch directory and text-extracted page by page.
//! Non-2xx responses and non-textual content types are fetch errors.

use std::path::Path;
use tracing::debug;
use websurfer_core::{Error, Result};

use super::Page;
use crate::markdown;

/// Fetch a URL and normalize the response into page text.
pub async fn fetch_url(client: &reqwest::Client, url: &str, downloads_dir: &Path) -> Result<Page> {
    // arXiv abstract pages link a rendered PDF; go straight to it.
    let url = if url.contains("arxiv.org/abs/") {
        url.replace("arxiv.org/abs/", "arxiv.org/pdf/")
    } else {
        url.to_string()
    };

    let response = client
        .get(&url)
        .header("Accept", "text/html, application/pdf;q=0.9, */*;q=0.8")
        .send()
        .await
        .map_err(|e| Error::Fetch(format!("Request to {} failed: {}", url, e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::Fetch(format!("HTTP {} for {}", status, url)));
    }

    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_lowercase();

    debug!(url = %final_url, content_type = %content_type, "fetched");

    if content_type.contains("application/pdf") || url_has_suffix(&final_url, ".pdf") {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Fetch(format!("Failed to read PDF body: {}", e)))?;
        return pdf_page(&final_url, &bytes, downloads_dir);
    }

    let body = response
        .text()
        .await
        .map_err(|e| Error::Fetch(format!("Failed to read response body: {}", e)))?;

    if content_type.contains("text/html") || content_type.contains("application/xhtml") {
        let title = markdown::extract_title(&body);
        return Ok(Page {
            title,
            text: markdown::html_to_markdown(&body),
        });
    }

    if content_type.contains("application/json") || url_has_suffix(&final_url, ".json") {
        let text = match serde_json::from_str::<serde_json::Value>(&body) {
            Ok(value) => serde_json::to_string_pretty(&value).unwrap_or(body),
            Err(_) => body,
        };
        return Ok(Page { title: None, text });
    }

    if content_type.starts_with("text/") || content_type.is_empty() {
        return Ok(Page { title: None, text: body });
    }

    Err(Error::Fetch(format!(
        "Unsupported content type '{}' at {}",
        content_type, final_url
    )))
}

/// Write the PDF to the scratch directory and extract its text. Artifacts
/// are not content-addressed and are not cleaned up before process exit.
fn pdf_page(url: &str, bytes: &[u8], downloads_dir: &Path) -> Result<Page> {
    std::fs::create_dir_all(downloads_dir)?;
    let file_name = artifact_name(url);
    let path = downloads_dir.join(&file_name);
    std::fs::write(&path, bytes)?;

    let text = pdf_extract::extract_text(&path)
        .map_err(|e| Error::Fetch(format!("Failed to extract PDF text from {}: {}", url, e)))?;

    Ok(Page {
        title: Some(file_name),
        text,
    })
}

/// Derive a scratch file name from the last URL path segment.
fn artifact_name(url: &str) -> String {
    let tail = url
        .split('?')
        .next()
        .unwrap_or(url)
        .rsplit('/')
        .next()
        .unwrap_or("")
        .trim();
    let safe: String = tail
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if safe.is_empty() {
        format!("{}.pdf", uuid::Uuid::new_v4())
    } else if safe.to_lowercase().ends_with(".pdf") {
        safe
    } else {
        format!("{}.pdf", safe)
    }
}

fn url_has_suffix(url: &str, suffix: &str) -> bool {
    url.split('?')
        .next()
        .unwrap_or(url)
        .to_lowercase()
        .ends_with(suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_name_from_url() {
        assert_eq!(artifact_name("https://x.org/papers/fish.pdf"), "fish.pdf");
        assert_eq!(artifact_name("https://x.org/papers/fish.pdf?dl=1"), "fish.pdf");
        assert_eq!(artifact_name("https://arxiv.org/pdf/2101.01234"), "2101.01234.pdf");
        assert!(artifact_name("https://x.org/").ends_with(".pdf"));
    }

    #[test]
    fn test_url_has_suffix() {
        assert!(url_has_suffix("https://x.org/a.PDF", ".pdf"));
        assert!(url_has_suffix("https://x.org/a.pdf?v=2", ".pdf"));
        assert!(!url_has_suffix("https://x.org/a.pdf.html", ".pdf"));
    }
}
