//! HTML-to-Markdown conversion for the web and document fetchers.
//!
//! `htmd` does the heavy lifting; `scraper` provides a plain-text fallback
//! when conversion fails, and title extraction.

/// Convert HTML to clean Markdown.
///
/// Strips nav, header, footer, script, style, aside and similar chrome to
/// focus on main content. Preserves headings, links, lists, tables, code
/// blocks, and emphasis.
pub fn html_to_markdown(html: &str) -> String {
    use htmd::HtmlToMarkdown;

    let converter = HtmlToMarkdown::builder()
        .skip_tags(vec![
            "script", "style", "nav", "footer", "header", "aside", "noscript", "iframe",
        ])
        .build();

    match converter.convert(html) {
        Ok(md) => clean_markdown(&md),
        Err(_) => extract_text_fallback(html),
    }
}

/// Extract the `<title>` element, if any.
pub fn extract_title(html: &str) -> Option<String> {
    use scraper::{Html, Selector};

    let document = Html::parse_document(html);
    let selector = Selector::parse("title").ok()?;
    let title = document
        .select(&selector)
        .next()?
        .text()
        .collect::<Vec<_>>()
        .join("")
        .trim()
        .to_string();
    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

/// Collapse excessive blank lines (3+ become 2) and trim the edges.
fn clean_markdown(md: &str) -> String {
    let mut result = String::with_capacity(md.len());
    let mut pending_blank = false;

    for line in md.lines() {
        if line.trim().is_empty() {
            pending_blank = true;
        } else {
            if !result.is_empty() {
                result.push('\n');
                if pending_blank {
                    result.push('\n');
                }
            }
            pending_blank = false;
            result.push_str(line);
        }
    }

    result.trim().to_string()
}

/// Plain-text extraction used when htmd fails on malformed markup.
fn extract_text_fallback(html: &str) -> String {
    use scraper::{Html, Selector};

    let document = Html::parse_document(html);

    let selectors = ["article", "main", "[role=\"main\"]", "body"];
    for sel_str in selectors {
        if let Ok(selector) = Selector::parse(sel_str) {
            if let Some(element) = document.select(&selector).next() {
                let text: String = element
                    .text()
                    .collect::<Vec<_>>()
                    .join(" ")
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ");
                if !text.is_empty() {
                    return text;
                }
            }
        }
    }

    document
        .root_element()
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
