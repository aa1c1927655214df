//! The text browser session: one mutable value owning navigation history,
//! the current page, pagination state, and in-page find state.
//!
//! The session multiplexes over heterogeneous sources (search listings,
//! live pages, local documents) through the fetcher dispatch; everything
//! it holds is the normalized plain-text representation.

use chrono::{DateTime, Utc};
use regex::{Regex, RegexBuilder};
use std::ops::Range;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;
use websurfer_core::config::BrowserConfig;
use websurfer_core::{Error, Result};

use crate::address::Address;
use crate::fetch::{Fetcher, SearchProvider};

/// Offsets are only valid against the `page_content` they were computed
/// from; any new load drops this state.
struct FindState {
    regex: Regex,
    last_match_start: usize,
}

pub struct Browser {
    viewport_size: usize,
    fetcher: Fetcher,
    /// Visit log: append-only, one entry per successful load. Re-visits
    /// append a fresh entry; failed visits append nothing.
    history: Vec<(String, DateTime<Utc>)>,
    page_title: Option<String>,
    page_content: String,
    viewport_pages: Vec<Range<usize>>,
    viewport_current_page: usize,
    find_state: Option<FindState>,
}

impl Browser {
    pub fn new(config: &BrowserConfig, downloads_dir: PathBuf) -> Self {
        Self::with_fetcher(config, Fetcher::new(config, downloads_dir))
    }

    /// Construct with a stubbed search provider. Used by tests and by
    /// callers that bring their own search backend.
    pub fn with_search_provider(
        config: &BrowserConfig,
        downloads_dir: PathBuf,
        search: Arc<dyn SearchProvider>,
    ) -> Self {
        Self::with_fetcher(
            config,
            Fetcher::with_search_provider(config, downloads_dir, search),
        )
    }

    fn with_fetcher(config: &BrowserConfig, fetcher: Fetcher) -> Self {
        let mut browser = Self {
            viewport_size: config.viewport_size.max(1),
            fetcher,
            history: vec![("about:blank".to_string(), Utc::now())],
            page_title: None,
            page_content: String::new(),
            viewport_pages: Vec::new(),
            viewport_current_page: 0,
            find_state: None,
        };
        browser.set_content(String::new(), None);
        browser
    }

    /// The address of the current page (the last successful load).
    pub fn address(&self) -> &str {
        // History always holds at least the initial blank entry.
        self.history
            .last()
            .map(|(addr, _)| addr.as_str())
            .unwrap_or("about:blank")
    }

    pub fn page_title(&self) -> Option<&str> {
        self.page_title.as_deref()
    }

    pub fn page_content(&self) -> &str {
        &self.page_content
    }

    pub fn history(&self) -> &[(String, DateTime<Utc>)] {
        &self.history
    }

    pub fn viewport_pages(&self) -> &[Range<usize>] {
        &self.viewport_pages
    }

    pub fn viewport_current_page(&self) -> usize {
        self.viewport_current_page
    }

    /// The currently visible slice of the page.
    pub fn viewport(&self) -> &str {
        let range = &self.viewport_pages[self.viewport_current_page];
        &self.page_content[range.start..range.end]
    }

    /// Resolve an address, load it, and make it the current page.
    ///
    /// On failure the session is left exactly as it was: prior page state
    /// untouched, no history entry for the failed address.
    pub async fn visit(&mut self, address: &str) -> Result<()> {
        let resolved = self.resolve(address);
        let classified = Address::parse(&resolved);
        debug!(address = %resolved, "visiting");

        let page = self.fetcher.fetch(&classified).await?;
        self.set_content(page.text, page.title);
        self.history.push((resolved, Utc::now()));
        Ok(())
    }

    /// Scroll up one page-length. No-op at the first page.
    pub fn page_up(&mut self) {
        self.viewport_current_page = self.viewport_current_page.saturating_sub(1);
    }

    /// Scroll down one page-length. No-op at the last page.
    pub fn page_down(&mut self) {
        if self.viewport_current_page + 1 < self.viewport_pages.len() {
            self.viewport_current_page += 1;
        }
    }

    /// Case-insensitive, `*`-wildcard search over the full page content
    /// from the beginning. On a match, relocates the viewport to the page
    /// containing the match and records the find state. `None` means the
    /// pattern matches nowhere in the document.
    pub fn find_on_page(&mut self, pattern: &str) -> Option<usize> {
        // The pattern is escaped segment-wise, so compilation only fails on
        // pathological sizes; treat that as no match.
        let regex = build_find_regex(pattern).ok()?;
        let start = regex.find(&self.page_content)?.start();
        self.find_state = Some(FindState {
            regex,
            last_match_start: start,
        });
        self.viewport_current_page = self.page_index_for_offset(start);
        Some(start)
    }

    /// Resume the search just past the last match, wrapping to the start
    /// of the document. `Ok(None)` only if the pattern matches nowhere;
    /// calling without an active search is an error.
    pub fn find_next(&mut self) -> Result<Option<usize>> {
        let (regex, last) = match &self.find_state {
            Some(state) => (state.regex.clone(), state.last_match_start),
            None => {
                return Err(Error::Validation(
                    "No active search: call find_on_page before find_next".to_string(),
                ))
            }
        };

        let resume = last
            + self.page_content[last..]
                .chars()
                .next()
                .map(|c| c.len_utf8())
                .unwrap_or(1);

        let found = if resume <= self.page_content.len() {
            regex.find_at(&self.page_content, resume).map(|m| m.start())
        } else {
            None
        }
        .or_else(|| regex.find(&self.page_content).map(|m| m.start()));

        if let Some(start) = found {
            if let Some(state) = self.find_state.as_mut() {
                state.last_match_start = start;
            }
            self.viewport_current_page = self.page_index_for_offset(start);
            Ok(Some(start))
        } else {
            Ok(None)
        }
    }

    /// The observable page header:
    /// address, optional title, optional "previously visited" line (most
    /// recent prior visit to the identical address, exact string match),
    /// and the 1-based viewport position.
    pub fn header(&self) -> String {
        let mut header = format!("Address: {}\n", self.address());
        if let Some(title) = &self.page_title {
            header.push_str(&format!("Title: {}\n", title));
        }

        let address = self.address();
        if self.history.len() >= 2 {
            for (prev_addr, ts) in self.history[..self.history.len() - 1].iter().rev() {
                if prev_addr == address {
                    let seconds = (Utc::now() - *ts).num_seconds();
                    header.push_str(&format!(
                        "You previously visited this page {} seconds ago.\n",
                        seconds
                    ));
                    break;
                }
            }
        }

        header.push_str(&format!(
            "Viewport position: Showing page {} of {}.\n",
            self.viewport_current_page + 1,
            self.viewport_pages.len()
        ));
        header
    }

    /// Replace page state: recompute pagination, rewind the viewport, and
    /// invalidate any find state.
    fn set_content(&mut self, content: String, title: Option<String>) {
        self.page_content = content;
        self.page_title = title;
        self.viewport_pages = split_pages(&self.page_content, self.viewport_size);
        self.viewport_current_page = 0;
        self.find_state = None;
    }

    fn page_index_for_offset(&self, offset: usize) -> usize {
        self.viewport_pages
            .iter()
            .position(|r| offset >= r.start && offset < r.end)
            .unwrap_or(self.viewport_pages.len().saturating_sub(1))
    }

    /// A bare relative path on a live web page is resolved against the
    /// current address; everything else passes through to classification.
    fn resolve(&self, address: &str) -> String {
        let trimmed = address.trim();
        let explicit = trimmed.starts_with(crate::address::SEARCH_SCHEME)
            || trimmed.starts_with("http://")
            || trimmed.starts_with("https://")
            || trimmed.starts_with("file://")
            || trimmed.starts_with('/')
            || trimmed.starts_with("./")
            || trimmed.starts_with("../")
            || std::path::Path::new(trimmed).exists();
        if explicit {
            return trimmed.to_string();
        }

        let current = self.address();
        if current.starts_with("http://") || current.starts_with("https://") {
            if let Ok(base) = url::Url::parse(current) {
                if let Ok(joined) = base.join(trimmed) {
                    return joined.to_string();
                }
            }
        }
        trimmed.to_string()
    }
}

/// Compile the wildcard pattern: literal segments are escaped, `*` matches
/// anything (including newlines) non-greedily, matching is case-insensitive.
fn build_find_regex(pattern: &str) -> Result<Regex> {
    let mut expr = String::new();
    for (i, part) in pattern.split('*').enumerate() {
        if i > 0 {
            expr.push_str("[\\s\\S]*?");
        }
        expr.push_str(&regex::escape(part));
    }
    RegexBuilder::new(&expr)
        .case_insensitive(true)
        .build()
        .map_err(|e| Error::Validation(format!("Invalid search pattern: {}", e)))
}

/// Greedily pack `content` into pages of at most `budget` bytes, breaking
/// just after the last whitespace inside the window so words stay intact.
/// Ranges are contiguous, non-overlapping, on char boundaries, and cover
/// the content exactly; empty content yields one empty page. A page can
/// exceed the budget only when a single char is wider than the budget.
pub fn split_pages(content: &str, budget: usize) -> Vec<Range<usize>> {
    let budget = budget.max(1);
    let len = content.len();
    if len == 0 {
        return vec![0..0];
    }

    let mut pages = Vec::new();
    let mut start = 0;
    while start < len {
        let mut end = floor_char_boundary(content, (start + budget).min(len));

        if end < len {
            let window = &content[start..end];
            if let Some((i, c)) = window.char_indices().rev().find(|(_, c)| c.is_whitespace()) {
                end = start + i + c.len_utf8();
            }
        }

        if end <= start {
            // A single char wider than the budget: take it whole.
            end = start
                + content[start..]
                    .chars()
                    .next()
                    .map(|c| c.len_utf8())
                    .unwrap_or(1);
        }

        pages.push(start..end);
        start = end;
    }
    pages
}

fn floor_char_boundary(content: &str, mut index: usize) -> usize {
    while index > 0 && !content.is_char_boundary(index) {
        index -= 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reassemble(content: &str, pages: &[Range<usize>]) -> String {
        pages.iter().map(|r| &content[r.start..r.end]).collect()
    }

    #[test]
    fn test_split_pages_reconstructs_content() {
        let samples = [
            "",
            "short",
            "one two three four five six seven eight nine ten",
            "nowhitespaceatallinthisverylongtokenthatkeepsongoing",
            "mixed content\nwith newlines\tand tabs spread around the text",
        ];
        for content in samples {
            for budget in [1usize, 3, 8, 16, 100] {
                let pages = split_pages(content, budget);
                assert_eq!(reassemble(content, &pages), content, "budget {}", budget);
                // contiguity
                for pair in pages.windows(2) {
                    assert_eq!(pair[0].end, pair[1].start);
                }
                // budget respected for all but possibly oversized single chars
                for r in &pages {
                    assert!(r.end - r.start <= budget.max(1));
                }
            }
        }
    }

    #[test]
    fn test_split_pages_empty_content_yields_one_page() {
        let pages = split_pages("", 64);
        assert_eq!(pages, vec![0..0]);
    }

    #[test]
    fn test_split_pages_breaks_at_whitespace() {
        let content = "alpha beta gamma";
        let pages = split_pages(content, 8);
        // First page ends just after a space, not mid-word.
        assert_eq!(&content[pages[0].start..pages[0].end], "alpha ");
    }

    #[test]
    fn test_split_pages_multibyte_boundaries() {
        let content = "héllo wörld des élèves à Paris";
        for budget in [2usize, 5, 7, 11] {
            let pages = split_pages(content, budget);
            assert_eq!(reassemble(content, &pages), content);
            for r in &pages {
                assert!(content.is_char_boundary(r.start));
                assert!(content.is_char_boundary(r.end));
            }
        }
    }

    #[test]
    fn test_build_find_regex_wildcard() {
        let re = build_find_regex("1990*peak").unwrap();
        assert!(re.is_match("In 1990 the population hit its peak."));
        assert!(!re.is_match("peak before 1990"));
    }

    #[test]
    fn test_build_find_regex_escapes_meta() {
        let re = build_find_regex("a.b(c)").unwrap();
        assert!(re.is_match("xx a.b(c) yy"));
        assert!(!re.is_match("aXb(c)"));
    }

    #[test]
    fn test_build_find_regex_case_insensitive() {
        let re = build_find_regex("Paris").unwrap();
        assert!(re.is_match("PARIS"));
        assert!(re.is_match("paris"));
    }
}
