//! End-to-end session tests against a stubbed search backend and local
//! files: pagination, scrolling bounds, find/find-next semantics, history
//! growth, and the header contract.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use websurfer_browser::{Browser, SearchHit, SearchProvider};
use websurfer_core::config::BrowserConfig;
use websurfer_core::{Error, Result};

struct StubSearch {
    hits: Vec<SearchHit>,
}

#[async_trait]
impl SearchProvider for StubSearch {
    async fn search(&self, _query: &str, _count: usize) -> Result<Vec<SearchHit>> {
        Ok(self.hits.clone())
    }
}

struct FailingSearch;

#[async_trait]
impl SearchProvider for FailingSearch {
    async fn search(&self, _query: &str, _count: usize) -> Result<Vec<SearchHit>> {
        Err(Error::Fetch("search API unreachable".to_string()))
    }
}

fn config(viewport_size: usize) -> BrowserConfig {
    BrowserConfig {
        viewport_size,
        ..BrowserConfig::default()
    }
}

fn downloads() -> PathBuf {
    std::env::temp_dir().join("websurfer-test-downloads")
}

fn stub_browser(viewport_size: usize, hits: Vec<SearchHit>) -> Browser {
    Browser::with_search_provider(&config(viewport_size), downloads(), Arc::new(StubSearch { hits }))
}

fn two_results() -> Vec<SearchHit> {
    vec![
        SearchHit {
            title: "Paris".to_string(),
            url: "https://en.wikipedia.org/wiki/Paris".to_string(),
            snippet: "Paris is the capital of France.".to_string(),
        },
        SearchHit {
            title: "List of capitals".to_string(),
            url: "https://example.org/capitals".to_string(),
            snippet: "Capitals of the world.".to_string(),
        },
    ]
}

fn write_temp(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[tokio::test]
async fn search_listing_fits_one_page_and_preserves_order() {
    let mut browser = stub_browser(1024 * 5, two_results());
    browser.visit("search: capital of France").await.unwrap();

    let header = browser.header();
    assert!(header.contains("Address: search: capital of France"));
    assert!(header.contains("Showing page 1 of 1."));

    let body = browser.viewport();
    let first = body.find("Paris").unwrap();
    let second = body.find("List of capitals").unwrap();
    assert!(first < second);
}

#[tokio::test]
async fn failed_search_leaves_session_untouched() {
    let mut browser = Browser::with_search_provider(&config(1024), downloads(), Arc::new(FailingSearch));
    let history_len = browser.history().len();

    let err = browser.visit("search: anything").await.unwrap_err();
    assert!(matches!(err, Error::Fetch(_)));

    // No history entry for the failed address; prior page state intact.
    assert_eq!(browser.history().len(), history_len);
    assert_eq!(browser.address(), "about:blank");
}

#[tokio::test]
async fn visit_local_file_paginates_and_scrolls_with_clamping() {
    let words: Vec<String> = (0..400).map(|i| format!("word{}", i)).collect();
    let path = write_temp("websurfer-session-scroll.txt", &words.join(" "));

    let mut browser = stub_browser(128, vec![]);
    browser.visit(path.to_str().unwrap()).await.unwrap();

    let total = browser.viewport_pages().len();
    assert!(total > 1);

    // page_up at the first page stays put.
    browser.page_up();
    assert_eq!(browser.viewport_current_page(), 0);

    for _ in 0..total + 5 {
        browser.page_down();
    }
    assert_eq!(browser.viewport_current_page(), total - 1);

    // page_down at the last page stays put.
    browser.page_down();
    assert_eq!(browser.viewport_current_page(), total - 1);
    assert!(browser.header().contains(&format!("Showing page {} of {}.", total, total)));
}

#[tokio::test]
async fn pagination_reconstructs_the_document() {
    let content = "lorem ipsum dolor sit amet ".repeat(50);
    let path = write_temp("websurfer-session-reassemble.txt", &content);

    let mut browser = stub_browser(64, vec![]);
    browser.visit(path.to_str().unwrap()).await.unwrap();

    let reassembled: String = browser
        .viewport_pages()
        .iter()
        .map(|r| &browser.page_content()[r.start..r.end])
        .collect();
    assert_eq!(reassembled, content);
    for r in browser.viewport_pages() {
        assert!(r.end - r.start <= 64);
    }
}

#[tokio::test]
async fn find_relocates_viewport_and_find_next_wraps_around() {
    let mut content = String::new();
    content.push_str("needle alpha ");
    content.push_str(&"filler words all the way down ".repeat(30));
    content.push_str("needle beta ");
    content.push_str(&"more filler to push past a page boundary ".repeat(30));
    let path = write_temp("websurfer-session-find.txt", &content);

    let mut browser = stub_browser(100, vec![]);
    browser.visit(path.to_str().unwrap()).await.unwrap();

    let first = browser.find_on_page("needle").unwrap();
    assert_eq!(first, 0);
    assert_eq!(browser.viewport_current_page(), 0);

    let second = browser.find_next().unwrap().unwrap();
    assert!(second > first);
    assert!(browser.viewport_current_page() > 0);
    assert!(browser.viewport().contains("needle beta"));

    // Wraps back to the first occurrence rather than stopping at the end.
    let wrapped = browser.find_next().unwrap().unwrap();
    assert_eq!(wrapped, first);
    assert_eq!(browser.viewport_current_page(), 0);
}

#[tokio::test]
async fn find_no_match_returns_none_not_error() {
    let path = write_temp("websurfer-session-nomatch.txt", "plain text with nothing special");
    let mut browser = stub_browser(1024, vec![]);
    browser.visit(path.to_str().unwrap()).await.unwrap();

    assert!(browser.find_on_page("nonexistent-token").is_none());
}

#[tokio::test]
async fn find_wildcard_spans_words() {
    let path = write_temp(
        "websurfer-session-wildcard.txt",
        "The population reached 1990 levels at its peak in the census.",
    );
    let mut browser = stub_browser(1024, vec![]);
    browser.visit(path.to_str().unwrap()).await.unwrap();

    assert!(browser.find_on_page("1990*peak").is_some());
    assert!(browser.find_on_page("peak*1990").is_none());
}

#[tokio::test]
async fn find_state_survives_scrolling_but_not_navigation() {
    let content = format!(
        "token first {} token second",
        "padding between occurrences ".repeat(20)
    );
    let path = write_temp("websurfer-session-findstate.txt", &content);

    let mut browser = stub_browser(80, vec![]);
    browser.visit(path.to_str().unwrap()).await.unwrap();

    browser.find_on_page("token").unwrap();
    browser.page_down();
    browser.page_up();
    // Manual scrolling does not invalidate the active search.
    assert!(browser.find_next().unwrap().is_some());

    // A new load does: find_next without a fresh find is an explicit error.
    let other = write_temp("websurfer-session-findstate2.txt", "different page");
    browser.visit(other.to_str().unwrap()).await.unwrap();
    assert!(matches!(browser.find_next(), Err(Error::Validation(_))));
}

#[tokio::test]
async fn find_scope_is_current_page_only() {
    let first = write_temp("websurfer-session-scope1.txt", "unique-marker lives here");
    let second = write_temp("websurfer-session-scope2.txt", "a page without the marker");

    let mut browser = stub_browser(1024, vec![]);
    browser.visit(first.to_str().unwrap()).await.unwrap();
    browser.visit(second.to_str().unwrap()).await.unwrap();

    // Content is per-current-page, not cross-history.
    assert!(browser.find_on_page("unique-marker").is_none());
}

#[tokio::test]
async fn history_grows_by_one_per_successful_visit() {
    let path = write_temp("websurfer-session-history.txt", "some page");
    let addr = path.to_str().unwrap().to_string();

    let mut browser = stub_browser(1024, vec![]);
    let base = browser.history().len();

    browser.visit(&addr).await.unwrap();
    assert_eq!(browser.history().len(), base + 1);

    // A re-visit appends a fresh entry: the log is not deduplicated.
    browser.visit(&addr).await.unwrap();
    assert_eq!(browser.history().len(), base + 2);
    assert_eq!(browser.history()[base].0, addr);
    assert_eq!(browser.history()[base + 1].0, addr);
}

#[tokio::test]
async fn revisit_reports_previously_visited_line() {
    let path = write_temp("websurfer-session-revisit.txt", "revisited page");
    let addr = path.to_str().unwrap().to_string();

    let mut browser = stub_browser(1024, vec![]);
    browser.visit(&addr).await.unwrap();
    assert!(!browser.header().contains("previously visited"));

    browser.visit(&addr).await.unwrap();
    assert!(browser.header().contains("You previously visited this page"));
    assert!(browser.header().contains("seconds ago."));
}

#[tokio::test]
async fn visit_resets_viewport_to_first_page() {
    let long = write_temp("websurfer-session-reset1.txt", &"words and words ".repeat(100));
    let short = write_temp("websurfer-session-reset2.txt", "short page");

    let mut browser = stub_browser(64, vec![]);
    browser.visit(long.to_str().unwrap()).await.unwrap();
    browser.page_down();
    browser.page_down();
    assert!(browser.viewport_current_page() > 0);

    browser.visit(short.to_str().unwrap()).await.unwrap();
    assert_eq!(browser.viewport_current_page(), 0);
}

#[tokio::test]
async fn header_includes_title_for_local_documents() {
    let path = write_temp("websurfer-session-title.txt", "titled content");
    let mut browser = stub_browser(1024, vec![]);
    browser.visit(path.to_str().unwrap()).await.unwrap();

    assert!(browser.header().contains("Title: websurfer-session-title.txt"));
}
