//! Fetcher dispatch: resolve a classified [`Address`] into page content.
//!
//! Three resolvers, one per address variant: the search fetcher (external
//! search API rendered as a synthetic listing page), the web fetcher
//! (HTTP GET with content-type-driven conversion), and the document
//! fetcher (local files through the converters). Each returns a [`Page`]
//! or fails with `Error::Fetch` — never an empty page masking a failure.

pub mod document;
pub mod search;
pub mod web;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use websurfer_core::config::BrowserConfig;
use websurfer_core::Result;

use crate::address::Address;
pub use search::{render_search_page, SerpSearchProvider};

/// Normalized page content produced by any fetcher.
#[derive(Debug, Clone)]
pub struct Page {
    pub title: Option<String>,
    pub text: String,
}

/// One result row from the external search API.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// Seam for the external search API, so tests can stub the listing.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, count: usize) -> Result<Vec<SearchHit>>;
}

/// Resolves addresses into pages. Owns the HTTP client and the search
/// provider; constructed once per session.
pub struct Fetcher {
    client: reqwest::Client,
    search: Arc<dyn SearchProvider>,
    result_count: usize,
    downloads_dir: PathBuf,
}

impl Fetcher {
    pub fn new(config: &BrowserConfig, downloads_dir: PathBuf) -> Self {
        let client = build_client(config);
        let search = Arc::new(SerpSearchProvider::new(
            client.clone(),
            config.search.api_key.clone(),
            config.search.api_base.clone(),
        ));
        Self {
            client,
            search,
            result_count: config.search.result_count,
            downloads_dir,
        }
    }

    pub fn with_search_provider(
        config: &BrowserConfig,
        downloads_dir: PathBuf,
        search: Arc<dyn SearchProvider>,
    ) -> Self {
        Self {
            client: build_client(config),
            search,
            result_count: config.search.result_count,
            downloads_dir,
        }
    }

    pub fn downloads_dir(&self) -> &Path {
        &self.downloads_dir
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub async fn fetch(&self, address: &Address) -> Result<Page> {
        match address {
            Address::Search(query) => {
                let hits = self.search.search(query, self.result_count).await?;
                Ok(render_search_page(query, &hits))
            }
            Address::Url(url) => web::fetch_url(&self.client, url, &self.downloads_dir).await,
            Address::Local(path) => document::fetch_document(path),
        }
    }
}

fn build_client(config: &BrowserConfig) -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::limited(10))
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .user_agent(config.user_agent.clone())
        .build()
        .unwrap_or_default()
}
