//! Search fetcher: calls the external search API and renders the results
//! as a synthetic listing page with markdown-style links.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;
use websurfer_core::{Error, Result};

use super::{Page, SearchHit, SearchProvider};

const DEFAULT_API_BASE: &str = "https://api.search.brave.com/res/v1/web/search";

/// Search API client. A missing credential or an API error is a fetch
/// error, never an empty result page.
pub struct SerpSearchProvider {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
}

impl SerpSearchProvider {
    pub fn new(client: reqwest::Client, api_key: String, api_base: Option<String>) -> Self {
        Self {
            client,
            api_key,
            api_base: api_base.unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
        }
    }
}

#[async_trait]
impl SearchProvider for SerpSearchProvider {
    async fn search(&self, query: &str, count: usize) -> Result<Vec<SearchHit>> {
        if self.api_key.is_empty() {
            return Err(Error::Fetch(
                "Missing search API key: set browser.search.apiKey in the config".to_string(),
            ));
        }

        let response = self
            .client
            .get(&self.api_base)
            .header("X-Subscription-Token", &self.api_key)
            .header("Accept", "application/json")
            .query(&[("q", query), ("count", &count.to_string())])
            .send()
            .await
            .map_err(|e| Error::Fetch(format!("Search request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(Error::Fetch(format!("Search API error {}: {}", status, text)));
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| Error::Fetch(format!("Failed to parse search response: {}", e)))?;

        let hits: Vec<SearchHit> = data["web"]["results"]
            .as_array()
            .unwrap_or(&vec![])
            .iter()
            .map(|r| SearchHit {
                title: r["title"].as_str().unwrap_or("").to_string(),
                url: r["url"].as_str().unwrap_or("").to_string(),
                snippet: r["description"].as_str().unwrap_or("").to_string(),
            })
            .collect();

        debug!(count = hits.len(), query, "search results");
        Ok(hits)
    }
}

/// Render API results into the synthetic listing page the session loads.
/// Result order is preserved; each entry is an enumerated markdown link
/// followed by its snippet.
pub fn render_search_page(query: &str, hits: &[SearchHit]) -> Page {
    let mut body = format!(
        "A web search for '{}' found {} result{}:\n\n## Web Results\n",
        query,
        hits.len(),
        if hits.len() == 1 { "" } else { "s" }
    );

    for (idx, hit) in hits.iter().enumerate() {
        body.push_str(&format!("{}. [{}]({})\n", idx + 1, hit.title, hit.url));
        if !hit.snippet.is_empty() {
            body.push_str(&format!("{}\n", hit.snippet));
        }
        body.push('\n');
    }

    Page {
        title: Some(format!("Search results for '{}'", query)),
        text: body.trim_end().to_string(),
    }
}
