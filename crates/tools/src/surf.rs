//! Browser tool adapters: stateless wrappers that expose session
//! operations as named actions for the surfer agent. Each adapter calls
//! exactly one session operation and formats the resulting header and
//! viewport; fetch errors propagate untouched to the agent loop.

use async_trait::async_trait;
use regex::Regex;
use serde_json::{json, Value};
use tracing::debug;
use websurfer_browser::Browser;
use websurfer_core::{Error, Result};

use crate::{Tool, ToolContext, ToolSchema};

const SEPARATOR: &str = "\n=======================\n";

/// Header plus the current viewport, the observation returned by every
/// navigation tool.
fn browser_state(browser: &Browser) -> String {
    format!("{}{}{}", browser.header().trim_end(), SEPARATOR, browser.viewport())
}

fn require_str<'a>(params: &'a Value, key: &str) -> Result<&'a str> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| Error::Validation(format!("Missing required parameter: {}", key)))
}

// ============ informational_web_search ============

pub struct SearchInformationTool;

#[async_trait]
impl Tool for SearchInformationTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "informational_web_search",
            description: "Perform an INFORMATIONAL web search query then return the search results.",
            parameters: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The informational web search query to perform."
                    }
                },
                "required": ["query"]
            }),
        }
    }

    fn validate(&self, params: &Value) -> Result<()> {
        require_str(params, "query").map(|_| ())
    }

    async fn execute(&self, ctx: ToolContext, params: Value) -> Result<Value> {
        let query = require_str(&params, "query")?;
        debug!(query, "Informational web search");
        let mut browser = ctx.browser.lock().await;
        browser.visit(&format!("search: {}", query)).await?;
        Ok(Value::String(browser_state(&browser)))
    }
}

// ============ navigational_web_search ============

pub struct NavigationalSearchTool;

#[async_trait]
impl Tool for NavigationalSearchTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "navigational_web_search",
            description: "Perform a NAVIGATIONAL web search query then immediately navigate to the top result. Useful, for example, to navigate to a particular Wikipedia article or other known destination. Equivalent to Google's \"I'm Feeling Lucky\" button.",
            parameters: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The navigational web search query to perform."
                    }
                },
                "required": ["query"]
            }),
        }
    }

    fn validate(&self, params: &Value) -> Result<()> {
        require_str(params, "query").map(|_| ())
    }

    async fn execute(&self, ctx: ToolContext, params: Value) -> Result<Value> {
        let query = require_str(&params, "query")?;
        let mut browser = ctx.browser.lock().await;
        browser.visit(&format!("search: {}", query)).await?;

        // Follow the first markdown link in the listing, if any.
        let target = first_markdown_link(browser.page_content());
        if let Some(url) = target {
            browser.visit(&url).await?;
        }

        Ok(Value::String(browser_state(&browser)))
    }
}

/// First `[label](http...)` target in a markdown listing.
fn first_markdown_link(content: &str) -> Option<String> {
    // Escaped literal pattern; compilation cannot fail.
    let re = Regex::new(r"\[.*?\]\((http.*?)\)").ok()?;
    re.captures(content).map(|c| c[1].to_string())
}

// ============ visit_page ============

pub struct VisitTool;

#[async_trait]
impl Tool for VisitTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "visit_page",
            description: "Visit a webpage at a given URL and return its text. Handles live pages, online PDF and text files, and local document paths.",
            parameters: json!({
                "type": "object",
                "properties": {
                    "url": {
                        "type": "string",
                        "description": "The relative or absolute url of the webpage to visit."
                    }
                },
                "required": ["url"]
            }),
        }
    }

    fn validate(&self, params: &Value) -> Result<()> {
        require_str(params, "url").map(|_| ())
    }

    async fn execute(&self, ctx: ToolContext, params: Value) -> Result<Value> {
        let url = require_str(&params, "url")?;
        let mut browser = ctx.browser.lock().await;
        browser.visit(url).await?;
        Ok(Value::String(browser_state(&browser)))
    }
}

// ============ page_up / page_down ============

pub struct PageUpTool;

#[async_trait]
impl Tool for PageUpTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "page_up",
            description: "Scroll the viewport UP one page-length in the current webpage and return the new viewport content.",
            parameters: json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        }
    }

    fn validate(&self, _params: &Value) -> Result<()> {
        Ok(())
    }

    async fn execute(&self, ctx: ToolContext, _params: Value) -> Result<Value> {
        let mut browser = ctx.browser.lock().await;
        browser.page_up();
        Ok(Value::String(browser_state(&browser)))
    }
}

pub struct PageDownTool;

#[async_trait]
impl Tool for PageDownTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "page_down",
            description: "Scroll the viewport DOWN one page-length in the current webpage and return the new viewport content.",
            parameters: json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        }
    }

    fn validate(&self, _params: &Value) -> Result<()> {
        Ok(())
    }

    async fn execute(&self, ctx: ToolContext, _params: Value) -> Result<Value> {
        let mut browser = ctx.browser.lock().await;
        browser.page_down();
        Ok(Value::String(browser_state(&browser)))
    }
}

// ============ find_on_page_ctrl_f / find_next ============

pub struct FinderTool;

#[async_trait]
impl Tool for FinderTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "find_on_page_ctrl_f",
            description: "Scroll the viewport to the first occurrence of the search string. This is equivalent to Ctrl+F.",
            parameters: json!({
                "type": "object",
                "properties": {
                    "search_string": {
                        "type": "string",
                        "description": "The string to search for on the page. This search string supports wildcards like '*'"
                    }
                },
                "required": ["search_string"]
            }),
        }
    }

    fn validate(&self, params: &Value) -> Result<()> {
        require_str(params, "search_string").map(|_| ())
    }

    async fn execute(&self, ctx: ToolContext, params: Value) -> Result<Value> {
        let search_string = require_str(&params, "search_string")?;
        let mut browser = ctx.browser.lock().await;
        match browser.find_on_page(search_string) {
            Some(_) => Ok(Value::String(browser_state(&browser))),
            None => Ok(Value::String(format!(
                "{}{}The search string '{}' was not found on this page.",
                browser.header().trim_end(),
                SEPARATOR,
                search_string
            ))),
        }
    }
}

pub struct FindNextTool;

#[async_trait]
impl Tool for FindNextTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "find_next",
            description: "Scroll the viewport to next occurrence of the search string. This is equivalent to finding the next match in a Ctrl+F search.",
            parameters: json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        }
    }

    fn validate(&self, _params: &Value) -> Result<()> {
        Ok(())
    }

    async fn execute(&self, ctx: ToolContext, _params: Value) -> Result<Value> {
        let mut browser = ctx.browser.lock().await;
        match browser.find_next()? {
            Some(_) => Ok(Value::String(browser_state(&browser))),
            None => Ok(Value::String(format!(
                "{}{}The search string was not found on this page.",
                browser.header().trim_end(),
                SEPARATOR
            ))),
        }
    }
}

// ============ find_archived_url ============

pub struct ArchiveSearchTool;

#[async_trait]
impl Tool for ArchiveSearchTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "find_archived_url",
            description: "Given a url, searches the Wayback Machine and returns the archived version of the url that's closest in time to the desired date, then navigates to it.",
            parameters: json!({
                "type": "object",
                "properties": {
                    "url": {
                        "type": "string",
                        "description": "The url you need the archive for."
                    },
                    "date": {
                        "type": "string",
                        "description": "The date that you want to find the archive for. Format: 'YYYYMMDD'"
                    }
                },
                "required": ["url", "date"]
            }),
        }
    }

    fn validate(&self, params: &Value) -> Result<()> {
        require_str(params, "url")?;
        require_str(params, "date").map(|_| ())
    }

    async fn execute(&self, ctx: ToolContext, params: Value) -> Result<Value> {
        let url = require_str(&params, "url")?;
        let date = require_str(&params, "date")?;
        debug!(url, date, "Wayback Machine lookup");

        let api_url = format!(
            "https://archive.org/wayback/available?url={}&timestamp={}",
            urlencoding::encode(url),
            urlencoding::encode(date)
        );
        let response = reqwest::get(&api_url)
            .await
            .map_err(|e| Error::Fetch(format!("Wayback lookup failed: {}", e)))?;
        if !response.status().is_success() {
            return Err(Error::Fetch(format!(
                "Wayback lookup returned HTTP {}",
                response.status()
            )));
        }
        let data: Value = response
            .json()
            .await
            .map_err(|e| Error::Fetch(format!("Failed to parse Wayback response: {}", e)))?;

        let closest = data["archived_snapshots"]["closest"]["url"]
            .as_str()
            .ok_or_else(|| {
                Error::Fetch(format!("No archived snapshot found for {} around {}", url, date))
            })?
            .to_string();

        let mut browser = ctx.browser.lock().await;
        browser.visit(&closest).await?;
        Ok(Value::String(format!(
            "Web archive for url {}, snapshot taken closest to {}:\n{}",
            url,
            date,
            browser_state(&browser)
        )))
    }
}
