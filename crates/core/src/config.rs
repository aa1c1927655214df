use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::Result;
use crate::paths::Paths;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub api_base: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentDefaults {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Iteration budget for the orchestrating agent loop.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
    /// Model for the delegated surfer agent. Falls back to `model` when unset;
    /// a long-context model is recommended since page viewports are large.
    #[serde(default)]
    pub surfer_model: Option<String>,
    /// Iteration budget for one surfer run.
    #[serde(default = "default_surfer_max_iterations")]
    pub surfer_max_iterations: u32,
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_temperature() -> f32 {
    0.5
}

fn default_max_iterations() -> u32 {
    10
}

fn default_surfer_max_iterations() -> u32 {
    14
}

impl Default for AgentDefaults {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            max_iterations: default_max_iterations(),
            surfer_model: None,
            surfer_max_iterations: default_surfer_max_iterations(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchConfig {
    /// Credential for the external search API. Required for search
    /// addresses; a visit to a search address without it is a fetch error.
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub api_base: Option<String>,
    #[serde(default = "default_result_count")]
    pub result_count: usize,
}

fn default_result_count() -> usize {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserConfig {
    /// Viewport budget in bytes (cut at char boundaries).
    #[serde(default = "default_viewport_size")]
    pub viewport_size: usize,
    /// Scratch directory for downloaded artifacts. Defaults to
    /// `Paths::downloads_dir()` when unset.
    #[serde(default)]
    pub downloads_folder: Option<String>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub search: SearchConfig,
}

fn default_viewport_size() -> usize {
    1024 * 5
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36 Edg/119.0.0.0".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            viewport_size: default_viewport_size(),
            downloads_folder: None,
            user_agent: default_user_agent(),
            request_timeout_secs: default_request_timeout_secs(),
            search: SearchConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    #[serde(default)]
    pub agents: AgentDefaults,
    #[serde(default)]
    pub browser: BrowserConfig,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn load_or_default(paths: &Paths) -> Result<Self> {
        let config_path = paths.config_file();
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn get_provider(&self, name: &str) -> Option<&ProviderConfig> {
        self.providers.get(name)
    }

    /// First configured provider by priority order.
    pub fn get_api_key(&self) -> Option<(&str, &ProviderConfig)> {
        let priority = ["openai", "openrouter", "deepseek", "vllm"];
        for name in priority {
            if let Some(provider) = self.providers.get(name) {
                if !provider.api_key.is_empty() {
                    return Some((name, provider));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.browser.viewport_size, 1024 * 5);
        assert_eq!(config.agents.surfer_max_iterations, 14);
        assert!(config.browser.search.api_key.is_empty());
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.browser.search.api_key = "k".to_string();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.browser.search.api_key, "k");
    }

    #[test]
    fn test_partial_config_parses() {
        let parsed: Config = serde_json::from_str(r#"{"browser":{"viewportSize":256}}"#).unwrap();
        assert_eq!(parsed.browser.viewport_size, 256);
        assert_eq!(parsed.agents.max_iterations, 10);
    }
}
