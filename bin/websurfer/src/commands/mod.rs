pub mod ask;
pub mod eval;
pub mod surf;

use std::sync::Arc;
use tokio::sync::Mutex;
use websurfer_agent::{AgentRuntime, OpenAIProvider, Provider};
use websurfer_browser::Browser;
use websurfer_core::{Config, Paths};
use websurfer_tools::{ToolContext, ToolRegistry};

/// Load config and make sure the workspace directories exist.
pub fn load_config(paths: &Paths) -> anyhow::Result<Config> {
    paths.ensure_dirs()?;
    Ok(Config::load_or_default(paths)?)
}

pub fn build_provider(config: &Config, model: &str) -> anyhow::Result<Arc<dyn Provider>> {
    let (name, provider) = config
        .get_api_key()
        .ok_or_else(|| anyhow::anyhow!("No provider configured. Add an API key to config.json"))?;
    tracing::debug!(provider = name, model, "Using provider");
    Ok(Arc::new(OpenAIProvider::new(
        &provider.api_key,
        provider.api_base.as_deref(),
        model,
        config.agents.max_tokens,
        config.agents.temperature,
    )))
}

/// A surfer runtime with its own private browser session.
pub fn build_surfer(config: &Config, paths: &Paths) -> anyhow::Result<AgentRuntime> {
    let model = config
        .agents
        .surfer_model
        .clone()
        .unwrap_or_else(|| config.agents.model.clone());
    let provider = build_provider(config, &model)?;
    let browser = Arc::new(Mutex::new(Browser::new(
        &config.browser,
        paths.downloads_dir(),
    )));
    let ctx = ToolContext::new(config.clone(), browser);
    Ok(AgentRuntime::new(
        provider,
        Arc::new(ToolRegistry::web_defaults()),
        ctx,
        websurfer_agent::prompts::SURFER_SYSTEM_PROMPT,
        config.agents.surfer_max_iterations,
    ))
}

/// The orchestrator runtime, wired to delegate web work to a fresh surfer.
pub fn build_orchestrator(config: &Config, paths: &Paths) -> anyhow::Result<AgentRuntime> {
    let provider = build_provider(config, &config.agents.model)?;
    let surfer = Arc::new(build_surfer(config, paths)?);
    let browser = Arc::new(Mutex::new(Browser::new(
        &config.browser,
        paths.downloads_dir(),
    )));
    let ctx = ToolContext::new(config.clone(), browser).with_surfer(surfer);
    Ok(AgentRuntime::new(
        provider,
        Arc::new(ToolRegistry::orchestrator_defaults()),
        ctx,
        websurfer_agent::prompts::ORCHESTRATOR_SYSTEM_PROMPT,
        config.agents.max_iterations,
    ))
}
