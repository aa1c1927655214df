pub mod delegate;
pub mod inspect;
pub mod registry;
pub mod surf;

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;
use websurfer_browser::Browser;
use websurfer_core::{Config, Result};

pub use delegate::{SurferHandle, SurferRun, TraceStep};
pub use registry::ToolRegistry;

/// Truncate a string to at most `max_bytes` bytes, respecting UTF-8 char
/// boundaries.
pub fn safe_truncate(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Shared context handed to every tool invocation. The browser session is
/// an explicitly owned value threaded through here — there is no ambient
/// or global instance.
#[derive(Clone)]
pub struct ToolContext {
    pub config: Config,
    pub browser: Arc<Mutex<Browser>>,
    /// Handle for delegating an entire research subtask to the surfer
    /// agent. Only wired up in the orchestrator's context.
    pub surfer: Option<Arc<dyn SurferHandle>>,
}

impl ToolContext {
    pub fn new(config: Config, browser: Arc<Mutex<Browser>>) -> Self {
        Self {
            config,
            browser,
            surfer: None,
        }
    }

    pub fn with_surfer(mut self, surfer: Arc<dyn SurferHandle>) -> Self {
        self.surfer = Some(surfer);
        self
    }
}

pub struct ToolSchema {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Value,
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn schema(&self) -> ToolSchema;
    fn validate(&self, params: &Value) -> Result<()>;
    async fn execute(&self, ctx: ToolContext, params: Value) -> Result<Value>;
}
