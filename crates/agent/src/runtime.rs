//! The observe/act loop shared by both agent roles.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};
use websurfer_core::types::{ChatMessage, ToolCallRequest};
use websurfer_core::Result;
use websurfer_tools::{SurferHandle, SurferRun, ToolContext, ToolRegistry, TraceStep};

use crate::provider::Provider;

pub struct AgentRuntime {
    provider: Arc<dyn Provider>,
    registry: Arc<ToolRegistry>,
    ctx: ToolContext,
    system_prompt: String,
    max_iterations: u32,
}

impl AgentRuntime {
    pub fn new(
        provider: Arc<dyn Provider>,
        registry: Arc<ToolRegistry>,
        ctx: ToolContext,
        system_prompt: &str,
        max_iterations: u32,
    ) -> Self {
        Self {
            provider,
            registry,
            ctx,
            system_prompt: system_prompt.to_string(),
            max_iterations,
        }
    }

    /// Execute the loop for one task. Tool calls are validated and run
    /// through the registry; any error becomes an observation for the
    /// model rather than aborting the run. A content-only reply ends the
    /// run; so does exhausting the iteration budget.
    pub async fn run_task(&self, task: &str) -> Result<SurferRun> {
        let tools = self.registry.schemas();
        let mut messages = vec![
            ChatMessage::system(&self.system_prompt),
            ChatMessage::user(task),
        ];
        let mut steps: Vec<TraceStep> = Vec::new();
        let mut final_answer = String::new();

        for iteration in 0..self.max_iterations {
            debug!(iteration, "LLM call iteration");
            let response = self.provider.chat(&messages, &tools).await?;

            info!(
                iteration,
                content_len = response.content.as_ref().map(|c| c.len()).unwrap_or(0),
                tool_calls_count = response.tool_calls.len(),
                finish_reason = %response.finish_reason,
                "LLM response received"
            );

            if response.tool_calls.is_empty() {
                final_answer = response.content.unwrap_or_default();
                steps.push(TraceStep {
                    role: "assistant".to_string(),
                    content: final_answer.clone(),
                    tool_name: None,
                    tool_arguments: None,
                });
                break;
            }

            messages.push(ChatMessage::assistant_tool_calls(
                response.content.as_deref(),
                response.tool_calls.clone(),
            ));

            for tool_call in &response.tool_calls {
                steps.push(TraceStep {
                    role: "assistant".to_string(),
                    content: String::new(),
                    tool_name: Some(tool_call.name.clone()),
                    tool_arguments: Some(tool_call.arguments.clone()),
                });

                let observation = self.execute_tool_call(tool_call).await;
                steps.push(TraceStep {
                    role: "tool".to_string(),
                    content: observation.clone(),
                    tool_name: None,
                    tool_arguments: None,
                });
                messages.push(ChatMessage::tool_result(&tool_call.id, &observation));
            }

            if iteration == self.max_iterations - 1 {
                warn!("Reached max iterations");
                final_answer = response.content.unwrap_or_default();
            }
        }

        Ok(SurferRun {
            steps,
            final_answer,
        })
    }

    async fn execute_tool_call(&self, tool_call: &ToolCallRequest) -> String {
        info!(tool = %tool_call.name, "Executing tool call");
        let tool = match self.registry.get(&tool_call.name) {
            Ok(t) => t,
            Err(e) => return format!("Error: {}", e),
        };
        if let Err(e) = tool.validate(&tool_call.arguments) {
            return format!("Error: {}", e);
        }
        match tool.execute(self.ctx.clone(), tool_call.arguments.clone()).await {
            Ok(Value::String(s)) => s,
            Ok(v) => v.to_string(),
            Err(e) => {
                warn!(tool = %tool_call.name, error = %e, "Tool call failed");
                format!("Error: {}", e)
            }
        }
    }
}

#[async_trait]
impl SurferHandle for AgentRuntime {
    async fn run(&self, task: &str) -> Result<SurferRun> {
        self.run_task(task).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::path::PathBuf;
    use tokio::sync::Mutex;
    use websurfer_browser::Browser;
    use websurfer_core::types::LLMResponse;
    use websurfer_core::{Config, Error};

    /// Replays a scripted sequence of responses.
    struct ScriptedProvider {
        responses: Mutex<VecDeque<LLMResponse>>,
    }

    impl ScriptedProvider {
        fn new(responses: Vec<LLMResponse>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
            }
        }
    }

    #[async_trait]
    impl Provider for ScriptedProvider {
        async fn chat(&self, _messages: &[ChatMessage], _tools: &[Value]) -> Result<LLMResponse> {
            self.responses
                .lock()
                .await
                .pop_front()
                .ok_or_else(|| Error::Provider("Script exhausted".to_string()))
        }
    }

    fn tool_call_response(name: &str, arguments: Value) -> LLMResponse {
        LLMResponse {
            content: None,
            tool_calls: vec![ToolCallRequest {
                id: "call_1".to_string(),
                name: name.to_string(),
                arguments,
            }],
            finish_reason: "tool_calls".to_string(),
        }
    }

    fn text_response(content: &str) -> LLMResponse {
        LLMResponse {
            content: Some(content.to_string()),
            tool_calls: vec![],
            finish_reason: "stop".to_string(),
        }
    }

    fn test_ctx() -> ToolContext {
        let config = Config::default();
        let browser = Arc::new(Mutex::new(Browser::new(
            &config.browser,
            PathBuf::from("/tmp/websurfer-runtime-test"),
        )));
        ToolContext::new(config, browser)
    }

    fn runtime(provider: ScriptedProvider, max_iterations: u32) -> AgentRuntime {
        AgentRuntime::new(
            Arc::new(provider),
            Arc::new(ToolRegistry::web_defaults()),
            test_ctx(),
            "test prompt",
            max_iterations,
        )
    }

    #[tokio::test]
    async fn test_content_only_reply_ends_run() {
        let rt = runtime(ScriptedProvider::new(vec![text_response("Paris")]), 5);
        let run = rt.run_task("capital of France?").await.unwrap();
        assert_eq!(run.final_answer, "Paris");
        assert_eq!(run.steps.len(), 1);
        assert!(run.steps[0].tool_name.is_none());
    }

    #[tokio::test]
    async fn test_tool_call_then_answer() {
        let file = std::env::temp_dir().join("runtime_page.txt");
        std::fs::write(&file, "The answer is 42.").unwrap();

        let rt = runtime(
            ScriptedProvider::new(vec![
                tool_call_response("visit_page", json!({"url": file.to_str().unwrap()})),
                text_response("42"),
            ]),
            5,
        );
        let run = rt.run_task("find the answer").await.unwrap();
        assert_eq!(run.final_answer, "42");
        // One tool call, one observation, one final answer.
        assert_eq!(run.steps.len(), 3);
        assert_eq!(run.steps[0].tool_name.as_deref(), Some("visit_page"));
        assert_eq!(run.steps[1].role, "tool");
        assert!(run.steps[1].content.contains("The answer is 42."));
    }

    #[tokio::test]
    async fn test_tool_error_becomes_observation() {
        let rt = runtime(
            ScriptedProvider::new(vec![
                tool_call_response("visit_page", json!({"url": "/nonexistent/file.xyz"})),
                text_response("could not read it"),
            ]),
            5,
        );
        let run = rt.run_task("read the file").await.unwrap();
        assert_eq!(run.final_answer, "could not read it");
        assert!(run.steps[1].content.starts_with("Error:"));
    }

    #[tokio::test]
    async fn test_unknown_tool_becomes_observation() {
        let rt = runtime(
            ScriptedProvider::new(vec![
                tool_call_response("no_such_tool", json!({})),
                text_response("ok"),
            ]),
            5,
        );
        let run = rt.run_task("anything").await.unwrap();
        assert!(run.steps[1].content.contains("Unknown tool"));
    }

    #[tokio::test]
    async fn test_budget_exhaustion_keeps_last_content() {
        let file = std::env::temp_dir().join("runtime_loop.txt");
        std::fs::write(&file, "looping").unwrap();
        let call = || tool_call_response("visit_page", json!({"url": file.to_str().unwrap()}));

        let rt = runtime(ScriptedProvider::new(vec![call(), call()]), 2);
        let run = rt.run_task("loop forever").await.unwrap();
        // Budget spent on tool calls only: no final text was produced.
        assert_eq!(run.final_answer, "");
        assert_eq!(run.steps.len(), 4);
    }
}
