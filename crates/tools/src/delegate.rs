//! The delegating search tool: hands an entire research subtask to the
//! surfer agent, then compresses the surfer's interaction trace into a
//! bounded-size report for the orchestrating agent.
//!
//! Truncation here is a formatting policy applied uniformly to every
//! trace entry, not error recovery: the compression functions are pure
//! and total over their inputs.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;
use websurfer_core::{Error, Result};

use crate::{safe_truncate, Tool, ToolContext, ToolSchema};

/// Entries above this rendered length are shown in compressed form.
const COMPRESS_THRESHOLD: usize = 1000;

/// One entry of a surfer run's interaction trace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceStep {
    /// "assistant" for model output, "tool" for an observation.
    pub role: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_arguments: Option<Value>,
}

/// The outcome of one bounded surfer run.
#[derive(Debug, Clone)]
pub struct SurferRun {
    pub steps: Vec<TraceStep>,
    pub final_answer: String,
}

/// Seam to the surfer agent runtime, so the tools crate does not depend
/// on the agent crate.
#[async_trait]
pub trait SurferHandle: Send + Sync {
    async fn run(&self, task: &str) -> Result<SurferRun>;
}

/// Render one trace entry under the compression policy: tool invocations
/// above the threshold become name-only, oversized observations become a
/// fixed placeholder.
pub fn compress_step(step: &TraceStep, threshold: usize) -> String {
    if let Some(name) = &step.tool_name {
        let arguments = step
            .tool_arguments
            .as_ref()
            .map(|a| a.to_string())
            .unwrap_or_else(|| "{}".to_string());
        let full = format!("Tool call: {} with arguments: {}", name, arguments);
        if full.len() <= threshold {
            full
        } else {
            format!("Tool call: {}", name)
        }
    } else if step.content.len() > threshold {
        if step.role == "tool" {
            "Tool output too long to show.".to_string()
        } else {
            format!("{}... (truncated)", safe_truncate(&step.content, threshold))
        }
    } else {
        step.content.clone()
    }
}

/// The bounded transcript: one compressed line-block per entry.
pub fn compress_transcript(steps: &[TraceStep], threshold: usize) -> String {
    steps
        .iter()
        .map(|step| compress_step(step, threshold))
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// The briefing wrapped around the delegated query, mandating the
/// three-section report structure.
fn surfer_task(query: &str) -> String {
    format!(
        "You've been submitted this request by your manager: '{}'\n\n\
         You're helping your manager solve a wider task: so make sure to not provide a one-line answer, \
         but give as much information as possible so that they have a clear understanding of the answer.\n\n\
         Your final answer WILL HAVE to contain these parts:\n\
         # 1. Search outcome (short version)\n\
         # 2. Search outcome (extremely detailed version)\n\
         # 3. Additional context\n\n\
         Put all these in your final answer; anything you leave out of it will be lost.\n\
         You can navigate to .txt or .pdf online files using your 'visit_page' tool.\n\
         And even if your search is unsuccessful, please return as much context as possible, \
         so your manager can act upon this feedback.",
        query
    )
}

pub struct AskSearchAgentTool;

#[async_trait]
impl Tool for AskSearchAgentTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "ask_search_agent",
            description: "This will send a message to a team member that will browse the internet to answer your question. Ask them for all your web-search related questions, but they are unable to do problem-solving. Provide as much context as possible, in particular if you need to search on a specific timeframe! Don't hesitate to hand them a complex search task, like finding a difference between two webpages.",
            parameters: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Your question, as a natural language sentence with a verb. Provide as much context as possible, instead of a bare keyword query."
                    }
                },
                "required": ["query"]
            }),
        }
    }

    fn validate(&self, params: &Value) -> Result<()> {
        params
            .get("query")
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
            .map(|_| ())
            .ok_or_else(|| Error::Validation("Missing required parameter: query".to_string()))
    }

    async fn execute(&self, ctx: ToolContext, params: Value) -> Result<Value> {
        let query = params["query"].as_str().unwrap_or_default();
        let surfer = ctx.surfer.as_ref().ok_or_else(|| {
            Error::Tool("No surfer handle available. Delegation is not configured.".to_string())
        })?;

        info!(query, "Delegating research task to the surfer");
        let run = surfer.run(&surfer_task(query)).await?;

        let mut answer = String::from("Here is the report from your team member's search:\n");
        answer.push_str(&compress_transcript(&run.steps, COMPRESS_THRESHOLD));
        answer.push_str("\n\nNow here is the team member's final answer deduced from the above:\n");
        answer.push_str(&run.final_answer);

        Ok(Value::String(answer))
    }
}
