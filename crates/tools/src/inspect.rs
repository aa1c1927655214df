//! Local file inspection: routes a filesystem path through the document
//! fetcher and returns the converted text through the session, so the
//! surfer can page through attached benchmark files like any other page.

use async_trait::async_trait;
use serde_json::{json, Value};
use websurfer_core::{Error, Result};

use crate::{Tool, ToolContext, ToolSchema};

pub struct InspectFileTool;

#[async_trait]
impl Tool for InspectFileTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "inspect_file_as_text",
            description: "Read a local file as markdown text. Handles .pdf, .docx, .xlsx, .pptx, .html and plain-text files. DO NOT USE THIS TOOL FOR A WEBPAGE: use visit_page instead.",
            parameters: json!({
                "type": "object",
                "properties": {
                    "file_path": {
                        "type": "string",
                        "description": "The path to the file you want to read as text. Must be a '.something' file, like '.pdf'."
                    }
                },
                "required": ["file_path"]
            }),
        }
    }

    fn validate(&self, params: &Value) -> Result<()> {
        params
            .get("file_path")
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
            .map(|_| ())
            .ok_or_else(|| Error::Validation("Missing required parameter: file_path".to_string()))
    }

    async fn execute(&self, ctx: ToolContext, params: Value) -> Result<Value> {
        let file_path = params["file_path"].as_str().unwrap_or_default();
        let mut browser = ctx.browser.lock().await;
        browser.visit(file_path).await?;
        Ok(Value::String(format!(
            "{}\n=======================\n{}",
            browser.header().trim_end(),
            browser.viewport()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_inspect_schema() {
        assert_eq!(InspectFileTool.schema().name, "inspect_file_as_text");
    }

    #[test]
    fn test_inspect_validate() {
        assert!(InspectFileTool.validate(&json!({"file_path": "/tmp/a.pdf"})).is_ok());
        assert!(InspectFileTool.validate(&json!({"file_path": " "})).is_err());
        assert!(InspectFileTool.validate(&json!({})).is_err());
    }
}
