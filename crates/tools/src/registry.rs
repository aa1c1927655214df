//! Tool registry: named lookup plus the two default tool sets, one per
//! agent role.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{json, Value};
use websurfer_core::{Error, Result};

use crate::delegate::AskSearchAgentTool;
use crate::inspect::InspectFileTool;
use crate::surf::{
    ArchiveSearchTool, FindNextTool, FinderTool, NavigationalSearchTool, PageDownTool, PageUpTool,
    SearchInformationTool, VisitTool,
};
use crate::Tool;

#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The surfer's tool set: session navigation and lookup only.
    pub fn web_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(SearchInformationTool));
        registry.register(Arc::new(NavigationalSearchTool));
        registry.register(Arc::new(VisitTool));
        registry.register(Arc::new(PageUpTool));
        registry.register(Arc::new(PageDownTool));
        registry.register(Arc::new(FinderTool));
        registry.register(Arc::new(FindNextTool));
        registry.register(Arc::new(ArchiveSearchTool));
        registry
    }

    /// The orchestrator's tool set: delegate web work, read attached files.
    pub fn orchestrator_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(AskSearchAgentTool));
        registry.register(Arc::new(InspectFileTool));
        registry
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.schema().name.to_string(), tool);
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn Tool>> {
        self.tools
            .get(name)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Unknown tool: {}", name)))
    }

    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Function-call schemas in the chat-completions wire shape.
    pub fn schemas(&self) -> Vec<Value> {
        let mut entries: Vec<(String, Value)> = self
            .tools
            .values()
            .map(|tool| {
                let schema = tool.schema();
                (
                    schema.name.to_string(),
                    json!({
                        "type": "function",
                        "function": {
                            "name": schema.name,
                            "description": schema.description,
                            "parameters": schema.parameters,
                        }
                    }),
                )
            })
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries.into_iter().map(|(_, v)| v).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_web_defaults_roster() {
        let registry = ToolRegistry::web_defaults();
        assert_eq!(
            registry.list(),
            vec![
                "find_archived_url",
                "find_next",
                "find_on_page_ctrl_f",
                "informational_web_search",
                "navigational_web_search",
                "page_down",
                "page_up",
                "visit_page",
            ]
        );
    }

    #[test]
    fn test_orchestrator_defaults_roster() {
        let registry = ToolRegistry::orchestrator_defaults();
        assert_eq!(registry.list(), vec!["ask_search_agent", "inspect_file_as_text"]);
    }

    #[test]
    fn test_get_unknown_tool() {
        let registry = ToolRegistry::web_defaults();
        assert!(registry.get("visit_page").is_ok());
        assert!(registry.get("no_such_tool").is_err());
    }

    #[test]
    fn test_schemas_wire_shape() {
        let registry = ToolRegistry::web_defaults();
        let schemas = registry.schemas();
        assert_eq!(schemas.len(), 8);
        for schema in &schemas {
            assert_eq!(schema["type"], "function");
            assert!(schema["function"]["name"].is_string());
            assert_eq!(schema["function"]["parameters"]["type"], "object");
        }
    }
}
