pub mod prompts;
pub mod provider;
pub mod runtime;

pub use provider::{OpenAIProvider, Provider};
pub use runtime::AgentRuntime;
