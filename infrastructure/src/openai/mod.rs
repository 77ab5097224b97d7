//! OpenAI adapter
//!
//! Implements [`LlmGateway`](research_application::ports::llm_gateway::LlmGateway)
//! over the chat completions endpoint with native function calling.

mod gateway;
pub mod types;

pub use gateway::OpenAiGateway;
