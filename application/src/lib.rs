//! Application layer for deep-research
//!
//! This crate contains the research agent, the session use case, and the
//! port definitions. It depends only on the domain layer.

pub mod agent;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use agent::{AgentError, AgentLimits, AgentRunResult, DeepAgent};
pub use ports::{
    checkpoint::{Checkpoint, CheckpointStore, DelegatedPause},
    llm_gateway::{ChatRequest, GatewayError, LlmGateway},
    progress::{AgentProgressNotifier, NoAgentProgress},
    report::{ReportLink, ReportViewerPort},
    tool_executor::ToolExecutorPort,
    tool_schema::ToolSchemaPort,
};
pub use use_cases::research_session::{ResearchError, ResearchSessionUseCase};
