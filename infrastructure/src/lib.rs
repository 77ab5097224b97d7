//! Infrastructure layer for deep-research
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the OpenAI gateway, the Composio tool bundle,
//! the in-memory checkpointer, the report viewer and configuration loading.

pub mod checkpoint;
pub mod composio;
pub mod config;
pub mod openai;
pub mod report;
pub mod tools;

// Re-export commonly used types
pub use checkpoint::MemoryCheckpointStore;
pub use composio::{ComposioClient, ComposioError, ComposioToolProvider};
pub use config::{ConfigLoader, ConfigValidationError, FileConfig};
pub use openai::OpenAiGateway;
pub use report::{ReportError, ReportViewer, extract_executive_summary};
pub use tools::{BuiltinProvider, JsonSchemaToolConverter, ToolRegistry};
