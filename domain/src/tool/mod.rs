//! Tool domain module
//!
//! Defines how the research agent reaches beyond text generation: the
//! question extraction tool, the remotely hosted search/document tools, and
//! the `task` tool used to delegate to sub-agents all share these types.
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ ToolSpec     │───▶│ ToolCall     │───▶│ ToolResult   │
//! │ (registry)   │    │ (invocation) │    │ (output)     │
//! └──────────────┘    └──────────────┘    └──────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`ToolSpec`]: Registry of available tools
//! - [`ToolDefinition`]: Schema for a single tool (local params or remote JSON schema)
//! - [`ToolCall`]: An invocation request with arguments
//! - [`ToolResult`]: Execution outcome with structured metadata
//! - [`ToolValidator`]: Pure domain trait for parameter validation
//! - [`ToolProvider`]: Abstraction for tool sources (builtin, Composio)

pub mod entities;
pub mod provider;
pub mod traits;
pub mod value_objects;

pub use entities::{ToolCall, ToolDefinition, ToolParameter, ToolSpec};
pub use provider::{ProviderError, ToolProvider};
pub use traits::{DefaultToolValidator, ToolValidator};
pub use value_objects::{ToolError, ToolErrorKind, ToolResult, ToolResultMetadata};
