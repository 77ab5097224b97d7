//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod checkpoint;
pub mod llm_gateway;
pub mod progress;
pub mod report;
pub mod tool_executor;
pub mod tool_schema;
