//! Conversation domain module
//!
//! Messages exchanged with the LLM and the structured responses it returns.

pub mod entities;
pub mod response;

pub use entities::{Message, Role};
pub use response::{ContentBlock, LlmResponse, StopReason};
