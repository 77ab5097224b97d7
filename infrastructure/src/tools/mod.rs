//! Tool implementations for the research agent
//!
//! ## Providers
//!
//! Tools are organized into providers:
//! - `builtin`: in-process tools (generate_questions_list), always available
//! - `composio`: remotely hosted search and document tools
//!   (see [`crate::composio`])

pub mod builtin;
pub mod questions;

mod registry;
mod schema;

pub use builtin::BuiltinProvider;
pub use registry::ToolRegistry;
pub use schema::JsonSchemaToolConverter;

use research_domain::tool::entities::ToolSpec;

/// Specification of the in-process tools
pub fn builtin_tool_spec() -> ToolSpec {
    ToolSpec::new().register(questions::questions_definition())
}
