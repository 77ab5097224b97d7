//! Composio adapter
//!
//! The research tool bundle (web search, document creation) is hosted by
//! Composio and reached over its v3 REST API.

mod client;
mod provider;

pub use client::{ComposioClient, ComposioError};
pub use provider::{COMPOSIO_PRIORITY, ComposioToolProvider};
