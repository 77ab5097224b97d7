//! Presentation layer for deep-research
//!
//! This crate contains the CLI definition and the browser UI that drives
//! the research session.

pub mod cli;
pub mod web;

// Re-export commonly used types
pub use cli::commands::Cli;
pub use web::{ActivityFeed, AgentFactory, ApiKeys, AppState, BuildError, router, serve};
