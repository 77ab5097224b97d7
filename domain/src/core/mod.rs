//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`]: the LLM driving the research agent (`provider:name`)
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod model;
