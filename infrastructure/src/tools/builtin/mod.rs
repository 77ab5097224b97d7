//! Built-in tool provider module
//!
//! Provides the BuiltinProvider which serves the in-process tools.

mod provider;

pub use provider::{BUILTIN_PRIORITY, BuiltinProvider};
