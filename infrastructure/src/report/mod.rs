//! Report rendering support
//!
//! - [`extract_executive_summary`] pulls the summary fragment shown in the UI
//! - [`ReportViewer`] serves the full report over local HTTP

mod summary;
mod viewer;

pub use summary::extract_executive_summary;
pub use viewer::{ReportError, ReportViewer};
