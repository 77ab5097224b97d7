//! Report viewer port
//!
//! Turns the compiled HTML report into something a human can read: a short
//! fragment for the UI and a full page served locally.

use async_trait::async_trait;

/// Where a full report can be viewed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLink {
    pub url: String,
    /// False when the port was taken and only the browser was opened
    pub server_started: bool,
}

#[async_trait]
pub trait ReportViewerPort: Send + Sync {
    /// Executive summary fragment of the report, or `""` if it has none
    fn executive_summary(&self, html: &str) -> String;

    /// Publish the full report and open it in a browser
    async fn open_report(&self, html: &str) -> Result<ReportLink, String>;
}
