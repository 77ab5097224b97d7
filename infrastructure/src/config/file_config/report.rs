//! Report viewer and UI server configuration (`[report]`, `[server]`)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw report configuration from TOML
///
/// ```toml
/// [report]
/// port = 8000
/// file_name = "temp.html"
/// directory = "."
/// open_browser = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReportConfig {
    /// Port of the local static-file server for the full report
    pub port: u16,
    pub file_name: String,
    /// Directory the report file is written to and served from
    pub directory: PathBuf,
    /// Open the report (and the UI at startup) in a browser
    pub open_browser: bool,
}

impl Default for FileReportConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            file_name: "temp.html".to_string(),
            directory: PathBuf::from("."),
            open_browser: true,
        }
    }
}

/// Raw UI server configuration from TOML
///
/// ```toml
/// [server]
/// bind = "127.0.0.1:8501"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    pub bind: String,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8501".to_string(),
        }
    }
}
