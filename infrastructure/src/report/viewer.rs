//! Full report viewer: report file, local static-file server and browser tab

use super::summary::extract_executive_summary;
use crate::config::FileReportConfig;
use async_trait::async_trait;
use axum::Router;
use research_application::ports::report::{ReportLink, ReportViewerPort};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{Mutex, oneshot};
use tower_http::services::ServeDir;
use tracing::{debug, info, warn};

/// Delay between starting the server and opening the browser
const BROWSER_DELAY: Duration = Duration::from_secs(1);

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to write report to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to start report server on port {port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: io::Error,
    },
}

struct ServeHandle {
    shutdown_tx: Option<oneshot::Sender<()>>,
    join: tokio::task::JoinHandle<io::Result<()>>,
}

impl ServeHandle {
    async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        match self.join.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(error = %e, "Report server exited with error"),
            Err(e) => warn!(error = %e, "Report server task failed"),
        }
    }
}

/// Writes the report to a fixed file and serves it over HTTP
pub struct ReportViewer {
    directory: PathBuf,
    file_name: String,
    port: u16,
    open_browser: bool,
    server: Mutex<Option<ServeHandle>>,
}

impl ReportViewer {
    pub fn new(directory: impl Into<PathBuf>, file_name: impl Into<String>, port: u16) -> Self {
        Self {
            directory: directory.into(),
            file_name: file_name.into(),
            port,
            open_browser: true,
            server: Mutex::new(None),
        }
    }

    pub fn from_config(config: &FileReportConfig) -> Self {
        Self::new(&config.directory, &config.file_name, config.port)
            .with_open_browser(config.open_browser)
    }

    pub fn with_open_browser(mut self, open_browser: bool) -> Self {
        self.open_browser = open_browser;
        self
    }

    pub fn url(&self) -> String {
        format!("http://localhost:{}/{}", self.port, self.file_name)
    }

    pub fn report_path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }

    /// Write `html`, (re)start the server and open the report in a browser.
    ///
    /// When the port is already taken, only the browser is opened and
    /// `server_started` is false.
    pub async fn open(&self, html: &str) -> Result<ReportLink, ReportError> {
        let path = self.report_path();
        write_report(&path, html).await?;
        info!(path = %path.display(), bytes = html.len(), "Wrote report");

        let mut server = self.server.lock().await;
        if let Some(previous) = server.take() {
            debug!("Stopping previous report server");
            previous.shutdown().await;
        }

        let server_started = match self.start_server().await {
            Ok(handle) => {
                *server = Some(handle);
                true
            }
            Err(ReportError::Bind { source, .. }) if source.kind() == io::ErrorKind::AddrInUse => {
                warn!(port = self.port, "Report port already in use, opening browser only");
                false
            }
            Err(e) => return Err(e),
        };
        drop(server);

        let url = self.url();
        if self.open_browser {
            spawn_browser(url.clone());
        }

        Ok(ReportLink {
            url,
            server_started,
        })
    }

    /// Stop the report server if one is running
    pub async fn shutdown(&self) {
        if let Some(handle) = self.server.lock().await.take() {
            handle.shutdown().await;
        }
    }

    async fn start_server(&self) -> Result<ServeHandle, ReportError> {
        let bind_err = |source| ReportError::Bind {
            port: self.port,
            source,
        };
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", self.port))
            .await
            .map_err(bind_err)?;

        let app = Router::new().fallback_service(ServeDir::new(&self.directory));
        info!(port = self.port, dir = %self.directory.display(), "Report server listening");

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let join = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                    debug!("Report server received shutdown signal");
                })
                .await
        });

        Ok(ServeHandle {
            shutdown_tx: Some(shutdown_tx),
            join,
        })
    }
}

#[async_trait]
impl ReportViewerPort for ReportViewer {
    fn executive_summary(&self, html: &str) -> String {
        extract_executive_summary(html)
    }

    async fn open_report(&self, html: &str) -> Result<ReportLink, String> {
        self.open(html).await.map_err(|e| e.to_string())
    }
}

async fn write_report(path: &Path, html: &str) -> Result<(), ReportError> {
    let write_err = |source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }
    tokio::fs::write(path, html).await.map_err(write_err)
}

fn spawn_browser(url: String) {
    tokio::spawn(async move {
        tokio::time::sleep(BROWSER_DELAY).await;
        let target = url.clone();
        match tokio::task::spawn_blocking(move || open::that(target)).await {
            Ok(Ok(())) => info!(url = %url, "Opened report in browser"),
            Ok(Err(e)) => warn!(url = %url, error = %e, "Failed to open browser"),
            Err(e) => warn!(error = %e, "Browser task failed"),
        }
    });
}
