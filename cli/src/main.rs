//! CLI entrypoint for deep-research
//!
//! This is the main binary that wires together all layers using
//! dependency injection and serves the browser UI.

mod agent;

use agent::ResearchAgentFactory;
use anyhow::{Context, Result};
use clap::Parser;
use research_application::ReportViewerPort;
use research_infrastructure::{ConfigLoader, FileConfig, ReportViewer};
use research_presentation::{ApiKeys, AppState, Cli};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging(cli.verbose);

    if cli.show_config {
        print!("{}", ConfigLoader::describe_sources(cli.config.as_ref()));
        return Ok(());
    }

    let config = load_config(&cli)?;
    info!(model = %config.model.id, bind = %config.server.bind, "Starting deep-research");

    // === Dependency Injection ===
    let report = Arc::new(ReportViewer::from_config(&config.report));
    let report_port: Arc<dyn ReportViewerPort> = report.clone();
    let keys = ApiKeys::from_env();
    if !keys.is_complete() {
        info!("API keys not found in the environment, waiting for them in the UI");
    }
    let state = AppState::new(
        Arc::new(ResearchAgentFactory::new(config.clone())),
        report_port,
        keys,
        config.agent.expected_questions,
    );

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("failed to bind UI server to {}", config.server.bind))?;
    let url = ui_url(&listener)?;
    println!("Deep Research UI: {}", url);

    if config.report.open_browser {
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(500)).await;
            let target = url.clone();
            match tokio::task::spawn_blocking(move || open::that(target)).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(url = %url, error = %e, "Failed to open browser"),
                Err(e) => warn!(error = %e, "Browser task failed"),
            }
        });
    }

    research_presentation::serve(listener, state, async {
        let _ = tokio::signal::ctrl_c().await;
        info!("Shutting down");
    })
    .await
    .context("UI server failed")?;

    report.shutdown().await;
    Ok(())
}

/// stderr at the `-v` level plus a daily JSON file log
fn init_logging(verbose: u8) -> Option<WorkerGuard> {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::new(filter));

    let Some(log_dir) = log_dir() else {
        tracing_subscriber::registry().with(stderr_layer).init();
        return None;
    };

    let file_appender = tracing_appender::rolling::daily(&log_dir, "deep-research.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();
    Some(guard)
}

fn log_dir() -> Option<PathBuf> {
    let dir = dirs::data_dir()?.join("deep-research").join("logs");
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir)
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("failed to load configuration")?
    };

    if let Some(model) = &cli.model {
        config.model.id = model.clone();
    }
    if let Some(bind) = &cli.bind {
        config.server.bind = bind.clone();
    }
    if cli.no_browser {
        config.report.open_browser = false;
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

/// Browser URL for the bound listener (loopback when bound to all interfaces)
fn ui_url(listener: &tokio::net::TcpListener) -> Result<String> {
    let addr = listener.local_addr()?;
    if addr.ip().is_unspecified() {
        Ok(format!("http://localhost:{}/", addr.port()))
    } else {
        Ok(format!("http://{}/", addr))
    }
}
