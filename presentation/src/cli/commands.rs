//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for deep-research
#[derive(Parser, Debug)]
#[command(name = "deep-research")]
#[command(author, version, about = "AI Domain Deep Research Agent - multi-agent research with human review")]
#[command(long_about = r#"
Deep Research drafts yes/no research questions about a topic in a domain,
pauses so you can approve or edit them, then researches each question and
compiles an HTML report. Everything happens in a browser UI.

The run has three phases:
1. Questions: the head researcher drafts a numbered list of questions
2. Review: you approve the list or edit it
3. Research: each question is researched and a report is compiled

API keys are read from OPENAI_API_KEY and COMPOSIO_API_KEY, or entered in the UI.

Configuration files are loaded from (in priority order):
1. DEEP_RESEARCH_* environment variables
2. --config <path>     Explicit config file
3. ./deep-research.toml or ./.deep-research.toml   Project-level config
4. ~/.config/deep-research/config.toml              Global config

Example:
  deep-research
  deep-research --bind 0.0.0.0:8501 --no-browser
  deep-research --model openai:gpt-4.1 -vv
"#)]
pub struct Cli {
    /// Address the UI server listens on (overrides [server].bind)
    #[arg(short, long, value_name = "ADDR")]
    pub bind: Option<String>,

    /// Model driving the agent, as provider:name (overrides [model].id)
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Do not open browser tabs (UI at startup, full reports)
    #[arg(long)]
    pub no_browser: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["deep-research"]);
        assert!(cli.bind.is_none());
        assert!(cli.model.is_none());
        assert!(!cli.no_browser);
        assert_eq!(cli.verbose, 0);
        assert!(!cli.show_config);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from([
            "deep-research",
            "--bind",
            "0.0.0.0:9000",
            "-m",
            "openai:gpt-4.1",
            "--no-browser",
            "-vv",
            "--config",
            "research.toml",
        ]);
        assert_eq!(cli.bind.as_deref(), Some("0.0.0.0:9000"));
        assert_eq!(cli.model.as_deref(), Some("openai:gpt-4.1"));
        assert!(cli.no_browser);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("research.toml")));
    }
}
