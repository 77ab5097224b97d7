//! Sub-agent configurations
//!
//! A sub-agent is nothing more than a named system prompt plus the subset
//! of registry tools it may call. The head researcher reaches them through
//! the `task` tool.

use crate::prompt::QUESTIONS_TOOL;
use serde::{Deserialize, Serialize};

pub const QUESTION_AGENT: &str = "research-question-agent";
pub const ANSWER_AGENT: &str = "research-answer-agent";
pub const REPORT_AGENT: &str = "report-compiling-agent";

/// A named sub-agent configuration (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubAgentSpec {
    /// Name the head researcher uses in `subagent_type`
    pub name: String,
    /// When to use this sub-agent (shown to the head researcher)
    pub description: String,
    pub system_prompt: String,
    /// Registry tool names this sub-agent may call
    pub tools: Vec<String>,
}

impl SubAgentSpec {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            system_prompt: system_prompt.into(),
            tools: Vec::new(),
        }
    }

    pub fn with_tools(mut self, tools: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tools.extend(tools.into_iter().map(Into::into));
        self
    }

    /// Breaks a topic down into specific research questions.
    pub fn question_generator(bundle: &[&str]) -> Self {
        Self::new(
            QUESTION_AGENT,
            "Used to generate research questions about a topic in a given domain",
            "You are an expert at breaking down research topics into specific questions.",
        )
        .with_tools(bundle.iter().copied())
        .with_tools([QUESTIONS_TOOL])
    }

    /// Researches a single question.
    pub fn question_answerer(bundle: &[&str]) -> Self {
        Self::new(
            ANSWER_AGENT,
            "Used to answer a research question",
            "You are a sophisticated research assistant, skilled in researching a \
             particular research question related to a given domain. Provide a concise, \
             well-sourced answer and cite the sources you used.",
        )
        .with_tools(bundle.iter().copied())
    }

    /// Turns findings into a report.
    pub fn report_compiler(bundle: &[&str]) -> Self {
        Self::new(
            REPORT_AGENT,
            "Used to create a professional, McKinsey-style report from research findings",
            "You are a sophisticated research assistant, skilled in creating research \
             reports from existing research findings. Produce clean, structured HTML.",
        )
        .with_tools(bundle.iter().copied())
    }

    /// The three role-specialized sub-agents, each given the full tool bundle.
    pub fn defaults(bundle: &[&str]) -> Vec<SubAgentSpec> {
        vec![
            Self::question_generator(bundle),
            Self::question_answerer(bundle),
            Self::report_compiler(bundle),
        ]
    }
}
