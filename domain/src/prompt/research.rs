//! Prompt templates for the research agent and its sub-agents

use crate::agent::subagent::SubAgentSpec;

/// Name of the builtin tool that turns a numbered list into questions
pub const QUESTIONS_TOOL: &str = "generate_questions_list";

/// Name of the tool the head researcher uses to delegate to sub-agents
pub const TASK_TOOL: &str = "task";

/// Templates for generating research prompts
pub struct ResearchPromptTemplate;

impl ResearchPromptTemplate {
    /// System prompt for the head researcher (top-level agent).
    ///
    /// `search_tools` are the tool names the agent should use to gather
    /// evidence; `question_count` is the number of yes/no questions to draft.
    pub fn head_researcher(search_tools: &[&str], question_count: usize) -> String {
        let tools = if search_tools.is_empty() {
            "your own knowledge (no search tools are configured)".to_string()
        } else {
            search_tools
                .iter()
                .map(|t| format!("**{}**", t))
                .collect::<Vec<_>>()
                .join(", ")
        };

        format!(
            r#"You are a senior, highly analytical head researcher.

Your task proceeds in **three strict phases**. Follow each phase exactly, and adhere to all formatting requirements.

---

### PHASE 1 — Generate Research Questions

1. Based on the user's input (**Topic**, **Domain**), generate **exactly {question_count} highly specific YES/NO research questions**.
2. These questions must be evaluative, research-ready, and directly answerable using {tools}.
3. Write the questions as a **numbered list (1-{question_count})** and **nothing else**.
4. Call the **{QUESTIONS_TOOL}** tool with that numbered list as `q` to extract the questions into a list.
   A human reviews the list at this point and may edit it; continue with the list the tool returns.

---

### PHASE 2 — Deep research on each question

For each question returned by {QUESTIONS_TOOL}:

1. Use {tools} to gather evidence (you may delegate with the **{TASK_TOOL}** tool).
2. Produce a **detailed, well-sourced analytical answer**.

---

### PHASE 3 — Compile a McKinsey-style research report

Using the findings from Phase 2, compile a polished, consulting-grade report, comprehensive and detailed:

1. **Executive Summary** — a concise, high-level overview highlighting the most important insights and outcomes without repeating the introduction. Wrap it in `<section id="executive-summary">`.
2. **Introduction** — briefly introduce the topic and domain, and summarize the key findings.
3. **Research Analysis** — one section per research question with a clear subheading. **Do NOT use a Q&A format**; weave the findings into an analytical narrative.
4. **Conclusion & Implications** — cross-cutting insights and implications for decision-makers.

The entire report must be formatted as **clean, structured HTML**.

---

### FINAL OUTPUT CONSTRAINTS

Return the final output (the report from PHASE 3) **ONLY as HTML**, with no surrounding text, so it can be parsed directly by the website."#
        )
    }

    /// First user message of a research run
    pub fn user_request(topic: &str, domain: &str) -> String {
        format!("Topic: {}, Domain: {}", topic, domain)
    }

    /// Description of the `task` delegation tool, listing the sub-agents
    pub fn task_tool_description(subagents: &[SubAgentSpec]) -> String {
        let agents = subagents
            .iter()
            .map(|a| format!("- {}: {}", a.name, a.description))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "Delegate a self-contained piece of work to a specialised sub-agent. \
             The sub-agent works independently with its own tools and returns a single report.\n\n\
             Available sub-agents:\n{}",
            agents
        )
    }
}
