//! Progress notification port
//!
//! Defines the interface for reporting progress while the research agent
//! runs. Every callback has a no-op default so implementations only pick
//! the events they care about.

/// Callback for progress updates during an agent run
pub trait AgentProgressNotifier: Send + Sync {
    /// Called before each model call of the head researcher
    fn on_model_call(&self, _iteration: usize) {}

    /// Called when a tool call starts
    fn on_tool_call(&self, _tool_name: &str, _args_preview: &str) {}

    /// Called when a tool call finishes
    fn on_tool_result(&self, _tool_name: &str, _success: bool) {}

    /// Called when the head researcher delegates to a sub-agent
    fn on_subagent_start(&self, _name: &str, _task: &str) {}

    fn on_subagent_end(&self, _name: &str, _success: bool) {}

    /// Called when the run pauses for human review
    fn on_interrupt(&self, _tool_name: &str) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoAgentProgress;

impl AgentProgressNotifier for NoAgentProgress {}
