//! Builds the research agent from configuration and the UI's API keys

use async_trait::async_trait;
use research_application::{AgentProgressNotifier, DeepAgent};
use research_domain::{InterruptPolicy, ResearchPromptTemplate, SubAgentSpec};
use research_infrastructure::{
    BuiltinProvider, ComposioClient, ComposioToolProvider, FileConfig, JsonSchemaToolConverter,
    MemoryCheckpointStore, OpenAiGateway, ToolRegistry,
};
use research_presentation::{AgentFactory, ApiKeys, BuildError};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub struct ResearchAgentFactory {
    config: FileConfig,
}

impl ResearchAgentFactory {
    pub fn new(config: FileConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl AgentFactory for ResearchAgentFactory {
    async fn build(
        &self,
        keys: &ApiKeys,
        progress: Arc<dyn AgentProgressNotifier>,
    ) -> Result<DeepAgent, BuildError> {
        let (Some(openai_key), Some(composio_key)) = (&keys.openai, &keys.composio) else {
            return Err("both API keys are required".into());
        };
        let config = &self.config;

        let gateway = OpenAiGateway::new(
            openai_key,
            &config.model.base_url,
            Duration::from_secs(config.model.timeout_seconds),
        )?;

        let client = ComposioClient::new(
            composio_key,
            &config.tools.composio_base_url,
            Duration::from_secs(config.tools.timeout_seconds),
        )?;
        let mut registry = ToolRegistry::new()
            .register(ComposioToolProvider::new(
                client,
                &config.tools.user_id,
                config.tools.slugs.clone(),
            ))
            .register(BuiltinProvider::new());
        registry.discover().await;

        let bundle: Vec<String> = registry
            .tools_of("composio")
            .into_iter()
            .map(str::to_string)
            .collect();
        let bundle: Vec<&str> = bundle.iter().map(String::as_str).collect();
        info!(tools = ?bundle, "Research tool bundle loaded");

        let model = config.model.parse_model()?;
        let agent = DeepAgent::new(
            Arc::new(gateway),
            Arc::new(registry),
            Arc::new(JsonSchemaToolConverter),
            Arc::new(MemoryCheckpointStore::new()),
            model,
        )
        .with_system_prompt(ResearchPromptTemplate::head_researcher(
            &bundle,
            config.agent.expected_questions,
        ))
        .with_subagents(SubAgentSpec::defaults(&bundle))
        .with_interrupt_policy(InterruptPolicy::research_default())
        .with_limits(config.agent.limits())
        .with_progress(progress);

        info!(model = %agent.model(), subagents = agent.subagents().len(), "Research agent built");
        Ok(agent)
    }
}
