//! Argument validation for locally declared tools

use super::entities::{ToolCall, ToolDefinition};

/// Checks a call against its definition without any I/O
pub trait ToolValidator {
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), String>;
}

/// Checks arguments against the declared parameters.
///
/// Tools carrying a remote JSON schema pass unchecked; the hosting service
/// validates their arguments.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultToolValidator;

impl ToolValidator for DefaultToolValidator {
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), String> {
        if definition.is_remote() {
            return Ok(());
        }

        let declared = |name: &str| definition.parameters.iter().any(|p| p.name == name);
        if let Some(unknown) = call.arguments.keys().find(|name| !declared(name.as_str())) {
            return Err(format!(
                "'{}' does not take argument '{}'",
                definition.name, unknown
            ));
        }

        for param in &definition.parameters {
            match call.arguments.get(&param.name) {
                None if param.required => {
                    return Err(format!(
                        "'{}' requires argument '{}'",
                        definition.name, param.name
                    ));
                }
                Some(value) if !param.allowed_values.is_empty() => {
                    let allowed = value
                        .as_str()
                        .is_some_and(|v| param.allowed_values.iter().any(|a| a == v));
                    if !allowed {
                        return Err(format!(
                            "argument '{}' must be one of: {}",
                            param.name,
                            param.allowed_values.join(", ")
                        ));
                    }
                }
                _ => {}
            }
        }

        Ok(())
    }
}
