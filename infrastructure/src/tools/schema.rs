//! Chat-completions function schemas for tool definitions

use research_application::ports::tool_schema::ToolSchemaPort;
use research_domain::tool::entities::{ToolDefinition, ToolParameter};
use serde_json::{Map, Value, json};

/// Renders `{"type": "function", "function": {name, description, parameters}}`.
///
/// Hosted tools pass their own schema through untouched. Local parameters
/// become an object schema; unknown type hints fall back to `string`.
pub struct JsonSchemaToolConverter;

fn json_type(param: &ToolParameter) -> &'static str {
    match param.param_type.as_str() {
        "integer" => "integer",
        "number" => "number",
        "boolean" => "boolean",
        _ => "string",
    }
}

fn property(param: &ToolParameter) -> Value {
    let mut prop = json!({
        "type": json_type(param),
        "description": param.description,
    });
    if !param.allowed_values.is_empty() {
        prop["enum"] = json!(param.allowed_values);
    }
    prop
}

fn parameters_schema(tool: &ToolDefinition) -> Value {
    if let Some(schema) = &tool.input_schema {
        return schema.clone();
    }

    let properties: Map<String, Value> = tool
        .parameters
        .iter()
        .map(|p| (p.name.clone(), property(p)))
        .collect();
    let required: Vec<&str> = tool
        .parameters
        .iter()
        .filter(|p| p.required)
        .map(|p| p.name.as_str())
        .collect();

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

impl ToolSchemaPort for JsonSchemaToolConverter {
    fn tool_to_schema(&self, tool: &ToolDefinition) -> Value {
        json!({
            "type": "function",
            "function": {
                "name": tool.name,
                "description": tool.description,
                "parameters": parameters_schema(tool),
            }
        })
    }
}
