// crates/api-bridge-core/src/convert.rs
// ============================================================================
// Module: Schema Conversion
// Description: Converts operation records into tool definitions and schemas.
// Purpose: Provide the deterministic operation-to-tool translation.
// Dependencies: api-bridge-config, serde, serde_json
// ============================================================================

//! ## Overview
//! The converter turns one [`OperationRecord`] into a [`ToolDefinition`]:
//! an input schema with one property per parameter plus the reserved control
//! properties, behavior annotations derived from the HTTP method, and a
//! description that always embeds the method and path. Conversion is a pure
//! function of its inputs; identical inputs yield identical definitions.
//! Security posture: structural schemas are copied from an untrusted
//! document, never evaluated; see `Docs/security/threat_model.md`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use api_bridge_config::BridgeConfig;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;

use crate::operation::OperationRecord;

// ============================================================================
// SECTION: Tool Definition
// ============================================================================

/// Behavior annotations attached to a tool definition.
///
/// # Invariants
/// - Hints are derived from HTTP method semantics and the risky flag only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolAnnotations {
    /// Display title for the tool.
    pub title: String,
    /// True for methods without observable side effects.
    pub read_only_hint: bool,
    /// Mirrors the operation's risky classification.
    pub destructive_hint: bool,
    /// True for methods that are idempotent by HTTP semantics.
    pub idempotent_hint: bool,
    /// Always false: tools only reach the bridged API.
    pub open_world_hint: bool,
}

/// Tool definition shape used by tool listings.
///
/// # Invariants
/// - `name` is a normalized, generation-unique tool identifier.
/// - `input_schema` is a JSON Schema payload for the tool input shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Normalized tool name.
    pub name: String,
    /// Display title (operation id when present).
    pub title: String,
    /// Tool description for clients.
    pub description: String,
    /// JSON schema for tool input.
    pub input_schema: Value,
    /// Behavior annotations.
    pub annotations: ToolAnnotations,
}

// ============================================================================
// SECTION: Converter
// ============================================================================

/// Converts operation records into tool definitions.
///
/// # Invariants
/// - Conversion is deterministic and side-effect free.
#[derive(Debug, Clone)]
pub struct SchemaConverter {
    /// Shared bridge configuration snapshot.
    config: Arc<BridgeConfig>,
}

impl SchemaConverter {
    /// Creates a converter over the shared configuration.
    #[must_use]
    pub const fn new(config: Arc<BridgeConfig>) -> Self {
        Self {
            config,
        }
    }

    /// Converts one operation record into a tool definition.
    #[must_use]
    pub fn convert(&self, operation: &OperationRecord) -> ToolDefinition {
        let mut properties = Map::new();
        let mut required: Vec<String> = Vec::new();

        for parameter in &operation.parameters {
            properties
                .insert(parameter.name.clone(), to_json_schema(parameter.schema.as_ref()));
            if parameter.required {
                required.push(parameter.name.clone());
            }
        }

        if operation.request_body_schema.is_some() {
            properties
                .insert("body".to_string(), to_json_schema(operation.request_body_schema.as_ref()));
            if operation.request_body_required {
                required.push("body".to_string());
            }
        }

        properties.insert(
            "_headers".to_string(),
            json!({
                "type": "object",
                "additionalProperties": true,
                "description": "Optional extra HTTP headers",
            }),
        );
        if self.config.response.projection_argument_enabled {
            properties.insert(
                "_projection".to_string(),
                string_schema("Optional JSONPath projection"),
            );
        }
        properties
            .insert("_summarize".to_string(), boolean_schema("Override response summarization"));
        properties
            .insert("_maxDepth".to_string(), integer_schema("Override max JSON summary depth"));
        properties.insert(
            "_maxArrayItems".to_string(),
            integer_schema("Override max summary array items"),
        );
        properties.insert(
            "_maxObjectEntries".to_string(),
            integer_schema("Override max summary object entries"),
        );

        if operation.risky && self.config.security.require_confirmation_for_risky_operations {
            properties.insert(
                "_confirm".to_string(),
                string_schema(&format!(
                    "Confirmation token required for risky operations: {}",
                    self.config.security.confirmation_token
                )),
            );
            required.push("_confirm".to_string());
        }

        let input_schema = json!({
            "type": "object",
            "properties": Value::Object(properties),
            "required": required,
            "additionalProperties": false,
        });

        let title = if operation.operation_id.is_empty() {
            operation.tool_name.clone()
        } else {
            operation.operation_id.clone()
        };

        ToolDefinition {
            name: operation.tool_name.clone(),
            title: title.clone(),
            description: build_description(operation),
            input_schema,
            annotations: ToolAnnotations {
                title,
                read_only_hint: operation.method.is_read_only(),
                destructive_hint: operation.risky,
                idempotent_hint: operation.method.is_idempotent(),
                open_world_hint: false,
            },
        }
    }
}

// ============================================================================
// SECTION: Description
// ============================================================================

/// Builds the client-facing tool description for an operation.
fn build_description(operation: &OperationRecord) -> String {
    let mut description = String::new();
    let trimmed = operation.description.trim();
    if trimmed.is_empty() {
        description.push_str("Execute ");
        description.push_str(operation.method.as_str());
        description.push(' ');
        description.push_str(&operation.path);
    } else {
        description.push_str(trimmed);
    }
    description.push_str(" [");
    description.push_str(operation.method.as_str());
    description.push(' ');
    description.push_str(&operation.path);
    description.push(']');
    if operation.risky {
        description.push_str(" (risky operation: confirmation may be required)");
    }
    description
}

// ============================================================================
// SECTION: Structural Translation
// ============================================================================

/// Recursively translates a structural schema into a JSON Schema object.
///
/// An absent schema translates to a plain string schema. When no `type` can
/// be resolved, `object` is inferred for schemas with properties, `array`
/// for schemas with items, and `string` otherwise.
#[must_use]
pub fn to_json_schema(schema: Option<&Value>) -> Value {
    let Some(Value::Object(source)) = schema else {
        return json!({ "type": "string" });
    };
    let mut target = Map::new();

    for key in ["$ref", "type", "format", "description", "default", "enum", "nullable"] {
        if let Some(value) = source.get(key) {
            target.insert(key.to_string(), value.clone());
        }
    }

    if let Some(Value::Object(source_properties)) = source.get("properties")
        && !source_properties.is_empty()
    {
        let mut properties = Map::new();
        for (name, value) in source_properties {
            properties.insert(name.clone(), to_json_schema(Some(value)));
        }
        target.insert("properties".to_string(), Value::Object(properties));
    }
    if let Some(Value::Array(required)) = source.get("required")
        && !required.is_empty()
    {
        target.insert("required".to_string(), Value::Array(required.clone()));
    }
    if let Some(items) = source.get("items") {
        target.insert("items".to_string(), to_json_schema(Some(items)));
    }

    match source.get("additionalProperties") {
        Some(Value::Bool(flag)) => {
            target.insert("additionalProperties".to_string(), Value::Bool(*flag));
        }
        Some(nested @ Value::Object(_)) => {
            target.insert("additionalProperties".to_string(), to_json_schema(Some(nested)));
        }
        _ => {}
    }

    for key in ["allOf", "anyOf", "oneOf"] {
        if let Some(Value::Array(members)) = source.get(key)
            && !members.is_empty()
        {
            let converted: Vec<Value> =
                members.iter().map(|member| to_json_schema(Some(member))).collect();
            target.insert(key.to_string(), Value::Array(converted));
        }
    }

    if !target.contains_key("type") {
        let inferred = if target.contains_key("properties") {
            "object"
        } else if target.contains_key("items") {
            "array"
        } else {
            "string"
        };
        target.insert("type".to_string(), Value::String(inferred.to_string()));
    }
    Value::Object(target)
}

// ============================================================================
// SECTION: Schema Helpers
// ============================================================================

/// Builds a described string schema.
fn string_schema(description: &str) -> Value {
    json!({ "type": "string", "description": description })
}

/// Builds a described boolean schema.
fn boolean_schema(description: &str) -> Value {
    json!({ "type": "boolean", "description": description })
}

/// Builds a described integer schema.
fn integer_schema(description: &str) -> Value {
    json!({ "type": "integer", "description": description })
}

// ============================================================================
// SECTION: Tests
// ============================================================================
