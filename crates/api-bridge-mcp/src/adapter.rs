// crates/api-bridge-mcp/src/adapter.rs
// ============================================================================
// Module: Bridge Adapter
// Description: Tool registration and invocation routing for the bridge.
// Purpose: Publish operations as tools and orchestrate gated invocations.
// Dependencies: api-bridge-config, api-bridge-core, serde_json
// ============================================================================

//! ## Overview
//! The adapter wires every bridge component together: it registers operation
//! records as tool generations, serves tool listings, and routes each
//! invocation through audit, the security gate, request building, HTTP
//! execution, and response optimization. Two meta-tools expose the smart
//! context gateway: discovery ranks tools against a free-text query, and
//! invoke-by-intent delegates to the best match. Every failure becomes an
//! error result; the adapter never panics and never propagates an error to
//! the host.
//! Security posture: tool names and arguments are untrusted; the gate runs
//! before any request is built and risky delegation still requires the
//! caller's confirmation token; see `Docs/security/threat_model.md`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use api_bridge_config::BridgeConfig;
use api_bridge_core::BridgeError;
use api_bridge_core::InvocationArguments;
use api_bridge_core::OperationRecord;
use api_bridge_core::ResponseOptimizer;
use api_bridge_core::SchemaConverter;
use api_bridge_core::SecurityPolicy;
use api_bridge_core::ToolAnnotations;
use api_bridge_core::ToolDefinition;
use api_bridge_core::ToolSelector;
use api_bridge_core::arguments::KEY_ARGUMENTS;
use api_bridge_core::arguments::KEY_CONFIRM;
use api_bridge_core::arguments::KEY_QUERY;
use api_bridge_core::arguments::KEY_TOP_K;
use api_bridge_core::to_tool_name;
use serde_json::Value;
use serde_json::json;

use crate::context::CallerContext;
use crate::executor::HttpExecutor;
use crate::invocation_id::InvocationIdGenerator;
use crate::registry::ToolRegistry;
use crate::request;
use crate::result::ToolResult;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Seed name for the discovery meta-tool, before prefixing.
const DISCOVER_SEED: &str = "meta_discover_api_tools";

/// Seed name for the intent-invocation meta-tool, before prefixing.
const INVOKE_SEED: &str = "meta_invoke_api_by_intent";

/// Status recorded when the gate rejects an invocation.
const STATUS_REJECTED: u16 = 403;

/// Status recorded when execution fails before a response arrives.
const STATUS_EXECUTION_FAILED: u16 = 500;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Outcome of one registration pass, for host-side logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationSummary {
    /// Operations published as invocable tools.
    pub registered: usize,
    /// Operations withheld by the exposure gate or the master switch.
    pub skipped: usize,
    /// Generation number of the published snapshot.
    pub generation: u64,
}

/// Orchestrates registration and invocation for the bridge.
///
/// # Invariants
/// - Invocations only ever read published snapshots.
/// - Every invocation outcome is a [`ToolResult`], never a propagated error.
pub struct BridgeAdapter {
    /// Shared bridge configuration snapshot.
    config: Arc<BridgeConfig>,
    /// Operation-to-tool conversion.
    converter: SchemaConverter,
    /// Security gate applied before execution.
    policy: SecurityPolicy,
    /// Lexical tool ranking for the gateway.
    selector: ToolSelector,
    /// Response shaping for tool output.
    optimizer: ResponseOptimizer,
    /// Upstream HTTP execution.
    executor: HttpExecutor,
    /// Published tool generations.
    registry: ToolRegistry,
    /// Invocation identifier generation for audit pairing.
    ids: InvocationIdGenerator,
    /// Local listening port used when no base URL is configured.
    local_port: u16,
    /// Name of the discovery meta-tool after prefixing.
    discover_tool: String,
    /// Name of the intent-invocation meta-tool after prefixing.
    invoke_tool_name: String,
}

// ============================================================================
// SECTION: Construction
// ============================================================================

impl BridgeAdapter {
    /// Creates an adapter over the given configuration and security gate.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Http`] when the HTTP executor cannot be built.
    pub fn new(
        config: Arc<BridgeConfig>,
        policy: SecurityPolicy,
        local_port: u16,
    ) -> Result<Self, BridgeError> {
        let executor = HttpExecutor::new(&config)?;
        let discover_tool = to_tool_name(DISCOVER_SEED, &config.tool_name_prefix);
        let invoke_tool_name = to_tool_name(INVOKE_SEED, &config.tool_name_prefix);
        Ok(Self {
            converter: SchemaConverter::new(Arc::clone(&config)),
            optimizer: ResponseOptimizer::new(Arc::clone(&config)),
            selector: ToolSelector::new(),
            registry: ToolRegistry::new(),
            ids: InvocationIdGenerator::new(),
            config,
            policy,
            executor,
            local_port,
            discover_tool,
            invoke_tool_name,
        })
    }
}

// ============================================================================
// SECTION: Registration
// ============================================================================

impl BridgeAdapter {
    /// Publishes a new tool generation from the given operations.
    ///
    /// Operations withheld by the exposure gate are counted as skipped. The
    /// snapshot is built completely before the swap, so concurrent readers
    /// never observe a partial generation.
    pub fn register_operations(&self, operations: Vec<OperationRecord>) -> RegistrationSummary {
        if !self.config.enabled {
            let skipped = operations.len();
            let generation = self.registry.publish(BTreeMap::new(), Vec::new());
            self.selector.replace(&[]);
            return RegistrationSummary {
                registered: 0,
                skipped,
                generation,
            };
        }

        let total = operations.len();
        let exposed: Vec<OperationRecord> = operations
            .into_iter()
            .filter(|operation| self.policy.should_expose(operation))
            .collect();
        self.selector.replace(&exposed);

        let smart = &self.config.smart_context;
        let gateway_enabled = smart.enabled && smart.gateway_tool_enabled;
        let mut definitions: Vec<ToolDefinition> = Vec::new();
        if gateway_enabled {
            definitions.push(self.discover_definition());
            definitions.push(self.invoke_definition());
        }

        let mut operations_by_tool: BTreeMap<String, Arc<OperationRecord>> = BTreeMap::new();
        let mut registered = 0;
        for operation in exposed {
            if operations_by_tool.contains_key(&operation.tool_name)
                || operation.tool_name == self.discover_tool
                || operation.tool_name == self.invoke_tool_name
            {
                continue;
            }
            if !(smart.enabled && smart.gateway_only) {
                definitions.push(self.converter.convert(&operation));
            }
            registered += 1;
            operations_by_tool.insert(operation.tool_name.clone(), Arc::new(operation));
        }

        let generation = self.registry.publish(operations_by_tool, definitions);
        RegistrationSummary {
            registered,
            skipped: total - registered,
            generation,
        }
    }

    /// Lists the tool definitions of the current generation.
    #[must_use]
    pub fn tools(&self) -> Vec<ToolDefinition> {
        self.registry.snapshot().definitions.clone()
    }
}

// ============================================================================
// SECTION: Invocation
// ============================================================================

impl BridgeAdapter {
    /// Routes one tool invocation to its operation or meta-tool.
    ///
    /// The meta-tool names only dispatch while the gateway is enabled;
    /// otherwise they fall through to the unknown-tool error like any other
    /// unpublished name.
    #[must_use]
    pub fn invoke_tool(
        &self,
        name: &str,
        arguments: InvocationArguments,
        context: &CallerContext,
    ) -> ToolResult {
        let smart = &self.config.smart_context;
        if self.config.enabled && smart.enabled && smart.gateway_tool_enabled {
            if name == self.discover_tool {
                return self.discover(&arguments);
            }
            if name == self.invoke_tool_name {
                return self.invoke_by_intent(&arguments, context);
            }
        }
        let snapshot = self.registry.snapshot();
        let Some(operation) = snapshot.operations_by_tool.get(name) else {
            return ToolResult::error(format!("Unknown tool: {name}"));
        };
        self.invoke_operation(operation, &arguments, context)
    }

    /// Executes one operation invocation end to end.
    fn invoke_operation(
        &self,
        operation: &OperationRecord,
        arguments: &InvocationArguments,
        context: &CallerContext,
    ) -> ToolResult {
        let invocation_id = self.ids.issue();
        self.policy.audit_start(operation, &invocation_id, arguments.keys());

        if let Some(reason) = self.policy.validate_execution(operation, arguments) {
            self.policy.audit_end(operation, &invocation_id, false, STATUS_REJECTED);
            return ToolResult::error(reason);
        }

        let response = match self.execute_operation(operation, arguments, context) {
            Ok(response) => response,
            Err(error) => {
                self.policy.audit_end(
                    operation,
                    &invocation_id,
                    false,
                    STATUS_EXECUTION_FAILED,
                );
                return ToolResult::error(error.to_string());
            }
        };

        let optimized = self.optimizer.optimize(&response.body, arguments);
        let success = response.is_success();
        self.policy.audit_end(operation, &invocation_id, success, response.status);
        ToolResult {
            is_error: !success,
            text: format!("HTTP {}\n{}", response.status, optimized.text),
            structured_content: optimized.structured_content,
        }
    }

    /// Builds and sends the upstream request for one operation.
    fn execute_operation(
        &self,
        operation: &OperationRecord,
        arguments: &InvocationArguments,
        context: &CallerContext,
    ) -> Result<crate::executor::ExecutedResponse, BridgeError> {
        let base = request::resolve_base_url(&self.config.execution, self.local_port);
        let path = request::resolve_path(operation, arguments)?;
        let query = request::build_query(operation, arguments);
        let headers = request::build_headers(&self.config.execution, operation, arguments, context);
        let body = request::resolve_body(operation, arguments)?;
        self.executor.execute(
            operation.method,
            &format!("{base}{path}"),
            &query,
            &headers,
            body.as_ref(),
        )
    }
}

// ============================================================================
// SECTION: Gateway Meta-Tools
// ============================================================================

impl BridgeAdapter {
    /// Ranks registered tools against a free-text query.
    fn discover(&self, arguments: &InvocationArguments) -> ToolResult {
        let Some(query) = non_empty(arguments.get_str(KEY_QUERY)) else {
            return ToolResult::error("query is required");
        };
        let top_k =
            arguments.get_usize_or(KEY_TOP_K, self.config.smart_context.default_top_k).max(1);
        let ranked = self.selector.select(&query, top_k);
        let snapshot = self.registry.snapshot();
        let tools: Vec<Value> = ranked
            .iter()
            .filter_map(|candidate| {
                snapshot.operations_by_tool.get(&candidate.tool_name).map(|operation| {
                    json!({
                        "toolName": operation.tool_name,
                        "operationId": operation.operation_id,
                        "method": operation.method.as_str(),
                        "path": operation.path,
                        "description": operation.description,
                        "score": candidate.score,
                    })
                })
            })
            .collect();
        let payload = json!({
            "query": query,
            "count": tools.len(),
            "tools": tools,
        });
        let text = serde_json::to_string(&payload).unwrap_or_default();
        ToolResult::success(text, Some(payload))
    }

    /// Delegates an invocation to the best-matching tool.
    fn invoke_by_intent(
        &self,
        arguments: &InvocationArguments,
        context: &CallerContext,
    ) -> ToolResult {
        let Some(query) = non_empty(arguments.get_str(KEY_QUERY)) else {
            return ToolResult::error("query is required");
        };
        let ranked = self.selector.select(&query, 1);
        let Some(best) = ranked.first() else {
            return ToolResult::error(format!("No matching tool found for query: {query}"));
        };
        if best.score < self.config.smart_context.min_score {
            return ToolResult::error(format!(
                "No sufficiently relevant tool for query: {query} (best score {:.3})",
                best.score
            ));
        }

        let mut delegated =
            arguments.nested_arguments().unwrap_or_else(InvocationArguments::new);
        if !delegated.contains(KEY_CONFIRM)
            && let Some(confirmation) = arguments.get(KEY_CONFIRM)
        {
            delegated.insert(KEY_CONFIRM, confirmation.clone());
        }

        let snapshot = self.registry.snapshot();
        let Some(operation) = snapshot.operations_by_tool.get(&best.tool_name) else {
            return ToolResult::error(format!("Unknown tool: {}", best.tool_name));
        };
        let inner = self.invoke_operation(operation, &delegated, context);
        let wrapper = json!({
            "selectedTool": best.tool_name,
            "score": best.score,
            "result": {
                "isError": inner.is_error,
                "text": inner.text,
                "structuredContent": inner.structured_content,
            },
        });
        ToolResult {
            is_error: inner.is_error,
            text: format!("Selected tool: {}\n{}", best.tool_name, inner.text),
            structured_content: Some(wrapper),
        }
    }

    /// Builds the discovery meta-tool definition.
    fn discover_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.discover_tool.clone(),
            title: "Discover API tools".to_string(),
            description: "Rank available API tools against a natural-language query".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    KEY_QUERY: {
                        "type": "string",
                        "description": "Natural-language description of the needed operation",
                    },
                    KEY_TOP_K: {
                        "type": "integer",
                        "description": "Maximum number of ranked tools to return",
                    },
                },
                "required": [KEY_QUERY],
                "additionalProperties": false,
            }),
            annotations: meta_annotations("Discover API tools", true),
        }
    }

    /// Builds the intent-invocation meta-tool definition.
    fn invoke_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.invoke_tool_name.clone(),
            title: "Invoke API by intent".to_string(),
            description: "Select the best-matching API tool for a query and invoke it"
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    KEY_QUERY: {
                        "type": "string",
                        "description": "Natural-language description of the needed operation",
                    },
                    KEY_ARGUMENTS: {
                        "type": "object",
                        "additionalProperties": true,
                        "description": "Arguments forwarded to the selected tool",
                    },
                    KEY_CONFIRM: {
                        "type": "string",
                        "description": "Confirmation token forwarded to risky operations",
                    },
                },
                "required": [KEY_QUERY],
                "additionalProperties": false,
            }),
            annotations: meta_annotations("Invoke API by intent", false),
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the trimmed string when it is non-empty.
fn non_empty(value: Option<String>) -> Option<String> {
    value.and_then(|text| {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Builds annotations for a gateway meta-tool.
fn meta_annotations(title: &str, read_only: bool) -> ToolAnnotations {
    ToolAnnotations {
        title: title.to_string(),
        read_only_hint: read_only,
        destructive_hint: false,
        idempotent_hint: read_only,
        open_world_hint: false,
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
