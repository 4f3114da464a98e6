// crates/api-bridge-mcp/src/executor.rs
// ============================================================================
// Module: HTTP Execution
// Description: Bounded upstream HTTP execution for tool invocations.
// Purpose: Issue one request per invocation with configured timeouts.
// Dependencies: api-bridge-config, api-bridge-core, reqwest, serde_json
// ============================================================================

//! ## Overview
//! Wraps a blocking HTTP client configured with the bridge's connect and
//! read timeouts. Exactly one request per invocation, no retries, and no
//! redirect surprises beyond the client defaults. A non-2xx status is a
//! normal response for the caller to inspect; only transport failures
//! surface as errors.
//! Security posture: the target URL is built from validated operation
//! templates and encoded arguments; see `Docs/security/threat_model.md`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use api_bridge_config::BridgeConfig;
use api_bridge_core::BridgeError;
use api_bridge_core::HttpMethod;
use reqwest::Method;
use reqwest::blocking::Client;
use serde_json::Value;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Header name for content negotiation.
const HEADER_ACCEPT: &str = "Accept";

/// Accept value sent when the caller supplies none.
const DEFAULT_ACCEPT: &str = "application/json, */*";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Upstream response captured for optimization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutedResponse {
    /// HTTP status code returned by the upstream API.
    pub status: u16,
    /// Raw response body text.
    pub body: String,
}

impl ExecutedResponse {
    /// Returns true when the status is in the 2xx range.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Blocking HTTP executor for bridged invocations.
///
/// # Invariants
/// - The client timeouts come from the execution configuration.
/// - Exactly one request is issued per `execute` call.
#[derive(Debug, Clone)]
pub struct HttpExecutor {
    /// Blocking HTTP client shared across invocations.
    client: Client,
}

// ============================================================================
// SECTION: Executor
// ============================================================================

impl HttpExecutor {
    /// Creates an executor with timeouts from the execution configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Http`] when the HTTP client cannot be built.
    pub fn new(config: &Arc<BridgeConfig>) -> Result<Self, BridgeError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_millis(config.execution.connect_timeout_ms))
            .timeout(Duration::from_millis(config.execution.read_timeout_ms))
            .build()
            .map_err(|error| BridgeError::Http(error.to_string()))?;
        Ok(Self {
            client,
        })
    }

    /// Executes one upstream request and captures the response.
    ///
    /// An `Accept: application/json, */*` header is sent unless the caller
    /// already set one.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidTargetUrl`] for an unparseable target
    /// and [`BridgeError::Http`] for transport failures. A non-2xx status is
    /// not an error.
    pub fn execute(
        &self,
        method: HttpMethod,
        url: &str,
        query: &[(String, String)],
        headers: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<ExecutedResponse, BridgeError> {
        let method = Method::from_bytes(method.as_str().as_bytes())
            .map_err(|error| BridgeError::Http(error.to_string()))?;
        let mut request = self.client.request(method, url).query(query);
        if !headers.iter().any(|(name, _)| name.eq_ignore_ascii_case(HEADER_ACCEPT)) {
            request = request.header(HEADER_ACCEPT, DEFAULT_ACCEPT);
        }
        for (name, value) in headers {
            request = request.header(name, value);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().map_err(|error| {
            if error.is_builder() {
                BridgeError::InvalidTargetUrl(url.to_string())
            } else {
                BridgeError::Http(error.to_string())
            }
        })?;
        let status = response.status().as_u16();
        let body = response.text().map_err(|error| BridgeError::Http(error.to_string()))?;
        Ok(ExecutedResponse {
            status,
            body,
        })
    }
}
