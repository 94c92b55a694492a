//! Configuration loading and resolution.

use std::time::Duration;

use mcp_envelope::AllowList;

use crate::types::{GatewayError, GatewayResult};

/// Default simulated latency of the mock integrations.
const DEFAULT_SIMULATED_LATENCY_MS: u64 = 100;

pub const ENV_ALLOWED_OPERATIONS: &str = "MCP_ALLOWED_OPERATIONS";
pub const ENV_AUTH_ENABLED: &str = "MCP_AUTH_ENABLED";
pub const ENV_SIMULATED_LATENCY_MS: &str = "MCP_SIMULATED_LATENCY_MS";
pub const ENV_OPERATION_TIMEOUT_SECS: &str = "MCP_OPERATION_TIMEOUT_SECS";

/// Gateway configuration, resolved once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Filters what `list_operations` advertises. Invocation is unaffected.
    pub allowed_operations: AllowList,
    /// Provisioned by deployments but not enforced by the dispatcher.
    pub auth_enabled: bool,
    pub simulated_latency: Duration,
    /// Upper bound on a single operation call. `None` waits indefinitely.
    pub operation_timeout: Option<Duration>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            allowed_operations: AllowList::Unrestricted,
            auth_enabled: false,
            simulated_latency: Duration::from_millis(DEFAULT_SIMULATED_LATENCY_MS),
            operation_timeout: None,
        }
    }
}

impl GatewayConfig {
    /// Load configuration from the process environment.
    ///
    /// - `MCP_ALLOWED_OPERATIONS` (optional): comma-separated names shown by `list_operations`
    /// - `MCP_AUTH_ENABLED` (optional, default false): recorded, not enforced
    /// - `MCP_SIMULATED_LATENCY_MS` (optional, default 100): delay of the mock integrations
    /// - `MCP_OPERATION_TIMEOUT_SECS` (optional): per-call timeout
    pub fn from_env() -> GatewayResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> GatewayResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let allowed_operations = AllowList::parse(lookup(ENV_ALLOWED_OPERATIONS).as_deref());

        let auth_enabled = match lookup(ENV_AUTH_ENABLED) {
            Some(raw) => parse_flag(ENV_AUTH_ENABLED, &raw)?,
            None => false,
        };

        let simulated_latency = match lookup(ENV_SIMULATED_LATENCY_MS) {
            Some(raw) => Duration::from_millis(parse_u64(ENV_SIMULATED_LATENCY_MS, &raw)?),
            None => Duration::from_millis(DEFAULT_SIMULATED_LATENCY_MS),
        };

        let operation_timeout = match lookup(ENV_OPERATION_TIMEOUT_SECS) {
            Some(raw) => match parse_u64(ENV_OPERATION_TIMEOUT_SECS, &raw)? {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
            None => None,
        };

        Ok(Self {
            allowed_operations,
            auth_enabled,
            simulated_latency,
            operation_timeout,
        })
    }

    pub fn with_allowed_operations(mut self, raw: &str) -> Self {
        self.allowed_operations = AllowList::parse(Some(raw));
        self
    }

    pub fn with_simulated_latency(mut self, latency: Duration) -> Self {
        self.simulated_latency = latency;
        self
    }

    pub fn with_operation_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.operation_timeout = timeout;
        self
    }
}

fn parse_u64(key: &str, raw: &str) -> GatewayResult<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| GatewayError::Config(format!("{key} must be a non-negative integer, got '{raw}'")))
}

fn parse_flag(key: &str, raw: &str) -> GatewayResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(GatewayError::Config(format!(
            "{key} must be a boolean, got '{raw}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::from_lookup(lookup(&[])).unwrap();
        assert!(config.allowed_operations.is_unrestricted());
        assert!(!config.auth_enabled);
        assert_eq!(config.simulated_latency, Duration::from_millis(100));
        assert!(config.operation_timeout.is_none());
    }

    #[test]
    fn test_reads_all_keys() {
        let config = GatewayConfig::from_lookup(lookup(&[
            ("MCP_ALLOWED_OPERATIONS", "getBusinessData,list_operations"),
            ("MCP_AUTH_ENABLED", "true"),
            ("MCP_SIMULATED_LATENCY_MS", "0"),
            ("MCP_OPERATION_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert!(config.allowed_operations.permits("getBusinessData"));
        assert!(!config.allowed_operations.permits("callInternalApi"));
        assert!(config.auth_enabled);
        assert_eq!(config.simulated_latency, Duration::ZERO);
        assert_eq!(config.operation_timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_zero_timeout_disables() {
        let config =
            GatewayConfig::from_lookup(lookup(&[("MCP_OPERATION_TIMEOUT_SECS", "0")])).unwrap();
        assert!(config.operation_timeout.is_none());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = GatewayConfig::from_lookup(lookup(&[("MCP_SIMULATED_LATENCY_MS", "fast")]))
            .unwrap_err();
        assert_eq!(err.code(), "config");

        assert!(GatewayConfig::from_lookup(lookup(&[("MCP_AUTH_ENABLED", "maybe")])).is_err());
    }
}
