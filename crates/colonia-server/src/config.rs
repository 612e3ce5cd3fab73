//! Server configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ServerError;

/// Settings for a server instance.
///
/// Every field has a default, so a config file only needs the values it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Filter used by [`init_tracing`](crate::init_tracing) when `RUST_LOG`
    /// is not set.
    pub log_filter: String,

    /// Largest `rearrangeColony` batch the server will look at.
    pub max_arrangements: usize,

    /// How long a connection may stay silent before it is dropped.
    pub recv_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            max_arrangements: 64,
            recv_timeout: Duration::from_secs(15),
        }
    }
}

impl ServerConfig {
    /// Parses a configuration from JSON.
    ///
    /// # Errors
    /// [`ServerError::Config`] if the JSON is malformed or a field has the
    /// wrong type.
    pub fn from_json(json: &str) -> Result<Self, ServerError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.max_arrangements, 64);
        assert_eq!(config.recv_timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_partial_json_keeps_other_defaults() {
        let config = ServerConfig::from_json(r#"{"max_arrangements": 8}"#).unwrap();
        assert_eq!(config.max_arrangements, 8);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_timeout_from_json() {
        let config =
            ServerConfig::from_json(r#"{"recv_timeout": {"secs": 2, "nanos": 0}}"#).unwrap();
        assert_eq!(config.recv_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_bad_json() {
        let err = ServerConfig::from_json(r#"{"max_arrangements": "many"}"#).unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }
}
