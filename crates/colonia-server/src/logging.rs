//! Tracing setup.

use tracing_subscriber::EnvFilter;

use crate::ServerError;

/// Installs a global fmt subscriber.
///
/// `RUST_LOG` wins when it is set; otherwise `filter` (usually
/// [`ServerConfig::log_filter`](crate::ServerConfig::log_filter)) is used.
///
/// # Errors
/// [`ServerError::Logging`] if a global subscriber is already installed.
pub fn init_tracing(filter: &str) -> Result<(), ServerError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init()
        .map_err(|e| ServerError::Logging(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_install_fails_cleanly() {
        // Another test may have won the race for the first install.
        let _ = init_tracing("debug");
        let err = init_tracing("debug").unwrap_err();
        assert!(matches!(err, ServerError::Logging(_)));
    }
}
