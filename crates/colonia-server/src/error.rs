//! Unified error type for the server.

use colonia_protocol::ProtocolError;

use crate::ConnectionError;

/// Top-level error wrapping everything that can stop a connection or the
/// server.
///
/// Rejected requests and controller failures never show up here: they are
/// answered with a [`ClientError`](colonia_protocol::ClientError) element
/// and the connection carries on. The `#[from]` attributes let `?` convert the
/// per-layer errors.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Encoding a response failed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Sending or receiving failed.
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// The configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// A global tracing subscriber was already installed.
    #[error("could not install tracing subscriber: {0}")]
    Logging(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_protocol_error() {
        let err: ServerError = ProtocolError::UnknownTag("foo".into()).into();
        assert!(matches!(err, ServerError::Protocol(_)));
        assert_eq!(err.to_string(), "unknown message tag: foo");
    }

    #[test]
    fn test_from_connection_error() {
        let err: ServerError = ConnectionError::Closed("peer went away".into()).into();
        assert!(matches!(err, ServerError::Connection(_)));
        assert!(err.to_string().contains("peer went away"));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: ServerError = json_err.into();
        assert!(err.to_string().starts_with("invalid configuration"));
    }
}
