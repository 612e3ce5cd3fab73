//! Error types for the protocol layer.
//!
//! Each crate in Colonia defines its own error enum. A `ProtocolError`
//! means the bytes or the element could not be understood at all: a
//! problem with the message's *shape*. A request that is well-formed but
//! refers to the wrong objects is not an error here; it becomes a
//! [`ClientError`](crate::ClientError) response instead.

/// Errors that can occur while encoding or decoding wire messages.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning an element into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into an element).
    ///
    /// Common causes: malformed JSON, a missing `tag`, or attributes that
    /// are not string pairs.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The element's tag does not name any known message.
    #[error("unknown message tag: {0}")]
    UnknownTag(String),

    /// The element is structurally invalid, e.g. it has an empty tag.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
