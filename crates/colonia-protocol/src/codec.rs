//! Codec trait and implementations for turning elements into bytes.
//!
//! A "codec" (coder/decoder) sits between the transport, which only moves
//! whole byte messages, and the rest of the protocol, which only deals in
//! [`Element`]s. Swapping the codec changes the byte format without touching
//! any message or validator.

use crate::{Element, ProtocolError};

/// Converts elements to bytes and back.
///
/// `Send + Sync + 'static` because the server shares one codec across all
/// connection tasks.
pub trait Codec: Send + Sync + 'static {
    /// Serializes an element into bytes.
    ///
    /// # Errors
    /// Returns an encode error if the element cannot be represented in this
    /// format.
    fn encode(&self, element: &Element) -> Result<Vec<u8>, ProtocolError>;

    /// Parses bytes back into an element.
    ///
    /// # Errors
    /// Returns a decode error for malformed bytes and
    /// [`ProtocolError::InvalidMessage`] for an element without a tag.
    fn decode(&self, data: &[u8]) -> Result<Element, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// An element becomes `{"tag": "...", "attributes": [["k", "v"], ...]}`.
/// Attributes stay a list of pairs rather than a JSON object so their order
/// survives the round trip.
///
/// ## Example
///
/// ```rust
/// use colonia_protocol::{Codec, Element, JsonCodec};
///
/// let codec = JsonCodec;
/// let element = Element::new("disembark").with("unit", "unit:4");
///
/// let bytes = codec.encode(&element).unwrap();
/// let decoded = codec.decode(&bytes).unwrap();
/// assert_eq!(element, decoded);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode(&self, element: &Element) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(element).map_err(ProtocolError::Encode)
    }

    fn decode(&self, data: &[u8]) -> Result<Element, ProtocolError> {
        let element: Element =
            serde_json::from_slice(data).map_err(ProtocolError::Decode)?;
        if element.tag().is_empty() {
            return Err(ProtocolError::InvalidMessage("missing tag".into()));
        }
        Ok(element)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_preserves_attribute_order() {
        let element = Element::new("rearrangeColony")
            .with("colony", "colony:1")
            .with("xLength", "0");
        let bytes = JsonCodec.encode(&element).unwrap();
        assert_eq!(JsonCodec.decode(&bytes).unwrap(), element);
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let a = Element::new("move").with("unit", "unit:1").with("direction", "N");
        let b = a.clone();
        assert_eq!(JsonCodec.encode(&a).unwrap(), JsonCodec.encode(&b).unwrap());
    }

    #[test]
    fn test_missing_attributes_default_to_empty() {
        let element = JsonCodec.decode(br#"{"tag": "disembark"}"#).unwrap();
        assert!(element.is_empty());
    }

    #[test]
    fn test_garbage_is_a_decode_error() {
        let err = JsonCodec.decode(b"not json").unwrap_err();
        assert!(matches!(err, ProtocolError::Decode(_)));
    }

    #[test]
    fn test_empty_tag_is_invalid() {
        let err = JsonCodec.decode(br#"{"tag": ""}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidMessage(_)));
    }
}
