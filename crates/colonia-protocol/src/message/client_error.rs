//! The rejection every validator produces.

use std::fmt;

use colonia_model::{Id, Player, ResolveError};

use crate::Element;

/// A request the server refused, with a reason the player can read.
///
/// This is a normal response, not a failure of the server: validators
/// return it as the `Err` side of their `Result`, the dispatcher encodes it
/// as an `error` element, and the connection carries on. Once built it is
/// never modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientError {
    message: String,
    player: Id<Player>,
}

impl ClientError {
    pub const TAG: &'static str = "error";
    const MESSAGE: &'static str = "message";
    const PLAYER: &'static str = "player";

    pub fn new(player: &Id<Player>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            player: player.clone(),
        }
    }

    /// A failure to resolve the identifier in `field`.
    pub fn resolution(player: &Id<Player>, field: &str, err: ResolveError) -> Self {
        Self::new(player, format!("Invalid {field}: {err}"))
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The player the request came from.
    pub fn player(&self) -> &Id<Player> {
        &self.player
    }

    pub fn from_element(element: &Element) -> Self {
        Self {
            message: element.string(Self::MESSAGE),
            player: Id::new(element.string(Self::PLAYER)),
        }
    }

    pub fn to_element(&self) -> Element {
        Element::new(Self::TAG)
            .with(Self::MESSAGE, self.message.as_str())
            .with(Self::PLAYER, self.player.as_str())
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_names_field_and_id() {
        let err = ClientError::resolution(
            &Id::new("player:1"),
            "unit",
            ResolveError::NotFound("unit:42".into()),
        );
        assert_eq!(err.message(), "Invalid unit: no object with id unit:42");
    }

    #[test]
    fn test_element_shape() {
        let err = ClientError::new(&Id::new("player:2"), "Empty rearrangement list.");
        let e = err.to_element();
        assert_eq!(e.tag(), "error");
        assert_eq!(e.get("message"), Some("Empty rearrangement list."));
        assert_eq!(e.get("player"), Some("player:2"));
        assert_eq!(ClientError::from_element(&e), err);
    }
}
