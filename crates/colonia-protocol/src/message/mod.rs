//! Typed player intents and their validation.
//!
//! Every request kind lives in its own module and follows the same shape:
//!
//! - a `*Message` struct holding the raw, untrusted identifiers exactly as
//!   they arrived, with `from_element` / `to_element` for the wire;
//! - a `validate` method that resolves those identifiers against a
//!   read-only [`Game`] and returns either a `*Request` of typed handles or
//!   a [`ClientError`];
//! - the `*Request` struct itself, which can only be built by `validate`.
//!
//! [`Message`] ties the kinds together behind a single tag-driven decoder.

mod ask_skill;
mod client_error;
mod delete_trade_route;
mod disembark;
mod move_unit;
mod rearrange_colony;
mod update;

pub use ask_skill::{AskSkillMessage, AskSkillRequest};
pub use client_error::ClientError;
pub use delete_trade_route::{DeleteTradeRouteMessage, DeleteTradeRouteRequest};
pub use disembark::{DisembarkMessage, DisembarkRequest};
pub use move_unit::{MoveMessage, MoveRequest};
pub use rearrange_colony::{
    Arrangement, RearrangeColonyMessage, RearrangeColonyRequest, ResolvedArrangement,
};
pub use update::{Change, Update};

use colonia_model::{Direction, Game, Id, ParseDirectionError, Player, Tile, Unit};

use crate::{Element, ProtocolError};

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// Every message the protocol knows, client requests and server responses
/// alike.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    AskSkill(AskSkillMessage),
    DeleteTradeRoute(DeleteTradeRouteMessage),
    Disembark(DisembarkMessage),
    Move(MoveMessage),
    RearrangeColony(RearrangeColonyMessage),
    Update(Update),
    Error(ClientError),
}

type Decoder = fn(&Element) -> Message;

/// Tag → decoder table. Adding a message kind means adding one row here.
const DECODERS: &[(&str, Decoder)] = &[
    (AskSkillMessage::TAG, decode_ask_skill),
    (DeleteTradeRouteMessage::TAG, decode_delete_trade_route),
    (DisembarkMessage::TAG, decode_disembark),
    (MoveMessage::TAG, decode_move),
    (RearrangeColonyMessage::TAG, decode_rearrange_colony),
    (Update::TAG, decode_update),
    (ClientError::TAG, decode_error),
];

fn decode_ask_skill(element: &Element) -> Message {
    Message::AskSkill(AskSkillMessage::from_element(element))
}

fn decode_delete_trade_route(element: &Element) -> Message {
    Message::DeleteTradeRoute(DeleteTradeRouteMessage::from_element(element))
}

fn decode_disembark(element: &Element) -> Message {
    Message::Disembark(DisembarkMessage::from_element(element))
}

fn decode_move(element: &Element) -> Message {
    Message::Move(MoveMessage::from_element(element))
}

fn decode_rearrange_colony(element: &Element) -> Message {
    Message::RearrangeColony(RearrangeColonyMessage::from_element(element))
}

fn decode_update(element: &Element) -> Message {
    Message::Update(Update::from_element(element))
}

fn decode_error(element: &Element) -> Message {
    Message::Error(ClientError::from_element(element))
}

impl Message {
    /// Decodes an element by looking its tag up in the registry.
    ///
    /// # Errors
    /// [`ProtocolError::UnknownTag`] if no message kind has this tag. A
    /// known tag always decodes; missing or malformed attributes surface
    /// later, during validation.
    pub fn from_element(element: &Element) -> Result<Self, ProtocolError> {
        DECODERS
            .iter()
            .find(|(tag, _)| *tag == element.tag())
            .map(|(_, decode)| decode(element))
            .ok_or_else(|| ProtocolError::UnknownTag(element.tag().to_string()))
    }

    pub fn to_element(&self) -> Element {
        match self {
            Self::AskSkill(m) => m.to_element(),
            Self::DeleteTradeRoute(m) => m.to_element(),
            Self::Disembark(m) => m.to_element(),
            Self::Move(m) => m.to_element(),
            Self::RearrangeColony(m) => m.to_element(),
            Self::Update(m) => m.to_element(),
            Self::Error(m) => m.to_element(),
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::AskSkill(_) => AskSkillMessage::TAG,
            Self::DeleteTradeRoute(_) => DeleteTradeRouteMessage::TAG,
            Self::Disembark(_) => DisembarkMessage::TAG,
            Self::Move(_) => MoveMessage::TAG,
            Self::RearrangeColony(_) => RearrangeColonyMessage::TAG,
            Self::Update(_) => Update::TAG,
            Self::Error(_) => ClientError::TAG,
        }
    }

    /// All registered tags, in registry order.
    pub fn tags() -> impl Iterator<Item = &'static str> {
        DECODERS.iter().map(|(tag, _)| *tag)
    }

    /// Whether a client may send this message.
    pub fn is_request(&self) -> bool {
        !matches!(self, Self::Update(_) | Self::Error(_))
    }

    /// Validates a client request on behalf of `player`.
    ///
    /// Server responses (`update`, `error`) are never valid requests.
    ///
    /// # Errors
    /// The [`ClientError`] produced by the variant's own validator.
    pub fn validate(&self, game: &Game, player: &Id<Player>) -> Result<Request, ClientError> {
        match self {
            Self::AskSkill(m) => m.validate(game, player).map(Request::AskSkill),
            Self::DeleteTradeRoute(m) => {
                m.validate(game, player).map(Request::DeleteTradeRoute)
            }
            Self::Disembark(m) => m.validate(game, player).map(Request::Disembark),
            Self::Move(m) => m.validate(game, player).map(Request::Move),
            Self::RearrangeColony(m) => {
                m.validate(game, player).map(Request::RearrangeColony)
            }
            Self::Update(_) | Self::Error(_) => Err(ClientError::new(
                player,
                format!("Unexpected message: {}", self.tag()),
            )),
        }
    }
}

macro_rules! impl_from_message {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Message {
                fn from(m: $ty) -> Self {
                    Self::$variant(m)
                }
            }
        )*
    };
}

impl_from_message!(
    AskSkill(AskSkillMessage),
    DeleteTradeRoute(DeleteTradeRouteMessage),
    Disembark(DisembarkMessage),
    Move(MoveMessage),
    RearrangeColony(RearrangeColonyMessage),
    Update(Update),
    Error(ClientError),
);

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// A validated request, ready for the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    AskSkill(AskSkillRequest),
    DeleteTradeRoute(DeleteTradeRouteRequest),
    Disembark(DisembarkRequest),
    Move(MoveRequest),
    RearrangeColony(RearrangeColonyRequest),
}

impl Request {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::AskSkill(_) => AskSkillMessage::TAG,
            Self::DeleteTradeRoute(_) => DeleteTradeRouteMessage::TAG,
            Self::Disembark(_) => DisembarkMessage::TAG,
            Self::Move(_) => MoveMessage::TAG,
            Self::RearrangeColony(_) => RearrangeColonyMessage::TAG,
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers shared by the unit-and-direction validators
// ---------------------------------------------------------------------------

fn parse_direction(player: &Id<Player>, raw: &str) -> Result<Direction, ClientError> {
    raw.parse()
        .map_err(|e: ParseDirectionError| ClientError::new(player, e.to_string()))
}

/// The tile the unit stands on, or is carried over.
fn unit_tile<'g>(
    game: &'g Game,
    player: &Id<Player>,
    unit: &Unit,
) -> Result<&'g Tile, ClientError> {
    game.tile_of(&unit.location)
        .ok_or_else(|| ClientError::new(player, format!("Unit {} is not on the map", unit.id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::World;

    #[test]
    fn test_every_registered_tag_decodes_to_its_own_variant() {
        for tag in Message::tags() {
            let message = Message::from_element(&Element::new(tag)).unwrap();
            assert_eq!(message.tag(), tag);
        }
    }

    #[test]
    fn test_unknown_tag_is_rejected() {
        let err = Message::from_element(&Element::new("declareIndependence")).unwrap_err();
        assert!(matches!(err, ProtocolError::UnknownTag(t) if t == "declareIndependence"));
    }

    #[test]
    fn test_responses_are_not_requests() {
        let w = World::new();
        let update = Message::from(Update::default());
        assert!(!update.is_request());
        let err = update.validate(&w.game, &w.dutch).unwrap_err();
        assert_eq!(err.message(), "Unexpected message: update");
        assert_eq!(err.player(), &w.dutch);
    }

    #[test]
    fn test_validate_routes_to_variant() {
        let w = World::new();
        let message = Message::from(DisembarkMessage::new(w.unit(&w.passenger)));
        let request = message.validate(&w.game, &w.dutch).unwrap();
        assert_eq!(request.tag(), "disembark");
    }

    #[test]
    fn test_bad_direction_message() {
        let err = parse_direction(&Id::new("player:1"), "UP").unwrap_err();
        assert_eq!(err.message(), "Invalid direction: UP");
    }
}
