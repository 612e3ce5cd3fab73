//! Wire protocol for Colonia.
//!
//! This crate defines the "language" that game clients and the
//! authoritative server speak:
//!
//! - **Elements** ([`Element`]): the flat attribute tree every message is
//!   encoded as (a tag plus ordered string attributes).
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how elements are turned
//!   into bytes for the transport.
//! - **Messages** ([`Message`] and one struct per request kind): typed
//!   player intents, each owning its wire encoding and its validation.
//! - **Requests** ([`Request`]): what a message becomes once every
//!   identifier in it has been resolved and checked against the game.
//! - **Errors** ([`ProtocolError`] for malformed input, [`ClientError`] for
//!   requests the server refuses).
//!
//! # Message lifecycle
//!
//! ```text
//! Constructed ──encode──→ Element ──decode──→ Decoded (raw ids)
//!                                                │
//!                                            validate(&Game)
//!                                          ┌─────┴─────┐
//!                                          ▼           ▼
//!                                  Request (typed)  ClientError
//!                                          │
//!                                   controller.handle → Update
//! ```
//!
//! Validation only reads the game, so it can be repeated and always gives
//! the same verdict for the same state. Mutation happens later, in the
//! server's controller.

mod codec;
mod element;
mod error;
mod message;

#[cfg(any(test, feature = "test-support"))]
pub mod fixtures;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use element::{ARRAY_SIZE_KEY, Element};
pub use error::ProtocolError;
pub use message::{
    Arrangement, AskSkillMessage, AskSkillRequest, Change, ClientError,
    DeleteTradeRouteMessage, DeleteTradeRouteRequest, DisembarkMessage,
    DisembarkRequest, Message, MoveMessage, MoveRequest,
    RearrangeColonyMessage, RearrangeColonyRequest, Request,
    ResolvedArrangement, Update,
};
