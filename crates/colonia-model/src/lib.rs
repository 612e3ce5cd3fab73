//! Game-state model for Colonia.
//!
//! This crate owns the authoritative game-state graph that every protocol
//! message refers to:
//!
//! - **Identifiers** ([`Id`]): opaque strings with a phantom kind, so an
//!   `Id<Unit>` can never be passed where an `Id<Colony>` is expected.
//! - **Objects** ([`Unit`], [`Colony`], [`Tile`], [`Settlement`], ...):
//!   the things players act on.
//! - **Rules** ([`Specification`]): static lookup tables for goods types,
//!   roles, unit types and building types.
//! - **Resolution** ([`Game::resolve`], [`Game::resolve_ours`]): turning an
//!   untrusted identifier string into a live, typed object.
//! - **Movement** ([`MoveType`]): what kind of move a unit would make
//!   into a neighbouring tile.
//!
//! # How it fits in the stack
//!
//! ```text
//! Server (above)    ← locks the Game, runs controllers that mutate it
//!     ↕
//! Protocol          ← resolves message identifiers against the Game
//!     ↕
//! Model (this crate)
//! ```

mod direction;
mod error;
mod game;
mod id;
mod movement;
mod object;
mod spec;

pub use direction::{Direction, ParseDirectionError};
pub use error::ResolveError;
pub use game::Game;
pub use id::Id;
pub use movement::MoveType;
pub use object::{
    Building, Colony, GameObject, GameObjectKind, Location, ObjectKind,
    Owned, Player, Settlement, Tile, TradeRoute, Unit, UnitLayout,
};
pub use spec::{BuildingType, GoodsType, Role, Specification, UnitType};
