//! Game objects and the closed set of kinds the resolver knows about.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{BuildingType, GoodsType, Id, Role, UnitType};

// ---------------------------------------------------------------------------
// Object kinds
// ---------------------------------------------------------------------------

/// The kind of a stored game object.
///
/// Every identifier in the game names exactly one object of exactly one
/// kind. When a message field expects a unit but the id names a colony, the
/// resolver reports both kinds so the client error is specific.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Player,
    Unit,
    Colony,
    Building,
    Tile,
    Settlement,
    TradeRoute,
}

impl ObjectKind {
    /// Prefix used when the game mints a new identifier, e.g. `"unit:12"`.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Unit => "unit",
            Self::Colony => "colony",
            Self::Building => "building",
            Self::Tile => "tile",
            Self::Settlement => "settlement",
            Self::TradeRoute => "tradeRoute",
        }
    }

    /// Human-readable name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Unit => "unit",
            Self::Colony => "colony",
            Self::Building => "building",
            Self::Tile => "tile",
            Self::Settlement => "native settlement",
            Self::TradeRoute => "trade route",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Objects
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: Id<Player>,
    pub name: String,
}

/// Where a unit is.
///
/// A unit is either standing on a map tile (which includes working a
/// colony's surrounding tiles), working inside a colony building, or being
/// carried aboard another unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Location {
    Tile(Id<Tile>),
    Building(Id<Building>),
    Carrier(Id<Unit>),
}

impl Location {
    /// The raw identifier of the object this location refers to.
    pub fn id_str(&self) -> &str {
        match self {
            Self::Tile(id) => id.as_str(),
            Self::Building(id) => id.as_str(),
            Self::Carrier(id) => id.as_str(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: Id<Unit>,
    pub owner: Id<Player>,
    pub unit_type: Id<UnitType>,
    pub location: Location,
    /// The goods the unit is producing, if it works in a colony.
    pub work: Option<Id<GoodsType>>,
    pub role: Id<Role>,
    pub role_count: u32,
    pub moves_left: u32,
}

impl Unit {
    /// A snapshot of the parts of the unit a colony rearrangement can change.
    pub fn layout(&self) -> UnitLayout {
        UnitLayout {
            unit: self.id.clone(),
            location: self.location.clone(),
            work: self.work.clone(),
            role: self.role.clone(),
            role_count: self.role_count,
        }
    }
}

/// Placement of one unit within a colony layout.
///
/// The client edits a scratch copy of its colony; comparing the scratch
/// layout with each unit's current [`Unit::layout`] tells it which units
/// actually changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitLayout {
    pub unit: Id<Unit>,
    pub location: Location,
    pub work: Option<Id<GoodsType>>,
    pub role: Id<Role>,
    pub role_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Colony {
    pub id: Id<Colony>,
    pub name: String,
    pub owner: Id<Player>,
    pub tile: Id<Tile>,
    pub buildings: Vec<Id<Building>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    pub id: Id<Building>,
    pub colony: Id<Colony>,
    pub building_type: Id<BuildingType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub id: Id<Tile>,
    pub x: u32,
    pub y: u32,
    pub land: bool,
    /// The colony built on this tile.
    pub colony: Option<Id<Colony>>,
    /// The native settlement built on this tile.
    pub settlement: Option<Id<Settlement>>,
    /// The colony whose workers may use this tile.
    pub owning_colony: Option<Id<Colony>>,
}

/// A native settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub id: Id<Settlement>,
    pub name: String,
    pub owner: Id<Player>,
    pub tile: Id<Tile>,
    /// The skill taught here, if any is left to teach.
    pub skill: Option<Id<UnitType>>,
    /// Players that have already been told which skill is taught here.
    pub skill_told: Vec<Id<Player>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRoute {
    pub id: Id<TradeRoute>,
    pub name: String,
    pub owner: Id<Player>,
}

// ---------------------------------------------------------------------------
// Storage enum and the kind trait
// ---------------------------------------------------------------------------

/// Any object stored in the game graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameObject {
    Player(Player),
    Unit(Unit),
    Colony(Colony),
    Building(Building),
    Tile(Tile),
    Settlement(Settlement),
    TradeRoute(TradeRoute),
}

impl GameObject {
    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::Player(_) => ObjectKind::Player,
            Self::Unit(_) => ObjectKind::Unit,
            Self::Colony(_) => ObjectKind::Colony,
            Self::Building(_) => ObjectKind::Building,
            Self::Tile(_) => ObjectKind::Tile,
            Self::Settlement(_) => ObjectKind::Settlement,
            Self::TradeRoute(_) => ObjectKind::TradeRoute,
        }
    }
}

/// A concrete object type that can be looked up in the game by id.
///
/// [`Game::resolve`](crate::Game::resolve) is generic over this trait, so a
/// caller writes `game.resolve::<Unit>(raw)` and gets back a `&Unit` or a
/// [`ResolveError`](crate::ResolveError) that says exactly what went wrong.
pub trait GameObjectKind: Sized {
    const KIND: ObjectKind;

    fn id(&self) -> &Id<Self>;

    fn from_object(object: &GameObject) -> Option<&Self>;

    fn from_object_mut(object: &mut GameObject) -> Option<&mut Self>;

    fn into_object(self) -> GameObject;

    /// Unwraps an owned object, handing it back unchanged on a kind mismatch.
    fn try_from_object(object: GameObject) -> Result<Self, GameObject>;
}

/// Objects that belong to a player.
pub trait Owned: GameObjectKind {
    fn owner(&self) -> &Id<Player>;
}

macro_rules! game_object_kind {
    ($ty:ident) => {
        impl GameObjectKind for $ty {
            const KIND: ObjectKind = ObjectKind::$ty;

            fn id(&self) -> &Id<Self> {
                &self.id
            }

            fn from_object(object: &GameObject) -> Option<&Self> {
                match object {
                    GameObject::$ty(inner) => Some(inner),
                    _ => None,
                }
            }

            fn from_object_mut(object: &mut GameObject) -> Option<&mut Self> {
                match object {
                    GameObject::$ty(inner) => Some(inner),
                    _ => None,
                }
            }

            fn into_object(self) -> GameObject {
                GameObject::$ty(self)
            }

            fn try_from_object(object: GameObject) -> Result<Self, GameObject> {
                match object {
                    GameObject::$ty(inner) => Ok(inner),
                    other => Err(other),
                }
            }
        }
    };
}

game_object_kind!(Player);
game_object_kind!(Unit);
game_object_kind!(Colony);
game_object_kind!(Building);
game_object_kind!(Tile);
game_object_kind!(Settlement);
game_object_kind!(TradeRoute);

impl Owned for Unit {
    fn owner(&self) -> &Id<Player> {
        &self.owner
    }
}

impl Owned for Colony {
    fn owner(&self) -> &Id<Player> {
        &self.owner
    }
}

impl Owned for Settlement {
    fn owner(&self) -> &Id<Player> {
        &self.owner
    }
}

impl Owned for TradeRoute {
    fn owner(&self) -> &Id<Player> {
        &self.owner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route() -> TradeRoute {
        TradeRoute {
            id: Id::new("tradeRoute:1"),
            name: "Sugar run".into(),
            owner: Id::new("player:1"),
        }
    }

    #[test]
    fn test_from_object_matches_only_own_kind() {
        let object = route().into_object();
        assert_eq!(object.kind(), ObjectKind::TradeRoute);
        assert!(TradeRoute::from_object(&object).is_some());
        assert!(Unit::from_object(&object).is_none());
    }

    #[test]
    fn test_location_id_str() {
        let loc = Location::Carrier(Id::new("unit:4"));
        assert_eq!(loc.id_str(), "unit:4");
        assert_eq!(loc.to_string(), "unit:4");
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ObjectKind::Settlement.to_string(), "native settlement");
        assert_eq!(ObjectKind::TradeRoute.prefix(), "tradeRoute");
    }
}
