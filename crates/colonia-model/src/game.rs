//! The authoritative game-state graph and the identifier resolver.
//!
//! # Ownership
//!
//! `Game` owns every object. Everything else (messages, resolved
//! requests, controller code) refers to objects by [`Id`] and looks them up
//! here. That keeps the graph free of reference cycles and lets a whole
//! request be validated against an immutable `&Game` before a controller
//! takes `&mut Game` to apply it.
//!
//! # Resolution
//!
//! [`Game::resolve`] is the one way an untrusted identifier string becomes
//! a live object. It distinguishes "no such object" from "object of the
//! wrong kind", and [`Game::resolve_ours`] adds the ownership check that
//! almost every request needs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    Building, Colony, Direction, GameObject, GameObjectKind, Id, Location,
    ObjectKind, Owned, Player, ResolveError, Role, Settlement, Specification,
    Tile, TradeRoute, Unit, UnitType,
};

/// How far a carrier chain is followed before giving up. Units cannot
/// legitimately nest deeper than a colonist aboard a ship.
const MAX_CARRIER_DEPTH: usize = 4;

/// The full state of one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    spec: Specification,
    width: u32,
    height: u32,
    objects: HashMap<String, GameObject>,
    /// Tile ids in row-major order, `y * width + x`.
    grid: Vec<Id<Tile>>,
    next_id: u64,
}

impl Game {
    /// Creates a game with a `width` × `height` map of ocean tiles.
    pub fn new(spec: Specification, width: u32, height: u32) -> Self {
        let mut game = Self {
            spec,
            width,
            height,
            objects: HashMap::new(),
            grid: Vec::with_capacity(width as usize * height as usize),
            next_id: 1,
        };
        for y in 0..height {
            for x in 0..width {
                let id = game.mint(ObjectKind::Tile);
                game.grid.push(id.clone());
                game.insert(Tile {
                    id,
                    x,
                    y,
                    land: false,
                    colony: None,
                    settlement: None,
                    owning_colony: None,
                });
            }
        }
        game
    }

    pub fn spec(&self) -> &Specification {
        &self.spec
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    // -----------------------------------------------------------------------
    // Typed access
    // -----------------------------------------------------------------------

    /// Looks up an object by a typed id.
    ///
    /// Returns `None` if the object has been removed since the id was issued
    /// or if the id names an object of another kind.
    pub fn get<T: GameObjectKind>(&self, id: &Id<T>) -> Option<&T> {
        self.objects.get(id.as_str()).and_then(T::from_object)
    }

    pub fn get_mut<T: GameObjectKind>(&mut self, id: &Id<T>) -> Option<&mut T> {
        self.objects.get_mut(id.as_str()).and_then(T::from_object_mut)
    }

    /// Removes an object, returning it if it existed and had kind `T`.
    pub fn remove<T: GameObjectKind>(&mut self, id: &Id<T>) -> Option<T> {
        self.get(id)?;
        let object = self.objects.remove(id.as_str())?;
        T::try_from_object(object).ok()
    }

    /// Iterates over every unit in the game, in no particular order.
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.objects.values().filter_map(Unit::from_object)
    }

    /// Units whose location is exactly `location`, sorted by id.
    pub fn units_at(&self, location: &Location) -> Vec<&Unit> {
        let mut units: Vec<&Unit> =
            self.units().filter(|u| &u.location == location).collect();
        units.sort_by(|a, b| a.id.cmp(&b.id));
        units
    }

    // -----------------------------------------------------------------------
    // Resolution
    // -----------------------------------------------------------------------

    /// Resolves an untrusted identifier to an object of kind `T`.
    ///
    /// # Errors
    /// - [`ResolveError::Empty`] for an empty string
    /// - [`ResolveError::NotFound`] if nothing has this id
    /// - [`ResolveError::WrongKind`] if the id names some other kind
    pub fn resolve<T: GameObjectKind>(&self, raw: &str) -> Result<&T, ResolveError> {
        if raw.is_empty() {
            return Err(ResolveError::Empty);
        }
        let object = self.objects.get(raw).ok_or_else(|| {
            tracing::trace!(id = raw, expected = T::KIND.name(), "identifier not found");
            ResolveError::NotFound(raw.to_string())
        })?;
        T::from_object(object).ok_or_else(|| ResolveError::WrongKind {
            id: raw.to_string(),
            expected: T::KIND.name(),
            found: object.kind(),
        })
    }

    /// Resolves an identifier and checks that `player` owns the object.
    ///
    /// # Errors
    /// Everything [`resolve`](Self::resolve) returns, plus
    /// [`ResolveError::NotOwned`] when the object belongs to someone else.
    pub fn resolve_ours<T: Owned>(
        &self,
        player: &Id<Player>,
        raw: &str,
    ) -> Result<&T, ResolveError> {
        let object = self.resolve::<T>(raw)?;
        if object.owner() != player {
            return Err(ResolveError::NotOwned {
                id: raw.to_string(),
                player: player.to_string(),
            });
        }
        Ok(object)
    }

    /// Resolves an identifier that may name any kind of location.
    ///
    /// Tiles, buildings and units (as carriers) are locations; everything
    /// else is reported as [`ResolveError::WrongKind`].
    pub fn find_location(&self, raw: &str) -> Result<Location, ResolveError> {
        if raw.is_empty() {
            return Err(ResolveError::Empty);
        }
        let object = self
            .objects
            .get(raw)
            .ok_or_else(|| ResolveError::NotFound(raw.to_string()))?;
        match object {
            GameObject::Tile(tile) => Ok(Location::Tile(tile.id.clone())),
            GameObject::Building(b) => Ok(Location::Building(b.id.clone())),
            GameObject::Unit(unit) => Ok(Location::Carrier(unit.id.clone())),
            other => Err(ResolveError::WrongKind {
                id: raw.to_string(),
                expected: "location",
                found: other.kind(),
            }),
        }
    }

    // -----------------------------------------------------------------------
    // Map
    // -----------------------------------------------------------------------

    pub fn tile_at(&self, x: u32, y: u32) -> Option<&Tile> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let id = self.grid.get(y as usize * self.width as usize + x as usize)?;
        self.get(id)
    }

    /// The tile next to `tile` in `direction`, or `None` at the map edge.
    pub fn neighbour(&self, tile: &Tile, direction: Direction) -> Option<&Tile> {
        let (dx, dy) = direction.offset();
        let x = i64::from(tile.x) + dx;
        let y = i64::from(tile.y) + dy;
        if x < 0 || y < 0 {
            return None;
        }
        self.tile_at(u32::try_from(x).ok()?, u32::try_from(y).ok()?)
    }

    /// Whether two tiles touch (including diagonally).
    pub fn is_adjacent(&self, a: &Tile, b: &Tile) -> bool {
        let dx = i64::from(a.x) - i64::from(b.x);
        let dy = i64::from(a.y) - i64::from(b.y);
        dx.abs() <= 1 && dy.abs() <= 1 && (dx, dy) != (0, 0)
    }

    /// The map tile a location is on.
    ///
    /// Buildings are on their colony's tile; carried units are wherever
    /// their carrier is.
    pub fn tile_of(&self, location: &Location) -> Option<&Tile> {
        let mut current = location.clone();
        for _ in 0..MAX_CARRIER_DEPTH {
            match current {
                Location::Tile(id) => return self.get(&id),
                Location::Building(id) => {
                    let building = self.get(&id)?;
                    let colony = self.get(&building.colony)?;
                    return self.get(&colony.tile);
                }
                Location::Carrier(id) => {
                    current = self.get(&id)?.location.clone();
                }
            }
        }
        None
    }

    /// The colony a location belongs to, if any.
    ///
    /// A building belongs to its colony; a tile belongs to the colony built
    /// on it or the colony that owns it as a work tile. Carriers never
    /// belong to a colony.
    pub fn colony_of(&self, location: &Location) -> Option<&Id<Colony>> {
        match location {
            Location::Building(id) => self.get(id).map(|b| &b.colony),
            Location::Tile(id) => {
                let tile = self.get(id)?;
                tile.colony.as_ref().or(tile.owning_colony.as_ref())
            }
            Location::Carrier(_) => None,
        }
    }

    /// The colony `unit` currently works for.
    ///
    /// Inside a colony building, or on one of its tiles with a goods type
    /// to produce. A unit merely standing on a colony tile is outside the
    /// colony, and naval units never work in one.
    pub fn workplace_colony(&self, unit: &Unit) -> Option<&Id<Colony>> {
        if self.is_naval(unit) {
            return None;
        }
        match &unit.location {
            Location::Building(_) => self.colony_of(&unit.location),
            Location::Tile(_) if unit.work.is_some() => self.colony_of(&unit.location),
            Location::Tile(_) | Location::Carrier(_) => None,
        }
    }

    pub fn unit_type_of(&self, unit: &Unit) -> Option<&UnitType> {
        self.spec.unit_type(unit.unit_type.as_str())
    }

    pub fn is_naval(&self, unit: &Unit) -> bool {
        self.unit_type_of(unit).is_some_and(|t| t.naval)
    }

    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    /// Marks a tile as land or water.
    pub fn set_land(&mut self, tile: &Id<Tile>, land: bool) -> Result<(), ResolveError> {
        let tile = self
            .get_mut(tile)
            .ok_or_else(|| ResolveError::NotFound(tile.to_string()))?;
        tile.land = land;
        Ok(())
    }

    pub fn add_player(&mut self, name: &str) -> Id<Player> {
        let id = self.mint(ObjectKind::Player);
        self.insert(Player {
            id: id.clone(),
            name: name.to_string(),
        });
        id
    }

    /// Adds a unit of `unit_type` with the default role and full moves.
    pub fn add_unit(
        &mut self,
        owner: &Id<Player>,
        unit_type: &str,
        location: Location,
    ) -> Result<Id<Unit>, ResolveError> {
        let naval = self
            .spec
            .unit_type(unit_type)
            .ok_or_else(|| ResolveError::NotFound(unit_type.to_string()))?
            .naval;
        self.resolve::<Player>(owner.as_str())?;
        let id = self.mint(ObjectKind::Unit);
        self.insert(Unit {
            id: id.clone(),
            owner: owner.clone(),
            unit_type: Id::new(unit_type),
            location,
            work: None,
            role: Id::new(Role::DEFAULT),
            role_count: 0,
            moves_left: if naval { 4 } else { 1 },
        });
        Ok(id)
    }

    /// Founds a colony on `tile`, claiming it and its neighbours as work
    /// tiles where no other colony already owns them.
    pub fn add_colony(
        &mut self,
        owner: &Id<Player>,
        name: &str,
        tile: &Id<Tile>,
    ) -> Result<Id<Colony>, ResolveError> {
        self.resolve::<Player>(owner.as_str())?;
        let centre = self.resolve::<Tile>(tile.as_str())?.clone();
        let id = self.mint(ObjectKind::Colony);

        let claimed: Vec<Id<Tile>> = Direction::ALL
            .into_iter()
            .filter_map(|d| self.neighbour(&centre, d))
            .filter(|t| t.owning_colony.is_none())
            .map(|t| t.id.clone())
            .collect();
        for tile_id in claimed {
            if let Some(t) = self.get_mut(&tile_id) {
                t.owning_colony = Some(id.clone());
            }
        }
        if let Some(t) = self.get_mut(&centre.id) {
            t.land = true;
            t.colony = Some(id.clone());
            t.owning_colony = Some(id.clone());
        }

        self.insert(Colony {
            id: id.clone(),
            name: name.to_string(),
            owner: owner.clone(),
            tile: centre.id,
            buildings: Vec::new(),
        });
        Ok(id)
    }

    pub fn add_building(
        &mut self,
        colony: &Id<Colony>,
        building_type: &str,
    ) -> Result<Id<Building>, ResolveError> {
        if self.spec.building_type(building_type).is_none() {
            return Err(ResolveError::NotFound(building_type.to_string()));
        }
        self.resolve::<Colony>(colony.as_str())?;
        let id = self.mint(ObjectKind::Building);
        self.insert(Building {
            id: id.clone(),
            colony: colony.clone(),
            building_type: Id::new(building_type),
        });
        if let Some(c) = self.get_mut(colony) {
            c.buildings.push(id.clone());
        }
        Ok(id)
    }

    pub fn add_settlement(
        &mut self,
        owner: &Id<Player>,
        name: &str,
        tile: &Id<Tile>,
        skill: Option<&str>,
    ) -> Result<Id<Settlement>, ResolveError> {
        self.resolve::<Player>(owner.as_str())?;
        self.resolve::<Tile>(tile.as_str())?;
        let id = self.mint(ObjectKind::Settlement);
        if let Some(t) = self.get_mut(tile) {
            t.land = true;
            t.settlement = Some(id.clone());
        }
        self.insert(Settlement {
            id: id.clone(),
            name: name.to_string(),
            owner: owner.clone(),
            tile: tile.clone(),
            skill: skill.map(Id::new),
            skill_told: Vec::new(),
        });
        Ok(id)
    }

    pub fn add_trade_route(
        &mut self,
        owner: &Id<Player>,
        name: &str,
    ) -> Result<Id<TradeRoute>, ResolveError> {
        self.resolve::<Player>(owner.as_str())?;
        let id = self.mint(ObjectKind::TradeRoute);
        self.insert(TradeRoute {
            id: id.clone(),
            name: name.to_string(),
            owner: owner.clone(),
        });
        Ok(id)
    }

    fn mint<T>(&mut self, kind: ObjectKind) -> Id<T> {
        let id = Id::new(format!("{}:{}", kind.prefix(), self.next_id));
        self.next_id += 1;
        id
    }

    fn insert<T: GameObjectKind>(&mut self, object: T) {
        let key = object.id().as_str().to_string();
        self.objects.insert(key, object.into_object());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A 4x3 map with one land column, a player, a colony and a unit.
    fn small_game() -> (Game, Id<Player>, Id<Colony>, Id<Unit>) {
        let mut game = Game::new(Specification::classic(), 4, 3);
        let player = game.add_player("Dutch");
        let tile = game.tile_at(1, 1).unwrap().id.clone();
        let colony = game.add_colony(&player, "Fort Orange", &tile).unwrap();
        let unit = game
            .add_unit(&player, "model.unit.freeColonist", Location::Tile(tile))
            .unwrap();
        (game, player, colony, unit)
    }

    #[test]
    fn test_resolve_finds_object_of_expected_kind() {
        let (game, _, _, unit) = small_game();
        let found = game.resolve::<Unit>(unit.as_str()).unwrap();
        assert_eq!(found.id, unit);
    }

    #[test]
    fn test_resolve_distinguishes_not_found_and_wrong_kind() {
        let (game, _, colony, _) = small_game();

        assert_eq!(
            game.resolve::<Unit>("unit:999").unwrap_err(),
            ResolveError::NotFound("unit:999".into())
        );

        let err = game.resolve::<Unit>(colony.as_str()).unwrap_err();
        assert!(matches!(
            err,
            ResolveError::WrongKind { found: ObjectKind::Colony, expected: "unit", .. }
        ));
    }

    #[test]
    fn test_resolve_empty_identifier() {
        let (game, ..) = small_game();
        assert_eq!(game.resolve::<Unit>("").unwrap_err(), ResolveError::Empty);
        assert_eq!(game.find_location("").unwrap_err(), ResolveError::Empty);
    }

    #[test]
    fn test_resolve_ours_rejects_foreign_objects() {
        let (mut game, _, _, unit) = small_game();
        let other = game.add_player("English");

        let err = game.resolve_ours::<Unit>(&other, unit.as_str()).unwrap_err();
        assert!(matches!(err, ResolveError::NotOwned { .. }));
        assert!(err.to_string().contains(unit.as_str()));
    }

    #[test]
    fn test_find_location_accepts_tiles_buildings_and_carriers() {
        let (mut game, _, colony, unit) = small_game();
        let building = game.add_building(&colony, "model.building.townHall").unwrap();
        let tile = game.tile_at(0, 0).unwrap().id.clone();

        assert_eq!(game.find_location(tile.as_str()), Ok(Location::Tile(tile)));
        assert_eq!(
            game.find_location(building.as_str()),
            Ok(Location::Building(building))
        );
        assert_eq!(
            game.find_location(unit.as_str()),
            Ok(Location::Carrier(unit))
        );
        assert!(matches!(
            game.find_location(colony.as_str()),
            Err(ResolveError::WrongKind { expected: "location", .. })
        ));
    }

    #[test]
    fn test_neighbour_stops_at_map_edge() {
        let (game, ..) = small_game();
        let corner = game.tile_at(0, 0).unwrap();
        assert!(game.neighbour(corner, Direction::N).is_none());
        assert!(game.neighbour(corner, Direction::W).is_none());

        let east = game.neighbour(corner, Direction::E).unwrap();
        assert_eq!((east.x, east.y), (1, 0));
        assert!(game.is_adjacent(corner, east));
    }

    #[test]
    fn test_tile_at_indexes_row_major_and_rejects_huge_coordinates() {
        let (game, ..) = small_game();
        let last = game.tile_at(3, 2).unwrap();
        assert_eq!((last.x, last.y), (3, 2));
        assert!(game.tile_at(u32::MAX, 0).is_none());
        assert!(game.tile_at(0, u32::MAX).is_none());
        assert!(game.tile_at(u32::MAX, u32::MAX).is_none());
    }

    #[test]
    fn test_colony_claims_surrounding_tiles() {
        let (game, _, colony, _) = small_game();
        let centre = game.tile_at(1, 1).unwrap();
        assert_eq!(centre.colony.as_ref(), Some(&colony));
        assert!(centre.land);

        let work_tile = game.tile_at(2, 2).unwrap();
        assert_eq!(
            game.colony_of(&Location::Tile(work_tile.id.clone())),
            Some(&colony)
        );

        let far = game.tile_at(3, 2).unwrap();
        assert_eq!(game.colony_of(&Location::Tile(far.id.clone())), None);
    }

    #[test]
    fn test_only_working_units_belong_to_a_colony() {
        let (mut game, player, colony, unit) = small_game();
        let building = game.add_building(&colony, "model.building.townHall").unwrap();
        let near = game.tile_at(2, 1).unwrap().id.clone();
        let ship = game
            .add_unit(&player, "model.unit.caravel", Location::Tile(near.clone()))
            .unwrap();

        // Standing on the colony tile is not working there.
        assert_eq!(game.workplace_colony(game.get(&unit).unwrap()), None);

        let u = game.get_mut(&unit).unwrap();
        u.location = Location::Tile(near.clone());
        assert_eq!(game.workplace_colony(game.get(&unit).unwrap()), None);

        game.get_mut(&unit).unwrap().work = Some(Id::new("model.goods.food"));
        assert_eq!(game.workplace_colony(game.get(&unit).unwrap()), Some(&colony));

        let u = game.get_mut(&unit).unwrap();
        u.location = Location::Building(building);
        u.work = None;
        assert_eq!(game.workplace_colony(game.get(&unit).unwrap()), Some(&colony));

        game.get_mut(&ship).unwrap().work = Some(Id::new("model.goods.food"));
        assert_eq!(game.workplace_colony(game.get(&ship).unwrap()), None);
    }

    #[test]
    fn test_tile_of_follows_buildings_and_carriers() {
        let (mut game, player, colony, _) = small_game();
        let building = game.add_building(&colony, "model.building.townHall").unwrap();
        let centre = game.tile_at(1, 1).unwrap().id.clone();
        let ship = game
            .add_unit(&player, "model.unit.caravel", Location::Tile(centre.clone()))
            .unwrap();
        let passenger = game
            .add_unit(&player, "model.unit.freeColonist", Location::Carrier(ship))
            .unwrap();

        let passenger = game.get(&passenger).unwrap();
        assert_eq!(game.tile_of(&passenger.location).unwrap().id, centre);
        assert_eq!(
            game.tile_of(&Location::Building(building)).unwrap().id,
            centre
        );
    }

    #[test]
    fn test_remove_checks_kind() {
        let (mut game, player, ..) = small_game();
        let route = game.add_trade_route(&player, "Furs").unwrap();

        let wrong: Id<Unit> = Id::new(route.as_str());
        assert!(game.remove(&wrong).is_none());
        assert!(game.get(&route).is_some());

        assert_eq!(game.remove(&route).unwrap().name, "Furs");
        assert!(game.get(&route).is_none());
    }

    #[test]
    fn test_minted_ids_are_unique_and_prefixed() {
        let (mut game, player, ..) = small_game();
        let a = game.add_trade_route(&player, "a").unwrap();
        let b = game.add_trade_route(&player, "b").unwrap();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("tradeRoute:"));
    }
}
