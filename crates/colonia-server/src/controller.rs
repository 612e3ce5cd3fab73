//! The `Controller` trait: where validated requests change the game.
//!
//! Validators only read the game; controllers are the only code that
//! writes it. Each method receives a request whose identifiers have already
//! been resolved and checked, applies it, and reports the changed objects
//! as an [`Update`].

use std::collections::HashMap;

use colonia_model::{Building, Game, Id, Location, Player, TradeRoute, Unit};
use colonia_protocol::{
    AskSkillRequest, Change, DeleteTradeRouteRequest, DisembarkRequest, MoveRequest,
    RearrangeColonyRequest, Request, ResolvedArrangement, Update,
};

/// Failures while applying a request that passed validation.
///
/// These mean the game moved on between validation and handling, or the
/// request breaks a rule only the game logic knows about. The dispatcher
/// reports them to the player and logs a warning.
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    /// An object named by the request no longer exists.
    #[error("{0} no longer exists")]
    Missing(String),

    /// More units would work in a building than it has room for.
    #[error("{building} has room for {capacity} workers, not {requested}")]
    CapacityExceeded {
        building: String,
        capacity: usize,
        requested: usize,
    },
}

/// Applies validated requests to the game.
///
/// The caller holds the game's write lock for the duration of each call.
/// A method must either apply the whole request or leave the game
/// untouched and return an error.
pub trait Controller: Send + Sync + 'static {
    fn ask_skill(
        &self,
        game: &mut Game,
        player: &Id<Player>,
        request: &AskSkillRequest,
    ) -> Result<Update, ControllerError>;

    fn delete_trade_route(
        &self,
        game: &mut Game,
        player: &Id<Player>,
        request: &DeleteTradeRouteRequest,
    ) -> Result<Update, ControllerError>;

    fn disembark(
        &self,
        game: &mut Game,
        player: &Id<Player>,
        request: &DisembarkRequest,
    ) -> Result<Update, ControllerError>;

    fn move_unit(
        &self,
        game: &mut Game,
        player: &Id<Player>,
        request: &MoveRequest,
    ) -> Result<Update, ControllerError>;

    fn rearrange_colony(
        &self,
        game: &mut Game,
        player: &Id<Player>,
        request: &RearrangeColonyRequest,
    ) -> Result<Update, ControllerError>;

    /// Routes a request to the method for its kind.
    fn handle(
        &self,
        game: &mut Game,
        player: &Id<Player>,
        request: &Request,
    ) -> Result<Update, ControllerError> {
        match request {
            Request::AskSkill(r) => self.ask_skill(game, player, r),
            Request::DeleteTradeRoute(r) => self.delete_trade_route(game, player, r),
            Request::Disembark(r) => self.disembark(game, player, r),
            Request::Move(r) => self.move_unit(game, player, r),
            Request::RearrangeColony(r) => self.rearrange_colony(game, player, r),
        }
    }
}

// ---------------------------------------------------------------------------
// InGameController
// ---------------------------------------------------------------------------

/// The standard in-game rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct InGameController;

fn unit_mut<'g>(game: &'g mut Game, id: &Id<Unit>) -> Result<&'g mut Unit, ControllerError> {
    game.get_mut(id)
        .ok_or_else(|| ControllerError::Missing(id.to_string()))
}

impl Controller for InGameController {
    /// Tells the player which skill the settlement teaches. Asking uses up
    /// the unit's moves for the turn.
    fn ask_skill(
        &self,
        game: &mut Game,
        player: &Id<Player>,
        request: &AskSkillRequest,
    ) -> Result<Update, ControllerError> {
        if game.get(request.unit()).is_none() {
            return Err(ControllerError::Missing(request.unit().to_string()));
        }
        let settlement = game
            .get_mut(request.settlement())
            .ok_or_else(|| ControllerError::Missing(request.settlement().to_string()))?;
        if !settlement.skill_told.contains(player) {
            settlement.skill_told.push(player.clone());
        }
        let settlement_change = Change::settlement(settlement);

        let unit = unit_mut(game, request.unit())?;
        unit.moves_left = 0;

        Ok(Update::new(vec![settlement_change, Change::unit(unit)]))
    }

    fn delete_trade_route(
        &self,
        game: &mut Game,
        _player: &Id<Player>,
        request: &DeleteTradeRouteRequest,
    ) -> Result<Update, ControllerError> {
        let route: TradeRoute = game
            .remove(request.trade_route())
            .ok_or_else(|| ControllerError::Missing(request.trade_route().to_string()))?;
        Ok(Update::new(vec![Change::removed(route.id.into_inner())]))
    }

    fn disembark(
        &self,
        game: &mut Game,
        _player: &Id<Player>,
        request: &DisembarkRequest,
    ) -> Result<Update, ControllerError> {
        let unit = unit_mut(game, request.unit())?;
        unit.location = Location::Tile(request.tile().clone());
        Ok(Update::new(vec![Change::unit(unit)]))
    }

    fn move_unit(
        &self,
        game: &mut Game,
        _player: &Id<Player>,
        request: &MoveRequest,
    ) -> Result<Update, ControllerError> {
        let unit = unit_mut(game, request.unit())?;
        unit.location = Location::Tile(request.destination().clone());
        unit.moves_left = unit.moves_left.saturating_sub(1);
        Ok(Update::new(vec![Change::unit(unit)]))
    }

    /// Checks building capacity for the final layout before touching
    /// anything, then applies the arrangements that give up equipment
    /// before those that take it. The update lists units in request order.
    fn rearrange_colony(
        &self,
        game: &mut Game,
        _player: &Id<Player>,
        request: &RearrangeColonyRequest,
    ) -> Result<Update, ControllerError> {
        let arrangements = request.arrangements();
        for a in arrangements {
            if game.get(&a.unit).is_none() {
                return Err(ControllerError::Missing(a.unit.to_string()));
            }
        }
        check_capacity(game, request)?;

        for i in application_order(game, arrangements) {
            let a = &arrangements[i];
            let unit = unit_mut(game, &a.unit)?;
            unit.location = a.location.clone();
            unit.work = a.work.clone();
            unit.role = a.role.clone();
            unit.role_count = a.role_count;
        }

        let changes = arrangements
            .iter()
            .map(|a| {
                game.get(&a.unit)
                    .map(Change::unit)
                    .ok_or_else(|| ControllerError::Missing(a.unit.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(colony = %request.colony(), units = changes.len(), "colony rearranged");
        Ok(Update::new(changes))
    }
}

/// Indices into `arrangements` in the order they are applied.
///
/// Units that keep or drop equipment come first, units that take on more
/// come last; otherwise request order is kept.
fn application_order(game: &Game, arrangements: &[ResolvedArrangement]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..arrangements.len()).collect();
    order.sort_by_key(|&i| takes_equipment(game, &arrangements[i]));
    order
}

fn takes_equipment(game: &Game, a: &ResolvedArrangement) -> bool {
    let held = game
        .get(&a.unit)
        .filter(|u| u.role == a.role)
        .map_or(0, |u| u.role_count);
    a.role_count > held
}

/// Counts the workers each affected building would have after the
/// rearrangement and compares against its workplaces.
fn check_capacity(game: &Game, request: &RearrangeColonyRequest) -> Result<(), ControllerError> {
    let moving: Vec<&Id<Unit>> = request.arrangements().iter().map(|a| &a.unit).collect();
    let mut incoming: HashMap<&Id<Building>, usize> = HashMap::new();
    for a in request.arrangements() {
        if let Location::Building(building) = &a.location {
            *incoming.entry(building).or_default() += 1;
        }
    }

    for (building, arriving) in incoming {
        let staying = game
            .units_at(&Location::Building(building.clone()))
            .into_iter()
            .filter(|u| !moving.contains(&&u.id))
            .count();
        let capacity = game
            .get(building)
            .and_then(|b| game.spec().building_type(b.building_type.as_str()))
            .map(|t| t.workplaces)
            .ok_or_else(|| ControllerError::Missing(building.to_string()))?;
        let requested = staying + arriving;
        if requested > capacity {
            return Err(ControllerError::CapacityExceeded {
                building: building.to_string(),
                capacity,
                requested,
            });
        }
    }
    Ok(())
}
