//! `move`: a plain step onto a neighbouring tile.

use colonia_model::{Direction, Game, Id, MoveType, Player, Tile, Unit};

use super::{ClientError, parse_direction, unit_tile};
use crate::Element;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveMessage {
    pub unit: String,
    pub direction: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRequest {
    unit: Id<Unit>,
    destination: Id<Tile>,
}

impl MoveRequest {
    pub fn unit(&self) -> &Id<Unit> {
        &self.unit
    }

    pub fn destination(&self) -> &Id<Tile> {
        &self.destination
    }
}

impl MoveMessage {
    pub const TAG: &'static str = "move";
    const UNIT: &'static str = "unit";
    const DIRECTION: &'static str = "direction";

    pub fn new(unit: &Unit, direction: Direction) -> Self {
        Self {
            unit: unit.id.to_string(),
            direction: direction.to_string(),
        }
    }

    pub fn from_element(element: &Element) -> Self {
        Self {
            unit: element.string(Self::UNIT),
            direction: element.string(Self::DIRECTION),
        }
    }

    pub fn to_element(&self) -> Element {
        Element::new(Self::TAG)
            .with(Self::UNIT, self.unit.as_str())
            .with(Self::DIRECTION, self.direction.as_str())
    }

    /// Only [`MoveType::Move`] is accepted. Settlement visits and attacks
    /// have requests of their own.
    ///
    /// # Errors
    /// A [`ClientError`] naming the unit and the reason the move is refused.
    pub fn validate(&self, game: &Game, player: &Id<Player>) -> Result<MoveRequest, ClientError> {
        let unit = game
            .resolve_ours::<Unit>(player, &self.unit)
            .map_err(|e| ClientError::resolution(player, "unit", e))?;
        let direction = parse_direction(player, &self.direction)?;
        let from = unit_tile(game, player, unit)?;
        let Some(target) = game.neighbour(from, direction) else {
            return Err(ClientError::new(
                player,
                format!("Unable to move {} {direction}: the map ends there", unit.id),
            ));
        };
        let move_type = game.move_type(unit, target);
        if move_type != MoveType::Move {
            return Err(ClientError::new(
                player,
                format!(
                    "Unable to move {} {direction}: {}",
                    unit.id,
                    move_type.why_illegal()
                ),
            ));
        }
        Ok(MoveRequest {
            unit: unit.id.clone(),
            destination: target.id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::World;

    #[test]
    fn test_step_onto_land() {
        let w = World::new();
        let req = MoveMessage::new(w.unit(&w.colonist), Direction::S)
            .validate(&w.game, &w.dutch)
            .unwrap();
        assert_eq!(req.destination(), &w.tile(3, 3));
    }

    #[test]
    fn test_step_into_own_colony() {
        let w = World::new();
        let req = MoveMessage::new(w.unit(&w.colonist), Direction::W)
            .validate(&w.game, &w.dutch)
            .unwrap();
        assert_eq!(req.destination(), &w.tile(2, 2));
    }

    #[test]
    fn test_step_into_settlement_is_not_a_move() {
        let w = World::new();
        let err = MoveMessage::new(w.unit(&w.colonist), Direction::E)
            .validate(&w.game, &w.dutch)
            .unwrap_err();
        assert_eq!(
            err.message(),
            format!(
                "Unable to move {} E: a free colonist may only ask to be taught",
                w.colonist
            )
        );
    }

    #[test]
    fn test_ship_cannot_sail_onto_land() {
        let w = World::new();
        let err = MoveMessage::new(w.unit(&w.ship), Direction::E)
            .validate(&w.game, &w.dutch)
            .unwrap_err();
        assert!(err.message().ends_with("naval units cannot move onto land"));
    }

    #[test]
    fn test_map_edge() {
        let w = World::new();
        let err = MoveMessage::new(w.unit(&w.english_unit), Direction::S)
            .validate(&w.game, &w.english)
            .unwrap_err();
        assert!(err.message().ends_with("the map ends there"));
    }
}
