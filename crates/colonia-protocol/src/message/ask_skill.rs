//! `askSkill`: a unit asks the neighbouring native settlement what skill it
//! teaches.

use colonia_model::{Direction, Game, Id, MoveType, Player, Settlement, Unit};

use super::{ClientError, parse_direction, unit_tile};
use crate::Element;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AskSkillMessage {
    pub unit: String,
    pub direction: String,
}

/// A validated `askSkill`: the unit can enter the settlement to be taught.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AskSkillRequest {
    unit: Id<Unit>,
    settlement: Id<Settlement>,
}

impl AskSkillRequest {
    pub fn unit(&self) -> &Id<Unit> {
        &self.unit
    }

    pub fn settlement(&self) -> &Id<Settlement> {
        &self.settlement
    }
}

impl AskSkillMessage {
    pub const TAG: &'static str = "askSkill";
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

    /// Checks, in order: the unit is the player's, the direction parses,
    /// there is a settlement on the neighbouring tile, and the unit's move
    /// into it would be a free colonist asking to be taught.
    ///
    /// # Errors
    /// A [`ClientError`] describing the first check that failed.
    pub fn validate(
        &self,
        game: &Game,
        player: &Id<Player>,
    ) -> Result<AskSkillRequest, ClientError> {
        let unit = game
            .resolve_ours::<Unit>(player, &self.unit)
            .map_err(|e| ClientError::resolution(player, "unit", e))?;
        let direction = parse_direction(player, &self.direction)?;
        let from = unit_tile(game, player, unit)?;

        let Some(tile) = game.neighbour(from, direction) else {
            return Err(ClientError::new(
                player,
                format!("There is no native settlement to the {direction} of {}", from.id),
            ));
        };
        let settlement = tile
            .settlement
            .as_ref()
            .and_then(|id| game.get(id))
            .ok_or_else(|| {
                ClientError::new(
                    player,
                    format!("There is no native settlement at: {}", tile.id),
                )
            })?;

        let move_type = game.move_type(unit, tile);
        if move_type != MoveType::EnterSettlementWithFreeColonist {
            return Err(ClientError::new(
                player,
                format!(
                    "Unable to enter {}: {}",
                    settlement.name,
                    move_type.why_illegal()
                ),
            ));
        }

        Ok(AskSkillRequest {
            unit: unit.id.clone(),
            settlement: settlement.id.clone(),
        })
    }
}
