//! Move classification: what would happen if a unit stepped onto a tile.
//!
//! Requests that involve a unit acting on a neighbouring tile (moving,
//! asking a settlement for training) start by classifying the move. The
//! classification is pure: it reads the game and never changes it, so
//! validators can call it freely.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Game, Role, Tile, Unit};

/// The kind of move a unit would make into a target tile.
///
/// Several variants are perfectly legal moves in general but are still the
/// wrong move for a particular request: a scout entering a settlement is
/// fine, but a scout cannot ask to be taught. [`MoveType::why_illegal`]
/// gives the reason shown to the player in either case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveType {
    /// A plain step onto an empty tile or into one of the player's colonies.
    Move,
    /// An unarmed, unskilled colonist entering a native settlement.
    EnterSettlementWithFreeColonist,
    EnterSettlementWithScout,
    EnterSettlementWithMissionary,
    AttackSettlement,
    MoveNoMoves,
    MoveNoAccessWater,
    MoveNoAccessLand,
    MoveNoAccessSettlement,
    MoveNoAccessColony,
    MoveNoAccessSkill,
    MoveIllegal,
}

impl MoveType {
    /// Why this move cannot be used where another move was required.
    pub fn why_illegal(self) -> &'static str {
        match self {
            Self::Move => "the destination is not a settlement",
            Self::EnterSettlementWithFreeColonist => {
                "a free colonist may only ask to be taught"
            }
            Self::EnterSettlementWithScout => "scouts speak with the chief instead",
            Self::EnterSettlementWithMissionary => {
                "missionaries establish missions instead"
            }
            Self::AttackSettlement => "armed units attack instead",
            Self::MoveNoMoves => "the unit has no moves left",
            Self::MoveNoAccessWater => "land units cannot move onto water",
            Self::MoveNoAccessLand => "naval units cannot move onto land",
            Self::MoveNoAccessSettlement => "naval units cannot enter settlements",
            Self::MoveNoAccessColony => "the colony belongs to another player",
            Self::MoveNoAccessSkill => "this unit type can not learn a skill",
            Self::MoveIllegal => "the destination is not adjacent",
        }
    }
}

impl fmt::Display for MoveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl Game {
    /// Classifies a move by `unit` onto the adjacent tile `target`.
    pub fn move_type(&self, unit: &Unit, target: &Tile) -> MoveType {
        let Some(from) = self.tile_of(&unit.location) else {
            return MoveType::MoveIllegal;
        };
        if !self.is_adjacent(from, target) {
            return MoveType::MoveIllegal;
        }
        if unit.moves_left == 0 {
            return MoveType::MoveNoMoves;
        }
        let naval = self.is_naval(unit);

        if target.settlement.is_some() {
            if naval {
                return MoveType::MoveNoAccessSettlement;
            }
            return self.settlement_move_type(unit);
        }

        if let Some(colony) = &target.colony {
            let ours = self.get(colony).is_some_and(|c| c.owner == unit.owner);
            return if ours {
                MoveType::Move
            } else {
                MoveType::MoveNoAccessColony
            };
        }

        match (naval, target.land) {
            (true, true) => MoveType::MoveNoAccessLand,
            (false, false) => MoveType::MoveNoAccessWater,
            _ => MoveType::Move,
        }
    }

    fn settlement_move_type(&self, unit: &Unit) -> MoveType {
        let role = self.spec().role(unit.role.as_str());
        match unit.role.as_str() {
            Role::SCOUT => MoveType::EnterSettlementWithScout,
            Role::MISSIONARY => MoveType::EnterSettlementWithMissionary,
            _ if role.is_some_and(|r| r.offensive) => MoveType::AttackSettlement,
            _ if self
                .unit_type_of(unit)
                .is_some_and(|t| t.can_learn_from_natives()) =>
            {
                MoveType::EnterSettlementWithFreeColonist
            }
            _ => MoveType::MoveNoAccessSkill,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Id, Location, Player, Specification};

    /// Row 0 is ocean, row 1 is land. A settlement sits at (2,1).
    struct Fixture {
        game: Game,
        player: Id<Player>,
    }

    impl Fixture {
        fn new() -> Self {
            let mut game = Game::new(Specification::classic(), 4, 2);
            for x in 0..4 {
                let id = game.tile_at(x, 1).unwrap().id.clone();
                game.set_land(&id, true).unwrap();
            }
            let player = game.add_player("Dutch");
            let natives = game.add_player("Arawak");
            let camp = game.tile_at(2, 1).unwrap().id.clone();
            game.add_settlement(&natives, "Guanahani", &camp, Some("model.unit.expertFarmer"))
                .unwrap();
            Self { game, player }
        }

        fn unit_at(&mut self, unit_type: &str, x: u32, y: u32) -> Unit {
            let tile = self.game.tile_at(x, y).unwrap().id.clone();
            let id = self
                .game
                .add_unit(&self.player, unit_type, Location::Tile(tile))
                .unwrap();
            self.game.get(&id).unwrap().clone()
        }

        fn tile(&self, x: u32, y: u32) -> &Tile {
            self.game.tile_at(x, y).unwrap()
        }
    }

    #[test]
    fn test_free_colonist_can_enter_to_learn() {
        let mut f = Fixture::new();
        let unit = f.unit_at("model.unit.freeColonist", 1, 1);
        assert_eq!(
            f.game.move_type(&unit, f.tile(2, 1)),
            MoveType::EnterSettlementWithFreeColonist
        );
    }

    #[test]
    fn test_expert_cannot_learn() {
        let mut f = Fixture::new();
        let unit = f.unit_at("model.unit.expertFarmer", 1, 1);
        let mt = f.game.move_type(&unit, f.tile(2, 1));
        assert_eq!(mt, MoveType::MoveNoAccessSkill);
        assert_eq!(mt.why_illegal(), "this unit type can not learn a skill");
    }

    #[test]
    fn test_roles_change_settlement_move() {
        let mut f = Fixture::new();
        let mut unit = f.unit_at("model.unit.freeColonist", 1, 1);

        unit.role = Id::new(Role::SCOUT);
        assert_eq!(
            f.game.move_type(&unit, f.tile(2, 1)),
            MoveType::EnterSettlementWithScout
        );

        unit.role = Id::new(Role::SOLDIER);
        assert_eq!(
            f.game.move_type(&unit, f.tile(2, 1)),
            MoveType::AttackSettlement
        );
    }

    #[test]
    fn test_no_moves_left() {
        let mut f = Fixture::new();
        let mut unit = f.unit_at("model.unit.freeColonist", 1, 1);
        unit.moves_left = 0;
        assert_eq!(f.game.move_type(&unit, f.tile(2, 1)), MoveType::MoveNoMoves);
    }

    #[test]
    fn test_land_unit_cannot_enter_water_and_ship_cannot_land() {
        let mut f = Fixture::new();
        let colonist = f.unit_at("model.unit.freeColonist", 0, 1);
        assert_eq!(
            f.game.move_type(&colonist, f.tile(0, 0)),
            MoveType::MoveNoAccessWater
        );
        assert_eq!(f.game.move_type(&colonist, f.tile(1, 1)), MoveType::Move);

        let ship = f.unit_at("model.unit.caravel", 1, 0);
        assert_eq!(f.game.move_type(&ship, f.tile(0, 0)), MoveType::Move);
        assert_eq!(
            f.game.move_type(&ship, f.tile(1, 1)),
            MoveType::MoveNoAccessLand
        );
        assert_eq!(
            f.game.move_type(&ship, f.tile(2, 1)),
            MoveType::MoveNoAccessSettlement
        );
    }

    #[test]
    fn test_non_adjacent_target_is_illegal() {
        let mut f = Fixture::new();
        let unit = f.unit_at("model.unit.freeColonist", 0, 1);
        assert_eq!(f.game.move_type(&unit, f.tile(3, 1)), MoveType::MoveIllegal);
        assert_eq!(f.game.move_type(&unit, f.tile(0, 1)), MoveType::MoveIllegal);
    }

    #[test]
    fn test_foreign_colony_blocks_entry() {
        let mut f = Fixture::new();
        let other = f.game.add_player("English");
        let site = f.tile(1, 1).id.clone();
        f.game.add_colony(&other, "Jamestown", &site).unwrap();

        let unit = f.unit_at("model.unit.freeColonist", 0, 1);
        assert_eq!(
            f.game.move_type(&unit, f.tile(1, 1)),
            MoveType::MoveNoAccessColony
        );
    }
}
