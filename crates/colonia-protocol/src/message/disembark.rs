//! `disembark`: a unit steps off its carrier onto the tile the carrier is
//! docked at.

use colonia_model::{Game, Id, Location, Player, Tile, Unit};

use super::ClientError;
use crate::Element;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisembarkMessage {
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisembarkRequest {
    unit: Id<Unit>,
    carrier: Id<Unit>,
    tile: Id<Tile>,
}

impl DisembarkRequest {
    pub fn unit(&self) -> &Id<Unit> {
        &self.unit
    }

    pub fn carrier(&self) -> &Id<Unit> {
        &self.carrier
    }

    /// Where the unit will stand afterwards.
    pub fn tile(&self) -> &Id<Tile> {
        &self.tile
    }
}

impl DisembarkMessage {
    pub const TAG: &'static str = "disembark";
    const UNIT: &'static str = "unit";

    pub fn new(unit: &Unit) -> Self {
        Self {
            unit: unit.id.to_string(),
        }
    }

    pub fn from_element(element: &Element) -> Self {
        Self {
            unit: element.string(Self::UNIT),
        }
    }

    pub fn to_element(&self) -> Element {
        Element::new(Self::TAG).with(Self::UNIT, self.unit.as_str())
    }

    /// # Errors
    /// A [`ClientError`] if the unit is not the player's, is not aboard a
    /// carrier, or the carrier is not in port.
    pub fn validate(
        &self,
        game: &Game,
        player: &Id<Player>,
    ) -> Result<DisembarkRequest, ClientError> {
        let unit = game
            .resolve_ours::<Unit>(player, &self.unit)
            .map_err(|e| ClientError::resolution(player, "unit", e))?;
        let Location::Carrier(carrier) = &unit.location else {
            return Err(ClientError::new(
                player,
                format!("Unit {} is not aboard a carrier", unit.id),
            ));
        };
        let tile = game
            .tile_of(&unit.location)
            .filter(|t| t.land)
            .ok_or_else(|| {
                ClientError::new(player, format!("Carrier {carrier} is not in port"))
            })?;
        Ok(DisembarkRequest {
            unit: unit.id.clone(),
            carrier: carrier.clone(),
            tile: tile.id.clone(),
        })
    }
}
