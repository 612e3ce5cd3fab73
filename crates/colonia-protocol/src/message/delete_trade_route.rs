//! `deleteTradeRoute`: a player deletes one of their trade routes.

use colonia_model::{Game, Id, Player, TradeRoute};

use super::ClientError;
use crate::Element;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteTradeRouteMessage {
    pub trade_route: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteTradeRouteRequest {
    trade_route: Id<TradeRoute>,
}

impl DeleteTradeRouteRequest {
    pub fn trade_route(&self) -> &Id<TradeRoute> {
        &self.trade_route
    }
}

impl DeleteTradeRouteMessage {
    pub const TAG: &'static str = "deleteTradeRoute";
    const TRADE_ROUTE: &'static str = "tradeRoute";

    pub fn new(route: &TradeRoute) -> Self {
        Self {
            trade_route: route.id.to_string(),
        }
    }

    pub fn from_element(element: &Element) -> Self {
        Self {
            trade_route: element.string(Self::TRADE_ROUTE),
        }
    }

    pub fn to_element(&self) -> Element {
        Element::new(Self::TAG).with(Self::TRADE_ROUTE, self.trade_route.as_str())
    }

    /// # Errors
    /// A [`ClientError`] if the route does not exist or is not the player's.
    pub fn validate(
        &self,
        game: &Game,
        player: &Id<Player>,
    ) -> Result<DeleteTradeRouteRequest, ClientError> {
        let route = game
            .resolve_ours::<TradeRoute>(player, &self.trade_route)
            .map_err(|e| ClientError::resolution(player, "trade route", e))?;
        Ok(DeleteTradeRouteRequest {
            trade_route: route.id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::World;

    #[test]
    fn test_own_route() {
        let w = World::new();
        let route = w.game.get(&w.dutch_route).unwrap();
        let req = DeleteTradeRouteMessage::new(route)
            .validate(&w.game, &w.dutch)
            .unwrap();
        assert_eq!(req.trade_route(), &w.dutch_route);
    }

    #[test]
    fn test_foreign_route() {
        let w = World::new();
        let msg = DeleteTradeRouteMessage {
            trade_route: w.english_route.to_string(),
        };
        let err = msg.validate(&w.game, &w.dutch).unwrap_err();
        assert!(err.message().starts_with("Invalid trade route:"));
        assert!(err.message().contains(w.english_route.as_str()));
    }

    #[test]
    fn test_wrong_kind() {
        let w = World::new();
        let msg = DeleteTradeRouteMessage {
            trade_route: w.colony.to_string(),
        };
        let err = msg.validate(&w.game, &w.dutch).unwrap_err();
        assert!(err.message().contains("not a trade route"), "{}", err.message());
    }

    #[test]
    fn test_missing_attribute_is_empty_identifier() {
        let w = World::new();
        let msg = DeleteTradeRouteMessage::from_element(&Element::new("deleteTradeRoute"));
        let err = msg.validate(&w.game, &w.dutch).unwrap_err();
        assert_eq!(err.message(), "Invalid trade route: empty identifier");
    }
}
