//! Decode, validate, handle, respond.
//!
//! The dispatcher is the one place where the message lifecycle runs end to
//! end. Every element it is given produces exactly one response element:
//! an `update` when the controller applied the request, or an `error`
//! carrying the reason it did not.

use colonia_model::{Game, Id, Player};
use colonia_protocol::{ClientError, Element, Message};

use crate::{Controller, ServerConfig};

/// Routes incoming elements to a [`Controller`].
pub struct Dispatcher<C: Controller> {
    controller: C,
    max_arrangements: usize,
}

impl<C: Controller> Dispatcher<C> {
    pub fn new(controller: C, config: &ServerConfig) -> Self {
        Self {
            controller,
            max_arrangements: config.max_arrangements,
        }
    }

    /// Processes one request from `player` and returns the response.
    ///
    /// The caller must hold the game's write lock. The game is only changed
    /// when validation succeeded and the controller applied the request.
    pub fn dispatch(&self, game: &mut Game, player: &Id<Player>, element: &Element) -> Element {
        let message = match Message::from_element(element) {
            Ok(message) => message,
            Err(e) => {
                tracing::debug!(%player, error = %e, "undecodable request");
                return ClientError::new(player, format!("Unknown message: {}", element.tag()))
                    .to_element();
            }
        };
        let tag = message.tag();
        if !message.is_request() {
            tracing::debug!(%player, tag, "client sent a response message");
            return ClientError::new(player, format!("Unexpected message: {tag}")).to_element();
        }

        if let Message::RearrangeColony(m) = &message {
            if m.arrangements.len() > self.max_arrangements {
                tracing::debug!(%player, count = m.arrangements.len(), "batch over limit");
                return ClientError::new(
                    player,
                    format!(
                        "Too many arrangements: {} (limit {})",
                        m.arrangements.len(),
                        self.max_arrangements
                    ),
                )
                .to_element();
            }
        }

        let request = match message.validate(game, player) {
            Ok(request) => request,
            Err(rejection) => {
                tracing::debug!(%player, tag, reason = %rejection, "request rejected");
                return rejection.to_element();
            }
        };

        match self.controller.handle(game, player, &request) {
            Ok(update) => {
                tracing::info!(%player, tag, changes = update.changes.len(), "request handled");
                update.to_element()
            }
            Err(e) => {
                tracing::warn!(%player, tag, error = %e, "controller failed");
                ClientError::new(player, format!("Server error handling {tag}: {e}")).to_element()
            }
        }
    }
}
