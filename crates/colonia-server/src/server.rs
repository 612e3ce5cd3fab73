//! Shared server state and the per-connection loop.
//!
//! The authoritative [`Game`] sits behind one async mutex. Each request
//! holds the lock from validation through handling, so a request is always
//! validated against the state it will be applied to, and requests from
//! different connections never interleave.

use std::sync::Arc;

use colonia_model::{Game, Id, Player};
use colonia_protocol::{ClientError, Codec};
use tokio::sync::Mutex;

use crate::{Connection, Controller, Dispatcher, ServerConfig, ServerError};

/// State shared by every connection task.
///
/// Wrapped in `Arc` and handed to [`serve_connection`].
pub struct ServerState<C: Controller, K: Codec> {
    game: Mutex<Game>,
    dispatcher: Dispatcher<C>,
    codec: K,
    config: ServerConfig,
}

impl<C: Controller, K: Codec> ServerState<C, K> {
    pub fn new(game: Game, controller: C, codec: K, config: ServerConfig) -> Self {
        Self {
            game: Mutex::new(game),
            dispatcher: Dispatcher::new(controller, &config),
            codec,
            config,
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// A copy of the current game.
    pub async fn snapshot(&self) -> Game {
        self.game.lock().await.clone()
    }

    /// Decodes one request, runs it and encodes the response.
    ///
    /// Bytes that do not decode into an element still get an `error`
    /// response.
    ///
    /// # Errors
    /// [`ServerError::Protocol`] if the response cannot be encoded.
    pub async fn handle_bytes(
        &self,
        player: &Id<Player>,
        data: &[u8],
    ) -> Result<Vec<u8>, ServerError> {
        let response = match self.codec.decode(data) {
            Ok(element) => {
                let mut game = self.game.lock().await;
                self.dispatcher.dispatch(&mut game, player, &element)
            }
            Err(e) => {
                tracing::debug!(%player, error = %e, "failed to decode request");
                ClientError::new(player, format!("Malformed message: {e}")).to_element()
            }
        };
        Ok(self.codec.encode(&response)?)
    }
}

/// Serves one player's connection until it closes, errors or goes quiet
/// for longer than [`ServerConfig::recv_timeout`].
///
/// Requests are handled one at a time, in the order they arrive, and every
/// request gets exactly one response.
///
/// # Errors
/// [`ServerError::Connection`] if a response cannot be sent, or
/// [`ServerError::Protocol`] if one cannot be encoded.
pub async fn serve_connection<C, K, T>(
    conn: T,
    player: Id<Player>,
    state: Arc<ServerState<C, K>>,
) -> Result<(), ServerError>
where
    C: Controller,
    K: Codec,
    T: Connection,
{
    let conn_id = conn.id();
    tracing::info!(%conn_id, %player, "serving connection");

    loop {
        let data = match tokio::time::timeout(state.config.recv_timeout, conn.recv()).await {
            Ok(Ok(Some(data))) => data,
            Ok(Ok(None)) => {
                tracing::info!(%conn_id, %player, "connection closed cleanly");
                break;
            }
            Ok(Err(e)) => {
                tracing::debug!(%conn_id, %player, error = %e, "recv error");
                break;
            }
            Err(_) => {
                tracing::info!(%conn_id, %player, "connection timed out");
                break;
            }
        };

        let response = state.handle_bytes(&player, &data).await?;
        conn.send(&response).await?;
    }

    conn.close().await?;
    Ok(())
}
