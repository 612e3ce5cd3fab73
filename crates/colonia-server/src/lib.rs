//! # Colonia server
//!
//! The authoritative side of the Colonia protocol. Bytes come in from a
//! [`Connection`], the [`Dispatcher`] turns them into a validated request,
//! a [`Controller`] applies it to the shared [`Game`](colonia_model::Game),
//! and an `update` or `error` element goes back out.
//!
//! # Key types
//!
//! - [`Controller`]: the game-logic seam, one method per request kind
//! - [`InGameController`]: the reference rules used by the server
//! - [`Dispatcher`]: decode, validate, handle, respond
//! - [`ServerState`]: the game behind a single-writer lock, plus codec
//! - [`serve_connection`]: the per-connection receive loop
//! - [`ServerConfig`]: limits and timeouts
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use colonia_server::prelude::*;
//!
//! # async fn run(game: Game, player: Id<Player>) -> Result<(), ServerError> {
//! let config = ServerConfig::default();
//! init_tracing(&config.log_filter)?;
//!
//! let state = Arc::new(ServerState::new(game, InGameController, JsonCodec, config));
//! let (server_side, _client_side) = ChannelConnection::pair();
//! serve_connection(server_side, player, state).await
//! # }
//! ```

#![allow(async_fn_in_trait)]

mod config;
mod connection;
mod controller;
mod dispatcher;
mod error;
mod logging;
mod server;

pub use config::ServerConfig;
pub use connection::{ChannelConnection, Connection, ConnectionError, ConnectionId};
pub use controller::{Controller, ControllerError, InGameController};
pub use dispatcher::Dispatcher;
pub use error::ServerError;
pub use logging::init_tracing;
pub use server::{ServerState, serve_connection};

/// Everything needed to stand up a server in one import.
pub mod prelude {
    pub use colonia_model::{Game, Id, Player};
    pub use colonia_protocol::{Codec, Element, JsonCodec, Message};

    pub use crate::{
        ChannelConnection, Connection, Controller, Dispatcher, InGameController,
        ServerConfig, ServerError, ServerState, init_tracing, serve_connection,
    };
}
