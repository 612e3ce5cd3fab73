//! Integration tests for the connection loop: bytes in, bytes out, over an
//! in-memory connection.

use std::sync::Arc;
use std::time::Duration;

use colonia_model::{Direction, Location};
use colonia_protocol::fixtures::World;
use colonia_protocol::{
    AskSkillMessage, Codec, DisembarkMessage, JsonCodec, Message, MoveMessage,
};
use colonia_server::{
    ChannelConnection, Connection, InGameController, ServerConfig, ServerState,
    serve_connection,
};

type State = ServerState<InGameController, JsonCodec>;

fn state(w: &World, config: ServerConfig) -> Arc<State> {
    Arc::new(ServerState::new(w.game.clone(), InGameController, JsonCodec, config))
}

async fn request(client: &ChannelConnection, message: impl Into<Message>) -> Message {
    let bytes = JsonCodec.encode(&message.into().to_element()).unwrap();
    client.send(&bytes).await.unwrap();
    let reply = tokio::time::timeout(Duration::from_secs(2), client.recv())
        .await
        .expect("reply within timeout")
        .unwrap()
        .expect("connection still open");
    Message::from_element(&JsonCodec.decode(&reply).unwrap()).unwrap()
}

#[tokio::test]
async fn test_requests_are_answered_in_order() {
    let w = World::new();
    let state = state(&w, ServerConfig::default());
    let (server_side, client) = ChannelConnection::pair();
    let task = tokio::spawn(serve_connection(server_side, w.dutch.clone(), Arc::clone(&state)));

    let reply = request(&client, DisembarkMessage::new(w.unit(&w.passenger))).await;
    assert_eq!(reply.tag(), "update");

    let reply = request(&client, DisembarkMessage::new(w.unit(&w.sea_passenger))).await;
    assert_eq!(reply.tag(), "error");

    client.close().await.unwrap();
    task.await.unwrap().unwrap();

    let game = state.snapshot().await;
    assert_eq!(
        game.get(&w.passenger).unwrap().location,
        Location::Tile(w.tile(2, 2))
    );
}

#[tokio::test]
async fn test_garbage_bytes_get_an_error_and_the_connection_survives() {
    let w = World::new();
    let state = state(&w, ServerConfig::default());
    let (server_side, client) = ChannelConnection::pair();
    let task = tokio::spawn(serve_connection(server_side, w.dutch.clone(), Arc::clone(&state)));

    client.send(b"{not json").await.unwrap();
    let reply = client.recv().await.unwrap().unwrap();
    let Message::Error(err) = Message::from_element(&JsonCodec.decode(&reply).unwrap()).unwrap()
    else {
        panic!("expected an error reply");
    };
    assert!(err.message().starts_with("Malformed message:"));

    let reply = request(&client, MoveMessage::new(w.unit(&w.colonist), Direction::S)).await;
    assert_eq!(reply.tag(), "update");

    client.close().await.unwrap();
    task.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_two_players_share_one_game() {
    let w = World::new();
    let state = state(&w, ServerConfig::default());

    let (dutch_server, dutch_client) = ChannelConnection::pair();
    let (english_server, english_client) = ChannelConnection::pair();
    let dutch_task =
        tokio::spawn(serve_connection(dutch_server, w.dutch.clone(), Arc::clone(&state)));
    let english_task =
        tokio::spawn(serve_connection(english_server, w.english.clone(), Arc::clone(&state)));

    let ask = AskSkillMessage::new(w.unit(&w.colonist), Direction::E);
    // The English player cannot act for a Dutch unit.
    let reply = request(&english_client, ask.clone()).await;
    assert_eq!(reply.tag(), "error");
    let reply = request(&dutch_client, ask).await;
    assert_eq!(reply.tag(), "update");

    dutch_client.close().await.unwrap();
    english_client.close().await.unwrap();
    dutch_task.await.unwrap().unwrap();
    english_task.await.unwrap().unwrap();

    let game = state.snapshot().await;
    assert_eq!(
        game.get(&w.settlement).unwrap().skill_told,
        vec![w.dutch.clone()]
    );
}

#[tokio::test]
async fn test_idle_connection_times_out() {
    let w = World::new();
    let config = ServerConfig {
        recv_timeout: Duration::from_millis(50),
        ..ServerConfig::default()
    };
    let state = state(&w, config);
    let (server_side, client) = ChannelConnection::pair();
    let task = tokio::spawn(serve_connection(server_side, w.dutch.clone(), state));

    tokio::time::timeout(Duration::from_secs(2), task)
        .await
        .expect("server gave up on the idle connection")
        .unwrap()
        .unwrap();
    // The server closed its side.
    assert_eq!(client.recv().await.unwrap(), None);
}
