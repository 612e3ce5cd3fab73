//! The byte pipe a player talks to the server through.
//!
//! [`Connection`] only moves whole messages; framing and socket details
//! belong to whatever implements it. [`ChannelConnection`] is an
//! in-process implementation over tokio channels, used by embedded servers
//! and by the tests.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{Mutex, mpsc};

/// Opaque identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn into_inner(self) -> u64 {
        self.0
    }

    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Errors from sending or receiving.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// The connection, or its peer, was closed.
    #[error("connection closed: {0}")]
    Closed(String),
}

/// A single connection that sends and receives whole messages.
pub trait Connection: Send + Sync + 'static {
    /// Sends one message to the peer.
    async fn send(&self, data: &[u8]) -> Result<(), ConnectionError>;

    /// Receives the next message.
    ///
    /// Returns `Ok(None)` once the peer has closed its side.
    async fn recv(&self) -> Result<Option<Vec<u8>>, ConnectionError>;

    /// Closes the sending side. The peer's `recv` then returns `None`.
    async fn close(&self) -> Result<(), ConnectionError>;

    fn id(&self) -> ConnectionId;
}

// ---------------------------------------------------------------------------
// ChannelConnection
// ---------------------------------------------------------------------------

/// One end of an in-memory connection.
pub struct ChannelConnection {
    id: ConnectionId,
    /// `None` once closed.
    tx: Mutex<Option<mpsc::UnboundedSender<Vec<u8>>>>,
    rx: Mutex<mpsc::UnboundedReceiver<Vec<u8>>>,
}

impl ChannelConnection {
    /// Creates two connected ends. What one sends, the other receives.
    pub fn pair() -> (Self, Self) {
        let (a_tx, b_rx) = mpsc::unbounded_channel();
        let (b_tx, a_rx) = mpsc::unbounded_channel();
        let a = Self {
            id: ConnectionId::next(),
            tx: Mutex::new(Some(a_tx)),
            rx: Mutex::new(a_rx),
        };
        let b = Self {
            id: ConnectionId::next(),
            tx: Mutex::new(Some(b_tx)),
            rx: Mutex::new(b_rx),
        };
        (a, b)
    }
}

impl Connection for ChannelConnection {
    async fn send(&self, data: &[u8]) -> Result<(), ConnectionError> {
        let tx = self.tx.lock().await;
        let Some(tx) = tx.as_ref() else {
            return Err(ConnectionError::Closed(format!("{} already closed", self.id)));
        };
        tx.send(data.to_vec())
            .map_err(|_| ConnectionError::Closed(format!("peer of {} dropped", self.id)))
    }

    async fn recv(&self) -> Result<Option<Vec<u8>>, ConnectionError> {
        Ok(self.rx.lock().await.recv().await)
    }

    async fn close(&self) -> Result<(), ConnectionError> {
        self.tx.lock().await.take();
        Ok(())
    }

    fn id(&self) -> ConnectionId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_id_display() {
        assert_eq!(ConnectionId::new(7).to_string(), "conn-7");
        assert_eq!(ConnectionId::new(7).into_inner(), 7);
    }

    #[tokio::test]
    async fn test_pair_delivers_both_ways() {
        let (a, b) = ChannelConnection::pair();
        assert_ne!(a.id(), b.id());

        a.send(b"ping").await.unwrap();
        assert_eq!(b.recv().await.unwrap(), Some(b"ping".to_vec()));

        b.send(b"pong").await.unwrap();
        assert_eq!(a.recv().await.unwrap(), Some(b"pong".to_vec()));
    }

    #[tokio::test]
    async fn test_close_ends_peer_stream() {
        let (a, b) = ChannelConnection::pair();
        a.send(b"last").await.unwrap();
        a.close().await.unwrap();

        assert_eq!(b.recv().await.unwrap(), Some(b"last".to_vec()));
        assert_eq!(b.recv().await.unwrap(), None);
        assert!(matches!(
            a.send(b"more").await,
            Err(ConnectionError::Closed(_))
        ));
    }

    #[tokio::test]
    async fn test_send_to_dropped_peer_fails() {
        let (a, b) = ChannelConnection::pair();
        drop(b);
        assert!(a.send(b"anyone?").await.is_err());
    }
}
