use log::{debug, info, warn};
use serde::Serialize;
use web_time::Instant;

use crate::board::Board;
use crate::codec;
use crate::error::{Error, Result};

/// Send half of an already-established message connection to one peer.
pub trait Transport {
    fn send_text(&self, payload: &str) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Disconnected,
    Connected,
}

/// Keeps a peer's view in step with local snapshots.
///
/// Outbound snapshots are fire-and-forget. Inbound snapshots are decoded and
/// returned for the owner to install unconditionally: last message wins.
pub struct SyncChannel<T> {
    transport: T,
    state: ConnectionState,
    closed: bool,
    opened_at: Option<Instant>,
    sent: u64,
    received: u64,
}

impl<T: Transport> SyncChannel<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            state: ConnectionState::Disconnected,
            closed: false,
            opened_at: None,
            sent: 0,
            received: 0,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Number of snapshots handed to the transport without error.
    pub fn sent(&self) -> u64 {
        self.sent
    }

    /// Number of inbound snapshots that decoded.
    pub fn received(&self) -> u64 {
        self.received
    }

    /// Disconnected -> Connected. Ignored once the channel has closed.
    pub fn on_open(&mut self) {
        if self.closed {
            warn!("open event after close ignored");
            return;
        }
        if self.state == ConnectionState::Connected {
            return;
        }
        self.state = ConnectionState::Connected;
        self.opened_at = Some(Instant::now());
        info!("sync channel connected");
    }

    /// Connected -> Disconnected. Terminal.
    pub fn on_close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.state = ConnectionState::Disconnected;
        let uptime = self.opened_at.map(|opened| opened.elapsed());
        info!(
            "sync channel closed after {:?} (sent {}, received {})",
            uptime, self.sent, self.received
        );
    }

    /// Sends the whole snapshot as one message.
    ///
    /// Failures, including publishing while disconnected, are logged and
    /// swallowed; the caller's board stays authoritative locally.
    pub fn publish(&mut self, board: &Board) {
        if let Err(err) = self.try_publish(board) {
            warn!("dropping outbound snapshot {:08x}: {err}", board.fingerprint());
        }
    }

    fn try_publish(&mut self, board: &Board) -> Result<()> {
        if self.state != ConnectionState::Connected {
            return Err(Error::Send("connection is not open".to_string()));
        }
        let payload = codec::encode(board)?;
        self.transport.send_text(&payload)?;
        self.sent += 1;
        debug!("sent snapshot {:08x}", board.fingerprint());
        Ok(())
    }

    /// Decodes one inbound message into the snapshot to install.
    pub fn receive(&mut self, text: &str) -> Result<Board> {
        let board = codec::decode(text)?;
        self.received += 1;
        debug!("received snapshot {:08x}", board.fingerprint());
        Ok(board)
    }
}
