//! Module `state`
//!
//! Defines the `ClientHandle` struct representing one live connection,
//! including its connection identifier, remote address, transport state,
//! and the channel feeding its writer task.

use std::net::SocketAddr;
use tokio::sync::mpsc;

/// Unique transport-level connection identifier.
///
/// Allocated from a monotonic counter and never reused within a process,
/// so a reconnecting peer with the same address is a distinct handle.
pub type ClientId = u64;

/// Transport state of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connected,
    Disconnecting,
    Closed,
}

/// Represents one connected peer.
///
/// Owned by the registry from registration until removal; fan-out works on
/// transient clones. Dropping the last clone closes the outbound channel,
/// which terminates the connection's writer task.
#[derive(Debug, Clone)]
pub struct ClientHandle {
    id: ClientId,
    addr: SocketAddr,
    state: ConnectionState,
    outbound: mpsc::UnboundedSender<String>,
}

impl ClientHandle {
    pub fn new(id: ClientId, addr: SocketAddr, outbound: mpsc::UnboundedSender<String>) -> Self {
        Self {
            id,
            addr,
            state: ConnectionState::Connected,
            outbound,
        }
    }

    pub fn id(&self) -> ClientId {
        self.id
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    /// Marks the handle as leaving the registry.
    pub fn begin_disconnect(&mut self) {
        self.state = ConnectionState::Disconnecting;
    }

    /// Marks the handle fully closed. After this the writer task winds down
    /// as soon as the last clone is dropped.
    pub fn mark_closed(&mut self) {
        self.state = ConnectionState::Closed;
    }

    /// Enqueues pre-encoded text for the connection's writer task.
    ///
    /// Returns `false` when the writer is already gone; the caller treats
    /// that as an undelivered write, nothing more.
    pub fn send(&self, text: String) -> bool {
        self.outbound.send(text).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_handle(id: ClientId) -> (ClientHandle, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let addr = "127.0.0.1:4000".parse().unwrap();
        (ClientHandle::new(id, addr, tx), rx)
    }

    #[test]
    fn new_handle_starts_connected() {
        let (handle, _rx) = test_handle(1);
        assert_eq!(handle.state(), ConnectionState::Connected);
        assert!(handle.is_connected());
    }

    #[test]
    fn state_transitions_follow_disconnect_lifecycle() {
        let (mut handle, _rx) = test_handle(1);
        handle.begin_disconnect();
        assert_eq!(handle.state(), ConnectionState::Disconnecting);
        assert!(!handle.is_connected());
        handle.mark_closed();
        assert_eq!(handle.state(), ConnectionState::Closed);
    }

    #[test]
    fn send_delivers_to_writer_channel() {
        let (handle, mut rx) = test_handle(7);
        assert!(handle.send("hello\n".to_string()));
        assert_eq!(rx.try_recv().unwrap(), "hello\n");
    }

    #[test]
    fn send_reports_failure_when_writer_is_gone() {
        let (handle, rx) = test_handle(7);
        drop(rx);
        assert!(!handle.send("hello\n".to_string()));
    }
}
