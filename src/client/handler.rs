//! Per-client inbound handling
//!
//! Reads from one connection and dispatches its data and disconnect events.

use log::debug;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tokio::net::tcp::OwnedReadHalf;
use tokio::sync::Mutex;

use crate::client::registry::ClientRegistry;
use crate::client::state::ClientId;
use crate::server::broadcast::Broadcaster;
use crate::utils::logging::ActivityLog;

/// Upper bound on a single read. One read event is one message; larger
/// payloads are decoded as whatever arrived, with no reassembly.
const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Handles inbound data and disconnection for registered clients.
///
/// Each connection gets one read loop calling `on_data` per read event and
/// `on_disconnected` exactly once when the peer goes away. Removal happens
/// only here; a failed delivery elsewhere never unregisters a client.
#[derive(Clone)]
pub struct MessageRelay {
    registry: Arc<Mutex<ClientRegistry>>,
    broadcaster: Broadcaster,
    log: ActivityLog,
}

impl MessageRelay {
    pub fn new(
        registry: Arc<Mutex<ClientRegistry>>,
        broadcaster: Broadcaster,
        log: ActivityLog,
    ) -> Self {
        Self {
            registry,
            broadcaster,
            log,
        }
    }

    /// Drives one connection until the peer closes it or a read fails,
    /// then runs disconnect cleanup.
    pub async fn run_client(&self, mut read_half: OwnedReadHalf, id: ClientId, addr: SocketAddr) {
        let mut buf = vec![0u8; READ_BUFFER_SIZE];

        loop {
            match read_half.read(&mut buf).await {
                Ok(0) => {
                    // Peer closed the connection
                    break;
                }
                Ok(n) => self.on_data(id, addr, &buf[..n]).await,
                Err(e) => {
                    debug!("read from {} failed: {}", addr, e);
                    break;
                }
            }
        }

        self.on_disconnected(id, addr).await;
    }

    /// One read event from a client.
    ///
    /// Invalid UTF-8 is decoded with replacement characters rather than
    /// aborting the connection. Input that trims to nothing is discarded
    /// with no log entry and no forward.
    pub async fn on_data(&self, id: ClientId, addr: SocketAddr, bytes: &[u8]) {
        let text = String::from_utf8_lossy(bytes);
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return;
        }

        let message = format!("[{}] {}", addr, trimmed);
        self.log.info(message.clone());
        self.broadcaster.broadcast(&message, Some(id)).await;
    }

    /// Disconnect cleanup. Idempotent: a client already gone is a no-op.
    pub async fn on_disconnected(&self, id: ClientId, addr: SocketAddr) {
        let remaining = {
            let mut registry = self.registry.lock().await;
            match registry.remove(id) {
                Some(mut handle) => {
                    handle.begin_disconnect();
                    handle.mark_closed();
                    Some(registry.len())
                }
                None => None,
            }
        };

        let Some(remaining) = remaining else {
            return;
        };

        self.log.info(format!(
            "client disconnected: {} ({} remaining)",
            addr, remaining
        ));

        // The client is already out of the registry, so no exclusion needed.
        self.broadcaster
            .broadcast(&format!("departed: {}", addr), None)
            .await;
    }
}
