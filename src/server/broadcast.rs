//! Broadcast fan-out
//!
//! Delivers one message to every registered connected client, optionally
//! excluding the originator.

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::client::registry::ClientRegistry;
use crate::client::state::ClientId;
use crate::utils::logging::ActivityLog;

/// Fan-out entry point for operator- and relay-originated messages.
#[derive(Clone)]
pub struct Broadcaster {
    registry: Arc<Mutex<ClientRegistry>>,
    log: ActivityLog,
}

impl Broadcaster {
    pub fn new(registry: Arc<Mutex<ClientRegistry>>, log: ActivityLog) -> Self {
        Self { registry, log }
    }

    /// Sends `text` plus a line terminator to every connected client except
    /// `exclude`. Delivery is fire-and-forget: a client whose writer is
    /// already gone is skipped in the tally and never retried. Returns the
    /// number of clients the message was handed to.
    pub async fn broadcast(&self, text: &str, exclude: Option<ClientId>) -> usize {
        // Snapshot under the lock, write outside it.
        let targets = self.registry.lock().await.snapshot();

        let mut line = String::with_capacity(text.len() + 1);
        line.push_str(text);
        line.push('\n');

        let mut delivered = 0;
        for client in &targets {
            if Some(client.id()) == exclude || !client.is_connected() {
                continue;
            }
            if client.send(line.clone()) {
                delivered += 1;
            }
        }

        if delivered > 0 {
            self.log
                .info(format!("message delivered to {} clients", delivered));
        }

        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::state::ClientHandle;
    use tokio::sync::mpsc;

    fn broadcaster() -> (Broadcaster, Arc<Mutex<ClientRegistry>>) {
        let registry = Arc::new(Mutex::new(ClientRegistry::new()));
        let b = Broadcaster::new(Arc::clone(&registry), ActivityLog::new());
        (b, registry)
    }

    async fn register(
        registry: &Arc<Mutex<ClientRegistry>>,
        id: ClientId,
        port: u16,
    ) -> mpsc::UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        let addr = format!("127.0.0.1:{port}").parse().unwrap();
        registry.lock().await.insert(ClientHandle::new(id, addr, tx));
        rx
    }

    #[tokio::test]
    async fn broadcast_reaches_every_client_without_exclusion() {
        let (broadcaster, registry) = broadcaster();
        let mut rx_a = register(&registry, 1, 6001).await;
        let mut rx_b = register(&registry, 2, 6002).await;

        let delivered = broadcaster.broadcast("test", None).await;

        assert_eq!(delivered, 2);
        assert_eq!(rx_a.try_recv().unwrap(), "test\n");
        assert_eq!(rx_b.try_recv().unwrap(), "test\n");
    }

    #[tokio::test]
    async fn broadcast_excludes_by_identity() {
        let (broadcaster, registry) = broadcaster();
        let mut rx_a = register(&registry, 1, 6001).await;
        let mut rx_b = register(&registry, 2, 6002).await;

        let delivered = broadcaster.broadcast("hello", Some(1)).await;

        assert_eq!(delivered, 1);
        assert!(rx_a.try_recv().is_err());
        assert_eq!(rx_b.try_recv().unwrap(), "hello\n");
    }

    #[tokio::test]
    async fn broadcast_with_no_clients_delivers_zero() {
        let (broadcaster, _registry) = broadcaster();
        assert_eq!(broadcaster.broadcast("test", None).await, 0);
    }

    #[tokio::test]
    async fn dead_writer_does_not_count_toward_tally() {
        let (broadcaster, registry) = broadcaster();
        let rx_dead = register(&registry, 1, 6001).await;
        let mut rx_live = register(&registry, 2, 6002).await;
        drop(rx_dead);

        let delivered = broadcaster.broadcast("still here", None).await;

        assert_eq!(delivered, 1);
        assert_eq!(rx_live.try_recv().unwrap(), "still here\n");
        // The dead client stays registered; only the disconnect event removes it.
        assert_eq!(registry.lock().await.len(), 2);
    }
}
