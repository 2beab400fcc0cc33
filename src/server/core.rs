//! Connection acceptor and server core.

use log::{debug, error};
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{Mutex, mpsc};

use crate::client::handler::MessageRelay;
use crate::client::registry::ClientRegistry;
use crate::client::state::ClientHandle;
use crate::error::ServerError;
use crate::server::broadcast::Broadcaster;
use crate::utils::logging::ActivityLog;

pub struct Server {
    listener: TcpListener,
    registry: Arc<Mutex<ClientRegistry>>,
    broadcaster: Broadcaster,
    relay: MessageRelay,
    log: ActivityLog,
    next_id: AtomicU64,
}

impl Server {
    /// Binds a listening socket on all interfaces.
    ///
    /// A failed bind (port occupied, no permission) is returned to the
    /// caller with the underlying reason; there is no retry and no
    /// fallback port.
    pub async fn bind(port: u16) -> Result<Self, ServerError> {
        Self::bind_with_log(port, ActivityLog::new()).await
    }

    /// Like [`Server::bind`], with a caller-supplied activity log so a
    /// display surface can subscribe to the entry stream.
    pub async fn bind_with_log(port: u16, log: ActivityLog) -> Result<Self, ServerError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { port, source })?;

        let registry = Arc::new(Mutex::new(ClientRegistry::new()));
        let broadcaster = Broadcaster::new(Arc::clone(&registry), log.clone());
        let relay = MessageRelay::new(Arc::clone(&registry), broadcaster.clone(), log.clone());

        log.info(format!("server listening on port {}", port));

        Ok(Self {
            listener,
            registry,
            broadcaster,
            relay,
            log,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Fan-out entry point for the operator surface.
    pub fn broadcaster(&self) -> Broadcaster {
        self.broadcaster.clone()
    }

    pub async fn client_count(&self) -> usize {
        self.registry.lock().await.len()
    }

    /// Accept loop. A failed accept is logged and the loop keeps serving.
    pub async fn run(&self) {
        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => self.on_incoming_connection(stream, addr).await,
                Err(e) => {
                    error!("error accepting connection: {}", e);
                }
            }
        }
    }

    /// Invoked once per accepted transport connection: registers the
    /// client, greets it, announces the join to everyone else, and spawns
    /// its read loop.
    async fn on_incoming_connection(&self, stream: TcpStream, addr: SocketAddr) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (read_half, write_half) = stream.into_split();

        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(drain_outbound(write_half, rx, addr));

        let handle = ClientHandle::new(id, addr, tx);
        let total = {
            let mut registry = self.registry.lock().await;
            registry.insert(handle.clone());
            registry.len()
        };

        self.log
            .info(format!("client connected: {} ({} total)", addr, total));

        // One-shot greeting; no trailing newline on this line.
        let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        handle.send(format!("Welcome — server time: {}", now));

        self.broadcaster
            .broadcast(&format!("joined: {}", addr), Some(id))
            .await;

        let relay = self.relay.clone();
        tokio::spawn(async move {
            relay.run_client(read_half, id, addr).await;
        });
    }
}

/// Writer task: drains a connection's outbound queue into its socket.
///
/// A write failure ends the task; queued and future messages for this
/// client are dropped silently. The client stays registered until its
/// disconnect event fires.
async fn drain_outbound(
    mut write_half: OwnedWriteHalf,
    mut rx: mpsc::UnboundedReceiver<String>,
    addr: SocketAddr,
) {
    while let Some(text) = rx.recv().await {
        if let Err(e) = write_half.write_all(text.as_bytes()).await {
            debug!("write to {} failed: {}", addr, e);
            break;
        }
    }
    debug!("writer for {} stopped", addr);
}
