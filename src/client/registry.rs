//! Client registry
//!
//! Manages registered clients and their tracking.

use crate::client::state::{ClientHandle, ClientId};
use std::collections::HashMap;

/// Registry for tracking active clients.
///
/// The single place connections are added and removed. Fan-out never
/// iterates the live map; it takes a snapshot so a removal can never race
/// an in-flight delivery pass.
pub struct ClientRegistry {
    clients: HashMap<ClientId, ClientHandle>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self {
            clients: HashMap::new(),
        }
    }

    pub fn insert(&mut self, handle: ClientHandle) {
        self.clients.insert(handle.id(), handle);
    }

    pub fn remove(&mut self, id: ClientId) -> Option<ClientHandle> {
        self.clients.remove(&id)
    }

    pub fn contains(&self, id: ClientId) -> bool {
        self.clients.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Stable snapshot of the current membership for fan-out.
    pub fn snapshot(&self) -> Vec<ClientHandle> {
        self.clients.values().cloned().collect()
    }
}

impl Default for ClientRegistry {
    fn default() -> Self {
        Self::new()
    }
}
