//! Server core
//!
//! Listening socket, accept loop, broadcast fan-out, and settings.

pub mod broadcast;
pub mod config;
pub mod core;

pub use broadcast::Broadcaster;
pub use config::Settings;
pub use core::Server;
