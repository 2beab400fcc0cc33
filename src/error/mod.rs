//! Error handling for the relay server.

pub mod types;

pub use types::{ServerError, SettingsError};
