//! Error types
//!
//! Defines domain-specific error types for each module of the relay server.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Server module errors
#[derive(Debug)]
pub enum ServerError {
    /// The listening port could not be opened. Fatal to service
    /// availability; never retried.
    Bind { port: u16, source: io::Error },
    IoError(io::Error),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::Bind { port, source } => {
                write!(f, "failed to bind port {}: {}", port, source)
            }
            ServerError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ServerError {}

impl From<io::Error> for ServerError {
    fn from(error: io::Error) -> Self {
        ServerError::IoError(error)
    }
}

/// Settings module errors
#[derive(Debug)]
pub enum SettingsError {
    Load(config::ConfigError),
    Serialize(toml::ser::Error),
    Write { path: PathBuf, source: io::Error },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Load(e) => write!(f, "failed to load settings: {}", e),
            SettingsError::Serialize(e) => write!(f, "failed to serialize settings: {}", e),
            SettingsError::Write { path, source } => {
                write!(f, "failed to write settings to {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for SettingsError {}

impl From<config::ConfigError> for SettingsError {
    fn from(error: config::ConfigError) -> Self {
        SettingsError::Load(error)
    }
}

impl From<toml::ser::Error> for SettingsError {
    fn from(error: toml::ser::Error) -> Self {
        SettingsError::Serialize(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_error_names_the_port_and_reason() {
        let source = io::Error::new(io::ErrorKind::AddrInUse, "address in use");
        let err = ServerError::Bind { port: 8888, source };
        let rendered = err.to_string();
        assert!(rendered.contains("8888"));
        assert!(rendered.contains("address in use"));
    }

    #[test]
    fn settings_write_error_names_the_path() {
        let source = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err = SettingsError::Write {
            path: PathBuf::from("/etc/chat-relay.toml"),
            source,
        };
        assert!(err.to_string().contains("/etc/chat-relay.toml"));
    }
}
