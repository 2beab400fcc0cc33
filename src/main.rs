//! Chat Relay Server - Entry Point
//!
//! A TCP broadcast relay: each line a client sends is forwarded to every
//! other connected client. Console input stands in for the operator
//! surface and is broadcast to all clients.

use log::{error, info, warn};
use tokio::io::{AsyncBufReadExt, BufReader};

use chat_relay_server::Server;
use chat_relay_server::server::config::{self, Settings};
use chat_relay_server::utils::network;

#[tokio::main]
async fn main() {
    // Initialize the logger (env_logger picks up RUST_LOG environment variable)
    env_logger::init();

    let path = config::settings_path();
    let settings = match Settings::load(&path) {
        Ok(settings) => settings,
        Err(e) => {
            warn!("falling back to default settings: {}", e);
            Settings::default()
        }
    };

    info!("launching relay server on port {}...", settings.server_port);

    let server = match Server::bind(settings.server_port).await {
        Ok(server) => server,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    info!(
        "{}",
        network::network_info(settings.server_port, server.client_count().await)
    );

    tokio::select! {
        _ = server.run() => {}
        _ = operator_console(&server, settings.server_port) => {}
        _ = tokio::signal::ctrl_c() => {
            info!("shutting down");
        }
    }

    // Connections are dropped without a handshake; only the port survives.
    match settings.save(&path) {
        Ok(()) => info!("settings saved to {}", path.display()),
        Err(e) => error!("{}", e),
    }
}

/// Operator console: `/info` renders the network summary, any other
/// non-empty line is broadcast to every connected client.
async fn operator_console(server: &Server, port: u16) {
    let broadcaster = server.broadcaster();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed == "/info" {
            info!(
                "{}",
                network::network_info(port, server.client_count().await)
            );
            continue;
        }

        let message = format!("[server] {}", trimmed);
        info!("{}", message);
        broadcaster.broadcast(&message, None).await;
    }

    // Console gone (stdin closed); keep serving without it.
    std::future::pending::<()>().await;
}
