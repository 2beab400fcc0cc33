//! Network utilities
//!
//! Provides network-related utility functions for the operator surface.

use std::net::{IpAddr, Ipv4Addr, UdpSocket};

/// Best-effort discovery of the host's outbound IPv4 address.
///
/// Connecting a UDP socket picks the interface the OS would route through;
/// no packets are sent. Returns `None` when the lookup fails or only
/// loopback is available.
pub fn local_ipv4_addr() -> Option<Ipv4Addr> {
    let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect("8.8.8.8:80").ok()?;
    match socket.local_addr().ok()?.ip() {
        IpAddr::V4(ip) if !ip.is_loopback() => Some(ip),
        _ => None,
    }
}

/// Renders the operator-facing network summary: listening state, port,
/// client count, and the local address clients can reach.
pub fn network_info(port: u16, client_count: usize) -> String {
    let mut info = String::from("=== server network info ===\n");
    info.push_str(&format!("listening port: {}\n", port));
    info.push_str(&format!("connected clients: {}\n", client_count));
    match local_ipv4_addr() {
        Some(ip) => info.push_str(&format!("local address: {}:{}", ip, port)),
        None => info.push_str("local address: unavailable"),
    }
    info
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_info_names_port_and_client_count() {
        let info = network_info(8888, 3);
        assert!(info.contains("8888"));
        assert!(info.contains("connected clients: 3"));
    }

    #[test]
    fn local_ipv4_addr_never_reports_loopback() {
        if let Some(ip) = local_ipv4_addr() {
            assert!(!ip.is_loopback());
        }
    }
}
