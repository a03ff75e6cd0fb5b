//! Mock server configuration

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct MockConfig {
    pub addr: SocketAddr,
}

impl MockConfig {
    /// Read `MOCK_ADDR` (default `127.0.0.1`) and `MOCK_PORT` (default 8080)
    pub fn from_env() -> Self {
        let ip = std::env::var("MOCK_ADDR")
            .ok()
            .and_then(|v| v.parse::<IpAddr>().ok())
            .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));
        let port = std::env::var("MOCK_PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        Self {
            addr: SocketAddr::new(ip, port),
        }
    }
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), DEFAULT_PORT),
        }
    }
}
