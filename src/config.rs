//! Process configuration for the WFD server and client binaries.

use crate::wfd::constants::DEFAULT_PORT;

/// Configuration shared by both the source (server) and sink (client)
/// binaries. Builder-style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// TCP port to listen on (source) or connect to (sink).
    pub port: u16,
    /// Address to bind (source) or connect to (sink).
    pub bind_address: String,
    /// Idle session timeout, in seconds.
    pub session_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind_address: "0.0.0.0".to_string(),
            session_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Defaults: the WFD well-known port, all interfaces, a 30s timeout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the port.
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Override the bind/connect address.
    #[must_use]
    pub fn bind_address(mut self, address: impl Into<String>) -> Self {
        self.bind_address = address.into();
        self
    }

    /// Override the idle session timeout.
    #[must_use]
    pub fn session_timeout_secs(mut self, secs: u64) -> Self {
        self.session_timeout_secs = secs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_port_is_the_wfd_well_known_port() {
        assert_eq!(Config::default().port, 7236);
    }

    #[test]
    fn builder_methods_chain() {
        let config = Config::new().port(9999).bind_address("127.0.0.1");
        assert_eq!(config.port, 9999);
        assert_eq!(config.bind_address, "127.0.0.1");
    }
}
