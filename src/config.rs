//! Client configuration.

use crate::normalize::EtherFormat;
use std::time::Duration;

/// The default request and connection timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration shared by the client transports.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Configuration {
    /// Timeout for a complete request, including reading the response.
    pub timeout: Duration,
    /// Timeout for establishing a connection to the node.
    pub connect_timeout: Duration,
    /// How amounts converted from wei are rendered.
    pub ether: EtherFormat,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_TIMEOUT,
            ether: EtherFormat::default(),
        }
    }
}
