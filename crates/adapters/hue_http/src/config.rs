//! Connection settings shared by every bridge request.

use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_SCHEME: &str = "http";

/// How the controller talks to bridges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HueHttpConfig {
    /// Per-request timeout, in seconds.
    pub timeout_secs: u64,
    /// URL scheme, `http` for bridges on the local network.
    pub scheme: String,
}

impl Default for HueHttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            scheme: DEFAULT_SCHEME.to_string(),
        }
    }
}

impl HueHttpConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
