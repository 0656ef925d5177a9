use serde::{Deserialize, Serialize};

/// Link health as seen by the poller
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum ConnectionState {
    /// No poll has succeeded yet
    #[default]
    Connecting,
    Connected,
    /// Too many consecutive polls failed
    Disconnected,
}

impl ConnectionState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Connecting => "Connecting...",
            Self::Connected => "Connected via Wi-Fi",
            Self::Disconnected => "Disconnected",
        }
    }
}
