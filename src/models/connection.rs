//! Data store connection status

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Connection probe state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Loading,
    Connected,
    Error,
}

/// Result of the startup connection probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ConnectionStatus {
    pub state: ConnectionState,
    /// Human-readable summary
    pub message: String,
    /// Underlying error, when the probe failed
    pub detail: Option<String>,
    pub checked_at: Option<DateTime<Utc>>,
}

impl ConnectionStatus {
    pub fn loading() -> Self {
        Self {
            state: ConnectionState::Loading,
            message: "Checking data store connection".to_string(),
            detail: None,
            checked_at: None,
        }
    }

    pub fn connected() -> Self {
        Self {
            state: ConnectionState::Connected,
            message: "Connected to data store".to_string(),
            detail: None,
            checked_at: Some(Utc::now()),
        }
    }

    pub fn error(detail: impl Into<String>) -> Self {
        Self {
            state: ConnectionState::Error,
            message: "Data store unreachable".to_string(),
            detail: Some(detail.into()),
            checked_at: Some(Utc::now()),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }
}

impl Default for ConnectionStatus {
    fn default() -> Self {
        Self::loading()
    }
}
