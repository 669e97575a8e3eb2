//! Health report returned by the `health_check` tool.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Healthy,
    Unhealthy,
}

impl From<bool> for ConnectionState {
    fn from(reachable: bool) -> Self {
        if reachable {
            ConnectionState::Healthy
        } else {
            ConnectionState::Unhealthy
        }
    }
}

/// Snapshot of the backend connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub lm_studio_connection: ConnectionState,
    pub timestamp: DateTime<Utc>,
    pub model: String,
    pub api_url: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.lm_studio_connection == ConnectionState::Healthy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_lowercase_state() {
        let status = HealthStatus {
            lm_studio_connection: ConnectionState::from(false),
            timestamp: Utc::now(),
            model: "local-model".to_string(),
            api_url: "http://localhost:1234/v1".to_string(),
        };
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["lm_studio_connection"], "unhealthy");
        assert_eq!(json["model"], "local-model");
        assert!(json["timestamp"].as_str().unwrap().ends_with('Z'));
        assert!(!status.is_healthy());
    }
}
