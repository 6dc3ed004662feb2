use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Body of a `GET /api/status` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiStatus {
    /// Provider identifier to whether its credential is configured.
    #[serde(default)]
    pub apis: BTreeMap<String, bool>,

    /// Server time of the check.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl ApiStatus {
    /// Availability of a provider.  Providers the server omits count as available.
    pub fn is_available(&self, id: &str) -> bool {
        self.apis.get(id).copied().unwrap_or(true)
    }
}

/// Body of a `GET /health` response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthStatus {
    /// `healthy` when the server is up.
    pub status: String,

    /// Server time of the check.
    pub timestamp: String,

    /// Server version, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Provider availability, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apis: Option<BTreeMap<String, bool>>,
}

impl HealthStatus {
    /// Returns true if the server reports itself healthy.
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}
