use serde::{Deserialize, Serialize};
use std::fmt;

/// A content node that can serve or accept storage requests.
///
/// Only `endpoint` and `delegate_owner_wallet` take part in selection. The
/// remaining fields come from the service provider registry and are carried
/// through untouched.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct StorageNode {
    pub endpoint: String,
    pub delegate_owner_wallet: String,
    #[serde(rename = "spID", default, skip_serializing_if = "Option::is_none")]
    pub sp_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
}

impl StorageNode {
    pub fn new(endpoint: impl Into<String>, delegate_owner_wallet: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            delegate_owner_wallet: delegate_owner_wallet.into(),
            ..Default::default()
        }
    }

    pub fn status_url(&self) -> String {
        format!("{}/status", normalize_endpoint(&self.endpoint))
    }
}

impl fmt::Display for StorageNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.endpoint, self.delegate_owner_wallet)
    }
}

/// Strips surrounding whitespace and any trailing slashes from an endpoint.
pub fn normalize_endpoint(endpoint: &str) -> String {
    endpoint.trim().trim_end_matches('/').to_string()
}
