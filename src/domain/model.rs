use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Uniform envelope wrapping every panel API response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub obj: Option<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inbound {
    pub id: i64,
    #[serde(default)]
    pub remark: String,
    #[serde(default)]
    pub client_stats: Vec<ClientStat>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientStat {
    #[serde(default)]
    pub email: String,
    pub enable: bool,
    #[serde(default)]
    pub account_id: i64,
}

/// Aggregated traffic counters for one account, as returned by
/// `/panel/api/account/{id}/traffic`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountTraffic {
    #[serde(default)]
    pub up: i64,
    #[serde(default)]
    pub down: i64,
    #[serde(default)]
    pub total: i64,
}

/// Passthrough record for API objects whose full shape this tool does not own
/// (accounts, account clients). Consumed read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub data: HashMap<String, serde_json::Value>,
}

impl Record {
    /// Wraps a JSON object into a record; non-object values yield None.
    pub fn from_value(value: serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Object(obj) => {
                let mut data = HashMap::new();
                for (key, value) in obj {
                    data.insert(key, value);
                }
                Some(Record { data })
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    pub generated_at: DateTime<Utc>,
    pub inbounds: Vec<InboundSummary>,
    pub accounts: Vec<AccountSummary>,
    pub mismatches: Vec<Mismatch>,
}

impl CheckReport {
    pub fn has_mismatches(&self) -> bool {
        !self.mismatches.is_empty()
    }

    pub fn client_count(&self) -> usize {
        self.inbounds.iter().map(|i| i.clients.len()).sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundSummary {
    pub id: i64,
    pub remark: String,
    pub clients: Vec<ClientStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientStatus {
    pub email: String,
    pub enable: bool,
    pub account_id: i64,
    /// True when the client belongs to an account the operator expects to be disabled.
    pub expected_disabled: bool,
}

/// A client that should have been disabled but is still reported as enabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mismatch {
    pub inbound_id: i64,
    pub remark: String,
    pub email: String,
    pub account_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSummary {
    pub id: i64,
    pub name: String,
    pub client_count: usize,
    pub traffic: Option<AccountTraffic>,
}
