use serde::{Deserialize, Serialize};

use crate::types::order::{OrderStatus, RiskLevel};

/// Common filter set for list endpoints. Everything is optional; an empty
/// query lists with server defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Query {
    pub offset: Option<u64>,
    pub limit: Option<u64>,

    pub search: Option<String>,

    pub status: Option<OrderStatus>,
    pub risk: Option<RiskLevel>,
    pub channel: Option<String>,

    pub since: Option<u64>,
    pub until: Option<u64>,
}

impl Query {
    /// Render as a URL query string, without the leading '?'. Free-text
    /// values are percent-encoded; empty strings are skipped entirely.
    pub fn to_query_string(&self) -> String {
        let mut params = vec![];
        if let Some(offset) = self.offset {
            params.push(format!("offset={offset}"));
        }
        if let Some(limit) = self.limit {
            params.push(format!("limit={limit}"));
        }
        if let Some(ref search) = self.search {
            if !search.is_empty() {
                params.push(format!("search={}", urlencoding::encode(search)));
            }
        }
        if let Some(status) = self.status {
            params.push(format!("status={}", status.as_str()));
        }
        if let Some(risk) = self.risk {
            params.push(format!("risk={}", risk.as_str()));
        }
        if let Some(ref channel) = self.channel {
            if !channel.is_empty() {
                params.push(format!("channel={}", urlencoding::encode(channel)));
            }
        }
        if let Some(since) = self.since {
            params.push(format!("since={since}"));
        }
        if let Some(until) = self.until {
            params.push(format!("until={until}"));
        }
        params.join("&")
    }
}
