use std::collections::HashMap;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::display::TerminalDisplay;
use crate::time::format_since;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    #[serde(default = "default_string")]
    pub id: String,

    #[serde(default = "default_string")]
    pub name: String,

    #[serde(default)]
    pub kind: ChannelKind,

    #[serde(default)]
    pub connected: bool,

    #[serde(default)]
    pub auth: ChannelAuth,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shop_domain: Option<String>,

    #[serde(default = "default_time")]
    pub last_sync_time: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Shopify,
    Amazon,
    Ebay,
    /// Anything the server knows about that this build does not.
    #[serde(other)]
    #[default]
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelAuth {
    Oauth,
    #[default]
    ApiKey,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectChannelRequest {
    pub name: String,
    pub kind: ChannelKind,
    pub api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopifyConnectRequest {
    pub shop_domain: String,
}

/// The server answers a Shopify connect with the OAuth consent URL the
/// merchant has to open in a browser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopifyConnectResponse {
    pub redirect_url: String,
}

impl ChannelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelKind::Shopify => "shopify",
            ChannelKind::Amazon => "amazon",
            ChannelKind::Ebay => "ebay",
            ChannelKind::Custom => "custom",
        }
    }
}

impl ChannelAuth {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelAuth::Oauth => "oauth",
            ChannelAuth::ApiKey => "api_key",
        }
    }
}

impl TerminalDisplay for Channel {
    fn table_titles() -> Vec<&'static str> {
        vec!["ID", "Name", "Kind", "Connected", "Auth", "Last Sync"]
    }

    fn table_row(self) -> Vec<String> {
        vec![
            self.id,
            self.name,
            self.kind.as_str().to_string(),
            self.connected.to_string(),
            self.auth.as_str().to_string(),
            format_since(self.last_sync_time),
        ]
    }

    fn csv_titles() -> Vec<&'static str> {
        vec![
            "id",
            "name",
            "kind",
            "connected",
            "auth",
            "shop_domain",
            "last_sync_time",
        ]
    }

    fn csv_row(self) -> HashMap<&'static str, String> {
        vec![
            ("id", self.id),
            ("name", self.name),
            ("kind", self.kind.as_str().to_string()),
            ("connected", self.connected.to_string()),
            ("auth", self.auth.as_str().to_string()),
            ("shop_domain", self.shop_domain.unwrap_or_default()),
            ("last_sync_time", self.last_sync_time.to_string()),
        ]
        .into_iter()
        .collect()
    }
}

fn default_time() -> u64 {
    0
}

fn default_string() -> String {
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_kind_falls_back() {
        let channel: Channel =
            serde_json::from_str(r#"{"id": "ch_1", "kind": "walmart"}"#).unwrap();
        assert_eq!(channel.kind, ChannelKind::Custom);
    }
}
