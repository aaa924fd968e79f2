use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::display::TerminalDisplay;
use crate::time::format_since;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Webhook {
    #[serde(default = "default_string")]
    pub id: String,

    #[serde(default = "default_string")]
    pub topic: String,

    #[serde(default = "default_string")]
    pub address: String,

    #[serde(default = "default_string")]
    pub channel: String,

    #[serde(default)]
    pub active: bool,

    #[serde(default)]
    pub failure_count: u64,

    #[serde(default = "default_time")]
    pub last_delivery_time: u64,
}

impl TerminalDisplay for Webhook {
    fn table_titles() -> Vec<&'static str> {
        vec![
            "ID", "Topic", "Channel", "Active", "Failures", "Last Delivery",
        ]
    }

    fn table_row(self) -> Vec<String> {
        vec![
            self.id,
            self.topic,
            self.channel,
            self.active.to_string(),
            self.failure_count.to_string(),
            format_since(self.last_delivery_time),
        ]
    }

    fn table_right_cols() -> Vec<usize> {
        vec![4]
    }

    fn csv_titles() -> Vec<&'static str> {
        vec![
            "id",
            "topic",
            "address",
            "channel",
            "active",
            "failure_count",
            "last_delivery_time",
        ]
    }

    fn csv_row(self) -> HashMap<&'static str, String> {
        vec![
            ("id", self.id),
            ("topic", self.topic),
            ("address", self.address),
            ("channel", self.channel),
            ("active", self.active.to_string()),
            ("failure_count", self.failure_count.to_string()),
            ("last_delivery_time", self.last_delivery_time.to_string()),
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
