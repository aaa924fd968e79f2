use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::display::TerminalDisplay;
use crate::time::format_since;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    #[serde(default = "default_string")]
    pub sku: String,

    #[serde(default = "default_string")]
    pub title: String,

    #[serde(default = "default_string")]
    pub channel: String,

    /// On-hand units. Can go negative when a channel oversells.
    #[serde(default)]
    pub available: i64,

    #[serde(default)]
    pub inbound: u64,

    #[serde(default)]
    pub reserved: u64,

    #[serde(default)]
    pub reorder_point: u64,

    #[serde(default = "default_time")]
    pub update_time: u64,
}

impl InventoryItem {
    pub fn stock_state(&self) -> &'static str {
        if self.available <= 0 {
            "out"
        } else if (self.available as u64) <= self.reorder_point {
            "low"
        } else {
            "ok"
        }
    }
}

impl TerminalDisplay for InventoryItem {
    fn table_titles() -> Vec<&'static str> {
        vec![
            "SKU", "Title", "Channel", "Available", "Inbound", "Reserved", "Stock", "Update",
        ]
    }

    fn table_row(self) -> Vec<String> {
        let stock = self.stock_state().to_string();
        vec![
            self.sku,
            self.title,
            self.channel,
            self.available.to_string(),
            self.inbound.to_string(),
            self.reserved.to_string(),
            stock,
            format_since(self.update_time),
        ]
    }

    fn table_right_cols() -> Vec<usize> {
        vec![3, 4, 5]
    }

    fn csv_titles() -> Vec<&'static str> {
        vec![
            "sku",
            "title",
            "channel",
            "available",
            "inbound",
            "reserved",
            "reorder_point",
            "update_time",
        ]
    }

    fn csv_row(self) -> HashMap<&'static str, String> {
        vec![
            ("sku", self.sku),
            ("title", self.title),
            ("channel", self.channel),
            ("available", self.available.to_string()),
            ("inbound", self.inbound.to_string()),
            ("reserved", self.reserved.to_string()),
            ("reorder_point", self.reorder_point.to_string()),
            ("update_time", self.update_time.to_string()),
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
