use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::display::TerminalDisplay;
use crate::humanize::format_money;
use crate::time::format_since;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settlement {
    #[serde(default = "default_string")]
    pub id: String,

    #[serde(default = "default_string")]
    pub channel: String,

    #[serde(default = "default_time")]
    pub period_start: u64,

    #[serde(default = "default_time")]
    pub period_end: u64,

    #[serde(default)]
    pub gross: f64,

    #[serde(default)]
    pub fees: f64,

    #[serde(default)]
    pub refunds: f64,

    #[serde(default)]
    pub net: f64,

    #[serde(default = "default_currency")]
    pub currency: String,

    /// Channel-defined settlement state, like "open" or "paid". Kept as a
    /// plain string since each channel has its own vocabulary.
    #[serde(default = "default_string")]
    pub status: String,
}

impl TerminalDisplay for Settlement {
    fn table_titles() -> Vec<&'static str> {
        vec![
            "ID", "Channel", "Gross", "Fees", "Refunds", "Net", "Status", "Period End",
        ]
    }

    fn table_row(self) -> Vec<String> {
        vec![
            self.id,
            self.channel,
            format_money(self.gross, &self.currency),
            format_money(self.fees, &self.currency),
            format_money(self.refunds, &self.currency),
            format_money(self.net, &self.currency),
            self.status,
            format_since(self.period_end),
        ]
    }

    fn table_right_cols() -> Vec<usize> {
        vec![2, 3, 4, 5]
    }

    fn csv_titles() -> Vec<&'static str> {
        vec![
            "id",
            "channel",
            "period_start",
            "period_end",
            "gross",
            "fees",
            "refunds",
            "net",
            "currency",
            "status",
        ]
    }

    fn csv_row(self) -> HashMap<&'static str, String> {
        vec![
            ("id", self.id),
            ("channel", self.channel),
            ("period_start", self.period_start.to_string()),
            ("period_end", self.period_end.to_string()),
            ("gross", format!("{:.2}", self.gross)),
            ("fees", format!("{:.2}", self.fees)),
            ("refunds", format!("{:.2}", self.refunds)),
            ("net", format!("{:.2}", self.net)),
            ("currency", self.currency),
            ("status", self.status),
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

fn default_currency() -> String {
    String::from("USD")
}
