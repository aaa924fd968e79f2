use std::collections::HashMap;
use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::display::TerminalDisplay;
use crate::humanize::format_money;
use crate::time::format_since;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default = "default_string")]
    pub id: String,

    /// Human-facing order number, like "#1042".
    #[serde(default = "default_string")]
    pub name: String,

    #[serde(default = "default_string")]
    pub channel: String,

    #[serde(default = "default_string")]
    pub customer: String,

    #[serde(default)]
    pub status: OrderStatus,

    #[serde(default)]
    pub risk_level: RiskLevel,

    #[serde(default)]
    pub item_count: u64,

    #[serde(default)]
    pub total_amount: f64,

    #[serde(default = "default_currency")]
    pub currency: String,

    #[serde(default = "default_time")]
    pub create_time: u64,

    #[serde(default = "default_time")]
    pub update_time: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Packed,
    Shipped,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

/// A lifecycle action a user can apply to an order. The server is the
/// authority on whether a transition is legal; [`OrderStatus::available_actions`]
/// only drives what gets offered in listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OrderAction {
    Confirm,
    Pack,
    Ship,
    Cancel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkActionRequest {
    pub ids: Vec<String>,
    pub action: OrderAction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkActionResult {
    #[serde(default)]
    pub succeeded: Vec<String>,

    #[serde(default)]
    pub failed: Vec<BulkFailure>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkFailure {
    #[serde(default = "default_string")]
    pub id: String,

    #[serde(default = "default_string")]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelResponse {
    pub url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub carrier: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking: Option<String>,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Packed => "packed",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn available_actions(&self) -> Vec<OrderAction> {
        match self {
            OrderStatus::Pending => vec![OrderAction::Confirm, OrderAction::Cancel],
            OrderStatus::Confirmed => vec![OrderAction::Pack, OrderAction::Cancel],
            OrderStatus::Packed => vec![OrderAction::Ship, OrderAction::Cancel],
            OrderStatus::Shipped => vec![],
            OrderStatus::Cancelled => vec![],
        }
    }
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl OrderAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderAction::Confirm => "confirm",
            OrderAction::Pack => "pack",
            OrderAction::Ship => "ship",
            OrderAction::Cancel => "cancel",
        }
    }

    /// The status an order lands in when this action succeeds.
    pub fn target_status(&self) -> OrderStatus {
        match self {
            OrderAction::Confirm => OrderStatus::Confirmed,
            OrderAction::Pack => OrderStatus::Packed,
            OrderAction::Ship => OrderStatus::Shipped,
            OrderAction::Cancel => OrderStatus::Cancelled,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for OrderAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TerminalDisplay for Order {
    fn table_titles() -> Vec<&'static str> {
        vec![
            "ID", "Name", "Channel", "Customer", "Status", "Risk", "Items", "Total", "Create",
        ]
    }

    fn table_row(self) -> Vec<String> {
        vec![
            self.id,
            self.name,
            self.channel,
            self.customer,
            self.status.as_str().to_string(),
            self.risk_level.as_str().to_string(),
            self.item_count.to_string(),
            format_money(self.total_amount, &self.currency),
            format_since(self.create_time),
        ]
    }

    fn table_right_cols() -> Vec<usize> {
        vec![6, 7]
    }

    fn csv_titles() -> Vec<&'static str> {
        vec![
            "id",
            "name",
            "channel",
            "customer",
            "status",
            "risk_level",
            "item_count",
            "total_amount",
            "currency",
            "create_time",
        ]
    }

    fn csv_row(self) -> HashMap<&'static str, String> {
        vec![
            ("id", self.id),
            ("name", self.name),
            ("channel", self.channel),
            ("customer", self.customer),
            ("status", self.status.as_str().to_string()),
            ("risk_level", self.risk_level.as_str().to_string()),
            ("item_count", self.item_count.to_string()),
            ("total_amount", format!("{:.2}", self.total_amount)),
            ("currency", self.currency),
            ("create_time", self.create_time.to_string()),
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
