use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::display::TerminalDisplay;
use crate::time::format_since;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(default = "default_string")]
    pub name: String,

    #[serde(default = "default_string")]
    pub email: String,

    /// The tenant this account belongs to.
    #[serde(default = "default_string")]
    pub merchant: String,

    #[serde(default = "default_time")]
    pub create_time: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    pub user: User,
}

impl TerminalDisplay for User {
    fn table_titles() -> Vec<&'static str> {
        vec!["Name", "Email", "Merchant", "Create"]
    }

    fn table_row(self) -> Vec<String> {
        vec![
            self.name,
            self.email,
            self.merchant,
            format_since(self.create_time),
        ]
    }

    fn csv_titles() -> Vec<&'static str> {
        vec!["name", "email", "merchant", "create_time"]
    }

    fn csv_row(self) -> HashMap<&'static str, String> {
        vec![
            ("name", self.name),
            ("email", self.email),
            ("merchant", self.merchant),
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
