use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::display::TerminalDisplay;
use crate::time::format_since;

/// A background job on the server-side sync queue, like "pull orders from
/// shopify" or "push tracking numbers". Read-only from this client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncJob {
    #[serde(default = "default_string")]
    pub id: String,

    #[serde(default = "default_string")]
    pub kind: String,

    #[serde(default = "default_string")]
    pub channel: String,

    #[serde(default)]
    pub state: JobState,

    #[serde(default)]
    pub attempts: u64,

    #[serde(default = "default_time")]
    pub queued_time: u64,

    #[serde(default = "default_time")]
    pub started_time: u64,

    #[serde(default = "default_time")]
    pub finished_time: u64,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    #[default]
    Queued,
    Running,
    Done,
    Failed,
}

impl JobState {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Queued => "queued",
            JobState::Running => "running",
            JobState::Done => "done",
            JobState::Failed => "failed",
        }
    }
}

impl SyncJob {
    pub fn is_active(&self) -> bool {
        matches!(self.state, JobState::Queued | JobState::Running)
    }
}

impl TerminalDisplay for SyncJob {
    fn table_titles() -> Vec<&'static str> {
        vec!["ID", "Kind", "Channel", "State", "Attempts", "Queued", "Error"]
    }

    fn table_row(self) -> Vec<String> {
        vec![
            self.id,
            self.kind,
            self.channel,
            self.state.as_str().to_string(),
            self.attempts.to_string(),
            format_since(self.queued_time),
            self.error.unwrap_or_default(),
        ]
    }

    fn table_right_cols() -> Vec<usize> {
        vec![4]
    }

    fn csv_titles() -> Vec<&'static str> {
        vec![
            "id",
            "kind",
            "channel",
            "state",
            "attempts",
            "queued_time",
            "started_time",
            "finished_time",
            "error",
        ]
    }

    fn csv_row(self) -> HashMap<&'static str, String> {
        vec![
            ("id", self.id),
            ("kind", self.kind),
            ("channel", self.channel),
            ("state", self.state.as_str().to_string()),
            ("attempts", self.attempts.to_string()),
            ("queued_time", self.queued_time.to_string()),
            ("started_time", self.started_time.to_string()),
            ("finished_time", self.finished_time.to_string()),
            ("error", self.error.unwrap_or_default()),
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
