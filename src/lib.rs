pub mod client;
pub mod cmd;
pub mod config;
pub mod dash;
pub mod display;
pub mod filelock;
pub mod humanize;
pub mod logs;
pub mod poll;
pub mod table;
pub mod time;
pub mod types;
