pub mod channel;
pub mod finance;
pub mod inventory;
pub mod order;
pub mod request;
pub mod settlement;
pub mod user;
pub mod webhook;
pub mod worker;
