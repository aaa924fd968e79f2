mod channel;
mod config;
mod dash;
mod get;
mod login;
mod logout;
mod order;
mod whoami;

use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::client::factory::ClientFactory;
use crate::config::PathSet;
use crate::logs;
use crate::time::parse_time;
use crate::types::order::{OrderStatus, RiskLevel};
use crate::types::request::Query;

#[async_trait]
pub trait RunCommand {
    async fn run(&self) -> Result<()>;
}

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Override the config directory.
    #[arg(long)]
    pub config_path: Option<PathBuf>,

    /// Override the data directory.
    #[arg(long)]
    pub data_path: Option<PathBuf>,
}

impl ConfigArgs {
    pub fn build_path_set(&self) -> Result<PathSet> {
        PathSet::new(self.config_path.clone(), self.data_path.clone())
    }

    pub fn build_factory(&self) -> Result<ClientFactory> {
        let ps = self.build_path_set()?;
        ClientFactory::load(&ps)
    }
}

#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// Offset of the query.
    #[arg(long)]
    pub offset: Option<u64>,

    /// Limit of the query.
    #[arg(long)]
    pub limit: Option<u64>,

    /// Search with keywords, the field to search is determined by the resource type.
    #[arg(long)]
    pub search: Option<String>,

    /// Filter orders by status.
    #[arg(long)]
    pub status: Option<OrderStatus>,

    /// Filter orders by risk level.
    #[arg(long)]
    pub risk: Option<RiskLevel>,

    /// Filter by sales channel name.
    #[arg(long)]
    pub channel: Option<String>,

    /// Query resources created after this date. Format: "unix timestamp, YYYY-MM-DD,
    /// HH:MM:SS, or YYYY-MM-DD HH:MM:SS"
    #[arg(long)]
    pub since: Option<String>,

    /// Query resources created before this date. Format: "unix timestamp, YYYY-MM-DD,
    /// HH:MM:SS, or YYYY-MM-DD HH:MM:SS"
    #[arg(long)]
    pub until: Option<String>,
}

impl QueryArgs {
    pub fn build_query(&self) -> Result<Query> {
        Ok(Query {
            offset: self.offset,
            limit: self.limit,
            search: self.search.clone(),
            status: self.status,
            risk: self.risk,
            channel: self.channel.clone(),
            since: match self.since {
                Some(ref since) => Some(parse_time(since)?),
                None => None,
            },
            until: match self.until {
                Some(ref until) => Some(parse_time(until)?),
                None => None,
            },
        })
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ResourceType {
    Order,
    Orders,

    Inventory,

    Settlement,
    Settlements,

    Webhook,
    Webhooks,

    Job,
    Jobs,

    Channel,
    Channels,
}

impl ResourceType {
    pub fn get_name(self) -> &'static str {
        match self {
            ResourceType::Order | ResourceType::Orders => "orders",
            ResourceType::Inventory => "inventory",
            ResourceType::Settlement | ResourceType::Settlements => "settlements",
            ResourceType::Webhook | ResourceType::Webhooks => "webhooks",
            ResourceType::Job | ResourceType::Jobs => "jobs",
            ResourceType::Channel | ResourceType::Channels => "channels",
        }
    }
}

/// Order management and profit analytics for D2C sellers, from the terminal.
#[derive(Parser)]
#[command(author, about, version)]
pub struct App {
    /// Log level, one of "error", "warn", "info", "debug".
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    Channel(channel::ChannelCommand),
    Config(config::ShowConfigArgs),
    Dash(dash::DashArgs),
    Get(get::GetArgs),
    Login(login::LoginArgs),
    Logout(logout::LogoutArgs),
    Order(order::OrderCommand),
    Whoami(whoami::WhoamiArgs),
}

impl App {
    pub async fn run(&self) -> Result<()> {
        logs::init(&self.log_level)?;
        match &self.command {
            Commands::Channel(args) => args.run().await,
            Commands::Config(args) => args.run().await,
            Commands::Dash(args) => args.run().await,
            Commands::Get(args) => args.run().await,
            Commands::Login(args) => args.run().await,
            Commands::Logout(args) => args.run().await,
            Commands::Order(args) => args.run().await,
            Commands::Whoami(args) => args.run().await,
        }
    }
}
