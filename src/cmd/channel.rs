use anyhow::Result;
use async_trait::async_trait;
use clap::{Args, Subcommand};
use console::style;

use crate::dash::store::ChannelStore;
use crate::display::{display_list, DisplayStyle};
use crate::types::channel::{ChannelKind, ConnectChannelRequest, ShopifyConnectRequest};

use super::{ConfigArgs, RunCommand};

/// Manage sales channel connections.
#[derive(Args)]
pub struct ChannelCommand {
    #[command(subcommand)]
    pub command: ChannelCommands,
}

#[derive(Subcommand)]
pub enum ChannelCommands {
    /// List the channels known to this account.
    List(ListChannelArgs),
    /// Connect a channel that authenticates with an API key.
    Connect(ConnectChannelArgs),
    /// Start the Shopify OAuth flow.
    ConnectShopify(ConnectShopifyArgs),
    /// Disconnect a channel. Stops syncing; historical data stays.
    Disconnect(DisconnectChannelArgs),
}

#[async_trait]
impl RunCommand for ChannelCommand {
    async fn run(&self) -> Result<()> {
        match &self.command {
            ChannelCommands::List(args) => args.run().await,
            ChannelCommands::Connect(args) => args.run().await,
            ChannelCommands::ConnectShopify(args) => args.run().await,
            ChannelCommands::Disconnect(args) => args.run().await,
        }
    }
}

#[derive(Args)]
pub struct ListChannelArgs {
    /// The display style.
    #[arg(short, long, default_value = "table")]
    pub output: DisplayStyle,

    /// When displaying in CSV format, do not show the header row.
    #[arg(long)]
    pub headless: bool,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[async_trait]
impl RunCommand for ListChannelArgs {
    async fn run(&self) -> Result<()> {
        let factory = self.config.build_factory()?;
        let client = factory.build_client()?;

        let store = ChannelStore::new(client);
        store.refresh().await?;
        display_list(store.snapshot(), self.output, self.headless, None)
    }
}

#[derive(Args)]
pub struct ConnectChannelArgs {
    /// Display name for the channel.
    pub name: String,

    /// The channel kind.
    #[arg(long, default_value = "custom")]
    pub kind: ChannelKind,

    /// API key issued by the channel.
    #[arg(long)]
    pub api_key: String,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[async_trait]
impl RunCommand for ConnectChannelArgs {
    async fn run(&self) -> Result<()> {
        let factory = self.config.build_factory()?;
        let client = factory.build_client()?;

        let req = ConnectChannelRequest {
            name: self.name.clone(),
            kind: self.kind,
            api_key: self.api_key.clone(),
        };
        let channel = client.connect_channel(&req).await?;
        println!(
            "Connected channel {} ({})",
            style(&channel.name).green().bold(),
            channel.id
        );
        Ok(())
    }
}

#[derive(Args)]
pub struct ConnectShopifyArgs {
    /// The shop domain, like "my-store.myshopify.com".
    pub shop_domain: String,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[async_trait]
impl RunCommand for ConnectShopifyArgs {
    async fn run(&self) -> Result<()> {
        let factory = self.config.build_factory()?;
        let client = factory.build_client()?;

        let req = ShopifyConnectRequest {
            shop_domain: self.shop_domain.clone(),
        };
        let resp = client.connect_shopify(&req).await?;
        println!("Open this URL in your browser to authorize the connection:");
        println!("{}", style(&resp.redirect_url).cyan().underlined());
        Ok(())
    }
}

#[derive(Args)]
pub struct DisconnectChannelArgs {
    /// Channel ID.
    pub id: String,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[async_trait]
impl RunCommand for DisconnectChannelArgs {
    async fn run(&self) -> Result<()> {
        let factory = self.config.build_factory()?;
        let client = factory.build_client()?;

        client.disconnect_channel(&self.id).await?;
        println!("Channel {} disconnected", self.id);
        Ok(())
    }
}
