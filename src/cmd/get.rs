use anyhow::{bail, Result};
use async_trait::async_trait;
use clap::Args;
use serde::Serialize;

use crate::client::Client;
use crate::display::{display_json, display_list, DisplayStyle, TerminalDisplay};
use crate::types::request::Query;

use super::{ConfigArgs, QueryArgs, ResourceType, RunCommand};

/// Retrieve resource information from the server and print it. This command can be used to
/// display a single or multiple resources
#[derive(Args)]
pub struct GetArgs {
    /// Type of resource to display
    pub resource: ResourceType,

    /// Optional filter by ID. Only orders can be fetched by ID.
    pub id: Option<String>,

    /// The display style.
    #[arg(short, long, default_value = "table")]
    pub output: DisplayStyle,

    /// When displaying in CSV format, do not show the header row.
    #[arg(long)]
    pub headless: bool,

    /// When displaying in CSV format, manually specify the rows to display.
    #[arg(long)]
    pub csv_titles: Option<String>,

    #[command(flatten)]
    pub query: QueryArgs,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[async_trait]
impl RunCommand for GetArgs {
    async fn run(&self) -> Result<()> {
        let factory = self.config.build_factory()?;
        let client = factory.build_client()?;
        let query = self.query.build_query()?;

        if self.id.is_some() && !matches!(self.resource, ResourceType::Order | ResourceType::Orders)
        {
            bail!(
                "{} cannot be fetched by id, only orders can",
                self.resource.get_name()
            );
        }

        match self.resource {
            ResourceType::Order | ResourceType::Orders => self.get_orders(client, query).await,
            ResourceType::Inventory => {
                let items = client.list_inventory(&query).await?;
                self.display(items)
            }
            ResourceType::Settlement | ResourceType::Settlements => {
                let settlements = client.list_settlements(&query).await?;
                self.display(settlements)
            }
            ResourceType::Webhook | ResourceType::Webhooks => {
                let webhooks = client.list_webhooks().await?;
                self.display(webhooks)
            }
            ResourceType::Job | ResourceType::Jobs => {
                let jobs = client.list_sync_jobs().await?;
                self.display(jobs)
            }
            ResourceType::Channel | ResourceType::Channels => {
                let channels = client.list_channels().await?;
                self.display(channels)
            }
        }
    }
}

impl GetArgs {
    async fn get_orders(&self, client: Client, query: Query) -> Result<()> {
        match self.id {
            Some(ref id) => {
                let order = client.get_order(id).await?;
                if matches!(self.output, DisplayStyle::Json) {
                    return display_json(order);
                }
                let actions = order.status.available_actions();
                self.display(vec![order])?;
                if !actions.is_empty() {
                    let actions: Vec<_> = actions.iter().map(|action| action.as_str()).collect();
                    println!("Available actions: {}", actions.join(", "));
                }
                Ok(())
            }
            None => {
                let orders = client.list_orders(&query).await?;
                self.display(orders)
            }
        }
    }

    fn display<T>(&self, list: Vec<T>) -> Result<()>
    where
        T: Serialize + TerminalDisplay,
    {
        display_list(list, self.output, self.headless, self.csv_titles.clone())
    }
}
