use anyhow::Result;
use async_trait::async_trait;
use clap::{Args, Subcommand};
use console::style;

use crate::types::order::{BulkActionRequest, OrderAction};

use super::{ConfigArgs, RunCommand};

/// Apply lifecycle actions to orders.
#[derive(Args)]
pub struct OrderCommand {
    #[command(subcommand)]
    pub command: OrderCommands,
}

#[derive(Subcommand)]
pub enum OrderCommands {
    /// Confirm a pending order.
    Confirm(ActionArgs),
    /// Mark a confirmed order as packed.
    Pack(ActionArgs),
    /// Mark a packed order as shipped.
    Ship(ActionArgs),
    /// Cancel an order.
    Cancel(ActionArgs),
    /// Request a shipping label for an order.
    Label(LabelArgs),
    /// Apply one action to many orders at once.
    Bulk(BulkArgs),
}

#[async_trait]
impl RunCommand for OrderCommand {
    async fn run(&self) -> Result<()> {
        match &self.command {
            OrderCommands::Confirm(args) => args.run_action(OrderAction::Confirm).await,
            OrderCommands::Pack(args) => args.run_action(OrderAction::Pack).await,
            OrderCommands::Ship(args) => args.run_action(OrderAction::Ship).await,
            OrderCommands::Cancel(args) => args.run_action(OrderAction::Cancel).await,
            OrderCommands::Label(args) => args.run().await,
            OrderCommands::Bulk(args) => args.run().await,
        }
    }
}

#[derive(Args)]
pub struct ActionArgs {
    /// Order ID.
    pub id: String,

    #[command(flatten)]
    pub config: ConfigArgs,
}

impl ActionArgs {
    async fn run_action(&self, action: OrderAction) -> Result<()> {
        let factory = self.config.build_factory()?;
        let client = factory.build_client()?;

        let order = client
            .update_order_status(&self.id, action.target_status())
            .await?;
        let name = if order.name.is_empty() {
            order.id
        } else {
            order.name
        };
        println!(
            "Order {name} is now {}",
            style(order.status.as_str()).green()
        );
        Ok(())
    }
}

#[derive(Args)]
pub struct LabelArgs {
    /// Order ID.
    pub id: String,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[async_trait]
impl RunCommand for LabelArgs {
    async fn run(&self) -> Result<()> {
        let factory = self.config.build_factory()?;
        let client = factory.build_client()?;

        let label = client.order_label(&self.id).await?;
        println!("Label: {}", label.url);
        if let Some(carrier) = label.carrier {
            println!("Carrier: {carrier}");
        }
        if let Some(tracking) = label.tracking {
            println!("Tracking: {tracking}");
        }
        Ok(())
    }
}

#[derive(Args)]
pub struct BulkArgs {
    /// The action to apply.
    pub action: OrderAction,

    /// Order IDs.
    #[arg(required = true)]
    pub ids: Vec<String>,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[async_trait]
impl RunCommand for BulkArgs {
    async fn run(&self) -> Result<()> {
        let factory = self.config.build_factory()?;
        let client = factory.build_client()?;

        let req = BulkActionRequest {
            ids: self.ids.clone(),
            action: self.action,
        };
        let result = client.bulk_order_action(&req).await?;

        let failed = result.failed.len();
        let failed_text = if failed == 0 {
            style(failed).dim()
        } else {
            style(failed).red()
        };
        println!(
            "{} {} succeeded, {failed_text} failed",
            self.action,
            style(result.succeeded.len()).green(),
        );
        for failure in result.failed {
            eprintln!(
                "  {} {}: {}",
                style("failed").red(),
                failure.id,
                failure.message
            );
        }
        Ok(())
    }
}
