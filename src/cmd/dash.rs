use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::Local;
use clap::Args;
use console::Term;
use log::warn;

use crate::dash::{self, DashboardView};
use crate::display::{display_json, display_list, DisplayStyle};
use crate::humanize::{format_count, format_money, format_percent};
use crate::poll::Poller;
use crate::table::Table;

use super::{ConfigArgs, RunCommand};

/// Show the profit dashboard: merged finance numbers plus the sync queue.
#[derive(Args)]
pub struct DashArgs {
    /// Keep running and refresh the dashboard periodically. Stop with ctrl-c.
    #[arg(short, long)]
    pub watch: bool,

    /// The display style, "table" or "json".
    #[arg(short, long, default_value = "table")]
    pub output: DisplayStyle,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[async_trait]
impl RunCommand for DashArgs {
    async fn run(&self) -> Result<()> {
        if matches!(self.output, DisplayStyle::Csv) {
            bail!("csv is not supported for the dashboard");
        }

        let factory = self.config.build_factory()?;
        let client = factory.build_client()?;

        // Fail fast when not logged in instead of rendering an all-zero
        // dashboard.
        client.me().await?;

        let view = dash::load_view(&client).await;
        render_view(&view, self.output)?;

        if !self.watch {
            return Ok(());
        }

        let output = self.output;
        let tick_client = client.clone();
        let handle = Poller::new("dash", move || {
            let client = tick_client.clone();
            async move {
                let view = dash::load_view(&client).await;
                let _ = Term::stdout().clear_screen();
                if let Err(err) = render_view(&view, output) {
                    warn!("Render dashboard failed: {err:#}");
                }
            }
        })
        .start();

        tokio::signal::ctrl_c().await?;
        handle.cancel();
        println!();
        Ok(())
    }
}

fn render_view(view: &DashboardView, output: DisplayStyle) -> Result<()> {
    if matches!(output, DisplayStyle::Json) {
        return display_json(view);
    }

    let overview = &view.overview;
    let mut table = Table::with_capacity(7, false);
    table.right_align(vec![1]);
    table.add(vec![String::from("Metric"), String::from("Value")]);
    table.add(vec![
        String::from("Revenue"),
        format_money(overview.revenue, &overview.currency),
    ]);
    table.add(vec![
        String::from("Cost"),
        format_money(overview.cost, &overview.currency),
    ]);
    table.add(vec![
        String::from("Profit"),
        format_money(overview.profit, &overview.currency),
    ]);
    table.add(vec![String::from("Margin"), format_percent(overview.margin)]);
    table.add(vec![String::from("Orders"), format_count(overview.orders)]);
    table.add(vec![
        String::from("Pending"),
        format_count(overview.pending_orders),
    ]);
    table.show();

    if !view.jobs.is_empty() {
        let active = view.jobs.iter().filter(|job| job.is_active()).count();
        println!();
        println!("Sync jobs ({active} active):");
        display_list(view.jobs.clone(), DisplayStyle::Table, false, None)?;
    }

    println!();
    println!("Updated at {}", Local::now().format("%H:%M:%S"));
    Ok(())
}
