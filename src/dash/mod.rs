pub mod store;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::types::finance::{AnalyticsOverview, FinanceOverview};
use crate::types::worker::SyncJob;

/// Merged profit numbers for the dashboard header. Concrete values, zero
/// where neither source had anything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Overview {
    pub revenue: f64,
    pub cost: f64,
    pub profit: f64,
    pub margin: f64,
    pub orders: u64,
    pub pending_orders: u64,
    pub currency: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardView {
    pub overview: Overview,
    pub jobs: Vec<SyncJob>,
}

impl Overview {
    /// Field-level merge of the two overview sources. The finance service
    /// wins where it has a value, the legacy analytics payload fills the
    /// gaps, zero covers the rest. A partial payload from either side
    /// still contributes the fields it has.
    pub fn merge(finance: FinanceOverview, legacy: AnalyticsOverview) -> Self {
        Self {
            revenue: finance.revenue.or(legacy.total_revenue).unwrap_or(0.0),
            cost: finance.cost.or(legacy.total_cost).unwrap_or(0.0),
            profit: finance.profit.or(legacy.net_profit).unwrap_or(0.0),
            margin: finance.margin.or(legacy.profit_margin).unwrap_or(0.0),
            orders: finance.orders.or(legacy.order_count).unwrap_or(0),
            pending_orders: finance
                .pending_orders
                .or(legacy.pending_count)
                .unwrap_or(0),
            currency: finance
                .currency
                .or(legacy.currency)
                .unwrap_or_else(|| String::from("USD")),
        }
    }
}

/// Load everything the dashboard shows in one round. The three sources are
/// fetched concurrently and each one is guarded: a failing source degrades
/// to its default instead of failing the view, so this never returns an
/// error. Polling failures stay invisible by design.
pub async fn load_view(client: &Client) -> DashboardView {
    let (finance, legacy, jobs) = tokio::join!(
        client.finance_overview(),
        client.analytics_overview(),
        client.list_sync_jobs(),
    );

    let finance = finance.unwrap_or_else(|err| {
        warn!("Load finance overview failed: {err}, using defaults");
        FinanceOverview::default()
    });
    let legacy = legacy.unwrap_or_else(|err| {
        warn!("Load analytics overview failed: {err}, using defaults");
        AnalyticsOverview::default()
    });
    let jobs = jobs.unwrap_or_else(|err| {
        warn!("Load sync jobs failed: {err}, using empty list");
        Vec::new()
    });

    DashboardView {
        overview: Overview::merge(finance, legacy),
        jobs,
    }
}
