use serde::{Deserialize, Serialize};

/// Overview payload from the finance service. Fields are optional on the
/// wire: the service omits anything it has not computed for the period yet,
/// and a partial payload is still usable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinanceOverview {
    #[serde(default)]
    pub revenue: Option<f64>,

    #[serde(default)]
    pub cost: Option<f64>,

    #[serde(default)]
    pub profit: Option<f64>,

    /// Profit margin as a ratio in [0, 1].
    #[serde(default)]
    pub margin: Option<f64>,

    #[serde(default)]
    pub orders: Option<u64>,

    #[serde(default)]
    pub pending_orders: Option<u64>,

    #[serde(default)]
    pub currency: Option<String>,
}

/// Overview payload from the legacy analytics service. Same numbers under
/// the old field names. Kept until every channel is migrated off it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyticsOverview {
    #[serde(default)]
    pub total_revenue: Option<f64>,

    #[serde(default)]
    pub total_cost: Option<f64>,

    #[serde(default)]
    pub net_profit: Option<f64>,

    #[serde(default)]
    pub profit_margin: Option<f64>,

    #[serde(default)]
    pub order_count: Option<u64>,

    #[serde(default)]
    pub pending_count: Option<u64>,

    #[serde(default)]
    pub currency: Option<String>,
}
