use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SalesRecord {
    pub month: String,
    pub week_in_month: u32,
    pub supervisor: String,
    pub total_bags_sold: u64,
    pub billed_customers: u64,
    pub rice_customers: u64,
    pub month_repeat_rate_pct: f64,
    pub sampling_reach_pct: f64,
    pub funnel_lapsers: u64,
    pub samples_premium: u64,
    pub samples_select: u64,
    pub samples_everyday: u64,
    pub samples_sella: u64,
    pub samples_sonamasoori: u64,
}

// `None` for week or supervisor means "all weeks" / "all supervisors".
#[derive(Debug, Clone, Serialize)]
pub struct FilterSelection {
    pub month: String,
    pub week: Option<u32>,
    pub supervisor: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AggregateResult {
    pub record_count: usize,
    pub total_bags_sold: u64,
    pub billed_customers: u64,
    pub rice_customers: u64,
    pub conversion_rate_pct: f64,
    pub month_repeat_rate_pct: f64,
    pub sampling_reach_pct: f64,
    pub funnel_lapsers: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeeklyPoint {
    pub week_in_month: u32,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SupervisorSlice {
    pub supervisor: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PortfolioSlice {
    pub product: String,
    pub samples: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    RetentionRisk,
    SamplingUnderperformance,
}

#[derive(Debug, Clone, Serialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
}

/// One full dashboard frame for the UI shell: selector options, KPIs,
/// chart series, alerts, and the executive summary.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardPayload {
    pub selection: FilterSelection,
    pub months: Vec<String>,
    pub weeks: Vec<u32>,
    pub supervisors: Vec<String>,
    pub kpis: AggregateResult,
    pub weekly_conversion_trend: Vec<WeeklyPoint>,
    pub weekly_lapsers_trend: Vec<WeeklyPoint>,
    pub sampling_reach_by_supervisor: Vec<SupervisorSlice>,
    pub bags_sold_by_supervisor: Vec<SupervisorSlice>,
    pub product_portfolio: Vec<PortfolioSlice>,
    pub alerts: Vec<Alert>,
    pub summary: String,
}
