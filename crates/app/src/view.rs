use ingest::IngestStats;
use mileage_core::{ChartPeriod, ChartPoint, MetricsSnapshot, Period};
use serde::{Deserialize, Serialize};

/// Everything a dashboard frontend renders for one selection. Built fresh
/// per request; the frontend holds no derived state of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub period: Period,
    pub period_label: String,
    pub chart_period: ChartPeriod,
    pub now: String,
    /// `None` when no fill-ups fall inside `period`.
    pub snapshot: Option<MetricsSnapshot>,
    pub chart: Vec<ChartPoint>,
    pub record_count: usize,
    pub tracking_since: Option<String>,
    pub last_updated: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataStatus {
    pub source: String,
    pub form_url: Option<String>,
    pub record_count: usize,
    pub generation: u64,
    pub tracking_since: Option<String>,
    pub last_updated: Option<String>,
    pub last_ingest: Option<IngestStats>,
}
