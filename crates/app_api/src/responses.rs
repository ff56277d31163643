use mileage_core::{ChartPeriod, ChartPoint, FillupRecord, MetricsSnapshot, Period};
use serde::Serialize;

#[derive(Serialize)]
pub struct SnapshotResponse {
    pub period: Period,
    pub snapshot: Option<MetricsSnapshot>,
}

#[derive(Serialize)]
pub struct ChartResponse {
    pub chart_period: ChartPeriod,
    pub points: Vec<ChartPoint>,
}

#[derive(Serialize)]
pub struct RecordsResponse {
    pub count: usize,
    pub records: Vec<FillupRecord>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PeriodOption {
    pub value: Period,
    pub label: &'static str,
}
