use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
pub struct EmptyRequest {}

#[derive(Debug, Deserialize, Default)]
pub struct DashboardRequest {
    pub period: Option<String>,
    pub chart_period: Option<String>,
    pub now: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct SnapshotRequest {
    pub period: Option<String>,
    pub now: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ChartRequest {
    pub chart_period: Option<String>,
    pub now: Option<String>,
}
