use ingest::IngestStats;
use mileage_app::{DashboardView, DataStatus, Result, ViewParams};
use mileage_core::Period;

use crate::{
    AppContext, ChartRequest, ChartResponse, DashboardRequest, PeriodOption, RecordsResponse,
    SnapshotRequest, SnapshotResponse,
};

pub fn dashboard(ctx: &AppContext, req: DashboardRequest) -> Result<DashboardView> {
    let selection = mileage_app::resolve_view(&ViewParams {
        period: req.period,
        chart_period: req.chart_period,
        now: req.now,
    })?;
    ctx.app_state.services.analytics.dashboard(&selection)
}

pub fn snapshot(ctx: &AppContext, req: SnapshotRequest) -> Result<SnapshotResponse> {
    let period = mileage_app::parse_period(req.period.as_deref())?;
    let now = mileage_app::resolve_now(req.now.as_deref())?;
    let snapshot = ctx.app_state.services.analytics.snapshot(period, &now)?;
    Ok(SnapshotResponse { period, snapshot })
}

pub fn chart(ctx: &AppContext, req: ChartRequest) -> Result<ChartResponse> {
    let chart_period = mileage_app::parse_chart_period(req.chart_period.as_deref())?;
    let now = mileage_app::resolve_now(req.now.as_deref())?;
    let points = ctx.app_state.services.analytics.chart(chart_period, &now)?;
    Ok(ChartResponse {
        chart_period,
        points,
    })
}

pub fn records(ctx: &AppContext) -> Result<RecordsResponse> {
    let records = ctx.app_state.services.analytics.records()?;
    Ok(RecordsResponse {
        count: records.len(),
        records,
    })
}

pub fn status(ctx: &AppContext) -> Result<DataStatus> {
    ctx.app_state.services.analytics.status()
}

pub fn periods() -> Vec<PeriodOption> {
    Period::ALL
        .into_iter()
        .map(|period| PeriodOption {
            value: period,
            label: period.label(),
        })
        .collect()
}

pub async fn refresh(ctx: &AppContext) -> Result<IngestStats> {
    ctx.app_state.refresh_data().await
}
