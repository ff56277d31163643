use std::sync::Arc;

use chrono::SecondsFormat;
use mileage_core::{
    ChartPeriod, ChartPoint, FillupRecord, MetricsSnapshot, Period, chart_points, compute_snapshot,
};

use crate::config::{ViewNow, ViewSelection};
use crate::error::Result;
use crate::services::{Dataset, SharedConfig, SharedDataset, current_dataset};
use crate::util::time::format_timestamp_ms;
use crate::view::{DashboardView, DataStatus};

#[derive(Clone)]
pub struct AnalyticsService {
    config: SharedConfig,
    dataset: SharedDataset,
}

impl AnalyticsService {
    pub(super) fn new(config: SharedConfig, dataset: SharedDataset) -> Self {
        Self { config, dataset }
    }

    fn dataset(&self) -> Result<Arc<Dataset>> {
        current_dataset(&self.dataset)
    }

    pub fn snapshot(&self, period: Period, now: &ViewNow) -> Result<Option<MetricsSnapshot>> {
        let dataset = self.dataset()?;
        Ok(snapshot_at(&dataset.records, period, now))
    }

    pub fn chart(&self, chart_period: ChartPeriod, now: &ViewNow) -> Result<Vec<ChartPoint>> {
        let dataset = self.dataset()?;
        Ok(chart_at(&dataset.records, chart_period, now))
    }

    pub fn dashboard(&self, selection: &ViewSelection) -> Result<DashboardView> {
        let dataset = self.dataset()?;
        let now = &selection.now;
        Ok(DashboardView {
            period: selection.period,
            period_label: selection.period.label().to_string(),
            chart_period: selection.chart_period,
            now: now.to_rfc3339(),
            snapshot: snapshot_at(&dataset.records, selection.period, now),
            chart: chart_at(&dataset.records, selection.chart_period, now),
            record_count: dataset.records.len(),
            tracking_since: tracking_since(&dataset.records),
            last_updated: last_updated(&dataset),
        })
    }

    pub fn records(&self) -> Result<Vec<FillupRecord>> {
        Ok(self.dataset()?.records.clone())
    }

    pub fn status(&self) -> Result<DataStatus> {
        let dataset = self.dataset()?;
        Ok(DataStatus {
            source: self.config.source.describe(),
            form_url: self.config.form_url.clone(),
            record_count: dataset.records.len(),
            generation: dataset.generation,
            tracking_since: tracking_since(&dataset.records),
            last_updated: last_updated(&dataset),
            last_ingest: dataset.last_ingest.clone(),
        })
    }
}

fn snapshot_at(
    records: &[FillupRecord],
    period: Period,
    now: &ViewNow,
) -> Option<MetricsSnapshot> {
    match now {
        ViewNow::Local(now) => compute_snapshot(records, period, now),
        ViewNow::Fixed(now) => compute_snapshot(records, period, now),
    }
}

fn chart_at(
    records: &[FillupRecord],
    chart_period: ChartPeriod,
    now: &ViewNow,
) -> Vec<ChartPoint> {
    match now {
        ViewNow::Local(now) => chart_points(records, chart_period, now).collect(),
        ViewNow::Fixed(now) => chart_points(records, chart_period, now).collect(),
    }
}

fn tracking_since(records: &[FillupRecord]) -> Option<String> {
    records
        .first()
        .and_then(|record| format_timestamp_ms(record.timestamp_ms))
}

fn last_updated(dataset: &Dataset) -> Option<String> {
    dataset
        .last_updated
        .map(|value| value.to_rfc3339_opts(SecondsFormat::Millis, true))
}
