use std::fmt;
use std::slice;

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::FillupRecord;
use crate::period::ChartPeriod;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub timestamp_ms: i64,
    /// Short month and two-digit year, e.g. `Jan 24`.
    pub date: String,
    pub mpg: f64,
    pub cost_per_gallon: f64,
}

/// Lazy chart series over a record slice; call [`chart_points`] again to
/// start over.
#[derive(Clone)]
pub struct ChartSeries<'a, Tz: TimeZone> {
    records: slice::Iter<'a, FillupRecord>,
    cutoff_ms: Option<i64>,
    timezone: Tz,
}

impl<Tz> Iterator for ChartSeries<'_, Tz>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    type Item = ChartPoint;

    fn next(&mut self) -> Option<ChartPoint> {
        let cutoff = self.cutoff_ms;
        let record = self
            .records
            .find(|record| cutoff.is_none_or(|cutoff| record.timestamp_ms >= cutoff))?;
        Some(ChartPoint {
            timestamp_ms: record.timestamp_ms,
            date: date_label(&self.timezone, record.timestamp_ms),
            mpg: record.mpg(),
            cost_per_gallon: record.cost_per_gallon,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.records.size_hint().1)
    }
}

/// One point per record inside `period`, in input order. Labels are rendered
/// in the timezone of `now`.
pub fn chart_points<'a, Tz: TimeZone>(
    records: &'a [FillupRecord],
    period: ChartPeriod,
    now: &DateTime<Tz>,
) -> ChartSeries<'a, Tz> {
    ChartSeries {
        records: records.iter(),
        cutoff_ms: period.cutoff_ms(now),
        timezone: now.timezone(),
    }
}

fn date_label<Tz>(timezone: &Tz, timestamp_ms: i64) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    DateTime::from_timestamp_millis(timestamp_ms)
        .map(|value| value.with_timezone(timezone).format("%b %y").to_string())
        .unwrap_or_default()
}
