mod chart;
mod metrics;
mod period;
#[cfg(test)]
mod testing;

use serde::{Deserialize, Serialize};

pub use chart::{ChartPoint, ChartSeries, chart_points};
pub use metrics::{Metric, MetricsSnapshot, WindowDeltas, compute_snapshot, pct_change, safe_ratio};
pub use period::{ChartPeriod, MS_PER_DAY, MS_PER_YEAR, ParsePeriodError, Period};

/// One fuel purchase as read from the fill-up sheet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FillupRecord {
    pub timestamp_ms: i64,
    pub odometer: f64,
    pub trip_meter: f64,
    pub gallons: f64,
    pub total_cost: f64,
    pub cost_per_gallon: f64,
}

impl FillupRecord {
    pub fn mpg(&self) -> f64 {
        safe_ratio(self.trip_meter, self.gallons)
    }

    pub fn cost_per_mile(&self) -> f64 {
        safe_ratio(self.total_cost, self.trip_meter)
    }
}
