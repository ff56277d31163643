use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::FillupRecord;
use crate::period::{MS_PER_DAY, MS_PER_YEAR, Period};

/// The per-fill-up quantities the dashboard averages and trends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Gallons,
    CostPerGallon,
    CostPerTank,
    Mpg,
    CostPerMile,
}

impl Metric {
    pub fn value(self, record: &FillupRecord) -> f64 {
        match self {
            Self::Gallons => record.gallons,
            Self::CostPerGallon => record.cost_per_gallon,
            Self::CostPerTank => record.total_cost,
            Self::Mpg => record.mpg(),
            Self::CostPerMile => record.cost_per_mile(),
        }
    }

    /// Mean of the per-record values. Ratios are taken per record first, so
    /// `Mpg` is not total distance over total fuel.
    pub fn average(self, records: &[FillupRecord]) -> f64 {
        mean(records.iter().map(|record| self.value(record)))
    }
}

/// Raw differences between a current trailing window and the window right
/// before it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowDeltas {
    pub fuel_cost: f64,
    pub mileage: f64,
    pub mpg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub period: Period,
    pub avg_gallons: f64,
    pub avg_cost_per_gallon: f64,
    pub avg_cost_per_tank: f64,
    pub avg_mpg: f64,
    pub avg_cost_per_mile: f64,
    /// Percent changes between the chronological halves of the period. A
    /// zero first-half average reports `0`.
    pub gallons_change: f64,
    pub cost_per_gallon_change: f64,
    pub cost_per_tank_change: f64,
    pub mpg_change: f64,
    pub cost_per_mile_change: f64,
    pub total_fuel_cost: f64,
    pub total_miles: f64,
    pub annual_mileage: f64,
    pub monthly_mileage: f64,
    pub trailing_year_mileage: f64,
    pub monthly_fuel_cost: f64,
    pub annual_fuel_cost: f64,
    pub monthly_mpg: f64,
    pub annual_mpg: f64,
    pub avg_mileage_per_fillup: f64,
    pub month_over_month: WindowDeltas,
    pub year_over_year: WindowDeltas,
    pub fillup_count: usize,
    pub record_count: usize,
    pub tracking_since_ms: i64,
}

/// Division that reports `0` instead of NaN or infinity.
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    let value = numerator / denominator;
    if value.is_finite() { value } else { 0.0 }
}

fn mean<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    safe_ratio(sum, count as f64)
}

/// Percent change of `metric` from `before` to `after`; `0` when either side
/// is empty.
pub fn pct_change(before: &[FillupRecord], after: &[FillupRecord], metric: Metric) -> f64 {
    if before.is_empty() || after.is_empty() {
        return 0.0;
    }
    let first = metric.average(before);
    let second = metric.average(after);
    safe_ratio(second - first, first) * 100.0
}

fn records_between(
    records: &[FillupRecord],
    start_ms: Option<i64>,
    end_ms: Option<i64>,
) -> Vec<FillupRecord> {
    records
        .iter()
        .filter(|record| start_ms.is_none_or(|start| record.timestamp_ms >= start))
        .filter(|record| end_ms.is_none_or(|end| record.timestamp_ms < end))
        .copied()
        .collect()
}

#[derive(Debug, Clone, Copy, Default)]
struct WindowTotals {
    fuel_cost: f64,
    mileage: f64,
    mpg: f64,
}

impl WindowTotals {
    fn of(records: &[FillupRecord]) -> Self {
        Self {
            fuel_cost: records.iter().map(|record| record.total_cost).sum(),
            mileage: records.iter().map(|record| record.trip_meter).sum(),
            mpg: Metric::Mpg.average(records),
        }
    }
}

fn delta(current: f64, prior: f64) -> f64 {
    if prior == 0.0 { 0.0 } else { current - prior }
}

impl WindowDeltas {
    fn between(current: WindowTotals, prior: WindowTotals) -> Self {
        Self {
            fuel_cost: delta(current.fuel_cost, prior.fuel_cost),
            mileage: delta(current.mileage, prior.mileage),
            mpg: delta(current.mpg, prior.mpg),
        }
    }

    /// Compares `[now - days, ..)` against `[now - 2 * days, now - days)`.
    fn trailing(records: &[FillupRecord], now_ms: i64, days: i64) -> Self {
        let boundary = now_ms - days * MS_PER_DAY;
        let earliest = now_ms - 2 * days * MS_PER_DAY;
        let current = WindowTotals::of(&records_between(records, Some(boundary), None));
        let prior = WindowTotals::of(&records_between(records, Some(earliest), Some(boundary)));
        Self::between(current, prior)
    }
}

fn annualize(total_miles: f64, span_ms: i64) -> f64 {
    if span_ms <= 0 {
        return 0.0;
    }
    safe_ratio(total_miles, span_ms as f64 / MS_PER_YEAR as f64)
}

fn odometer_span(records: &[FillupRecord]) -> f64 {
    match (records.first(), records.last()) {
        (Some(first), Some(last)) => last.odometer - first.odometer,
        _ => 0.0,
    }
}

/// Derives the dashboard metrics for `period` as seen at `now`.
///
/// Averages and trends use the records inside the period; totals,
/// extrapolations and trailing windows always use the full series. Returns
/// `None` when there are no records or none fall inside the period.
pub fn compute_snapshot<Tz: TimeZone>(
    records: &[FillupRecord],
    period: Period,
    now: &DateTime<Tz>,
) -> Option<MetricsSnapshot> {
    let first = records.first()?;
    let last = records.last()?;
    let filtered = records_between(records, period.cutoff_ms(now), None);
    if filtered.is_empty() {
        return None;
    }
    let now_ms = now.timestamp_millis();

    let (first_half, second_half) = filtered.split_at(filtered.len() / 2);
    let avg_mpg = Metric::Mpg.average(&filtered);

    let total_miles = odometer_span(records);
    let annual_mileage = annualize(total_miles, last.timestamp_ms - first.timestamp_ms);

    let last_month = records_between(records, Some(now_ms - 30 * MS_PER_DAY), None);
    let last_year = records_between(records, Some(now_ms - 365 * MS_PER_DAY), None);
    let trailing_mpg = |window: &[FillupRecord]| {
        if window.is_empty() {
            avg_mpg
        } else {
            Metric::Mpg.average(window)
        }
    };
    let trailing_year_mileage = if last_year.len() > 1 {
        odometer_span(&last_year)
    } else {
        annual_mileage
    };

    Some(MetricsSnapshot {
        period,
        avg_gallons: Metric::Gallons.average(&filtered),
        avg_cost_per_gallon: Metric::CostPerGallon.average(&filtered),
        avg_cost_per_tank: Metric::CostPerTank.average(&filtered),
        avg_mpg,
        avg_cost_per_mile: Metric::CostPerMile.average(&filtered),
        gallons_change: pct_change(first_half, second_half, Metric::Gallons),
        cost_per_gallon_change: pct_change(first_half, second_half, Metric::CostPerGallon),
        cost_per_tank_change: pct_change(first_half, second_half, Metric::CostPerTank),
        mpg_change: pct_change(first_half, second_half, Metric::Mpg),
        cost_per_mile_change: pct_change(first_half, second_half, Metric::CostPerMile),
        total_fuel_cost: records.iter().map(|record| record.total_cost).sum(),
        total_miles,
        annual_mileage,
        monthly_mileage: annual_mileage / 12.0,
        trailing_year_mileage,
        monthly_fuel_cost: last_month.iter().map(|record| record.total_cost).sum(),
        annual_fuel_cost: last_year.iter().map(|record| record.total_cost).sum(),
        monthly_mpg: trailing_mpg(&last_month),
        annual_mpg: trailing_mpg(&last_year),
        avg_mileage_per_fillup: mean(filtered.iter().map(|record| record.trip_meter)),
        month_over_month: WindowDeltas::trailing(records, now_ms, 30),
        year_over_year: WindowDeltas::trailing(records, now_ms, 365),
        fillup_count: filtered.len(),
        record_count: records.len(),
        tracking_since_ms: first.timestamp_ms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn ts(year: i32, month: u32, day: u32) -> i64 {
        Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
            .single()
            .expect("timestamp")
            .timestamp_millis()
    }

    fn fillup(
        timestamp_ms: i64,
        odometer: f64,
        trip_meter: f64,
        gallons: f64,
        total_cost: f64,
    ) -> FillupRecord {
        FillupRecord {
            timestamp_ms,
            odometer,
            trip_meter,
            gallons,
            total_cost,
            cost_per_gallon: total_cost / gallons,
        }
    }

    fn jan_feb_records() -> Vec<FillupRecord> {
        vec![
            fillup(ts(2024, 1, 1), 1000.0, 300.0, 10.0, 30.0),
            fillup(ts(2024, 2, 1), 1300.0, 300.0, 12.0, 33.6),
        ]
    }

    fn close(actual: f64, expected: f64) -> bool {
        (actual - expected).abs() < 1e-9
    }

    #[test]
    fn all_time_two_fillups_match_hand_computation() {
        let now = Utc.with_ymd_and_hms(2024, 2, 15, 0, 0, 0).single().expect("now");
        let snapshot =
            compute_snapshot(&jan_feb_records(), Period::AllTime, &now).expect("snapshot");
        assert!(close(snapshot.avg_gallons, 11.0));
        assert!(close(snapshot.avg_mpg, 27.5));
        assert!(close(snapshot.total_fuel_cost, 63.6));
        assert!(close(snapshot.total_miles, 300.0));
        assert!(close(snapshot.avg_mileage_per_fillup, 300.0));
        assert!(close(snapshot.avg_cost_per_tank, 31.8));
        assert_eq!(snapshot.fillup_count, 2);
        assert_eq!(snapshot.record_count, 2);
        assert_eq!(snapshot.tracking_since_ms, ts(2024, 1, 1));
    }

    #[test]
    fn avg_mpg_is_mean_of_per_record_ratios() {
        let records = vec![
            fillup(ts(2024, 1, 1), 1000.0, 100.0, 10.0, 30.0),
            fillup(ts(2024, 1, 8), 1400.0, 400.0, 10.0, 30.0),
            fillup(ts(2024, 1, 15), 1500.0, 100.0, 2.0, 6.0),
        ];
        let now = Utc.with_ymd_and_hms(2024, 1, 20, 0, 0, 0).single().expect("now");
        let snapshot = compute_snapshot(&records, Period::AllTime, &now).expect("snapshot");
        let expected = (10.0 + 40.0 + 50.0) / 3.0;
        let ratio_of_sums = 600.0 / 22.0;
        assert!(close(snapshot.avg_mpg, expected));
        assert!(!close(snapshot.avg_mpg, ratio_of_sums));
    }

    #[test]
    fn empty_records_report_no_data() {
        let now = Utc::now();
        for period in Period::ALL {
            assert!(compute_snapshot(&[], period, &now).is_none());
        }
    }

    #[test]
    fn period_without_records_reports_no_data() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).single().expect("now");
        assert!(compute_snapshot(&jan_feb_records(), Period::Last30Days, &now).is_none());
        assert!(compute_snapshot(&jan_feb_records(), Period::AllTime, &now).is_some());
    }

    #[test]
    fn year_to_date_in_early_january_skips_last_year() {
        let records = vec![
            fillup(ts(2023, 11, 2), 1000.0, 300.0, 10.0, 30.0),
            fillup(ts(2023, 12, 20), 1300.0, 300.0, 10.0, 30.0),
        ];
        let now = Utc.with_ymd_and_hms(2024, 1, 3, 8, 0, 0).single().expect("now");
        assert!(compute_snapshot(&records, Period::YearToDate, &now).is_none());
        assert!(compute_snapshot(&records, Period::Last30Days, &now).is_some());
    }

    #[test]
    fn single_record_has_no_trend() {
        let records = vec![fillup(ts(2024, 1, 1), 1000.0, 300.0, 10.0, 30.0)];
        let now = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).single().expect("now");
        let snapshot = compute_snapshot(&records, Period::AllTime, &now).expect("snapshot");
        assert_eq!(snapshot.gallons_change, 0.0);
        assert_eq!(snapshot.cost_per_gallon_change, 0.0);
        assert_eq!(snapshot.cost_per_tank_change, 0.0);
        assert_eq!(snapshot.mpg_change, 0.0);
        assert_eq!(snapshot.cost_per_mile_change, 0.0);
    }

    #[test]
    fn trend_compares_chronological_halves() {
        let records = vec![
            fillup(ts(2024, 1, 1), 1000.0, 300.0, 10.0, 30.0),
            fillup(ts(2024, 1, 8), 1300.0, 300.0, 10.0, 30.0),
            fillup(ts(2024, 1, 15), 1600.0, 300.0, 12.0, 36.0),
        ];
        let now = Utc.with_ymd_and_hms(2024, 1, 20, 0, 0, 0).single().expect("now");
        let snapshot = compute_snapshot(&records, Period::AllTime, &now).expect("snapshot");
        // First half is the first record, second half the other two.
        assert!(close(snapshot.gallons_change, 10.0));
        assert!(close(snapshot.cost_per_gallon_change, 0.0));
        let mpg_after = (30.0 + 25.0) / 2.0;
        assert!(close(snapshot.mpg_change, (mpg_after - 30.0) / 30.0 * 100.0));
    }

    #[test]
    fn zero_baseline_reports_zero_change() {
        let before = vec![fillup(ts(2024, 1, 1), 1000.0, 300.0, 10.0, 0.0)];
        let after = vec![fillup(ts(2024, 1, 8), 1300.0, 300.0, 10.0, 30.0)];
        assert_eq!(pct_change(&before, &after, Metric::CostPerTank), 0.0);
        assert_eq!(pct_change(&[], &after, Metric::CostPerTank), 0.0);
    }

    #[test]
    fn annual_mileage_is_zero_without_time_span() {
        let t = ts(2024, 3, 1);
        let records = vec![
            fillup(t, 1000.0, 300.0, 10.0, 30.0),
            fillup(t, 1300.0, 300.0, 10.0, 30.0),
        ];
        let now = Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).single().expect("now");
        let snapshot = compute_snapshot(&records, Period::AllTime, &now).expect("snapshot");
        assert_eq!(snapshot.annual_mileage, 0.0);
        assert_eq!(snapshot.monthly_mileage, 0.0);

        let reversed = vec![
            fillup(ts(2024, 3, 5), 1000.0, 300.0, 10.0, 30.0),
            fillup(ts(2024, 3, 1), 1300.0, 300.0, 10.0, 30.0),
        ];
        let snapshot = compute_snapshot(&reversed, Period::AllTime, &now).expect("snapshot");
        assert_eq!(snapshot.annual_mileage, 0.0);
    }

    #[test]
    fn annual_mileage_extrapolates_full_span() {
        let start = ts(2023, 1, 1);
        let records = vec![
            fillup(start, 10_000.0, 300.0, 10.0, 30.0),
            fillup(start + MS_PER_YEAR / 2, 16_000.0, 300.0, 10.0, 30.0),
        ];
        let now = Utc.with_ymd_and_hms(2023, 8, 1, 0, 0, 0).single().expect("now");
        let snapshot = compute_snapshot(&records, Period::AllTime, &now).expect("snapshot");
        assert!(close(snapshot.annual_mileage, 12_000.0));
        assert!(close(snapshot.monthly_mileage, 1_000.0));
        // Both records sit in the trailing year, so the actual span wins.
        assert!(close(snapshot.trailing_year_mileage, 6_000.0));
    }

    #[test]
    fn totals_ignore_period_filter() {
        let now = Utc.with_ymd_and_hms(2024, 2, 15, 0, 0, 0).single().expect("now");
        let snapshot =
            compute_snapshot(&jan_feb_records(), Period::Last30Days, &now).expect("snapshot");
        assert_eq!(snapshot.fillup_count, 1);
        assert!(close(snapshot.avg_gallons, 12.0));
        assert!(close(snapshot.total_fuel_cost, 63.6));
        assert!(close(snapshot.total_miles, 300.0));
    }

    #[test]
    fn trailing_windows_use_now() {
        let now = Utc.with_ymd_and_hms(2024, 2, 15, 0, 0, 0).single().expect("now");
        let snapshot =
            compute_snapshot(&jan_feb_records(), Period::AllTime, &now).expect("snapshot");
        assert!(close(snapshot.monthly_fuel_cost, 33.6));
        assert!(close(snapshot.annual_fuel_cost, 63.6));
        assert!(close(snapshot.monthly_mpg, 25.0));
        assert!(close(snapshot.annual_mpg, 27.5));
    }

    #[test]
    fn monthly_mpg_falls_back_to_period_average() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).single().expect("now");
        let snapshot =
            compute_snapshot(&jan_feb_records(), Period::AllTime, &now).expect("snapshot");
        assert_eq!(snapshot.monthly_fuel_cost, 0.0);
        assert!(close(snapshot.monthly_mpg, snapshot.avg_mpg));
    }

    #[test]
    fn month_over_month_deltas_compare_adjacent_windows() {
        let now = Utc.with_ymd_and_hms(2024, 3, 31, 0, 0, 0).single().expect("now");
        let now_ms = now.timestamp_millis();
        let records = vec![
            fillup(now_ms - 45 * MS_PER_DAY, 1000.0, 250.0, 10.0, 30.0),
            fillup(now_ms - 10 * MS_PER_DAY, 1300.0, 300.0, 10.0, 40.0),
            fillup(now_ms - 2 * MS_PER_DAY, 1600.0, 300.0, 12.0, 42.0),
        ];
        let snapshot = compute_snapshot(&records, Period::AllTime, &now).expect("snapshot");
        let deltas = snapshot.month_over_month;
        assert!(close(deltas.fuel_cost, 82.0 - 30.0));
        assert!(close(deltas.mileage, 600.0 - 250.0));
        assert!(close(deltas.mpg, (30.0 + 25.0) / 2.0 - 25.0));
    }

    #[test]
    fn deltas_are_zero_without_prior_window() {
        let now = Utc.with_ymd_and_hms(2024, 2, 15, 0, 0, 0).single().expect("now");
        let records = vec![fillup(
            (now - Duration::days(3)).timestamp_millis(),
            1000.0,
            300.0,
            10.0,
            30.0,
        )];
        let snapshot = compute_snapshot(&records, Period::AllTime, &now).expect("snapshot");
        assert_eq!(snapshot.month_over_month, WindowDeltas::default());
        assert_eq!(snapshot.year_over_year, WindowDeltas::default());
    }

    #[test]
    fn year_over_year_deltas_compare_adjacent_years() {
        let now = Utc.with_ymd_and_hms(2024, 6, 30, 0, 0, 0).single().expect("now");
        let now_ms = now.timestamp_millis();
        let records = vec![
            fillup(now_ms - 500 * MS_PER_DAY, 1000.0, 300.0, 10.0, 30.0),
            fillup(now_ms - 400 * MS_PER_DAY, 1300.0, 250.0, 10.0, 35.0),
            fillup(now_ms - 100 * MS_PER_DAY, 1600.0, 320.0, 10.0, 40.0),
            fillup(now_ms - 5 * MS_PER_DAY, 1900.0, 300.0, 12.0, 48.0),
        ];
        let snapshot = compute_snapshot(&records, Period::AllTime, &now).expect("snapshot");
        let deltas = snapshot.year_over_year;
        assert!(close(deltas.fuel_cost, 88.0 - 65.0));
        assert!(close(deltas.mileage, 620.0 - 550.0));
        assert!(close(deltas.mpg, 28.5 - 27.5));
    }

    #[test]
    fn record_at_cutoff_is_inside_period() {
        let now = Utc.with_ymd_and_hms(2024, 2, 15, 0, 0, 0).single().expect("now");
        let cutoff = now.timestamp_millis() - 30 * MS_PER_DAY;
        let records = vec![
            fillup(cutoff - 1, 1000.0, 300.0, 10.0, 30.0),
            fillup(cutoff, 1300.0, 300.0, 12.0, 36.0),
        ];
        let snapshot = compute_snapshot(&records, Period::Last30Days, &now).expect("snapshot");
        assert_eq!(snapshot.fillup_count, 1);
        assert!(close(snapshot.avg_gallons, 12.0));
    }

    #[test]
    fn degenerate_trip_meter_stays_finite() {
        let records = vec![
            fillup(ts(2024, 1, 1), 1000.0, 0.0, 10.0, 30.0),
            fillup(ts(2024, 1, 8), 1000.0, 0.0, 10.0, 30.0),
        ];
        let now = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).single().expect("now");
        let snapshot = compute_snapshot(&records, Period::AllTime, &now).expect("snapshot");
        assert_eq!(snapshot.avg_cost_per_mile, 0.0);
        assert_eq!(snapshot.cost_per_mile_change, 0.0);
        assert_eq!(snapshot.avg_mpg, 0.0);
    }

    #[test]
    fn snapshot_is_idempotent() {
        let now = Utc.with_ymd_and_hms(2024, 2, 15, 0, 0, 0).single().expect("now");
        let records = jan_feb_records();
        for period in Period::ALL {
            let first = compute_snapshot(&records, period, &now);
            let second = compute_snapshot(&records, period, &now);
            assert_eq!(first, second);
            if let (Some(first), Some(second)) = (first, second) {
                assert_eq!(first.avg_mpg.to_bits(), second.avg_mpg.to_bits());
                assert_eq!(first.annual_mileage.to_bits(), second.annual_mileage.to_bits());
            }
        }
    }
}
