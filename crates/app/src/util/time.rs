use chrono::{DateTime, Local, SecondsFormat};
use mileage_core::{ChartPeriod, Period};

use crate::config::{ViewNow, ViewParams, ViewSelection};
use crate::error::{AppError, Result};

pub fn resolve_view(params: &ViewParams) -> Result<ViewSelection> {
    Ok(ViewSelection {
        period: parse_period(params.period.as_deref())?,
        chart_period: parse_chart_period(params.chart_period.as_deref())?,
        now: resolve_now(params.now.as_deref())?,
    })
}

pub fn resolve_now(value: Option<&str>) -> Result<ViewNow> {
    match value {
        Some(raw) => DateTime::parse_from_rfc3339(raw.trim())
            .map(ViewNow::Fixed)
            .map_err(|err| AppError::InvalidInput(format!("invalid datetime: {}", err))),
        None => Ok(ViewNow::Local(Local::now())),
    }
}

pub fn parse_period(value: Option<&str>) -> Result<Period> {
    match value {
        Some(raw) => Ok(raw.parse::<Period>()?),
        None => Ok(Period::default()),
    }
}

pub fn parse_chart_period(value: Option<&str>) -> Result<ChartPeriod> {
    match value {
        Some(raw) => Ok(raw.parse::<ChartPeriod>()?),
        None => Ok(ChartPeriod::default()),
    }
}

pub fn format_timestamp_ms(timestamp_ms: i64) -> Option<String> {
    DateTime::from_timestamp_millis(timestamp_ms)
        .map(|value| value.to_rfc3339_opts(SecondsFormat::Millis, true))
}
