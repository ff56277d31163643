use std::fmt::Write;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use mileage_core::{FillupRecord, safe_ratio};
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::types::{IngestError, IngestIssue, IngestOptions, IngestStats, ParsedSheet, Result};

const COL_TIMESTAMP: usize = 0;
const COL_ODOMETER: usize = 1;
const COL_TRIP_METER: usize = 2;
const COL_GALLONS: usize = 3;
const COL_TOTAL_COST: usize = 4;
const COL_COST_PER_GALLON: usize = 5;

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%m/%d/%Y %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];
const NAIVE_DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d"];

/// Returns the JSON object inside a `google.visualization.Query.setResponse(...)`
/// wrapper. Bare JSON passes through.
pub fn strip_envelope(text: &str) -> Result<&str> {
    let trimmed = text.trim();
    if trimmed.starts_with('{') {
        return Ok(trimmed);
    }
    let marker = "setResponse(";
    let start = trimmed
        .find(marker)
        .map(|index| index + marker.len())
        .ok_or_else(|| IngestError::Payload("missing setResponse wrapper".to_string()))?;
    let end = trimmed
        .rfind(')')
        .filter(|end| *end >= start)
        .ok_or_else(|| IngestError::Payload("unterminated setResponse wrapper".to_string()))?;
    Ok(&trimmed[start..end])
}

pub fn payload_digest(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        let _ = write!(hex, "{:02x}", byte);
    }
    hex
}

fn cell_value(row: &Value, index: usize) -> Option<&Value> {
    let value = row.get("c")?.get(index)?.get("v")?;
    if value.is_null() { None } else { Some(value) }
}

fn cell_number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => {
            let cleaned: String = raw
                .trim()
                .chars()
                .filter(|ch| *ch != '$' && *ch != ',')
                .collect();
            cleaned.parse::<f64>().ok()
        }
        _ => None,
    };
    parsed.filter(|value| value.is_finite())
}

/// Parses the `Date(year, month0, day[, h, m, s[, ms]])` literal gviz uses for
/// date and datetime cells. Months are zero-based.
fn parse_gviz_date(raw: &str, offset: &FixedOffset) -> Option<i64> {
    let inner = raw.trim().strip_prefix("Date(")?.strip_suffix(')')?;
    let parts = inner
        .split(',')
        .map(|part| part.trim().parse::<i64>().ok())
        .collect::<Option<Vec<_>>>()?;
    if parts.len() < 3 {
        return None;
    }
    let part = |index: usize| parts.get(index).copied().unwrap_or(0);
    let date = NaiveDate::from_ymd_opt(
        i32::try_from(part(0)).ok()?,
        u32::try_from(part(1) + 1).ok()?,
        u32::try_from(part(2)).ok()?,
    )?;
    let time = date.and_hms_milli_opt(
        u32::try_from(part(3)).ok()?,
        u32::try_from(part(4)).ok()?,
        u32::try_from(part(5)).ok()?,
        u32::try_from(part(6)).ok()?,
    )?;
    local_millis(&time, offset)
}

fn local_millis(value: &NaiveDateTime, offset: &FixedOffset) -> Option<i64> {
    offset
        .from_local_datetime(value)
        .single()
        .map(|parsed| parsed.timestamp_millis())
}

fn parse_timestamp_str(raw: &str, offset: &FixedOffset) -> Option<i64> {
    let raw = raw.trim();
    if raw.starts_with("Date(") {
        return parse_gviz_date(raw, offset);
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.timestamp_millis());
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return local_millis(&parsed, offset);
        }
    }
    for format in NAIVE_DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(raw, format) {
            return local_millis(&parsed.and_hms_opt(0, 0, 0)?, offset);
        }
    }
    if !raw.is_empty() && raw.chars().all(|ch| ch.is_ascii_digit()) {
        return raw.parse::<i64>().ok();
    }
    None
}

fn parse_timestamp(value: &Value, offset: &FixedOffset) -> Option<i64> {
    match value {
        Value::String(raw) => parse_timestamp_str(raw, offset),
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|value| value as i64)),
        _ => None,
    }
}

enum RowOutcome {
    Record(FillupRecord),
    Skipped,
    Invalid(String),
}

fn parse_row(row: &Value, offset: &FixedOffset) -> RowOutcome {
    let number = |index: usize| cell_value(row, index).and_then(cell_number);
    let (Some(odometer), Some(gallons), Some(total_cost)) = (
        number(COL_ODOMETER),
        number(COL_GALLONS),
        number(COL_TOTAL_COST),
    ) else {
        return RowOutcome::Skipped;
    };
    if odometer <= 0.0 || gallons <= 0.0 || total_cost <= 0.0 {
        return RowOutcome::Skipped;
    }
    let Some(raw_timestamp) = cell_value(row, COL_TIMESTAMP) else {
        return RowOutcome::Invalid("missing timestamp".to_string());
    };
    let Some(timestamp_ms) = parse_timestamp(raw_timestamp, offset) else {
        return RowOutcome::Invalid(format!("unparseable timestamp {}", raw_timestamp));
    };
    let cost_per_gallon = number(COL_COST_PER_GALLON)
        .filter(|value| *value > 0.0)
        .unwrap_or_else(|| safe_ratio(total_cost, gallons));
    RowOutcome::Record(FillupRecord {
        timestamp_ms,
        odometer,
        trip_meter: number(COL_TRIP_METER).unwrap_or(0.0),
        gallons,
        total_cost,
        cost_per_gallon,
    })
}

fn gviz_error_message(value: &Value) -> Option<String> {
    if value.get("status").and_then(Value::as_str) != Some("error") {
        return None;
    }
    let messages = value
        .get("errors")
        .and_then(Value::as_array)
        .map(|errors| {
            errors
                .iter()
                .filter_map(|error| {
                    error
                        .get("detailed_message")
                        .or_else(|| error.get("message"))
                        .and_then(Value::as_str)
                })
                .collect::<Vec<_>>()
                .join("; ")
        })
        .unwrap_or_default();
    Some(if messages.is_empty() {
        "sheet query returned an error".to_string()
    } else {
        messages
    })
}

/// Parses a sheet export into fill-up records, in sheet order.
///
/// Rows lacking an odometer reading, a positive gallon count, or a total
/// cost are dropped silently; rows whose timestamp cannot be read are
/// dropped and reported in [`IngestStats::issues`].
pub fn parse_payload(text: &str, options: &IngestOptions) -> Result<ParsedSheet> {
    let offset = options.offset()?;
    let value: Value = serde_json::from_str(strip_envelope(text)?)?;
    if let Some(message) = gviz_error_message(&value) {
        return Err(IngestError::Payload(message));
    }
    let rows = value
        .get("table")
        .and_then(|table| table.get("rows"))
        .and_then(Value::as_array)
        .ok_or_else(|| IngestError::Payload("missing table.rows".to_string()))?;

    let mut stats = IngestStats {
        payload_sha256: payload_digest(text),
        ..IngestStats::default()
    };
    let mut records: Vec<FillupRecord> = Vec::new();
    for (index, row) in rows.iter().enumerate().skip(options.header_rows) {
        stats.rows_scanned += 1;
        match parse_row(row, &offset) {
            RowOutcome::Record(record) => {
                if let Some(previous) = records.last()
                    && record.timestamp_ms < previous.timestamp_ms
                {
                    warn!(row = index, "fill-up is older than the row before it");
                }
                records.push(record);
            }
            RowOutcome::Skipped => stats.rows_skipped += 1,
            RowOutcome::Invalid(message) => {
                stats.rows_skipped += 1;
                stats.issues.push(IngestIssue {
                    row: index,
                    message,
                });
            }
        }
    }
    stats.records_parsed = records.len();
    debug!(
        rows = stats.rows_scanned,
        records = stats.records_parsed,
        skipped = stats.rows_skipped,
        "parsed sheet payload"
    );
    Ok(ParsedSheet { records, stats })
}
