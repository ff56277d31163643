use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

pub const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;
pub const MS_PER_YEAR: i64 = 365 * MS_PER_DAY;

/// Dashboard-wide time window used to scope averages and trends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "30")]
    Last30Days,
    #[serde(rename = "90")]
    Last90Days,
    #[serde(rename = "ytd")]
    YearToDate,
    #[serde(rename = "365")]
    LastYear,
    #[default]
    #[serde(rename = "all")]
    AllTime,
}

impl Period {
    pub const ALL: [Period; 5] = [
        Period::Last30Days,
        Period::Last90Days,
        Period::YearToDate,
        Period::LastYear,
        Period::AllTime,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Last30Days => "30",
            Self::Last90Days => "90",
            Self::YearToDate => "ytd",
            Self::LastYear => "365",
            Self::AllTime => "all",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Last30Days => "Last 30 Days",
            Self::Last90Days => "Last 90 Days",
            Self::YearToDate => "Year to Date",
            Self::LastYear => "Last Year",
            Self::AllTime => "All Time",
        }
    }

    /// Earliest timestamp (inclusive) a record may carry to fall inside the
    /// window ending at `now`. `None` means no cutoff.
    pub fn cutoff_ms<Tz: TimeZone>(self, now: &DateTime<Tz>) -> Option<i64> {
        match self {
            Self::Last30Days => Some(trailing_cutoff_ms(now, 30)),
            Self::Last90Days => Some(trailing_cutoff_ms(now, 90)),
            Self::LastYear => Some(trailing_cutoff_ms(now, 365)),
            Self::YearToDate => Some(start_of_year_ms(now)),
            Self::AllTime => None,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = ParsePeriodError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "30" => Ok(Self::Last30Days),
            "90" => Ok(Self::Last90Days),
            "ytd" => Ok(Self::YearToDate),
            "365" => Ok(Self::LastYear),
            "all" => Ok(Self::AllTime),
            _ => Err(ParsePeriodError(value.to_string())),
        }
    }
}

/// Window selector for the chart series, independent of [`Period`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartPeriod {
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = "30")]
    Last30,
    #[serde(rename = "90")]
    Last90,
    #[serde(rename = "ytd")]
    YearToDate,
}

impl ChartPeriod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Last30 => "30",
            Self::Last90 => "90",
            Self::YearToDate => "ytd",
        }
    }

    pub fn cutoff_ms<Tz: TimeZone>(self, now: &DateTime<Tz>) -> Option<i64> {
        match self {
            Self::All => None,
            Self::Last30 => Some(trailing_cutoff_ms(now, 30)),
            Self::Last90 => Some(trailing_cutoff_ms(now, 90)),
            Self::YearToDate => Some(start_of_year_ms(now)),
        }
    }
}

impl fmt::Display for ChartPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartPeriod {
    type Err = ParsePeriodError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "30" => Ok(Self::Last30),
            "90" => Ok(Self::Last90),
            "ytd" => Ok(Self::YearToDate),
            _ => Err(ParsePeriodError(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePeriodError(pub String);

impl fmt::Display for ParsePeriodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported period {}", self.0)
    }
}

impl std::error::Error for ParsePeriodError {}

pub(crate) fn trailing_cutoff_ms<Tz: TimeZone>(now: &DateTime<Tz>, days: i64) -> i64 {
    now.timestamp_millis() - days * MS_PER_DAY
}

fn start_of_year_ms<Tz: TimeZone>(now: &DateTime<Tz>) -> i64 {
    let year = now.year();
    if let Some(start) = now
        .timezone()
        .with_ymd_and_hms(year, 1, 1, 0, 0, 0)
        .earliest()
    {
        return start.timestamp_millis();
    }
    // Local midnight skipped by a DST jump; the UTC date is close enough.
    NaiveDate::from_ymd_opt(year, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|start| start.and_utc().timestamp_millis())
        .unwrap_or(i64::MIN)
}
