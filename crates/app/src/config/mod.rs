use chrono::{DateTime, FixedOffset, Local, SecondsFormat};
use mileage_core::{ChartPeriod, Period};
use serde::{Deserialize, Serialize};

/// Raw view selectors as they arrive from a frontend.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ViewParams {
    pub period: Option<String>,
    pub chart_period: Option<String>,
    /// RFC 3339 instant to evaluate trailing windows at; defaults to the local clock.
    pub now: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ViewSelection {
    pub period: Period,
    pub chart_period: ChartPeriod,
    pub now: ViewNow,
}

/// Instant a view is evaluated at. The local clock keeps its zone so calendar
/// boundaries follow its DST rules; an override keeps the offset it was
/// written with.
#[derive(Clone, Debug, PartialEq)]
pub enum ViewNow {
    Local(DateTime<Local>),
    Fixed(DateTime<FixedOffset>),
}

impl ViewNow {
    pub fn to_rfc3339(&self) -> String {
        match self {
            Self::Local(now) => now.to_rfc3339_opts(SecondsFormat::Millis, false),
            Self::Fixed(now) => now.to_rfc3339_opts(SecondsFormat::Millis, false),
        }
    }
}
