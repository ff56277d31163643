use chrono::{Datelike, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, TimeZone};

/// UTC-5, moving to UTC-4 from April through October.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Eastern;

impl Eastern {
    fn offset_in(month: u32) -> FixedOffset {
        let hours = if (4..=10).contains(&month) { 4 } else { 5 };
        FixedOffset::west_opt(hours * 3600).expect("offset")
    }
}

impl TimeZone for Eastern {
    type Offset = FixedOffset;

    fn from_offset(_: &FixedOffset) -> Self {
        Eastern
    }

    fn offset_from_local_date(&self, local: &NaiveDate) -> LocalResult<FixedOffset> {
        LocalResult::Single(Self::offset_in(local.month()))
    }

    fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
        LocalResult::Single(Self::offset_in(local.month()))
    }

    fn offset_from_utc_date(&self, utc: &NaiveDate) -> FixedOffset {
        Self::offset_in(utc.month())
    }

    fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
        Self::offset_in(utc.month())
    }
}
