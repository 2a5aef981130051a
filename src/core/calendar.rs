//! Calendar-day boundaries in the deployment's canonical timezone
//!
//! Both the order listing filter and the daily report reason about "a day". They
//! share [`DayWindow`] so a day always means the same inclusive range of instants.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};

/// Inclusive `[00:00:00.000, 23:59:59.999]` range of one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DayWindow {
    /// Window covering `day` as observed at `offset`
    pub fn for_date(day: NaiveDate, offset: FixedOffset) -> Self {
        let start = local_midnight(day, offset);
        let end = start + Duration::days(1) - Duration::milliseconds(1);
        Self { start, end }
    }

    /// Window covering the day that contains `instant` at `offset`
    pub fn containing(instant: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self::for_date(instant.with_timezone(&offset).date_naive(), offset)
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

/// Today's calendar date at `offset`
pub fn today(offset: FixedOffset) -> NaiveDate {
    Utc::now().with_timezone(&offset).date_naive()
}

fn local_midnight(day: NaiveDate, offset: FixedOffset) -> DateTime<Utc> {
    let naive = day.and_time(NaiveTime::MIN);
    // A fixed offset has no gaps or folds, so the mapping is always unique
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|local| local.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive))
}
