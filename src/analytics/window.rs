use serde::Deserialize;
use time::{
    macros::time, util::days_in_year_month, Date, Month, OffsetDateTime, PrimitiveDateTime, Time,
};

use crate::error::ApiError;

/// `?month=&year=`; either part defaults to the current UTC month or year.
#[derive(Debug, Default, Deserialize)]
pub struct PeriodQuery {
    pub month: Option<u8>,
    pub year: Option<i32>,
}

/// Inclusive calendar-month range used by the monthly aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub start: Date,
    pub end: Date,
}

impl MonthWindow {
    pub fn resolve(query: &PeriodQuery, today: Date) -> Result<Self, ApiError> {
        let month = match query.month {
            Some(m) => Month::try_from(m)
                .map_err(|_| ApiError::invalid("month", "Month must be between 1 and 12"))?,
            None => today.month(),
        };
        let year = query.year.unwrap_or_else(|| today.year());

        let out_of_range = || ApiError::invalid("year", "Year is out of range");
        let start = Date::from_calendar_date(year, month, 1).map_err(|_| out_of_range())?;
        let end = Date::from_calendar_date(year, month, days_in_year_month(year, month))
            .map_err(|_| out_of_range())?;
        Ok(Self { start, end })
    }

    /// First instant of the window, 00:00:00.000 UTC.
    pub fn start_instant(&self) -> OffsetDateTime {
        PrimitiveDateTime::new(self.start, Time::MIDNIGHT).assume_utc()
    }

    /// Last instant of the window, 23:59:59.999 UTC.
    pub fn end_instant(&self) -> OffsetDateTime {
        PrimitiveDateTime::new(self.end, time!(23:59:59.999)).assume_utc()
    }

    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }
}
