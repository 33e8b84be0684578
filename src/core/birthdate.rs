//! Purpose: Resolve the year/month/day fields into a validated birth date.
//! Exports: `BirthDate`, `resolve`.
//! Role: Second resolver; consumes the base year produced by the century resolver.
//! Invariants: Dates strictly after the reference date are rejected.
//! Invariants: Epoch seconds are local midnight under the reference clock's UTC offset.

use crate::core::error::{Error, ErrorKind};
use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, Time};

pub(crate) const MALFORMED_BIRTH_DATE: &str = "Malformed birth date.";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BirthDate {
    pub date: Date,
    pub unix_timestamp: i64,
}

pub fn resolve(
    year: &str,
    month: &str,
    day: &str,
    base_year: i32,
    now: OffsetDateTime,
) -> Result<BirthDate, Error> {
    let year_in_century: i32 = year.parse().map_err(|_| malformed())?;
    let month: u8 = month.parse().map_err(|_| malformed())?;
    let month = Month::try_from(month).map_err(|_| malformed())?;
    let day: u8 = day.parse().map_err(|_| malformed())?;

    let date =
        Date::from_calendar_date(base_year + year_in_century, month, day).map_err(|_| malformed())?;
    if date > now.date() {
        return Err(malformed());
    }

    let unix_timestamp = PrimitiveDateTime::new(date, Time::MIDNIGHT)
        .assume_offset(now.offset())
        .unix_timestamp();
    Ok(BirthDate {
        date,
        unix_timestamp,
    })
}

fn malformed() -> Error {
    Error::new(ErrorKind::BirthDate).with_message(MALFORMED_BIRTH_DATE)
}
