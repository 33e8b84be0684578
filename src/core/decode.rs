//! Purpose: Orchestrate the fixed-field decode of a national ID into metadata.
//! Exports: `Metadata`, `Gender`, `decode`, `now_local`.
//! Role: Slices the fixed offsets, runs the resolvers left to right, unifies failures.
//! Invariants: Callers only ever observe `ErrorKind::Decode` from this module.
//! Invariants: No partial metadata escapes; identifiers are never embedded in errors.
//! Invariants: Field offsets are fixed: century 0, year 1-2, month 3-4, day 5-6,
//! governorate 7-8, sequence 9-12, check 13.

use crate::core::birthdate;
use crate::core::century;
use crate::core::error::{Error, ErrorKind};
use crate::core::governorate;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;
use time::{Date, OffsetDateTime};

pub(crate) const DECODE_UNKNOWN: &str = "National ID decode unknown error.";

const CENTURY: Range<usize> = 0..1;
const YEAR: Range<usize> = 1..3;
const MONTH: Range<usize> = 3..5;
const DAY: Range<usize> = 5..7;
const GOVERNORATE: Range<usize> = 7..9;
const SEQUENCE: Range<usize> = 9..13;
const CHECK: Range<usize> = 13..14;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Female => "female",
            Gender::Male => "male",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Metadata {
    pub century_code: u8,
    pub century_span: String,
    pub birthdate: String,
    pub birthdate_unixtimestamp: i64,
    pub governorate: String,
    pub governorate_code: u8,
    pub gender: Gender,
    pub check_code: u8,
}

/// Decodes a pre-validated 14-digit identifier against the given reference
/// clock. Every failure surfaces as `ErrorKind::Decode` carrying the failing
/// resolver's message; the resolver error stays reachable through `source()`.
pub fn decode(enid: &str, now: OffsetDateTime) -> Result<Metadata, Error> {
    decode_fields(enid, now).map_err(unify)
}

/// Reads the local clock, falling back to UTC when the local UTC offset
/// cannot be determined (common on multi-threaded Unix processes).
pub fn now_local() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

fn decode_fields(enid: &str, now: OffsetDateTime) -> Result<Metadata, Error> {
    let century = century::resolve(field(enid, CENTURY)?)?;
    let birthdate = birthdate::resolve(
        field(enid, YEAR)?,
        field(enid, MONTH)?,
        field(enid, DAY)?,
        century.base_year,
        now,
    )?;
    let governorate = governorate::resolve(field(enid, GOVERNORATE)?)?;
    let sequence: u16 = parse_digits(field(enid, SEQUENCE)?)?;
    let gender = if sequence % 2 == 0 {
        Gender::Female
    } else {
        Gender::Male
    };
    let check_code: u8 = parse_digits(field(enid, CHECK)?)?;

    Ok(Metadata {
        century_code: century.code,
        century_span: century.span.to_string(),
        birthdate: format_date(birthdate.date)?,
        birthdate_unixtimestamp: birthdate.unix_timestamp,
        governorate: governorate.name.to_string(),
        governorate_code: governorate.code,
        gender,
        check_code,
    })
}

fn field(enid: &str, range: Range<usize>) -> Result<&str, Error> {
    enid.get(range).ok_or_else(|| {
        Error::new(ErrorKind::Internal)
            .with_message("identifier is shorter than the fixed field layout")
    })
}

fn parse_digits<T: FromStr>(digits: &str) -> Result<T, Error> {
    digits.parse().map_err(|_| {
        Error::new(ErrorKind::Internal)
            .with_message("non-numeric field in a pre-validated identifier")
    })
}

fn format_date(date: Date) -> Result<String, Error> {
    let format = time::format_description::parse("[year]-[month]-[day]").map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("date format description failed")
            .with_source(err)
    })?;
    date.format(&format).map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("failed to format birth date")
            .with_source(err)
    })
}

// Collapses resolver errors into the single outward Decode kind. Anything
// outside the expected resolver kinds is an internal fault: it is logged and
// replaced by the generic message so callers never see an unclassified error.
fn unify(err: Error) -> Error {
    match err.kind() {
        ErrorKind::Century | ErrorKind::BirthDate | ErrorKind::Governorate => {
            let message = err.message().unwrap_or(DECODE_UNKNOWN).to_string();
            Error::new(ErrorKind::Decode)
                .with_message(message)
                .with_source(err)
        }
        ErrorKind::Decode => err,
        _ => {
            tracing::warn!(kind = ?err.kind(), error = %err, "unexpected fault while decoding a national ID");
            Error::new(ErrorKind::Decode)
                .with_message(DECODE_UNKNOWN)
                .with_source(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DECODE_UNKNOWN, Gender, decode};
    use crate::core::birthdate::MALFORMED_BIRTH_DATE;
    use crate::core::century::MALFORMED_CENTURY;
    use crate::core::error::ErrorKind;
    use crate::core::governorate::MALFORMED_GOVERNORATE;
    use time::{Date, Month, OffsetDateTime};

    fn reference_now() -> OffsetDateTime {
        Date::from_calendar_date(2026, Month::January, 15)
            .expect("reference date")
            .midnight()
            .assume_utc()
    }

    #[test]
    fn decodes_a_valid_identifier() {
        let metadata = decode("29608013501312", reference_now()).expect("valid identifier");
        assert_eq!(metadata.century_code, 2);
        assert_eq!(metadata.century_span, "1900-1999");
        assert_eq!(metadata.birthdate, "1996-08-01");
        assert_eq!(metadata.birthdate_unixtimestamp, 838_857_600);
        assert_eq!(metadata.governorate, "South Sinai");
        assert_eq!(metadata.governorate_code, 35);
        assert_eq!(metadata.gender, Gender::Male);
        assert_eq!(metadata.check_code, 2);
    }

    #[test]
    fn rejects_a_future_birth_date() {
        // Century 3 puts the birth year at 2096, past the reference clock.
        let err = decode("39608013501312", reference_now()).expect_err("future date");
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert_eq!(err.message(), Some(MALFORMED_BIRTH_DATE));
    }

    #[test]
    fn rejects_an_unknown_century_digit() {
        let err = decode("49608013501312", reference_now()).expect_err("bad century");
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert_eq!(err.message(), Some(MALFORMED_CENTURY));
    }

    #[test]
    fn rejects_an_unassigned_governorate_code() {
        let err = decode("29608019001312", reference_now()).expect_err("bad governorate");
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert_eq!(err.message(), Some(MALFORMED_GOVERNORATE));
    }

    #[test]
    fn leftmost_invalid_field_wins() {
        // Century 4 and governorate 90 are both invalid; century is checked first.
        let err = decode("49608019001312", reference_now()).expect_err("bad fields");
        assert_eq!(err.message(), Some(MALFORMED_CENTURY));
    }

    #[test]
    fn gender_follows_sequence_parity() {
        let even = decode("29608013500002", reference_now()).expect("even sequence");
        assert_eq!(even.gender, Gender::Female);

        let odd = decode("29608013501312", reference_now()).expect("odd sequence");
        assert_eq!(odd.gender, Gender::Male);
    }

    #[test]
    fn accepts_a_birth_date_on_the_reference_date() {
        let metadata = decode("32601150101318", reference_now()).expect("today");
        assert_eq!(metadata.birthdate, "2026-01-15");
        assert_eq!(metadata.century_span, "2000-2099");
    }

    #[test]
    fn decode_is_idempotent_under_a_fixed_clock() {
        let first = decode("29608013501312", reference_now()).expect("first");
        let second = decode("29608013501312", reference_now()).expect("second");
        assert_eq!(first, second);
    }

    #[test]
    fn short_input_is_normalized_to_the_generic_decode_error() {
        let err = decode("296", reference_now()).expect_err("short input");
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert_eq!(err.message(), Some(DECODE_UNKNOWN));
    }

    #[test]
    fn resolver_error_is_preserved_as_source() {
        let err = decode("49608013501312", reference_now()).expect_err("bad century");
        let source = std::error::Error::source(&err).expect("source");
        assert!(source.to_string().contains(MALFORMED_CENTURY));
    }
}
