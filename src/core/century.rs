//! Purpose: Resolve the leading century digit of a national ID.
//! Exports: `CenturyInfo`, `resolve`.
//! Role: First resolver in the decode pipeline; feeds the birth-date resolver.
//! Invariants: Only codes 2 and 3 are valid; the table is process-lifetime constant.

use crate::core::error::{Error, ErrorKind};

pub(crate) const MALFORMED_CENTURY: &str = "Malformed century.";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CenturyInfo {
    pub code: u8,
    pub span: &'static str,
    pub base_year: i32,
}

const CENTURIES: &[CenturyInfo] = &[
    CenturyInfo {
        code: 2,
        span: "1900-1999",
        base_year: 1900,
    },
    CenturyInfo {
        code: 3,
        span: "2000-2099",
        base_year: 2000,
    },
];

pub fn resolve(code: &str) -> Result<CenturyInfo, Error> {
    let code: u8 = code.parse().map_err(|_| malformed())?;
    CENTURIES
        .iter()
        .find(|info| info.code == code)
        .copied()
        .ok_or_else(malformed)
}

fn malformed() -> Error {
    Error::new(ErrorKind::Century).with_message(MALFORMED_CENTURY)
}
