//! Purpose: Validated national-identifier newtype enforcing the wire format.
//! Exports: `Enid`.
//! Role: Caller-side format gate; the core decoder assumes this invariant holds.
//! Invariants: Construction succeeds only for exactly 14 ASCII digits.
//! Invariants: `metadata()` reads the clock fresh on every call.

use crate::core::decode::{self, Metadata};
use crate::core::error::{Error, ErrorKind};
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;

pub(crate) const MALFORMED_FORMAT: &str = "National ID must match [0-9]{14}.";
const ENID_LEN: usize = 14;

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Enid(String);

impl Enid {
    pub fn parse(input: &str) -> Result<Self, Error> {
        if input.len() != ENID_LEN || !input.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(Error::new(ErrorKind::Format)
                .with_message(MALFORMED_FORMAT)
                .with_hint("Provide exactly 14 ASCII digits, e.g. 29608013501312."));
        }
        Ok(Self(input.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decodes the metadata encoded in the identifier. The future-birth-date
    /// check uses the current local date, read fresh on every call.
    pub fn metadata(&self) -> Result<Metadata, Error> {
        decode::decode(&self.0, decode::now_local())
    }

    /// Same as [`Enid::metadata`] with an explicit reference clock; intended
    /// for deterministic tests.
    pub fn metadata_at(&self, now: OffsetDateTime) -> Result<Metadata, Error> {
        decode::decode(&self.0, now)
    }
}

impl FromStr for Enid {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Self::parse(input)
    }
}

impl fmt::Display for Enid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
