//! Purpose: Resolve the two-digit governorate field against the issuing table.
//! Exports: `Governorate`, `resolve`.
//! Role: Third resolver; pure membership lookup in a static table.
//! Invariants: The table is sorted by code and deliberately sparse.
//! Invariants: Codes 05-10, 21, 30, 36-87, and 89-99 are not assigned.

use crate::core::error::{Error, ErrorKind};

pub(crate) const MALFORMED_GOVERNORATE: &str = "Malformed Governorate.";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Governorate {
    pub code: u8,
    pub name: &'static str,
}

const GOVERNORATES: &[(u8, &str)] = &[
    (1, "Cairo"),
    (2, "Alexandria"),
    (3, "Port Said"),
    (4, "Suez"),
    (11, "Damietta"),
    (12, "Dakahlia"),
    (13, "Sharqia"),
    (14, "Qalyubia"),
    (15, "Kafr AlSheikh"),
    (16, "Gharbia"),
    (17, "Monufia"),
    (18, "Beheira"),
    (19, "Ismailia"),
    (20, "Giza"),
    (22, "Bani Sweif"),
    (23, "Fayoum"),
    (24, "Minya"),
    (25, "Asyut"),
    (26, "Sohag"),
    (27, "Qina"),
    (28, "Aswan"),
    (29, "Luxor"),
    (31, "Red Sea"),
    (32, "New Valley"),
    (33, "Matrouh"),
    (34, "North Sinai"),
    (35, "South Sinai"),
    (88, "Outside The Republic"),
];

pub fn resolve(code: &str) -> Result<Governorate, Error> {
    let code: u8 = code.parse().map_err(|_| malformed())?;
    GOVERNORATES
        .binary_search_by_key(&code, |(key, _)| *key)
        .map(|index| Governorate {
            code,
            name: GOVERNORATES[index].1,
        })
        .map_err(|_| malformed())
}

fn malformed() -> Error {
    Error::new(ErrorKind::Governorate).with_message(MALFORMED_GOVERNORATE)
}

#[cfg(test)]
mod tests {
    use super::{GOVERNORATES, MALFORMED_GOVERNORATE, resolve};
    use crate::core::error::ErrorKind;

    #[test]
    fn table_is_sorted_by_code() {
        for window in GOVERNORATES.windows(2) {
            assert!(window[0].0 < window[1].0);
        }
    }

    #[test]
    fn resolves_known_codes() {
        let cases = [
            ("01", 1, "Cairo"),
            ("04", 4, "Suez"),
            ("20", 20, "Giza"),
            ("29", 29, "Luxor"),
            ("35", 35, "South Sinai"),
            ("88", 88, "Outside The Republic"),
        ];
        for (input, code, name) in cases {
            let governorate = resolve(input).expect("known code");
            assert_eq!(governorate.code, code);
            assert_eq!(governorate.name, name);
        }
    }

    #[test]
    fn rejects_unassigned_codes() {
        for code in ["00", "05", "06", "10", "21", "30", "36", "87", "89", "90", "99"] {
            let err = resolve(code).expect_err("unassigned code");
            assert_eq!(err.kind(), ErrorKind::Governorate);
            assert_eq!(err.message(), Some(MALFORMED_GOVERNORATE));
        }
    }

    #[test]
    fn rejects_non_numeric_codes() {
        let err = resolve("x9").expect_err("non-numeric code");
        assert_eq!(err.kind(), ErrorKind::Governorate);
        assert_eq!(err.message(), Some(MALFORMED_GOVERNORATE));
    }
}
