//! Purpose: Render decoded metadata as the stable wire JSON object.
//! Exports: `metadata_json`.
//! Role: Shared contract helper for CLI stdout and the HTTP server.
//! Invariants: Field set and names are stable once published; additive-only.
use enid_sieve::api::Metadata;
use serde_json::{Value, json};

pub fn metadata_json(metadata: &Metadata) -> Value {
    json!({
        "century_code": metadata.century_code,
        "century_span": metadata.century_span,
        "birthdate": metadata.birthdate,
        "birthdate_unixtimestamp": metadata.birthdate_unixtimestamp,
        "governorate": metadata.governorate,
        "governorate_code": metadata.governorate_code,
        "gender": metadata.gender.as_str(),
        "check_code": metadata.check_code,
    })
}

#[cfg(test)]
mod tests {
    use super::metadata_json;
    use enid_sieve::api::{Gender, Metadata};

    #[test]
    fn metadata_json_has_required_fields() {
        let metadata = Metadata {
            century_code: 2,
            century_span: "1900-1999".to_string(),
            birthdate: "1996-08-01".to_string(),
            birthdate_unixtimestamp: 838_857_600,
            governorate: "South Sinai".to_string(),
            governorate_code: 35,
            gender: Gender::Male,
            check_code: 2,
        };

        let value = metadata_json(&metadata);
        let obj = value.as_object().expect("metadata object");

        assert_eq!(obj.get("century_code").and_then(|v| v.as_u64()), Some(2));
        assert_eq!(
            obj.get("century_span").and_then(|v| v.as_str()),
            Some("1900-1999")
        );
        assert_eq!(
            obj.get("birthdate").and_then(|v| v.as_str()),
            Some("1996-08-01")
        );
        assert_eq!(
            obj.get("birthdate_unixtimestamp").and_then(|v| v.as_i64()),
            Some(838_857_600)
        );
        assert_eq!(
            obj.get("governorate").and_then(|v| v.as_str()),
            Some("South Sinai")
        );
        assert_eq!(
            obj.get("governorate_code").and_then(|v| v.as_u64()),
            Some(35)
        );
        assert_eq!(obj.get("gender").and_then(|v| v.as_str()), Some("male"));
        assert_eq!(obj.get("check_code").and_then(|v| v.as_u64()), Some(2));
        assert_eq!(obj.len(), 8);
    }
}
