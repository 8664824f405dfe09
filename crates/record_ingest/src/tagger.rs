//! Best-effort helpers over the reserved `_type` and `_raw` keys.
//!
//! Predicates never fail: a missing or non-string tag simply does not match.

use crate::record::{Record, RecordType, TYPE_KEY};

fn has_type(record: &Record, ty: RecordType) -> bool {
    record
        .get(TYPE_KEY)
        .and_then(|value| value.as_str())
        .is_some_and(|tag| tag == ty.as_str())
}

pub fn is_plus(record: &Record) -> bool {
    has_type(record, RecordType::Plus)
}

pub fn is_start_relation(record: &Record) -> bool {
    has_type(record, RecordType::StartRelation)
}

pub fn is_end_relation(record: &Record) -> bool {
    has_type(record, RecordType::EndRelation)
}

pub fn is_relation(record: &Record) -> bool {
    has_type(record, RecordType::Relation)
}

pub fn is_meta(record: &Record) -> bool {
    has_type(record, RecordType::Meta)
}

pub fn create_start_relation() -> Record {
    Record::tagged(RecordType::StartRelation)
}

pub fn create_end_relation() -> Record {
    Record::tagged(RecordType::EndRelation)
}

/// Stamps `Relation` onto `record`, replacing any previous tag.
pub fn create_relation(mut record: Record) -> Record {
    record.set_type(RecordType::Relation);
    record
}

/// Stamps `Meta` onto `record`, replacing any previous tag.
pub fn create_meta(mut record: Record) -> Record {
    record.set_type(RecordType::Meta);
    record
}

/// The `_raw` text, or `""` when it is absent or not a string.
pub fn extract_raw(record: &Record) -> &str {
    record.raw().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(value: serde_json::Value) -> Record {
        Record::try_from(value).unwrap()
    }

    #[test]
    fn relation_round_trip_matches_only_relation() {
        let rec = create_relation(record(json!({"k": "v"})));
        assert!(is_relation(&rec));
        assert!(!is_start_relation(&rec));
        assert!(!is_end_relation(&rec));
        assert!(!is_meta(&rec));
        assert!(!is_plus(&rec));
        assert_eq!(rec.get("k"), Some(&json!("v")));
    }

    #[test]
    fn create_meta_overwrites_existing_tag() {
        let rec = create_meta(record(json!({"_type": "PLUS", "n": 1})));
        assert!(is_meta(&rec));
        assert!(!is_plus(&rec));
    }

    #[test]
    fn start_and_end_relations_are_tag_only() {
        let start = create_start_relation();
        let end = create_end_relation();
        assert_eq!(start.len(), 1);
        assert!(is_start_relation(&start));
        assert!(is_end_relation(&end));
        assert!(!is_relation(&start));
    }

    #[test]
    fn predicates_tolerate_missing_and_mistyped_tags() {
        assert!(!is_plus(&Record::new()));
        assert!(!is_meta(&record(json!({"_type": ["Meta"]}))));
        assert!(!is_relation(&record(json!({"_type": null}))));
        assert!(!is_plus(&record(json!({"_type": "plus"}))));
    }

    #[test]
    fn extract_raw_defaults_to_empty() {
        assert_eq!(extract_raw(&Record::new()), "");
        assert_eq!(extract_raw(&record(json!({"_raw": 12}))), "");
        assert_eq!(extract_raw(&record(json!({"_raw": "line"}))), "line");
    }
}
