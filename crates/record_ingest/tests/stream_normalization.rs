use std::fs::File;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use record_ingest::tagger::{extract_raw, is_meta, is_plus};
use record_ingest::{
    aggregate, decode, decode_piped, DecodeConfig, DecodeOutcome, ErrorDetail,
    ErrorDetailCapture, ErrorDetailSink, JsonSink, RawTextAggregator, Record, SkipReason,
    StreamDecoder,
};
use serde_json::{json, Value};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn open_fixture(name: &str) -> File {
    File::open(fixture(name)).expect("open fixture")
}

fn record(value: Value) -> Record {
    Record::try_from(value).expect("object")
}

fn output_lines(bytes: Vec<u8>) -> Vec<Value> {
    String::from_utf8(bytes)
        .expect("utf-8 output")
        .lines()
        .map(|line| serde_json::from_str(line).expect("json line"))
        .collect()
}

#[derive(Clone, Default)]
struct Details(Arc<Mutex<Vec<ErrorDetail>>>);

impl ErrorDetailSink for Details {
    fn on_error(&mut self, detail: ErrorDetail) {
        self.0.lock().unwrap().push(detail);
    }
}

#[test]
fn mixed_fixture_keeps_objects_in_order() {
    let mut seen = Vec::new();
    let summary = decode(open_fixture("mixed.jsonl"), &mut |r: Record| seen.push(r));

    assert_eq!(
        seen,
        vec![
            record(json!({"a": 1})),
            record(json!({"b": 2})),
            record(json!({"_type": "Meta", "source": "fixture"})),
            record(json!({"nested": {"k": [true, null, "v"]}, "n": -1.5})),
        ]
    );
    assert!(is_meta(&seen[2]));
    assert_eq!(summary.records, 4);
    assert_eq!(summary.skipped, 2);
}

#[test]
fn skipped_lines_reach_the_error_sink_with_line_numbers() {
    let details = Details::default();
    let config =
        DecodeConfig::default().with_error_sink(ErrorDetailCapture::FullDetails, details.clone());

    let mut seen = Vec::new();
    StreamDecoder::new(open_fixture("mixed.jsonl"), config)
        .decode_into(&mut |r: Record| seen.push(r));

    let details = details.0.lock().unwrap();
    let got: Vec<_> = details
        .iter()
        .map(|d| (d.line_number, d.reason, d.line.clone()))
        .collect();
    assert_eq!(
        got,
        vec![
            (2, SkipReason::InvalidJson, Some("not json".to_string())),
            (5, SkipReason::NotAnObject, Some("[1,2,3]".to_string())),
        ]
    );
}

#[test]
fn decoded_records_round_trip_through_the_sink() {
    let mut sink = JsonSink::new(Vec::new());
    let outcome = decode_piped(open_fixture("mixed.jsonl"), &mut sink, DecodeConfig::default());
    assert!(matches!(outcome, DecodeOutcome::Completed(_)));
    assert_eq!(sink.written(), 4);

    let lines = output_lines(sink.into_inner());
    assert_eq!(lines[0], json!({"a": 1}));
    assert_eq!(lines[3]["nested"]["k"][2], json!("v"));
}

#[test]
fn raw_fixture_groups_indented_lines() {
    let mut aggregator = RawTextAggregator::new(JsonSink::new(Vec::new()));
    let summary = aggregate(open_fixture("stack_trace.log"), &mut aggregator);
    assert_eq!(summary.lines, 7);

    let lines = output_lines(aggregator.finish().into_inner());
    let raws: Vec<_> = lines
        .iter()
        .map(|line| line["_raw"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        raws,
        vec![
            "Error: boom\n  at foo.go:10\n  at main.go:3",
            "Error: again",
            "INFO started\n\n\ttail after blank",
        ]
    );
    assert!(lines.iter().all(|line| line["_type"] == "PLUS"));
}

#[test]
fn raw_records_feed_a_record_processor() {
    let mut records = Vec::new();
    {
        let mut aggregator = RawTextAggregator::new(|r: Record| records.push(r));
        for chunk in ["Error: boom", "  at foo.go:10", "Error: again"] {
            aggregator.process(chunk);
        }
        aggregator.flush();
        aggregator.flush();
    }

    assert_eq!(records.len(), 2);
    assert!(records.iter().all(is_plus));
    assert_eq!(extract_raw(&records[0]), "Error: boom\n  at foo.go:10");
    assert_eq!(extract_raw(&records[1]), "Error: again");
}
