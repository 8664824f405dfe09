#![forbid(unsafe_code)]
//! Normalization of line-oriented input into structured records.
//!
//! Two ingestion paths share one [`Record`] representation:
//! - [`StreamDecoder`] turns newline-delimited JSON objects into records,
//!   logging and skipping lines that are not objects.
//! - [`RawTextAggregator`] folds unstructured text lines into multi-line
//!   `PLUS` records, treating indented lines as continuations.
//!
//! Records go to a [`Processor`]; [`JsonSink`] writes them back out as NDJSON.

mod coerce;
mod config;
mod decoder;
mod error;
mod processor;
mod raw;
mod reader;
mod record;
mod sink;
pub mod tagger;

pub use coerce::coerce_number;
pub use config::{DecodeConfig, DecodeLimits, ErrorDetailCapture};
pub use decoder::{decode, decode_piped, decode_stdin, DecodeOutcome, DecodeSummary, StreamDecoder};
pub use error::{
    CoerceError, ErrorDetail, ErrorDetailSink, LineError, LineRecord, SinkError, SkipReason,
};
pub use processor::{AggregatingProcessor, Processor};
pub use raw::{aggregate, AggregateSummary, RawTextAggregator};
pub use reader::{LineSource, SourceLine};
pub use record::{Record, RecordType, UnknownRecordType, RAW_KEY, TYPE_KEY};
pub use sink::JsonSink;
