//! Aggregation of unstructured text into multi-line `PLUS` records.
//!
//! A chunk that starts with a non-whitespace character opens a new record. A
//! chunk that is empty or starts with whitespace continues the current one and
//! is joined to it with `\n`. This reassembles events such as stack traces
//! whose continuation lines are indented.

use std::io::{Read, Stdout};

use tracing::{debug, warn};

use crate::processor::{AggregatingProcessor, Processor};
use crate::reader::{LineSource, SourceLine};
use crate::record::{Record, RecordType, RAW_KEY};
use crate::sink::JsonSink;

pub struct RawTextAggregator<P: Processor> {
    output: P,
    buffer: String,
}

impl RawTextAggregator<JsonSink<Stdout>> {
    pub fn stdout() -> Self {
        Self::new(JsonSink::stdout())
    }
}

impl<P: Processor> RawTextAggregator<P> {
    pub fn new(output: P) -> Self {
        Self {
            output,
            buffer: String::new(),
        }
    }

    /// Buffers one chunk, flushing the previous record when `chunk` opens a
    /// new one.
    pub fn process(&mut self, chunk: &str) {
        let starts_record = chunk.chars().next().is_some_and(|ch| !ch.is_whitespace());
        if starts_record {
            self.flush();
            self.buffer.push_str(chunk);
        } else {
            self.buffer.push('\n');
            self.buffer.push_str(chunk);
        }
    }

    /// Like [`process`](Self::process); invalid UTF-8 becomes U+FFFD.
    pub fn process_bytes(&mut self, chunk: &[u8]) {
        self.process(&String::from_utf8_lossy(chunk));
    }

    /// Emits the buffered text as a `PLUS` record. An empty buffer emits
    /// nothing.
    pub fn flush(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let mut record = Record::tagged(RecordType::Plus);
        record.insert(RAW_KEY, std::mem::take(&mut self.buffer));
        self.output.process(record);
    }

    pub fn pending(&self) -> &str {
        &self.buffer
    }

    pub fn output(&self) -> &P {
        &self.output
    }

    /// Flushes the pending record and hands back the output.
    pub fn finish(mut self) -> P {
        self.flush();
        self.output
    }
}

impl<P: AggregatingProcessor> RawTextAggregator<P> {
    /// Flushes the pending record, then the output itself.
    pub fn flush_all(&mut self) {
        self.flush();
        self.output.flush();
    }
}

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct AggregateSummary {
    pub lines: usize,
    pub io_error: bool,
}

/// Feeds every logical line of `reader` into `aggregator`, then flushes it.
///
/// Blank lines are passed through as continuations.
pub fn aggregate<R: Read, P: Processor>(
    reader: R,
    aggregator: &mut RawTextAggregator<P>,
) -> AggregateSummary {
    let mut summary = AggregateSummary::default();
    for line in LineSource::new(reader, None) {
        match line {
            SourceLine::Line { bytes, .. } => {
                summary.lines += 1;
                aggregator.process_bytes(&bytes);
            }
            SourceLine::LineTooLong { line_number, .. } => {
                debug!(line_number, "unbounded source reported an oversized line");
            }
            SourceLine::IoError { line_number, kind } => {
                warn!(line_number, ?kind, "read failed; ending raw input");
                summary.io_error = true;
            }
        }
    }
    aggregator.flush();
    summary
}
