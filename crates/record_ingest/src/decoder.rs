use std::io::{self, IsTerminal, Read};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::{DecodeConfig, ErrorDetailCapture};
use crate::error::{ErrorDetail, LineError, LineRecord};
use crate::processor::Processor;
use crate::reader::{LineSource, SourceLine};
use crate::record::Record;

/// Counts for one pass over an input stream.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct DecodeSummary {
    /// Logical lines seen, empty ones included.
    pub lines: usize,
    pub records: usize,
    pub skipped: usize,
    pub io_error: bool,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DecodeOutcome {
    Completed(DecodeSummary),
    /// The input was an interactive terminal; nothing was read.
    NoInput,
}

/// Decodes newline-delimited JSON objects into [`Record`]s.
///
/// Iterating yields one [`LineRecord`] per non-empty line, in stream order.
/// Reading stops after the first I/O error.
pub struct StreamDecoder<R: Read> {
    source: LineSource<R>,
    config: DecodeConfig,
}

impl<R: Read> StreamDecoder<R> {
    pub fn new(reader: R, config: DecodeConfig) -> Self {
        Self {
            source: LineSource::new(reader, config.limits.max_line_bytes),
            config,
        }
    }

    /// Forwards every decoded record to `processor` and logs every skipped
    /// line. Returns once the input is exhausted.
    pub fn decode_into<P: Processor + ?Sized>(mut self, processor: &mut P) -> DecodeSummary {
        let mut summary = DecodeSummary::default();
        while let Some(LineRecord {
            line_number,
            outcome,
        }) = self.next()
        {
            match outcome {
                Ok(record) => {
                    summary.records += 1;
                    processor.process(record);
                }
                Err(LineError::Io) => {
                    summary.io_error = true;
                    warn!(line_number, "read failed; ending input");
                }
                Err(err) => {
                    summary.skipped += 1;
                    warn!(line_number, reason = err.reason().as_str(), "skipping line: {}", err);
                }
            }
        }
        summary.lines = self.source.line_number();
        debug!(
            lines = summary.lines,
            records = summary.records,
            skipped = summary.skipped,
            "input exhausted"
        );
        summary
    }

    fn parse_line(line: &str) -> Result<Record, LineError> {
        let value: Value = serde_json::from_str(line).map_err(|err| LineError::InvalidJson {
            summary: err.to_string(),
        })?;
        Record::try_from(value).map_err(|other| LineError::NotAnObject {
            found: value_kind(&other),
        })
    }

    fn report(&mut self, line_number: usize, err: &LineError, line: Option<&[u8]>) {
        let Some(sink) = self.config.error_sink.as_mut() else {
            return;
        };
        let line = match self.config.error_detail_capture {
            ErrorDetailCapture::FullDetails => {
                line.map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            }
            ErrorDetailCapture::RedactedSummaryOnly => None,
        };
        sink.on_error(ErrorDetail {
            line_number,
            reason: err.reason(),
            summary: err.to_string(),
            line,
        });
    }

    fn failed(
        &mut self,
        line_number: usize,
        err: LineError,
        line: Option<&[u8]>,
    ) -> LineRecord<Record> {
        self.report(line_number, &err, line);
        LineRecord {
            line_number,
            outcome: Err(err),
        }
    }
}

impl<R: Read> Iterator for StreamDecoder<R> {
    type Item = LineRecord<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.source.next()? {
                SourceLine::IoError { line_number, kind } => {
                    debug!(line_number, ?kind, "read error");
                    return Some(self.failed(line_number, LineError::Io, None));
                }
                SourceLine::LineTooLong {
                    line_number,
                    observed_bytes,
                    max_line_bytes,
                } => {
                    let err = LineError::LineTooLong {
                        observed_bytes,
                        max_line_bytes,
                    };
                    return Some(self.failed(line_number, err, None));
                }
                SourceLine::Line { line_number, bytes } => {
                    if bytes.is_empty() {
                        continue;
                    }
                    let line = match std::str::from_utf8(&bytes) {
                        Ok(line) => line,
                        Err(_) => {
                            return Some(self.failed(
                                line_number,
                                LineError::InvalidUtf8,
                                Some(&bytes),
                            ));
                        }
                    };
                    let outcome = Self::parse_line(line);
                    if let Err(err) = &outcome {
                        self.report(line_number, err, Some(&bytes));
                    }
                    return Some(LineRecord {
                        line_number,
                        outcome,
                    });
                }
            }
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Decodes `reader` to exhaustion with the default configuration.
pub fn decode<R: Read, P: Processor + ?Sized>(reader: R, processor: &mut P) -> DecodeSummary {
    StreamDecoder::new(reader, DecodeConfig::default()).decode_into(processor)
}

/// Decodes `reader` unless it is an interactive terminal, in which case
/// nothing is read and [`DecodeOutcome::NoInput`] is returned.
pub fn decode_piped<R, P>(reader: R, processor: &mut P, config: DecodeConfig) -> DecodeOutcome
where
    R: Read + IsTerminal,
    P: Processor + ?Sized,
{
    if reader.is_terminal() {
        info!("No input");
        return DecodeOutcome::NoInput;
    }
    DecodeOutcome::Completed(StreamDecoder::new(reader, config).decode_into(processor))
}

/// [`decode_piped`] over the process's standard input.
pub fn decode_stdin<P: Processor + ?Sized>(processor: &mut P, config: DecodeConfig) -> DecodeOutcome {
    decode_piped(io::stdin().lock(), processor, config)
}
