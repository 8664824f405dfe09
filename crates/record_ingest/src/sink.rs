use std::io::{self, Stdout, Write};

use tracing::warn;

use crate::error::SinkError;
use crate::processor::{AggregatingProcessor, Processor};
use crate::record::Record;

/// Writes each record as one line of JSON.
pub struct JsonSink<W: Write> {
    writer: W,
    written: usize,
    failed: usize,
}

impl JsonSink<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            written: 0,
            failed: 0,
        }
    }

    /// Serializes `record` and writes it followed by `\n`.
    ///
    /// Nothing is written when serialization fails.
    pub fn write(&mut self, record: &Record) -> Result<(), SinkError> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');
        self.writer.write_all(&line)?;
        self.written += 1;
        Ok(())
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Processor for JsonSink<W> {
    fn process(&mut self, record: Record) {
        if let Err(err) = self.write(&record) {
            self.failed += 1;
            warn!(error = %err, "dropping record that could not be written");
        }
    }
}

impl<W: Write> AggregatingProcessor for JsonSink<W> {
    fn flush(&mut self) {
        if let Err(err) = self.writer.flush() {
            warn!(error = %err, "failed to flush record output");
        }
    }
}
