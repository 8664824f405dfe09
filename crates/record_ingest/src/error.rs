use thiserror::Error;

/// Why a logical line did not become a record.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SkipReason {
    InvalidJson,
    NotAnObject,
    InvalidUtf8,
    LineTooLong,
    Io,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            SkipReason::InvalidJson => "invalid_json",
            SkipReason::NotAnObject => "not_an_object",
            SkipReason::InvalidUtf8 => "invalid_utf8",
            SkipReason::LineTooLong => "line_too_long",
            SkipReason::Io => "io",
        }
    }
}

#[derive(Debug, Error, Clone)]
pub enum LineError {
    #[error("I/O error while reading input")]
    Io,
    #[error("invalid UTF-8 in input line")]
    InvalidUtf8,
    #[error("line too long (observed_bytes={observed_bytes}, max_line_bytes={max_line_bytes})")]
    LineTooLong {
        observed_bytes: usize,
        max_line_bytes: usize,
    },
    #[error("error parsing json: {summary}")]
    InvalidJson { summary: String },
    #[error("unexpected JSON: top-level value is {found}, expected object")]
    NotAnObject { found: &'static str },
}

impl LineError {
    pub fn reason(&self) -> SkipReason {
        match self {
            LineError::Io => SkipReason::Io,
            LineError::InvalidUtf8 => SkipReason::InvalidUtf8,
            LineError::LineTooLong { .. } => SkipReason::LineTooLong,
            LineError::InvalidJson { .. } => SkipReason::InvalidJson,
            LineError::NotAnObject { .. } => SkipReason::NotAnObject,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LineRecord<T> {
    pub line_number: usize,
    pub outcome: Result<T, LineError>,
}

/// A skipped line, reported to an [`ErrorDetailSink`].
#[derive(Debug, Clone)]
pub struct ErrorDetail {
    pub line_number: usize,
    pub reason: SkipReason,
    pub summary: String,
    /// The offending line; only populated under `ErrorDetailCapture::FullDetails`.
    pub line: Option<String>,
}

pub trait ErrorDetailSink: Send + 'static {
    fn on_error(&mut self, detail: ErrorDetail);
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write record: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("cannot coerce {text:?} to a number: {source}")]
pub struct CoerceError {
    pub text: String,
    #[source]
    pub source: std::num::ParseFloatError,
}
