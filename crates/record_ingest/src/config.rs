use crate::error::ErrorDetailSink;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum ErrorDetailCapture {
    #[default]
    RedactedSummaryOnly,
    FullDetails,
}

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct DecodeLimits {
    /// `None` buffers logical lines of any length.
    pub max_line_bytes: Option<usize>,
}

#[derive(Default)]
pub struct DecodeConfig {
    pub limits: DecodeLimits,
    pub error_detail_capture: ErrorDetailCapture,
    pub error_sink: Option<Box<dyn ErrorDetailSink>>,
}

impl DecodeConfig {
    pub fn with_max_line_bytes(mut self, max_line_bytes: usize) -> Self {
        self.limits.max_line_bytes = Some(max_line_bytes);
        self
    }

    pub fn with_error_sink(
        mut self,
        capture: ErrorDetailCapture,
        sink: impl ErrorDetailSink,
    ) -> Self {
        self.error_detail_capture = capture;
        self.error_sink = Some(Box::new(sink));
        self
    }
}
