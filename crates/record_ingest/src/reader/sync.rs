use std::io::{self, Read};

const CHUNK_SIZE_BYTES: usize = 8192;

/// One logical line, with the `\n` (and a preceding `\r`) removed.
#[derive(Debug)]
pub enum SourceLine {
    Line {
        line_number: usize,
        bytes: Vec<u8>,
    },
    LineTooLong {
        line_number: usize,
        observed_bytes: usize,
        max_line_bytes: usize,
    },
    IoError {
        line_number: usize,
        kind: io::ErrorKind,
    },
}

/// Splits a byte stream into logical lines.
///
/// A line that spans several reads is reassembled from its fragments before
/// it is yielded. With a byte limit, an oversized line is discarded as it
/// streams past and reported once as [`SourceLine::LineTooLong`]. The limit
/// applies to line content; the `\n` and a preceding `\r` are not counted.
pub struct LineSource<R: Read> {
    reader: R,
    max_line_bytes: Option<usize>,
    buffer: Box<[u8; CHUNK_SIZE_BYTES]>,
    buffer_pos: usize,
    buffer_len: usize,
    current_line: Vec<u8>,
    observed_bytes: usize,
    ends_with_cr: bool,
    discard_mode: bool,
    line_number: usize,
    done: bool,
}

impl<R: Read> LineSource<R> {
    pub fn new(reader: R, max_line_bytes: Option<usize>) -> Self {
        Self {
            reader,
            max_line_bytes,
            buffer: Box::new([0u8; CHUNK_SIZE_BYTES]),
            buffer_pos: 0,
            buffer_len: 0,
            current_line: Vec::new(),
            observed_bytes: 0,
            ends_with_cr: false,
            discard_mode: false,
            line_number: 0,
            done: false,
        }
    }

    /// Number of logical lines yielded so far.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    fn fill_buffer(&mut self) -> io::Result<usize> {
        self.buffer_pos = 0;
        loop {
            match self.reader.read(&mut self.buffer[..]) {
                Ok(n) => {
                    self.buffer_len = n;
                    return Ok(n);
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => {
                    self.buffer_len = 0;
                    return Err(err);
                }
            }
        }
    }

    fn finish_line(&mut self) -> SourceLine {
        let line_number = self.line_number + 1;
        self.line_number = line_number;

        let max_line_bytes = self.max_line_bytes.unwrap_or(usize::MAX);
        if self.discard_mode {
            let observed_bytes = self.observed_bytes - usize::from(self.ends_with_cr);
            self.reset_line_state();
            return SourceLine::LineTooLong {
                line_number,
                observed_bytes,
                max_line_bytes,
            };
        }

        let mut bytes = std::mem::take(&mut self.current_line);
        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }
        self.reset_line_state();
        if bytes.len() > max_line_bytes {
            return SourceLine::LineTooLong {
                line_number,
                observed_bytes: bytes.len(),
                max_line_bytes,
            };
        }
        SourceLine::Line { line_number, bytes }
    }

    fn reset_line_state(&mut self) {
        self.current_line.clear();
        self.observed_bytes = 0;
        self.ends_with_cr = false;
        self.discard_mode = false;
    }

    fn observe_bytes(&mut self, additional: usize) {
        self.observed_bytes = self.observed_bytes.saturating_add(additional);
        let Some(max_line_bytes) = self.max_line_bytes else {
            return;
        };
        // One byte of slack so a trailing `\r` does not count against the limit.
        if self.observed_bytes > max_line_bytes.saturating_add(1) && !self.discard_mode {
            self.discard_mode = true;
            self.current_line = Vec::new();
        }
    }

    fn append(&mut self, end: usize) {
        if end > self.buffer_pos {
            self.ends_with_cr = self.buffer[end - 1] == b'\r';
        }
        self.observe_bytes(end - self.buffer_pos);
        if !self.discard_mode {
            self.current_line
                .extend_from_slice(&self.buffer[self.buffer_pos..end]);
        }
    }
}

impl<R: Read> Iterator for LineSource<R> {
    type Item = SourceLine;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            if self.buffer_pos >= self.buffer_len {
                match self.fill_buffer() {
                    Ok(0) => {
                        self.done = true;
                        if self.discard_mode || !self.current_line.is_empty() {
                            return Some(self.finish_line());
                        }
                        return None;
                    }
                    Ok(_) => {}
                    Err(err) => {
                        let line_number = self.line_number + 1;
                        self.line_number = line_number;
                        self.done = true;
                        return Some(SourceLine::IoError {
                            line_number,
                            kind: err.kind(),
                        });
                    }
                }
            }

            let newline_idx = self.buffer[self.buffer_pos..self.buffer_len]
                .iter()
                .position(|b| *b == b'\n');

            let Some(newline_idx) = newline_idx else {
                // Continuation: the line carries on into the next read.
                self.append(self.buffer_len);
                self.buffer_pos = self.buffer_len;
                continue;
            };

            let end = self.buffer_pos + newline_idx;
            self.append(end);
            self.buffer_pos = end + 1;
            return Some(self.finish_line());
        }
    }
}
