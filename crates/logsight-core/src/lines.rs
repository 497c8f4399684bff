//! Streaming line tokenizer
//!
//! Pulls bytes from an [`AsyncBufRead`] only when the caller asks for the next
//! line, so a slow consumer never causes read-ahead beyond the reader's own
//! buffer. Accepts `\n`, `\r\n` and bare `\r` terminators (a `\r\n` pair split
//! across two buffer fills is still one terminator). Lines that are blank after
//! trimming are skipped but still advance the line counter.

use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// One non-blank input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    /// 1-based physical line number
    pub number: usize,
    /// Line text without its terminator (invalid UTF-8 replaced)
    pub text: String,
}

/// Lazy, non-restartable line sequence over a byte stream
pub struct LineReader<R> {
    reader: R,
    buf: Vec<u8>,
    line_number: usize,
    bytes_read: u64,
    /// Previous terminator was `\r`; swallow a directly following `\n`
    pending_cr: bool,
    done: bool,
}

impl<R: AsyncBufRead + Unpin> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            line_number: 0,
            bytes_read: 0,
            pending_cr: false,
            done: false,
        }
    }

    /// Physical lines seen so far, blank ones included
    pub fn lines_read(&self) -> usize {
        self.line_number
    }

    /// Bytes consumed from the underlying reader
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Next non-blank line, or `None` at end of input.
    ///
    /// After an error the sequence is over; bytes buffered for an unfinished
    /// line are discarded.
    pub async fn next_line(&mut self) -> io::Result<Option<LogLine>> {
        while let Some(raw) = self.next_raw().await? {
            if raw.trim().is_empty() {
                continue;
            }
            return Ok(Some(LogLine {
                number: self.line_number,
                text: raw,
            }));
        }
        Ok(None)
    }

    async fn next_raw(&mut self) -> io::Result<Option<String>> {
        if self.done {
            return Ok(None);
        }

        loop {
            let available = match self.reader.fill_buf().await {
                Ok(available) => available,
                Err(e) => {
                    self.done = true;
                    self.buf.clear();
                    return Err(e);
                }
            };

            if available.is_empty() {
                self.done = true;
                if self.buf.is_empty() {
                    return Ok(None);
                }
                return Ok(Some(self.take_line()));
            }

            if self.pending_cr {
                self.pending_cr = false;
                if available[0] == b'\n' {
                    self.consume(1);
                    continue;
                }
            }

            match available.iter().position(|&b| b == b'\n' || b == b'\r') {
                Some(pos) => {
                    self.pending_cr = available[pos] == b'\r';
                    self.buf.extend_from_slice(&available[..pos]);
                    self.consume(pos + 1);
                    return Ok(Some(self.take_line()));
                }
                None => {
                    let len = available.len();
                    self.buf.extend_from_slice(available);
                    self.consume(len);
                }
            }
        }
    }

    fn consume(&mut self, amount: usize) {
        self.reader.consume(amount);
        self.bytes_read += amount as u64;
    }

    fn take_line(&mut self) -> String {
        self.line_number += 1;
        let line = String::from_utf8_lossy(&self.buf).into_owned();
        self.buf.clear();
        line
    }
}
