//! Progress-line renderer for ninja-style build output.

use super::transformer::{OutputSink, OutputTransformer};
use regex::bytes::Regex;
use std::io::{self, Write};
use std::sync::LazyLock;

static PROGRESS_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[\d+/\d+\]").expect("Invalid progress line regex"));

const CARRIAGE_RETURN_CLEAR: &[u8] = b"\r\x1b[K";

/// Collapses `[n/m] ...` progress lines onto a single terminal line.
///
/// Every other line is printed normally. When a regular line follows a
/// progress line, the progress line is terminated first so it stays visible.
pub struct Ninja {
    output: OutputSink,
    pending: Vec<u8>,
    progress_open: bool,
}

impl Ninja {
    pub fn new() -> Self {
        Self {
            output: Box::new(io::sink()),
            pending: Vec::new(),
            progress_open: false,
        }
    }

    fn emit_line(&mut self, line: &[u8]) -> io::Result<()> {
        if PROGRESS_LINE.is_match(line) {
            self.output.write_all(CARRIAGE_RETURN_CLEAR)?;
            self.output.write_all(line)?;
            self.progress_open = true;
        } else {
            if self.progress_open {
                self.output.write_all(b"\n")?;
                self.progress_open = false;
            }
            self.output.write_all(line)?;
            self.output.write_all(b"\n")?;
        }
        Ok(())
    }
}

impl Default for Ninja {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputTransformer for Ninja {
    fn set_output(&mut self, sink: OutputSink) {
        self.output = sink;
    }

    fn process(&mut self, chunk: &[u8]) -> io::Result<()> {
        self.pending.extend_from_slice(chunk);

        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.pending.drain(..=pos).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            self.emit_line(&line)?;
        }

        self.output.flush()
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.pending.is_empty() {
            let line = std::mem::take(&mut self.pending);
            self.emit_line(&line)?;
        }
        if self.progress_open {
            self.output.write_all(b"\n")?;
            self.progress_open = false;
        }
        self.output.flush()
    }
}
