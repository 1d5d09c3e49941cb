//! The transformer contract and its two basic implementations.

use std::io::{self, Write};

/// Destination a transformer writes its rendered output to.
pub type OutputSink = Box<dyn Write + Send>;

/// A stream consumer that filters or renders output chunks to a sink.
///
/// Chunks arrive in read order and may split lines or UTF-8 sequences
/// arbitrarily; implementations that care about lines must buffer.
pub trait OutputTransformer: Send {
    /// Replace the destination for rendered output.
    fn set_output(&mut self, sink: OutputSink);

    /// Consume one chunk of raw output.
    fn process(&mut self, chunk: &[u8]) -> io::Result<()>;

    /// Emit anything still buffered and flush the sink.
    fn flush(&mut self) -> io::Result<()>;
}

/// Passes every chunk through unchanged.
pub struct Identity {
    output: OutputSink,
}

impl Identity {
    pub fn new() -> Self {
        Self {
            output: Box::new(io::sink()),
        }
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputTransformer for Identity {
    fn set_output(&mut self, sink: OutputSink) {
        self.output = sink;
    }

    fn process(&mut self, chunk: &[u8]) -> io::Result<()> {
        self.output.write_all(chunk)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.output.flush()
    }
}

/// Discards everything.
#[derive(Debug, Default)]
pub struct Hidden;

impl OutputTransformer for Hidden {
    fn set_output(&mut self, _sink: OutputSink) {}

    fn process(&mut self, _chunk: &[u8]) -> io::Result<()> {
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
