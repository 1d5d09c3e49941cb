//! Tests for output transformers and sinks.

use crate::output::{
    FileOutputLog, Hidden, Identity, Ninja, NullOutputLog, OutputTransformer, RawOutputSink,
};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// A cloneable in-memory sink so tests can inspect what a transformer wrote.
#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn render<T: OutputTransformer>(mut transformer: T, chunks: &[&str]) -> String {
    let buffer = SharedBuffer::default();
    transformer.set_output(Box::new(buffer.clone()));
    for chunk in chunks {
        transformer.process(chunk.as_bytes()).unwrap();
    }
    transformer.flush().unwrap();
    buffer.contents()
}

#[test]
fn test_identity_passes_chunks_through() {
    let out = render(Identity::new(), &["hel", "lo\nwor", "ld"]);
    assert_eq!(out, "hello\nworld");
}

#[test]
fn test_identity_without_output_discards() {
    let mut identity = Identity::new();
    identity.process(b"nowhere").unwrap();
    identity.flush().unwrap();
}

#[test]
fn test_hidden_discards_everything() {
    let out = render(Hidden, &["secret\n", "more"]);
    assert_eq!(out, "");
}

#[test]
fn test_ninja_collapses_progress_lines() {
    let out = render(
        Ninja::new(),
        &["[1/3] CXX a.o\n[2/3] CX", "X b.o\n[3/3] LINK d8\n"],
    );
    assert_eq!(
        out,
        "\r\x1b[K[1/3] CXX a.o\r\x1b[K[2/3] CXX b.o\r\x1b[K[3/3] LINK d8\n"
    );
}

#[test]
fn test_ninja_keeps_regular_lines() {
    let out = render(
        Ninja::new(),
        &["ninja: Entering directory `out`\n[1/2] CC x.o\nerror: boom\n"],
    );
    assert_eq!(
        out,
        "ninja: Entering directory `out`\n\r\x1b[K[1/2] CC x.o\nerror: boom\n"
    );
}

#[test]
fn test_ninja_flushes_partial_line() {
    let out = render(Ninja::new(), &["no newline"]);
    assert_eq!(out, "no newline\n");
}

#[test]
fn test_ninja_strips_carriage_returns() {
    let out = render(Ninja::new(), &["line\r\n"]);
    assert_eq!(out, "line\n");
}

#[test]
fn test_null_output_log_accepts_anything() {
    NullOutputLog.send_output(b"ignored");
}

#[test]
fn test_file_output_log_appends_chunks() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("logs").join("output.log");

    let log = FileOutputLog::open(&path).unwrap();
    assert_eq!(log.path(), path.as_path());
    log.send_output(b"first ");
    log.send_output(b"second\n");
    drop(log);

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("===== "));
    assert!(content.ends_with("first second\n"));
}

#[test]
fn test_file_output_log_keeps_previous_sessions() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("output.log");

    FileOutputLog::open(&path).unwrap().send_output(b"one\n");
    FileOutputLog::open(&path).unwrap().send_output(b"two\n");

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("one\n"));
    assert!(content.contains("two\n"));
    assert_eq!(content.matches("===== ").count(), 2);
}
