//! Line-at-a-time output sink

use std::io::{self, Write};

/// Writes newline-terminated lines, flushing after each one so a
/// reader tailing the stream sees every line as soon as it is produced.
pub struct LineSink<W: Write> {
    writer: W,
    lines_written: u64,
}

impl<W: Write> LineSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            lines_written: 0,
        }
    }

    pub fn emit(&mut self, line: &str) -> io::Result<()> {
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        self.lines_written += 1;
        Ok(())
    }

    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records how many flushes happened and what was buffered at each
    #[derive(Default)]
    struct FlushRecorder {
        buffer: Vec<u8>,
        flushed: Vec<String>,
    }

    impl Write for FlushRecorder {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.buffer.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            self.flushed.push(String::from_utf8_lossy(&self.buffer).to_string());
            Ok(())
        }
    }

    #[test]
    fn test_emit_appends_newline() {
        let mut sink = LineSink::new(Vec::new());
        sink.emit("[INFO] hello").unwrap();
        assert_eq!(sink.into_inner(), b"[INFO] hello\n");
    }

    #[test]
    fn test_emit_flushes_every_line() {
        let mut sink = LineSink::new(FlushRecorder::default());
        sink.emit("one").unwrap();
        sink.emit("two").unwrap();
        assert_eq!(sink.lines_written(), 2);
        assert_eq!(sink.into_inner().flushed, vec!["one\n", "one\ntwo\n"]);
    }

    #[test]
    fn test_emit_propagates_write_error() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut sink = LineSink::new(Broken);
        let err = sink.emit("x").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(sink.lines_written(), 0);
    }
}
