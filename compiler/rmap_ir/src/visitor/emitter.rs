//! Output Emitter
//!
//! Sink for streaming traversals. Supports string building for in-memory
//! output and any `io::Write` for files and stdout.

use std::io::{self, Write};

/// Trait for emitting traversal output.
pub trait Emitter {
    /// Emit a text fragment.
    fn emit(&mut self, text: &str);

    /// Emit a newline (Unix-style `\n`).
    fn emit_newline(&mut self);

    /// Emit indentation (4 spaces per level).
    fn emit_indent(&mut self, level: usize);

    /// Emit `text` on its own line at `level`.
    fn emit_line(&mut self, level: usize, text: &str) {
        self.emit_indent(level);
        self.emit(text);
        self.emit_newline();
    }
}

/// String-based emitter for in-memory output.
#[derive(Default)]
pub struct StringEmitter {
    buffer: String,
}

impl StringEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output(self) -> String {
        self.buffer
    }
}

impl Emitter for StringEmitter {
    fn emit(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn emit_newline(&mut self) {
        self.buffer.push('\n');
    }

    fn emit_indent(&mut self, level: usize) {
        for _ in 0..level * 4 {
            self.buffer.push(' ');
        }
    }
}

/// Emitter over any writer.
///
/// The first write error is kept and every later write is skipped; the
/// caller collects it from [`WriteEmitter::finish`].
pub struct WriteEmitter<W: Write> {
    writer: W,
    error: Option<io::Error>,
}

impl<W: Write> WriteEmitter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            error: None,
        }
    }

    fn write(&mut self, bytes: &[u8]) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.writer.write_all(bytes) {
            self.error = Some(err);
        }
    }

    /// Flush and hand back the writer.
    ///
    /// # Errors
    ///
    /// Returns the first error seen by any emit, or the flush error.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> Emitter for WriteEmitter<W> {
    fn emit(&mut self, text: &str) {
        self.write(text.as_bytes());
    }

    fn emit_newline(&mut self) {
        self.write(b"\n");
    }

    fn emit_indent(&mut self, level: usize) {
        for _ in 0..level {
            self.write(b"    ");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn string_emitter_lines() {
        let mut emitter = StringEmitter::new();
        emitter.emit_line(0, "DIO");
        emitter.emit_line(1, "CTRL");
        emitter.emit("x");
        emitter.emit_newline();
        assert_eq!(emitter.output(), "DIO\n    CTRL\nx\n");
    }

    #[test]
    fn write_emitter_into_vec() {
        let mut emitter = WriteEmitter::new(Vec::new());
        emitter.emit_line(2, "FIELD");
        let bytes = emitter.finish().ok();
        assert_eq!(bytes.as_deref(), Some(&b"        FIELD\n"[..]));
    }

    #[test]
    fn write_emitter_keeps_first_error() {
        let mut emitter = WriteEmitter::new(Broken);
        emitter.emit("a");
        emitter.emit_newline();
        let err = emitter.finish().err().map(|e| e.to_string());
        assert_eq!(err.as_deref(), Some("disk full"));
    }
}
