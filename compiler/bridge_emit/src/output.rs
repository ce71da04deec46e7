//! Output sink for generated text.
//!
//! Bridge code is assembled line by line into an [`Emitter`]. The only
//! implementation is [`StringEmitter`]; file output goes through
//! [`crate::template`] once the whole block is built.

/// Indentation unit of generated code.
pub const INDENT: &str = "    ";

/// Destination for generated source text.
pub trait Emitter {
    /// Emit a text fragment.
    fn emit(&mut self, text: &str);

    /// Emit a newline (Unix-style `\n`).
    fn emit_newline(&mut self);

    /// Emit `level` indentation units.
    fn emit_indent(&mut self, level: usize);

    /// Emit one indented line followed by a newline.
    fn emit_line(&mut self, level: usize, text: &str) {
        self.emit_indent(level);
        self.emit(text);
        self.emit_newline();
    }
}

/// In-memory emitter.
#[derive(Default)]
pub struct StringEmitter {
    buffer: String,
}

impl StringEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: String::with_capacity(capacity),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Ensure the output ends with exactly one newline.
    pub fn ensure_trailing_newline(&mut self) {
        while self.buffer.ends_with("\n\n") {
            self.buffer.pop();
        }
        if !self.buffer.is_empty() && !self.buffer.ends_with('\n') {
            self.buffer.push('\n');
        }
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
        for _ in 0..level {
            self.buffer.push_str(INDENT);
        }
    }
}
