//! Line printer shared by every emitter.
//!
//! All generated text flows through [`CodeWriter::p`]. Indentation is tracked
//! in an `Rc<Cell<usize>>` so an [`IndentGuard`] can live across further
//! writes without holding a borrow of the writer.

use std::cell::Cell;
use std::rc::Rc;

pub struct CodeWriter {
    buf: String,
    indent_level: Rc<Cell<usize>>,
    indent_string: String,
}

impl CodeWriter {
    pub fn new(indent_string: impl Into<String>) -> Self {
        Self {
            buf: String::new(),
            indent_level: Rc::new(Cell::new(0)),
            indent_string: indent_string.into(),
        }
    }

    /// Tab-indented writer, the gofmt convention.
    pub fn with_tabs() -> Self {
        Self::new("\t")
    }

    /// Print one line at the current indentation. Blank lines carry no indentation.
    pub fn p(&mut self, line: &str) {
        if !line.trim().is_empty() {
            for _ in 0..self.indent_level.get() {
                self.buf.push_str(&self.indent_string);
            }
            self.buf.push_str(line);
        }
        self.buf.push('\n');
    }

    pub fn blank(&mut self) {
        self.buf.push('\n');
    }

    /// Print already formatted text, line by line, at the current indentation.
    pub fn p_text(&mut self, text: &str) {
        for line in text.lines() {
            self.p(line);
        }
    }

    /// Print `text` as `//` line comments, one per line.
    pub fn comment(&mut self, text: &str) {
        for line in text.lines() {
            let line = line.strip_prefix(' ').unwrap_or(line);
            self.p(format!("// {}", line).trim_end());
        }
    }

    /// Indentation increases while the guard is alive.
    pub fn indent(&mut self) -> IndentGuard {
        self.indent_level.set(self.indent_level.get() + 1);
        IndentGuard {
            indent_level: Rc::clone(&self.indent_level),
        }
    }

    /// `header {`, the indented body, `}`.
    pub fn block<F>(&mut self, header: &str, body: F)
    where
        F: FnOnce(&mut Self),
    {
        self.p(&format!("{} {{", header));
        {
            let _indent = self.indent();
            body(self);
        }
        self.p("}");
    }

    pub fn indent_level(&self) -> usize {
        self.indent_level.get()
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}

/// Decrements the indentation level when dropped.
pub struct IndentGuard {
    indent_level: Rc<Cell<usize>>,
}

impl Drop for IndentGuard {
    fn drop(&mut self) {
        self.indent_level
            .set(self.indent_level.get().saturating_sub(1));
    }
}
