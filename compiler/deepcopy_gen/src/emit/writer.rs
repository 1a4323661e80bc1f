//! Indented Go source writer.

/// Accumulates gofmt-shaped source: one tab per indentation level.
pub(crate) struct GoWriter {
    indent: usize,
    output: String,
}

impl GoWriter {
    pub(crate) fn new() -> Self {
        Self {
            indent: 0,
            output: String::with_capacity(4096),
        }
    }

    /// Write a line at the current indentation.
    pub(crate) fn line(&mut self, s: &str) {
        for _ in 0..self.indent {
            self.output.push('\t');
        }
        self.output.push_str(s);
        self.output.push('\n');
    }

    /// Write a line ending in `{` and indent.
    pub(crate) fn open(&mut self, s: &str) {
        self.line(s);
        self.indent += 1;
    }

    /// Dedent and close the block with `}`.
    pub(crate) fn close(&mut self) {
        self.close_with("}");
    }

    /// Dedent and write a closing line other than `}`.
    pub(crate) fn close_with(&mut self, s: &str) {
        debug_assert!(self.indent > 0, "close called with zero indent");
        self.indent = self.indent.saturating_sub(1);
        self.line(s);
    }

    pub(crate) fn blank(&mut self) {
        self.output.push('\n');
    }

    pub(crate) fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }
}
