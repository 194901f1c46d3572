//! Indented line writer used to build generated source text.

const INDENT: &str = "    ";

#[derive(Debug, Default)]
pub struct SourceWriter {
    out: String,
    indent: usize,
}

impl SourceWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, s: &str) {
        if s.is_empty() {
            self.out.push('\n');
            return;
        }
        for _ in 0..self.indent {
            self.out.push_str(INDENT);
        }
        self.out.push_str(s);
        self.out.push('\n');
    }

    pub fn blank(&mut self) {
        self.out.push('\n');
    }

    /// Write `header` (ending in `{`) and indent the following lines.
    pub fn open(&mut self, header: &str) {
        self.line(header);
        self.indent += 1;
    }

    /// Dedent and write `footer` (usually `}` or `},`).
    pub fn close(&mut self, footer: &str) {
        self.indent = self.indent.saturating_sub(1);
        self.line(footer);
    }

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn dedent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    /// Write a line such as `} else {` one level out, then keep the
    /// current indentation.
    pub fn reopen(&mut self, line: &str) {
        self.close(line);
        self.indent += 1;
    }

    /// Write every line of `text` at the current indentation.
    pub fn block(&mut self, text: &str) {
        for line in text.lines() {
            self.line(line);
        }
    }

    /// The written text without its final newline.
    pub fn finish(mut self) -> String {
        while self.out.ends_with('\n') {
            self.out.pop();
        }
        self.out
    }
}
