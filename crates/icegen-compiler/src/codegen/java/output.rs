//! Line-oriented text sink with brace-driven indentation.

const INDENT: &str = "    ";

#[derive(Debug, Default)]
pub struct Output {
    buf: String,
    depth: usize,
}

impl Output {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, text: impl AsRef<str>) {
        for _ in 0..self.depth {
            self.buf.push_str(INDENT);
        }
        self.buf.push_str(text.as_ref());
        self.buf.push('\n');
    }

    /// Header line followed by an opening brace on its own line.
    pub fn open(&mut self, header: impl AsRef<str>) {
        self.line(header);
        self.block();
    }

    pub fn block(&mut self) {
        self.line("{");
        self.depth += 1;
    }

    pub fn close(&mut self) {
        self.close_with("");
    }

    /// Closing brace followed by `suffix`, e.g. `;` after an array initializer.
    pub fn close_with(&mut self, suffix: &str) {
        if self.buf.ends_with("\n\n") {
            self.buf.pop();
        }
        self.depth = self.depth.saturating_sub(1);
        self.line(format!("}}{suffix}"));
    }

    /// A separating empty line; collapses with other blanks and is skipped
    /// right after an opening brace.
    pub fn blank(&mut self) {
        if self.buf.is_empty() || self.buf.ends_with("\n\n") || self.buf.ends_with("{\n") {
            return;
        }
        self.buf.push('\n');
    }

    pub fn indent(&mut self) {
        self.depth += 1;
    }

    pub fn dedent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// The text with exactly one trailing newline.
    pub fn finish(self) -> String {
        let mut text = self.buf;
        text.truncate(text.trim_end().len());
        text.push('\n');
        text
    }
}
