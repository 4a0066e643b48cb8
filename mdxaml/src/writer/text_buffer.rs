//! Text accumulation between object boundaries.
//!
//! Adjacent text nodes (`"hello"`, `" "`, `"world"`) are buffered and written as one value when
//! the next object starts or the enclosing member ends. In collapse mode whitespace follows
//! XAML's normalization so the printed text reads the same after a round trip; in preserve
//! mode the buffer is verbatim.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WhitespaceMode {
    #[default]
    Collapse,
    Preserve,
}

/// A flushed piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextRun {
    /// Collapsed text, written as a plain value.
    Value(String),
    /// Verbatim text, written as a `Run` with its `Text` set.
    Literal(String),
}

#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    text: String,
    mode: WhitespaceMode,
    pending_space: bool,
    at_run_start: bool,
}

impl TextBuffer {
    pub fn new(mode: WhitespaceMode) -> Self {
        TextBuffer {
            text: String::new(),
            mode,
            pending_space: false,
            at_run_start: true,
        }
    }

    pub fn mode(&self) -> WhitespaceMode {
        self.mode
    }

    /// Start a fresh items collection.
    pub fn reset(&mut self, mode: WhitespaceMode) {
        self.text.clear();
        self.mode = mode;
        self.pending_space = false;
        self.at_run_start = true;
    }

    /// Switch back to an enclosing collection's mode after a nested one ended.
    pub(crate) fn restore(&mut self, mode: WhitespaceMode) {
        self.mode = mode;
        self.at_run_start = false;
    }

    pub fn push_char(&mut self, c: char) {
        match self.mode {
            WhitespaceMode::Preserve => self.text.push(c),
            WhitespaceMode::Collapse if c.is_whitespace() => {
                if !self.at_run_start {
                    self.pending_space = true;
                }
            }
            WhitespaceMode::Collapse => {
                if self.pending_space {
                    self.text.push(' ');
                    self.pending_space = false;
                }
                self.text.push(c);
                self.at_run_start = false;
            }
        }
    }

    pub fn push_str(&mut self, s: &str) {
        s.chars().for_each(|c| self.push_char(c));
    }

    /// Whether characters are waiting to be flushed.
    pub fn is_pending(&self) -> bool {
        !self.text.is_empty()
    }

    /// Drain the buffer. `before_sibling` is set when an object follows the text, in which case
    /// pending whitespace is kept as a single separating space.
    pub fn take(&mut self, before_sibling: bool) -> Option<TextRun> {
        match self.mode {
            WhitespaceMode::Collapse => {
                if before_sibling {
                    if self.pending_space {
                        self.text.push(' ');
                    }
                    self.at_run_start = false;
                }
                self.pending_space = false;
                if self.text.is_empty() {
                    None
                } else {
                    Some(TextRun::Value(std::mem::take(&mut self.text)))
                }
            }
            WhitespaceMode::Preserve => {
                if self.text.is_empty() {
                    None
                } else {
                    Some(TextRun::Literal(std::mem::take(&mut self.text)))
                }
            }
        }
    }
}

/// The collapsing policy as a pure function.
pub fn collapse_whitespace(s: &str) -> String {
    let mut buffer = TextBuffer::new(WhitespaceMode::Collapse);
    buffer.push_str(s);
    match buffer.take(false) {
        Some(TextRun::Value(text)) | Some(TextRun::Literal(text)) => text,
        None => String::new(),
    }
}
