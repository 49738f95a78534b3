//! The single input source and output sink of an interactive session.
//!
//! The navigator owns one [`Console`] and lends it to each screen in turn,
//! so two pending reads are impossible by construction. Every read goes
//! through [`Console::read_raw`], which checks for a cancel token before
//! any caller gets to parse the line.

use std::cell::RefCell;
use std::io::{self, BufRead, Cursor, Write};
use std::rc::Rc;

use tracing::{debug, warn};

use super::signal::{CancelSignal, Prompted};
use super::theme;

/// Reserved inputs that abandon the current input sequence.
pub const CANCEL_TOKENS: [&str; 2] = ["/b", "/back"];

/// Whether `input` is a cancel token (trimmed, case-insensitive).
pub fn is_cancel_token(input: &str) -> bool {
    let trimmed = input.trim();
    CANCEL_TOKENS
        .iter()
        .any(|token| trimmed.eq_ignore_ascii_case(token))
}

pub struct Console {
    input: Box<dyn BufRead>,
    output: Box<dyn Write>,
    color: bool,
}

impl Console {
    /// Console over arbitrary streams, color off.
    pub fn new(input: impl BufRead + 'static, output: impl Write + 'static) -> Self {
        Console {
            input: Box::new(input),
            output: Box::new(output),
            color: false,
        }
    }

    /// Console over the process's stdin/stdout, color on.
    pub fn stdio() -> Self {
        Console::new(io::stdin().lock(), io::stdout()).with_color(true)
    }

    /// Console fed from a fixed script, with everything written captured.
    ///
    /// Each line of `script` answers one prompt. When the script runs out,
    /// reads behave like a closed stdin.
    pub fn scripted(script: &str) -> (Self, Transcript) {
        let transcript = Transcript::default();
        let console = Console::new(Cursor::new(script.to_string()), transcript.clone());
        (console, transcript)
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    // ------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------

    fn emit(&mut self, text: &str) {
        if let Err(e) = writeln!(self.output, "{}", text) {
            debug!(error = %e, "console write failed");
        }
    }

    /// Write a plain line.
    pub fn line(&mut self, text: impl AsRef<str>) {
        self.emit(text.as_ref());
    }

    pub fn blank(&mut self) {
        self.emit("");
    }

    pub fn heading(&mut self, text: impl AsRef<str>) {
        let painted = theme::paint(theme::title(), &format!("== {} ==", text.as_ref()), self.color);
        self.blank();
        self.emit(&painted);
    }

    pub fn success(&mut self, text: impl AsRef<str>) {
        let painted = theme::paint(theme::safe(), text.as_ref(), self.color);
        self.emit(&painted);
    }

    /// Retry prompts and boundary notices.
    pub fn warn(&mut self, text: impl AsRef<str>) {
        let painted = theme::paint(theme::warning(), text.as_ref(), self.color);
        self.emit(&painted);
    }

    /// One-line collaborator failure notice.
    pub fn failure(&mut self, text: impl AsRef<str>) {
        let painted = theme::paint(theme::danger(), text.as_ref(), self.color);
        self.emit(&painted);
    }

    pub fn hint(&mut self, text: impl AsRef<str>) {
        let painted = theme::paint(theme::dim(), text.as_ref(), self.color);
        self.emit(&painted);
    }

    /// A numbered entry (`  [3] label`).
    pub fn item(&mut self, key: impl std::fmt::Display, label: impl AsRef<str>) {
        let key = theme::paint(theme::interactive(), &format!("[{}]", key), self.color);
        self.emit(&format!("  {} {}", key, label.as_ref()));
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    /// Show `prompt` and block for one line.
    ///
    /// A cancel token yields `CancelSignal::back()`; end of input or a read
    /// error yields `CancelSignal::exit()`. The returned line has its line
    /// terminator removed but is otherwise untouched.
    pub fn read_raw(&mut self, prompt: &str) -> Prompted<String> {
        if let Err(e) = write!(self.output, "{}", prompt).and_then(|()| self.output.flush()) {
            debug!(error = %e, "console write failed");
        }

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => {
                debug!("input closed");
                self.blank();
                return Err(CancelSignal::exit());
            }
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "input read failed");
                return Err(CancelSignal::exit());
            }
        }

        let line = line.trim_end_matches(['\n', '\r']).to_string();
        if is_cancel_token(&line) {
            debug!("cancel token read");
            return Err(CancelSignal::back());
        }
        Ok(line)
    }
}

// ============================================================================
// TRANSCRIPT
// ============================================================================

/// Shared in-memory sink capturing console output.
#[derive(Debug, Clone, Default)]
pub struct Transcript(Rc<RefCell<Vec<u8>>>);

impl Transcript {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }

    /// Number of times `needle` occurs in the output so far.
    pub fn count(&self, needle: &str) -> usize {
        self.text().matches(needle).count()
    }
}

impl Write for Transcript {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
