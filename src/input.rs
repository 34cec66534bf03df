//! Where command lines come from.
//!
//! A terminal gets a line editor with a prompt; anything else (a pipe, a file) is
//! read line by line without one.

use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::BufRead;

/// Prompt shown before each line when reading from a terminal.
pub const DEFAULT_PROMPT: &str = "$ ";

/// Result of one attempt to read a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// A line of input. It may or may not still carry its newline.
    Text(String),
    /// The read was cancelled by Ctrl-C; nothing was entered.
    Interrupted,
    /// No more input.
    Eof,
}

/// A source of command lines for [`Interpreter::repl`](crate::Interpreter::repl).
pub trait LineReader {
    fn read_line(&mut self) -> Result<Line>;

    /// Whether a person is typing at the other end.
    fn is_interactive(&self) -> bool {
        false
    }
}

/// Interactive input from a terminal, with line editing.
///
/// Lines are never added to the editor history.
pub struct Terminal {
    editor: DefaultEditor,
    prompt: String,
}

impl Terminal {
    pub fn new(prompt: impl Into<String>) -> Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
            prompt: prompt.into(),
        })
    }
}

impl LineReader for Terminal {
    fn read_line(&mut self) -> Result<Line> {
        match self.editor.readline(&self.prompt) {
            Ok(line) => Ok(Line::Text(line)),
            Err(ReadlineError::Interrupted) => Ok(Line::Interrupted),
            Err(ReadlineError::Eof) => Ok(Line::Eof),
            Err(err) => Err(err.into()),
        }
    }

    fn is_interactive(&self) -> bool {
        true
    }
}

/// Non-interactive input: a pipe, a file or anything else that is not a terminal.
///
/// Lines are split on `\n`; bytes that are not valid UTF-8 are replaced.
pub struct Piped<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> Piped<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
        }
    }
}

impl<R: BufRead> LineReader for Piped<R> {
    fn read_line(&mut self) -> Result<Line> {
        self.buf.clear();
        // read_until retries reads interrupted by a signal
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(Line::Eof);
        }
        Ok(Line::Text(String::from_utf8_lossy(&self.buf).into_owned()))
    }
}
