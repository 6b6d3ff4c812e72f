//! Input and output handles bound to a command invocation

use crate::CliError;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::sync::{Arc, Mutex};

/// Destination for command output.
pub trait Output {
    /// Print a line of regular output.
    fn print(&mut self, text: &str);

    /// Print a warning line.
    fn warn(&mut self, warning: &str);

    /// Print an error line.
    fn error(&mut self, error: &str);

    /// Write raw bytes to the regular output.
    fn write(&mut self, data: &[u8]) -> io::Result<()>;

    /// Print an error together with its cause.
    fn report(&mut self, error: &CliError) {
        self.error(&error.to_string());
        if let Some(cause) = &error.cause {
            self.error(&format!("caused by: {}", cause));
        }
    }
}

/// Source of command input.
pub trait Input {
    /// Read one line without its terminator; `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>>;
}

/// Writes to the process stdout and stderr.
///
/// Warnings go to stdout with a `[WARN] ` prefix, errors to stderr with an
/// `[ERROR] ` prefix. Write failures (a closed pipe) are ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdOutput;

impl Output for StdOutput {
    fn print(&mut self, text: &str) {
        let _ = writeln!(io::stdout().lock(), "{}", text);
    }

    fn warn(&mut self, warning: &str) {
        let _ = writeln!(io::stdout().lock(), "[WARN] {}", warning);
    }

    fn error(&mut self, error: &str) {
        let _ = writeln!(io::stderr().lock(), "[ERROR] {}", error);
    }

    fn write(&mut self, data: &[u8]) -> io::Result<()> {
        let mut out = io::stdout().lock();
        out.write_all(data)?;
        out.flush()
    }
}

/// Reads lines from the process stdin.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdInput;

impl Input for StdInput {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(trim_newline(line)))
    }
}

/// Kind of a captured output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Print,
    Warn,
    Error,
}

#[derive(Debug, Default)]
struct Captured {
    lines: Vec<(LineKind, String)>,
    bytes: Vec<u8>,
}

/// In-memory output, cloneable so the caller keeps a handle after the
/// invocation consumed its copy.
#[derive(Debug, Default, Clone)]
pub struct MemoryOutput {
    inner: Arc<Mutex<Captured>>,
}

impl MemoryOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every captured line, in order.
    pub fn lines(&self) -> Vec<(LineKind, String)> {
        self.inner
            .lock()
            .map(|captured| captured.lines.clone())
            .unwrap_or_default()
    }

    /// Captured lines of one kind.
    pub fn lines_of(&self, kind: LineKind) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, text)| text)
            .collect()
    }

    pub fn printed(&self) -> Vec<String> {
        self.lines_of(LineKind::Print)
    }

    pub fn warnings(&self) -> Vec<String> {
        self.lines_of(LineKind::Warn)
    }

    pub fn errors(&self) -> Vec<String> {
        self.lines_of(LineKind::Error)
    }

    /// Raw bytes written with [`Output::write`].
    pub fn bytes(&self) -> Vec<u8> {
        self.inner
            .lock()
            .map(|captured| captured.bytes.clone())
            .unwrap_or_default()
    }

    fn push(&self, kind: LineKind, text: &str) {
        if let Ok(mut captured) = self.inner.lock() {
            captured.lines.push((kind, text.to_string()));
        }
    }
}

impl Output for MemoryOutput {
    fn print(&mut self, text: &str) {
        self.push(LineKind::Print, text);
    }

    fn warn(&mut self, warning: &str) {
        self.push(LineKind::Warn, warning);
    }

    fn error(&mut self, error: &str) {
        self.push(LineKind::Error, error);
    }

    fn write(&mut self, data: &[u8]) -> io::Result<()> {
        let mut captured = self
            .inner
            .lock()
            .map_err(|_| io::Error::other("output buffer poisoned"))?;
        captured.bytes.extend_from_slice(data);
        Ok(())
    }
}

/// In-memory input replaying a fixed set of lines.
#[derive(Debug, Default, Clone)]
pub struct MemoryInput {
    lines: VecDeque<String>,
}

impl MemoryInput {
    /// Split `text` into lines to replay.
    pub fn new(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
        }
    }
}

impl Input for MemoryInput {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.lines.pop_front())
    }
}

fn trim_newline(mut line: String) -> String {
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    line
}
