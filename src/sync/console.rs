//! Serialized console output
//!
//! Every line is written while holding one lock, so output from concurrent
//! workers never interleaves mid-line.

use std::io::{self, Write};
use std::sync::Arc;

use parking_lot::Mutex;

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const RED: &str = "\x1b[91m";
pub const GREEN: &str = "\x1b[92m";
pub const YELLOW: &str = "\x1b[93m";
pub const BLUE: &str = "\x1b[94m";
pub const MAGENTA: &str = "\x1b[95m";
pub const CYAN: &str = "\x1b[96m";
pub const WHITE: &str = "\x1b[97m";

/// Colour cycle for distinguishing workers
const WORKER_COLORS: [&str; 6] = [BLUE, GREEN, YELLOW, MAGENTA, CYAN, RED];

/// Colour assigned to a worker slot
pub fn worker_color(slot: usize) -> &'static str {
    WORKER_COLORS[slot % WORKER_COLORS.len()]
}

/// Line-serialized console
pub struct Console {
    out: Mutex<Box<dyn Write + Send>>,
    color: bool,
    quiet: bool,
}

impl Console {
    /// Console writing to stdout
    pub fn stdout(color: bool, quiet: bool) -> Self {
        Self {
            out: Mutex::new(Box::new(io::stdout())),
            color,
            quiet,
        }
    }

    /// Console writing to an arbitrary sink
    pub fn with_writer(writer: impl Write + Send + 'static, color: bool) -> Self {
        Self {
            out: Mutex::new(Box::new(writer)),
            color,
            quiet: false,
        }
    }

    /// Console that discards everything
    pub fn silent() -> Self {
        Self {
            out: Mutex::new(Box::new(io::sink())),
            color: false,
            quiet: true,
        }
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Write one line atomically
    pub fn line(&self, text: impl AsRef<str>) {
        if self.quiet {
            return;
        }
        let mut out = self.out.lock();
        let _ = writeln!(out, "{}", text.as_ref());
        let _ = out.flush();
    }

    /// Write several lines without letting another writer in between
    pub fn block<I, S>(&self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if self.quiet {
            return;
        }
        let mut out = self.out.lock();
        for line in lines {
            let _ = writeln!(out, "{}", line.as_ref());
        }
        let _ = out.flush();
    }

    /// Write one line in the colour of a worker slot
    pub fn worker_line(&self, slot: usize, text: impl AsRef<str>) {
        self.line(self.paint(worker_color(slot), text.as_ref()));
    }

    /// Wrap `text` in an ANSI code when colour is enabled
    pub fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("{}{}{}", code, text, RESET)
        } else {
            text.to_string()
        }
    }

    /// Section header framed by a rule of `width` copies of `rule`
    pub fn header(&self, rule: char, width: usize, title_lines: &[&str]) {
        let bar: String = std::iter::repeat(rule).take(width).collect();
        let mut lines = Vec::with_capacity(title_lines.len() + 2);
        lines.push(self.paint(&format!("{}{}", BOLD, WHITE), &bar));
        for title in title_lines {
            lines.push(format!("  {}", title));
        }
        lines.push(self.paint(&format!("{}{}", BOLD, WHITE), &bar));
        self.block(lines);
    }
}

/// In-memory sink whose contents can be read back after a run
#[derive(Clone, Default)]
pub struct MemoryWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock()).into_owned()
    }
}

impl Write for MemoryWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.lock().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
