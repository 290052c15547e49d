//! Process-wide serialized output.
//!
//! Every line the games print goes through a [`SyncLog`]. A single lock guards the
//! underlying writer, so two calls never interleave, and [`SyncLog::begin_atomic_output`]
//! hands out a guard that keeps the lock across several writes (a move line followed by
//! the board it produced, for instance).

use std::fmt;
use std::io::{self, Write};

use once_cell::sync::Lazy;
use parking_lot::{Mutex, MutexGuard};
use tracing::warn;

static STDOUT: Lazy<SyncLog<io::Stdout>> = Lazy::new(|| SyncLog::new(io::stdout()));

/// The shared standard output sink.
pub fn stdout() -> &'static SyncLog<io::Stdout> {
    &STDOUT
}

/// Formats and writes one line through a [`SyncLog`].
#[macro_export]
macro_rules! log_line {
    ($log:expr, $($arg:tt)*) => {
        $log.log(format_args!("{}\n", format_args!($($arg)*)))
    };
}

pub struct SyncLog<W: Write> {
    out: Mutex<W>,
}

impl<W: Write> SyncLog<W> {
    pub fn new(out: W) -> Self {
        SyncLog { out: Mutex::new(out) }
    }

    /// Writes `args` as one indivisible unit and flushes.
    pub fn log(&self, args: fmt::Arguments) {
        let mut out = self.out.lock();
        if let Err(e) = out.write_fmt(args).and_then(|_| out.flush()) {
            warn!(error = %e, "dropped output");
        }
    }

    /// Holds the output lock until the returned guard is dropped.
    ///
    /// Nothing else can be written through this log in the meantime, including from the
    /// calling thread via [`SyncLog::log`], which would deadlock: write through the guard.
    pub fn begin_atomic_output(&self) -> AtomicOutput<'_, W> {
        AtomicOutput { out: self.out.lock() }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

/// An open atomic block. Dropping it flushes and ends the block.
pub struct AtomicOutput<'a, W: Write> {
    out: MutexGuard<'a, W>,
}

impl<'a, W: Write> AtomicOutput<'a, W> {
    pub fn line(&mut self, args: fmt::Arguments) {
        if let Err(e) = writeln!(self.out, "{}", args) {
            warn!(error = %e, "dropped output");
        }
    }

    /// Ends the block. Same as dropping it.
    pub fn end_atomic_output(self) {}
}

impl<'a, W: Write> Write for AtomicOutput<'a, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.out.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

impl<'a, W: Write> Drop for AtomicOutput<'a, W> {
    fn drop(&mut self) {
        let _ = self.out.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn log_line_appends_newline() {
        let log = SyncLog::new(Vec::new());
        log_line!(log, "Game {}: Player {}", 1, 0);
        log_line!(log, "done");
        assert_eq!(String::from_utf8(log.into_inner()).unwrap(), "Game 1: Player 0\ndone\n");
    }

    #[test]
    fn atomic_blocks_are_contiguous() {
        let log = SyncLog::new(Vec::new());
        thread::scope(|s| {
            for t in 0..8u8 {
                let log = &log;
                s.spawn(move || {
                    let mark = (b'a' + t) as char;
                    for _ in 0..50 {
                        let mut block = log.begin_atomic_output();
                        block.line(format_args!("begin {}", mark));
                        for _ in 0..3 {
                            for _ in 0..3 {
                                write!(block, "[{}]", mark).unwrap();
                                thread::yield_now();
                            }
                            writeln!(block).unwrap();
                        }
                        block.end_atomic_output();
                        log_line!(log, "after {}", mark);
                    }
                });
            }
        });

        let text = String::from_utf8(log.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 8 * 50 * 5);
        let mut i = 0;
        while i < lines.len() {
            if let Some(mark) = lines[i].strip_prefix("begin ") {
                let row = format!("[{0}][{0}][{0}]", mark);
                for j in 1..=3 {
                    assert_eq!(lines[i + j], row, "board for {} interrupted at line {}", mark, i + j);
                }
                i += 4;
            } else {
                assert!(lines[i].starts_with("after "), "stray line {:?}", lines[i]);
                i += 1;
            }
        }
    }
}
