//! Shared output sink.
//!
//! Every rendered line, whether produced by the sequencer or the
//! heartbeat thread, goes through one mutex-guarded writer, so
//! interleaving happens at whole-line granularity and never
//! mid-character. The renderer holds the lock for the duration of a
//! typed line or animation.
//!
//! The sink also owns the optional plain-text log mirror. A write
//! failure there disables file logging for the rest of the run
//! instead of aborting the show.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use crossterm::tty::IsTty;
use parking_lot::{Mutex, MutexGuard};

/// Plain-text lines captured by a test sink, in render order.
pub type CapturedLines = Arc<Mutex<Vec<String>>>;

struct SinkInner {
    out: Box<dyn Write + Send>,
    log: Option<File>,
    captured: Option<CapturedLines>,
}

/// Clonable handle to the shared sink.
#[derive(Clone)]
pub struct OutputSink {
    inner: Arc<Mutex<SinkInner>>,
    animated: bool,
}

impl OutputSink {
    /// Sink over real stdout. Animations are enabled only when stdout
    /// is a live terminal; otherwise frames degrade to plain prints.
    pub fn stdout(log_file: Option<&Path>) -> Self {
        let animated = io::stdout().is_tty();
        Self::build(Box::new(io::stdout()), animated, log_file, None)
    }

    /// In-memory sink for tests. Styled output is discarded; the plain
    /// text of each line is captured in render order.
    pub fn capture() -> (Self, CapturedLines) {
        Self::capture_with_log(None)
    }

    /// Capture sink that still mirrors to a log file.
    pub fn capture_with_log(log_file: Option<&Path>) -> (Self, CapturedLines) {
        let lines: CapturedLines = Arc::new(Mutex::new(Vec::new()));
        let sink = Self::build(
            Box::new(io::sink()),
            false,
            log_file,
            Some(Arc::clone(&lines)),
        );
        (sink, lines)
    }

    fn build(
        out: Box<dyn Write + Send>,
        animated: bool,
        log_file: Option<&Path>,
        captured: Option<CapturedLines>,
    ) -> Self {
        let log = log_file.and_then(|path| {
            match OpenOptions::new().create(true).append(true).open(path) {
                Ok(file) => Some(file),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "log file unavailable, file logging disabled");
                    None
                }
            }
        });

        Self {
            inner: Arc::new(Mutex::new(SinkInner {
                out,
                log,
                captured,
            })),
            animated,
        }
    }

    /// Whether cursor-control animations can be rendered.
    pub fn is_animated(&self) -> bool {
        self.animated
    }

    /// Acquire the sink for one rendered line (or one animation).
    /// Holding the guard keeps other threads out until the line ends.
    pub fn lock(&self) -> LineWriter<'_> {
        LineWriter {
            guard: self.inner.lock(),
        }
    }

    /// Convenience for a single-shot line.
    pub fn line(&self, styled: &str, plain: &str) {
        let mut w = self.lock();
        w.chunk(styled);
        w.end_line(plain);
    }
}

/// Exclusive access to the sink for the duration of one line.
pub struct LineWriter<'a> {
    guard: MutexGuard<'a, SinkInner>,
}

impl LineWriter<'_> {
    /// Emit a styled fragment without a newline. Terminal write errors
    /// are ignored; there is nowhere useful to report them.
    pub fn chunk(&mut self, styled: &str) {
        let _ = self.guard.out.write_all(styled.as_bytes());
        let _ = self.guard.out.flush();
    }

    /// Return the cursor to the start of the line (animation frames).
    pub fn carriage_return(&mut self) {
        self.chunk("\r");
    }

    /// Finish the line: newline on the terminal, plain text to the log
    /// mirror and any capture buffer.
    pub fn end_line(&mut self, plain: &str) {
        let _ = self.guard.out.write_all(b"\n");
        let _ = self.guard.out.flush();

        if let Some(captured) = &self.guard.captured {
            captured.lock().push(plain.to_string());
        }

        if let Some(log) = self.guard.log.as_mut() {
            let stamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
            // Multi-line banners get one stamped log line each
            let failed = plain
                .lines()
                .any(|part| writeln!(log, "[{stamp}] {part}").is_err());
            if failed {
                tracing::warn!("log write failed, file logging disabled for this run");
                self.guard.log = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn capture_records_plain_lines_in_order() {
        let (sink, lines) = OutputSink::capture();
        sink.line("\x1b[32mstyled one\x1b[0m", "one");
        sink.line("two", "two");

        let lines = lines.lock();
        assert_eq!(*lines, vec!["one".to_string(), "two".to_string()]);
    }

    #[test]
    fn capture_sink_is_not_animated() {
        let (sink, _) = OutputSink::capture();
        assert!(!sink.is_animated());
    }

    #[test]
    fn log_mirror_is_plain_text_one_line_per_beat() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");
        let (sink, _) = OutputSink::capture_with_log(Some(&path));

        sink.line("\x1b[31mred alert\x1b[0m", "red alert");
        sink.line("second", "second");

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(!contents.contains('\x1b'), "log must be ANSI-free");
        assert!(lines[0].ends_with("red alert"));
        assert!(lines[1].ends_with("second"));
        // Timestamp prefix present
        assert!(lines[0].starts_with('['));
    }

    #[test]
    fn unopenable_log_path_disables_mirror_without_failing() {
        let dir = TempDir::new().unwrap();
        // A directory cannot be opened for append
        let (sink, lines) = OutputSink::capture_with_log(Some(dir.path()));
        sink.line("still works", "still works");
        assert_eq!(lines.lock().len(), 1);
    }

    #[test]
    fn clones_share_the_same_stream() {
        let (sink, lines) = OutputSink::capture();
        let clone = sink.clone();
        sink.line("a", "a");
        clone.line("b", "b");
        assert_eq!(lines.lock().len(), 2);
    }

    #[test]
    fn concurrent_writers_never_interleave_mid_line() {
        use std::thread;

        let (sink, lines) = OutputSink::capture();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let sink = sink.clone();
                thread::spawn(move || {
                    for j in 0..50 {
                        let msg = format!("writer-{i}-line-{j}");
                        sink.line(&msg, &msg);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let lines = lines.lock();
        assert_eq!(lines.len(), 8 * 50);
        for line in lines.iter() {
            assert!(line.starts_with("writer-"), "corrupted line: {line}");
        }
    }
}
