//! Single-line console progress.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use qy_search::ProgressSink;

/// Format a duration as `HH:MM:SS` (hours grow past two digits as needed).
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Redraws one `\r`-terminated line with percentage, elapsed time and an
/// estimate of the total run time.
///
/// The line is only redrawn when the percentage, truncated to one decimal,
/// changes. The final `100%` line is printed once and ends with a newline;
/// updates after it are ignored.
#[derive(Debug)]
pub struct ConsoleProgress<W: Write = io::Stdout> {
    out: W,
    started: Instant,
    last_permille: Option<u64>,
    last_len: usize,
    finished: bool,
}

impl ConsoleProgress<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl ConsoleProgress<io::Stderr> {
    /// Progress on stderr, leaving stdout free for machine-readable output.
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write> ConsoleProgress<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            started: Instant::now(),
            last_permille: None,
            last_len: 0,
            finished: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&self, count: u64, total: u64, permille: u64) -> String {
        let elapsed = self.started.elapsed();
        if count >= total {
            return format!("\r100%  elapsed {}", format_duration(elapsed));
        }

        let percent = permille as f64 / 10.0;
        let estimate = if permille == 0 {
            "--:--:--".to_string()
        } else {
            let multiplier = (1000.0 / permille as f64).max(1.0);
            format_duration(elapsed.mul_f64(multiplier))
        };
        format!(
            "\r{percent:.1}%  elapsed {}  estimated {estimate}",
            format_duration(elapsed)
        )
    }
}

impl<W: Write> ProgressSink for ConsoleProgress<W> {
    fn report(&mut self, count: u64, total: u64) {
        if self.finished || total == 0 {
            return;
        }
        let permille = ((count as f64 / total as f64) * 1000.0) as u64;
        if self.last_permille == Some(permille) {
            return;
        }
        self.last_permille = Some(permille);

        let mut line = self.line(count, total, permille);
        let len = line.len();
        if len < self.last_len {
            line.push_str(&" ".repeat(self.last_len - len));
        }
        self.last_len = len;
        if count >= total {
            line.push('\n');
            self.finished = true;
        }

        // A broken terminal must not disturb the search.
        let _ = self.out.write_all(line.as_bytes());
        let _ = self.out.flush();
    }
}
