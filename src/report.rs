//! Snapshot reporters
//!
//! ## Reporter Trait
//!
//! The host publishes a [`Snapshot`] after every update; a [`Reporter`] turns snapshots into
//! output. Snapshots may be coalesced, so reporters must not assume they see every
//! intermediate state, only that the final one is delivered.

use std::io::{self, Write};

use serde_json::json;

use crate::app::{FailedTest, Snapshot};

/// Trait for rendering run snapshots.
pub trait Reporter {
    fn render(&mut self, snapshot: &Snapshot);
}

/// Output format selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Console,
    Json,
}

// ============================================================================
// Console reporter
// ============================================================================

/// Default console reporter (pytest-style summary)
pub struct ConsoleReporter<W = io::Stdout> {
    out: W,
    /// Print each failure as soon as it is observed
    verbose: bool,
    /// Redraw a progress line and use ANSI colors
    live: bool,
    failures_shown: usize,
    last: Option<Snapshot>,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout(verbose: bool, live: bool) -> Self {
        Self::new(io::stdout(), verbose, live)
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, verbose: bool, live: bool) -> Self {
        Self {
            out,
            verbose,
            live,
            failures_shown: 0,
            last: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.live {
            format!("\x1b[{}m{}\x1b[0m", code, text)
        } else {
            text.to_string()
        }
    }

    fn clear_line(&mut self) -> io::Result<()> {
        if self.live {
            write!(self.out, "\r\x1b[2K")?;
        }
        Ok(())
    }

    fn render_running(&mut self, completed: usize, remaining: usize, failures: &[FailedTest]) -> io::Result<()> {
        if self.verbose {
            for failed in &failures[self.failures_shown.min(failures.len())..] {
                self.clear_line()?;
                let status = self.paint("31", "FAILED");
                writeln!(self.out, "{} {}", failed.path(" > "), status)?;
            }
            self.failures_shown = failures.len();
        }

        if self.live {
            self.clear_line()?;
            write!(
                self.out,
                "{}/{} tests complete, {} failed",
                completed,
                completed + remaining,
                failures.len()
            )?;
        }
        self.out.flush()
    }

    fn render_finished(
        &mut self,
        duration: std::time::Duration,
        passed: usize,
        failures: &[FailedTest],
    ) -> io::Result<()> {
        self.clear_line()?;

        if !failures.is_empty() {
            let banner = self.paint("1;31", "=================== FAILURES ===================");
            writeln!(self.out, "{}", banner)?;
            for failed in failures {
                let heading = self.paint("1", &format!("___________ {} ___________", failed.path(" > ")));
                writeln!(self.out)?;
                writeln!(self.out, "{}", heading)?;
                for failure in &failed.failures {
                    writeln!(self.out)?;
                    for line in failure.to_string().lines() {
                        if line.is_empty() {
                            writeln!(self.out)?;
                        } else {
                            writeln!(self.out, "    {}", line)?;
                        }
                    }
                }
            }
            writeln!(self.out)?;
        }

        let mut parts = Vec::new();
        if passed > 0 {
            parts.push(format!("{} passed", passed));
        }
        if !failures.is_empty() {
            parts.push(format!("{} failed", failures.len()));
        }
        if parts.is_empty() {
            parts.push("no tests ran".to_string());
        }

        let color = if failures.is_empty() { "1;32" } else { "1;31" };
        let summary = self.paint(
            color,
            &format!(
                "=================== {} in {:.2}s ===================",
                parts.join(", "),
                duration.as_secs_f64()
            ),
        );
        writeln!(self.out, "{}", summary)?;
        self.out.flush()
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn render(&mut self, snapshot: &Snapshot) {
        if self.last.as_ref() == Some(snapshot) {
            return;
        }

        let result = match snapshot {
            Snapshot::NotStarted => Ok(()),
            Snapshot::Running {
                completed,
                remaining,
                failures,
            } => self.render_running(*completed, *remaining, failures),
            Snapshot::Finished {
                duration,
                passed,
                failures,
            } => self.render_finished(*duration, *passed, failures),
        };
        if let Err(err) = result {
            tracing::warn!(%err, "failed to write test report");
        }

        self.last = Some(snapshot.clone());
    }
}

// ============================================================================
// JSON reporter
// ============================================================================

/// Emits one JSON object per distinct snapshot (newline-delimited).
pub struct JsonReporter<W = io::Stdout> {
    out: W,
    last: Option<Snapshot>,
}

impl JsonReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out, last: None }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn render(&mut self, snapshot: &Snapshot) {
        if self.last.as_ref() == Some(snapshot) {
            return;
        }
        if let Err(err) = writeln!(self.out, "{}", snapshot_json(snapshot)) {
            tracing::warn!(%err, "failed to write test report");
        }
        self.last = Some(snapshot.clone());
    }
}

/// JSON form of a snapshot.
pub fn snapshot_json(snapshot: &Snapshot) -> serde_json::Value {
    match snapshot {
        Snapshot::NotStarted => json!({ "status": "not_started" }),
        Snapshot::Running {
            completed,
            remaining,
            failures,
        } => json!({
            "status": "running",
            "completed": completed,
            "remaining": remaining,
            "failures": failures_json(failures),
        }),
        Snapshot::Finished {
            duration,
            passed,
            failures,
        } => json!({
            "status": "finished",
            "duration_ms": u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
            "passed": passed,
            "failed": failures.len(),
            "failures": failures_json(failures),
        }),
    }
}

fn failures_json(failures: &[FailedTest]) -> serde_json::Value {
    failures
        .iter()
        .map(|failed| {
            json!({
                "labels": failed.labels,
                "failures": failed
                    .failures
                    .iter()
                    .map(|f| json!({ "given": f.given, "message": f.message }))
                    .collect::<Vec<_>>(),
            })
        })
        .collect()
}
