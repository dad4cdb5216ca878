//! Session counters for the interactive console

use std::time::{Duration, Instant};
use tracing::info;

/// Running totals for one console session.
///
/// The console is single-user and synchronous, so plain counters behind
/// `&mut` are enough.
pub struct SessionStats {
    scored: u64,
    flagged: u64,
    failed: u64,
    started: Instant,
}

impl SessionStats {
    pub fn new() -> Self {
        Self {
            scored: 0,
            flagged: 0,
            failed: 0,
            started: Instant::now(),
        }
    }

    /// Record one completed evaluation.
    pub fn record_scored(&mut self, is_fraud: bool) {
        self.scored += 1;
        if is_fraud {
            self.flagged += 1;
        }
    }

    /// Record an evaluation that ended in a request-scoped error.
    pub fn record_failure(&mut self) {
        self.failed += 1;
    }

    pub fn scored(&self) -> u64 {
        self.scored
    }

    pub fn flagged(&self) -> u64 {
        self.flagged
    }

    pub fn failed(&self) -> u64 {
        self.failed
    }

    /// Share of scored transactions that were flagged, as a percentage.
    pub fn flag_rate(&self) -> f64 {
        if self.scored > 0 {
            (self.flagged as f64 / self.scored as f64) * 100.0
        } else {
            0.0
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Emit the end-of-session summary to the log.
    pub fn log_summary(&self) {
        info!(
            scored = self.scored,
            flagged = self.flagged,
            failed = self.failed,
            flag_rate_pct = self.flag_rate(),
            elapsed_secs = self.elapsed().as_secs(),
            "Session summary"
        );
    }
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}
