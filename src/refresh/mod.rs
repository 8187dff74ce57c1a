//! Change notifications and the debouncing scheduler that turns bursts of
//! them into a single rebuild.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Default quiet period before a burst of changes triggers a rebuild.
pub const DEFAULT_QUIET_MILLIS: i64 = 250;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChangeSource {
    Account,
    Transaction,
    Budget,
    Preferences,
}

/// Something in the open book changed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DataChanged {
    pub source: ChangeSource,
    pub at: DateTime<Utc>,
}

impl DataChanged {
    pub fn new(source: ChangeSource, at: DateTime<Utc>) -> Self {
        Self { source, at }
    }
}

/// A coalesced group of notifications ready to be rebuilt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshBatch {
    pub events: usize,
    pub sources: Vec<ChangeSource>,
    pub first_at: DateTime<Utc>,
    pub last_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct RefreshScheduler {
    quiet: Duration,
    pending: Option<RefreshBatch>,
}

impl Default for RefreshScheduler {
    fn default() -> Self {
        Self::new(Duration::milliseconds(DEFAULT_QUIET_MILLIS))
    }
}

impl RefreshScheduler {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    /// Records a change; each one restarts the quiet period.
    pub fn notify(&mut self, change: DataChanged) {
        match &mut self.pending {
            Some(batch) => {
                batch.events += 1;
                batch.last_at = batch.last_at.max(change.at);
                if !batch.sources.contains(&change.source) {
                    batch.sources.push(change.source);
                }
            }
            None => {
                self.pending = Some(RefreshBatch {
                    events: 1,
                    sources: vec![change.source],
                    first_at: change.at,
                    last_at: change.at,
                });
            }
        }
        tracing::trace!(source = ?change.source, "change queued");
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Hands out the pending batch once `now` is past the quiet period.
    pub fn poll(&mut self, now: DateTime<Utc>) -> Option<RefreshBatch> {
        let ready = self
            .pending
            .as_ref()
            .is_some_and(|batch| now - batch.last_at >= self.quiet);
        if ready {
            self.flush()
        } else {
            None
        }
    }

    /// Hands out whatever is pending without waiting.
    pub fn flush(&mut self) -> Option<RefreshBatch> {
        let batch = self.pending.take()?;
        tracing::debug!(
            events = batch.events,
            sources = batch.sources.len(),
            "refresh due"
        );
        Some(batch)
    }
}
