use crate::{
    error::MonitorError,
    history::HistoryStore,
    token::{EnrichedToken, RawTokenRecord, normalize},
};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::{sync::Arc, time::Duration};
use tracing::{info, warn};

/// [`MonitorState`] shared between the poller (sole writer) and its readers.
///
/// The lock is never held across an `.await`.
pub type SharedState = Arc<RwLock<MonitorState>>;

/// Outcome of one successful poll cycle.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct PollSummary {
    /// Records delivered by the source.
    pub received: usize,
    /// Records dropped because the token graduated to a CEX listing.
    pub excluded_cex: usize,
    /// Tokens published as the current token set.
    pub published: usize,
}

/// Loading, error and freshness status of the monitor.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PollStatus {
    pub loading: bool,
    pub error: Option<MonitorError>,
    pub last_updated: Option<DateTime<Utc>>,
    pub token_count: usize,
}

/// Current token set, its history and poll status.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorState {
    tokens: Vec<EnrichedToken>,
    history: HistoryStore,
    in_flight: usize,
    error: Option<MonitorError>,
    last_updated: Option<DateTime<Utc>>,
}

impl Default for MonitorState {
    fn default() -> Self {
        Self::new(HistoryStore::default())
    }
}

impl MonitorState {
    pub fn new(history: HistoryStore) -> Self {
        Self {
            tokens: Vec::new(),
            history,
            in_flight: 0,
            error: None,
            last_updated: None,
        }
    }

    pub fn with_retention(retention: Duration) -> Self {
        Self::new(HistoryStore::new(retention))
    }

    pub fn shared(self) -> SharedState {
        Arc::new(RwLock::new(self))
    }

    /// Current token set, in API order.
    pub fn tokens(&self) -> &[EnrichedToken] {
        &self.tokens
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn error(&self) -> Option<&MonitorError> {
        self.error.as_ref()
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    pub fn status(&self) -> PollStatus {
        PollStatus {
            loading: self.is_loading(),
            error: self.error.clone(),
            last_updated: self.last_updated,
            token_count: self.tokens.len(),
        }
    }

    /// Mark a poll cycle as started, clearing the previous cycle's error.
    pub fn begin_cycle(&mut self) {
        self.in_flight += 1;
        self.error = None;
    }

    /// Publish a successful snapshot taken at `now`.
    ///
    /// CEX-listed records are dropped, the rest are normalised in API order and recorded into
    /// the history store.
    pub fn apply_snapshot(&mut self, raw: Vec<RawTokenRecord>, now: DateTime<Utc>) -> PollSummary {
        let received = raw.len();
        let tokens = raw
            .into_iter()
            .filter(|record| !record.is_cex_listed())
            .map(normalize)
            .collect::<Vec<_>>();

        let summary = PollSummary {
            received,
            excluded_cex: received - tokens.len(),
            published: tokens.len(),
        };

        self.history.record(now.timestamp_millis(), &tokens);
        self.tokens = tokens;
        self.last_updated = Some(now);
        self.end_cycle();

        info!(
            received = summary.received,
            excluded_cex = summary.excluded_cex,
            published = summary.published,
            "token list poll succeeded"
        );

        summary
    }

    /// Record a failed cycle. Tokens, history and `last_updated` are left as they were.
    pub fn apply_failure(&mut self, error: MonitorError) {
        warn!(%error, kind = ?error.kind(), "token list poll failed");
        self.error = Some(error);
        self.end_cycle();
    }

    fn end_cycle(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }
}
