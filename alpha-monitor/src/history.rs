//! Rolling per-token observation history with eviction-on-write.
//!
//! Every poll appends one [`HistoryPoint`] per published token and drops points that have aged
//! out of the retention window. Tokens missing from a poll keep their series untouched.

use crate::{
    config::DEFAULT_RETENTION,
    token::{EnrichedToken, TokenId},
};
use fnv::FnvHashMap;
use serde::{Deserialize, Serialize};
use std::{collections::VecDeque, time::Duration};
use tracing::debug;

/// One observation of a token. `timestamp` is epoch milliseconds.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize, Serialize)]
pub struct HistoryPoint {
    pub timestamp: i64,
    pub price: f64,
    pub holders: u64,
}

/// Metric that can be read back from a [`HistorySeries`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub enum HistoryMetric {
    Price,
    Holders,
}

#[derive(Debug, Copy, Clone, PartialEq, Deserialize, Serialize)]
pub struct MetricPoint {
    pub value: f64,
}

/// Chronologically ordered observations of one token.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct HistorySeries {
    points: VecDeque<HistoryPoint>,
}

impl HistorySeries {
    /// Drop every point at or before `cutoff`, then append `point`.
    pub fn evict_and_push(&mut self, cutoff: i64, point: HistoryPoint) {
        self.points.retain(|existing| existing.timestamp > cutoff);
        self.points.push_back(point);
    }

    pub fn points(&self) -> impl DoubleEndedIterator<Item = &HistoryPoint> + ExactSizeIterator {
        self.points.iter()
    }

    pub fn first(&self) -> Option<&HistoryPoint> {
        self.points.front()
    }

    pub fn last(&self) -> Option<&HistoryPoint> {
        self.points.back()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn values(&self, metric: HistoryMetric) -> Vec<MetricPoint> {
        self.points
            .iter()
            .map(|point| MetricPoint {
                value: metric.value(point),
            })
            .collect()
    }
}

impl HistoryMetric {
    pub fn value(&self, point: &HistoryPoint) -> f64 {
        match self {
            HistoryMetric::Price => point.price,
            HistoryMetric::Holders => point.holders as f64,
        }
    }
}

/// Token id to [`HistorySeries`]. Series are created on first observation and never removed.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryStore {
    retention: Duration,
    series: FnvHashMap<TokenId, HistorySeries>,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_RETENTION)
    }
}

impl HistoryStore {
    pub fn new(retention: Duration) -> Self {
        Self {
            retention,
            series: FnvHashMap::default(),
        }
    }

    pub fn retention(&self) -> Duration {
        self.retention
    }

    /// Record one poll taken at `now` (epoch ms) for every token in `tokens`.
    pub fn record(&mut self, now: i64, tokens: &[EnrichedToken]) {
        let retention_ms = i64::try_from(self.retention.as_millis()).unwrap_or(i64::MAX);
        let cutoff = now.saturating_sub(retention_ms);

        for token in tokens {
            self.series
                .entry(token.id().clone())
                .or_default()
                .evict_and_push(
                    cutoff,
                    HistoryPoint {
                        timestamp: now,
                        price: token.price,
                        holders: token.holders,
                    },
                );
        }

        debug!(
            now,
            cutoff,
            recorded = tokens.len(),
            tracked = self.series.len(),
            "recorded token history"
        );
    }

    pub fn series(&self, id: &TokenId) -> Option<&HistorySeries> {
        self.series.get(id)
    }

    /// Chronological values of `metric` for token `id`. Empty when the token has no history.
    pub fn query(&self, id: &TokenId, metric: HistoryMetric) -> Vec<MetricPoint> {
        self.series
            .get(id)
            .map(|series| series.values(metric))
            .unwrap_or_default()
    }

    /// `Some(true)` when the latest value of `metric` is at least its oldest retained value.
    pub fn trend(&self, id: &TokenId, metric: HistoryMetric) -> Option<bool> {
        let series = self.series.get(id)?;
        let (first, last) = (series.first()?, series.last()?);
        Some(metric.value(last) >= metric.value(first))
    }

    pub fn contains(&self, id: &TokenId) -> bool {
        self.series.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{RawTokenRecord, normalize, test_utils::raw_token};

    const HOUR_MS: i64 = 60 * 60 * 1000;

    fn token(id: &str, price: &str, holders: &str) -> EnrichedToken {
        normalize(RawTokenRecord {
            price: price.to_string(),
            holders: holders.to_string(),
            ..raw_token(id, id, id)
        })
    }

    #[test]
    fn test_retention_drops_aged_points() {
        let mut store = HistoryStore::default();
        let id = TokenId::new("A");

        store.record(0, &[token("A", "1.0", "10")]);
        store.record(49 * HOUR_MS, &[token("A", "2.0", "20")]);

        let series = store.series(&id).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(
            series.last(),
            Some(&HistoryPoint {
                timestamp: 49 * HOUR_MS,
                price: 2.0,
                holders: 20
            })
        );
    }

    #[test]
    fn test_retention_boundary() {
        struct TestCase {
            previous: i64,
            now: i64,
            expected_len: usize,
        }

        let tests = vec![
            TestCase {
                // TC0: point exactly at the cutoff is dropped
                previous: 0,
                now: 48 * HOUR_MS,
                expected_len: 1,
            },
            TestCase {
                // TC1: point one ms inside the window survives
                previous: 1,
                now: 48 * HOUR_MS,
                expected_len: 2,
            },
            TestCase {
                // TC2: consecutive polls accumulate
                previous: 0,
                now: HOUR_MS,
                expected_len: 2,
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let mut store = HistoryStore::default();
            store.record(test.previous, &[token("A", "1", "1")]);
            store.record(test.now, &[token("A", "1", "1")]);

            let series = store.series(&TokenId::new("A")).unwrap();
            assert_eq!(series.len(), test.expected_len, "TC{} failed", index);
            assert!(
                series
                    .points()
                    .all(|point| point.timestamp > test.now - 48 * HOUR_MS),
                "TC{} failed",
                index
            );
        }
    }

    #[test]
    fn test_consecutive_polls_grow_by_one_and_end_at_latest() {
        let mut store = HistoryStore::default();
        let id = TokenId::new("A");

        for poll in 0..5 {
            store.record(poll * 5 * 60 * 1000, &[token("A", "1", "1")]);
        }
        let before = store.series(&id).unwrap().len();

        store.record(25 * 60 * 1000, &[token("A", "1.5", "2")]);

        let series = store.series(&id).unwrap();
        assert_eq!(series.len(), before + 1);
        assert_eq!(series.last().map(|point| point.timestamp), Some(25 * 60 * 1000));
        assert!(
            series
                .points()
                .zip(series.points().skip(1))
                .all(|(prev, next)| prev.timestamp < next.timestamp)
        );
    }

    #[test]
    fn test_absent_tokens_untouched() {
        let mut store = HistoryStore::default();
        store.record(0, &[token("A", "1", "1"), token("B", "2", "2")]);
        store.record(49 * HOUR_MS, &[token("A", "1", "1")]);

        // B is stale beyond retention but only evicted on its next write
        let stale = store.series(&TokenId::new("B")).unwrap();
        assert_eq!(stale.len(), 1);
        assert_eq!(stale.first().map(|point| point.timestamp), Some(0));
    }

    #[test]
    fn test_query_and_trend() {
        let mut store = HistoryStore::default();
        let id = TokenId::new("A");

        assert!(store.query(&id, HistoryMetric::Price).is_empty());
        assert_eq!(store.trend(&id, HistoryMetric::Price), None);

        store.record(0, &[token("A", "2.0", "100")]);
        store.record(HOUR_MS, &[token("A", "1.5", "150")]);

        assert_eq!(
            store.query(&id, HistoryMetric::Price),
            vec![MetricPoint { value: 2.0 }, MetricPoint { value: 1.5 }]
        );
        assert_eq!(
            store.query(&id, HistoryMetric::Holders),
            vec![MetricPoint { value: 100.0 }, MetricPoint { value: 150.0 }]
        );
        assert_eq!(store.trend(&id, HistoryMetric::Price), Some(false));
        assert_eq!(store.trend(&id, HistoryMetric::Holders), Some(true));
    }
}
