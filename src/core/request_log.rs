use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Currencies,
    Convert,
    HistoricalRates,
    Average,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestRecord {
    pub operation: Operation,
    pub from_currency: Option<String>,
    pub to_currency: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

/// Bounded, best-effort record of completed operations, oldest evicted first.
///
/// Owned by one server instance; never consulted when computing results.
#[derive(Clone)]
pub struct RequestLog {
    capacity: usize,
    inner: Arc<Mutex<VecDeque<RequestRecord>>>,
}

impl RequestLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
        }
    }

    pub async fn record(&self, operation: Operation, from: Option<&str>, to: Option<&str>) {
        if self.capacity == 0 {
            return;
        }
        let mut entries = self.inner.lock().await;
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        debug!(?operation, "Request log PUT");
        entries.push_back(RequestRecord {
            operation,
            from_currency: from.map(str::to_string),
            to_currency: to.map(str::to_string),
            recorded_at: Utc::now(),
        });
    }

    /// Entries oldest first.
    pub async fn snapshot(&self) -> Vec<RequestRecord> {
        self.inner.lock().await.iter().cloned().collect()
    }
}

impl Default for RequestLog {
    fn default() -> Self {
        Self::new(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_record_and_snapshot() {
        let log = RequestLog::new(10);
        assert!(log.snapshot().await.is_empty());

        log.record(Operation::Convert, Some("USD"), Some("PLN")).await;
        log.record(Operation::Currencies, None, None).await;

        let entries = log.snapshot().await;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].operation, Operation::Convert);
        assert_eq!(entries[0].from_currency.as_deref(), Some("USD"));
        assert_eq!(entries[1].operation, Operation::Currencies);
        assert!(entries[1].to_currency.is_none());
    }

    #[tokio::test]
    async fn test_oldest_evicted_when_full() {
        let log = RequestLog::new(2);
        log.record(Operation::Convert, Some("USD"), Some("PLN")).await;
        log.record(Operation::Average, Some("GBP"), Some("EUR")).await;
        log.record(Operation::HistoricalRates, Some("EUR"), Some("JPY")).await;

        let entries = log.snapshot().await;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].operation, Operation::Average);
        assert_eq!(entries[1].operation, Operation::HistoricalRates);
    }

    #[tokio::test]
    async fn test_zero_capacity_disables_log() {
        let log = RequestLog::new(0);
        log.record(Operation::Convert, Some("USD"), Some("PLN")).await;
        assert!(log.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_instances_are_isolated() {
        let first = RequestLog::new(5);
        let second = RequestLog::new(5);
        first.record(Operation::Convert, Some("USD"), Some("PLN")).await;
        assert_eq!(first.snapshot().await.len(), 1);
        assert!(second.snapshot().await.is_empty());
    }
}
