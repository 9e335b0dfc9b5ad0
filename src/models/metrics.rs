//! Per-request records and per-run aggregates

use crate::stats::{self, LatencyStatistics};
use crate::types::{RequestStatus, RunKind, Target};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What happened to a single request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RequestOutcome {
    /// 2xx response with a decodable body
    Success {
        latency: Duration,
        reversed: String,
    },
    /// Any transport or application failure; no latency is kept
    Failed { error: String },
}

/// A single issued request. Lives only for the duration of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestRecord {
    /// Issue order within the run (0-based)
    pub index: usize,
    /// Text sent to the service
    pub payload: String,
    /// When the request was issued
    pub issued_at: DateTime<Utc>,
    /// Completion result
    pub outcome: RequestOutcome,
}

impl RequestRecord {
    pub fn success(index: usize, payload: String, issued_at: DateTime<Utc>, latency: Duration, reversed: String) -> Self {
        Self {
            index,
            payload,
            issued_at,
            outcome: RequestOutcome::Success { latency, reversed },
        }
    }

    pub fn failed(index: usize, payload: String, issued_at: DateTime<Utc>, error: String) -> Self {
        Self {
            index,
            payload,
            issued_at,
            outcome: RequestOutcome::Failed { error },
        }
    }

    pub fn status(&self) -> RequestStatus {
        match self.outcome {
            RequestOutcome::Success { .. } => RequestStatus::Success,
            RequestOutcome::Failed { .. } => RequestStatus::Failed,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status() == RequestStatus::Success
    }

    /// Latency of a successful request
    pub fn latency(&self) -> Option<Duration> {
        match &self.outcome {
            RequestOutcome::Success { latency, .. } => Some(*latency),
            RequestOutcome::Failed { .. } => None,
        }
    }

    /// Completion timestamp, derived from issue time plus latency
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        let latency = chrono::Duration::from_std(self.latency()?).ok()?;
        Some(self.issued_at + latency)
    }
}

/// Original text alongside what the service sent back
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReversalPair {
    pub original: String,
    pub reversed: String,
}

/// Aggregate of one run against one target.
///
/// `latencies` holds successes only, in completion order, so
/// `latencies.len() + failure_count == issued` once every record is in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub target: Target,
    pub kind: RunKind,
    /// Number of requests issued
    pub issued: usize,
    /// Latencies of successful requests, in completion order
    pub latencies: Vec<Duration>,
    /// Number of failed requests
    pub failure_count: usize,
    /// Original/reversed pairs, kept for canned runs only
    pub pairs: Vec<ReversalPair>,
    /// Wall-clock time from first issue to last completion
    pub elapsed: Duration,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl RunResult {
    pub fn new(target: Target, kind: RunKind) -> Self {
        Self {
            target,
            kind,
            issued: 0,
            latencies: Vec::new(),
            failure_count: 0,
            pairs: Vec::new(),
            elapsed: Duration::ZERO,
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Fold one completed request into the aggregate
    pub fn record(&mut self, record: RequestRecord) {
        self.issued += 1;
        match record.outcome {
            RequestOutcome::Success { latency, reversed } => {
                self.latencies.push(latency);
                if self.kind == RunKind::Canned {
                    self.pairs.push(ReversalPair {
                        original: record.payload,
                        reversed,
                    });
                }
            }
            RequestOutcome::Failed { .. } => self.failure_count += 1,
        }
    }

    /// Mark the run complete
    pub fn finish(&mut self, elapsed: Duration) {
        self.elapsed = elapsed;
        self.completed_at = Some(Utc::now());
    }

    pub fn success_count(&self) -> usize {
        self.latencies.len()
    }

    /// Mean latency in seconds; 0 when nothing succeeded
    pub fn average_latency(&self) -> f64 {
        stats::mean_seconds(&self.latencies)
    }

    /// Successful requests per second of wall time
    pub fn throughput(&self) -> f64 {
        stats::throughput(self.success_count(), self.elapsed)
    }

    /// Success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.issued == 0 {
            0.0
        } else {
            self.success_count() as f64 / self.issued as f64 * 100.0
        }
    }

    pub fn statistics(&self) -> LatencyStatistics {
        LatencyStatistics::from_latencies(&self.latencies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(index: usize, payload: &str, ms: u64) -> RequestRecord {
        RequestRecord::success(
            index,
            payload.to_string(),
            Utc::now(),
            Duration::from_millis(ms),
            payload.chars().rev().collect(),
        )
    }

    fn failed(index: usize, payload: &str) -> RequestRecord {
        RequestRecord::failed(index, payload.to_string(), Utc::now(), "connection refused".to_string())
    }

    #[test]
    fn test_record_status() {
        let record = ok(0, "ab", 10);
        assert!(record.is_success());
        assert_eq!(record.latency(), Some(Duration::from_millis(10)));
        assert!(record.completed_at().unwrap() > record.issued_at);

        let record = failed(1, "cd");
        assert_eq!(record.status(), RequestStatus::Failed);
        assert_eq!(record.latency(), None);
        assert_eq!(record.completed_at(), None);
    }

    #[test]
    fn test_counts_add_up() {
        let mut result = RunResult::new(Target::Swarm, RunKind::Bulk);
        result.record(ok(0, "ab", 10));
        result.record(failed(1, "cd"));
        result.record(ok(2, "ab", 30));

        assert_eq!(result.issued, 3);
        assert_eq!(result.success_count(), 2);
        assert_eq!(result.failure_count, 1);
        assert_eq!(result.success_count() + result.failure_count, result.issued);
        assert!(result.pairs.is_empty());
    }

    #[test]
    fn test_average_latency() {
        let mut result = RunResult::new(Target::K8s, RunKind::Bulk);
        assert_eq!(result.average_latency(), 0.0);

        result.record(ok(0, "ab", 10));
        result.record(ok(1, "cd", 20));
        result.record(ok(2, "ab", 30));
        assert!((result.average_latency() - 0.020).abs() < 1e-9);
    }

    #[test]
    fn test_all_failures_average_zero() {
        let mut result = RunResult::new(Target::K8s, RunKind::Bulk);
        result.record(failed(0, "ab"));
        result.record(failed(1, "cd"));
        result.finish(Duration::from_secs(1));

        assert_eq!(result.average_latency(), 0.0);
        assert_eq!(result.throughput(), 0.0);
        assert_eq!(result.success_rate(), 0.0);
    }

    #[test]
    fn test_canned_run_keeps_pairs() {
        let mut result = RunResult::new(Target::Swarm, RunKind::Canned);
        result.record(ok(0, "hello", 5));
        result.record(failed(1, "world"));

        assert_eq!(result.pairs.len(), 1);
        assert_eq!(result.pairs[0].original, "hello");
        assert_eq!(result.pairs[0].reversed, "olleh");
    }

    #[test]
    fn test_throughput() {
        let mut result = RunResult::new(Target::Swarm, RunKind::Bulk);
        for i in 0..10 {
            result.record(ok(i, "ab", 1));
        }
        result.finish(Duration::from_secs(2));
        assert!((result.throughput() - 5.0).abs() < 1e-9);
        assert_eq!(result.success_rate(), 100.0);
        assert!(result.completed_at.is_some());
    }
}
