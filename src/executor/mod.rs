//! Rate-controlled concurrent request driver
//!
//! A run against one target has two passes:
//! - a canned pass sending each corpus string once, sequentially;
//! - a bulk pass issuing N requests on a fixed pacing interval, cycling
//!   through the corpus, with a counting semaphore bounding how many are
//!   in flight.
//!
//! Issuance is paced, completion is not: the issuing loop never waits for
//! earlier requests, so the achieved rate is the lower of the configured
//! rate and what the concurrency limit plus server latency allow.

use crate::{
    client::{timed_reverse, EchoClient},
    logging::DriverLogger,
    models::{Config, RequestRecord, RunResult},
    types::{RunKind, Target},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Semaphore};
use tokio::time::{interval, MissedTickBehavior};

/// Parameters of a bulk run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Number of requests to issue
    pub request_count: usize,
    /// Target issue rate in requests per second; `<= 0` disables pacing
    pub rate: f64,
    /// Maximum number of in-flight requests
    pub concurrency: usize,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            request_count: crate::defaults::DEFAULT_REQUEST_COUNT,
            rate: crate::defaults::DEFAULT_RATE,
            concurrency: crate::defaults::DEFAULT_CONCURRENCY,
        }
    }
}

impl From<&Config> for ExecutionConfig {
    fn from(config: &Config) -> Self {
        Self {
            request_count: config.request_count,
            rate: config.rate,
            concurrency: config.concurrency,
        }
    }
}

impl ExecutionConfig {
    pub fn pacing_interval(&self) -> Option<Duration> {
        pacing_interval(self.rate)
    }
}

/// Delay between successive issues for a rate, or `None` when pacing is
/// disabled
pub fn pacing_interval(rate: f64) -> Option<Duration> {
    if !rate.is_finite() || rate <= 0.0 {
        return None;
    }
    // Rates above a billion per second round to a zero interval
    Duration::try_from_secs_f64(1.0 / rate)
        .ok()
        .filter(|interval| !interval.is_zero())
}

/// Payload for the `index`-th request: the corpus is used round-robin
pub fn payload_for(corpus: &[String], index: usize) -> Option<&str> {
    if corpus.is_empty() {
        None
    } else {
        Some(corpus[index % corpus.len()].as_str())
    }
}

/// Drives one target through its canned and bulk passes
pub struct LoadDriver<C: EchoClient + 'static> {
    client: Arc<C>,
    target: Target,
    corpus: Arc<Vec<String>>,
    config: ExecutionConfig,
    logger: Option<Arc<DriverLogger>>,
}

impl<C: EchoClient + 'static> LoadDriver<C> {
    pub fn new(client: C, target: Target, corpus: Vec<String>, config: ExecutionConfig) -> Self {
        Self {
            client: Arc::new(client),
            target,
            corpus: Arc::new(corpus),
            config,
            logger: None,
        }
    }

    /// Log run boundaries and individual failures through `logger`
    pub fn with_logger(mut self, logger: Arc<DriverLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Driver over the built-in corpus
    pub fn with_default_corpus(client: C, target: Target, config: ExecutionConfig) -> Self {
        let corpus = crate::defaults::CORPUS.iter().map(|s| s.to_string()).collect();
        Self::new(client, target, corpus, config)
    }

    pub fn target(&self) -> Target {
        self.target
    }

    pub fn corpus(&self) -> &[String] {
        &self.corpus
    }

    pub fn config(&self) -> &ExecutionConfig {
        &self.config
    }

    pub fn endpoint(&self) -> &str {
        self.client.endpoint()
    }

    async fn begin(&self, kind: RunKind, planned: usize) -> Option<String> {
        match &self.logger {
            Some(logger) => Some(logger.log_run_start(self.target, kind.as_str(), self.endpoint(), planned).await),
            None => None,
        }
    }

    async fn observe(&self, record: &RequestRecord, correlation_id: Option<&str>) {
        if let (Some(logger), Some(id)) = (&self.logger, correlation_id) {
            if !record.is_success() {
                logger.log_request_failure(record, id).await;
            }
        }
    }

    async fn end(&self, result: &RunResult, correlation_id: Option<&str>) {
        if let (Some(logger), Some(id)) = (&self.logger, correlation_id) {
            logger.log_run_summary(result, id).await;
        }
    }

    /// Send every corpus string once, waiting for each response before the
    /// next request
    pub async fn run_canned(&self) -> RunResult {
        let mut result = RunResult::new(self.target, RunKind::Canned);
        let correlation_id = self.begin(RunKind::Canned, self.corpus.len()).await;
        let start = Instant::now();

        for (index, payload) in self.corpus.iter().enumerate() {
            let record = timed_reverse(self.client.as_ref(), index, payload).await;
            self.observe(&record, correlation_id.as_deref()).await;
            result.record(record);
        }

        result.finish(start.elapsed());
        self.end(&result, correlation_id.as_deref()).await;
        result
    }

    /// Issue the configured number of requests at the pacing interval with
    /// bounded concurrency.
    ///
    /// Latencies are appended in completion order.
    pub async fn run_bulk(&self) -> RunResult {
        let mut result = RunResult::new(self.target, RunKind::Bulk);
        let count = self.config.request_count;
        let correlation_id = self.begin(RunKind::Bulk, count).await;

        if count == 0 || self.corpus.is_empty() {
            result.finish(Duration::ZERO);
            self.end(&result, correlation_id.as_deref()).await;
            return result;
        }

        let semaphore = Arc::new(Semaphore::new(self.config.concurrency.max(1)));
        let (sender, mut receiver) = mpsc::unbounded_channel::<RequestRecord>();

        let mut ticker = self.config.pacing_interval().map(|period| {
            let mut ticker = interval(period);
            // Late ticks push the schedule back instead of bursting to catch up
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker
        });

        let start = Instant::now();

        for index in 0..count {
            if let Some(ticker) = ticker.as_mut() {
                ticker.tick().await;
            }

            let payload = self.corpus[index % self.corpus.len()].clone();
            let client = self.client.clone();
            let semaphore = semaphore.clone();
            let sender = sender.clone();

            tokio::spawn(async move {
                let record = match semaphore.acquire_owned().await {
                    Ok(_permit) => timed_reverse(client.as_ref(), index, &payload).await,
                    Err(_) => RequestRecord::failed(
                        index,
                        payload,
                        chrono::Utc::now(),
                        "concurrency gate closed".to_string(),
                    ),
                };
                let _ = sender.send(record);
            });
        }

        // Drop the sender so the channel closes once every task has reported
        drop(sender);

        while let Some(record) = receiver.recv().await {
            self.observe(&record, correlation_id.as_deref()).await;
            result.record(record);
        }

        // A task that panicked never reports; count it as a failure
        if result.issued < count {
            result.failure_count += count - result.issued;
            result.issued = count;
        }

        result.finish(start.elapsed());
        self.end(&result, correlation_id.as_deref()).await;
        result
    }
}
