//! Data models and structures for the reverse load tester

pub mod config;
pub mod metrics;

// Re-export main model types
pub use config::Config;
pub use metrics::{RequestOutcome, RequestRecord, ReversalPair, RunResult};
