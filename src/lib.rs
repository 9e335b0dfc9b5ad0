//! Reverse Load Tester
//!
//! An async load generator that drives a "reverse string" echo service
//! deployed behind Docker Swarm or a Kubernetes ingress, records response
//! times, and writes per-run text summaries and response-time charts. The
//! echo service itself lives in [`server`].

pub mod app;
pub mod cli;
pub mod config;
pub mod client;
pub mod error;
pub mod executor;
pub mod logging;
pub mod models;
pub mod output;
pub mod server;
pub mod stats;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use models::{Config, RequestRecord, RunResult};
pub use client::{EchoClient, ReverseClient};
pub use executor::{ExecutionConfig, LoadDriver};
pub use stats::LatencyStatistics;
pub use types::{RunKind, Target, TargetSelection};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Build metadata injected by `build.rs`
pub fn build_info() -> String {
    format!(
        "{} v{} (commit {}, built {})",
        PKG_NAME,
        VERSION,
        env!("GIT_COMMIT"),
        env!("BUILD_TIME")
    )
}

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    /// Canned corpus sent sequentially in the small run and cycled
    /// round-robin in the bulk run.
    pub const CORPUS: &[&str] = &[
        "5PKOHcL6OuxRd0xXHQ",
        "JHfJtHH9",
        "gZFEMAS2JA",
        "NkmPg9jT2uMwWvQ9",
        "lV0NTS",
        "tcmViV3cxd6J794H",
        "SKZpKaksPB1",
        "5ygFfJXEgn7ssgyuS",
        "mvZ5wv7qfk",
        "tD58eeUOLh",
    ];

    pub const DEFAULT_SWARM_URL: &str = "http://localhost:5000/reverse";
    pub const DEFAULT_K8S_URL: &str = "http://localhost:52396/reverse";
    pub const DEFAULT_REQUEST_COUNT: usize = 10_000;
    pub const DEFAULT_RATE: f64 = 300.0;
    pub const DEFAULT_CONCURRENCY: usize = 50;
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
    pub const DEFAULT_OUTPUT_DIR: &str = ".";
    pub const DEFAULT_ARTIFACT_PREFIX: &str = "EE22B171";
    pub const DEFAULT_ENABLE_COLOR: bool = true;

    /// Echo service listen defaults
    pub const DEFAULT_ECHO_HOST: &str = "0.0.0.0";
    pub const DEFAULT_ECHO_PORT: u16 = 5000;
}
