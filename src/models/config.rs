//! Configuration data model and validation

use crate::types::{AppError, Result, Target, TargetSelection};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Upper bound on a single bulk run
pub const MAX_REQUEST_COUNT: usize = 1_000_000;
/// Upper bound on simultaneously outstanding requests
pub const MAX_CONCURRENCY: usize = 10_000;
/// Upper bound on the per-request timeout
pub const MAX_TIMEOUT_SECONDS: u64 = 300;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Which deployments to drive
    #[serde(default)]
    pub target: TargetSelection,

    /// Echo endpoint behind Docker Swarm (including `/reverse`)
    #[serde(default = "default_swarm_url")]
    pub swarm_url: String,

    /// Echo endpoint behind Kubernetes; `None` means not configured
    #[serde(default = "default_k8s_url")]
    pub k8s_url: Option<String>,

    /// Number of requests in the bulk run
    #[serde(default = "default_request_count")]
    pub request_count: usize,

    /// Target issue rate in requests per second; `<= 0` disables pacing
    #[serde(default = "default_rate")]
    pub rate: f64,

    /// Maximum number of in-flight requests
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_seconds: u64,

    /// Directory receiving summary and plot artifacts
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Prefix prepended to every artifact file name
    #[serde(default = "default_artifact_prefix")]
    pub artifact_prefix: String,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target: TargetSelection::default(),
            swarm_url: default_swarm_url(),
            k8s_url: default_k8s_url(),
            request_count: default_request_count(),
            rate: default_rate(),
            concurrency: default_concurrency(),
            timeout_seconds: default_timeout_secs(),
            output_dir: default_output_dir(),
            artifact_prefix: default_artifact_prefix(),
            enable_color: default_enable_color(),
            verbose: false,
            debug: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// URL configured for a target, if any
    pub fn url_for(&self, target: Target) -> Option<&str> {
        let url = match target {
            Target::Swarm => Some(self.swarm_url.as_str()),
            Target::K8s => self.k8s_url.as_deref(),
        };
        url.filter(|url| !url.trim().is_empty())
    }

    /// Validate the configuration and return any errors.
    ///
    /// A missing k8s URL is not an error here; it is reported when the k8s
    /// run is reached so that other targets still run.
    pub fn validate(&self) -> Result<()> {
        if self.target.includes(Target::Swarm) {
            validate_endpoint("swarm", &self.swarm_url)?;
        }

        if self.target.includes(Target::K8s) {
            if let Some(url) = self.url_for(Target::K8s) {
                validate_endpoint("k8s", url)?;
            }
        }

        if self.request_count > MAX_REQUEST_COUNT {
            return Err(AppError::validation(format!(
                "Request count cannot exceed {}", MAX_REQUEST_COUNT
            )));
        }

        if self.rate.is_nan() {
            return Err(AppError::validation("Rate must be a number"));
        }

        if self.concurrency == 0 {
            return Err(AppError::validation("Concurrency must be greater than 0"));
        }

        if self.concurrency > MAX_CONCURRENCY {
            return Err(AppError::validation(format!(
                "Concurrency cannot exceed {}", MAX_CONCURRENCY
            )));
        }

        if self.timeout_seconds == 0 {
            return Err(AppError::validation("Timeout must be greater than 0"));
        }

        if self.timeout_seconds > MAX_TIMEOUT_SECONDS {
            return Err(AppError::validation(format!(
                "Timeout cannot exceed {} seconds", MAX_TIMEOUT_SECONDS
            )));
        }

        if self.artifact_prefix.contains(std::path::is_separator) {
            return Err(AppError::config("Artifact prefix cannot contain path separators"));
        }

        Ok(())
    }
}

fn validate_endpoint(name: &str, url: &str) -> Result<()> {
    if url.is_empty() {
        return Err(AppError::config(format!("The {} URL cannot be empty", name)));
    }

    let parsed = url::Url::parse(url)
        .map_err(|e| AppError::config(format!("Invalid {} URL '{}': {}", name, url, e)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(AppError::config(format!(
            "The {} URL must use http or https, got '{}'", name, other
        ))),
    }
}

// Default value functions for serde
fn default_swarm_url() -> String {
    crate::defaults::DEFAULT_SWARM_URL.to_string()
}

fn default_k8s_url() -> Option<String> {
    Some(crate::defaults::DEFAULT_K8S_URL.to_string())
}

fn default_request_count() -> usize {
    crate::defaults::DEFAULT_REQUEST_COUNT
}

fn default_rate() -> f64 {
    crate::defaults::DEFAULT_RATE
}

fn default_concurrency() -> usize {
    crate::defaults::DEFAULT_CONCURRENCY
}

fn default_timeout_secs() -> u64 {
    crate::defaults::DEFAULT_TIMEOUT.as_secs()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(crate::defaults::DEFAULT_OUTPUT_DIR)
}

fn default_artifact_prefix() -> String {
    crate::defaults::DEFAULT_ARTIFACT_PREFIX.to_string()
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}
