//! Command-line interface for the load driver

use crate::types::TargetSelection;
use clap::Parser;
use std::path::PathBuf;

/// Reverse Load Tester - drive a reverse-string echo service on Docker
/// Swarm and Kubernetes and record response times
#[derive(Parser, Debug, Clone)]
#[command(name = "rlt")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Which deployment(s) to drive
    #[arg(long, value_enum, default_value_t = TargetSelection::Swarm)]
    pub target: TargetSelection,

    /// Echo endpoint behind Docker Swarm
    #[arg(long, default_value = crate::defaults::DEFAULT_SWARM_URL)]
    pub swarm_url: String,

    /// Echo endpoint behind the Kubernetes ingress (empty = not configured)
    #[arg(long, default_value = crate::defaults::DEFAULT_K8S_URL)]
    pub k8s_url: String,

    /// Target request rate per second for the bulk run (<= 0 disables pacing)
    #[arg(short, long, default_value_t = crate::defaults::DEFAULT_RATE, allow_negative_numbers = true)]
    pub rate: f64,

    /// Number of requests in the bulk run
    #[arg(short = 'n', long, default_value_t = crate::defaults::DEFAULT_REQUEST_COUNT)]
    pub count: usize,

    /// Maximum number of in-flight requests
    #[arg(short, long, value_parser = parse_concurrency, default_value_t = crate::defaults::DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Per-request timeout in seconds
    #[arg(short, long, value_parser = parse_duration, default_value_t = crate::defaults::DEFAULT_TIMEOUT.as_secs())]
    pub timeout: u64,

    /// Directory for summary files and charts
    #[arg(short, long, default_value = crate::defaults::DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Prefix for artifact file names
    #[arg(long, default_value = crate::defaults::DEFAULT_ARTIFACT_PREFIX)]
    pub prefix: String,

    /// Force colored output
    #[arg(long, conflicts_with = "no_color")]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Kubernetes URL, with an empty value meaning "not configured"
    pub fn k8s_url(&self) -> Option<String> {
        let trimmed = self.k8s_url.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        if self.color {
            true
        } else if self.no_color {
            false
        } else {
            supports_color()
        }
    }

    /// Get configuration summary for display
    pub fn get_config_summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("Configuration Summary:\n");
        summary.push_str(&format!("  Target: {}\n", self.target));
        if self.target.includes(crate::types::Target::Swarm) {
            summary.push_str(&format!("  Swarm URL: {}\n", self.swarm_url));
        }
        if self.target.includes(crate::types::Target::K8s) {
            summary.push_str(&format!(
                "  K8s URL: {}\n",
                self.k8s_url().unwrap_or_else(|| "(not configured)".to_string())
            ));
        }
        summary.push_str(&format!("  Requests: {}\n", self.count));
        summary.push_str(&format!("  Rate: {} req/s\n", self.rate));
        summary.push_str(&format!("  Concurrency: {}\n", self.concurrency));
        summary.push_str(&format!("  Timeout: {}s\n", self.timeout));
        summary.push_str(&format!("  Output directory: {}\n", self.output_dir.display()));
        summary.push_str(&format!("  Colored output: {}\n", self.use_colors()));
        summary.push_str(&format!("  Verbose mode: {}\n", self.verbose));
        summary.push_str(&format!("  Debug mode: {}\n", self.debug));

        summary
    }
}

/// Parse duration from seconds string
fn parse_duration(s: &str) -> Result<u64, String> {
    if s.starts_with('+') || s.starts_with("0x") || s.starts_with("0X") {
        return Err(format!("Invalid duration: {}", s));
    }

    s.parse::<u64>()
        .map_err(|_| format!("Invalid duration: {}", s))
        .and_then(|secs| {
            if secs == 0 {
                Err("Duration must be greater than 0".to_string())
            } else if secs > crate::models::config::MAX_TIMEOUT_SECONDS {
                Err(format!(
                    "Duration cannot exceed {} seconds",
                    crate::models::config::MAX_TIMEOUT_SECONDS
                ))
            } else {
                Ok(secs)
            }
        })
}

fn parse_concurrency(s: &str) -> Result<usize, String> {
    let value = s.parse::<usize>().map_err(|_| format!("Invalid concurrency: {}", s))?;
    if value == 0 {
        Err("Concurrency must be at least 1".to_string())
    } else {
        Ok(value)
    }
}

/// Check if the terminal supports color output
pub fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    #[cfg(target_os = "windows")]
    {
        if std::env::var("ANSICON").is_ok() || std::env::var("ConEmuANSI").is_ok() {
            return true;
        }
    }

    #[cfg(unix)]
    {
        true
    }
    #[cfg(not(unix))]
    {
        false
    }
}
