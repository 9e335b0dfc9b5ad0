//! Core formatting traits and the plain-text implementation

use crate::{
    error::{AppError, Result},
    models::RunResult,
    stats::LatencyStatistics,
    types::RunKind,
};
use std::fmt::Write as _;
use std::time::Duration;

/// Terminal rendering of run results and status lines
pub trait OutputFormatter {
    /// Format a header section
    fn format_header(&self, title: &str) -> Result<String>;

    /// Format the console summary of one run.
    ///
    /// Every run shows requests, successes, failures and average latency;
    /// bulk runs add elapsed wall time and throughput.
    fn format_run_summary(&self, result: &RunResult) -> Result<String>;

    /// Format the latency distribution of a run
    fn format_statistics(&self, stats: &LatencyStatistics) -> Result<String>;

    /// Format the total wall-clock time of the invocation
    fn format_total_time(&self, elapsed: Duration) -> Result<String>;

    fn format_info(&self, message: &str) -> Result<String>;

    fn format_error(&self, error: &str) -> Result<String>;

    fn format_warning(&self, warning: &str) -> Result<String>;

    fn format_success(&self, message: &str) -> Result<String>;
}

/// Configuration options for formatting
#[derive(Debug, Clone)]
pub struct FormattingOptions {
    pub enable_color: bool,
    /// Add the latency distribution to run summaries
    pub verbose_mode: bool,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            enable_color: true,
            verbose_mode: false,
        }
    }
}

fn fmt_err(e: std::fmt::Error) -> AppError {
    AppError::internal(format!("Failed to format output: {}", e))
}

/// Title line of a run summary
pub(crate) fn run_title(result: &RunResult) -> String {
    match result.kind {
        RunKind::Canned => format!("{}-string test summary ({})", result.issued, result.target),
        RunKind::Bulk => format!("{}-request test summary ({})", result.issued, result.target),
    }
}

/// Format a duration in seconds in a human-readable way
pub(crate) fn format_seconds(seconds: f64) -> String {
    if seconds < 0.001 {
        format!("{:.1}µs", seconds * 1_000_000.0)
    } else if seconds < 1.0 {
        format!("{:.2}ms", seconds * 1000.0)
    } else if seconds < 60.0 {
        format!("{:.3}s", seconds)
    } else {
        let minutes = (seconds / 60.0) as u64;
        format!("{}m{:.1}s", minutes, seconds % 60.0)
    }
}

/// Plain text formatter implementation
pub struct PlainFormatter {
    options: FormattingOptions,
}

impl PlainFormatter {
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FormattingOptions {
        &self.options
    }
}

impl OutputFormatter for PlainFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let mut output = String::new();
        let border = "=".repeat(title.chars().count() + 4);

        writeln!(output, "{}", border).map_err(fmt_err)?;
        writeln!(output, "  {}  ", title).map_err(fmt_err)?;
        write!(output, "{}", border).map_err(fmt_err)?;

        Ok(output)
    }

    fn format_run_summary(&self, result: &RunResult) -> Result<String> {
        let mut output = String::new();

        writeln!(output, "[INFO] {}:", run_title(result)).map_err(fmt_err)?;
        writeln!(output, "  Requests: {}", result.issued).map_err(fmt_err)?;
        writeln!(output, "  Success:  {}", result.success_count()).map_err(fmt_err)?;
        writeln!(output, "  Failures: {}", result.failure_count).map_err(fmt_err)?;
        write!(output, "  Avg latency: {:.6}s", result.average_latency()).map_err(fmt_err)?;

        if result.kind == RunKind::Bulk {
            write!(output, "\n  Elapsed wall time: {:.3}s", result.elapsed.as_secs_f64()).map_err(fmt_err)?;
            write!(output, "\n  Throughput: {:.2} req/s", result.throughput()).map_err(fmt_err)?;
        }

        if self.options.verbose_mode && !result.latencies.is_empty() {
            write!(output, "\n{}", self.format_statistics(&result.statistics())?).map_err(fmt_err)?;
        }

        Ok(output)
    }

    fn format_statistics(&self, stats: &LatencyStatistics) -> Result<String> {
        if stats.is_empty() {
            return Ok("  Latency: no successful requests".to_string());
        }

        let mut output = String::new();
        writeln!(
            output,
            "  Latency min/median/max: {} / {} / {}",
            format_seconds(stats.min),
            format_seconds(stats.median),
            format_seconds(stats.max)
        )
        .map_err(fmt_err)?;
        write!(
            output,
            "  Latency p90/p99 (std dev): {} / {} ({})",
            format_seconds(stats.p90),
            format_seconds(stats.p99),
            format_seconds(stats.std_dev)
        )
        .map_err(fmt_err)?;
        Ok(output)
    }

    fn format_total_time(&self, elapsed: Duration) -> Result<String> {
        Ok(format!("[INFO] Total wall-clock time: {:.3}s", elapsed.as_secs_f64()))
    }

    fn format_info(&self, message: &str) -> Result<String> {
        Ok(format!("[INFO] {}", message))
    }

    fn format_error(&self, error: &str) -> Result<String> {
        Ok(format!("[ERROR] {}", error))
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("[WARN] {}", warning))
    }

    fn format_success(&self, message: &str) -> Result<String> {
        Ok(format!("[OK] {}", message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RequestRecord;
    use crate::types::Target;
    use chrono::Utc;

    fn bulk_result() -> RunResult {
        let mut result = RunResult::new(Target::Swarm, RunKind::Bulk);
        for (i, ms) in [10u64, 20, 30].iter().enumerate() {
            result.record(RequestRecord::success(i, "ab".into(), Utc::now(), Duration::from_millis(*ms), "ba".into()));
        }
        result.record(RequestRecord::failed(3, "cd".into(), Utc::now(), "timeout".into()));
        result.finish(Duration::from_secs(2));
        result
    }

    fn plain(verbose_mode: bool) -> PlainFormatter {
        PlainFormatter::new(FormattingOptions { enable_color: false, verbose_mode })
    }

    #[test]
    fn test_header() {
        let header = plain(false).format_header("Swarm").unwrap();
        assert_eq!(header, "=========\n  Swarm  \n=========");
    }

    #[test]
    fn test_bulk_run_summary() {
        let summary = plain(false).format_run_summary(&bulk_result()).unwrap();
        assert_eq!(
            summary,
            "[INFO] 4-request test summary (swarm):\n  Requests: 4\n  Success:  3\n  Failures: 1\n  \
             Avg latency: 0.020000s\n  Elapsed wall time: 2.000s\n  Throughput: 1.50 req/s"
        );
    }

    #[test]
    fn test_canned_run_summary_has_no_throughput() {
        let mut result = RunResult::new(Target::K8s, RunKind::Canned);
        result.record(RequestRecord::success(0, "ab".into(), Utc::now(), Duration::from_millis(5), "ba".into()));
        result.finish(Duration::from_millis(5));

        let summary = plain(false).format_run_summary(&result).unwrap();
        assert!(summary.starts_with("[INFO] 1-string test summary (k8s):"));
        assert!(summary.contains("Avg latency: 0.005000s"));
        assert!(!summary.contains("Throughput"));
    }

    #[test]
    fn test_verbose_summary_includes_distribution() {
        let summary = plain(true).format_run_summary(&bulk_result()).unwrap();
        assert!(summary.contains("Latency min/median/max: 10.00ms / 20.00ms / 30.00ms"));
        assert!(summary.contains("p90/p99"));
    }

    #[test]
    fn test_empty_statistics() {
        let text = plain(true).format_statistics(&LatencyStatistics::default()).unwrap();
        assert!(text.contains("no successful requests"));
    }

    #[test]
    fn test_status_lines() {
        let formatter = plain(false);
        assert_eq!(formatter.format_error("boom").unwrap(), "[ERROR] boom");
        assert_eq!(formatter.format_warning("careful").unwrap(), "[WARN] careful");
        assert_eq!(formatter.format_info("hello").unwrap(), "[INFO] hello");
        assert_eq!(formatter.format_success("done").unwrap(), "[OK] done");
        assert_eq!(
            formatter.format_total_time(Duration::from_millis(1500)).unwrap(),
            "[INFO] Total wall-clock time: 1.500s"
        );
    }

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(0.0005), "500.0µs");
        assert_eq!(format_seconds(0.0123), "12.30ms");
        assert_eq!(format_seconds(2.5), "2.500s");
        assert_eq!(format_seconds(125.0), "2m5.0s");
    }
}
