//! Colored formatter implementation with terminal color support

use crate::{
    error::Result,
    models::RunResult,
    stats::LatencyStatistics,
    types::RunKind,
};
use super::formatter::{format_seconds, run_title, FormattingOptions, OutputFormatter, PlainFormatter};
use colored::*;
use std::time::Duration;

/// Latency classification for color coding
#[derive(Debug, Clone, PartialEq)]
pub enum LatencyLevel {
    Excellent,  // < 10ms
    Good,       // 10-50ms
    Fair,       // 50-200ms
    Poor,       // 200ms-1s
    VeryPoor,   // > 1s
}

impl LatencyLevel {
    /// Classify an average latency given in seconds
    pub fn from_seconds(seconds: f64) -> Self {
        if seconds < 0.010 {
            Self::Excellent
        } else if seconds < 0.050 {
            Self::Good
        } else if seconds < 0.200 {
            Self::Fair
        } else if seconds < 1.0 {
            Self::Poor
        } else {
            Self::VeryPoor
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Self::Excellent => Color::Green,
            Self::Good => Color::Cyan,
            Self::Fair => Color::Yellow,
            Self::Poor => Color::Magenta,
            Self::VeryPoor => Color::Red,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
            Self::VeryPoor => "Very Poor",
        }
    }
}

/// Color scheme configuration
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub header: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub muted: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            header: Color::Blue,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            info: Color::Cyan,
            muted: Color::BrightBlack,
        }
    }
}

/// Colored formatter; falls back to plain rendering when colors are off
pub struct ColoredFormatter {
    plain_formatter: PlainFormatter,
    options: FormattingOptions,
    color_scheme: ColorScheme,
}

impl ColoredFormatter {
    pub fn new(options: FormattingOptions) -> Self {
        Self::with_color_scheme(options, ColorScheme::default())
    }

    pub fn with_color_scheme(options: FormattingOptions, color_scheme: ColorScheme) -> Self {
        Self {
            plain_formatter: PlainFormatter::new(options.clone()),
            options,
            color_scheme,
        }
    }

    fn colorize(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.color(color)
        } else {
            text.normal()
        }
    }

    fn tag(&self, label: &str, color: Color) -> ColoredString {
        self.colorize(&format!("[{}]", label), color).bold()
    }
}

impl OutputFormatter for ColoredFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        if !self.options.enable_color {
            return self.plain_formatter.format_header(title);
        }

        let border = "═".repeat(title.chars().count() + 4);
        Ok(format!(
            "{}\n  {}  \n{}",
            self.colorize(&border, self.color_scheme.header),
            self.colorize(title, self.color_scheme.header).bold(),
            self.colorize(&border, self.color_scheme.header)
        ))
    }

    fn format_run_summary(&self, result: &RunResult) -> Result<String> {
        if !self.options.enable_color {
            return self.plain_formatter.format_run_summary(result);
        }

        let avg = result.average_latency();
        let level = LatencyLevel::from_seconds(avg);
        let failures_color = if result.failure_count == 0 {
            self.color_scheme.success
        } else {
            self.color_scheme.error
        };

        let mut lines = vec![
            format!("{} {}:", self.tag("INFO", self.color_scheme.info), run_title(result).bold()),
            format!("  Requests: {}", result.issued),
            format!("  Success:  {}", self.colorize(&result.success_count().to_string(), self.color_scheme.success)),
            format!("  Failures: {}", self.colorize(&result.failure_count.to_string(), failures_color)),
            format!(
                "  Avg latency: {} {}",
                self.colorize(&format!("{:.6}s", avg), level.color()).bold(),
                self.colorize(&format!("({})", level.description()), self.color_scheme.muted)
            ),
        ];

        if result.kind == RunKind::Bulk {
            lines.push(format!("  Elapsed wall time: {:.3}s", result.elapsed.as_secs_f64()));
            lines.push(format!(
                "  Throughput: {}",
                self.colorize(&format!("{:.2} req/s", result.throughput()), self.color_scheme.info)
            ));
        }

        if self.options.verbose_mode && !result.latencies.is_empty() {
            lines.push(self.format_statistics(&result.statistics())?);
        }

        Ok(lines.join("\n"))
    }

    fn format_statistics(&self, stats: &LatencyStatistics) -> Result<String> {
        if !self.options.enable_color || stats.is_empty() {
            return self.plain_formatter.format_statistics(stats);
        }

        let colored_seconds = |value: f64| {
            self.colorize(&format_seconds(value), LatencyLevel::from_seconds(value).color())
        };

        Ok(format!(
            "  Latency min/median/max: {} / {} / {}\n  Latency p90/p99 (std dev): {} / {} ({})",
            colored_seconds(stats.min),
            colored_seconds(stats.median),
            colored_seconds(stats.max),
            colored_seconds(stats.p90),
            colored_seconds(stats.p99),
            self.colorize(&format_seconds(stats.std_dev), self.color_scheme.muted)
        ))
    }

    fn format_total_time(&self, elapsed: Duration) -> Result<String> {
        if !self.options.enable_color {
            return self.plain_formatter.format_total_time(elapsed);
        }
        Ok(format!(
            "{} Total wall-clock time: {}",
            self.tag("INFO", self.color_scheme.info),
            format!("{:.3}s", elapsed.as_secs_f64()).bold()
        ))
    }

    fn format_info(&self, message: &str) -> Result<String> {
        Ok(format!("{} {}", self.tag("INFO", self.color_scheme.info), message))
    }

    fn format_error(&self, error: &str) -> Result<String> {
        Ok(format!(
            "{} {}",
            self.tag("ERROR", self.color_scheme.error),
            self.colorize(error, self.color_scheme.error)
        ))
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!(
            "{} {}",
            self.tag("WARN", self.color_scheme.warning),
            self.colorize(warning, self.color_scheme.warning)
        ))
    }

    fn format_success(&self, message: &str) -> Result<String> {
        Ok(format!(
            "{} {}",
            self.tag("OK", self.color_scheme.success),
            self.colorize(message, self.color_scheme.success)
        ))
    }
}
