//! Output: terminal formatting, summary files and charts

mod colored;
mod formatter;
pub mod artifacts;
pub mod plot;
pub mod reducer;

pub use artifacts::{plot_filename, render_summary_text, summary_filename, write_summary, ArtifactPaths};
pub use colored::{ColorScheme, ColoredFormatter, LatencyLevel};
pub use formatter::{FormattingOptions, OutputFormatter, PlainFormatter};
pub use plot::render_latency_chart;
pub use reducer::render_reducer_chart;

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create a formatter based on color support and preferences
    pub fn create_formatter(enable_color: bool, verbose: bool) -> Box<dyn OutputFormatter + Send + Sync> {
        let options = FormattingOptions {
            enable_color,
            verbose_mode: verbose,
        };

        if enable_color {
            Box::new(ColoredFormatter::new(options))
        } else {
            Box::new(PlainFormatter::new(options))
        }
    }

    pub fn from_config(config: &crate::models::Config) -> Box<dyn OutputFormatter + Send + Sync> {
        Self::create_formatter(config.enable_color, config.verbose || config.debug)
    }

    /// Plain text formatter for scripts and logs
    pub fn create_plain_formatter() -> Box<dyn OutputFormatter + Send + Sync> {
        Self::create_formatter(false, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_plain_output() {
        let formatter = OutputFormatterFactory::create_plain_formatter();
        assert_eq!(formatter.format_error("x").unwrap(), "[ERROR] x");
    }

    #[test]
    fn test_factory_from_config() {
        let config = crate::models::Config {
            enable_color: false,
            ..Default::default()
        };
        let formatter = OutputFormatterFactory::from_config(&config);
        assert_eq!(formatter.format_header("ab").unwrap(), "======\n  ab  \n======");
    }
}
