//! Main application orchestration and execution
//!
//! For each selected target the app opens one client session, runs the
//! canned pass and then the bulk pass, and after each pass writes the
//! summary file, draws the chart and prints the console summary.

use crate::{
    client::ReverseClient,
    config::{display_config_summary, validate_config},
    error::{AppError, ErrorContext, ErrorReporter, Result},
    executor::{ExecutionConfig, LoadDriver},
    logging::{DriverLogger, ErrorEventLogger, Logger, LoggerFactory},
    models::{Config, RunResult},
    output::{render_latency_chart, write_summary, ArtifactPaths, OutputFormatter, OutputFormatterFactory},
    types::{RunKind, Target},
};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Everything one invocation produced
#[derive(Debug, Default)]
pub struct AppReport {
    /// Completed runs in execution order
    pub runs: Vec<RunResult>,
    /// Targets skipped because no URL was configured
    pub skipped: Vec<Target>,
    /// Total wall-clock time
    pub elapsed: Duration,
}

impl AppReport {
    pub fn runs_for(&self, target: Target) -> impl Iterator<Item = &RunResult> {
        self.runs.iter().filter(move |run| run.target == target)
    }
}

/// Main application struct that coordinates all components
pub struct App {
    config: Config,
    formatter: Box<dyn OutputFormatter + Send + Sync>,
    reporter: ErrorReporter,
    log: Logger,
    driver_log: Arc<DriverLogger>,
    error_log: ErrorEventLogger,
}

impl App {
    pub async fn new(config: Config) -> Self {
        let factory = LoggerFactory::new(config.clone());
        let driver_log = Arc::new(factory.create_driver_logger().await);
        let error_log = factory.create_error_logger().await;
        let log = factory.create_logger("APP").await;
        log.add_context_field("selection".to_string(), config.target.to_string()).await;

        Self {
            formatter: OutputFormatterFactory::from_config(&config),
            reporter: ErrorReporter::new(config.enable_color, config.verbose || config.debug),
            log,
            driver_log,
            error_log,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run every selected target.
    ///
    /// Request failures are counted, a missing k8s URL skips that target,
    /// and failing to write a summary file aborts the run.
    pub async fn run(&self) -> Result<AppReport> {
        let started = Instant::now();
        let mut report = AppReport::default();

        self.announce()?;

        for target in self.config.target.targets() {
            match self.config.url_for(target) {
                Some(url) => {
                    let runs = self.run_target(target, url).await?;
                    report.runs.extend(runs);
                }
                None => {
                    let error = AppError::config("--k8s-url required for target=k8s or both");
                    self.reporter.report_error(&error);
                    self.error_log.log_error(&error, Some("Skipping target"), None).await;
                    crate::log_warn!(self.log, "Skipping {} runs: no URL configured", target);
                    report.skipped.push(target);
                }
            }
        }

        report.elapsed = started.elapsed();
        crate::log_info!(
            self.log,
            "Finished {} runs ({} targets skipped) in {:.3}s",
            report.runs.len(),
            report.skipped.len(),
            report.elapsed.as_secs_f64()
        );
        println!();
        println!("{}", self.formatter.format_total_time(report.elapsed)?);
        Ok(report)
    }

    fn announce(&self) -> Result<()> {
        println!(
            "{}",
            self.formatter.format_info(&format!(
                "Starting client. target={}, count={}, rate={}/s, concurrency={}",
                self.config.target, self.config.request_count, self.config.rate, self.config.concurrency
            ))?
        );

        for warning in validate_config(&self.config)? {
            if self.config.verbose || self.config.debug {
                println!("{}", warning.format(self.config.enable_color));
            }
        }

        if self.config.debug {
            println!("{}", display_config_summary(&self.config));
        }
        Ok(())
    }

    /// Both passes against one target over a single client session; the
    /// session closes when the driver is dropped, on success or error
    async fn run_target(&self, target: Target, url: &str) -> Result<Vec<RunResult>> {
        crate::log_debug!(self.log, "Opening client session for {} at {}", target, url);
        let client = ReverseClient::for_target(target, url, self.config.timeout(), self.config.concurrency)
            .with_context(|| format!("Setting up the {} client", target))?;
        let driver = LoadDriver::with_default_corpus(client, target, ExecutionConfig::from(&self.config))
            .with_logger(self.driver_log.clone());

        let mut runs = Vec::with_capacity(2);
        runs.push(self.execute_pass(&driver, RunKind::Canned).await?);
        runs.push(self.execute_pass(&driver, RunKind::Bulk).await?);
        Ok(runs)
    }

    async fn execute_pass(&self, driver: &LoadDriver<ReverseClient>, kind: RunKind) -> Result<RunResult> {
        let target = driver.target();
        let planned = match kind {
            RunKind::Canned => driver.corpus().len(),
            RunKind::Bulk => driver.config().request_count,
        };

        println!();
        let heading = match kind {
            RunKind::Canned => format!("Running {}-string test for {}", planned, target),
            RunKind::Bulk => format!(
                "Running {}-request test for {} (rate={}/s, conc={})",
                planned, target, driver.config().rate, driver.config().concurrency
            ),
        };
        println!("{}", self.formatter.format_info(&heading)?);

        let result = match kind {
            RunKind::Canned => driver.run_canned().await,
            RunKind::Bulk => driver.run_bulk().await,
        };

        let paths = ArtifactPaths::new(&self.config.output_dir, &self.config.artifact_prefix, target, planned);
        write_summary(&paths.summary, &result)?;
        self.driver_log.log_artifact("summary", &paths.summary).await;

        self.save_plot(&paths, &result, planned).await?;

        println!("{}", self.formatter.format_run_summary(&result)?);
        Ok(result)
    }

    /// Chart failures are reported and otherwise ignored
    async fn save_plot(&self, paths: &ArtifactPaths, result: &RunResult, n: usize) -> Result<()> {
        match render_latency_chart(&paths.plot, &result.latencies, result.target, n) {
            Ok(true) => {
                println!(
                    "{}",
                    self.formatter.format_info(&format!("Saved plot: {}", paths.plot.display()))?
                );
                self.driver_log.log_artifact("plot", &paths.plot).await;
            }
            Ok(false) => {
                println!(
                    "{}",
                    self.formatter.format_warning(&format!(
                        "No successful requests for {}; skipping plot",
                        result.target
                    ))?
                );
            }
            Err(error) => {
                eprintln!(
                    "{}",
                    self.formatter.format_warning(&format!("Could not save plot: {}", error))?
                );
                self.error_log.log_degraded(&error, "Rendering response-time chart").await;
            }
        }
        Ok(())
    }
}
