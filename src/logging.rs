//! Structured logging for the load driver and echo service
//!
//! Log entries go to stderr at `WARN` and above and to stdout otherwise, so
//! the run summaries printed by the formatter stay readable. Three formats
//! are available: a colored console line, one JSON object per line (used in
//! debug mode), and a compact single-line form.

use crate::error::{AppError, Result};
use crate::models::{Config, RequestRecord, RequestOutcome, RunResult};
use crate::types::Target;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    /// ANSI color code for console output
    pub fn color_code(&self) -> &'static str {
        match self {
            LogLevel::Trace => "\x1b[37m",
            LogLevel::Debug => "\x1b[36m",
            LogLevel::Info => "\x1b[32m",
            LogLevel::Warn => "\x1b[33m",
            LogLevel::Error => "\x1b[31m",
        }
    }

    pub fn reset_code() -> &'static str {
        "\x1b[0m"
    }

    /// Level implied by the verbosity flags: debug wins over verbose, and
    /// the quiet default only shows warnings and errors
    pub fn from_flags(verbose: bool, debug: bool) -> Self {
        if debug {
            LogLevel::Debug
        } else if verbose {
            LogLevel::Info
        } else {
            LogLevel::Warn
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "TRACE" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            _ => Err(AppError::parse(format!("Invalid log level: {}", s))),
        }
    }
}

/// One structured log event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    /// Component that emitted the entry
    pub logger: String,
    /// Ties together events belonging to one run
    pub correlation_id: Option<String>,
    pub fields: HashMap<String, serde_json::Value>,
    pub location: Option<LogLocation>,
}

/// Source code location of a log call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogLocation {
    pub file: String,
    pub line: u32,
    pub module: Option<String>,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogFormat {
    /// Human-readable console format
    Console,
    /// One JSON object per line
    Json,
}

#[derive(Debug, Default)]
struct LogContext {
    session_id: Option<String>,
    context_fields: HashMap<String, serde_json::Value>,
}

/// Leveled logger with a shared context attached to every entry
pub struct Logger {
    min_level: LogLevel,
    use_color: bool,
    include_location: bool,
    format: LogFormat,
    name: String,
    context: Arc<RwLock<LogContext>>,
}

impl Logger {
    /// Logger configured from the driver's flags
    pub fn with_config(name: String, config: &Config) -> Self {
        Self::with_flags(name, config.verbose, config.debug, config.enable_color)
    }

    /// Logger configured from raw verbosity flags, for binaries without a
    /// driver [`Config`]
    pub fn with_flags(name: String, verbose: bool, debug: bool, use_color: bool) -> Self {
        Self {
            min_level: LogLevel::from_flags(verbose, debug),
            use_color,
            include_location: debug,
            format: if debug { LogFormat::Json } else { LogFormat::Console },
            name,
            context: Arc::new(RwLock::new(LogContext::default())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn set_session_id(&self, session_id: String) {
        let mut context = self.context.write().await;
        context.session_id = Some(session_id);
    }

    /// Add a field to every subsequent entry
    pub async fn add_context_field<T: Serialize>(&self, key: String, value: T) {
        if let Ok(json_value) = serde_json::to_value(value) {
            let mut context = self.context.write().await;
            context.context_fields.insert(key, json_value);
        }
    }

    pub fn log(&self, level: LogLevel, message: &str) -> LogEntryBuilder<'_> {
        LogEntryBuilder::new(self, level, message.to_string())
    }

    pub fn trace(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Trace, message)
    }

    pub fn debug(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Debug, message)
    }

    pub fn info(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Info, message)
    }

    pub fn warn(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Warn, message)
    }

    pub fn error(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Error, message)
    }

    pub fn would_log(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    async fn write_entry(&self, mut entry: LogEntry) {
        if !self.would_log(entry.level) {
            return;
        }

        let context = self.context.read().await;
        if let Some(session_id) = &context.session_id {
            entry.fields.insert("session_id".to_string(), serde_json::Value::String(session_id.clone()));
        }
        for (key, value) in &context.context_fields {
            entry.fields.entry(key.clone()).or_insert_with(|| value.clone());
        }
        drop(context);

        let output = self.render(&entry);

        if entry.level >= LogLevel::Warn {
            let _ = writeln!(io::stderr(), "{}", output);
        } else {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }

    fn render(&self, entry: &LogEntry) -> String {
        match self.format {
            LogFormat::Console => self.format_console(entry),
            LogFormat::Json => self.format_json(entry),
        }
    }

    fn format_console(&self, entry: &LogEntry) -> String {
        let timestamp = entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f");
        let level_str = entry.level.as_str();

        let formatted_level = if self.use_color {
            format!("{}{:>5}{}", entry.level.color_code(), level_str, LogLevel::reset_code())
        } else {
            format!("{:>5}", level_str)
        };

        let mut output = format!("{} {} [{}] {}", timestamp, formatted_level, entry.logger, entry.message);

        if let Some(correlation_id) = &entry.correlation_id {
            let short: String = correlation_id.chars().take(8).collect();
            output.push_str(&format!(" [{}]", short));
        }

        if !entry.fields.is_empty() {
            // Sorted so console lines are stable between runs
            let mut fields: Vec<String> = entry.fields.iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            fields.sort();
            output.push_str(&format!(" {{{}}}", fields.join(", ")));
        }

        if self.include_location {
            if let Some(location) = &entry.location {
                output.push_str(&format!(" @ {}:{}", location.file, location.line));
            }
        }

        output
    }

    fn format_json(&self, entry: &LogEntry) -> String {
        serde_json::to_string(entry).unwrap_or_else(|_| {
            serde_json::json!({
                "error": "Failed to serialize log entry",
                "message": entry.message,
            })
            .to_string()
        })
    }
}

/// Builder for a single log entry
pub struct LogEntryBuilder<'a> {
    logger: &'a Logger,
    entry: LogEntry,
}

impl<'a> LogEntryBuilder<'a> {
    fn new(logger: &'a Logger, level: LogLevel, message: String) -> Self {
        Self {
            logger,
            entry: LogEntry {
                timestamp: Utc::now(),
                level,
                message,
                logger: logger.name.clone(),
                correlation_id: None,
                fields: HashMap::new(),
                location: None,
            },
        }
    }

    pub fn correlation_id(mut self, id: &str) -> Self {
        self.entry.correlation_id = Some(id.to_string());
        self
    }

    pub fn field<T: Serialize>(mut self, key: &str, value: T) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.entry.fields.insert(key.to_string(), json_value);
        }
        self
    }

    pub fn location(mut self, file: &str, line: u32, module: Option<&str>) -> Self {
        self.entry.location = Some(LogLocation {
            file: file.to_string(),
            line,
            module: module.map(String::from),
        });
        self
    }

    /// Attach the fields of one request record
    pub fn request(self, record: &RequestRecord) -> Self {
        let builder = self
            .field("index", record.index)
            .field("payload", &record.payload)
            .field("status", record.status());
        match &record.outcome {
            RequestOutcome::Success { latency, .. } => builder.field("latency_s", latency.as_secs_f64()),
            RequestOutcome::Failed { error } => builder.field("error", error),
        }
    }

    /// Attach the aggregate fields of a run
    pub fn run_result(self, result: &RunResult) -> Self {
        self.field("target", result.target.label())
            .field("kind", result.kind.as_str())
            .field("issued", result.issued)
            .field("success", result.success_count())
            .field("failures", result.failure_count)
            .field("avg_latency_s", result.average_latency())
            .field("elapsed_s", result.elapsed.as_secs_f64())
    }

    pub fn error_info(self, error: &AppError) -> Self {
        self.field("error_category", error.category())
            .field("error_exit_code", error.exit_code())
    }

    pub async fn log(self) {
        self.logger.write_entry(self.entry).await;
    }
}

/// Logger for run lifecycle events of the load driver
pub struct DriverLogger {
    logger: Logger,
}

impl DriverLogger {
    pub fn new(config: &Config) -> Self {
        Self {
            logger: Logger::with_config("DRIVER".to_string(), config),
        }
    }

    /// Log the start of a run and return its correlation ID
    pub async fn log_run_start(&self, target: Target, kind: &str, endpoint: &str, planned: usize) -> String {
        let correlation_id = Uuid::new_v4().to_string();
        self.logger.info(&format!("Starting {} run against {} ({} requests)", kind, target, planned))
            .correlation_id(&correlation_id)
            .field("target", target.label())
            .field("kind", kind)
            .field("endpoint", endpoint)
            .field("planned", planned)
            .log()
            .await;
        correlation_id
    }

    /// Failed requests are expected under load, so they go out at debug
    pub async fn log_request_failure(&self, record: &RequestRecord, correlation_id: &str) {
        self.logger.debug("Request failed")
            .correlation_id(correlation_id)
            .request(record)
            .log()
            .await;
    }

    pub async fn log_run_summary(&self, result: &RunResult, correlation_id: &str) {
        let level = if result.issued > 0 && result.success_count() == 0 {
            LogLevel::Warn
        } else {
            LogLevel::Info
        };

        self.logger.log(
            level,
            &format!(
                "Completed {} run against {}: {}/{} succeeded in {:.3}s",
                result.kind.as_str(),
                result.target,
                result.success_count(),
                result.issued,
                result.elapsed.as_secs_f64()
            ),
        )
        .correlation_id(correlation_id)
        .run_result(result)
        .log()
        .await;
    }

    pub async fn log_artifact(&self, kind: &str, path: &std::path::Path) {
        self.logger.info(&format!("Wrote {} to {}", kind, path.display()))
            .field("artifact", kind)
            .field("path", path.display().to_string())
            .log()
            .await;
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }
}

/// Error event logger with category and exit-code context
pub struct ErrorEventLogger {
    logger: Logger,
}

impl ErrorEventLogger {
    pub fn new(config: &Config) -> Self {
        Self {
            logger: Logger::with_config("ERR".to_string(), config),
        }
    }

    pub async fn log_error(&self, error: &AppError, context: Option<&str>, correlation_id: Option<&str>) {
        let message = match context {
            Some(ctx) => format!("{}: {}", ctx, error),
            None => error.to_string(),
        };

        let mut builder = self.logger.error(&message).error_info(error);

        if let Some(id) = correlation_id {
            builder = builder.correlation_id(id);
        }
        if let Some(ctx) = context {
            builder = builder.field("context", ctx);
        }

        builder.log().await;
    }

    /// Log an error that does not stop the run
    pub async fn log_degraded(&self, error: &AppError, context: &str) {
        self.logger.warn(&format!("{}: {}", context, error))
            .error_info(error)
            .field("context", context)
            .log()
            .await;
    }
}

/// Creates loggers sharing one session ID
pub struct LoggerFactory {
    config: Config,
    session_id: String,
}

impl LoggerFactory {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            session_id: Uuid::new_v4().to_string(),
        }
    }

    pub async fn create_logger(&self, name: &str) -> Logger {
        let logger = Logger::with_config(name.to_string(), &self.config);
        logger.set_session_id(self.session_id.clone()).await;
        logger
    }

    pub async fn create_driver_logger(&self) -> DriverLogger {
        let driver = DriverLogger::new(&self.config);
        driver.logger.set_session_id(self.session_id.clone()).await;
        driver
    }

    pub async fn create_error_logger(&self) -> ErrorEventLogger {
        let errors = ErrorEventLogger::new(&self.config);
        errors.logger.set_session_id(self.session_id.clone()).await;
        errors
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

/// Convenience macros for logging with location information
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)*) => {
        $logger.debug(&format!($($arg)*))
            .location(file!(), line!(), Some(module_path!()))
            .log()
            .await
    };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)*) => {
        $logger.info(&format!($($arg)*))
            .location(file!(), line!(), Some(module_path!()))
            .log()
            .await
    };
}

#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)*) => {
        $logger.warn(&format!($($arg)*))
            .location(file!(), line!(), Some(module_path!()))
            .log()
            .await
    };
}

#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)*) => {
        $logger.error(&format!($($arg)*))
            .location(file!(), line!(), Some(module_path!()))
            .log()
            .await
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RunKind;
    use std::str::FromStr;
    use std::time::Duration;

    fn entry(level: LogLevel) -> LogEntry {
        LogEntry {
            timestamp: Utc::now(),
            level,
            message: "Test message".to_string(),
            logger: "TEST".to_string(),
            correlation_id: Some("0123456789abcdef".to_string()),
            fields: HashMap::from([
                ("b".to_string(), serde_json::json!(2)),
                ("a".to_string(), serde_json::json!("x")),
            ]),
            location: Some(LogLocation {
                file: "app.rs".to_string(),
                line: 7,
                module: None,
            }),
        }
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("DEBUG").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("info").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::from_str("warning").unwrap(), LogLevel::Warn);
        assert!(LogLevel::from_str("fatal").is_err());
    }

    #[test]
    fn test_level_from_flags() {
        assert_eq!(LogLevel::from_flags(false, false), LogLevel::Warn);
        assert_eq!(LogLevel::from_flags(true, false), LogLevel::Info);
        assert_eq!(LogLevel::from_flags(false, true), LogLevel::Debug);
        assert_eq!(LogLevel::from_flags(true, true), LogLevel::Debug);
    }

    #[test]
    fn test_logger_with_config() {
        let config = Config {
            debug: true,
            enable_color: false,
            ..Default::default()
        };

        let logger = Logger::with_config("TEST".to_string(), &config);
        assert_eq!(logger.min_level, LogLevel::Debug);
        assert_eq!(logger.format, LogFormat::Json);
        assert!(!logger.use_color);
        assert!(logger.include_location);

        let quiet = Logger::with_config("TEST".to_string(), &Config::default());
        assert!(!quiet.would_log(LogLevel::Info));
        assert!(quiet.would_log(LogLevel::Warn));
    }

    #[test]
    fn test_console_format() {
        let mut logger = Logger::with_flags("TEST".to_string(), false, false, false);
        logger.include_location = true;

        let line = logger.format_console(&entry(LogLevel::Info));
        assert!(line.contains(" INFO [TEST] Test message"));
        assert!(line.contains("[01234567]"));
        assert!(line.contains("{a=\"x\", b=2}"));
        assert!(line.ends_with("@ app.rs:7"));
        assert!(!line.contains("\x1b["));
    }

    #[test]
    fn test_json_format() {
        let logger = Logger::with_flags("TEST".to_string(), true, false, false);

        let json: serde_json::Value = serde_json::from_str(&logger.format_json(&entry(LogLevel::Warn))).unwrap();
        assert_eq!(json["level"], "Warn");
        assert_eq!(json["fields"]["b"], 2);
        assert_eq!(json["correlation_id"], "0123456789abcdef");
    }

    #[test]
    fn test_request_and_run_fields() {
        let logger = Logger::with_flags("TEST".to_string(), true, false, false);

        let record = RequestRecord::failed(4, "ab".to_string(), Utc::now(), "refused".to_string());
        let built = logger.info("x").request(&record);
        assert_eq!(built.entry.fields["index"], 4);
        assert_eq!(built.entry.fields["error"], "refused");

        let mut result = RunResult::new(Target::K8s, RunKind::Bulk);
        result.record(RequestRecord::success(0, "ab".to_string(), Utc::now(), Duration::from_millis(10), "ba".to_string()));
        result.finish(Duration::from_secs(1));
        let built = logger.info("x").run_result(&result);
        assert_eq!(built.entry.fields["target"], "k8s");
        assert_eq!(built.entry.fields["issued"], 1);
        assert_eq!(built.entry.fields["failures"], 0);
    }

    #[tokio::test]
    async fn test_context_fields_and_session() {
        let factory = LoggerFactory::new(Config::default());
        let logger = factory.create_logger("TEST").await;
        logger.add_context_field("target".to_string(), "swarm").await;

        let context = logger.context.read().await;
        assert_eq!(context.session_id.as_deref(), Some(factory.session_id()));
        assert!(context.context_fields.contains_key("target"));
    }

    #[tokio::test]
    async fn test_driver_logger_lifecycle() {
        let config = Config {
            verbose: true,
            enable_color: false,
            ..Default::default()
        };
        let driver = DriverLogger::new(&config);
        assert_eq!(driver.logger().name(), "DRIVER");

        let id = driver.log_run_start(Target::Swarm, "bulk", "http://localhost/reverse", 10).await;
        assert_eq!(id.len(), 36);

        let record = RequestRecord::failed(0, "ab".to_string(), Utc::now(), "timeout".to_string());
        driver.log_request_failure(&record, &id).await;

        let mut result = RunResult::new(Target::Swarm, RunKind::Bulk);
        result.record(record);
        result.finish(Duration::from_millis(5));
        driver.log_run_summary(&result, &id).await;
    }

    #[tokio::test]
    async fn test_error_logging() {
        let errors = ErrorEventLogger::new(&Config::default());
        let error = AppError::plot("no latencies");
        errors.log_error(&error, Some("Rendering chart"), Some("run-1")).await;
        errors.log_degraded(&error, "Skipping chart").await;
    }

    #[tokio::test]
    async fn test_macros_compile_against_logger() {
        let logger = Logger::with_flags("TEST".to_string(), false, false, false);
        crate::log_debug!(logger, "hidden {}", 1);
        crate::log_info!(logger, "hidden {}", 2);
        crate::log_warn!(logger, "shown {}", 3);
        crate::log_error!(logger, "shown {}", 4);
    }
}
