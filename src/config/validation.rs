//! Configuration validation utilities and rules
//!
//! [`Config::validate`] rejects configurations that cannot run at all.
//! The checks here only produce warnings about settings that run but are
//! probably not what the user meant.

use crate::{
    error::Result,
    models::Config,
    types::Target,
};
use colored::Colorize;

/// Configuration validator with advisory rules
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate configuration, returning advisory warnings on success
    pub fn validate_comprehensive(config: &Config) -> Result<Vec<ValidationWarning>> {
        config.validate()?;

        let mut warnings = Vec::new();

        for target in config.target.targets() {
            if let Some(url) = config.url_for(target) {
                warnings.extend(Self::validate_endpoint(target, url));
            }
        }
        warnings.extend(Self::validate_load_settings(config));

        Ok(warnings)
    }

    fn validate_endpoint(target: Target, url: &str) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        let Ok(parsed) = url::Url::parse(url) else {
            return warnings;
        };

        if parsed.path().is_empty() || parsed.path() == "/" {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!("The {} URL '{}' has no path; the echo route is usually /reverse", target, url),
            ));
        }

        let loopback = match parsed.host() {
            Some(url::Host::Domain(host)) => host == "localhost",
            Some(url::Host::Ipv4(ip)) => ip.is_loopback(),
            Some(url::Host::Ipv6(ip)) => ip.is_loopback(),
            None => false,
        };
        if loopback {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("The {} URL '{}' targets the local machine", target, url),
            ));
        }

        if parsed.query().is_some() {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("The {} URL '{}' includes query parameters", target, url),
            ));
        }

        warnings
    }

    fn validate_load_settings(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if config.rate <= 0.0 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!("Rate {} disables pacing; requests are issued as fast as the concurrency limit allows", config.rate),
            ));
        }

        if config.request_count > 0 && config.concurrency >= config.request_count {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!(
                    "Concurrency {} is not below the request count {}; the limit never engages",
                    config.concurrency, config.request_count
                ),
            ));
        }

        if config.request_count == 0 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                "Request count is 0; only the canned run will send requests".to_string(),
            ));
        }

        if config.rate > 0.0 && config.request_count > 0 {
            let minimum_secs = config.request_count as f64 / config.rate;
            if minimum_secs > 600.0 {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Warning,
                    format!("At {} req/s the bulk run takes at least {:.0}s per target", config.rate, minimum_secs),
                ));
            }
        }

        warnings
    }
}

/// Validation warning levels
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationLevel {
    Info,
    Warning,
}

impl ValidationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
        }
    }
}

/// Configuration validation warning
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub level: ValidationLevel,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(level: ValidationLevel, message: String) -> Self {
        Self { level, message }
    }

    /// Format warning for display
    pub fn format(&self, use_color: bool) -> String {
        let tag = format!("[{}]", self.level.as_str());
        let tag = if use_color {
            match self.level {
                ValidationLevel::Info => tag.blue().to_string(),
                ValidationLevel::Warning => tag.yellow().to_string(),
            }
        } else {
            tag
        };
        format!("{} {}", tag, self.message)
    }
}

/// Convenience function for comprehensive configuration validation
pub fn validate_config(config: &Config) -> Result<Vec<ValidationWarning>> {
    ConfigValidator::validate_comprehensive(config)
}
