//! Configuration parsing from CLI arguments

use crate::{
    cli::Cli,
    models::Config,
    error::Result,
};

/// Builds a [`Config`] from defaults and CLI arguments
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<Config> {
        let mut config = Config::default();

        self.apply_cli_overrides(&mut config);

        config.validate()?;

        Ok(config)
    }

    /// Every flag has a default equal to the config default, so CLI values
    /// are copied unconditionally
    fn apply_cli_overrides(&self, config: &mut Config) {
        config.target = self.cli.target;
        config.swarm_url = self.cli.swarm_url.trim().to_string();
        config.k8s_url = self.cli.k8s_url();
        config.request_count = self.cli.count;
        config.rate = self.cli.rate;
        config.concurrency = self.cli.concurrency;
        config.timeout_seconds = self.cli.timeout;
        config.output_dir = self.cli.output_dir.clone();
        config.artifact_prefix = self.cli.prefix.clone();
        config.enable_color = self.cli.use_colors();
        config.verbose = self.cli.verbose;
        config.debug = self.cli.debug;

        if config.debug {
            println!("Applied CLI overrides to configuration");
            println!(
                "Final config: target={}, count={}, rate={}, concurrency={}, timeout={}s",
                config.target, config.request_count, config.rate, config.concurrency, config.timeout_seconds
            );
        }
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    ConfigParser::new(cli).parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let mut summary = Vec::new();

    summary.push(format!("Target: {}", config.target));
    summary.push(format!("Swarm URL: {}", config.swarm_url));
    summary.push(format!(
        "K8s URL: {}",
        config.k8s_url.as_deref().unwrap_or("(not configured)")
    ));
    summary.push(format!("Requests: {}", config.request_count));
    summary.push(format!("Rate: {} req/s", config.rate));
    summary.push(format!("Concurrency: {}", config.concurrency));
    summary.push(format!("Timeout: {}s", config.timeout_seconds));
    summary.push(format!("Output Directory: {}", config.output_dir.display()));
    summary.push(format!("Artifact Prefix: {}", config.artifact_prefix));
    summary.push(format!("Color Output: {}", config.enable_color));
    summary.push(format!("Verbose: {}", config.verbose));
    summary.push(format!("Debug: {}", config.debug));

    summary.join("\n")
}
