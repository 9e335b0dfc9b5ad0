//! Reverse Load Tester - load driver CLI
//!
//! Drives the reverse-string echo service on Docker Swarm and/or
//! Kubernetes and writes a summary file and a response-time chart per run.

use clap::Parser;
use reverse_load_tester::{
    app::App,
    cli::Cli,
    config::parser::load_config,
    error::{AppError, ErrorReporter, Result},
    output::OutputFormatterFactory,
    PKG_NAME, VERSION,
};
use std::error::Error;
use std::process;

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        process::exit(1);
    }));

    let cli = Cli::parse();
    let reporter = ErrorReporter::new(cli.use_colors(), cli.verbose || cli.debug);

    // The run future owns every client session; leaving the select drops it
    // and with it any in-flight requests and pooled connections.
    let outcome = tokio::select! {
        result = run_application(cli) => Some(result),
        _ = tokio::signal::ctrl_c() => None,
    };

    match outcome {
        Some(Ok(())) => {}
        Some(Err(e)) => {
            reporter.report_error(&e);

            if let Some(source) = e.source() {
                eprintln!("Caused by: {}", source);
            }

            print_error_suggestions(&e);
            process::exit(e.exit_code());
        }
        None => {
            let interrupted = AppError::interrupted("Ctrl-C received during the run");
            println!(
                "\n{}",
                OutputFormatterFactory::create_plain_formatter()
                    .format_info("Interrupted by user. Exiting.")
                    .unwrap_or_else(|_| "[INFO] Interrupted by user. Exiting.".to_string())
            );
            if reporter.verbose {
                reporter.report_error(&interrupted);
            }
            process::exit(interrupted.exit_code());
        }
    }
}

/// Main application logic
async fn run_application(cli: Cli) -> Result<()> {
    if cli.debug {
        println!("{} v{}", PKG_NAME, VERSION);
        println!("Debug mode enabled");
        println!();
    }

    let config = load_config(cli)?;
    let app = App::new(config).await;
    let report = app.run().await?;

    if app.config().verbose {
        let issued: usize = report.runs.iter().map(|run| run.issued).sum();
        let succeeded: usize = report.runs.iter().map(|run| run.success_count()).sum();
        println!("  Runs completed: {}", report.runs.len());
        println!("  Requests issued: {} ({} succeeded)", issued, succeeded);
        if !report.skipped.is_empty() {
            let skipped: Vec<&str> = report.skipped.iter().map(|target| target.label()).collect();
            println!("  Targets skipped: {}", skipped.join(", "));
        }
    }

    Ok(())
}

/// Print helpful suggestions for common errors
fn print_error_suggestions(error: &AppError) {
    match error {
        AppError::Config(_) | AppError::Validation(_) => {
            eprintln!();
            eprintln!("Configuration help:");
            eprintln!("  - URLs must start with http:// or https:// and include /reverse");
            eprintln!("  - --concurrency must be at least 1");
            eprintln!("  - --timeout is given in whole seconds");
            eprintln!("  - Pass --k8s-url when using --target k8s or --target both");
        }
        AppError::Io(_) => {
            eprintln!();
            eprintln!("Output troubleshooting:");
            eprintln!("  - Check that --output-dir is writable");
            eprintln!("  - Check for free disk space");
        }
        AppError::Network(_) | AppError::HttpRequest(_) => {
            eprintln!();
            eprintln!("Network troubleshooting:");
            eprintln!("  - Check that the echo service is running (GET /health)");
            eprintln!("  - Verify the Swarm published port or the k8s NodePort");
        }
        _ => {}
    }
}
