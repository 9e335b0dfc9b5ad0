//! Reverse-string echo service
//!
//! `POST /reverse` with `{"text": "..."}` answers `{"reversed": "..."}`;
//! `GET /health` answers `OK`. This is the workload deployed to Docker
//! Swarm and Kubernetes.

use clap::Parser;
use reverse_load_tester::{
    defaults, error::ErrorContext, log_debug, log_error, log_info, logging::Logger, server,
};
use tokio::net::TcpListener;

#[derive(Parser, Debug)]
#[command(name = "reverse-echo", version, about = "Reverse-string echo service")]
struct Args {
    /// Address to bind
    #[arg(long, default_value = defaults::DEFAULT_ECHO_HOST)]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = defaults::DEFAULT_ECHO_PORT)]
    port: u16,

    /// Enable verbose output
    #[arg(long)]
    verbose: bool,

    /// Enable debug output
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let logger = Logger::with_flags("ECHO".to_string(), args.verbose, args.debug, true);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Binding the echo service to {}", addr))?;

    let local = listener.local_addr()?;
    println!("[INFO] Reverse echo service listening on http://{}", local);
    log_debug!(logger, "Routes mounted: POST /reverse, GET /health");

    let served = server::serve(listener, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await;

    if let Err(e) = served {
        log_error!(logger, "Echo service on {} failed: {}", local, e);
        return Err(e.into());
    }

    log_info!(logger, "Echo service on {} stopped", local);
    Ok(())
}
