//! Draws the reducer-count vs execution-time chart for the four MapReduce
//! jobs.

use clap::Parser;
use reverse_load_tester::error::ErrorContext;
use reverse_load_tester::output::reducer::{render_reducer_chart, DEFAULT_OUTPUT};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "reducer-chart", version, about = "Plot reducer count against execution time")]
struct Args {
    /// Output image path (format follows the extension)
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    render_reducer_chart(&args.output).context("Rendering the reducer chart")?;
    println!("[INFO] Saved plot: {}", args.output.display());
    Ok(())
}
