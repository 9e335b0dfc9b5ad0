//! Summary files and artifact naming
//!
//! Names are deterministic so that reruns overwrite earlier results:
//! `{prefix}dockerswarm{n}.txt`, `{prefix}kubernetes{n}.txt` and
//! `{prefix}_{swarm|k8s}_{n}_plot.png`, where `n` is the number of requests
//! the run issued.

use crate::{
    error::{AppError, Result},
    models::RunResult,
    types::{RunKind, Target},
};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// Separator written after each original/reversed pair
pub const PAIR_SEPARATOR: &str = "--------------------";

pub fn summary_filename(prefix: &str, target: Target, n: usize) -> String {
    format!("{}{}{}.txt", prefix, target.artifact_label(), n)
}

pub fn plot_filename(prefix: &str, target: Target, n: usize) -> String {
    format!("{}_{}_{}_plot.png", prefix, target.label(), n)
}

/// Where the artifacts of one run land
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactPaths {
    pub summary: PathBuf,
    pub plot: PathBuf,
}

impl ArtifactPaths {
    pub fn new(output_dir: &Path, prefix: &str, target: Target, n: usize) -> Self {
        Self {
            summary: output_dir.join(summary_filename(prefix, target, n)),
            plot: output_dir.join(plot_filename(prefix, target, n)),
        }
    }

    pub fn for_run(output_dir: &Path, prefix: &str, result: &RunResult) -> Self {
        Self::new(output_dir, prefix, result.target, result.issued)
    }
}

/// Render the summary file body for a run.
///
/// Canned runs list every successful pair before the average; bulk runs
/// contain only the average line.
pub fn render_summary_text(result: &RunResult) -> String {
    let mut text = String::new();

    if result.kind == RunKind::Canned {
        for pair in &result.pairs {
            let _ = writeln!(text, "Original: {}", pair.original);
            let _ = writeln!(text, "Reversed: {}", pair.reversed);
            let _ = writeln!(text, "{}", PAIR_SEPARATOR);
        }
    }

    let _ = writeln!(text, "average_response_time={:.6}", result.average_latency());
    text
}

/// Write the summary file, creating the output directory if needed
pub fn write_summary(path: &Path, result: &RunResult) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::io(format!("Failed to create output directory {}: {}", parent.display(), e))
            })?;
        }
    }

    fs::write(path, render_summary_text(result))
        .map_err(|e| AppError::io(format!("Failed to write summary {}: {}", path.display(), e)))
}
