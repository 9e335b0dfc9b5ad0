//! Type definitions and aliases

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// Deployment environment hosting the echo service under test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Target {
    /// Docker Swarm service
    Swarm,
    /// Kubernetes deployment behind an ingress/NodePort
    K8s,
}

impl Target {
    /// Short label used on the console and in plot file names
    pub fn label(&self) -> &'static str {
        match self {
            Target::Swarm => "swarm",
            Target::K8s => "k8s",
        }
    }

    /// Label used in summary file names
    pub fn artifact_label(&self) -> &'static str {
        match self {
            Target::Swarm => "dockerswarm",
            Target::K8s => "kubernetes",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which targets a single invocation drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TargetSelection {
    #[default]
    Swarm,
    K8s,
    Both,
}

impl TargetSelection {
    /// Targets in execution order
    pub fn targets(&self) -> Vec<Target> {
        match self {
            TargetSelection::Swarm => vec![Target::Swarm],
            TargetSelection::K8s => vec![Target::K8s],
            TargetSelection::Both => vec![Target::Swarm, Target::K8s],
        }
    }

    pub fn includes(&self, target: Target) -> bool {
        self.targets().contains(&target)
    }
}

impl fmt::Display for TargetSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TargetSelection::Swarm => "swarm",
            TargetSelection::K8s => "k8s",
            TargetSelection::Both => "both",
        };
        f.write_str(name)
    }
}

/// The two passes made against every target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunKind {
    /// The fixed corpus, one request at a time
    Canned,
    /// N paced requests cycling through the corpus with bounded concurrency
    Bulk,
}

impl RunKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunKind::Canned => "canned",
            RunKind::Bulk => "bulk",
        }
    }
}

/// Outcome of a single request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
    /// 2xx response with a parseable JSON body
    Success,
    /// Connection error, timeout, non-2xx status or malformed body
    Failed,
}
