use std::path::PathBuf;

use thiserror::Error;

/// Per-sample computation failures. Deterministic in their inputs, so a
/// retry without changed input gives the same error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HeliostatError {
    #[error("degenerate vector: {context} has zero length")]
    DegenerateVector { context: &'static str },

    #[error("no mirror orientation: reversed incident ray and target are antiparallel")]
    NoSolution,

    #[error("optimizer did not converge after {iterations} iterations (residual: {residual:.2e})")]
    NonConvergence { iterations: usize, residual: f64 },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid configuration:\n{0}")]
    Invalid(String),
}
