pub mod dump;
pub mod generate;
mod load;

#[cfg(test)]
mod dump_tests;

use std::path::PathBuf;

/// Failures a command reports before exiting.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed unit: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Model(#[from] icegen_core::ModelError),

    #[error(transparent)]
    Generate(#[from] icegen_compiler::Error),
}
