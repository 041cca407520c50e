//! Error types for the hs-app service layer.

use std::path::PathBuf;

/// Application error wrapping the backend crates' errors as text, so the
/// CLI has one type to report.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Failed to read run file: {path}")]
    RunFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Compilation failed: {0}")]
    Compile(String),

    #[error("EOS error: {0}")]
    Eos(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Measured {region} mass is zero; profile written to {}", .dump.display())]
    DegenerateMass { region: String, dump: PathBuf },

    #[error("Output error: {0}")]
    Output(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<hs_config::ConfigError> for AppError {
    fn from(err: hs_config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<hs_eos::EosError> for AppError {
    fn from(err: hs_eos::EosError) -> Self {
        AppError::Eos(err.to_string())
    }
}

impl From<hs_model::ModelError> for AppError {
    fn from(err: hs_model::ModelError) -> Self {
        AppError::Model(err.to_string())
    }
}

impl From<hs_output::OutputError> for AppError {
    fn from(err: hs_output::OutputError) -> Self {
        AppError::Output(err.to_string())
    }
}
