//! hs-output: profile tables, run manifests and their on-disk layout.

pub mod hash;
pub mod store;
pub mod types;
pub mod writer;

pub use hash::compute_run_id;
pub use store::RunStore;
pub use types::*;
pub use writer::{ProfileTable, present_species, write_extras, write_profile};

pub type OutputResult<T> = Result<T, OutputError>;

#[derive(thiserror::Error, Debug)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Run not found: {name}")]
    RunNotFound { name: String },

    #[error("Malformed profile table at line {line}: {what}")]
    Malformed { line: usize, what: String },
}
