//! Shared application service layer for the model builder.
//!
//! Loads a run file, compiles it into engine settings and a model variant,
//! runs the engine and persists the profile tables and manifest. The CLI is
//! a thin shell over these functions.

pub mod compile;
pub mod error;
pub mod probe;
pub mod run_service;

pub use compile::{CompiledRun, compile_run, parse_composition};
pub use error::{AppError, AppResult};
pub use probe::{EosProbe, probe_eos};
pub use run_service::{
    RunOptions, RunRequest, RunResponse, ensure_run, list_runs, validate_run,
};
