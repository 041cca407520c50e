//! Error types for model building.

use crate::profile::Profile;
use hs_core::HsError;
use hs_eos::EosError;
use hs_solver::SolverError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Configuration error: {what}")]
    Configuration { what: String },

    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),

    #[error("EOS error: {0}")]
    Eos(#[from] EosError),

    #[error("{0}")]
    Core(#[from] HsError),

    #[error(
        "Mass matching did not converge after {iterations} iterations \
         (masses={masses:?}, targets={targets:?})"
    )]
    MassNonConvergence {
        iterations: usize,
        masses: Vec<f64>,
        targets: Vec<f64>,
    },

    /// A measured region came out empty. Carries the pass that produced it.
    #[error("Measured {region} mass is zero")]
    DegenerateMass {
        region: String,
        profile: Box<Profile>,
    },
}

pub type ModelResult<T> = Result<T, ModelError>;
