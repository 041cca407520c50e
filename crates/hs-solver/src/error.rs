//! Error types for zone solving.

use hs_core::HsError;
use hs_eos::EosError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Configuration error: {what}")]
    Configuration { what: String },

    /// The discretized HSE + closure system could not be solved in budget.
    #[error(
        "Zone {zone} did not converge after {iterations} iterations \
         (rho={density:.6e}, T={temperature:.6e}, residual={residual:.3e})"
    )]
    ZoneNonConvergence {
        zone: usize,
        density: f64,
        temperature: f64,
        residual: f64,
        iterations: usize,
    },

    #[error("Singular Jacobian in zone {zone}")]
    SingularJacobian { zone: usize },

    /// The Urca-pair equilibrium split did not converge in its own budget.
    #[error("Equilibrium composition did not converge after {iterations} iterations (residual={residual:.3e})")]
    EquilibriumNonConvergence { iterations: usize, residual: f64 },

    #[error("EOS error: {0}")]
    Eos(#[from] EosError),

    #[error("{0}")]
    Core(#[from] HsError),
}

pub type SolverResult<T> = Result<T, SolverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_convergence_reports_zone_state() {
        let err = SolverError::ZoneNonConvergence {
            zone: 17,
            density: 1.5e6,
            temperature: 2e8,
            residual: 3e-4,
            iterations: 250,
        };
        let msg = err.to_string();
        assert!(msg.contains("Zone 17"));
        assert!(msg.contains("1.500000e6"));
    }
}
