//! Equation-of-state and composition errors.

use crate::species::Species;
use thiserror::Error;

/// Result type for EOS operations.
pub type EosResult<T> = Result<T, EosError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EosError {
    /// Non-physical values (negative density, pressure, etc.).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    #[error("Value out of range for {what}")]
    OutOfRange { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// A composition names a species the model does not carry.
    #[error("Species {species} is not part of the {model} network")]
    UnsupportedSpecies { species: Species, model: String },

    #[error("Invalid composition: {what}")]
    InvalidComposition { what: String },
}
