//! Equation-of-state trait and validation helpers.

use crate::composition::Composition;
use crate::error::{EosError, EosResult};
use crate::species::Species;
use crate::state::EosState;

/// Trait for equations of state.
///
/// Implementations must be thread-safe (Send + Sync). Callers hand in a
/// density and temperature that are already positive; `evaluate` validates
/// its own output before returning it.
pub trait EquationOfState: Send + Sync {
    /// Model name (for logging and error messages).
    fn name(&self) -> &str;

    /// Species this model can evaluate.
    fn network(&self) -> &[Species];

    /// Check that every species present in `comp` is part of the network.
    fn supports_composition(&self, comp: &Composition) -> bool {
        comp.iter().all(|(s, _)| self.network().contains(&s))
    }

    /// Fail with `UnsupportedSpecies` for the first species outside the network.
    fn require_species(&self, species: Species) -> EosResult<()> {
        if self.network().contains(&species) {
            Ok(())
        } else {
            Err(EosError::UnsupportedSpecies {
                species,
                model: self.name().to_string(),
            })
        }
    }

    /// Evaluate the full state and its partial derivatives.
    fn evaluate(&self, rho: f64, t: f64, comp: &Composition) -> EosResult<EosState>;
}

/// Validation helpers shared by EOS implementations.
pub(crate) mod validation {
    use super::*;
    use hs_core::numeric::ensure_finite;

    pub fn validate_density(rho: f64) -> EosResult<()> {
        if !rho.is_finite() || rho <= 0.0 {
            return Err(EosError::NonPhysical {
                what: "density must be positive and finite",
            });
        }
        Ok(())
    }

    pub fn validate_temperature(t: f64) -> EosResult<()> {
        if !t.is_finite() || t <= 0.0 {
            return Err(EosError::NonPhysical {
                what: "temperature must be positive and finite",
            });
        }
        Ok(())
    }

    /// Ensure every output is finite and pressure/sound speed are positive.
    pub fn validate_state(state: &EosState) -> EosResult<()> {
        let fields = [
            (state.p, "pressure"),
            (state.s, "entropy"),
            (state.cs, "sound speed"),
            (state.dpdr, "dP/drho"),
            (state.dpdt, "dP/dT"),
            (state.dsdr, "ds/drho"),
            (state.dsdt, "ds/dT"),
        ];
        for (value, what) in fields {
            ensure_finite(value, what).map_err(|_| EosError::NonPhysical { what })?;
        }
        if state.p <= 0.0 {
            return Err(EosError::NonPhysical {
                what: "pressure must be positive",
            });
        }
        if state.cs <= 0.0 {
            return Err(EosError::NonPhysical {
                what: "sound speed must be positive",
            });
        }
        Ok(())
    }
}
