//! Closures, regimes and floor policies applied by the zone solver.

use crate::error::{SolverError, SolverResult};

/// Integration direction relative to increasing coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Outward,
    Inward,
}

impl Direction {
    pub fn sign(self) -> f64 {
        match self {
            Direction::Outward => 1.0,
            Direction::Inward => -1.0,
        }
    }
}

/// Regime flag of a finished zone.
///
/// Ordered: along one integration direction the flag never decreases once an
/// isentropic segment has begun.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Regime {
    /// Temperature imposed by the layer profile.
    Prescribed,
    Isentropic,
    Isothermal,
    Fluff,
}

impl Regime {
    pub fn label(&self) -> &'static str {
        match self {
            Regime::Prescribed => "prescribed",
            Regime::Isentropic => "isentropic",
            Regime::Isothermal => "isothermal",
            Regime::Fluff => "fluff",
        }
    }
}

/// Thermodynamic constraint closing the HSE equation for one zone.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Closure {
    Prescribed { temperature: f64 },
    Isentropic { entropy: f64 },
    Isothermal { temperature: f64 },
}

impl Closure {
    pub fn regime(&self) -> Regime {
        match self {
            Closure::Prescribed { .. } => Regime::Prescribed,
            Closure::Isentropic { .. } => Regime::Isentropic,
            Closure::Isothermal { .. } => Regime::Isothermal,
        }
    }

    pub fn is_isentropic(&self) -> bool {
        matches!(self, Closure::Isentropic { .. })
    }
}

/// Acceptance test for the per-zone Newton iteration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConvergenceTest {
    /// Newton steps smaller than tolerance times the current unknowns.
    #[default]
    StepSize,
    /// Discretized pressure gradient matches rho * g to the tolerance.
    Residual,
}

/// Temperature assigned to fluff zones.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FluffTemperature {
    /// The configured floor temperature.
    #[default]
    Constant,
    /// The temperature of the last converged non-fluff zone.
    Continuous,
}

/// Bounded retries of a zone solve at progressively relaxed tolerance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: usize,
    pub relax_factor: f64,
}

/// Density and temperature floors plus the optional convective threshold.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Floors {
    pub low_density_cutoff: f64,
    pub temperature_floor: f64,
    pub fluff_temperature: FluffTemperature,
    /// Isentropic zones falling below this density switch to isothermal.
    pub convective_density: Option<f64>,
}

impl Default for Floors {
    fn default() -> Self {
        Self {
            low_density_cutoff: 1e-4,
            temperature_floor: 1e7,
            fluff_temperature: FluffTemperature::Constant,
            convective_density: None,
        }
    }
}

impl Floors {
    pub fn validate(&self) -> SolverResult<()> {
        if !(self.low_density_cutoff.is_finite() && self.low_density_cutoff > 0.0) {
            return Err(SolverError::Configuration {
                what: format!("low density cutoff {} must be positive", self.low_density_cutoff),
            });
        }
        if !(self.temperature_floor.is_finite() && self.temperature_floor > 0.0) {
            return Err(SolverError::Configuration {
                what: format!("temperature floor {} must be positive", self.temperature_floor),
            });
        }
        if let Some(threshold) = self.convective_density {
            if !(threshold.is_finite() && threshold > 0.0) {
                return Err(SolverError::Configuration {
                    what: format!("convective density {threshold} must be positive"),
                });
            }
        }
        Ok(())
    }

    /// Fluff temperature given the last non-fluff temperature.
    pub fn fluff_temperature(&self, last_solid: f64) -> f64 {
        match self.fluff_temperature {
            FluffTemperature::Constant => self.temperature_floor,
            FluffTemperature::Continuous => last_solid,
        }
    }
}
