//! Global mass matching by independent secant updates.

use crate::error::{ModelError, ModelResult};
use crate::profile::Profile;
use hs_core::numeric::relative_error;
use hs_core::units::constants::M_SUN;
use tracing::{info, warn};

/// Per-iteration multiplicative limits on a control parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepBounds {
    pub lower: f64,
    pub upper: f64,
}

impl StepBounds {
    /// Central density: +-10% per outer iteration.
    pub const DENSITY: StepBounds = StepBounds {
        lower: 0.9,
        upper: 1.1,
    };

    /// Transition density: -25% / +50% per outer iteration.
    pub const TRANSITION: StepBounds = StepBounds {
        lower: 0.75,
        upper: 1.5,
    };
}

/// One scalar the outer iteration adjusts, and the mass it must reproduce.
#[derive(Clone, Debug, PartialEq)]
pub struct ControlParameter {
    pub name: String,
    /// Region whose mass this parameter controls.
    pub region: String,
    pub initial: f64,
    /// Target mass [g].
    pub target_mass: f64,
    /// Relative mass tolerance.
    pub tolerance: f64,
    pub bounds: StepBounds,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MassMatchConfig {
    pub max_iterations: usize,
}

impl Default for MassMatchConfig {
    fn default() -> Self {
        Self {
            max_iterations: 250,
        }
    }
}

#[derive(Clone, Debug)]
pub struct MassMatchOutcome {
    pub profile: Profile,
    pub parameters: Vec<f64>,
    pub masses: Vec<f64>,
    pub iterations: usize,
}

/// Next value of a control parameter from its last two samples.
///
/// Falls back to the bound in the direction of the target when the two
/// samples do not define a usable slope (mass assumed to grow with the
/// parameter).
pub fn secant_update(
    param: f64,
    mass: f64,
    prev_param: f64,
    prev_mass: f64,
    target: f64,
    bounds: StepBounds,
) -> f64 {
    let (lo, hi) = (bounds.lower * param, bounds.upper * param);
    let slope = (mass - prev_mass) / (param - prev_param);
    if param == prev_param || slope == 0.0 || !slope.is_finite() {
        warn!(param, mass, "degenerate secant slope, stepping to bound");
        return if target > mass { hi } else { lo };
    }
    (param + (target - mass) / slope).clamp(lo, hi)
}

pub struct MassMatcher {
    controls: Vec<ControlParameter>,
    config: MassMatchConfig,
}

impl MassMatcher {
    pub fn new(controls: Vec<ControlParameter>, config: MassMatchConfig) -> ModelResult<Self> {
        if controls.is_empty() {
            return Err(ModelError::Configuration {
                what: "mass matching needs at least one control parameter".to_string(),
            });
        }
        if config.max_iterations == 0 {
            return Err(ModelError::Configuration {
                what: "mass matching needs at least one outer iteration".to_string(),
            });
        }
        for c in &controls {
            let positive = |v: f64| v.is_finite() && v > 0.0;
            if !(positive(c.initial) && positive(c.target_mass) && positive(c.tolerance)) {
                return Err(ModelError::Configuration {
                    what: format!("control '{}' needs positive initial value, target and tolerance", c.name),
                });
            }
            if !(c.bounds.lower > 0.0 && c.bounds.lower < 1.0 && c.bounds.upper > 1.0) {
                return Err(ModelError::Configuration {
                    what: format!("control '{}' step bounds must bracket 1", c.name),
                });
            }
        }
        Ok(Self { controls, config })
    }

    pub fn controls(&self) -> &[ControlParameter] {
        &self.controls
    }

    /// Iterate `forward` (parameters -> profile and measured masses) until
    /// every mass is within its tolerance.
    ///
    /// The first pass seeds the secant history; the second runs at half the
    /// initial parameters. A measured mass of exactly zero aborts with the
    /// offending profile attached.
    pub fn run<F>(&self, mut forward: F) -> ModelResult<MassMatchOutcome>
    where
        F: FnMut(&[f64]) -> ModelResult<(Profile, Vec<f64>)>,
    {
        let targets: Vec<f64> = self.controls.iter().map(|c| c.target_mass).collect();
        let mut params: Vec<f64> = self.controls.iter().map(|c| c.initial).collect();
        let mut history: Option<(Vec<f64>, Vec<f64>)> = None;
        let mut last_masses = Vec::new();

        for iteration in 1..=self.config.max_iterations {
            let (profile, masses) = forward(&params)?;
            if masses.len() != self.controls.len() {
                return Err(ModelError::Configuration {
                    what: format!(
                        "forward model returned {} masses for {} controls",
                        masses.len(),
                        self.controls.len()
                    ),
                });
            }
            if let Some(k) = masses.iter().position(|m| *m == 0.0) {
                return Err(ModelError::DegenerateMass {
                    region: self.controls[k].region.clone(),
                    profile: Box::new(profile),
                });
            }

            let solar: Vec<f64> = masses.iter().map(|m| m / M_SUN).collect();
            info!(iteration, parameters = ?params, masses_msun = ?solar, "mass matching pass");

            let converged = self
                .controls
                .iter()
                .zip(&masses)
                .all(|(c, m)| relative_error(*m, c.target_mass) < c.tolerance);
            if converged {
                info!(iteration, "mass matching converged");
                return Ok(MassMatchOutcome {
                    profile,
                    parameters: params,
                    masses,
                    iterations: iteration,
                });
            }

            let next: Vec<f64> = match &history {
                None => params.iter().map(|p| 0.5 * p).collect(),
                Some((prev_params, prev_masses)) => self
                    .controls
                    .iter()
                    .enumerate()
                    .map(|(k, c)| {
                        let settled = relative_error(masses[k], c.target_mass) < c.tolerance;
                        if settled && params[k] == prev_params[k] {
                            return params[k];
                        }
                        secant_update(
                            params[k],
                            masses[k],
                            prev_params[k],
                            prev_masses[k],
                            c.target_mass,
                            c.bounds,
                        )
                    })
                    .collect(),
            };
            last_masses = masses.clone();
            history = Some((params, masses));
            params = next;
        }

        Err(ModelError::MassNonConvergence {
            iterations: self.config.max_iterations,
            masses: last_masses,
            targets,
        })
    }
}
