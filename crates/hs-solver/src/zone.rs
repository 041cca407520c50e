//! Zone solver: discretized HSE plus the active closure for one cell.
//!
//! The neighbour is the already converged cell on the side the integration
//! comes from. With direction sign `sigma` (+1 outward, -1 inward) the
//! pressure the current cell must have is
//!
//! ```text
//! p_want = p_nb + sigma * dx * g * (rho + rho_nb) / 2
//! ```

use crate::error::{SolverError, SolverResult};
use crate::newton;
use crate::policy::{Closure, ConvergenceTest, Direction, Floors, Regime, RetryPolicy};
use hs_core::numeric::damped_update;
use hs_eos::{Composition, EosState, EquationOfState};
use tracing::{debug, trace, warn};

/// Composition of the zone being solved, possibly depending on its state.
pub trait CompositionSource {
    fn composition_at(&self, rho: f64, t: f64) -> SolverResult<Composition>;
}

impl CompositionSource for Composition {
    fn composition_at(&self, _rho: f64, _t: f64) -> SolverResult<Composition> {
        Ok(*self)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ZoneSolverConfig {
    /// Relative tolerance of the acceptance test.
    pub tolerance: f64,
    pub max_iterations: usize,
    /// Largest fractional change of density or temperature per iteration.
    pub damping: f64,
    pub test: ConvergenceTest,
    pub retry: Option<RetryPolicy>,
}

impl Default for ZoneSolverConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-10,
            max_iterations: 250,
            damping: 0.1,
            test: ConvergenceTest::StepSize,
            retry: None,
        }
    }
}

impl ZoneSolverConfig {
    pub fn validate(&self) -> SolverResult<()> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(SolverError::Configuration {
                what: format!("zone tolerance {} must be positive", self.tolerance),
            });
        }
        if self.max_iterations == 0 {
            return Err(SolverError::Configuration {
                what: "zone solve needs at least one iteration".to_string(),
            });
        }
        if !(self.damping > 0.0 && self.damping < 1.0) {
            return Err(SolverError::Configuration {
                what: format!("damping fraction {} must lie in (0, 1)", self.damping),
            });
        }
        if let Some(retry) = self.retry {
            if !(retry.relax_factor.is_finite() && retry.relax_factor >= 1.0) {
                return Err(SolverError::Configuration {
                    what: format!("retry relax factor {} must be >= 1", retry.relax_factor),
                });
            }
        }
        Ok(())
    }
}

/// Converged state of the neighbouring zone.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbor {
    pub rho: f64,
    pub t: f64,
    pub p: f64,
}

pub struct ZoneRequest<'a> {
    pub index: usize,
    pub direction: Direction,
    pub neighbor: Neighbor,
    /// Acceleration at the neighbour-facing edge.
    pub gravity: f64,
    /// Centre-to-centre distance to the neighbour.
    pub spacing: f64,
    pub closure: Closure,
    pub guess_density: f64,
    /// Starting temperature; only used by an isentropic closure.
    pub guess_temperature: f64,
    pub composition: &'a dyn CompositionSource,
}

#[derive(Clone, Debug)]
pub struct ZoneSolution {
    pub state: EosState,
    pub composition: Composition,
    pub regime: Regime,
    pub iterations: usize,
    /// Relaxed-tolerance retries needed.
    pub retries: usize,
}

pub struct ZoneSolver<'a> {
    eos: &'a dyn EquationOfState,
    config: ZoneSolverConfig,
    floors: Floors,
}

impl<'a> ZoneSolver<'a> {
    pub fn new(
        eos: &'a dyn EquationOfState,
        config: ZoneSolverConfig,
        floors: Floors,
    ) -> SolverResult<Self> {
        config.validate()?;
        floors.validate()?;
        Ok(Self {
            eos,
            config,
            floors,
        })
    }

    pub fn eos(&self) -> &'a dyn EquationOfState {
        self.eos
    }

    pub fn config(&self) -> &ZoneSolverConfig {
        &self.config
    }

    pub fn floors(&self) -> &Floors {
        &self.floors
    }

    pub fn solve(&self, request: &ZoneRequest<'_>) -> SolverResult<ZoneSolution> {
        let zone = request.index;
        let nb = request.neighbor;
        let half_weight = 0.5 * request.direction.sign() * request.spacing * request.gravity;

        let mut closure = request.closure;
        let mut rho = request.guess_density;
        let mut t = match closure {
            Closure::Isentropic { .. } => request.guess_temperature,
            Closure::Prescribed { temperature } | Closure::Isothermal { temperature } => {
                temperature
            }
        };

        let attempts = 1 + self.config.retry.map_or(0, |r| r.max_retries);
        let mut tolerance = self.config.tolerance;
        let mut iterations = 0;
        let mut residual = f64::NAN;

        for attempt in 0..attempts {
            if let (true, Some(retry)) = (attempt > 0, self.config.retry) {
                tolerance *= retry.relax_factor;
                warn!(zone, attempt, tolerance, "retrying zone solve at relaxed tolerance");
            }

            for _ in 0..self.config.max_iterations {
                iterations += 1;
                let comp = request.composition.composition_at(rho, t)?;
                let state = self.eos.evaluate(rho, t, &comp)?;

                let p_want = nb.p + half_weight * (rho + nb.rho);
                let a = p_want - state.p;
                let da_drho = half_weight - state.dpdr;
                residual = (a / state.p).abs();

                let (drho, dt) = match closure {
                    Closure::Isentropic { entropy } => {
                        newton::isentropic_step(a, entropy - state.s, da_drho, &state)
                            .ok_or(SolverError::SingularJacobian { zone })?
                    }
                    Closure::Prescribed { .. } | Closure::Isothermal { .. } => {
                        let drho = newton::isothermal_step(a, da_drho)
                            .ok_or(SolverError::SingularJacobian { zone })?;
                        (drho, 0.0)
                    }
                };

                rho = damped_update(rho, drho, self.config.damping);
                if closure.is_isentropic() {
                    t = damped_update(t, dt, self.config.damping);
                }

                if rho < self.floors.low_density_cutoff {
                    debug!(zone, "density fell below cutoff, entering fluff");
                    let t_fluff = self.floors.fluff_temperature(nb.t);
                    let mut solution = self.fluff(t_fluff, request.composition)?;
                    solution.iterations = iterations;
                    solution.retries = attempt;
                    return Ok(solution);
                }

                if let (Closure::Isentropic { .. }, Some(threshold)) =
                    (closure, self.floors.convective_density)
                {
                    if rho < threshold {
                        debug!(zone, rho, t, "convective boundary reached, switching to isothermal");
                        closure = Closure::Isothermal { temperature: t };
                    }
                }

                // a clamped iterate has not been solved for; never accept it
                if closure.is_isentropic() && t < self.floors.temperature_floor {
                    debug!(zone, t, "temperature floor reached, switching to isothermal");
                    t = self.floors.temperature_floor;
                    closure = Closure::Isothermal { temperature: t };
                    continue;
                }

                let converged = match self.config.test {
                    ConvergenceTest::StepSize => {
                        drho.abs() < tolerance * rho
                            && (!closure.is_isentropic() || dt.abs() < tolerance * t)
                    }
                    ConvergenceTest::Residual => {
                        let comp = request.composition.composition_at(rho, t)?;
                        let p = self.eos.evaluate(rho, t, &comp)?.p;
                        let dpdr = request.direction.sign() * (p - nb.p) / request.spacing;
                        let rho_g = 0.5 * (rho + nb.rho) * request.gravity;
                        (dpdr - rho_g).abs() < tolerance * dpdr.abs()
                    }
                };

                if converged {
                    let comp = request.composition.composition_at(rho, t)?;
                    let state = self.eos.evaluate(rho, t, &comp)?;
                    trace!(zone, iterations, regime = closure.regime().label(), "zone converged");
                    return Ok(ZoneSolution {
                        state,
                        composition: comp,
                        regime: closure.regime(),
                        iterations,
                        retries: attempt,
                    });
                }

            }
        }

        Err(SolverError::ZoneNonConvergence {
            zone,
            density: rho,
            temperature: t,
            residual,
            iterations,
        })
    }

    /// Floor-valued zone at the density cutoff and the given temperature.
    pub fn fluff(
        &self,
        temperature: f64,
        composition: &dyn CompositionSource,
    ) -> SolverResult<ZoneSolution> {
        let rho = self.floors.low_density_cutoff;
        let comp = composition.composition_at(rho, temperature)?;
        let state = self.eos.evaluate(rho, temperature, &comp)?;
        Ok(ZoneSolution {
            state,
            composition: comp,
            regime: Regime::Fluff,
            iterations: 0,
            retries: 0,
        })
    }
}
