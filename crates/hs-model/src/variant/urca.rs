//! Convective carbon-oxygen core carrying an Urca pair in rate equilibrium.
//!
//! The whole core shares the central entropy. At every trial state the pair
//! is re-split so electron captures balance beta decays; the carbon and
//! oxygen fractions stay fixed. Optionally the central density is iterated
//! until the total mass matches a target.

use super::{EngineSettings, MassTarget, ModelOutcome, ensure_supported, require_positive};
use crate::composition::{EquilibriumComposition, EquilibriumSettings};
use crate::error::ModelResult;
use crate::integrator::{PassOptions, ProfileIntegrator, ZoneSchedule, ZoneSetup};
use crate::mass_match::{ControlParameter, MassMatcher};
use crate::profile::{Profile, Zone};
use hs_eos::{Composition, EquationOfState, ReactionRates, Species};
use hs_solver::{Closure, Floors, Grid, Regime, SolverResult, ZoneSolver};
use tracing::info;

#[derive(Clone, Debug, PartialEq)]
pub struct UrcaModel {
    pub c12: f64,
    pub o16: f64,
    /// Combined mass fraction of the pair.
    pub pair_total: f64,
    pub central_density: f64,
    pub central_temperature: f64,
    /// Isentropic zones below this density turn isothermal.
    pub convective_density: Option<f64>,
    /// Isentropic zones beyond this enclosed mass [g] turn isothermal.
    pub convective_mass: Option<f64>,
    pub equilibrium: EquilibriumSettings,
    /// Total mass to match by adjusting the central density.
    pub mass: Option<MassTarget>,
}

struct UrcaSchedule<'a, 'r> {
    source: &'a EquilibriumComposition<'r>,
    entropy: f64,
}

impl ZoneSchedule for UrcaSchedule<'_, '_> {
    fn setup(&mut self, _index: usize, previous: &Zone) -> ModelResult<ZoneSetup> {
        Ok(ZoneSetup {
            closure: Closure::Isentropic {
                entropy: self.entropy,
            },
            composition: previous.composition,
            guess_density: previous.rho,
            guess_temperature: previous.t,
            envelope_fraction: 0.0,
        })
    }

    fn composition_at(&self, _setup: &ZoneSetup, rho: f64, t: f64) -> SolverResult<Composition> {
        self.source.split(rho, t)
    }
}

impl UrcaModel {
    /// Composition before the pair is split: everything in the parent.
    pub fn base_composition(&self, rates: &dyn ReactionRates) -> ModelResult<Composition> {
        Ok(Composition::from_mass_fractions(&[
            (Species::C12, self.c12),
            (Species::O16, self.o16),
            (rates.parent(), self.pair_total),
        ])?)
    }

    fn validate(&self, eos: &dyn EquationOfState, rates: &dyn ReactionRates) -> ModelResult<()> {
        require_positive("central density", self.central_density)?;
        require_positive("central temperature", self.central_temperature)?;
        if let Some(m) = self.convective_mass {
            require_positive("convective mass", m)?;
        }
        for species in [Species::C12, Species::O16, rates.parent(), rates.daughter()] {
            eos.require_species(species)?;
        }
        ensure_supported(eos, &self.base_composition(rates)?)
    }

    pub fn build(
        &self,
        eos: &dyn EquationOfState,
        rates: &dyn ReactionRates,
        settings: &EngineSettings,
    ) -> ModelResult<ModelOutcome> {
        self.validate(eos, rates)?;
        let source =
            EquilibriumComposition::new(self.base_composition(rates)?, rates, self.equilibrium);
        let grid = Grid::uniform(&settings.grid)?;
        let floors = Floors {
            convective_density: self.convective_density.or(settings.floors.convective_density),
            ..settings.floors
        };
        let solver = ZoneSolver::new(eos, settings.zone, floors)?;
        let options = PassOptions {
            convective_mass: self.convective_mass,
        };
        let integrator = ProfileIntegrator::new(solver, &grid, settings.gravity, options);
        info!(rates = rates.name(), pair_total = source.pair_total(), "urca core");

        let forward = |rho_c: f64| -> ModelResult<Profile> {
            let center = source.split(rho_c, self.central_temperature)?;
            let seed = Zone::evaluate(
                eos,
                rho_c,
                self.central_temperature,
                center,
                Regime::Isentropic,
                0.0,
            )?;
            let mut schedule = UrcaSchedule {
                source: &source,
                entropy: seed.s,
            };
            integrator.integrate_outward(seed, &mut schedule)
        };

        let Some(target) = self.mass else {
            let profile = forward(self.central_density)?;
            let controls = vec![("central_density".to_string(), self.central_density)];
            return Ok(ModelOutcome::new(profile, controls, 1, settings));
        };

        let matcher = MassMatcher::new(
            vec![ControlParameter {
                name: "central_density".to_string(),
                region: "total".to_string(),
                initial: self.central_density,
                target_mass: target.mass,
                tolerance: target.tolerance,
                bounds: target.bounds,
            }],
            settings.mass_match,
        )?;
        let outcome = matcher.run(|params| {
            let profile = forward(params[0])?;
            let total = profile.region_masses().total();
            Ok((profile, vec![total]))
        })?;
        let controls = vec![("central_density".to_string(), outcome.parameters[0])];
        Ok(ModelOutcome::new(
            outcome.profile,
            controls,
            outcome.iterations,
            settings,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use hs_eos::{GasOptions, StellarGas, ThresholdUrcaRates};

    fn model() -> UrcaModel {
        UrcaModel {
            c12: 0.4,
            o16: 0.5995,
            pair_total: 5e-4,
            central_density: 4.5e9,
            central_temperature: 6e8,
            convective_density: None,
            convective_mass: None,
            equilibrium: EquilibriumSettings::default(),
            mass: None,
        }
    }

    #[test]
    fn base_composition_puts_pair_in_parent() {
        let rates = ThresholdUrcaRates::default();
        let comp = model().base_composition(&rates).unwrap();
        assert!((comp.mass_fraction(Species::Na23) - 5e-4).abs() < 1e-15);
        assert_eq!(comp.mass_fraction(Species::Ne23), 0.0);
    }

    #[test]
    fn daughter_must_be_in_network() {
        let eos = StellarGas::with_network(
            GasOptions::default(),
            vec![Species::C12, Species::O16, Species::Na23],
        );
        let rates = ThresholdUrcaRates::default();
        match model().validate(&eos, &rates) {
            Err(ModelError::Eos(hs_eos::EosError::UnsupportedSpecies { species, .. })) => {
                assert_eq!(species, Species::Ne23)
            }
            other => panic!("expected unsupported species, got {other:?}"),
        }
    }

    #[test]
    fn fractions_must_sum_to_one() {
        let mut m = model();
        m.o16 = 0.5;
        let eos = StellarGas::default();
        let rates = ThresholdUrcaRates::default();
        assert!(matches!(
            m.validate(&eos, &rates),
            Err(ModelError::Eos(hs_eos::EosError::InvalidComposition { .. }))
        ));
    }

    #[test]
    fn schedule_splits_pair_at_trial_state() {
        let rates = ThresholdUrcaRates::default();
        let m = model();
        let source =
            EquilibriumComposition::new(m.base_composition(&rates).unwrap(), &rates, m.equilibrium);
        let schedule = UrcaSchedule {
            source: &source,
            entropy: 1.0,
        };
        let setup = ZoneSetup {
            closure: Closure::Isentropic { entropy: 1.0 },
            composition: Composition::pure(Species::C12),
            guess_density: 1.0,
            guess_temperature: 1.0,
            envelope_fraction: 0.0,
        };
        let dense = schedule.composition_at(&setup, 4.5e9, 6e8).unwrap();
        let thin = schedule.composition_at(&setup, 1e8, 6e8).unwrap();
        assert!(dense.mass_fraction(Species::Ne23) > dense.mass_fraction(Species::Na23));
        assert!(thin.mass_fraction(Species::Na23) > thin.mass_fraction(Species::Ne23));
        assert!((dense.sum() - 1.0).abs() < 1e-12);
    }
}
