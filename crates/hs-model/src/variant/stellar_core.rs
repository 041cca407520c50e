//! Isothermal stellar core, optionally capped by a blended envelope.
//!
//! The core sits at a fixed temperature. Once the density of the zone below
//! drops under the transition density the composition and temperature blend
//! into the envelope over a tanh layer; the first fully-envelope zone fixes
//! the envelope entropy and the rest of the envelope is isentropic (or held
//! at the base temperature for an isothermal layer).

use super::{EngineSettings, MassTarget, ModelOutcome, ensure_supported, require_positive};
use crate::composition::{LayerProfile, TanhBlend};
use crate::error::{ModelError, ModelResult};
use crate::integrator::{PassOptions, ProfileIntegrator, ZoneSchedule, ZoneSetup};
use crate::mass_match::{ControlParameter, MassMatcher};
use crate::profile::Zone;
use hs_eos::{Composition, EquationOfState};
use hs_solver::{Closure, Grid, Regime, ZoneSolver};

/// Blend weight at which a zone counts as pure envelope.
const FULL_ENVELOPE: f64 = 0.999;

/// Distance from the first layer zone to the blend centre, in widths.
const BLEND_OFFSET: f64 = 4.0;

#[derive(Clone, Debug, PartialEq)]
pub struct EnvelopeLayer {
    pub composition: Composition,
    /// Temperature at the envelope base [K].
    pub base_temperature: f64,
    /// Width of the tanh blend [cm].
    pub width: f64,
    pub mass: MassTarget,
    /// Starting transition density as a fraction of the central density.
    pub transition_fraction: f64,
    /// Hold the whole envelope at the base temperature.
    pub isothermal: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StellarCoreModel {
    pub core: Composition,
    pub core_temperature: f64,
    /// Starting central density [g/cc].
    pub central_density: f64,
    pub core_mass: MassTarget,
    pub envelope: Option<EnvelopeLayer>,
}

struct CoreSchedule<'m> {
    model: &'m StellarCoreModel,
    grid: &'m Grid,
    transition_density: f64,
    layer_start: Option<usize>,
    entropy_zone: Option<usize>,
    entropy: Option<f64>,
}

impl<'m> CoreSchedule<'m> {
    fn new(model: &'m StellarCoreModel, grid: &'m Grid, transition_density: f64) -> Self {
        Self {
            model,
            grid,
            transition_density,
            layer_start: None,
            entropy_zone: None,
            entropy: None,
        }
    }
}

impl ZoneSchedule for CoreSchedule<'_> {
    fn setup(&mut self, index: usize, previous: &Zone) -> ModelResult<ZoneSetup> {
        let model = self.model;
        let core = ZoneSetup {
            closure: Closure::Prescribed {
                temperature: model.core_temperature,
            },
            composition: model.core,
            guess_density: previous.rho,
            guess_temperature: previous.t,
            envelope_fraction: 0.0,
        };
        let Some(envelope) = &model.envelope else {
            return Ok(core);
        };
        if self.layer_start.is_none() && previous.rho > self.transition_density {
            return Ok(core);
        }

        let start = *self.layer_start.get_or_insert(index);
        let layer = LayerProfile {
            inner: model.core,
            outer: envelope.composition,
            inner_temperature: model.core_temperature,
            outer_temperature: envelope.base_temperature,
            blend: TanhBlend {
                center: self.grid.center(start) + BLEND_OFFSET * envelope.width,
                width: envelope.width,
            },
        };
        let x = self.grid.center(index);
        let eta = layer.weight(x);
        if eta < FULL_ENVELOPE {
            return Ok(ZoneSetup {
                closure: Closure::Prescribed {
                    temperature: layer.temperature_at(x),
                },
                composition: layer.composition_at(x)?,
                envelope_fraction: eta,
                ..core
            });
        }

        let entropy_zone = *self.entropy_zone.get_or_insert(index);
        let closure = match self.entropy {
            Some(entropy) if !envelope.isothermal && index != entropy_zone => {
                Closure::Isentropic { entropy }
            }
            _ => Closure::Prescribed {
                temperature: envelope.base_temperature,
            },
        };
        Ok(ZoneSetup {
            closure,
            composition: envelope.composition,
            envelope_fraction: 1.0,
            ..core
        })
    }

    fn observe(&mut self, index: usize, zone: &Zone) {
        if self.entropy_zone == Some(index) {
            self.entropy = Some(zone.s);
        }
    }

    fn transition_index(&self) -> Option<usize> {
        self.layer_start
    }
}

impl StellarCoreModel {
    fn validate(&self, eos: &dyn EquationOfState) -> ModelResult<()> {
        require_positive("core temperature", self.core_temperature)?;
        require_positive("central density", self.central_density)?;
        ensure_supported(eos, &self.core)?;
        if let Some(envelope) = &self.envelope {
            require_positive("envelope base temperature", envelope.base_temperature)?;
            require_positive("envelope width", envelope.width)?;
            if !(envelope.transition_fraction > 0.0 && envelope.transition_fraction <= 1.0) {
                return Err(ModelError::Configuration {
                    what: format!(
                        "transition fraction {} must lie in (0, 1]",
                        envelope.transition_fraction
                    ),
                });
            }
            ensure_supported(eos, &envelope.composition)?;
        }
        Ok(())
    }

    fn controls(&self) -> Vec<ControlParameter> {
        let mut controls = vec![ControlParameter {
            name: "central_density".to_string(),
            region: "core".to_string(),
            initial: self.central_density,
            target_mass: self.core_mass.mass,
            tolerance: self.core_mass.tolerance,
            bounds: self.core_mass.bounds,
        }];
        if let Some(envelope) = &self.envelope {
            controls.push(ControlParameter {
                name: "transition_density".to_string(),
                region: "envelope".to_string(),
                initial: envelope.transition_fraction * self.central_density,
                target_mass: envelope.mass.mass,
                tolerance: envelope.mass.tolerance,
                bounds: envelope.mass.bounds,
            });
        }
        controls
    }

    pub fn build(
        &self,
        eos: &dyn EquationOfState,
        settings: &EngineSettings,
    ) -> ModelResult<ModelOutcome> {
        self.validate(eos)?;
        let grid = Grid::uniform(&settings.grid)?;
        let solver = ZoneSolver::new(eos, settings.zone, settings.floors)?;
        let integrator =
            ProfileIntegrator::new(solver, &grid, settings.gravity, PassOptions::default());
        let matcher = MassMatcher::new(self.controls(), settings.mass_match)?;

        let outcome = matcher.run(|params| {
            let transition = params.get(1).copied().unwrap_or(0.0);
            let mut schedule = CoreSchedule::new(self, &grid, transition);
            let seed = Zone::evaluate(
                eos,
                params[0],
                self.core_temperature,
                self.core,
                Regime::Prescribed,
                0.0,
            )?;
            let profile = integrator.integrate_outward(seed, &mut schedule)?;
            let masses = profile.region_masses();
            let measured = match self.envelope {
                Some(_) => vec![masses.core, masses.envelope],
                None => vec![masses.core],
            };
            Ok((profile, measured))
        })?;

        let controls = matcher
            .controls()
            .iter()
            .zip(&outcome.parameters)
            .map(|(c, v)| (c.name.clone(), *v))
            .collect();
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
    use crate::mass_match::StepBounds;
    use hs_core::units::constants::M_SUN;
    use hs_eos::{GasOptions, Species, StellarGas};
    use hs_solver::{Geometry, GridSpec};

    fn layered() -> StellarCoreModel {
        StellarCoreModel {
            core: Composition::pure(Species::C12),
            core_temperature: 5e7,
            central_density: 1e9,
            core_mass: MassTarget {
                mass: M_SUN,
                tolerance: 1e-3,
                bounds: StepBounds::DENSITY,
            },
            envelope: Some(EnvelopeLayer {
                composition: Composition::pure(Species::He4),
                base_temperature: 2e8,
                width: 1e7,
                mass: MassTarget {
                    mass: 0.05 * M_SUN,
                    tolerance: 5e-2,
                    bounds: StepBounds::TRANSITION,
                },
                transition_fraction: 0.5,
                isothermal: false,
            }),
        }
    }

    fn grid() -> Grid {
        Grid::uniform(&GridSpec {
            zones: 64,
            xmin: 0.0,
            xmax: 6.4e8,
            max_zones: 64,
            geometry: Geometry::Spherical,
        })
        .unwrap()
    }

    fn zone(rho: f64, s: f64) -> Zone {
        let eos = StellarGas::default();
        let mut z = Zone::evaluate(
            &eos,
            rho,
            5e7,
            Composition::pure(Species::C12),
            Regime::Prescribed,
            0.0,
        )
        .unwrap();
        z.s = s;
        z
    }

    #[test]
    fn core_zones_until_transition_density() {
        let model = layered();
        let grid = grid();
        let mut schedule = CoreSchedule::new(&model, &grid, 1e6);
        let setup = schedule.setup(3, &zone(2e6, 0.0)).unwrap();
        assert_eq!(setup.closure, Closure::Prescribed { temperature: 5e7 });
        assert_eq!(setup.envelope_fraction, 0.0);
        assert_eq!(schedule.transition_index(), None);
    }

    #[test]
    fn layer_latches_and_blends() {
        let model = layered();
        let grid = grid();
        let mut schedule = CoreSchedule::new(&model, &grid, 1e6);
        let first = schedule.setup(10, &zone(9e5, 0.0)).unwrap();
        assert_eq!(schedule.transition_index(), Some(10));
        assert!(first.envelope_fraction < 1e-3);

        // Latched: a denser neighbour no longer reverts to the core.
        let mid = schedule.setup(14, &zone(5e6, 0.0)).unwrap();
        assert!((mid.envelope_fraction - 0.5).abs() < 1e-9);
        match mid.closure {
            Closure::Prescribed { temperature } => assert!((temperature - 1.25e8).abs() < 1.0),
            other => panic!("unexpected closure {other:?}"),
        }
        assert!((mid.composition.mass_fraction(Species::He4) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn envelope_entropy_set_by_first_full_zone() {
        let model = layered();
        let grid = grid();
        let mut schedule = CoreSchedule::new(&model, &grid, 1e6);
        schedule.setup(10, &zone(9e5, 0.0)).unwrap();

        let base = schedule.setup(20, &zone(1e5, 0.0)).unwrap();
        assert_eq!(base.envelope_fraction, 1.0);
        assert_eq!(base.closure, Closure::Prescribed { temperature: 2e8 });
        schedule.observe(20, &zone(1e5, 7.5e8));

        let next = schedule.setup(21, &zone(9e4, 7.5e8)).unwrap();
        assert_eq!(next.closure, Closure::Isentropic { entropy: 7.5e8 });
    }

    #[test]
    fn isothermal_envelope_stays_at_base_temperature() {
        let mut model = layered();
        if let Some(envelope) = model.envelope.as_mut() {
            envelope.isothermal = true;
        }
        let grid = grid();
        let mut schedule = CoreSchedule::new(&model, &grid, 1e6);
        schedule.setup(10, &zone(9e5, 0.0)).unwrap();
        schedule.setup(20, &zone(1e5, 0.0)).unwrap();
        schedule.observe(20, &zone(1e5, 7.5e8));
        let next = schedule.setup(21, &zone(9e4, 7.5e8)).unwrap();
        assert_eq!(next.closure, Closure::Prescribed { temperature: 2e8 });
    }

    #[test]
    fn envelope_control_starts_at_fraction_of_central_density() {
        let controls = layered().controls();
        assert_eq!(controls.len(), 2);
        assert_eq!(controls[1].initial, 5e8);
        assert_eq!(controls[1].region, "envelope");
        assert_eq!(controls[1].bounds, StepBounds::TRANSITION);
    }

    #[test]
    fn rejects_unsupported_envelope() {
        let eos = StellarGas::with_network(GasOptions::default(), vec![Species::C12, Species::O16]);
        let model = layered();
        assert!(matches!(
            model.validate(&eos),
            Err(ModelError::Eos(hs_eos::EosError::UnsupportedSpecies { .. }))
        ));
    }
}
