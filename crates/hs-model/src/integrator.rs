//! Profile integrator: marches the zone solver across the grid.
//!
//! A pass starts from a seed zone and visits cells one by one, outward
//! (increasing index) and optionally inward from the same base. Each
//! direction latches: once a zone leaves the isentropic closure every later
//! zone in that direction is isothermal at the latched temperature, and once
//! a zone is fluff every later zone is fluff without solving.

use crate::error::{ModelError, ModelResult};
use crate::profile::{Markers, Profile, Zone};
use hs_eos::Composition;
use hs_solver::{
    Closure, CompositionSource, Direction, GravityModel, Grid, Regime, SolverResult, ZoneRequest,
    ZoneSolver,
};
use tracing::debug;

/// What the schedule wants for the next zone.
#[derive(Clone, Debug, PartialEq)]
pub struct ZoneSetup {
    pub closure: Closure,
    pub composition: Composition,
    pub guess_density: f64,
    pub guess_temperature: f64,
    pub envelope_fraction: f64,
}

/// Per-variant rules deciding closure and composition zone by zone.
pub trait ZoneSchedule {
    /// Setup of zone `index`, given the zone just finished in this direction.
    fn setup(&mut self, index: usize, previous: &Zone) -> ModelResult<ZoneSetup>;

    /// Composition at a trial state; fixed by the setup unless overridden.
    fn composition_at(&self, setup: &ZoneSetup, _rho: f64, _t: f64) -> SolverResult<Composition> {
        Ok(setup.composition)
    }

    /// Called with every finished zone.
    fn observe(&mut self, _index: usize, _zone: &Zone) {}

    /// First index of an interior compositional transition, if any.
    fn transition_index(&self) -> Option<usize> {
        None
    }
}

struct Scheduled<'s, S: ?Sized> {
    schedule: &'s S,
    setup: &'s ZoneSetup,
}

impl<S: ZoneSchedule + ?Sized> CompositionSource for Scheduled<'_, S> {
    fn composition_at(&self, rho: f64, t: f64) -> SolverResult<Composition> {
        self.schedule.composition_at(self.setup, rho, t)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PassOptions {
    /// Leave the isentropic closure once the enclosed mass exceeds this [g].
    pub convective_mass: Option<f64>,
}

/// Latching state of one direction.
#[derive(Default)]
struct Pass {
    isothermal: Option<f64>,
    fluff_temperature: Option<f64>,
    fluff_index: Option<usize>,
    convective_index: Option<usize>,
}

impl Pass {
    fn closure(&self, nominal: Closure) -> Closure {
        match self.isothermal {
            Some(temperature) => Closure::Isothermal { temperature },
            None => nominal,
        }
    }

    fn latch_isothermal(&mut self, index: usize, temperature: f64) {
        if self.isothermal.is_none() {
            self.isothermal = Some(temperature);
            self.convective_index = Some(index);
        }
    }
}

pub struct ProfileIntegrator<'a> {
    solver: ZoneSolver<'a>,
    grid: &'a Grid,
    gravity: GravityModel,
    options: PassOptions,
}

impl<'a> ProfileIntegrator<'a> {
    pub fn new(
        solver: ZoneSolver<'a>,
        grid: &'a Grid,
        gravity: GravityModel,
        options: PassOptions,
    ) -> Self {
        Self {
            solver,
            grid,
            gravity,
            options,
        }
    }

    pub fn grid(&self) -> &Grid {
        self.grid
    }

    pub fn solver(&self) -> &ZoneSolver<'a> {
        &self.solver
    }

    /// Single outward pass from the innermost cell.
    pub fn integrate_outward<S: ZoneSchedule>(
        &self,
        seed: Zone,
        schedule: &mut S,
    ) -> ModelResult<Profile> {
        let n = self.grid.len();
        let mut zones = vec![seed; n];
        let mut enclosed = vec![0.0; n];
        enclosed[0] = self.grid.shell_volume(0) * zones[0].rho;

        let pass = self.march(&mut zones, &mut enclosed, 1..n, Direction::Outward, schedule)?;
        let markers = Markers {
            base_index: 0,
            fluff_index: pass.fluff_index,
            convective_index: pass.convective_index,
            composition_index: schedule.transition_index(),
        };
        debug!(?markers, "outward pass finished");
        Ok(Profile::new(self.grid.clone(), zones, markers))
    }

    /// Outward and inward passes from an interior base cell.
    pub fn integrate_bidirectional<U: ZoneSchedule, D: ZoneSchedule>(
        &self,
        base_index: usize,
        base: Zone,
        outward: &mut U,
        inward: &mut D,
    ) -> ModelResult<Profile> {
        self.grid.cell(base_index)?;
        if self.gravity.needs_enclosed_mass() && base_index > 0 {
            return Err(ModelError::Configuration {
                what: "enclosed-mass gravity needs the pass to start at the inner edge".to_string(),
            });
        }

        let n = self.grid.len();
        let mut zones = vec![base; n];
        let mut enclosed = vec![0.0; n];
        enclosed[base_index] = self.grid.shell_volume(base_index) * zones[base_index].rho;

        let up = self.march(
            &mut zones,
            &mut enclosed,
            base_index + 1..n,
            Direction::Outward,
            outward,
        )?;
        let down = self.march(
            &mut zones,
            &mut enclosed,
            (0..base_index).rev(),
            Direction::Inward,
            inward,
        )?;

        let markers = Markers {
            base_index,
            fluff_index: up.fluff_index,
            convective_index: up.convective_index,
            composition_index: outward.transition_index().or(inward.transition_index()),
        };
        debug!(?markers, inward_fluff = ?down.fluff_index, "bidirectional pass finished");
        Ok(Profile::new(self.grid.clone(), zones, markers))
    }

    fn march<S: ZoneSchedule>(
        &self,
        zones: &mut [Zone],
        enclosed: &mut [f64],
        indices: impl Iterator<Item = usize>,
        direction: Direction,
        schedule: &mut S,
    ) -> ModelResult<Pass> {
        let mut pass = Pass::default();

        for i in indices {
            let (nb, edge) = match direction {
                Direction::Outward => (i - 1, self.grid.left(i)),
                Direction::Inward => (i + 1, self.grid.right(i)),
            };
            let previous = zones[nb].clone();
            let setup = schedule.setup(i, &previous)?;
            let source = Scheduled {
                schedule: &*schedule,
                setup: &setup,
            };

            let solution = match pass.fluff_temperature {
                Some(t_fluff) => self.solver.fluff(t_fluff, &source)?,
                None => {
                    let closure = pass.closure(setup.closure);
                    let m_inside = match direction {
                        Direction::Outward => enclosed[nb],
                        Direction::Inward => 0.0,
                    };
                    let request = ZoneRequest {
                        index: i,
                        direction,
                        neighbor: previous.neighbor(),
                        gravity: self.gravity.acceleration(edge, m_inside),
                        spacing: self.grid.spacing(i, nb),
                        closure,
                        guess_density: setup.guess_density,
                        guess_temperature: setup.guess_temperature,
                        composition: &source,
                    };
                    let solution = self.solver.solve(&request)?;
                    match solution.regime {
                        Regime::Fluff => {
                            pass.fluff_temperature = Some(solution.state.t);
                            pass.fluff_index = Some(i);
                        }
                        Regime::Isothermal if closure.is_isentropic() => {
                            pass.latch_isothermal(i, solution.state.t);
                        }
                        _ => {}
                    }
                    solution
                }
            };

            let zone = Zone::from_solution(&solution, setup.envelope_fraction);
            schedule.observe(i, &zone);

            if direction == Direction::Outward {
                enclosed[i] = enclosed[nb] + self.grid.shell_volume(i) * zone.rho;
                if let Some(threshold) = self.options.convective_mass {
                    if zone.regime == Regime::Isentropic && enclosed[i] > threshold {
                        debug!(zone = i, "convective mass reached, switching to isothermal");
                        pass.latch_isothermal(i, zone.t);
                    }
                }
            }
            zones[i] = zone;
        }

        Ok(pass)
    }
}
