//! In-memory result of one integration pass.

use crate::error::ModelResult;
use hs_eos::{Composition, EquationOfState};
use hs_solver::{Grid, Neighbor, Regime, ZoneSolution};

/// Full thermodynamic and compositional state of one cell.
#[derive(Clone, Debug, PartialEq)]
pub struct Zone {
    pub rho: f64,
    pub t: f64,
    pub p: f64,
    pub s: f64,
    pub cs: f64,
    pub composition: Composition,
    pub regime: Regime,
    /// Share of this zone's mass that belongs to the outer layer.
    pub envelope_fraction: f64,
}

impl Zone {
    /// Evaluate a zone directly from density and temperature (seed zones).
    pub fn evaluate(
        eos: &dyn EquationOfState,
        rho: f64,
        t: f64,
        composition: Composition,
        regime: Regime,
        envelope_fraction: f64,
    ) -> ModelResult<Self> {
        let state = eos.evaluate(rho, t, &composition)?;
        Ok(Self {
            rho,
            t,
            p: state.p,
            s: state.s,
            cs: state.cs,
            composition,
            regime,
            envelope_fraction,
        })
    }

    pub fn from_solution(solution: &ZoneSolution, envelope_fraction: f64) -> Self {
        Self {
            rho: solution.state.rho,
            t: solution.state.t,
            p: solution.state.p,
            s: solution.state.s,
            cs: solution.state.cs,
            composition: solution.composition,
            regime: solution.regime,
            envelope_fraction,
        }
    }

    pub fn neighbor(&self) -> Neighbor {
        Neighbor {
            rho: self.rho,
            t: self.t,
            p: self.p,
        }
    }
}

/// Indices where the behaviour of a pass changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Markers {
    /// Cell both integration directions start from.
    pub base_index: usize,
    /// First fluff cell of the outward pass.
    pub fluff_index: Option<usize>,
    /// First cell that left the isentropic closure.
    pub convective_index: Option<usize>,
    /// First cell of an interior compositional transition.
    pub composition_index: Option<usize>,
}

/// Masses split by layer over the cells below the fluff index [g].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RegionMasses {
    pub core: f64,
    pub envelope: f64,
}

impl RegionMasses {
    pub fn total(&self) -> f64 {
        self.core + self.envelope
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Profile {
    grid: Grid,
    zones: Vec<Zone>,
    enclosed_mass: Vec<f64>,
    markers: Markers,
}

impl Profile {
    /// Assemble a profile, accumulating enclosed mass from the inner edge.
    pub fn new(grid: Grid, zones: Vec<Zone>, markers: Markers) -> Self {
        let mut enclosed_mass = Vec::with_capacity(zones.len());
        let mut running = 0.0;
        for (i, zone) in zones.iter().enumerate() {
            running += grid.shell_volume(i) * zone.rho;
            enclosed_mass.push(running);
        }
        Self {
            grid,
            zones,
            enclosed_mass,
            markers,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn enclosed_mass(&self) -> &[f64] {
        &self.enclosed_mass
    }

    pub fn markers(&self) -> Markers {
        self.markers
    }

    pub fn total_mass(&self) -> f64 {
        self.enclosed_mass.last().copied().unwrap_or(0.0)
    }

    /// Core and envelope masses summed over cells below the fluff index.
    pub fn region_masses(&self) -> RegionMasses {
        let limit = self.markers.fluff_index.unwrap_or(self.zones.len());
        self.zones
            .iter()
            .take(limit)
            .enumerate()
            .fold(RegionMasses::default(), |mut acc, (i, zone)| {
                let mass = self.grid.shell_volume(i) * zone.rho;
                acc.core += mass * (1.0 - zone.envelope_fraction);
                acc.envelope += mass * zone.envelope_fraction;
                acc
            })
    }

    pub fn densities(&self) -> impl Iterator<Item = f64> + '_ {
        self.zones.iter().map(|z| z.rho)
    }

    pub fn regimes(&self) -> impl Iterator<Item = Regime> + '_ {
        self.zones.iter().map(|z| z.regime)
    }
}
