//! Boundary-layer atmosphere on top of a star.
//!
//! Composition and temperature follow a tanh blend from the underlying star
//! to the accreted fuel layer. The pass starts at a base zone of given
//! density: above it the fuel is isentropic, below it the temperature is
//! pinned to the blend. There is no mass target.

use super::{EngineSettings, ModelOutcome, ensure_supported, require_positive};
use crate::composition::{LayerProfile, TanhBlend};
use crate::error::{ModelError, ModelResult};
use crate::integrator::{PassOptions, ProfileIntegrator, ZoneSchedule, ZoneSetup};
use crate::profile::Zone;
use hs_eos::{Composition, EquationOfState};
use hs_solver::{Closure, Grid, Regime, ZoneSolver};
use tracing::info;

/// Fraction of the base temperature that marks the base zone.
const BASE_TEMPERATURE_FRACTION: f64 = 0.9995;

/// How the base zone is located on the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BaseIndexRule {
    /// One past the first centre at or above `xmin + height + width`.
    #[default]
    Height,
    /// One past the first zone whose blend temperature reaches the base
    /// temperature.
    Temperature,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AtmosphereModel {
    /// Composition of the underlying star.
    pub star: Composition,
    /// Composition of the fuel layer.
    pub fuel: Composition,
    pub star_temperature: f64,
    pub base_temperature: f64,
    /// Density of the base zone [g/cc].
    pub base_density: f64,
    /// Height of the star below the layer [cm].
    pub layer_height: f64,
    /// Width of the tanh blend [cm].
    pub width: f64,
    pub base_rule: BaseIndexRule,
}

impl AtmosphereModel {
    pub fn layer(&self, xmin: f64) -> LayerProfile {
        LayerProfile {
            inner: self.star,
            outer: self.fuel,
            inner_temperature: self.star_temperature,
            outer_temperature: self.base_temperature,
            blend: TanhBlend {
                center: xmin + self.layer_height - 2.0 * self.width,
                width: self.width,
            },
        }
    }

    /// Index of the zone both passes start from.
    pub fn base_index(&self, grid: &Grid, layer: &LayerProfile) -> ModelResult<usize> {
        let found = match self.base_rule {
            BaseIndexRule::Height => {
                let height = grid.xmin() + self.layer_height + self.width;
                grid.centers().iter().position(|&x| x >= height)
            }
            BaseIndexRule::Temperature => {
                let threshold = BASE_TEMPERATURE_FRACTION * self.base_temperature;
                grid.centers()
                    .iter()
                    .position(|&x| layer.temperature_at(x) > threshold)
            }
        };
        match found.map(|i| i + 1) {
            Some(index) if index < grid.len() => Ok(index),
            _ => Err(ModelError::Configuration {
                what: format!(
                    "atmosphere base ({:?} rule) lies outside the grid of {} zones",
                    self.base_rule,
                    grid.len()
                ),
            }),
        }
    }

    pub fn build(
        &self,
        eos: &dyn EquationOfState,
        settings: &EngineSettings,
    ) -> ModelResult<ModelOutcome> {
        require_positive("star temperature", self.star_temperature)?;
        require_positive("base temperature", self.base_temperature)?;
        require_positive("base density", self.base_density)?;
        require_positive("blend width", self.width)?;
        ensure_supported(eos, &self.star)?;
        ensure_supported(eos, &self.fuel)?;

        let grid = Grid::uniform(&settings.grid)?;
        let layer = self.layer(grid.xmin());
        let base_index = self.base_index(&grid, &layer)?;
        let x_base = grid.center(base_index);
        let base = Zone::evaluate(
            eos,
            self.base_density,
            layer.temperature_at(x_base),
            layer.composition_at(x_base)?,
            Regime::Prescribed,
            layer.weight(x_base),
        )?;
        let entropy = eos.evaluate(self.base_density, self.base_temperature, &self.fuel)?.s;
        info!(base_index, x_base, entropy, "atmosphere base located");

        let solver = ZoneSolver::new(eos, settings.zone, settings.floors)?;
        let integrator =
            ProfileIntegrator::new(solver, &grid, settings.gravity, PassOptions::default());
        let mut up = LayerSchedule {
            layer: &layer,
            grid: &grid,
            entropy: Some(entropy),
        };
        let mut down = LayerSchedule {
            layer: &layer,
            grid: &grid,
            entropy: None,
        };
        let profile = integrator.integrate_bidirectional(base_index, base, &mut up, &mut down)?;

        let controls = vec![("base_density".to_string(), self.base_density)];
        Ok(ModelOutcome::new(profile, controls, 1, settings))
    }
}

/// Blend composition; isentropic when an entropy is given, otherwise the
/// temperature follows the blend.
struct LayerSchedule<'a> {
    layer: &'a LayerProfile,
    grid: &'a Grid,
    entropy: Option<f64>,
}

impl ZoneSchedule for LayerSchedule<'_> {
    fn setup(&mut self, index: usize, previous: &Zone) -> ModelResult<ZoneSetup> {
        let x = self.grid.center(index);
        let temperature = self.layer.temperature_at(x);
        let (closure, guess_temperature) = match self.entropy {
            Some(entropy) => (Closure::Isentropic { entropy }, previous.t),
            None => (Closure::Prescribed { temperature }, temperature),
        };
        Ok(ZoneSetup {
            closure,
            composition: self.layer.composition_at(x)?,
            guess_density: previous.rho,
            guess_temperature,
            envelope_fraction: self.layer.weight(x),
        })
    }
}
