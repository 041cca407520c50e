//! The three model variants, each a configuration of the same engine.
//!
//! A variant decides the seed zone, the per-zone schedule and which masses
//! (if any) the outer secant iteration must match. Everything else (grid,
//! gravity, floors, zone-solver tolerances) is shared in [`EngineSettings`].

mod atmosphere;
mod stellar_core;
mod urca;

pub use atmosphere::{AtmosphereModel, BaseIndexRule};
pub use stellar_core::{EnvelopeLayer, StellarCoreModel};
pub use urca::UrcaModel;

use crate::diagnostics::{Diagnostics, diagnose};
use crate::error::{ModelError, ModelResult};
use crate::mass_match::{MassMatchConfig, StepBounds};
use crate::profile::{Profile, RegionMasses};
use hs_eos::{Composition, EquationOfState, ReactionRates};
use hs_solver::{Floors, GravityModel, GridSpec, ZoneSolverConfig};
use tracing::info;

/// Settings shared by every variant.
#[derive(Clone, Debug)]
pub struct EngineSettings {
    pub grid: GridSpec,
    pub gravity: GravityModel,
    pub floors: Floors,
    pub zone: ZoneSolverConfig,
    pub mass_match: MassMatchConfig,
}

/// A region mass the outer iteration must reproduce.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MassTarget {
    /// Target mass [g].
    pub mass: f64,
    /// Relative tolerance.
    pub tolerance: f64,
    pub bounds: StepBounds,
}

#[derive(Clone, Debug)]
pub enum ModelVariant {
    StellarCore(StellarCoreModel),
    Atmosphere(AtmosphereModel),
    UrcaCore(UrcaModel),
}

impl ModelVariant {
    pub fn name(&self) -> &'static str {
        match self {
            ModelVariant::StellarCore(_) => "stellar_core",
            ModelVariant::Atmosphere(_) => "atmosphere",
            ModelVariant::UrcaCore(_) => "urca_core",
        }
    }
}

/// A finished model with the values the outer iteration settled on.
#[derive(Clone, Debug)]
pub struct ModelOutcome {
    pub profile: Profile,
    /// Final control values, e.g. ("central_density", 2.7e7).
    pub controls: Vec<(String, f64)>,
    pub masses: RegionMasses,
    pub outer_iterations: usize,
    pub diagnostics: Diagnostics,
}

impl ModelOutcome {
    pub(crate) fn new(
        profile: Profile,
        controls: Vec<(String, f64)>,
        outer_iterations: usize,
        settings: &EngineSettings,
    ) -> Self {
        let diagnostics = diagnose(
            &profile,
            &settings.gravity,
            settings.floors.low_density_cutoff,
        );
        let masses = profile.region_masses();
        info!(
            outer_iterations,
            max_hse_error = diagnostics.max_hse_error,
            max_composition_error = diagnostics.max_composition_error,
            regimes_monotone = diagnostics.regimes_monotone,
            "model finished"
        );
        Self {
            profile,
            controls,
            masses,
            outer_iterations,
            diagnostics,
        }
    }

    pub fn control(&self, name: &str) -> Option<f64> {
        self.controls
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }
}

/// Build the model a variant describes.
///
/// `rates` is consulted only by the Urca variant.
pub fn build_model(
    eos: &dyn EquationOfState,
    rates: &dyn ReactionRates,
    settings: &EngineSettings,
    variant: &ModelVariant,
) -> ModelResult<ModelOutcome> {
    info!(variant = variant.name(), eos = eos.name(), zones = settings.grid.zones, "building model");
    match variant {
        ModelVariant::StellarCore(model) => model.build(eos, settings),
        ModelVariant::Atmosphere(model) => model.build(eos, settings),
        ModelVariant::UrcaCore(model) => model.build(eos, rates, settings),
    }
}

/// Fail before integrating if the EOS cannot evaluate a configured mixture.
pub(crate) fn ensure_supported(eos: &dyn EquationOfState, comp: &Composition) -> ModelResult<()> {
    for (species, _) in comp.iter() {
        eos.require_species(species)?;
    }
    Ok(())
}

pub(crate) fn require_positive(what: &str, value: f64) -> ModelResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ModelError::Configuration {
            what: format!("{what} must be positive, got {value}"),
        })
    }
}
