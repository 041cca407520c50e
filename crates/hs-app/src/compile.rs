//! Compilation of a validated run file into engine inputs.

use hs_config::{
    BaseRuleDef, BoundsDef, CompositionDef, ConvergenceDef, EnvelopeDef, FluffTemperatureDef,
    GeometryDef, GravityDef, MassTargetDef, ModelDef, RunFile,
};
use hs_core::units::constants::M_SUN;
use hs_eos::{Composition, GasOptions, Species, StellarGas};
use hs_model::{
    AtmosphereModel, BaseIndexRule, EngineSettings, EnvelopeLayer, EquilibriumSettings,
    MassMatchConfig, MassTarget, ModelVariant, StellarCoreModel, StepBounds, UrcaModel,
};
use hs_solver::{
    ConvergenceTest, Floors, FluffTemperature, Geometry, GravityModel, GridSpec, RetryPolicy,
    ZoneSolverConfig,
};
use std::str::FromStr;

use crate::error::{AppError, AppResult};

/// Everything the engine needs for one run.
pub struct CompiledRun {
    pub eos: StellarGas,
    pub settings: EngineSettings,
    pub variant: ModelVariant,
}

pub fn compile_run(run: &RunFile) -> AppResult<CompiledRun> {
    let eos = StellarGas::new(GasOptions {
        coulomb_corrections: run.eos.coulomb_corrections,
    });

    let settings = EngineSettings {
        grid: GridSpec {
            zones: run.grid.zones,
            xmin: run.grid.xmin,
            xmax: run.grid.xmax,
            max_zones: run.grid.max_zones,
            geometry: match run.grid.geometry {
                GeometryDef::Spherical => Geometry::Spherical,
                GeometryDef::Planar => Geometry::Planar,
            },
        },
        gravity: match run.gravity {
            GravityDef::EnclosedMass => GravityModel::EnclosedMass,
            GravityDef::PointMass { mass_solar } => GravityModel::PointMass {
                mass: mass_solar * M_SUN,
            },
            GravityDef::Constant { acceleration } => GravityModel::Constant {
                accel: acceleration,
            },
        },
        floors: Floors {
            low_density_cutoff: run.floors.low_density_cutoff,
            temperature_floor: run.floors.temperature_floor,
            fluff_temperature: match run.floors.fluff_temperature {
                FluffTemperatureDef::Constant => FluffTemperature::Constant,
                FluffTemperatureDef::Continuous => FluffTemperature::Continuous,
            },
            convective_density: None,
        },
        zone: ZoneSolverConfig {
            tolerance: run.solver.tolerance,
            max_iterations: run.solver.max_iterations,
            damping: run.solver.damping,
            test: match run.solver.convergence {
                ConvergenceDef::Step => ConvergenceTest::StepSize,
                ConvergenceDef::Residual => ConvergenceTest::Residual,
            },
            retry: run.solver.retry.as_ref().map(|r| RetryPolicy {
                max_retries: r.max_retries,
                relax_factor: r.relax_factor,
            }),
        },
        mass_match: MassMatchConfig {
            max_iterations: run.mass_match.max_iterations,
        },
    };

    let variant = compile_model(&run.model)?;
    Ok(CompiledRun {
        eos,
        settings,
        variant,
    })
}

fn compile_model(model: &ModelDef) -> AppResult<ModelVariant> {
    let variant = match model {
        ModelDef::StellarCore {
            core,
            core_temperature,
            central_density,
            core_mass,
            envelope,
        } => ModelVariant::StellarCore(StellarCoreModel {
            core: parse_composition(core)?,
            core_temperature: *core_temperature,
            central_density: *central_density,
            core_mass: mass_target(core_mass, StepBounds::DENSITY),
            envelope: envelope.as_ref().map(envelope_layer).transpose()?,
        }),
        ModelDef::Atmosphere {
            star,
            fuel,
            star_temperature,
            base_temperature,
            base_density,
            layer_height,
            width,
            base_rule,
        } => ModelVariant::Atmosphere(AtmosphereModel {
            star: parse_composition(star)?,
            fuel: parse_composition(fuel)?,
            star_temperature: *star_temperature,
            base_temperature: *base_temperature,
            base_density: *base_density,
            layer_height: *layer_height,
            width: *width,
            base_rule: match base_rule {
                BaseRuleDef::Height => BaseIndexRule::Height,
                BaseRuleDef::Temperature => BaseIndexRule::Temperature,
            },
        }),
        ModelDef::UrcaCore {
            c12,
            o16,
            pair_total,
            central_density,
            central_temperature,
            convective_density,
            convective_mass_solar,
            equilibrium,
            mass,
        } => ModelVariant::UrcaCore(UrcaModel {
            c12: *c12,
            o16: *o16,
            pair_total: *pair_total,
            central_density: *central_density,
            central_temperature: *central_temperature,
            convective_density: *convective_density,
            convective_mass: convective_mass_solar.map(|m| m * M_SUN),
            equilibrium: EquilibriumSettings {
                tolerance: equilibrium.tolerance,
                max_iterations: equilibrium.max_iterations,
                floor: equilibrium.floor,
            },
            mass: mass
                .as_ref()
                .map(|m| mass_target(m, StepBounds::DENSITY)),
        }),
    };
    Ok(variant)
}

fn envelope_layer(def: &EnvelopeDef) -> AppResult<EnvelopeLayer> {
    Ok(EnvelopeLayer {
        composition: parse_composition(&def.composition)?,
        base_temperature: def.base_temperature,
        width: def.width,
        mass: mass_target(&def.mass, StepBounds::TRANSITION),
        transition_fraction: def.transition_fraction,
        isothermal: def.isothermal,
    })
}

fn mass_target(def: &MassTargetDef, default_bounds: StepBounds) -> MassTarget {
    MassTarget {
        mass: def.mass_solar * M_SUN,
        tolerance: def.tolerance,
        bounds: def
            .bounds
            .as_ref()
            .map(|BoundsDef { lower, upper }| StepBounds {
                lower: *lower,
                upper: *upper,
            })
            .unwrap_or(default_bounds),
    }
}

/// Resolve species names and build a normalized composition.
pub fn parse_composition(def: &CompositionDef) -> AppResult<Composition> {
    let mut fractions = Vec::with_capacity(def.len());
    for (name, &fraction) in def {
        let species = Species::from_str(name)
            .map_err(|_| AppError::Compile(format!("Unknown species: {name}")))?;
        if fractions.iter().any(|(s, _)| *s == species) {
            return Err(AppError::Compile(format!(
                "Species {species} listed more than once"
            )));
        }
        fractions.push((species, fraction));
    }
    Ok(Composition::from_mass_fractions(&fractions)?)
}
