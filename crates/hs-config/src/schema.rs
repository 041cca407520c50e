//! Run-file schema definitions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mass fractions keyed by species name ("C12" or "carbon-12").
pub type CompositionDef = BTreeMap<String, f64>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunFile {
    pub version: u32,
    pub name: String,
    pub grid: GridDef,
    #[serde(default)]
    pub eos: EosDef,
    pub gravity: GravityDef,
    #[serde(default)]
    pub floors: FloorsDef,
    #[serde(default)]
    pub solver: SolverDef,
    #[serde(default)]
    pub mass_match: MassMatchDef,
    pub model: ModelDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GridDef {
    pub zones: usize,
    #[serde(default)]
    pub xmin: f64,
    pub xmax: f64,
    #[serde(default = "default_max_zones")]
    pub max_zones: usize,
    #[serde(default)]
    pub geometry: GeometryDef,
}

fn default_max_zones() -> usize {
    4096
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GeometryDef {
    #[default]
    Spherical,
    Planar,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EosDef {
    #[serde(default)]
    pub coulomb_corrections: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GravityDef {
    /// -G m(r) / r^2 with the mass enclosed so far.
    EnclosedMass,
    /// -G M / r^2 with a fixed mass in solar units.
    PointMass { mass_solar: f64 },
    /// Fixed acceleration [cm/s^2], negative = pointing inward.
    Constant { acceleration: f64 },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FloorsDef {
    #[serde(default = "default_low_density_cutoff")]
    pub low_density_cutoff: f64,
    #[serde(default = "default_temperature_floor")]
    pub temperature_floor: f64,
    #[serde(default)]
    pub fluff_temperature: FluffTemperatureDef,
}

impl Default for FloorsDef {
    fn default() -> Self {
        Self {
            low_density_cutoff: default_low_density_cutoff(),
            temperature_floor: default_temperature_floor(),
            fluff_temperature: FluffTemperatureDef::default(),
        }
    }
}

fn default_low_density_cutoff() -> f64 {
    1e-4
}

fn default_temperature_floor() -> f64 {
    1e7
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FluffTemperatureDef {
    #[default]
    Constant,
    Continuous,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SolverDef {
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    #[serde(default = "default_damping")]
    pub damping: f64,
    #[serde(default)]
    pub convergence: ConvergenceDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry: Option<RetryDef>,
}

impl Default for SolverDef {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            max_iterations: default_max_iterations(),
            damping: default_damping(),
            convergence: ConvergenceDef::default(),
            retry: None,
        }
    }
}

fn default_tolerance() -> f64 {
    1e-10
}

fn default_max_iterations() -> usize {
    250
}

fn default_damping() -> f64 {
    0.1
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConvergenceDef {
    #[default]
    Step,
    Residual,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetryDef {
    pub max_retries: usize,
    pub relax_factor: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MassMatchDef {
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

impl Default for MassMatchDef {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MassTargetDef {
    pub mass_solar: f64,
    pub tolerance: f64,
    /// Per-iteration multiplicative step limits; the parameter's usual
    /// bounds apply when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<BoundsDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoundsDef {
    pub lower: f64,
    pub upper: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnvelopeDef {
    pub composition: CompositionDef,
    pub base_temperature: f64,
    /// Tanh blend width [cm].
    pub width: f64,
    pub mass: MassTargetDef,
    #[serde(default = "default_transition_fraction")]
    pub transition_fraction: f64,
    #[serde(default)]
    pub isothermal: bool,
}

fn default_transition_fraction() -> f64 {
    0.5
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BaseRuleDef {
    #[default]
    Height,
    Temperature,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EquilibriumDef {
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    #[serde(default = "default_equilibrium_iterations")]
    pub max_iterations: usize,
    #[serde(default = "default_abundance_floor")]
    pub floor: f64,
}

impl Default for EquilibriumDef {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            max_iterations: default_equilibrium_iterations(),
            floor: default_abundance_floor(),
        }
    }
}

fn default_equilibrium_iterations() -> usize {
    50
}

fn default_abundance_floor() -> f64 {
    1e-30
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelDef {
    StellarCore {
        core: CompositionDef,
        core_temperature: f64,
        central_density: f64,
        core_mass: MassTargetDef,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        envelope: Option<EnvelopeDef>,
    },
    Atmosphere {
        star: CompositionDef,
        fuel: CompositionDef,
        star_temperature: f64,
        base_temperature: f64,
        base_density: f64,
        layer_height: f64,
        width: f64,
        #[serde(default)]
        base_rule: BaseRuleDef,
    },
    UrcaCore {
        c12: f64,
        o16: f64,
        pair_total: f64,
        central_density: f64,
        central_temperature: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        convective_density: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        convective_mass_solar: Option<f64>,
        #[serde(default)]
        equilibrium: EquilibriumDef,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mass: Option<MassTargetDef>,
    },
}

impl ModelDef {
    pub fn kind(&self) -> &'static str {
        match self {
            ModelDef::StellarCore { .. } => "stellar_core",
            ModelDef::Atmosphere { .. } => "atmosphere",
            ModelDef::UrcaCore { .. } => "urca_core",
        }
    }
}
