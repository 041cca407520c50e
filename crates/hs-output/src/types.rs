//! Result data types.

use serde::{Deserialize, Serialize};

pub type RunId = String;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunManifest {
    pub run_id: RunId,
    pub name: String,
    pub model: String,
    pub timestamp: String,
    pub engine_version: String,
    pub outer_iterations: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub controls: Vec<ControlValue>,
    pub masses_solar: MassSummary,
    pub markers: MarkerSummary,
    pub diagnostics: DiagnosticSummary,
    pub files: OutputFiles,
}

/// Converged value of one mass-matching control parameter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ControlValue {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MassSummary {
    pub core: f64,
    pub envelope: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MarkerSummary {
    pub base_index: usize,
    pub fluff_index: Option<usize>,
    pub convective_index: Option<usize>,
    pub composition_index: Option<usize>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DiagnosticSummary {
    pub max_hse_error: f64,
    pub max_composition_error: f64,
    pub regimes_monotone: bool,
}

/// File names inside the run directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutputFiles {
    pub profile: String,
    pub extras: String,
}

impl From<hs_model::RegionMasses> for MassSummary {
    fn from(masses: hs_model::RegionMasses) -> Self {
        use hs_core::units::{grams, solar_masses};
        Self {
            core: solar_masses(grams(masses.core)),
            envelope: solar_masses(grams(masses.envelope)),
            total: solar_masses(grams(masses.total())),
        }
    }
}

impl From<hs_model::Markers> for MarkerSummary {
    fn from(m: hs_model::Markers) -> Self {
        Self {
            base_index: m.base_index,
            fluff_index: m.fluff_index,
            convective_index: m.convective_index,
            composition_index: m.composition_index,
        }
    }
}

impl From<hs_model::Diagnostics> for DiagnosticSummary {
    fn from(d: hs_model::Diagnostics) -> Self {
        Self {
            max_hse_error: d.max_hse_error,
            max_composition_error: d.max_composition_error,
            regimes_monotone: d.regimes_monotone,
        }
    }
}
