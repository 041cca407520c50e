//! Hydrostatic initial-model builder.
//!
//! Provides:
//! - Composition builder (tanh layer blend, Urca-pair equilibrium split)
//! - Profile integrator driving the zone solver outward or both ways
//! - Secant mass matching over central and transition densities
//! - Post-hoc diagnostics (HSE residual, normalization, regime order)
//! - The three model variants as configurations of one engine:
//!   stellar core with optional envelope, boundary-layer atmosphere and an
//!   equilibrium Urca core

pub mod composition;
pub mod diagnostics;
pub mod error;
pub mod integrator;
pub mod mass_match;
pub mod profile;
pub mod variant;

pub use composition::{EquilibriumComposition, EquilibriumSettings, LayerProfile, TanhBlend};
pub use diagnostics::{Diagnostics, diagnose, max_hse_error, regime_is_monotone};
pub use error::{ModelError, ModelResult};
pub use integrator::{PassOptions, ProfileIntegrator, ZoneSchedule, ZoneSetup};
pub use mass_match::{
    ControlParameter, MassMatchConfig, MassMatchOutcome, MassMatcher, StepBounds, secant_update,
};
pub use profile::{Markers, Profile, RegionMasses, Zone};
pub use variant::{
    AtmosphereModel, BaseIndexRule, EngineSettings, EnvelopeLayer, MassTarget, ModelOutcome,
    ModelVariant, StellarCoreModel, UrcaModel, build_model,
};
