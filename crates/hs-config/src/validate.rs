//! Structural validation of run files.
//!
//! Species names are resolved later, when the run file is compiled against
//! an equation of state; everything checkable from the file alone is
//! checked here.

use crate::schema::{
    BoundsDef, CompositionDef, EnvelopeDef, EquilibriumDef, GravityDef, MassTargetDef, ModelDef,
    RunFile,
};

pub const LATEST_VERSION: u32 = 1;

/// Allowed deviation of a composition from unit sum.
pub const COMPOSITION_SUM_TOLERANCE: f64 = 1e-8;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid composition in {field}: {reason}")]
    InvalidComposition { field: String, reason: String },

    #[error("Unsupported feature: {feature} - {reason}")]
    Unsupported { feature: String, reason: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn positive(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must be positive"))
    }
}

fn at_least_one(field: &str, value: usize) -> Result<(), ValidationError> {
    if value == 0 {
        Err(invalid(field, value, "must be at least 1"))
    } else {
        Ok(())
    }
}

fn fraction(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidComposition {
            field: field.to_string(),
            reason: format!("fraction {value} outside [0, 1]"),
        })
    }
}

fn unit_sum(field: &str, sum: f64) -> Result<(), ValidationError> {
    if (sum - 1.0).abs() > COMPOSITION_SUM_TOLERANCE {
        return Err(ValidationError::InvalidComposition {
            field: field.to_string(),
            reason: format!("fractions sum to {sum}"),
        });
    }
    Ok(())
}

pub fn validate_run_file(run: &RunFile) -> Result<(), ValidationError> {
    if run.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: run.version,
        });
    }
    if run.name.trim().is_empty() {
        return Err(invalid("name", "\"\"", "must not be empty"));
    }

    let grid = &run.grid;
    at_least_one("grid.zones", grid.zones)?;
    if grid.zones > grid.max_zones {
        return Err(invalid(
            "grid.zones",
            grid.zones,
            &format!("exceeds buffer capacity max_zones = {}", grid.max_zones),
        ));
    }
    if !(grid.xmin.is_finite() && grid.xmax.is_finite()) || grid.xmax <= grid.xmin {
        return Err(invalid("grid.xmax", grid.xmax, "must exceed grid.xmin"));
    }
    if grid.xmin < 0.0 {
        return Err(invalid("grid.xmin", grid.xmin, "must not be negative"));
    }

    match run.gravity {
        GravityDef::EnclosedMass => {}
        GravityDef::PointMass { mass_solar } => positive("gravity.mass_solar", mass_solar)?,
        GravityDef::Constant { acceleration } => {
            if !acceleration.is_finite() || acceleration == 0.0 {
                return Err(invalid(
                    "gravity.acceleration",
                    acceleration,
                    "must be finite and non-zero",
                ));
            }
        }
    }

    positive("floors.low_density_cutoff", run.floors.low_density_cutoff)?;
    positive("floors.temperature_floor", run.floors.temperature_floor)?;

    let solver = &run.solver;
    positive("solver.tolerance", solver.tolerance)?;
    at_least_one("solver.max_iterations", solver.max_iterations)?;
    if !(solver.damping > 0.0 && solver.damping < 1.0) {
        return Err(invalid("solver.damping", solver.damping, "must lie in (0, 1)"));
    }
    if let Some(retry) = &solver.retry {
        if !(retry.relax_factor.is_finite() && retry.relax_factor >= 1.0) {
            return Err(invalid(
                "solver.retry.relax_factor",
                retry.relax_factor,
                "must be at least 1",
            ));
        }
    }
    at_least_one("mass_match.max_iterations", run.mass_match.max_iterations)?;

    validate_model(&run.model, &run.gravity)
}

fn validate_model(model: &ModelDef, gravity: &GravityDef) -> Result<(), ValidationError> {
    match model {
        ModelDef::StellarCore {
            core,
            core_temperature,
            central_density,
            core_mass,
            envelope,
        } => {
            validate_composition("model.core", core)?;
            positive("model.core_temperature", *core_temperature)?;
            positive("model.central_density", *central_density)?;
            validate_mass_target("model.core_mass", core_mass)?;
            if let Some(envelope) = envelope {
                validate_envelope(envelope)?;
            }
        }
        ModelDef::Atmosphere {
            star,
            fuel,
            star_temperature,
            base_temperature,
            base_density,
            layer_height,
            width,
            ..
        } => {
            if matches!(gravity, GravityDef::EnclosedMass) {
                return Err(ValidationError::Unsupported {
                    feature: "enclosed_mass gravity".to_string(),
                    reason: "the atmosphere integrates from an interior base; use point_mass or constant"
                        .to_string(),
                });
            }
            validate_composition("model.star", star)?;
            validate_composition("model.fuel", fuel)?;
            positive("model.star_temperature", *star_temperature)?;
            positive("model.base_temperature", *base_temperature)?;
            positive("model.base_density", *base_density)?;
            positive("model.layer_height", *layer_height)?;
            positive("model.width", *width)?;
        }
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
        } => {
            fraction("model.c12", *c12)?;
            fraction("model.o16", *o16)?;
            fraction("model.pair_total", *pair_total)?;
            unit_sum("model", c12 + o16 + pair_total)?;
            positive("model.central_density", *central_density)?;
            positive("model.central_temperature", *central_temperature)?;
            if let Some(rho) = convective_density {
                positive("model.convective_density", *rho)?;
            }
            if let Some(m) = convective_mass_solar {
                positive("model.convective_mass_solar", *m)?;
            }
            validate_equilibrium(equilibrium)?;
            if let Some(target) = mass {
                validate_mass_target("model.mass", target)?;
            }
        }
    }
    Ok(())
}

fn validate_composition(field: &str, comp: &CompositionDef) -> Result<(), ValidationError> {
    if comp.is_empty() {
        return Err(ValidationError::InvalidComposition {
            field: field.to_string(),
            reason: "no species given".to_string(),
        });
    }
    for (species, x) in comp {
        fraction(&format!("{field}.{species}"), *x)?;
    }
    unit_sum(field, comp.values().sum())
}

fn validate_mass_target(field: &str, target: &MassTargetDef) -> Result<(), ValidationError> {
    positive(&format!("{field}.mass_solar"), target.mass_solar)?;
    positive(&format!("{field}.tolerance"), target.tolerance)?;
    if let Some(BoundsDef { lower, upper }) = target.bounds {
        if !(lower > 0.0 && lower < 1.0) {
            return Err(invalid(&format!("{field}.bounds.lower"), lower, "must lie in (0, 1)"));
        }
        if !(upper.is_finite() && upper > 1.0) {
            return Err(invalid(&format!("{field}.bounds.upper"), upper, "must exceed 1"));
        }
    }
    Ok(())
}

fn validate_envelope(envelope: &EnvelopeDef) -> Result<(), ValidationError> {
    validate_composition("model.envelope.composition", &envelope.composition)?;
    positive("model.envelope.base_temperature", envelope.base_temperature)?;
    positive("model.envelope.width", envelope.width)?;
    validate_mass_target("model.envelope.mass", &envelope.mass)?;
    let f = envelope.transition_fraction;
    if !(f > 0.0 && f <= 1.0) {
        return Err(invalid(
            "model.envelope.transition_fraction",
            f,
            "must lie in (0, 1]",
        ));
    }
    Ok(())
}

fn validate_equilibrium(eq: &EquilibriumDef) -> Result<(), ValidationError> {
    positive("model.equilibrium.tolerance", eq.tolerance)?;
    at_least_one("model.equilibrium.max_iterations", eq.max_iterations)?;
    positive("model.equilibrium.floor", eq.floor)
}
