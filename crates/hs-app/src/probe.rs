//! One-off equation-of-state evaluation for the CLI `eos` command.

use hs_config::CompositionDef;
use hs_eos::{Composition, EosState, EquationOfState, GasOptions, StellarGas};

use crate::compile::parse_composition;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct EosProbe {
    pub composition: Composition,
    pub state: EosState,
    pub abar: f64,
    pub ye: f64,
}

/// Evaluate the gas at one (density, temperature, composition) point.
///
/// `species` holds `KEY=X` pairs as typed on the command line.
pub fn probe_eos(
    density: f64,
    temperature: f64,
    species: &[String],
    options: GasOptions,
) -> AppResult<EosProbe> {
    let mut def = CompositionDef::new();
    for entry in species {
        let (key, value) = entry
            .split_once('=')
            .ok_or_else(|| AppError::InvalidInput(format!("Expected KEY=X, got '{entry}'")))?;
        let fraction: f64 = value.trim().parse().map_err(|_| {
            AppError::InvalidInput(format!("Mass fraction is not a number: '{value}'"))
        })?;
        def.insert(key.trim().to_string(), fraction);
    }
    if def.is_empty() {
        return Err(AppError::InvalidInput(
            "At least one species is required".to_string(),
        ));
    }

    let composition = parse_composition(&def)?;
    let eos = StellarGas::new(options);
    let state = eos.evaluate(density, temperature, &composition)?;
    Ok(EosProbe {
        composition,
        state,
        abar: composition.abar(),
        ye: composition.ye(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hs_eos::Species;

    #[test]
    fn probes_pure_carbon() {
        let probe = probe_eos(
            1e7,
            1e8,
            &["C12=1.0".to_string()],
            GasOptions::default(),
        )
        .unwrap();
        assert_eq!(probe.composition.mass_fraction(Species::C12), 1.0);
        assert!((probe.abar - 12.0).abs() < 1e-12);
        assert!((probe.ye - 0.5).abs() < 1e-12);
        assert!(probe.state.p > 0.0 && probe.state.cs > 0.0);
    }

    #[test]
    fn malformed_pairs_are_rejected() {
        let opts = GasOptions::default();
        assert!(matches!(
            probe_eos(1e7, 1e8, &["C12".to_string()], opts),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            probe_eos(1e7, 1e8, &["C12=half".to_string()], opts),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            probe_eos(1e7, 1e8, &[], opts),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn non_physical_state_reports_eos_error() {
        let result = probe_eos(-1.0, 1e8, &["He4=1".to_string()], GasOptions::default());
        assert!(matches!(result, Err(AppError::Eos(_))));
    }
}
