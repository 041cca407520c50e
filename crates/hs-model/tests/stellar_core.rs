//! Integration test: isothermal white-dwarf cores matched to a target mass.
//!
//! Checks:
//! - Outer secant iteration lands within tolerance of the target
//! - Targets spanning two orders of magnitude in central density
//! - Regime flags never revert and fluff is a single contiguous tail
//! - Core + helium envelope matches both masses at once

use hs_core::numeric::relative_error;
use hs_core::units::constants::M_SUN;
use hs_eos::{Composition, GasOptions, Species, StellarGas, ThresholdUrcaRates};
use hs_model::{
    EngineSettings, EnvelopeLayer, MassMatchConfig, MassTarget, ModelError, ModelVariant,
    StellarCoreModel, StepBounds, build_model,
};
use hs_solver::{
    Floors, FluffTemperature, Geometry, GravityModel, GridSpec, Regime, SolverError,
    ZoneSolverConfig,
};

fn settings(zones: usize, temperature_floor: f64) -> EngineSettings {
    EngineSettings {
        grid: GridSpec {
            zones,
            xmin: 0.0,
            xmax: 1.2e9,
            max_zones: 1024,
            geometry: Geometry::Spherical,
        },
        gravity: GravityModel::EnclosedMass,
        floors: Floors {
            low_density_cutoff: 1e-4,
            temperature_floor,
            fluff_temperature: FluffTemperature::Constant,
            convective_density: None,
        },
        zone: ZoneSolverConfig {
            max_iterations: 1000,
            ..ZoneSolverConfig::default()
        },
        mass_match: MassMatchConfig {
            max_iterations: 250,
        },
    }
}

fn carbon_core(solar_masses: f64) -> StellarCoreModel {
    StellarCoreModel {
        core: Composition::pure(Species::C12),
        core_temperature: 5e7,
        central_density: 1e9,
        core_mass: MassTarget {
            mass: solar_masses * M_SUN,
            tolerance: 1e-3,
            bounds: StepBounds::DENSITY,
        },
        envelope: None,
    }
}

#[test]
fn one_solar_mass_carbon_core() {
    let eos = StellarGas::default();
    let rates = ThresholdUrcaRates::default();
    let settings = settings(256, 5e7);
    let outcome = build_model(
        &eos,
        &rates,
        &settings,
        &ModelVariant::StellarCore(carbon_core(1.0)),
    )
    .unwrap();

    assert!(relative_error(outcome.masses.core, M_SUN) < 1e-3);
    assert!(outcome.outer_iterations > 2);
    let rho_c = outcome.control("central_density").unwrap();
    assert!(rho_c > 1e7 && rho_c < 1e8, "central density {rho_c}");

    let d = outcome.diagnostics;
    assert!(d.regimes_monotone);
    assert!(d.max_hse_error < 1e-8, "HSE error {}", d.max_hse_error);
    assert!(d.max_composition_error < 1e-10);

    let profile = &outcome.profile;
    assert!(profile.regimes().all(|r| r != Regime::Isothermal));
    let fluff = profile.markers().fluff_index.expect("star should end inside the grid");
    for zone in &profile.zones()[fluff..] {
        assert_eq!(zone.regime, Regime::Fluff);
        assert_eq!(zone.rho, 1e-4);
        assert_eq!(zone.t, 5e7);
    }
    assert!(profile.zones()[..fluff].iter().all(|z| z.regime == Regime::Prescribed));
    assert!(profile.enclosed_mass().windows(2).all(|w| w[1] >= w[0]));
}

#[test]
fn targets_span_two_decades_of_central_density() {
    let eos = StellarGas::default();
    let rates = ThresholdUrcaRates::default();
    let settings = settings(256, 5e7);

    let mut central = Vec::new();
    for target in [0.6, 1.3] {
        let outcome = build_model(
            &eos,
            &rates,
            &settings,
            &ModelVariant::StellarCore(carbon_core(target)),
        )
        .unwrap();
        assert!(relative_error(outcome.masses.core, target * M_SUN) < 1e-3);
        assert!(outcome.diagnostics.regimes_monotone);
        central.push(outcome.control("central_density").unwrap());
    }
    assert!(central[1] / central[0] > 100.0, "central densities {central:?}");
}

#[test]
fn core_with_helium_envelope_matches_both_masses() {
    let eos = StellarGas::default();
    let rates = ThresholdUrcaRates::default();
    let settings = settings(512, 1e6);
    let model = StellarCoreModel {
        core: Composition::from_mass_fractions(&[(Species::C12, 0.5), (Species::O16, 0.5)])
            .unwrap(),
        core_temperature: 5e7,
        central_density: 1e9,
        core_mass: MassTarget {
            mass: 0.9 * M_SUN,
            tolerance: 1e-3,
            bounds: StepBounds::DENSITY,
        },
        envelope: Some(EnvelopeLayer {
            composition: Composition::pure(Species::He4),
            base_temperature: 2e8,
            width: 2.0 * 1.2e9 / 512.0,
            mass: MassTarget {
                mass: 0.05 * M_SUN,
                tolerance: 5e-2,
                bounds: StepBounds::TRANSITION,
            },
            transition_fraction: 0.5,
            isothermal: false,
        }),
    };

    let outcome = build_model(&eos, &rates, &settings, &ModelVariant::StellarCore(model)).unwrap();
    assert!(relative_error(outcome.masses.core, 0.9 * M_SUN) < 1e-3);
    assert!(relative_error(outcome.masses.envelope, 0.05 * M_SUN) < 5e-2);
    assert!(outcome.control("transition_density").unwrap() < outcome.control("central_density").unwrap());

    let profile = &outcome.profile;
    let layer = profile.markers().composition_index.expect("envelope should start");
    let fluff = profile.markers().fluff_index.expect("envelope should end inside the grid");
    assert!(layer < fluff);
    assert!(profile.zones()[..layer].iter().all(|z| z.envelope_fraction == 0.0));
    let top = &profile.zones()[fluff - 1];
    assert_eq!(top.envelope_fraction, 1.0);
    assert_eq!(top.composition.mass_fraction(Species::He4), 1.0);
    assert!(profile.zones().iter().any(|z| z.regime == Regime::Isentropic));
    assert!(outcome.diagnostics.regimes_monotone);
    assert!(outcome.diagnostics.max_hse_error < 1e-8);
    assert!(outcome.diagnostics.max_composition_error < 1e-10);
}

#[test]
fn grid_larger_than_buffer_is_rejected() {
    let eos = StellarGas::default();
    let rates = ThresholdUrcaRates::default();
    let mut settings = settings(256, 5e7);
    settings.grid.max_zones = 128;
    let result = build_model(
        &eos,
        &rates,
        &settings,
        &ModelVariant::StellarCore(carbon_core(1.0)),
    );
    assert!(matches!(
        result,
        Err(ModelError::Solver(SolverError::Configuration { .. }))
    ));
}

#[test]
fn species_outside_network_is_rejected_before_integrating() {
    let eos = StellarGas::with_network(GasOptions::default(), vec![Species::He4]);
    let rates = ThresholdUrcaRates::default();
    let result = build_model(
        &eos,
        &rates,
        &settings(256, 5e7),
        &ModelVariant::StellarCore(carbon_core(1.0)),
    );
    assert!(matches!(
        result,
        Err(ModelError::Eos(hs_eos::EosError::UnsupportedSpecies { .. }))
    ));
}
