//! Integration test: convective C/O core with an Na23/Ne23 pair in equilibrium.

use hs_core::numeric::relative_error;
use hs_core::units::constants::M_SUN;
use hs_eos::{GasOptions, Species, StellarGas, ThresholdUrcaRates};
use hs_model::{
    EngineSettings, EquilibriumSettings, MassMatchConfig, MassTarget, ModelError, ModelVariant,
    StepBounds, UrcaModel, build_model,
};
use hs_solver::{
    ConvergenceTest, Floors, FluffTemperature, Geometry, GravityModel, GridSpec, Regime,
    RetryPolicy, ZoneSolverConfig,
};

fn settings() -> EngineSettings {
    EngineSettings {
        grid: GridSpec {
            zones: 256,
            xmin: 0.0,
            xmax: 3e8,
            max_zones: 256,
            geometry: Geometry::Spherical,
        },
        gravity: GravityModel::EnclosedMass,
        floors: Floors {
            low_density_cutoff: 1e-4,
            temperature_floor: 1e7,
            fluff_temperature: FluffTemperature::Continuous,
            convective_density: None,
        },
        zone: ZoneSolverConfig {
            tolerance: 1e-11,
            max_iterations: 200,
            damping: 0.1,
            test: ConvergenceTest::Residual,
            retry: Some(RetryPolicy {
                max_retries: 50,
                relax_factor: 1.1,
            }),
        },
        mass_match: MassMatchConfig::default(),
    }
}

fn urca_core() -> UrcaModel {
    UrcaModel {
        c12: 0.4,
        o16: 0.5995,
        pair_total: 5e-4,
        central_density: 4.5e9,
        central_temperature: 6e8,
        convective_density: None,
        convective_mass: None,
        equilibrium: EquilibriumSettings::default(),
        mass: None,
    }
}

#[test]
fn isentropic_core_with_equilibrium_pair() {
    let eos = StellarGas::default();
    let rates = ThresholdUrcaRates::default();
    let outcome = build_model(&eos, &rates, &settings(), &ModelVariant::UrcaCore(urca_core()))
        .unwrap();
    let profile = &outcome.profile;
    let markers = profile.markers();

    assert_eq!(markers.fluff_index, Some(140));
    assert_eq!(markers.convective_index, Some(116));
    assert!(relative_error(profile.total_mass(), 1.4244 * M_SUN) < 1e-3);

    let zones = profile.zones();
    assert!(zones[..116].iter().all(|z| z.regime == Regime::Isentropic));
    let s0 = zones[0].s;
    assert!(zones[..116].iter().all(|z| ((z.s - s0) / s0).abs() < 1e-6));

    // Continuous fluff keeps the last solid temperature.
    let last_solid = zones[139].t;
    assert!(zones[140..].iter().all(|z| z.t == last_solid && z.rho == 1e-4));

    // Captures win at the centre, decays in the outer core.
    let centre = &zones[0].composition;
    assert!(centre.mass_fraction(Species::Ne23) > centre.mass_fraction(Species::Na23));
    let outer = &zones[130].composition;
    assert!(outer.mass_fraction(Species::Na23) > outer.mass_fraction(Species::Ne23));
    for z in zones {
        let pair = z.composition.mass_fraction(Species::Na23)
            + z.composition.mass_fraction(Species::Ne23);
        assert!((pair - 5e-4).abs() < 1e-12);
        assert!((z.composition.mass_fraction(Species::C12) - 0.4).abs() < 1e-12);
    }

    let d = outcome.diagnostics;
    assert!(d.regimes_monotone);
    assert!(d.max_hse_error < 1e-8, "HSE error {}", d.max_hse_error);
    assert!(d.max_composition_error < 1e-10);
}

#[test]
fn central_density_matched_to_total_mass() {
    let eos = StellarGas::default();
    let rates = ThresholdUrcaRates::default();
    let model = UrcaModel {
        mass: Some(MassTarget {
            mass: 1.40 * M_SUN,
            tolerance: 1e-3,
            bounds: StepBounds::DENSITY,
        }),
        ..urca_core()
    };
    let outcome = build_model(&eos, &rates, &settings(), &ModelVariant::UrcaCore(model)).unwrap();
    assert!(relative_error(outcome.masses.total(), 1.40 * M_SUN) < 1e-3);
    assert!(outcome.outer_iterations > 1);
    let rho_c = outcome.control("central_density").unwrap();
    assert!(rho_c < 4.5e9 && rho_c > 1e9, "central density {rho_c}");
}

#[test]
fn convective_mass_threshold_latches_isothermal() {
    let eos = StellarGas::default();
    let rates = ThresholdUrcaRates::default();
    let model = UrcaModel {
        convective_mass: Some(0.5 * M_SUN),
        ..urca_core()
    };
    let outcome = build_model(&eos, &rates, &settings(), &ModelVariant::UrcaCore(model)).unwrap();
    let profile = &outcome.profile;
    let ic = profile
        .markers()
        .convective_index
        .expect("threshold lies inside the core");
    assert!(ic < 116);
    assert!(profile.enclosed_mass()[ic] > 0.5 * M_SUN);
    assert!(profile.enclosed_mass()[ic - 1] <= 0.5 * M_SUN);
    let t_latched = profile.zones()[ic].t;
    let fluff = profile.markers().fluff_index.unwrap_or(profile.len());
    for z in &profile.zones()[ic + 1..fluff] {
        assert_eq!(z.regime, Regime::Isothermal);
        assert_eq!(z.t, t_latched);
    }
    assert!(outcome.diagnostics.regimes_monotone);
}

#[test]
fn missing_daughter_is_reported_before_integrating() {
    let eos = StellarGas::with_network(
        GasOptions::default(),
        vec![Species::C12, Species::O16, Species::Na23],
    );
    let rates = ThresholdUrcaRates::default();
    let result = build_model(&eos, &rates, &settings(), &ModelVariant::UrcaCore(urca_core()));
    assert!(matches!(
        result,
        Err(ModelError::Eos(hs_eos::EosError::UnsupportedSpecies {
            species: Species::Ne23,
            ..
        }))
    ));
}
