//! Smoke tests of the reference gas across the regimes the model builder visits.

use hs_eos::{Composition, EquationOfState, GasOptions, Species, StellarGas};

#[test]
fn state_is_physical_from_core_to_fluff() {
    let gas = StellarGas::new(GasOptions::default());
    let comps = [
        Composition::pure(Species::C12),
        Composition::pure(Species::He4),
        Composition::pure(Species::Fe56),
    ];
    for comp in &comps {
        for &rho in &[1e-4, 1.0, 1e4, 1e7, 1e9, 5e9] {
            for &t in &[1e6, 5e7, 6e8] {
                let state = gas.evaluate(rho, t, comp).unwrap();
                assert!(state.p > 0.0);
                assert!(state.cs > 0.0);
                assert!(state.dpdr > 0.0);
                assert!(state.dpdt > 0.0);
                assert!(state.dsdr < 0.0);
                assert!(state.dsdt > 0.0);
            }
        }
    }
}

#[test]
fn entropy_falls_with_density_at_fixed_temperature() {
    let gas = StellarGas::default();
    let comp = Composition::pure(Species::He4);
    let lo = gas.evaluate(1e3, 2e8, &comp).unwrap();
    let hi = gas.evaluate(1e5, 2e8, &comp).unwrap();
    assert!(hi.s < lo.s);
}

#[test]
fn evaluation_is_deterministic() {
    let gas = StellarGas::default();
    let comp =
        Composition::from_mass_fractions(&[(Species::C12, 0.5), (Species::O16, 0.5)]).unwrap();
    let a = gas.evaluate(3.3e7, 4.2e7, &comp).unwrap();
    let b = gas.evaluate(3.3e7, 4.2e7, &comp).unwrap();
    assert_eq!(a, b);
}
