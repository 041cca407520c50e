//! Post-hoc checks of a finished profile. Not used by the solve itself.

use crate::profile::Profile;
use hs_solver::{GravityModel, Regime};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Diagnostics {
    /// Max relative mismatch between the pressure gradient and rho * g.
    pub max_hse_error: f64,
    /// Max |sum(X) - 1| over all zones.
    pub max_composition_error: f64,
    pub regimes_monotone: bool,
}

/// Maximum over interior zones of |dp/dx - rho g| / |dp/dx|.
///
/// Zones whose outer neighbour sits on the density floor are skipped, as
/// are zones with a flat pressure gradient.
pub fn max_hse_error(profile: &Profile, gravity: &GravityModel, density_floor: f64) -> f64 {
    let grid = profile.grid();
    let zones = profile.zones();
    let enclosed = profile.enclosed_mass();
    let n = zones.len();

    (1..n.saturating_sub(1))
        .filter(|&i| zones[i + 1].rho > density_floor)
        .filter_map(|i| {
            let g = gravity.acceleration(grid.left(i), enclosed[i - 1]);
            let dpdx = (zones[i].p - zones[i - 1].p) / (grid.center(i) - grid.center(i - 1));
            let rho_g = 0.5 * (zones[i].rho + zones[i - 1].rho) * g;
            (dpdx != 0.0).then(|| ((dpdx - rho_g) / dpdx).abs())
        })
        .fold(0.0, f64::max)
}

/// True if the flags never decrease along the sequence.
pub fn regime_is_monotone(regimes: impl IntoIterator<Item = Regime>) -> bool {
    let mut highest = Regime::Prescribed;
    for regime in regimes {
        if regime < highest {
            return false;
        }
        highest = highest.max(regime);
    }
    true
}

pub fn max_composition_error(profile: &Profile) -> f64 {
    profile
        .zones()
        .iter()
        .map(|z| (z.composition.sum() - 1.0).abs())
        .fold(0.0, f64::max)
}

/// Run every check. Bidirectional profiles are checked from the base
/// outward and from the base inward.
pub fn diagnose(profile: &Profile, gravity: &GravityModel, density_floor: f64) -> Diagnostics {
    let base = profile.markers().base_index;
    let outward = profile.regimes().skip(base);
    let inward = profile.zones()[..=base.min(profile.len().saturating_sub(1))]
        .iter()
        .rev()
        .map(|z| z.regime);
    Diagnostics {
        max_hse_error: max_hse_error(profile, gravity, density_floor),
        max_composition_error: max_composition_error(profile),
        regimes_monotone: regime_is_monotone(outward) && regime_is_monotone(inward),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Regime::*;

    #[test]
    fn monotone_sequences() {
        assert!(regime_is_monotone([Prescribed, Prescribed, Isentropic, Isothermal, Fluff]));
        assert!(regime_is_monotone([Isentropic, Fluff, Fluff]));
        assert!(regime_is_monotone(Vec::new()));
    }

    #[test]
    fn reversals_are_detected() {
        assert!(!regime_is_monotone([Isentropic, Isothermal, Isentropic]));
        assert!(!regime_is_monotone([Isothermal, Fluff, Isothermal]));
        assert!(!regime_is_monotone([Isentropic, Prescribed]));
    }
}
