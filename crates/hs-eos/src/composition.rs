//! Mass-fraction composition vectors.

use crate::error::{EosError, EosResult};
use crate::species::Species;

/// Allowed deviation of a requested composition from unit sum.
pub const SUM_TOLERANCE: f64 = 1e-8;

/// Mass fractions over the full species table.
///
/// Every constructor leaves the vector normalized, so the entries always sum
/// to 1 within round-off.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Composition {
    x: [f64; Species::COUNT],
}

impl Composition {
    pub fn pure(species: Species) -> Self {
        let mut x = [0.0; Species::COUNT];
        x[species.index()] = 1.0;
        Self { x }
    }

    /// Create a composition from requested mass fractions.
    ///
    /// Each fraction must be finite and within [0, 1] and the total must be 1
    /// within [`SUM_TOLERANCE`]; the result is renormalized exactly.
    /// Repeated species accumulate.
    pub fn from_mass_fractions(fractions: &[(Species, f64)]) -> EosResult<Self> {
        if fractions.is_empty() {
            return Err(EosError::InvalidArg {
                what: "empty composition",
            });
        }

        let mut x = [0.0; Species::COUNT];
        for &(species, frac) in fractions {
            if !frac.is_finite() || !(0.0..=1.0).contains(&frac) {
                return Err(EosError::InvalidComposition {
                    what: format!("mass fraction of {species} is {frac}, expected a value in [0, 1]"),
                });
            }
            x[species.index()] += frac;
        }

        let sum: f64 = x.iter().sum();
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            return Err(EosError::InvalidComposition {
                what: format!("mass fractions sum to {sum}"),
            });
        }
        Self::normalized(x)
    }

    fn normalized(mut x: [f64; Species::COUNT]) -> EosResult<Self> {
        let sum: f64 = x.iter().sum();
        if sum <= 0.0 || !sum.is_finite() {
            return Err(EosError::NonPhysical {
                what: "mass fractions sum to zero or non-finite",
            });
        }
        x.iter_mut().for_each(|v| *v /= sum);
        Ok(Self { x })
    }

    pub fn mass_fraction(&self, species: Species) -> f64 {
        self.x[species.index()]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.x
    }

    /// Species with non-zero mass fraction, in table order.
    pub fn iter(&self) -> impl Iterator<Item = (Species, f64)> + '_ {
        Species::ALL
            .iter()
            .copied()
            .zip(self.x.iter().copied())
            .filter(|(_, f)| *f > 0.0)
    }

    pub fn sum(&self) -> f64 {
        self.x.iter().sum()
    }

    /// Replace the mass fractions of two species, keeping everything else.
    ///
    /// Used by the equilibrium split, where the pair total is conserved, so
    /// the result is renormalized only to clear round-off.
    pub fn with_pair(&self, a: (Species, f64), b: (Species, f64)) -> EosResult<Self> {
        let mut x = self.x;
        x[a.0.index()] = a.1;
        x[b.0.index()] = b.1;
        if x.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(EosError::NonPhysical {
                what: "negative mass fraction in pair split",
            });
        }
        Self::normalized(x)
    }

    /// `self + eta * (other - self)`, renormalized.
    pub fn blend(&self, other: &Composition, eta: f64) -> EosResult<Self> {
        if !eta.is_finite() || !(0.0..=1.0).contains(&eta) {
            return Err(EosError::OutOfRange {
                what: "blend weight must lie in [0, 1]",
            });
        }
        let mut x = self.x;
        for (v, o) in x.iter_mut().zip(other.x.iter()) {
            *v += eta * (o - *v);
        }
        Self::normalized(x)
    }

    /// Zero every fraction below `threshold` and renormalize.
    pub fn floor_and_renormalize(&self, threshold: f64) -> EosResult<Self> {
        let mut x = self.x;
        x.iter_mut().filter(|v| **v < threshold).for_each(|v| *v = 0.0);
        Self::normalized(x)
    }

    /// Mean mass number per ion: 1 / sum(X/A).
    pub fn abar(&self) -> f64 {
        let inv: f64 = self.iter().map(|(s, f)| f / s.mass_number()).sum();
        1.0 / inv
    }

    /// Electron fraction: sum(X Z / A).
    pub fn ye(&self) -> f64 {
        self.iter().map(|(s, f)| f * s.charge() / s.mass_number()).sum()
    }

    /// Mean squared charge per ion.
    pub fn z2bar(&self) -> f64 {
        let per_mass: f64 = self
            .iter()
            .map(|(s, f)| f * s.charge() * s.charge() / s.mass_number())
            .sum();
        per_mass * self.abar()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-12 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn pure_composition() {
        let comp = Composition::pure(Species::C12);
        assert_eq!(comp.mass_fraction(Species::C12), 1.0);
        assert_eq!(comp.mass_fraction(Species::O16), 0.0);
        assert!(close(comp.abar(), 12.0));
        assert!(close(comp.ye(), 0.5));
        assert!(close(comp.z2bar(), 36.0));
    }

    #[test]
    fn mixture_moments() {
        let comp =
            Composition::from_mass_fractions(&[(Species::C12, 0.5), (Species::O16, 0.5)]).unwrap();
        // 1/abar = 0.5/12 + 0.5/16
        assert!(close(comp.abar(), 1.0 / (0.5 / 12.0 + 0.5 / 16.0)));
        assert!(close(comp.ye(), 0.5));
    }

    #[test]
    fn rejects_fraction_out_of_range() {
        let result = Composition::from_mass_fractions(&[(Species::C12, 1.5), (Species::O16, -0.5)]);
        assert!(matches!(result, Err(EosError::InvalidComposition { .. })));
    }

    #[test]
    fn rejects_bad_sum() {
        let result = Composition::from_mass_fractions(&[(Species::C12, 0.5), (Species::O16, 0.4)]);
        assert!(matches!(result, Err(EosError::InvalidComposition { .. })));
    }

    #[test]
    fn rejects_non_finite() {
        let result = Composition::from_mass_fractions(&[(Species::C12, f64::NAN)]);
        assert!(result.is_err());
    }

    #[test]
    fn small_sum_error_is_renormalized() {
        let comp = Composition::from_mass_fractions(&[(Species::C12, 0.5), (Species::O16, 0.5 + 5e-9)])
            .unwrap();
        assert!((comp.sum() - 1.0).abs() < 1e-14);
    }

    #[test]
    fn blend_endpoints() {
        let a = Composition::pure(Species::C12);
        let b = Composition::pure(Species::He4);
        assert_eq!(a.blend(&b, 0.0).unwrap(), a);
        assert_eq!(a.blend(&b, 1.0).unwrap(), b);
        let mid = a.blend(&b, 0.25).unwrap();
        assert!(close(mid.mass_fraction(Species::He4), 0.25));
        assert!(a.blend(&b, 1.5).is_err());
    }

    #[test]
    fn floor_zeroes_trace_species() {
        let comp = Composition::from_mass_fractions(&[
            (Species::C12, 0.5),
            (Species::O16, 0.5 - 1e-31),
            (Species::Na23, 1e-31),
        ])
        .unwrap();
        let floored = comp.floor_and_renormalize(1e-30).unwrap();
        assert_eq!(floored.mass_fraction(Species::Na23), 0.0);
        assert!((floored.sum() - 1.0).abs() < 1e-14);
    }

    #[test]
    fn pair_replacement_keeps_other_species() {
        let comp = Composition::from_mass_fractions(&[
            (Species::C12, 0.4),
            (Species::O16, 0.5995),
            (Species::Na23, 5e-4),
        ])
        .unwrap();
        let split = comp
            .with_pair((Species::Na23, 2e-4), (Species::Ne23, 3e-4))
            .unwrap();
        assert!(close(split.mass_fraction(Species::C12), 0.4));
        assert!(close(split.mass_fraction(Species::Ne23), 3e-4));
        assert!(comp.with_pair((Species::Na23, -1.0), (Species::Ne23, 0.0)).is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn normalized_sum_is_one(raw in prop::collection::vec(0.0_f64..1.0_f64, 1..Species::COUNT)) {
            let total: f64 = raw.iter().sum();
            prop_assume!(total > 1e-6);
            let fractions: Vec<(Species, f64)> = raw
                .iter()
                .enumerate()
                .map(|(i, &f)| (Species::ALL[i], f / total))
                .collect();

            let comp = Composition::from_mass_fractions(&fractions).unwrap();
            prop_assert!((comp.sum() - 1.0).abs() < 1e-10);
        }

        #[test]
        fn blend_stays_normalized(eta in 0.0_f64..=1.0, c in 0.0_f64..=1.0) {
            let core = Composition::from_mass_fractions(&[(Species::C12, c), (Species::O16, 1.0 - c)]).unwrap();
            let env = Composition::pure(Species::He4);
            let mixed = core.blend(&env, eta).unwrap();
            prop_assert!((mixed.sum() - 1.0).abs() < 1e-10);
            prop_assert!(mixed.as_slice().iter().all(|v| (0.0..=1.0).contains(v)));
        }
    }
}
