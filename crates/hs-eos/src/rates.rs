//! Weak reaction rates for Urca-pair equilibrium.

use crate::composition::Composition;
use crate::error::{EosError, EosResult};
use crate::gas::fermi_momentum;
use crate::model::validation;
use crate::species::Species;
use hs_core::units::constants::{K_B, ME_C2, MEV};

/// Rates [s^-1] linking the two members of an Urca pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairRates {
    /// Electron capture, parent -> daughter.
    pub capture: f64,
    /// Beta decay, daughter -> parent.
    pub decay: f64,
}

/// Source of the reaction rates needed by the equilibrium composition.
pub trait ReactionRates: Send + Sync {
    fn name(&self) -> &str;

    /// Species that captures an electron (e.g. Na23).
    fn parent(&self) -> Species;

    /// Species produced by the capture (e.g. Ne23).
    fn daughter(&self) -> Species;

    fn pair_rates(&self, rho: f64, t: f64, comp: &Composition) -> EosResult<PairRates>;
}

/// Threshold model of an Urca pair.
///
/// The decay rate follows from the half-life; the capture rate is the decay
/// rate scaled by `exp((mu_e - Q) / kT)` with the total electron chemical
/// potential `mu_e` of a cold electron gas, so captures win above the
/// threshold density and decays win below it.
#[derive(Debug, Clone)]
pub struct ThresholdUrcaRates {
    pub parent: Species,
    pub daughter: Species,
    /// Capture threshold [MeV].
    pub threshold_mev: f64,
    /// Daughter half-life [s].
    pub half_life: f64,
}

impl ThresholdUrcaRates {
    /// Bound on |(mu_e - Q)/kT| so neither rate under- or overflows.
    pub const MAX_EXPONENT: f64 = 200.0;

    pub fn na23_ne23() -> Self {
        Self {
            parent: Species::Na23,
            daughter: Species::Ne23,
            threshold_mev: 4.376,
            half_life: 37.24,
        }
    }
}

impl Default for ThresholdUrcaRates {
    fn default() -> Self {
        Self::na23_ne23()
    }
}

impl ReactionRates for ThresholdUrcaRates {
    fn name(&self) -> &str {
        "threshold-urca"
    }

    fn parent(&self) -> Species {
        self.parent
    }

    fn daughter(&self) -> Species {
        self.daughter
    }

    fn pair_rates(&self, rho: f64, t: f64, comp: &Composition) -> EosResult<PairRates> {
        validation::validate_density(rho)?;
        validation::validate_temperature(t)?;
        if self.half_life.is_nan() || self.half_life <= 0.0 {
            return Err(EosError::InvalidArg {
                what: "half-life must be positive",
            });
        }

        let decay = std::f64::consts::LN_2 / self.half_life;
        let x = fermi_momentum(rho, comp.ye());
        let mu_e = ME_C2 * (1.0 + x * x).sqrt();
        let exponent = ((mu_e - self.threshold_mev * MEV) / (K_B * t))
            .clamp(-Self::MAX_EXPONENT, Self::MAX_EXPONENT);
        let capture = decay * exponent.exp();

        Ok(PairRates { capture, decay })
    }
}
