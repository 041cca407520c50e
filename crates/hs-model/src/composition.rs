//! Composition builder.
//!
//! Two pure constructions: a tanh blend between two asymptotic layers, and
//! the equilibrium split of an Urca pair whose combined abundance is fixed.

use crate::error::ModelResult;
use hs_eos::{Composition, PairRates, ReactionRates};
use hs_solver::{CompositionSource, SolverError, SolverResult};

/// Weight rising smoothly from 0 to 1 across `center`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TanhBlend {
    pub center: f64,
    pub width: f64,
}

impl TanhBlend {
    pub fn weight(&self, x: f64) -> f64 {
        0.5 * (1.0 + ((x - self.center) / self.width).tanh())
    }
}

/// Composition and temperature of two layers joined by a tanh blend.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerProfile {
    pub inner: Composition,
    pub outer: Composition,
    pub inner_temperature: f64,
    pub outer_temperature: f64,
    pub blend: TanhBlend,
}

impl LayerProfile {
    pub fn weight(&self, x: f64) -> f64 {
        self.blend.weight(x)
    }

    pub fn composition_at(&self, x: f64) -> ModelResult<Composition> {
        Ok(self.inner.blend(&self.outer, self.weight(x))?)
    }

    pub fn temperature_at(&self, x: f64) -> f64 {
        self.inner_temperature + self.weight(x) * (self.outer_temperature - self.inner_temperature)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EquilibriumSettings {
    /// Accept when |flux imbalance| <= tolerance * total * (capture + decay).
    pub tolerance: f64,
    pub max_iterations: usize,
    /// Fractions below this are zeroed before renormalizing.
    pub floor: f64,
}

impl Default for EquilibriumSettings {
    fn default() -> Self {
        Self {
            tolerance: 1e-10,
            max_iterations: 50,
            floor: 1e-30,
        }
    }
}

/// Composition whose Urca-pair split is set by rate equilibrium.
///
/// The pair total is read from `base`; everything else in `base` is kept.
pub struct EquilibriumComposition<'r> {
    base: Composition,
    rates: &'r dyn ReactionRates,
    pair_total: f64,
    settings: EquilibriumSettings,
}

impl<'r> EquilibriumComposition<'r> {
    pub fn new(
        base: Composition,
        rates: &'r dyn ReactionRates,
        settings: EquilibriumSettings,
    ) -> Self {
        let pair_total =
            base.mass_fraction(rates.parent()) + base.mass_fraction(rates.daughter());
        Self {
            base,
            rates,
            pair_total,
            settings,
        }
    }

    pub fn pair_total(&self) -> f64 {
        self.pair_total
    }

    /// Equilibrium composition at (rho, t).
    ///
    /// Rates are evaluated once, at an even split, and held fixed during the
    /// one-dimensional Newton iteration on the parent abundance.
    pub fn split(&self, rho: f64, t: f64) -> SolverResult<Composition> {
        let total = self.pair_total;
        let (parent, daughter) = (self.rates.parent(), self.rates.daughter());
        if total == 0.0 {
            return Ok(self.base.floor_and_renormalize(self.settings.floor)?);
        }

        let even = self
            .base
            .with_pair((parent, 0.5 * total), (daughter, 0.5 * total))?;
        let PairRates { capture, decay } = self.rates.pair_rates(rho, t, &even)?;
        let sum = capture + decay;
        if !(sum.is_finite() && sum > 0.0) {
            return Err(SolverError::EquilibriumNonConvergence {
                iterations: 0,
                residual: f64::NAN,
            });
        }

        let mut x_parent = 0.5 * total;
        let mut imbalance = f64::NAN;
        for _ in 0..self.settings.max_iterations {
            imbalance = x_parent * capture - (total - x_parent) * decay;
            if imbalance.abs() <= self.settings.tolerance * total * sum {
                let split = self
                    .base
                    .with_pair((parent, x_parent), (daughter, total - x_parent))?;
                return Ok(split.floor_and_renormalize(self.settings.floor)?);
            }
            x_parent = (x_parent - imbalance / sum).clamp(0.0, total);
        }

        Err(SolverError::EquilibriumNonConvergence {
            iterations: self.settings.max_iterations,
            residual: imbalance.abs() / (total * sum),
        })
    }
}

impl CompositionSource for EquilibriumComposition<'_> {
    fn composition_at(&self, rho: f64, t: f64) -> SolverResult<Composition> {
        self.split(rho, t)
    }
}
