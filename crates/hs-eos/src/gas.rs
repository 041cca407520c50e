//! Analytic stellar-gas equation of state.
//!
//! Ideal ions, blackbody radiation and electrons. The electron pressure is
//! the zero-temperature Chandrasekhar pressure combined in quadrature with
//! the ideal (non-degenerate) electron pressure, which reproduces both
//! limits and stays smooth in between. An optional ion-sphere Coulomb term
//! softens the pressure at high density.

use crate::composition::Composition;
use crate::error::EosResult;
use crate::model::{EquationOfState, validation};
use crate::species::Species;
use crate::state::EosState;
use hs_core::units::constants::{A_RAD, E_ESU, K_B, LAMBDA_C, M_U, ME_C2};
use std::f64::consts::PI;
use tracing::debug;

/// Runtime switches of the gas model.
///
/// Passed in at construction; nothing is toggled while a model is solving.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GasOptions {
    pub coulomb_corrections: bool,
}

/// Degenerate electron pressure scale, m_e c^2 / (24 pi^2 lambda_C^3).
fn degenerate_pressure_scale() -> f64 {
    ME_C2 / (24.0 * PI * PI * LAMBDA_C.powi(3))
}

/// Density scale of the Fermi momentum, m_u / (3 pi^2 lambda_C^3).
fn degenerate_density_scale() -> f64 {
    M_U / (3.0 * PI * PI * LAMBDA_C.powi(3))
}

/// Dimensionless Fermi momentum p_F / (m_e c) of a cold electron gas.
pub fn fermi_momentum(rho: f64, ye: f64) -> f64 {
    (rho * ye / degenerate_density_scale()).cbrt()
}

/// Cold electron pressure in units of the degenerate scale.
///
/// The closed form cancels catastrophically for small `x`, so the leading
/// terms of its series are used there.
fn cold_pressure(x: f64) -> f64 {
    if x < 0.05 {
        let x2 = x * x;
        8.0 * x.powi(5) * (1.0 / 5.0 - x2 / 14.0 + x2 * x2 / 24.0 - 5.0 * x2.powi(3) / 176.0)
    } else {
        x * (2.0 * x * x - 3.0) * (1.0 + x * x).sqrt() + 3.0 * x.asinh()
    }
}

#[derive(Debug, Clone)]
pub struct StellarGas {
    options: GasOptions,
    network: Vec<Species>,
}

impl StellarGas {
    pub fn new(options: GasOptions) -> Self {
        Self {
            options,
            network: Species::ALL.to_vec(),
        }
    }

    /// Gas restricted to a subset of species.
    pub fn with_network(options: GasOptions, network: Vec<Species>) -> Self {
        Self { options, network }
    }

    pub fn options(&self) -> GasOptions {
        self.options
    }
}

impl Default for StellarGas {
    fn default() -> Self {
        Self::new(GasOptions::default())
    }
}

impl EquationOfState for StellarGas {
    fn name(&self) -> &str {
        "stellar-gas"
    }

    fn network(&self) -> &[Species] {
        &self.network
    }

    fn evaluate(&self, rho: f64, t: f64, comp: &Composition) -> EosResult<EosState> {
        self.state(rho, t, comp).inspect_err(|err| {
            debug!(model = self.name(), rho, t, %err, "state rejected");
        })
    }
}

impl StellarGas {
    fn state(&self, rho: f64, t: f64, comp: &Composition) -> EosResult<EosState> {
        validation::validate_density(rho)?;
        validation::validate_temperature(t)?;

        let abar = comp.abar();
        let ye = comp.ye();

        // ions
        let ion_coeff = K_B / (abar * M_U);
        let p_ion = rho * ion_coeff * t;
        let dpdr_ion = ion_coeff * t;
        let dpdt_ion = rho * ion_coeff;

        // radiation
        let p_rad = A_RAD * t.powi(4) / 3.0;
        let dpdt_rad = 4.0 * A_RAD * t.powi(3) / 3.0;

        // electrons
        let x = fermi_momentum(rho, ye);
        let root = (1.0 + x * x).sqrt();
        let a_deg = degenerate_pressure_scale();
        let p_deg = a_deg * cold_pressure(x);
        let dpdr_deg = a_deg * 8.0 * x.powi(4) / root * x / (3.0 * rho);
        let e_coeff = rho * ye * K_B / M_U;
        let p_id = e_coeff * t;
        let dpdr_id = ye * K_B * t / M_U;
        let p_ele = p_deg.hypot(p_id);
        let dpdr_ele = (p_deg * dpdr_deg + p_id * dpdr_id) / p_ele;
        let dpdt_ele = p_id * e_coeff / p_ele;

        let mut p = p_ion + p_rad + p_ele;
        let mut dpdr = dpdr_ion + dpdr_ele;
        let dpdt = dpdt_ion + dpdt_rad + dpdt_ele;

        if self.options.coulomb_corrections {
            let p_coul = -0.3
                * (4.0 * PI / 3.0).cbrt()
                * E_ESU
                * E_ESU
                * comp.z2bar()
                * (1.0 / (abar * M_U)).powf(4.0 / 3.0)
                * rho.powf(4.0 / 3.0);
            p += p_coul;
            dpdr += 4.0 / 3.0 * p_coul / rho;
        }

        let nk = K_B / M_U * (1.0 / abar + ye);
        let s = nk * (1.5 * t.ln() - rho.ln()) + 4.0 * A_RAD * t.powi(3) / (3.0 * rho);
        let dsdr = -nk / rho - 4.0 * A_RAD * t.powi(3) / (3.0 * rho * rho);
        let dsdt = 1.5 * nk / t + 4.0 * A_RAD * t * t / rho;

        let cs2 = dpdr - dpdt * dsdr / dsdt;
        let state = EosState {
            rho,
            t,
            p,
            s,
            cs: cs2.max(0.0).sqrt(),
            dpdr,
            dpdt,
            dsdr,
            dsdt,
        };
        validation::validate_state(&state)?;
        Ok(state)
    }
}
