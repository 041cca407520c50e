//! Newton steps for the zone residuals.
//!
//! With `A = p_want - p(rho, T)` and `B = s_target - s(rho, T)`, the
//! isentropic step solves
//!
//! ```text
//! | dA/drho  -dp/dT | |drho|   |-A|
//! | -ds/drho -ds/dT | |dT  | = |-B|
//! ```
//!
//! where `dA/drho = 0.5 * sign * dx * g - dp/drho` picks up the density in
//! the averaged HSE source term.

use hs_eos::EosState;
use nalgebra::{Matrix2, Vector2};

/// Step for the coupled pressure/entropy residuals, `None` if singular.
pub fn isentropic_step(a: f64, b: f64, da_drho: f64, state: &EosState) -> Option<(f64, f64)> {
    let jac = Matrix2::new(da_drho, -state.dpdt, -state.dsdr, -state.dsdt);
    let rhs = Vector2::new(-a, -b);
    let dx = jac.lu().solve(&rhs)?;
    if dx.iter().all(|v| v.is_finite()) {
        Some((dx[0], dx[1]))
    } else {
        None
    }
}

/// Step for the pressure residual at fixed temperature.
pub fn isothermal_step(a: f64, da_drho: f64) -> Option<f64> {
    let step = -a / da_drho;
    if da_drho != 0.0 && step.is_finite() {
        Some(step)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(dpdr: f64, dpdt: f64, dsdr: f64, dsdt: f64) -> EosState {
        EosState {
            rho: 1.0,
            t: 1.0,
            p: 1.0,
            s: 0.0,
            cs: 1.0,
            dpdr,
            dpdt,
            dsdr,
            dsdt,
        }
    }

    #[test]
    fn linear_residuals_solve_in_one_step() {
        // p = 2 rho + 3 T, s = -rho + 4 T, no gravity term
        let st = state(2.0, 3.0, -1.0, 4.0);
        let (rho0, t0) = (1.0, 1.0);
        let (p_want, s_want) = (2.0 * 2.0 + 3.0 * 0.5, -2.0 + 4.0 * 0.5);
        let a = p_want - (2.0 * rho0 + 3.0 * t0);
        let b = s_want - (-rho0 + 4.0 * t0);
        let (drho, dt) = isentropic_step(a, b, -st.dpdr, &st).unwrap();
        assert!((rho0 + drho - 2.0).abs() < 1e-12);
        assert!((t0 + dt - 0.5).abs() < 1e-12);
    }

    #[test]
    fn singular_jacobian_is_rejected() {
        let st = state(1.0, 1.0, -1.0, -1.0);
        assert!(isentropic_step(1.0, 1.0, -st.dpdr, &st).is_none());
        assert!(isothermal_step(1.0, 0.0).is_none());
    }

    #[test]
    fn isothermal_step_is_newton() {
        // A(rho) = 10 - 2 rho
        let step = isothermal_step(10.0 - 2.0 * 3.0, -2.0).unwrap();
        assert!((3.0 + step - 5.0).abs() < 1e-12);
    }
}
