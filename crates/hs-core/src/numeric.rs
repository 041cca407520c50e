use crate::HsError;

pub fn ensure_finite(v: f64, what: &'static str) -> Result<f64, HsError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(HsError::NonFinite { what, value: v })
    }
}

/// Apply `step` to `value`, limiting the change to `fraction * |value|`.
///
/// This is the per-iteration damping used by every Newton update in the
/// zone solve: a poor initial guess can never move a positive unknown by
/// more than the given fraction in a single iteration.
#[inline]
pub fn damped_update(value: f64, step: f64, fraction: f64) -> f64 {
    let span = fraction * value.abs();
    (value + step).clamp(value - span, value + span)
}

/// Relative error of `measured` with respect to a non-zero `target`.
#[inline]
pub fn relative_error(measured: f64, target: f64) -> f64 {
    ((measured - target) / target).abs()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn damped_update_stays_positive(value in 1e-10_f64..1e12, step in -1e15_f64..1e15, fraction in 0.01_f64..0.99) {
            let next = damped_update(value, step, fraction);
            prop_assert!(next > 0.0);
            prop_assert!((next - value).abs() <= fraction * value * (1.0 + 1e-12));
        }
    }
}
