//! Local gravitational acceleration models.

use hs_core::units::constants::G_NEWTON;

/// Gravity felt at a cell edge. Accelerations are negative (pointing to
/// decreasing coordinate).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GravityModel {
    /// Inverse-square law with the mass enclosed by the edge.
    EnclosedMass,
    /// Inverse-square law about a fixed central mass [g].
    PointMass { mass: f64 },
    /// Uniform acceleration [cm s^-2].
    Constant { accel: f64 },
}

impl GravityModel {
    pub fn acceleration(&self, radius: f64, enclosed_mass: f64) -> f64 {
        match *self {
            GravityModel::EnclosedMass => -G_NEWTON * enclosed_mass / (radius * radius),
            GravityModel::PointMass { mass } => -G_NEWTON * mass / (radius * radius),
            GravityModel::Constant { accel } => accel,
        }
    }

    pub fn needs_enclosed_mass(&self) -> bool {
        matches!(self, GravityModel::EnclosedMass)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hs_core::units::constants::M_SUN;

    #[test]
    fn inverse_square() {
        let g = GravityModel::EnclosedMass.acceleration(1e9, M_SUN);
        let h = GravityModel::EnclosedMass.acceleration(2e9, M_SUN);
        assert!(g < 0.0);
        assert!((g / h - 4.0).abs() < 1e-12);

        let p = GravityModel::PointMass { mass: M_SUN }.acceleration(1e9, 0.0);
        assert_eq!(p, g);
    }

    #[test]
    fn constant_ignores_position() {
        let model = GravityModel::Constant { accel: -2.45e14 };
        assert_eq!(model.acceleration(0.0, 0.0), -2.45e14);
        assert_eq!(model.acceleration(1e3, 1e30), -2.45e14);
        assert!(!model.needs_enclosed_mass());
    }
}
