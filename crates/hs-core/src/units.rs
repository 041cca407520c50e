// hs-core/src/units.rs
//
// Everything inside the solver runs on bare CGS `f64`s; the uom mass type is
// used where masses are reported.

use uom::si::f64::Mass as UomMass;

pub type Mass = UomMass;

#[inline]
pub fn grams(v: f64) -> Mass {
    use uom::si::mass::gram;
    Mass::new::<gram>(v)
}

/// Mass in grams expressed in solar masses.
#[inline]
pub fn solar_masses(mass: Mass) -> f64 {
    use uom::si::mass::gram;
    mass.get::<gram>() / constants::M_SUN
}

/// Physical constants in CGS.
pub mod constants {
    pub const G_NEWTON: f64 = 6.674_30e-8;
    pub const M_SUN: f64 = 1.988_47e33;
    pub const K_B: f64 = 1.380_649e-16;
    /// Atomic mass unit [g].
    pub const M_U: f64 = 1.660_539_066_60e-24;
    /// Radiation constant [erg cm^-3 K^-4].
    pub const A_RAD: f64 = 7.565_723e-15;
    /// Electron rest energy [erg].
    pub const ME_C2: f64 = 8.187_105_776_9e-7;
    /// Reduced Compton wavelength of the electron [cm].
    pub const LAMBDA_C: f64 = 3.861_592_679_6e-11;
    /// Elementary charge [esu].
    pub const E_ESU: f64 = 4.803_204_71e-10;
    pub const MEV: f64 = 1.602_176_634e-6;
}
