//! Thermodynamic state returned by an equation of state.

/// Result of one EOS evaluation, in CGS.
///
/// Entropy is specific (per gram) and only meaningful up to an additive
/// constant that depends on composition; it is compared between zones of
/// equal composition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EosState {
    /// Density [g cm^-3]
    pub rho: f64,
    /// Temperature [K]
    pub t: f64,
    /// Pressure [dyn cm^-2]
    pub p: f64,
    /// Specific entropy [erg g^-1 K^-1]
    pub s: f64,
    /// Adiabatic sound speed [cm s^-1]
    pub cs: f64,
    pub dpdr: f64,
    pub dpdt: f64,
    pub dsdr: f64,
    pub dsdt: f64,
}

impl EosState {
    /// Return a summary string (for logs).
    pub fn summary(&self) -> String {
        format!(
            "State(rho={:.6e},T={:.6e},P={:.6e},s={:.6e},cs={:.6e})",
            self.rho, self.t, self.p, self.s, self.cs
        )
    }
}
