//! hs-eos: thermodynamic and nuclear collaborators for the model builder.
//!
//! Provides:
//! - Species table and mass-fraction `Composition`
//! - `EquationOfState` trait mapping (density, temperature, composition) to
//!   pressure, entropy, sound speed and their partial derivatives
//! - `StellarGas`, an analytic ion + electron + radiation reference EOS
//! - `ReactionRates` trait and `ThresholdUrcaRates` for the Urca-pair split
//!
//! Everything here works in CGS with bare `f64`s. The `hs_core::units`
//! constructors are available for callers that want typed quantities.

pub mod composition;
pub mod error;
pub mod gas;
pub mod model;
pub mod rates;
pub mod species;
pub mod state;

pub use composition::Composition;
pub use error::{EosError, EosResult};
pub use gas::{GasOptions, StellarGas};
pub use model::EquationOfState;
pub use rates::{PairRates, ReactionRates, ThresholdUrcaRates};
pub use species::Species;
pub use state::EosState;
