//! hs-core: shared foundation for the hydrostatic model builder.
//!
//! Contains:
//! - units (uom mass conversion + physical constants)
//! - numeric (finiteness check + damped update helpers)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

pub use error::{HsError, HsResult};
pub use numeric::*;
pub use units::*;
