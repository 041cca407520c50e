//! Per-zone hydrostatic solver.
//!
//! This crate finds the density (and, for an isentropic closure, the
//! temperature) of one grid cell from its already converged neighbour, the
//! local gravity and the active thermodynamic closure. The grid, the gravity
//! models and the floor/regime policies live here too since every zone solve
//! needs them.

pub mod error;
pub mod gravity;
pub mod grid;
pub mod newton;
pub mod policy;
pub mod zone;

pub use error::{SolverError, SolverResult};
pub use gravity::GravityModel;
pub use grid::{Cell, Geometry, Grid, GridSpec};
pub use policy::{
    Closure, ConvergenceTest, Direction, Floors, FluffTemperature, Regime, RetryPolicy,
};
pub use zone::{CompositionSource, Neighbor, ZoneRequest, ZoneSolution, ZoneSolver, ZoneSolverConfig};
