//! Uniform 1-D cell-centred grid.

use crate::error::{SolverError, SolverResult};
use hs_core::{HsError, HsResult};
use std::f64::consts::PI;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Geometry {
    /// Spherical shells about r = 0.
    #[default]
    Spherical,
    /// Plane-parallel slab; volumes are per unit area.
    Planar,
}

/// Grid request, checked against the buffer capacity when built.
#[derive(Clone, Debug, PartialEq)]
pub struct GridSpec {
    pub zones: usize,
    pub xmin: f64,
    pub xmax: f64,
    pub max_zones: usize,
    pub geometry: Geometry,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    pub left: f64,
    pub center: f64,
    pub right: f64,
}

/// Immutable edges and centres of N cells.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    left: Vec<f64>,
    center: Vec<f64>,
    right: Vec<f64>,
    geometry: Geometry,
}

impl Grid {
    pub fn uniform(request: &GridSpec) -> SolverResult<Self> {
        if request.zones == 0 {
            return Err(SolverError::Configuration {
                what: "grid needs at least one zone".to_string(),
            });
        }
        if request.zones > request.max_zones {
            return Err(SolverError::Configuration {
                what: format!(
                    "grid of {} zones exceeds buffer capacity {}",
                    request.zones, request.max_zones
                ),
            });
        }
        if !(request.xmin.is_finite() && request.xmax.is_finite()) || request.xmax <= request.xmin {
            return Err(SolverError::Configuration {
                what: format!("invalid grid extent [{}, {}]", request.xmin, request.xmax),
            });
        }
        if request.geometry == Geometry::Spherical && request.xmin < 0.0 {
            return Err(SolverError::Configuration {
                what: "spherical grid cannot start at negative radius".to_string(),
            });
        }

        let dx = (request.xmax - request.xmin) / request.zones as f64;
        let left: Vec<f64> = (0..request.zones)
            .map(|i| request.xmin + i as f64 * dx)
            .collect();
        let right: Vec<f64> = (0..request.zones)
            .map(|i| request.xmin + (i + 1) as f64 * dx)
            .collect();
        let center = left.iter().zip(&right).map(|(l, r)| 0.5 * (l + r)).collect();

        Ok(Self {
            left,
            center,
            right,
            geometry: request.geometry,
        })
    }

    pub fn len(&self) -> usize {
        self.center.len()
    }

    pub fn is_empty(&self) -> bool {
        self.center.is_empty()
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn cell(&self, index: usize) -> HsResult<Cell> {
        if index >= self.len() {
            return Err(HsError::IndexOob {
                what: "grid cell",
                index,
                len: self.len(),
            });
        }
        Ok(Cell {
            left: self.left[index],
            center: self.center[index],
            right: self.right[index],
        })
    }

    pub fn left(&self, index: usize) -> f64 {
        self.left[index]
    }

    pub fn center(&self, index: usize) -> f64 {
        self.center[index]
    }

    pub fn right(&self, index: usize) -> f64 {
        self.right[index]
    }

    pub fn centers(&self) -> &[f64] {
        &self.center
    }

    pub fn xmin(&self) -> f64 {
        self.left[0]
    }

    pub fn width(&self, index: usize) -> f64 {
        self.right[index] - self.left[index]
    }

    /// Distance between the centres of two cells.
    pub fn spacing(&self, a: usize, b: usize) -> f64 {
        (self.center[a] - self.center[b]).abs()
    }

    /// Volume of cell `index` (per unit area for planar grids).
    pub fn shell_volume(&self, index: usize) -> f64 {
        let (l, r) = (self.left[index], self.right[index]);
        match self.geometry {
            Geometry::Spherical => 4.0 / 3.0 * PI * (r - l) * (r * r + r * l + l * l),
            Geometry::Planar => r - l,
        }
    }
}
