//! Numerical methods.
//!
//! - [`interpolators`]: 1D interpolation over sorted abscissae
//! - [`solvers`]: Least-squares solvers and dense linear algebra helpers
//! - [`triangulation`]: Delaunay triangulation and scattered 2D interpolants

pub mod interpolators;
pub mod solvers;
pub mod triangulation;
