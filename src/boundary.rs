//! Boundary conditions on the edges of the unit square.
//!
//! A boundary condition decides three things:
//! the 1D difference operator the Laplacian is built from,
//! what (if anything) is done to the field after every step,
//! and which standing wave profile satisfies the condition exactly.
//! The time stepper only depends on the [`Boundary`] trait,
//! so new conditions can be added without touching it.

use nalgebra_sparse as nas;

use crate::{
    exact::ModeShape,
    operator::{reflected_second_difference, second_difference},
    Field, Grid, Laplacian,
};

/// Capabilities the time stepper needs from a boundary condition.
pub trait Boundary {
    /// Human-readable name for logs.
    const NAME: &'static str;

    /// The 1D second difference matrix of size `len x len`.
    fn second_difference(&self, len: usize) -> nas::CsrMatrix<f64>;

    /// Spatial profile of the standing wave that satisfies this condition.
    fn mode_shape(&self) -> ModeShape;

    /// Enforce the condition on a freshly computed field.
    fn enforce(&self, grid: &Grid, field: &mut Field);

    /// The 2D Laplacian on a grid,
    /// built as the Kronecker sum of [`second_difference`][Self::second_difference].
    fn laplacian(&self, grid: &Grid) -> Laplacian {
        Laplacian::from_1d(&self.second_difference(grid.side_len()))
    }
}

/// Homogeneous Dirichlet condition `u = 0` on all four edges.
///
/// The Laplacian uses the plain `(1, -2, 1)` stencil everywhere
/// and edge values are zeroed after every step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Dirichlet;

impl Boundary for Dirichlet {
    const NAME: &'static str = "dirichlet";

    fn second_difference(&self, len: usize) -> nas::CsrMatrix<f64> {
        second_difference(len)
    }

    fn mode_shape(&self) -> ModeShape {
        ModeShape::Sine
    }

    fn enforce(&self, grid: &Grid, field: &mut Field) {
        for idx in grid.boundary().ones() {
            field.values[idx] = 0.0;
        }
    }
}

/// Homogeneous Neumann condition `∂u/∂n = 0` on all four edges.
///
/// The condition lives entirely in the reflected rows of the operator;
/// nothing is done to the field after a step.
/// At the corners both axes' reflections apply at once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Neumann;

impl Boundary for Neumann {
    const NAME: &'static str = "neumann";

    fn second_difference(&self, len: usize) -> nas::CsrMatrix<f64> {
        reflected_second_difference(len)
    }

    fn mode_shape(&self) -> ModeShape {
        ModeShape::Cosine
    }

    fn enforce(&self, _grid: &Grid, _field: &mut Field) {}
}
