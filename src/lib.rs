//! Finite difference solver for the scalar wave equation
//! `u_tt = c^2 (u_xx + u_yy)` on the unit square.
//!
//! Space is discretized with the second order five-point Laplacian
//! and time with the leapfrog scheme.
//! Runs are started from and compared against an exact standing wave,
//! which makes it easy to measure the order of convergence.
//!
//! ```
//! use standing_wave::{ConvergenceParams, Wave2D};
//!
//! let study = Wave2D::dirichlet()
//!     .convergence_rates(&ConvergenceParams { mx: 2, my: 3, ..Default::default() })
//!     .expect("parameters are valid");
//! assert!((study.final_order().unwrap() - 2.0).abs() < 1e-2);
//! ```

#![warn(missing_docs)]

pub mod grid;
#[doc(inline)]
pub use grid::Grid;

pub mod field;
#[doc(inline)]
pub use field::Field;

pub mod operator;
#[doc(inline)]
pub use operator::Laplacian;

pub mod boundary;
#[doc(inline)]
pub use boundary::{Boundary, Dirichlet, Neumann};

pub mod exact;
#[doc(inline)]
pub use exact::{l2_error, ModeShape, StandingWave};

pub mod solver;
#[doc(inline)]
pub use solver::{RunParams, Snapshots, Solution, SolveError, StoreMode, Wave2D};

pub mod convergence;
#[doc(inline)]
pub use convergence::{ConvergenceParams, ConvergenceStudy};

pub mod playback;
#[doc(inline)]
pub use playback::PlaybackPlan;

pub use nalgebra as na;
