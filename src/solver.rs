//! Leapfrog time stepping for the 2D wave equation.
//!
//! Each step computes
//! `U^{n+1} = 2 U^n - U^{n-1} + C^2 L U^n`,
//! where `L` is the unscaled discrete [`Laplacian`][crate::Laplacian]
//! and `C = c dt / dx` is the Courant number,
//! then enforces the boundary condition on `U^{n+1}`.
//! The scheme is started from the exact solution at `t = 0` and `t = -dt`.

use std::collections::BTreeMap;
use std::num::NonZeroUsize;

use nalgebra as na;

use crate::{
    exact::{l2_error, StandingWave},
    Boundary, Dirichlet, Field, Grid, Neumann,
};

/// Courant number above which the 2D scheme is not expected to stay stable.
pub const STABLE_CFL: f64 = 0.5;

/// Error in configuring a solver run.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    /// The grid needs at least one interval per axis.
    #[error("Grid resolution must be positive, got {0}")]
    InvalidResolution(usize),
    /// At least one time step must be taken.
    #[error("Number of time steps must be positive, got {0}")]
    InvalidStepCount(usize),
    /// The Courant number must be a positive finite number.
    #[error("CFL number must be positive and finite, got {0}")]
    InvalidCfl(f64),
    /// The wave speed must be a positive finite number.
    #[error("Wave speed must be positive and finite, got {0}")]
    InvalidWaveSpeed(f64),
    /// A raw store interval was neither positive nor -1,
    /// so the run would produce no output.
    #[error("Store interval must be a positive integer or -1, got {0}")]
    UnsupportedStoreInterval(i64),
    /// A convergence study needs two levels to compute a rate.
    #[error("Convergence study needs at least 2 levels, got {0}")]
    TooFewLevels(usize),
}

/// Parameters of a single solver run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunParams {
    /// Number of uniform intervals along each axis (`N`).
    /// Default: 8.
    pub resolution: usize,
    /// Number of time steps (`Nt`). Default: 10.
    pub steps: usize,
    /// Courant number `c dt / dx`. Default: 0.5.
    ///
    /// The time step is always derived from this as `cfl * dx / c`.
    /// Values above [`STABLE_CFL`] are accepted
    /// but the solution will likely blow up.
    pub cfl: f64,
    /// Wave speed `c`. Default: 1.
    pub wave_speed: f64,
    /// Mode number of the standing wave along x. Default: 3.
    pub mx: u32,
    /// Mode number of the standing wave along y. Default: 3.
    pub my: u32,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            resolution: 8,
            steps: 10,
            cfl: 0.5,
            wave_speed: 1.0,
            mx: 3,
            my: 3,
        }
    }
}

impl RunParams {
    /// Check the parameters, failing on the first invalid one.
    pub fn validate(&self) -> Result<(), SolveError> {
        if self.resolution == 0 {
            return Err(SolveError::InvalidResolution(self.resolution));
        }
        if self.steps == 0 {
            return Err(SolveError::InvalidStepCount(self.steps));
        }
        if !(self.cfl.is_finite() && self.cfl > 0.0) {
            return Err(SolveError::InvalidCfl(self.cfl));
        }
        if !(self.wave_speed.is_finite() && self.wave_speed > 0.0) {
            return Err(SolveError::InvalidWaveSpeed(self.wave_speed));
        }
        Ok(())
    }

    /// Grid spacing `dx = 1/N`.
    pub fn spacing(&self) -> f64 {
        1.0 / self.resolution as f64
    }

    /// Time step `dt = cfl * min(dx, dy) / c`.
    pub fn time_step(&self) -> f64 {
        self.cfl * self.spacing() / self.wave_speed
    }
}

/// What a run records while stepping.
///
/// The two modes are exclusive:
/// a run produces either snapshots or an error history, never both.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreMode {
    /// Store the field at step 0 and at every step divisible by the interval.
    Snapshots(NonZeroUsize),
    /// Record the L2 error against the exact solution after every step.
    ErrorHistory,
}

impl StoreMode {
    /// Snapshot mode with the given interval.
    /// Returns `None` for an interval of zero.
    pub fn every(interval: usize) -> Option<Self> {
        NonZeroUsize::new(interval).map(Self::Snapshots)
    }
}

impl TryFrom<i64> for StoreMode {
    type Error = SolveError;

    /// Interpret a raw store interval:
    /// positive values store snapshots, -1 records errors,
    /// and anything else is rejected since it would produce no output.
    fn try_from(interval: i64) -> Result<Self, Self::Error> {
        match interval {
            -1 => Ok(StoreMode::ErrorHistory),
            k if k > 0 => usize::try_from(k)
                .ok()
                .and_then(StoreMode::every)
                .ok_or(SolveError::UnsupportedStoreInterval(interval)),
            _ => Err(SolveError::UnsupportedStoreInterval(interval)),
        }
    }
}

/// Stored fields of a run, keyed by time step index.
///
/// Each field is an `(N+1) x (N+1)` matrix where entry `(i, j)`
/// is the displacement at `(x_i, y_j)`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshots {
    /// The stored fields in ascending step order.
    pub frames: BTreeMap<usize, na::DMatrix<f64>>,
}

impl Snapshots {
    /// Number of stored fields.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether nothing was stored.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Step indices of the stored fields, ascending.
    pub fn steps(&self) -> impl Iterator<Item = usize> + '_ {
        self.frames.keys().copied()
    }

    /// The stored fields in ascending step order.
    pub fn fields(&self) -> impl Iterator<Item = &na::DMatrix<f64>> + '_ {
        self.frames.values()
    }

    /// The field stored at a step, if any.
    pub fn get(&self, step: usize) -> Option<&na::DMatrix<f64>> {
        self.frames.get(&step)
    }

    /// The earliest stored field.
    pub fn first(&self) -> Option<&na::DMatrix<f64>> {
        self.frames.values().next()
    }

    /// The latest stored field.
    pub fn last(&self) -> Option<&na::DMatrix<f64>> {
        self.frames.values().next_back()
    }

    /// A color range `[-v, v]` symmetric around zero,
    /// where `v` is the largest absolute value in the first and last fields.
    ///
    /// Returns `None` if nothing is stored.
    pub fn symmetric_range(&self) -> Option<std::ops::RangeInclusive<f64>> {
        let first = self.first()?.amax();
        let last = self.last()?.amax();
        let vmax = first.max(last);
        Some(-vmax..=vmax)
    }
}

/// Output of a solver run.
#[derive(Clone, Debug, PartialEq)]
pub enum Solution {
    /// Fields stored in [`StoreMode::Snapshots`] mode.
    Snapshots(Snapshots),
    /// Errors recorded in [`StoreMode::ErrorHistory`] mode.
    ErrorHistory {
        /// Grid spacing `dx` of the run.
        spacing: f64,
        /// L2 error after each step; entry `n - 1` belongs to step `n`.
        errors: Vec<f64>,
    },
}

impl Solution {
    /// The stored snapshots, if this run recorded them.
    pub fn snapshots(&self) -> Option<&Snapshots> {
        match self {
            Solution::Snapshots(s) => Some(s),
            Solution::ErrorHistory { .. } => None,
        }
    }

    /// The grid spacing and error history, if this run recorded them.
    pub fn error_history(&self) -> Option<(f64, &[f64])> {
        match self {
            Solution::Snapshots(_) => None,
            Solution::ErrorHistory { spacing, errors } => Some((*spacing, errors.as_slice())),
        }
    }

    /// Consume the solution, returning the snapshots if present.
    pub fn into_snapshots(self) -> Option<Snapshots> {
        match self {
            Solution::Snapshots(s) => Some(s),
            Solution::ErrorHistory { .. } => None,
        }
    }
}

/// Solver for the 2D wave equation on the unit square
/// with the boundary condition `B`.
///
/// The solver itself holds no run state;
/// every call to [`solve`][Self::solve] builds its own grid, operator and buffers,
/// so independent runs can be made from multiple threads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Wave2D<B> {
    boundary: B,
}

impl Wave2D<Dirichlet> {
    /// Solver with a fixed `u = 0` boundary.
    pub fn dirichlet() -> Self {
        Self::new(Dirichlet)
    }
}

impl Wave2D<Neumann> {
    /// Solver with a zero normal derivative boundary.
    pub fn neumann() -> Self {
        Self::new(Neumann)
    }
}

impl<B: Boundary> Wave2D<B> {
    /// Create a solver with the given boundary condition.
    pub fn new(boundary: B) -> Self {
        Self { boundary }
    }

    /// The boundary condition of this solver.
    pub fn boundary(&self) -> &B {
        &self.boundary
    }

    /// The exact solution a run with the given parameters is compared against.
    pub fn exact_solution(&self, params: &RunParams) -> StandingWave {
        StandingWave {
            mx: params.mx,
            my: params.my,
            wave_speed: params.wave_speed,
            shape: self.boundary.mode_shape(),
        }
    }

    /// Initial fields `(U^0, U^{-1})` sampled from the exact solution
    /// at `t = 0` and `t = -dt`, with the boundary condition applied.
    pub fn initialize(&self, grid: &Grid, params: &RunParams) -> (Field, Field) {
        let exact = self.exact_solution(params);
        let mut curr = exact.evaluate(grid, 0.0);
        let mut prev = exact.evaluate(grid, -params.time_step());
        self.boundary.enforce(grid, &mut curr);
        self.boundary.enforce(grid, &mut prev);
        (curr, prev)
    }

    /// Run the solver for `params.steps` time steps.
    ///
    /// In [`StoreMode::Snapshots`] mode, the field at step 0
    /// and at every step divisible by the interval is returned.
    /// In [`StoreMode::ErrorHistory`] mode, the L2 error against
    /// the exact solution after every step is returned along with `dx`.
    pub fn solve(&self, params: &RunParams, store: StoreMode) -> Result<Solution, SolveError> {
        params.validate()?;
        if params.cfl > STABLE_CFL {
            log::warn!(
                "CFL number {} exceeds the stable limit {STABLE_CFL}, expect the solution to diverge",
                params.cfl
            );
        }

        let grid = Grid::new(params.resolution);
        let dt = params.time_step();
        let courant_sq = params.cfl.powi(2);
        log::debug!(
            "{} solve: N={}, Nt={}, dt={dt}, cfl={}, store={store:?}",
            B::NAME,
            params.resolution,
            params.steps,
            params.cfl,
        );

        let laplacian = self.boundary.laplacian(&grid);
        let exact = self.exact_solution(params);
        let (mut curr, mut prev) = self.initialize(&grid, params);

        let mut snapshots = match store {
            StoreMode::Snapshots(_) => {
                let mut s = Snapshots::default();
                s.frames.insert(0, curr.to_matrix());
                Some(s)
            }
            StoreMode::ErrorHistory => None,
        };
        let mut errors = match store {
            StoreMode::Snapshots(_) => None,
            StoreMode::ErrorHistory => Some(Vec::with_capacity(params.steps)),
        };

        for n in 1..=params.steps {
            let lap = &laplacian * &curr;
            // overwrite the oldest level with the next one in place:
            // prev <- 2 curr - prev + C^2 L curr
            prev.values.axpy(2.0, &curr.values, -1.0);
            prev.values.axpy(courant_sq, &lap.values, 1.0);
            self.boundary.enforce(&grid, &mut prev);
            // prev now holds U^{n+1}; shift the levels
            std::mem::swap(&mut prev, &mut curr);

            if let (Some(snapshots), StoreMode::Snapshots(interval)) = (&mut snapshots, store) {
                if n % interval.get() == 0 {
                    log::trace!("storing snapshot at step {n}");
                    snapshots.frames.insert(n, curr.to_matrix());
                }
            }
            if let Some(errors) = &mut errors {
                errors.push(l2_error(&curr, &exact.evaluate(&grid, n as f64 * dt)));
            }
        }

        Ok(match (snapshots, errors) {
            (Some(snapshots), _) => Solution::Snapshots(snapshots),
            (None, errors) => Solution::ErrorHistory {
                spacing: grid.dx(),
                errors: errors.unwrap_or_default(),
            },
        })
    }

    /// Run the solver from positional parameters and a raw store interval,
    /// where a positive interval stores snapshots and -1 records errors.
    #[allow(clippy::too_many_arguments)]
    pub fn solve_raw(
        &self,
        resolution: usize,
        steps: usize,
        cfl: f64,
        wave_speed: f64,
        mx: u32,
        my: u32,
        store_interval: i64,
    ) -> Result<Solution, SolveError> {
        let params = RunParams {
            resolution,
            steps,
            cfl,
            wave_speed,
            mx,
            my,
        };
        params.validate()?;
        let store = StoreMode::try_from(store_interval)?;
        self.solve(&params, store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn time_step_is_derived_from_cfl() {
        let params = RunParams {
            resolution: 20,
            cfl: 0.4,
            wave_speed: 2.0,
            ..Default::default()
        };
        assert_relative_eq!(params.time_step(), 0.4 * 0.05 / 2.0);
    }

    #[test]
    fn raw_store_intervals_are_interpreted() {
        assert_eq!(StoreMode::try_from(-1), Ok(StoreMode::ErrorHistory));
        assert_eq!(StoreMode::try_from(3), Ok(StoreMode::every(3).unwrap()));
        for bad in [0, -2, -100] {
            assert_eq!(
                StoreMode::try_from(bad),
                Err(SolveError::UnsupportedStoreInterval(bad))
            );
        }
    }

    #[test]
    fn invalid_parameters_fail_before_stepping() {
        let solver = Wave2D::dirichlet();
        let cases = [
            (
                RunParams {
                    resolution: 0,
                    ..Default::default()
                },
                SolveError::InvalidResolution(0),
            ),
            (
                RunParams {
                    steps: 0,
                    ..Default::default()
                },
                SolveError::InvalidStepCount(0),
            ),
            (
                RunParams {
                    cfl: 0.0,
                    ..Default::default()
                },
                SolveError::InvalidCfl(0.0),
            ),
            (
                RunParams {
                    wave_speed: -1.0,
                    ..Default::default()
                },
                SolveError::InvalidWaveSpeed(-1.0),
            ),
        ];
        for (params, expected) in cases {
            assert_eq!(
                solver.solve(&params, StoreMode::ErrorHistory),
                Err(expected)
            );
        }
        assert_eq!(
            solver.solve_raw(8, 10, 0.5, 1.0, 3, 3, 0),
            Err(SolveError::UnsupportedStoreInterval(0))
        );
    }

    #[test]
    fn initial_fields_are_one_time_step_apart() {
        let solver = Wave2D::neumann();
        let params = RunParams::default();
        let grid = Grid::new(params.resolution);
        let (curr, prev) = solver.initialize(&grid, &params);
        let exact = solver.exact_solution(&params);
        assert_eq!(curr, exact.evaluate(&grid, 0.0));
        assert_eq!(prev, exact.evaluate(&grid, -params.time_step()));
    }

    #[test]
    fn single_step_matches_hand_written_recurrence() {
        let solver = Wave2D::neumann();
        let params = RunParams {
            resolution: 6,
            steps: 1,
            cfl: 0.3,
            mx: 1,
            my: 2,
            ..Default::default()
        };
        let grid = Grid::new(params.resolution);
        let (curr, prev) = solver.initialize(&grid, &params);
        let lap = solver.boundary().laplacian(&grid).apply(&curr);
        let expected = 2.0 * &curr + (-1.0 * &prev) + params.cfl.powi(2) * lap;

        let snaps = solver
            .solve(&params, StoreMode::every(1).unwrap())
            .unwrap()
            .into_snapshots()
            .unwrap();
        let step_1 = snaps.get(1).unwrap();
        for i in 0..grid.side_len() {
            for j in 0..grid.side_len() {
                assert_relative_eq!(step_1[(i, j)], expected.at(i, j), epsilon = 1e-14);
            }
        }
    }

    #[test]
    fn symmetric_range_uses_first_and_last_frames() {
        let mut snaps = Snapshots::default();
        assert_eq!(snaps.symmetric_range(), None);
        snaps.frames.insert(0, na::DMatrix::from_element(2, 2, -0.5));
        snaps.frames.insert(2, na::DMatrix::from_element(2, 2, 5.0));
        snaps.frames.insert(4, na::DMatrix::from_element(2, 2, 0.25));
        assert_eq!(snaps.symmetric_range(), Some(-0.5..=0.5));
    }
}
