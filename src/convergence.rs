//! Empirical convergence rates from a sequence of refined runs.

use crate::{Boundary, RunParams, SolveError, Solution, StoreMode, Wave2D};

/// Parameters of a convergence study.
///
/// Every level doubles both the resolution and the number of steps,
/// which keeps the Courant number and the final time fixed.
#[derive(Clone, Debug, PartialEq)]
pub struct ConvergenceParams {
    /// Number of refinement levels. Default: 4.
    pub levels: usize,
    /// Resolution of the coarsest level. Default: 8.
    pub base_resolution: usize,
    /// Courant number. Default: 0.1.
    pub cfl: f64,
    /// Number of time steps on the coarsest level. Default: 10.
    pub steps: usize,
    /// Wave speed. Default: 1.
    pub wave_speed: f64,
    /// Mode number along x. Default: 3.
    pub mx: u32,
    /// Mode number along y. Default: 3.
    pub my: u32,
}

impl Default for ConvergenceParams {
    fn default() -> Self {
        Self {
            levels: 4,
            base_resolution: 8,
            cfl: 0.1,
            steps: 10,
            wave_speed: 1.0,
            mx: 3,
            my: 3,
        }
    }
}

impl ConvergenceParams {
    /// Run parameters of the given refinement level, starting from 0.
    pub fn level(&self, level: usize) -> RunParams {
        let factor = 1usize << level;
        RunParams {
            resolution: self.base_resolution * factor,
            steps: self.steps * factor,
            cfl: self.cfl,
            wave_speed: self.wave_speed,
            mx: self.mx,
            my: self.my,
        }
    }
}

/// Results of a convergence study.
#[derive(Clone, Debug, PartialEq)]
pub struct ConvergenceStudy {
    /// Estimated order between each pair of consecutive levels.
    /// One shorter than the other two sequences.
    pub orders: Vec<f64>,
    /// L2 error at the final step of each level.
    pub errors: Vec<f64>,
    /// Grid spacing of each level.
    pub spacings: Vec<f64>,
}

impl ConvergenceStudy {
    /// The order estimated from the two finest levels.
    pub fn final_order(&self) -> Option<f64> {
        self.orders.last().copied()
    }
}

/// Empirical order `ln(E_{i-1} / E_i) / ln(h_{i-1} / h_i)`
/// between consecutive entries of the error and spacing sequences.
pub fn empirical_orders(errors: &[f64], spacings: &[f64]) -> Vec<f64> {
    errors
        .windows(2)
        .zip(spacings.windows(2))
        .map(|(e, h)| (e[0] / e[1]).ln() / (h[0] / h[1]).ln())
        .collect()
}

impl<B: Boundary> Wave2D<B> {
    /// Solve at successively doubled resolutions and estimate
    /// the order of convergence from the final-step errors.
    pub fn convergence_rates(
        &self,
        params: &ConvergenceParams,
    ) -> Result<ConvergenceStudy, SolveError> {
        if params.levels < 2 {
            return Err(SolveError::TooFewLevels(params.levels));
        }
        // check the coarsest level up front so nothing runs on bad input
        params.level(0).validate()?;

        let mut errors = Vec::with_capacity(params.levels);
        let mut spacings = Vec::with_capacity(params.levels);
        for level in 0..params.levels {
            let run = params.level(level);
            let (spacing, final_error) = match self.solve(&run, StoreMode::ErrorHistory)? {
                Solution::ErrorHistory { spacing, errors } => {
                    (spacing, errors.last().copied().unwrap_or(f64::NAN))
                }
                // error history mode never produces snapshots
                Solution::Snapshots(_) => unreachable!(),
            };
            log::info!(
                "{} level {level}: N={}, Nt={}, dx={spacing}, error={final_error:e}",
                B::NAME,
                run.resolution,
                run.steps,
            );
            errors.push(final_error);
            spacings.push(spacing);
        }

        Ok(ConvergenceStudy {
            orders: empirical_orders(&errors, &spacings),
            errors,
            spacings,
        })
    }
}
