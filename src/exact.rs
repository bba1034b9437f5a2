//! Closed-form standing wave solutions and error measurement against them.

use std::f64::consts::PI;

use itertools::izip;
use nalgebra as na;

use crate::{Field, Grid};

/// Spatial profile of a standing wave along each axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeShape {
    /// `sin(m π x)`, vanishing at both ends of the unit interval.
    Sine,
    /// `cos(m π x)`, with zero derivative at both ends of the unit interval.
    Cosine,
}

impl ModeShape {
    #[inline]
    fn eval(self, arg: f64) -> f64 {
        match self {
            ModeShape::Sine => arg.sin(),
            ModeShape::Cosine => arg.cos(),
        }
    }
}

/// The standing wave `s(mx π x) s(my π y) cos(ω t)`,
/// where `s` is the [`ModeShape`] and `ω = c π sqrt(mx^2 + my^2)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StandingWave {
    /// Mode number along x.
    pub mx: u32,
    /// Mode number along y.
    pub my: u32,
    /// Wave speed `c`.
    pub wave_speed: f64,
    /// Profile along both axes.
    pub shape: ModeShape,
}

impl StandingWave {
    /// Angular frequency `ω = c π sqrt(mx^2 + my^2)`.
    pub fn angular_frequency(&self) -> f64 {
        let (mx, my) = (self.mx as f64, self.my as f64);
        self.wave_speed * PI * (mx * mx + my * my).sqrt()
    }

    /// Value of the wave at a point in space and time.
    /// `t` can be any real number, including negative ones.
    #[inline]
    pub fn value(&self, x: f64, y: f64, t: f64) -> f64 {
        self.shape.eval(self.mx as f64 * PI * x)
            * self.shape.eval(self.my as f64 * PI * y)
            * (self.angular_frequency() * t).cos()
    }

    /// Evaluate the wave at every node of a grid at time `t`.
    pub fn evaluate(&self, grid: &Grid, t: f64) -> Field {
        // the wave is separable, so evaluate each axis profile once
        let x_profile: Vec<f64> = grid
            .coords()
            .map(|x| self.shape.eval(self.mx as f64 * PI * x))
            .collect();
        let y_profile: Vec<f64> = grid
            .coords()
            .map(|y| self.shape.eval(self.my as f64 * PI * y))
            .collect();
        let time_factor = (self.angular_frequency() * t).cos();

        let side = grid.side_len();
        let values = na::DVector::from_fn(grid.node_count(), |k, _| {
            x_profile[k % side] * y_profile[k / side] * time_factor
        });
        Field::from_values(values, side)
    }
}

/// Root-mean-square difference between two fields on the same grid.
pub fn l2_error(numerical: &Field, reference: &Field) -> f64 {
    assert_eq!(
        numerical.values.len(),
        reference.values.len(),
        "Fields are defined on different grids"
    );
    let sum_sq: f64 = izip!(numerical.values.iter(), reference.values.iter())
        .map(|(u, e)| (u - e).powi(2))
        .sum();
    (sum_sq / numerical.values.len() as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{abs_diff_eq, assert_abs_diff_eq, assert_relative_eq};

    fn wave(shape: ModeShape) -> StandingWave {
        StandingWave {
            mx: 2,
            my: 3,
            wave_speed: 1.0,
            shape,
        }
    }

    #[test]
    fn angular_frequency_follows_dispersion_relation() {
        let w = StandingWave {
            mx: 3,
            my: 4,
            wave_speed: 2.0,
            shape: ModeShape::Sine,
        };
        assert_relative_eq!(w.angular_frequency(), 2.0 * PI * 5.0);
    }

    #[test]
    fn grid_evaluation_matches_pointwise_values() {
        let grid = Grid::new(10);
        for shape in [ModeShape::Sine, ModeShape::Cosine] {
            let w = wave(shape);
            let t = 0.37;
            let field = w.evaluate(&grid, t);
            for i in 0..grid.side_len() {
                for j in 0..grid.side_len() {
                    assert_relative_eq!(
                        field.at(i, j),
                        w.value(grid.coord(i), grid.coord(j), t),
                        epsilon = 1e-14
                    );
                }
            }
        }
    }

    #[test]
    fn sine_mode_vanishes_on_edges() {
        let grid = Grid::new(12);
        let field = wave(ModeShape::Sine).evaluate(&grid, 0.1);
        assert!(field.max_abs_on_edges() < 1e-14);
    }

    #[test]
    fn cosine_mode_is_flat_across_edges() {
        // central difference of the profile across x = 0 and x = 1 is zero
        let w = wave(ModeShape::Cosine);
        let h = 1e-4;
        for y in [0.1, 0.45, 0.8] {
            for x in [0.0, 1.0] {
                let slope = (w.value(x + h, y, 0.0) - w.value(x - h, y, 0.0)) / (2.0 * h);
                assert!(abs_diff_eq!(slope, 0.0, epsilon = 1e-9));
            }
        }
    }

    #[test]
    fn wave_is_even_in_time() {
        let w = wave(ModeShape::Cosine);
        assert_relative_eq!(w.value(0.3, 0.6, -0.2), w.value(0.3, 0.6, 0.2));
    }

    #[test]
    fn l2_error_is_root_mean_square() {
        let grid = Grid::new(1);
        let a = Field::from_fn(&grid, |_, _| 0.0);
        let mut b = a.clone();
        b.values[0] = 2.0;
        // one of four nodes differs by 2: sqrt(4 / 4)
        assert_abs_diff_eq!(l2_error(&a, &b), 1.0);
        assert_eq!(l2_error(&a, &a), 0.0);
    }
}
