//! Finite difference operators as sparse matrices.
//!
//! The 2D Laplacian is assembled as the Kronecker sum
//! `(I ⊗ D) + (D ⊗ I)` of a 1D second difference matrix `D`
//! with the identity of the same size.
//! Since the same `D` is used along both axes,
//! the result is the same whether nodes are flattened
//! in row-major or column-major order.
//!
//! Operators here are unscaled, i.e. they compute
//! `h^2` times the second derivative.
//! The time stepper folds the `1/h^2` factor into the Courant number.

use nalgebra_sparse as nas;

use crate::Field;

/// The three-point second difference stencil `(1, -2, 1)`
/// on every row of a `len x len` matrix.
///
/// The first and last rows are simply truncated,
/// which is harmless when the boundary values are overwritten afterwards.
pub fn second_difference(len: usize) -> nas::CsrMatrix<f64> {
    assemble_1d(len, |row, coo| {
        if row > 0 {
            coo.push(row, row - 1, 1.0);
        }
        coo.push(row, row, -2.0);
        if row + 1 < len {
            coo.push(row, row + 1, 1.0);
        }
    })
}

/// Second difference with a reflected stencil on the first and last rows,
/// approximating a zero derivative at both ends.
///
/// Interior rows are `(1, -2, 1)`,
/// the first row is `(-2, 2)` and the last `(2, -2)`.
/// This is what you get by mirroring the ghost node
/// outside the domain onto its interior neighbor.
pub fn reflected_second_difference(len: usize) -> nas::CsrMatrix<f64> {
    assert!(len >= 2, "Reflected stencil needs at least two nodes");
    let last = len - 1;
    assemble_1d(len, |row, coo| {
        if row == 0 {
            coo.push(0, 0, -2.0);
            coo.push(0, 1, 2.0);
        } else if row == last {
            coo.push(last, last - 1, 2.0);
            coo.push(last, last, -2.0);
        } else {
            coo.push(row, row - 1, 1.0);
            coo.push(row, row, -2.0);
            coo.push(row, row + 1, 1.0);
        }
    })
}

fn assemble_1d(
    len: usize,
    mut fill_row: impl FnMut(usize, &mut nas::CooMatrix<f64>),
) -> nas::CsrMatrix<f64> {
    let mut coo = nas::CooMatrix::new(len, len);
    for row in 0..len {
        fill_row(row, &mut coo);
    }
    nas::CsrMatrix::from(&coo)
}

/// Kronecker sum `(I ⊗ d) + (d ⊗ I)` of a square matrix with itself.
///
/// Panics if `d` isn't square.
pub fn kronecker_sum(d: &nas::CsrMatrix<f64>) -> nas::CsrMatrix<f64> {
    assert_eq!(d.nrows(), d.ncols(), "Kronecker sum needs a square matrix");
    let n = d.nrows();
    let mut coo = nas::CooMatrix::new(n * n, n * n);
    for (row, col, &val) in d.triplet_iter() {
        for k in 0..n {
            // I ⊗ d: one copy of d per diagonal block
            coo.push(k * n + row, k * n + col, val);
            // d ⊗ I: d's entries spread over blocks, diagonal within each
            coo.push(row * n + k, col * n + k, val);
        }
    }
    // duplicate entries (the diagonal) are summed in the conversion
    nas::CsrMatrix::from(&coo)
}

/// The discrete 2D Laplacian of a grid,
/// applied to [`Field`]s over that grid.
///
/// Constructed with [`Boundary::laplacian`][crate::Boundary::laplacian].
#[derive(Clone, Debug)]
pub struct Laplacian {
    mat: nas::CsrMatrix<f64>,
    side_len: usize,
}

impl Laplacian {
    /// Build the 2D operator from a 1D second difference matrix.
    pub fn from_1d(d: &nas::CsrMatrix<f64>) -> Self {
        Self {
            mat: kronecker_sum(d),
            side_len: d.nrows(),
        }
    }

    /// Apply the operator to a field.
    ///
    /// Panics if the field belongs to a grid of a different size.
    pub fn apply(&self, input: &Field) -> Field {
        assert_eq!(
            input.side_len(),
            self.side_len,
            "Field and Laplacian are defined on different grids"
        );
        Field::from_values(&self.mat * &input.values, self.side_len)
    }

    /// The underlying sparse matrix.
    #[inline]
    pub fn csr(&self) -> &nas::CsrMatrix<f64> {
        &self.mat
    }

    /// Consume the operator, returning its sparse matrix.
    pub fn into_csr(self) -> nas::CsrMatrix<f64> {
        self.mat
    }

    /// Largest number of stored entries in a single row.
    pub fn max_row_nnz(&self) -> usize {
        self.mat.row_iter().map(|row| row.nnz()).max().unwrap_or(0)
    }
}

impl PartialEq for Laplacian {
    fn eq(&self, other: &Self) -> bool {
        self.side_len == other.side_len && self.mat == other.mat
    }
}

impl std::ops::Mul<&Field> for &Laplacian {
    type Output = Field;

    fn mul(self, rhs: &Field) -> Self::Output {
        self.apply(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra as na;
    use nalgebra_sparse::convert::serial::convert_csr_dense;

    #[test]
    fn second_difference_is_tridiagonal() {
        let d = convert_csr_dense(&second_difference(4));
        #[rustfmt::skip]
        let expected = na::DMatrix::from_row_slice(4, 4, &[
            -2.,  1.,  0.,  0.,
             1., -2.,  1.,  0.,
             0.,  1., -2.,  1.,
             0.,  0.,  1., -2.,
        ]);
        assert_eq!(d, expected);
    }

    #[test]
    fn reflected_rows_replace_only_the_ends() {
        let d = convert_csr_dense(&reflected_second_difference(4));
        #[rustfmt::skip]
        let expected = na::DMatrix::from_row_slice(4, 4, &[
            -2.,  2.,  0.,  0.,
             1., -2.,  1.,  0.,
             0.,  1., -2.,  1.,
             0.,  0.,  2., -2.,
        ]);
        assert_eq!(d, expected);

        // constants are in the kernel, as they should be with zero derivative
        let ones = na::DVector::from_element(4, 1.0);
        assert!((&d * ones).iter().all(|v| *v == 0.0));
    }

    #[test]
    fn kronecker_sum_matches_dense_construction() {
        let d1 = reflected_second_difference(3);
        let dense_d = convert_csr_dense(&d1);
        let id = na::DMatrix::<f64>::identity(3, 3);
        let expected = id.kronecker(&dense_d) + dense_d.kronecker(&id);

        let actual = convert_csr_dense(&kronecker_sum(&d1));
        assert_eq!(actual, expected);
    }

    #[test]
    fn five_point_stencil_at_interior_node() {
        let lap = Laplacian::from_1d(&second_difference(5));
        assert_eq!(lap.csr().nrows(), 25);
        assert_eq!(lap.max_row_nnz(), 5);

        // center node (2, 2) has flat index 12
        let row = lap.csr().row(12);
        let mut entries: Vec<(usize, f64)> = row
            .col_indices()
            .iter()
            .copied()
            .zip(row.values().iter().copied())
            .collect();
        entries.sort_by_key(|(c, _)| *c);
        assert_eq!(
            entries,
            vec![(7, 1.), (11, 1.), (12, -4.), (13, 1.), (17, 1.)]
        );
    }

    #[test]
    fn laplacian_of_quadratic_is_constant_in_interior() {
        // u = x^2 + y^2 has Laplacian 4, so h^2 * 4 unscaled
        let grid = crate::Grid::new(6);
        let lap = Laplacian::from_1d(&second_difference(grid.side_len()));
        let u = Field::from_fn(&grid, |x, y| x * x + y * y);
        let lu = &lap * &u;
        let h2 = grid.dx() * grid.dx();
        for i in 1..grid.resolution() {
            for j in 1..grid.resolution() {
                approx::assert_relative_eq!(lu.at(i, j), 4.0 * h2, epsilon = 1e-12);
            }
        }
    }
}
