//! Nodal fields, i.e. one value per grid node at a single time level.

use nalgebra as na;

use crate::Grid;

/// Displacement values over all nodes of a [`Grid`].
///
/// Values are stored flat in the grid's column-major node order
/// (see [`Grid::flat_index`]),
/// which is also the order the [`Laplacian`][crate::Laplacian] expects.
#[derive(Clone)]
pub struct Field {
    /// The underlying vector of nodal values, exposed for convenience.
    ///
    /// Note that changing the length of this vector
    /// will cause a dimension mismatch with the Laplacian,
    /// leading to a panic when it is applied.
    pub values: na::DVector<f64>,
    side_len: usize,
}

impl Field {
    /// A field of zeros on the given grid.
    pub fn zeros(grid: &Grid) -> Self {
        Self {
            values: na::DVector::zeros(grid.node_count()),
            side_len: grid.side_len(),
        }
    }

    /// Build a field by evaluating a function at every node's coordinates.
    pub fn from_fn(grid: &Grid, mut f: impl FnMut(f64, f64) -> f64) -> Self {
        let side = grid.side_len();
        let values = na::DVector::from_fn(grid.node_count(), |k, _| {
            f(grid.coord(k % side), grid.coord(k / side))
        });
        Self {
            values,
            side_len: side,
        }
    }

    #[inline]
    pub(crate) fn from_values(values: na::DVector<f64>, side_len: usize) -> Self {
        debug_assert_eq!(values.len(), side_len * side_len);
        Self { values, side_len }
    }

    /// Number of nodes along each axis.
    #[inline]
    pub fn side_len(&self) -> usize {
        self.side_len
    }

    /// Value at the node with axis indices `(i, j)`.
    #[inline]
    pub fn at(&self, i: usize, j: usize) -> f64 {
        self.values[j * self.side_len + i]
    }

    /// Copy the field into a matrix where entry `(i, j)`
    /// is the value at `(x_i, y_j)`.
    pub fn to_matrix(&self) -> na::DMatrix<f64> {
        na::DMatrix::from_column_slice(self.side_len, self.side_len, self.values.as_slice())
    }

    /// Largest absolute value over the four edges of the square.
    pub fn max_abs_on_edges(&self) -> f64 {
        let last = self.side_len - 1;
        (0..self.side_len)
            .flat_map(|k| [(k, 0), (k, last), (0, k), (last, k)])
            .map(|(i, j)| self.at(i, j).abs())
            .fold(0.0, f64::max)
    }

    /// Largest absolute value over the whole field.
    pub fn max_abs(&self) -> f64 {
        self.values.amax()
    }
}

//
// std trait impls for math ops and such
//

impl std::fmt::Debug for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{0}x{0} field, values {1:?}", self.side_len, self.values)
    }
}

impl PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        self.side_len == other.side_len && self.values == other.values
    }
}

impl std::ops::Add for Field {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Field::from_values(self.values + rhs.values, self.side_len)
    }
}

impl std::ops::AddAssign<&Field> for Field {
    fn add_assign(&mut self, rhs: &Field) {
        self.values += &rhs.values;
    }
}

impl std::ops::Sub<&Field> for &Field {
    type Output = Field;

    fn sub(self, rhs: &Field) -> Self::Output {
        Field::from_values(&self.values - &rhs.values, self.side_len)
    }
}

impl std::ops::Mul<Field> for f64 {
    type Output = Field;

    fn mul(self, rhs: Field) -> Self::Output {
        Field::from_values(self * rhs.values, rhs.side_len)
    }
}

impl std::ops::Mul<&Field> for f64 {
    type Output = Field;

    fn mul(self, rhs: &Field) -> Self::Output {
        Field::from_values(self * &rhs.values, rhs.side_len)
    }
}
