//! Uniform grids on the unit square.

use fixedbitset as fb;

/// A uniform grid of `(N+1) x (N+1)` nodes covering `[0, 1] x [0, 1]`.
///
/// Nodes are addressed either by their axis indices `(i, j)`,
/// where `i` runs along x and `j` along y,
/// or by a flat index `j * (N + 1) + i`.
/// The flat ordering is the column-major storage order of
/// a `nalgebra` matrix indexed `[(i, j)]`,
/// which lets fields be reinterpreted as matrices without copying.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    resolution: usize,
    spacing: f64,
}

impl Grid {
    /// Create a grid with `resolution` uniform intervals along each axis.
    ///
    /// Panics if `resolution` is zero;
    /// the solver validates this before constructing a grid.
    pub fn new(resolution: usize) -> Self {
        assert!(resolution > 0, "Cannot create a grid with zero intervals");
        Self {
            resolution,
            spacing: 1.0 / resolution as f64,
        }
    }

    /// Number of intervals along each axis (`N`).
    #[inline]
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Number of nodes along each axis (`N + 1`).
    #[inline]
    pub fn side_len(&self) -> usize {
        self.resolution + 1
    }

    /// Total number of nodes (`(N + 1)^2`).
    #[inline]
    pub fn node_count(&self) -> usize {
        self.side_len() * self.side_len()
    }

    /// Distance between neighboring nodes along x.
    #[inline]
    pub fn dx(&self) -> f64 {
        self.spacing
    }

    /// Distance between neighboring nodes along y.
    /// Always equal to [`dx`][Self::dx] since the domain is square.
    #[inline]
    pub fn dy(&self) -> f64 {
        self.spacing
    }

    /// Smallest spacing over both axes, used to pick the time step.
    #[inline]
    pub fn min_spacing(&self) -> f64 {
        self.dx().min(self.dy())
    }

    /// Coordinate of the `i`th node along an axis.
    ///
    /// The last node sits exactly on 1.0 rather than at `N * (1/N)`.
    #[inline]
    pub fn coord(&self, i: usize) -> f64 {
        if i == self.resolution {
            1.0
        } else {
            i as f64 * self.spacing
        }
    }

    /// Iterate over the node coordinates along one axis.
    pub fn coords(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.side_len()).map(|i| self.coord(i))
    }

    /// Flat index of the node at axis indices `(i, j)`.
    #[inline]
    pub fn flat_index(&self, i: usize, j: usize) -> usize {
        debug_assert!(i < self.side_len() && j < self.side_len());
        j * self.side_len() + i
    }

    /// Axis indices `(i, j)` of the node at a flat index.
    #[inline]
    pub fn axis_indices(&self, flat: usize) -> (usize, usize) {
        (flat % self.side_len(), flat / self.side_len())
    }

    /// Whether the node at `(i, j)` lies on one of the four edges.
    #[inline]
    pub fn is_boundary(&self, i: usize, j: usize) -> bool {
        i == 0 || j == 0 || i == self.resolution || j == self.resolution
    }

    /// The set of flat indices of all nodes on the edges of the square.
    pub fn boundary(&self) -> fb::FixedBitSet {
        let mut set = fb::FixedBitSet::with_capacity(self.node_count());
        for k in 0..self.side_len() {
            set.insert(self.flat_index(k, 0));
            set.insert(self.flat_index(k, self.resolution));
            set.insert(self.flat_index(0, k));
            set.insert(self.flat_index(self.resolution, k));
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_cover_unit_interval() {
        let grid = Grid::new(8);
        assert_eq!(grid.side_len(), 9);
        assert_eq!(grid.node_count(), 81);
        assert_eq!(grid.dx(), 0.125);
        assert_eq!(grid.dx(), grid.dy());

        let coords: Vec<f64> = grid.coords().collect();
        assert_eq!(coords.first(), Some(&0.0));
        assert_eq!(coords.last(), Some(&1.0));
        for pair in coords.windows(2) {
            approx::assert_relative_eq!(pair[1] - pair[0], grid.dx());
        }
    }

    #[test]
    fn flat_indexing_is_column_major() {
        let grid = Grid::new(3);
        assert_eq!(grid.flat_index(0, 0), 0);
        assert_eq!(grid.flat_index(1, 0), 1);
        assert_eq!(grid.flat_index(0, 1), 4);
        for flat in 0..grid.node_count() {
            let (i, j) = grid.axis_indices(flat);
            assert_eq!(grid.flat_index(i, j), flat);
        }
    }

    #[test]
    fn boundary_set_contains_exactly_edge_nodes() {
        let grid = Grid::new(4);
        let boundary = grid.boundary();
        // 4 edges of 5 nodes each, corners counted once
        assert_eq!(boundary.count_ones(..), 16);
        for flat in 0..grid.node_count() {
            let (i, j) = grid.axis_indices(flat);
            assert_eq!(
                boundary.contains(flat),
                grid.is_boundary(i, j),
                "boundary membership wrong at ({i}, {j})"
            );
        }
    }

    #[test]
    fn smallest_grid_is_all_boundary() {
        let grid = Grid::new(1);
        assert_eq!(grid.boundary().count_ones(..), 4);
    }
}
