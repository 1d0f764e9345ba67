//! Spatial indexing for efficient neighbor lookup.

use std::collections::HashMap;

/// Spatial grid for 2D neighbor queries in (x, z).
///
/// The plane is divided into square cells; a query returns everything stored
/// in the 3x3 block of cells around a point, so a cell size at least as large
/// as the search radius never misses a neighbor.
#[derive(Debug, Default)]
pub struct SpatialGrid<T> {
    cell_size: f64,
    cells: HashMap<(i64, i64), Vec<T>>,
}

impl<T> SpatialGrid<T> {
    /// Create a new spatial grid.
    ///
    /// `cell_size` must be positive and finite.
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size,
            cells: HashMap::new(),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn cell(&self, x: f64, z: f64) -> (i64, i64) {
        (
            (x / self.cell_size).floor() as i64,
            (z / self.cell_size).floor() as i64,
        )
    }

    /// Clear all data.
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Insert a value at the given coordinates.
    pub fn insert(&mut self, x: f64, z: f64, value: T) {
        let cell = self.cell(x, z);
        self.cells.entry(cell).or_default().push(value);
    }

    /// Query the 3x3 neighborhood around a point.
    ///
    /// Cell indices saturate at the `i64` range, so points far outside it all
    /// share the edge cells.
    pub fn query_neighborhood(&self, x: f64, z: f64) -> impl Iterator<Item = &T> {
        let (cx, cz) = self.cell(x, z);
        (-1..=1_i64)
            .flat_map(move |dx| {
                (-1..=1_i64).map(move |dz| (cx.saturating_add(dx), cz.saturating_add(dz)))
            })
            .filter_map(|cell| self.cells.get(&cell))
            .flatten()
    }
}
