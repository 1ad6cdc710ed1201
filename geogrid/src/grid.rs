use crate::GeogridError;

/// A row-major 2-D array of cell values.
///
/// Dimensions are fixed at construction. `(col, row)` indexing, with
/// `(0, 0)` at the upper-left cell to match raster storage order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    /// Number of (columns, rows) in this grid.
    dimensions: (usize, usize),

    /// Cell values, row-major.
    cells: Vec<T>,
}

impl<T> Grid<T>
where
    T: Copy,
{
    /// Returns a grid with every cell set to `fill`.
    pub fn filled(dimensions: (usize, usize), fill: T) -> Self {
        let (cols, rows) = dimensions;
        Self {
            dimensions,
            cells: vec![fill; cols * rows],
        }
    }

    /// Returns a grid wrapping `cells`, which must hold exactly
    /// `cols * rows` values in row-major order.
    pub fn from_cells(dimensions: (usize, usize), cells: Vec<T>) -> Result<Self, GeogridError> {
        let (cols, rows) = dimensions;
        if cells.len() != cols * rows {
            return Err(GeogridError::CellCount(cells.len(), cols, rows));
        }
        Ok(Self { dimensions, cells })
    }

    /// Returns the number of (columns, rows) in this grid.
    pub fn dimensions(&self) -> (usize, usize) {
        self.dimensions
    }

    /// Returns the number of cells in this grid.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns the value at `(col, row)`, if in bounds.
    pub fn get(&self, (col, row): (usize, usize)) -> Option<T> {
        if col < self.dimensions.0 && row < self.dimensions.1 {
            Some(self.cells[self.linear_index((col, row))])
        } else {
            None
        }
    }

    /// Sets the value at `(col, row)`.
    ///
    /// Out-of-bounds writes are ignored.
    pub fn set(&mut self, (col, row): (usize, usize), value: T) {
        if col < self.dimensions.0 && row < self.dimensions.1 {
            let idx = self.linear_index((col, row));
            self.cells[idx] = value;
        }
    }

    /// Returns an iterator over all cell values in storage order.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.cells.iter().copied()
    }

    /// Returns an iterator over `((col, row), value)` pairs in
    /// storage order.
    pub fn enumerate(&self) -> impl Iterator<Item = ((usize, usize), T)> + '_ {
        let cols = self.dimensions.0;
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, value)| ((idx % cols, idx / cols), *value))
    }

    fn linear_index(&self, (col, row): (usize, usize)) -> usize {
        row * self.dimensions.0 + col
    }
}
