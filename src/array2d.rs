//! Small row-major 2D array used for the frame buffer and its orientation transforms

use alloc::vec::Vec;
use core::fmt;

/// Error returned for operations the grid does not implement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotSupported;

impl fmt::Display for NotSupported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Rotation not supported yet")
    }
}

/// A `rows` x `cols` array stored row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    rows: usize,
    cols: usize,
    cells: Vec<T>,
}

impl<T: Copy> Grid<T> {
    /// Creates a grid with every cell set to `fill`
    pub fn new(rows: usize, cols: usize, fill: T) -> Self {
        let mut cells = Vec::new();
        cells.resize(rows * cols, fill);
        Grid { rows, cols, cells }
    }

    /// Builds a grid from equally long rows
    ///
    /// Returns `None` if the rows differ in length.
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Option<Self> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut cells = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            let row = row.as_ref();
            if row.len() != cols {
                return None;
            }
            cells.extend_from_slice(row);
        }
        Some(Grid {
            rows: rows.len(),
            cols,
            cells,
        })
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Cell at (`row`, `col`), `None` outside the grid
    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        if row < self.rows && col < self.cols {
            Some(self.cells[row * self.cols + col])
        } else {
            None
        }
    }

    /// Overwrites the cell at (`row`, `col`)
    ///
    /// Returns `false` and leaves the grid untouched outside its bounds.
    pub fn set(&mut self, row: usize, col: usize, value: T) -> bool {
        if row < self.rows && col < self.cols {
            self.cells[row * self.cols + col] = value;
            true
        } else {
            false
        }
    }

    /// Sets every cell to `value`
    pub fn fill(&mut self, value: T) {
        self.cells.iter_mut().for_each(|c| *c = value);
    }

    /// Row-major linearisation
    pub fn flatten(&self) -> Vec<T> {
        self.cells.clone()
    }

    /// Reverses the order of the cells within each row (left/right flip)
    pub fn mirror_columns(&self) -> Self {
        let mut cells = Vec::with_capacity(self.cells.len());
        for row in self.cells.chunks(self.cols.max(1)) {
            cells.extend(row.iter().rev());
        }
        Grid {
            rows: self.rows,
            cols: self.cols,
            cells,
        }
    }

    /// Reverses the order of the rows (upside down flip)
    pub fn mirror_rows(&self) -> Self {
        let mut cells = Vec::with_capacity(self.cells.len());
        for row in self.cells.chunks(self.cols.max(1)).rev() {
            cells.extend_from_slice(row);
        }
        Grid {
            rows: self.rows,
            cols: self.cols,
            cells,
        }
    }

    /// Swaps rows and columns: `out[r][c] = self[c][r]`
    pub fn transpose(&self) -> Self {
        let mut cells = Vec::with_capacity(self.cells.len());
        for c in 0..self.cols {
            for r in 0..self.rows {
                cells.push(self.cells[r * self.cols + c]);
            }
        }
        Grid {
            rows: self.cols,
            cols: self.rows,
            cells,
        }
    }

    /// Rotation by an arbitrary angle code
    ///
    /// Not implemented for any angle; always returns [NotSupported].
    pub fn rotate(&self, _angle: i32) -> Result<Self, NotSupported> {
        Err(NotSupported)
    }
}
