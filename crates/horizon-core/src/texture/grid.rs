//! Row-major 2D storage shared by textures and the output image.

use super::TextureError;

/// A `height × width` grid of cells stored contiguously, row by row.
///
/// Cell `(row, col)` lives at `row * width + col`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    /// Wrap an existing row-major buffer.
    pub fn from_vec(height: usize, width: usize, cells: Vec<T>) -> Result<Self, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::Empty);
        }
        if cells.len() != width * height {
            return Err(TextureError::SizeMismatch {
                expected: width * height,
                actual: cells.len(),
            });
        }
        Ok(Self { width, height, cells })
    }

    /// Build a grid by evaluating `f(row, col)` for every cell.
    ///
    /// A zero dimension gives an empty grid; texture constructors reject it.
    pub fn from_fn(height: usize, width: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut cells = Vec::with_capacity(width * height);
        for row in 0..height {
            for col in 0..width {
                cells.push(f(row, col));
            }
        }
        Self { width, height, cells }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Bounds-checked access.
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row < self.height && col < self.width {
            self.cells.get(row * self.width + col)
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut T> {
        if row < self.height && col < self.width {
            self.cells.get_mut(row * self.width + col)
        } else {
            None
        }
    }

    /// Access with the row clamped to the last valid row and the column
    /// wrapped around the width. `None` only for an empty grid.
    pub fn at_clamped(&self, row: usize, col: usize) -> Option<&T> {
        let row = row.min(self.height.checked_sub(1)?);
        let col = col.checked_rem(self.width)?;
        self.cells.get(row * self.width + col)
    }

    pub fn rows(&self) -> std::slice::ChunksExact<'_, T> {
        self.cells.chunks_exact(self.width.max(1))
    }

    pub fn rows_mut(&mut self) -> std::slice::ChunksExactMut<'_, T> {
        self.cells.chunks_exact_mut(self.width.max(1))
    }

    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.cells
    }

    pub fn into_vec(self) -> Vec<T> {
        self.cells
    }
}

impl<T: Clone> Grid<T> {
    /// A grid with every cell set to `value`.
    pub fn filled(height: usize, width: usize, value: T) -> Self {
        Self {
            width,
            height,
            cells: vec![value; width * height],
        }
    }
}

impl Grid<[u8; 3]> {
    /// The pixels as one flat `RGBRGB...` byte slice.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vec_rejects_wrong_length() {
        let err = Grid::from_vec(2, 3, vec![0u8; 5]).unwrap_err();
        assert!(matches!(err, TextureError::SizeMismatch { expected: 6, actual: 5 }));
    }

    #[test]
    fn test_from_vec_rejects_empty() {
        assert!(matches!(Grid::<u8>::from_vec(0, 3, vec![]), Err(TextureError::Empty)));
    }

    #[test]
    fn test_cells_are_row_major() {
        let grid = Grid::from_fn(3, 4, |row, col| row * 10 + col);
        assert_eq!(grid.as_slice()[6], 12);
        assert_eq!(grid.get(1, 2), Some(&12));
        assert_eq!(grid.get(3, 0), None);
        assert_eq!(grid.get(0, 4), None);
    }

    #[test]
    fn test_at_clamped_clamps_rows_and_wraps_columns() {
        let grid = Grid::from_fn(3, 4, |row, col| row * 10 + col);
        assert_eq!(grid.at_clamped(7, 1), Some(&21));
        assert_eq!(grid.at_clamped(0, 5), Some(&1));
    }

    #[test]
    fn test_rgb_grid_as_bytes_is_flat() {
        let grid = Grid::filled(1, 2, [1u8, 2, 3]);
        assert_eq!(grid.as_bytes(), &[1, 2, 3, 1, 2, 3]);
    }

    #[test]
    fn test_at_clamped_on_empty_grid() {
        assert_eq!(Grid::<u8>::from_fn(0, 4, |_, _| 1).at_clamped(0, 0), None);
        assert_eq!(Grid::filled(3, 0, 1u8).at_clamped(2, 7), None);
        assert_eq!(Grid::filled(3, 0, 1u8).rows().count(), 0);
    }
}
