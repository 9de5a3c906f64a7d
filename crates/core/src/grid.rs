//! Bounded rows x cols cell buffer used for tile patterns.

use crate::geometry::{Position, Vector};
use crate::types::{Cell, WorldError};

/// Non-wrapping cell buffer. Reads outside the bounds return `None` and
/// writes outside the bounds are ignored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellGrid {
    rows: i32,
    cols: i32,
    cells: Vec<Cell>,
}

impl CellGrid {
    pub fn filled(rows: i32, cols: i32, cell: Cell) -> Result<Self, WorldError> {
        if rows < 1 || cols < 1 {
            return Err(WorldError::InvalidDimensions { rows, cols });
        }
        Ok(Self { rows, cols, cells: vec![cell; (rows as usize) * (cols as usize)] })
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn size(&self) -> Vector {
        Vector::new(self.rows, self.cols)
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row >= 0 && pos.col >= 0 && pos.row < self.rows && pos.col < self.cols
    }

    pub fn get(&self, pos: Position) -> Option<Cell> {
        if !self.contains(pos) {
            return None;
        }
        Some(self.cells[self.index(pos)])
    }

    pub fn set(&mut self, pos: Position, cell: Cell) {
        if !self.contains(pos) {
            return;
        }
        let idx = self.index(pos);
        self.cells[idx] = cell;
    }

    pub fn count(&self, predicate: impl Fn(Cell) -> bool) -> usize {
        self.cells.iter().filter(|&&cell| predicate(cell)).count()
    }

    fn index(&self, pos: Position) -> usize {
        (pos.row as usize) * (self.cols as usize) + (pos.col as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_access_is_ignored() {
        let mut grid = CellGrid::filled(2, 3, Cell::WATER).expect("valid grid");
        grid.set(Position::new(-1, 0), Cell::LAND);
        grid.set(Position::new(0, 3), Cell::LAND);
        grid.set(Position::new(1, 2), Cell::LAND);

        assert_eq!(grid.get(Position::new(2, 0)), None);
        assert_eq!(grid.get(Position::new(1, 2)), Some(Cell::LAND));
        assert_eq!(grid.count(Cell::is_land), 1);
    }

    #[test]
    fn rejects_empty_dimensions() {
        assert_eq!(
            CellGrid::filled(0, 4, Cell::WATER),
            Err(WorldError::InvalidDimensions { rows: 0, cols: 4 })
        );
    }
}
