//! Land connectivity inside one tile. Regions are 4-connected and never wrap,
//! so a joined tile is connected in every copy of it.

use std::collections::VecDeque;

use crate::geometry::{Position, Vector};
use crate::grid::CellGrid;
use crate::types::Cell;

const STEPS: [Vector; 4] =
    [Vector::new(-1, 0), Vector::new(0, 1), Vector::new(1, 0), Vector::new(0, -1)];

/// Region label per cell (row-major, `None` for water) and the number of regions.
/// Labels follow the row-major position of each region's first cell.
pub(crate) fn land_regions(tile: &CellGrid) -> (Vec<Option<usize>>, usize) {
    let mut labels = vec![None; cell_count(tile)];
    let mut count = 0;

    for row in 0..tile.rows() {
        for col in 0..tile.cols() {
            let start = Position::new(row, col);
            if labels[index(tile, start)].is_some() || !is_land(tile, start) {
                continue;
            }
            labels[index(tile, start)] = Some(count);
            let mut queue = VecDeque::from([start]);
            while let Some(current) = queue.pop_front() {
                for step in STEPS {
                    let next = current.offset(step);
                    if !is_land(tile, next) || labels[index(tile, next)].is_some() {
                        continue;
                    }
                    labels[index(tile, next)] = Some(count);
                    queue.push_back(next);
                }
            }
            count += 1;
        }
    }

    (labels, count)
}

/// Carves the shortest water corridor from region 0 to its nearest neighbour
/// until the tile holds a single land region. Returns the corridors carved.
pub(crate) fn join_regions(tile: &mut CellGrid) -> usize {
    let mut joined = 0;
    loop {
        let (labels, count) = land_regions(tile);
        if count <= 1 {
            return joined;
        }
        let Some(corridor) = bridge_from_first_region(tile, &labels) else {
            return joined;
        };
        for pos in corridor {
            tile.set(pos, Cell::LAND);
        }
        joined += 1;
    }
}

/// Breadth-first search outward from every region-0 cell through water. Stops
/// at the first land cell of another region and returns the water cells between.
fn bridge_from_first_region(tile: &CellGrid, labels: &[Option<usize>]) -> Option<Vec<Position>> {
    let mut seen = vec![false; labels.len()];
    let mut came_from: Vec<Option<Position>> = vec![None; labels.len()];
    let mut queue = VecDeque::new();

    for row in 0..tile.rows() {
        for col in 0..tile.cols() {
            let pos = Position::new(row, col);
            if labels[index(tile, pos)] == Some(0) {
                seen[index(tile, pos)] = true;
                queue.push_back(pos);
            }
        }
    }

    while let Some(current) = queue.pop_front() {
        for step in STEPS {
            let next = current.offset(step);
            if !tile.contains(next) || seen[index(tile, next)] {
                continue;
            }
            seen[index(tile, next)] = true;
            came_from[index(tile, next)] = Some(current);

            if labels[index(tile, next)].is_none() {
                queue.push_back(next);
                continue;
            }

            let mut corridor = Vec::new();
            let mut at = current;
            while labels[index(tile, at)].is_none() {
                corridor.push(at);
                let Some(previous) = came_from[index(tile, at)] else {
                    break;
                };
                at = previous;
            }
            return Some(corridor);
        }
    }
    None
}

fn is_land(tile: &CellGrid, pos: Position) -> bool {
    tile.get(pos).is_some_and(Cell::is_land)
}

fn cell_count(tile: &CellGrid) -> usize {
    (tile.rows() as usize) * (tile.cols() as usize)
}

fn index(tile: &CellGrid, pos: Position) -> usize {
    (pos.row as usize) * (tile.cols() as usize) + (pos.col as usize)
}
