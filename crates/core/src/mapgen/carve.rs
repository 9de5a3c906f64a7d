//! Turns cave nodes into land on a water tile.

use std::f64::consts::TAU;

use rand_chacha::rand_core::Rng;

use crate::geometry::{Position, Vector, wrap_axis};
use crate::grid::CellGrid;
use crate::types::Cell;

use super::cave::Node;
use super::random::unit_f64;

/// Nodes below this radius are carved as a plain disc.
const SOLID_RADIUS: f64 = 2.0;

/// Carves every node in order. Large nodes are broken into `ceil(radius)`
/// half-size discs scattered around the centre so caverns come out lumpy.
pub(crate) fn carve_nodes<R: Rng + ?Sized>(
    rng: &mut R,
    tile: &mut CellGrid,
    nodes: &[Node],
    stagger: Vector,
) {
    for node in nodes {
        if node.radius < SOLID_RADIUS {
            carve_disc(tile, node, stagger);
            continue;
        }

        let mut carved = 0.0;
        while carved < node.radius {
            let angle = unit_f64(rng) * TAU;
            let distance = (unit_f64(rng) + unit_f64(rng)) * node.radius * 0.5;
            let row = node.row + (angle.cos() * distance).round();
            let col = node.col + (angle.sin() * distance).round();
            let lobe = Node::new(row, col, (node.radius + 1.0) / 2.0, node.origin);
            carve_disc(tile, &lobe, stagger);
            carved += 1.0;
        }
    }
}

/// Marks every cell whose integer coordinates lie within `node.radius` of the
/// centre. Cells past an edge land on the opposite edge, shifted by the stagger
/// that the neighbouring tile copy is laid with.
pub(crate) fn carve_disc(tile: &mut CellGrid, node: &Node, stagger: Vector) {
    let rows = tile.rows();
    let cols = tile.cols();
    let radius2 = node.radius * node.radius;

    let min_row = (node.row - node.radius).floor() as i32;
    let max_row = (node.row + node.radius + 1.0).floor() as i32;
    let min_col = (node.col - node.radius).floor() as i32;
    let max_col = (node.col + node.radius + 1.0).floor() as i32;

    for col in min_col..max_col {
        for row in min_row..max_row {
            if node.dist2_to(f64::from(row), f64::from(col)) > radius2 {
                continue;
            }
            tile.set(fold_into_tile(row, col, rows, cols, stagger), Cell::LAND);
        }
    }
}

pub(crate) fn fold_into_tile(
    mut row: i32,
    mut col: i32,
    rows: i32,
    cols: i32,
    stagger: Vector,
) -> Position {
    if row < 0 {
        row += rows;
        col += stagger.cols;
    } else if row >= rows {
        row -= rows;
        col -= stagger.cols;
    }

    if col < 0 {
        col += cols;
        row += stagger.rows;
    } else if col >= cols {
        col -= cols;
        row -= stagger.rows;
    }

    Position::new(wrap_axis(row, rows), wrap_axis(col, cols))
}
