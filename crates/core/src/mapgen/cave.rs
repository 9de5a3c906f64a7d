//! Cavern layout for one tile: disc-packed nodes, corridors that span them, and
//! the final in-bounds node set that drives carving.

use rand_chacha::rand_core::Rng;

use crate::geometry::{Position, Vector};

use super::carve::fold_into_tile;
use super::random::{range_f64, range_usize, unit_f64};

const MIN_ATTEMPTS: usize = 128;
const MAX_ATTEMPTS: usize = 160;
const MIN_RADIUS: f64 = 2.0;
/// Exponent on the radius draw; above 1 favours small caverns.
const RADIUS_SKEW: f64 = 2.0;
const PATH_RADIUS: f64 = 1.0;
const PATH_JITTER: f64 = 0.25;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum NodeOrigin {
    Sampled,
    /// Copy of a sampled node shifted one tile across an edge (plus stagger).
    Ghost,
    Path,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Node {
    pub(crate) row: f64,
    pub(crate) col: f64,
    pub(crate) radius: f64,
    pub(crate) origin: NodeOrigin,
}

impl Node {
    pub(crate) fn new(row: f64, col: f64, radius: f64, origin: NodeOrigin) -> Self {
        Self { row, col, radius, origin }
    }

    pub(crate) fn dist2_to(&self, row: f64, col: f64) -> f64 {
        (self.row - row) * (self.row - row) + (self.col - col) * (self.col - col)
    }

    pub(crate) fn dist2(&self, other: &Self) -> f64 {
        self.dist2_to(other.row, other.col)
    }

    /// Nearest cell to the centre.
    pub(crate) fn centre(&self) -> Position {
        Position::new(self.row.round() as i32, self.col.round() as i32)
    }

    fn in_tile(&self, rows: i32, cols: i32) -> bool {
        let (rows, cols) = (f64::from(rows), f64::from(cols));
        self.row >= 0.0 && self.col >= 0.0 && self.row < rows && self.col < cols
    }
}

/// Nodes in the order they joined the spanning network, the edges that joined
/// them (indices into `nodes`), and the corridor nodes laid along those edges.
#[derive(Clone, Debug, Default)]
pub(crate) struct Network {
    pub(crate) nodes: Vec<Node>,
    pub(crate) edges: Vec<(usize, usize)>,
    pub(crate) paths: Vec<Node>,
}

#[derive(Clone, Debug)]
pub(crate) struct CaveLayout {
    /// In-bounds network nodes first, then every corridor node folded into the tile.
    pub(crate) nodes: Vec<Node>,
    pub(crate) sampled: usize,
}

pub(crate) fn max_radius(tile_rows: i32, tile_cols: i32) -> f64 {
    (f64::from(tile_rows.min(tile_cols)) / 4.0).max(MIN_RADIUS) + 1.0
}

pub(crate) fn build_cave<R: Rng + ?Sized>(
    rng: &mut R,
    tile_rows: i32,
    tile_cols: i32,
    stagger: Vector,
) -> CaveLayout {
    let sampled = sample_nodes(rng, tile_rows, tile_cols, stagger);
    let sampled_count = sampled.iter().filter(|node| node.origin == NodeOrigin::Sampled).count();
    let network = connect_nodes(rng, sampled);

    let mut nodes: Vec<Node> = network
        .nodes
        .into_iter()
        .filter(|node| node.in_tile(tile_rows, tile_cols))
        .collect();
    nodes.extend(
        network.paths.into_iter().map(|node| fold_path(node, tile_rows, tile_cols, stagger)),
    );

    CaveLayout { nodes, sampled: sampled_count }
}

/// A corridor that leaves the tile carries on in the neighbouring copy, so its
/// out-of-tile nodes are moved to where that copy's cells live in this tile.
fn fold_path(node: Node, tile_rows: i32, tile_cols: i32, stagger: Vector) -> Node {
    let centre = node.centre();
    let pos = fold_into_tile(centre.row, centre.col, tile_rows, tile_cols, stagger);
    Node::new(f64::from(pos.row), f64::from(pos.col), node.radius, node.origin)
}

/// Rejection-samples non-overlapping discs inside the tile. Each accepted disc
/// brings two ghosts: one shifted across the row edge, one across the column
/// edge, so carving near an edge lines up with the neighbouring tile copy.
pub(crate) fn sample_nodes<R: Rng + ?Sized>(
    rng: &mut R,
    tile_rows: i32,
    tile_cols: i32,
    stagger: Vector,
) -> Vec<Node> {
    let rows = f64::from(tile_rows);
    let cols = f64::from(tile_cols);
    let max_radius = max_radius(tile_rows, tile_cols);
    let attempts = range_usize(rng, MIN_ATTEMPTS, MAX_ATTEMPTS);

    let mut nodes: Vec<Node> = Vec::new();
    for _ in 0..attempts {
        let radius = MIN_RADIUS + unit_f64(rng).powf(RADIUS_SKEW) * (max_radius - MIN_RADIUS);
        let row = unit_f64(rng) * rows;
        let col = unit_f64(rng) * cols;

        let overlaps = nodes.iter().any(|node| {
            let reach = node.radius + radius + 1.0;
            node.dist2_to(row, col) <= reach * reach
        });
        if overlaps {
            continue;
        }

        nodes.push(Node::new(row, col, radius, NodeOrigin::Sampled));

        let stagger_cols = f64::from(stagger.cols);
        let stagger_rows = f64::from(stagger.rows);
        nodes.push(if row < rows / 2.0 {
            Node::new(row + rows, col + stagger_cols, radius, NodeOrigin::Ghost)
        } else {
            Node::new(row - rows, col - stagger_cols, radius, NodeOrigin::Ghost)
        });
        nodes.push(if col < cols / 2.0 {
            Node::new(row + stagger_rows, col + cols, radius, NodeOrigin::Ghost)
        } else {
            Node::new(row - stagger_rows, col - cols, radius, NodeOrigin::Ghost)
        });
    }
    nodes
}

/// Greedy nearest-pair growth from the first node (Prim's algorithm on squared
/// centre distance). Every join lays a jittered corridor of small path nodes.
pub(crate) fn connect_nodes<R: Rng + ?Sized>(rng: &mut R, mut pending: Vec<Node>) -> Network {
    let mut network = Network::default();
    if pending.is_empty() {
        return network;
    }
    network.nodes.push(pending.remove(0));

    while !pending.is_empty() {
        let mut best: Option<(f64, usize, usize)> = None;
        for (a_index, a) in network.nodes.iter().enumerate().rev() {
            for (b_index, b) in pending.iter().enumerate().rev() {
                let dist2 = a.dist2(b);
                if best.is_none_or(|(best_dist2, _, _)| dist2 < best_dist2) {
                    best = Some((dist2, a_index, b_index));
                }
            }
        }
        let Some((_, a_index, b_index)) = best else {
            break;
        };

        let from = network.nodes[a_index];
        let to = pending.remove(b_index);
        network.nodes.push(to);
        network.edges.push((a_index, network.nodes.len() - 1));
        lay_corridor(rng, &from, &to, &mut network.paths);
    }

    network
}

fn lay_corridor<R: Rng + ?Sized>(rng: &mut R, from: &Node, to: &Node, out: &mut Vec<Node>) {
    let dist = from.dist2(to).sqrt();
    if dist <= 0.0 {
        return;
    }
    let step = 0.5 / dist;
    let mut t = step * 0.5;
    while t < 1.0 {
        let row = from.row + (to.row - from.row) * t + range_f64(rng, -PATH_JITTER, PATH_JITTER);
        let col = from.col + (to.col - from.col) * t + range_f64(rng, -PATH_JITTER, PATH_JITTER);
        out.push(Node::new(row.round(), col.round(), PATH_RADIUS, NodeOrigin::Path));
        t += step;
    }
}
