//! Hill slots inside the carved tile. Slot `h` sits in the `h`-th largest cavern.

use std::f64::consts::TAU;

use rand_chacha::rand_core::Rng;
use tracing::trace;

use crate::geometry::{Position, Vector};
use crate::grid::CellGrid;

use super::cave::Node;
use super::error::MapGenError;
use super::random::unit_f64;

/// The `count` largest nodes by radius. Ties keep their layout order. A node
/// whose centre touches the centre of one already taken is skipped, so no two
/// slots share a cavern.
pub(crate) fn hill_nodes(nodes: &[Node], count: usize) -> Result<Vec<Node>, MapGenError> {
    let mut ranked = nodes.to_vec();
    ranked.sort_by(|a, b| b.radius.total_cmp(&a.radius));

    let mut chosen: Vec<Node> = Vec::with_capacity(count);
    for node in ranked {
        if chosen.len() == count {
            break;
        }
        if chosen.iter().any(|taken| touching(taken.centre(), node.centre())) {
            continue;
        }
        chosen.push(node);
    }
    if chosen.len() < count {
        return Err(MapGenError::NotEnoughCaverns { needed: count, available: chosen.len() });
    }
    Ok(chosen)
}

/// One tile-local hill position per slot, in slot order. Hills never share or
/// touch a cell.
pub(crate) fn place_hills<R: Rng + ?Sized>(
    rng: &mut R,
    tile: &CellGrid,
    nodes: &[Node],
    hills_per_team: usize,
    max_attempts: Option<u32>,
) -> Result<Vec<Position>, MapGenError> {
    let mut placed = Vec::with_capacity(hills_per_team);
    for (slot, node) in hill_nodes(nodes, hills_per_team)?.iter().enumerate() {
        let pos = place_hill(rng, tile, node, slot, &placed, max_attempts)?;
        placed.push(pos);
    }
    Ok(placed)
}

/// Samples offsets between a quarter and a half of the node radius away from
/// its centre until one is a hill site clear of the hills already `placed`.
/// Without `max_attempts` this only returns once such a site turns up.
fn place_hill<R: Rng + ?Sized>(
    rng: &mut R,
    tile: &CellGrid,
    node: &Node,
    slot: usize,
    placed: &[Position],
    max_attempts: Option<u32>,
) -> Result<Position, MapGenError> {
    let mut attempts: u32 = 0;
    loop {
        if max_attempts.is_some_and(|cap| attempts >= cap) {
            return Err(MapGenError::HillPlacementExhausted { slot, attempts });
        }
        attempts = attempts.saturating_add(1);

        let angle = unit_f64(rng) * TAU;
        let distance = node.radius * 0.25 + unit_f64(rng) * node.radius * 0.25;
        let pos = Position::new(
            (node.row + angle.cos() * distance).round() as i32,
            (node.col + angle.sin() * distance).round() as i32,
        );

        if is_hill_site(tile, pos) && !placed.iter().any(|&hill| touching(hill, pos)) {
            trace!(slot, attempts, row = pos.row, col = pos.col, "hill placed");
            return Ok(pos);
        }
    }
}

fn touching(a: Position, b: Position) -> bool {
    (a.row - b.row).abs() <= 1 && (a.col - b.col).abs() <= 1
}

/// A hill needs a full ring of land inside the tile: `pos` sits at least one
/// cell away from every edge and its 3x3 neighbourhood is all land.
pub fn is_hill_site(tile: &CellGrid, pos: Position) -> bool {
    if pos.row < 1 || pos.col < 1 || pos.row >= tile.rows() - 1 || pos.col >= tile.cols() - 1 {
        return false;
    }
    (-1..=1).all(|dr| {
        (-1..=1).all(|dc| {
            tile.get(pos.offset(Vector::new(dr, dc))).is_some_and(|cell| cell.is_land())
        })
    })
}

#[cfg(test)]
mod tests {
    use rand_chacha::ChaCha8Rng;
    use rand_chacha::rand_core::SeedableRng;

    use super::*;
    use crate::mapgen::cave::NodeOrigin;
    use crate::types::Cell;

    fn node(row: f64, col: f64, radius: f64) -> Node {
        Node::new(row, col, radius, NodeOrigin::Sampled)
    }

    fn path(row: f64, col: f64) -> Node {
        Node::new(row, col, 1.0, NodeOrigin::Path)
    }

    #[test]
    fn hill_nodes_rank_by_radius_and_keep_ties_stable() {
        let nodes = [
            node(0.0, 0.0, 2.0),
            node(10.0, 10.0, 5.0),
            node(20.0, 20.0, 3.0),
            node(30.0, 30.0, 5.0),
        ];
        let ranked = hill_nodes(&nodes, 3).unwrap();
        assert_eq!(ranked, vec![nodes[1], nodes[3], nodes[2]]);
    }

    #[test]
    fn nodes_with_touching_centres_fill_one_slot() {
        let nodes = [
            node(10.0, 10.0, 4.0),
            path(10.0, 16.0),
            path(10.0, 17.0),
            path(10.0, 18.0),
            path(10.4, 18.2),
            path(11.0, 19.0),
            path(10.0, 20.0),
        ];
        let chosen = hill_nodes(&nodes, 4).unwrap();
        assert_eq!(chosen, vec![nodes[0], nodes[1], nodes[3], nodes[6]]);
        assert_eq!(
            hill_nodes(&nodes, 5),
            Err(MapGenError::NotEnoughCaverns { needed: 5, available: 4 })
        );
    }

    #[test]
    fn too_few_nodes_is_an_error() {
        let nodes = [node(0.0, 0.0, 2.0)];
        assert_eq!(
            hill_nodes(&nodes, 2),
            Err(MapGenError::NotEnoughCaverns { needed: 2, available: 1 })
        );
    }

    #[test]
    fn hill_site_needs_interior_land_ring() {
        let mut tile = CellGrid::filled(5, 6, Cell::LAND).unwrap();
        assert!(is_hill_site(&tile, Position::new(1, 1)));
        assert!(is_hill_site(&tile, Position::new(3, 4)));
        assert!(!is_hill_site(&tile, Position::new(0, 2)));
        assert!(!is_hill_site(&tile, Position::new(2, 5)));
        assert!(!is_hill_site(&tile, Position::new(4, 2)));

        tile.set(Position::new(3, 3), Cell::WATER);
        assert!(!is_hill_site(&tile, Position::new(2, 2)));
        assert!(!is_hill_site(&tile, Position::new(3, 4)));
        assert!(is_hill_site(&tile, Position::new(1, 1)));
    }

    #[test]
    fn open_land_places_one_hill_per_slot_near_its_node() {
        let tile = CellGrid::filled(30, 30, Cell::LAND).unwrap();
        let nodes = [node(8.0, 8.0, 6.0), node(20.0, 20.0, 4.0), node(15.0, 3.0, 2.0)];
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let hills = place_hills(&mut rng, &tile, &nodes, 2, None).unwrap();

        assert_eq!(hills.len(), 2);
        for (hill, owner) in hills.iter().zip(&nodes) {
            assert!(is_hill_site(&tile, *hill));
            let dist2 = owner.dist2_to(f64::from(hill.row), f64::from(hill.col));
            let reach = owner.radius * 0.5 + 1.0;
            assert!(dist2 <= reach * reach, "{hill:?} strayed from {owner:?}");
        }
    }

    #[test]
    fn corridor_slots_get_distinct_untouching_hills() {
        let tile = CellGrid::filled(30, 30, Cell::LAND).unwrap();
        let nodes = [
            node(10.0, 10.0, 4.0),
            path(10.0, 16.0),
            path(10.0, 17.0),
            path(10.0, 18.0),
            path(10.0, 19.0),
            path(10.0, 20.0),
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(29);
        let hills = place_hills(&mut rng, &tile, &nodes, 4, Some(1_000)).unwrap();

        assert_eq!(
            &hills[1..],
            &[Position::new(10, 16), Position::new(10, 18), Position::new(10, 20)]
        );
        for (i, a) in hills.iter().enumerate() {
            for b in &hills[i + 1..] {
                assert!(!touching(*a, *b), "{a:?} and {b:?} touch");
            }
        }
    }

    #[test]
    fn sites_next_to_an_earlier_hill_are_rejected() {
        let tile = CellGrid::filled(12, 12, Cell::LAND).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        assert_eq!(
            place_hill(&mut rng, &tile, &path(5.0, 6.0), 1, &[Position::new(5, 5)], Some(20)),
            Err(MapGenError::HillPlacementExhausted { slot: 1, attempts: 20 })
        );
        assert_eq!(
            place_hill(&mut rng, &tile, &path(5.0, 7.0), 1, &[Position::new(5, 5)], Some(20)),
            Ok(Position::new(5, 7))
        );
    }

    #[test]
    fn attempt_cap_reports_the_failing_slot() {
        let tile = CellGrid::filled(20, 20, Cell::WATER).unwrap();
        let nodes = [node(10.0, 10.0, 4.0)];
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert_eq!(
            place_hills(&mut rng, &tile, &nodes, 1, Some(50)),
            Err(MapGenError::HillPlacementExhausted { slot: 0, attempts: 50 })
        );
    }
}
