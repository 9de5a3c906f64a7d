//! Toroidal terrain grid plus the ordered entity registry.
//!
//! Every coordinate that enters the world is wrapped first, so callers may pass
//! positions that lie outside `[0, rows) x [0, cols)`.

use std::collections::BTreeSet;

use crate::geometry::{Position, Vector, axis_distance, wrap_axis};
use crate::grid::CellGrid;
use crate::types::{Cell, Entity, EntityId, EntityKind, MAX_TEAMS, TeamId, WorldError};

#[derive(Clone, Debug)]
pub struct World {
    rows: i32,
    cols: i32,
    teams: usize,
    author: Option<String>,
    cells: Vec<Cell>,
    entities: BTreeSet<Entity>,
    next_entity_id: u32,
}

impl World {
    /// Creates a world with every cell set to land and no entities.
    pub fn new(rows: i32, cols: i32, teams: usize) -> Result<Self, WorldError> {
        if rows < 1 || cols < 1 {
            return Err(WorldError::InvalidDimensions { rows, cols });
        }
        if teams > MAX_TEAMS {
            return Err(WorldError::TooManyTeams { teams });
        }
        Ok(Self {
            rows,
            cols,
            teams,
            author: None,
            cells: vec![Cell::LAND; (rows as usize) * (cols as usize)],
            entities: BTreeSet::new(),
            next_entity_id: 1,
        })
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

    pub fn teams(&self) -> usize {
        self.teams
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn set_author(&mut self, author: impl Into<String>) {
        self.author = Some(author.into());
    }

    pub fn wrap(&self, pos: Position) -> Position {
        Position::new(wrap_axis(pos.row, self.rows), wrap_axis(pos.col, self.cols))
    }

    pub fn position(&self, row: i32, col: i32) -> Position {
        self.wrap(Position::new(row, col))
    }

    pub fn translate(&self, pos: Position, by: Vector) -> Position {
        self.wrap(pos.offset(by))
    }

    /// Shortest signed displacement from `b` to `a`. Each component lies in
    /// `[-dim / 2, dim - dim / 2)`.
    pub fn subtract(&self, a: Position, b: Position) -> Vector {
        let a = self.wrap(a);
        let b = self.wrap(b);
        let half = Vector::new(self.rows / 2, self.cols / 2);
        let shifted = self.wrap(a.offset(half).offset(-b.to_vector()));
        shifted.to_vector() - half
    }

    /// Squared toroidal distance: per axis the shorter way round, then summed squares.
    pub fn dist2(&self, a: Position, b: Position) -> i32 {
        let a = self.wrap(a);
        let b = self.wrap(b);
        let dr = axis_distance(a.row, b.row, self.rows);
        let dc = axis_distance(a.col, b.col, self.cols);
        dr * dr + dc * dc
    }

    pub fn cell(&self, pos: Position) -> Cell {
        self.cells[self.index(pos)]
    }

    pub fn set_cell(&mut self, pos: Position, cell: Cell) {
        let idx = self.index(pos);
        self.cells[idx] = cell;
    }

    pub fn clear(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    /// Sets a `size` block starting at `start`, wrapping across edges.
    pub fn fill(&mut self, start: Position, size: Vector, cell: Cell) {
        for r in 0..size.rows.max(0) {
            for c in 0..size.cols.max(0) {
                self.set_cell(start.offset(Vector::new(r, c)), cell);
            }
        }
    }

    /// Copies the top-left `size` block of `pattern` to `start`, wrapping across edges.
    pub fn set_cells(
        &mut self,
        start: Position,
        size: Vector,
        pattern: &CellGrid,
    ) -> Result<(), WorldError> {
        if size.rows <= 0 || size.cols <= 0 {
            return Ok(());
        }
        if pattern.rows() < size.rows || pattern.cols() < size.cols {
            return Err(WorldError::PatternTooSmall {
                rows: size.rows,
                cols: size.cols,
                actual_rows: pattern.rows(),
                actual_cols: pattern.cols(),
            });
        }
        for r in 0..size.rows {
            for c in 0..size.cols {
                if let Some(cell) = pattern.get(Position::new(r, c)) {
                    self.set_cell(Position::new(start.row + r, start.col + c), cell);
                }
            }
        }
        Ok(())
    }

    pub fn create_entity(&mut self, pos: Position, kind: EntityKind, team: TeamId) -> Entity {
        let id = EntityId::from_raw(self.next_entity_id);
        self.next_entity_id += 1;
        let entity = Entity::new(id, self.wrap(pos), kind, team);
        self.entities.insert(entity);
        entity
    }

    pub fn create_ant(&mut self, pos: Position, team: TeamId) -> Entity {
        self.create_entity(pos, EntityKind::Ant, team)
    }

    pub fn create_dead_ant(&mut self, pos: Position, team: TeamId) -> Entity {
        self.create_entity(pos, EntityKind::DeadAnt, team)
    }

    pub fn create_hill(&mut self, pos: Position, team: TeamId) -> Entity {
        self.create_entity(pos, EntityKind::Hill, team)
    }

    pub fn create_food(&mut self, pos: Position) -> Entity {
        self.create_entity(pos, EntityKind::Food, TeamId::FIRST)
    }

    /// Moves `entity` by removing its current key and reinserting it at the wrapped
    /// `pos`. Returns `None` and leaves the registry untouched if `entity` is not
    /// registered under its current key.
    pub fn set_entity_position(&mut self, entity: &Entity, pos: Position) -> Option<Entity> {
        if !self.entities.remove(entity) {
            return None;
        }
        let moved = entity.relocated(self.wrap(pos));
        self.entities.insert(moved);
        Some(moved)
    }

    pub fn translate_entity(&mut self, entity: &Entity, by: Vector) -> Option<Entity> {
        let target = entity.position().offset(by);
        self.set_entity_position(entity, target)
    }

    pub fn remove_entity(&mut self, entity: &Entity) -> bool {
        self.entities.remove(entity)
    }

    /// Appends every entity at `pos` to `out` in registry order and returns how many
    /// were appended. `out` is not cleared, so one buffer can be reused across calls.
    pub fn entities_at(&self, pos: Position, out: &mut Vec<Entity>) -> usize {
        let pos = self.wrap(pos);
        let before = out.len();
        out.extend(
            self.entities
                .range(Entity::lower_bound(pos)..)
                .take_while(|entity| entity.position() == pos)
                .copied(),
        );
        out.len() - before
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    fn index(&self, pos: Position) -> usize {
        let pos = self.wrap(pos);
        (pos.row as usize) * (self.cols as usize) + (pos.col as usize)
    }
}
