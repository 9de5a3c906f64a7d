//! Line-oriented text format for finished maps.
//!
//! ```text
//! author <free text>   (optional)
//! teams <n>            (omitted when zero)
//! rows <n>
//! cols <n>
//!
//! m <one glyph per column>   (repeated `rows` times)
//! ```
//!
//! Glyphs: `.` land, `%` water, `?` unknown, `*` food, `!` dead ant, `0`-`9`
//! hill, `a`-`j` ant, `A`-`J` ant standing on its own team's hill.
//!
//! The whole artifact is rendered to memory before anything is written, so a
//! failed render never leaves a truncated map behind.

use std::io::{self, Write};
use std::str::FromStr;

use thiserror::Error;
use xxhash_rust::xxh3::xxh3_64;

use crate::geometry::Position;
use crate::types::{Cell, Entity, EntityKind, TeamId, Terrain, WorldError};
use crate::world::World;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MapParseError {
    #[error("line {line}: unknown directive `{directive}`")]
    UnknownDirective { line: usize, directive: String },
    #[error("line {line}: `{value}` is not a valid number")]
    InvalidNumber { line: usize, value: String },
    #[error("missing `{field}` header")]
    MissingHeader { field: &'static str },
    #[error("expected {expected} map rows, found {actual}")]
    RowCount { expected: usize, actual: usize },
    #[error("line {line}: expected {expected} cells, found {actual}")]
    RowWidth { line: usize, expected: usize, actual: usize },
    #[error("line {line}: unknown cell glyph `{glyph}`")]
    UnknownGlyph { line: usize, glyph: char },
    #[error("line {line}: team {team} is outside the declared {teams} teams")]
    TeamOutOfRange { line: usize, team: usize, teams: usize },
    #[error(transparent)]
    World(#[from] WorldError),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MapHeader {
    pub author: Option<String>,
    pub teams: usize,
    pub rows: i32,
    pub cols: i32,
}

/// Display glyph for one cell, using `scratch` as the entity lookup buffer.
///
/// Water and unknown terrain hide entities. On land the priority is ant on its
/// own hill, ant, hill, food, dead ant, then bare land.
pub fn cell_glyph(world: &World, pos: Position, scratch: &mut Vec<Entity>) -> char {
    match world.cell(pos).terrain() {
        Terrain::Water => return '%',
        Terrain::Unknown => return '?',
        Terrain::Land => {}
    }

    scratch.clear();
    world.entities_at(pos, scratch);
    let here: &[Entity] = scratch;

    let of_kind = |kind: EntityKind| here.iter().find(|entity| entity.kind() == kind);

    if let Some(ant) = of_kind(EntityKind::Ant) {
        let on_own_hill = here
            .iter()
            .any(|entity| entity.kind() == EntityKind::Hill && entity.team() == ant.team());
        return team_glyph(if on_own_hill { b'A' } else { b'a' }, ant.team());
    }
    if let Some(hill) = of_kind(EntityKind::Hill) {
        return team_glyph(b'0', hill.team());
    }
    if of_kind(EntityKind::Food).is_some() {
        return '*';
    }
    if of_kind(EntityKind::DeadAnt).is_some() {
        return '!';
    }
    '.'
}

fn team_glyph(base: u8, team: TeamId) -> char {
    char::from(base + team.index() as u8)
}

pub fn render_map(world: &World) -> String {
    render(world, true)
}

pub fn write_map<W: Write>(world: &World, out: &mut W) -> io::Result<()> {
    out.write_all(render_map(world).as_bytes())?;
    out.flush()
}

/// xxh3-64 of the rendered map without its author line.
pub fn fingerprint(world: &World) -> u64 {
    xxh3_64(render(world, false).as_bytes())
}

fn render(world: &World, include_author: bool) -> String {
    let cols = world.cols() as usize;
    let mut text = String::with_capacity((world.rows() as usize) * (cols + 3) + 64);

    if include_author {
        if let Some(author) = world.author().filter(|author| !author.is_empty()) {
            text.push_str(&format!("author {author}\n"));
        }
    }
    if world.teams() != 0 {
        text.push_str(&format!("teams {}\n", world.teams()));
    }
    text.push_str(&format!("rows {}\ncols {}\n\n", world.rows(), world.cols()));

    let mut scratch = Vec::new();
    for row in 0..world.rows() {
        text.push_str("m ");
        for col in 0..world.cols() {
            text.push(cell_glyph(world, Position::new(row, col), &mut scratch));
        }
        text.push('\n');
    }
    text
}

struct RawMap<'a> {
    header: MapHeader,
    rows: Vec<(usize, &'a str)>,
}

/// Reads only the header directives, stopping at the first `m` line.
pub fn parse_header(text: &str) -> Result<MapHeader, MapParseError> {
    scan(text, true).map(|raw| raw.header)
}

pub fn parse_map(text: &str) -> Result<World, MapParseError> {
    let RawMap { header, rows } = scan(text, false)?;

    if rows.len() != header.rows as usize {
        return Err(MapParseError::RowCount { expected: header.rows as usize, actual: rows.len() });
    }

    let mut world = World::new(header.rows, header.cols, header.teams)?;
    if let Some(author) = header.author {
        world.set_author(author);
    }

    for (row, (line, glyphs)) in rows.into_iter().enumerate() {
        let width = glyphs.chars().count();
        if width != header.cols as usize {
            return Err(MapParseError::RowWidth {
                line,
                expected: header.cols as usize,
                actual: width,
            });
        }
        for (col, glyph) in glyphs.chars().enumerate() {
            apply_glyph(&mut world, Position::new(row as i32, col as i32), glyph, line)?;
        }
    }

    Ok(world)
}

fn scan(text: &str, header_only: bool) -> Result<RawMap<'_>, MapParseError> {
    let mut author = None;
    let mut teams = 0_usize;
    let mut rows = None;
    let mut cols = None;
    let mut grid = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        if line.trim().is_empty() {
            continue;
        }
        let (directive, rest) = line.split_once(' ').unwrap_or((line, ""));
        match directive {
            "author" => author = Some(rest.to_string()),
            "teams" => teams = parse_number(line_no, rest)?,
            "rows" => rows = Some(parse_number(line_no, rest)?),
            "cols" => cols = Some(parse_number(line_no, rest)?),
            "m" if header_only => break,
            "m" => grid.push((line_no, rest)),
            other => {
                return Err(MapParseError::UnknownDirective {
                    line: line_no,
                    directive: other.to_string(),
                });
            }
        }
    }

    let rows = rows.ok_or(MapParseError::MissingHeader { field: "rows" })?;
    let cols = cols.ok_or(MapParseError::MissingHeader { field: "cols" })?;

    Ok(RawMap { header: MapHeader { author, teams, rows, cols }, rows: grid })
}

fn parse_number<T: FromStr>(line: usize, value: &str) -> Result<T, MapParseError> {
    value
        .trim()
        .parse()
        .map_err(|_| MapParseError::InvalidNumber { line, value: value.to_string() })
}

fn apply_glyph(
    world: &mut World,
    pos: Position,
    glyph: char,
    line: usize,
) -> Result<(), MapParseError> {
    let cell = match glyph {
        '%' => Cell::WATER,
        '?' => Cell::UNKNOWN,
        '.' | '*' | '!' | '0'..='9' | 'a'..='j' | 'A'..='J' => Cell::LAND,
        _ => return Err(MapParseError::UnknownGlyph { line, glyph }),
    };
    world.set_cell(pos, cell);

    match glyph {
        '*' => {
            world.create_food(pos);
        }
        '!' => {
            world.create_dead_ant(pos, TeamId::FIRST);
        }
        '0'..='9' => {
            let team = glyph_team(world, glyph, '0', line)?;
            world.create_hill(pos, team);
        }
        'a'..='j' => {
            let team = glyph_team(world, glyph, 'a', line)?;
            world.create_ant(pos, team);
        }
        'A'..='J' => {
            let team = glyph_team(world, glyph, 'A', line)?;
            world.create_hill(pos, team);
            world.create_ant(pos, team);
        }
        _ => {}
    }
    Ok(())
}

fn glyph_team(
    world: &World,
    glyph: char,
    base: char,
    line: usize,
) -> Result<TeamId, MapParseError> {
    let team = (glyph as usize) - (base as usize);
    if world.teams() != 0 && team >= world.teams() {
        return Err(MapParseError::TeamOutOfRange { line, team, teams: world.teams() });
    }
    Ok(TeamId::new(team)?)
}
