//! Tile grid: undug earth, dug tunnels and indestructible rock.
//!
//! All queries accept any coordinate. Out-of-bounds cells are never valid,
//! never tunnel, never rock, and never traversable; nothing here panics on
//! bad input. Digging is the only mutation during a round and it is one-way.

use std::collections::HashSet;

use bevy::prelude::*;
use rand::Rng;
use thiserror::Error;

use crate::components::GridPosition;

// ---------------------------------------------------------------------------
// Tile types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tile {
    #[default]
    Undug,
    Tunnel,
    Rock,
}

impl Tile {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '.' => Some(Tile::Undug),
            'o' => Some(Tile::Tunnel),
            '#' => Some(Tile::Rock),
            _ => None,
        }
    }

    fn to_char(self) -> char {
        match self {
            Tile::Undug => '.',
            Tile::Tunnel => 'o',
            Tile::Rock => '#',
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridParseError {
    #[error("grid text is empty")]
    Empty,
    #[error("row {row} has width {found}, expected {expected}")]
    Ragged {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("unknown tile character '{ch}' at ({x}, {y})")]
    UnknownTile { ch: char, x: usize, y: usize },
}

// ---------------------------------------------------------------------------
// Grid resource
// ---------------------------------------------------------------------------

/// Fixed-size tile map, row-major.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
}

impl Grid {
    /// An all-earth grid.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            tiles: vec![Tile::Undug; (width * height) as usize],
        }
    }

    /// Parse an ASCII layout: `.` earth, `o` tunnel, `#` rock.
    pub fn parse(text: &str) -> Result<Self, GridParseError> {
        let lines: Vec<&str> = text.lines().collect();
        let width = lines.first().map(|l| l.chars().count()).unwrap_or(0);
        if lines.is_empty() || width == 0 {
            return Err(GridParseError::Empty);
        }

        let mut tiles = Vec::with_capacity(width * lines.len());
        for (y, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(GridParseError::Ragged {
                    row: y,
                    found,
                    expected: width,
                });
            }
            for (x, ch) in line.chars().enumerate() {
                let tile = Tile::from_char(ch).ok_or(GridParseError::UnknownTile { ch, x, y })?;
                tiles.push(tile);
            }
        }

        Ok(Self {
            width: width as i32,
            height: lines.len() as i32,
            tiles,
        })
    }

    /// Inverse of [`Grid::parse`].
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.tiles.len() + self.height as usize);
        for row in self.tiles.chunks(self.width.max(1) as usize) {
            out.extend(row.iter().map(|t| t.to_char()));
            out.push('\n');
        }
        out
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.is_valid_position(x, y)
            .then(|| (y * self.width + x) as usize)
    }

    pub fn is_valid_position(&self, x: i32, y: i32) -> bool {
        (0..self.width).contains(&x) && (0..self.height).contains(&y)
    }

    pub fn tile(&self, pos: GridPosition) -> Option<Tile> {
        self.index(pos.x, pos.y).map(|i| self.tiles[i])
    }

    pub fn is_tunnel(&self, x: i32, y: i32) -> bool {
        self.index(x, y)
            .is_some_and(|i| self.tiles[i] == Tile::Tunnel)
    }

    pub fn is_rock(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some_and(|i| self.tiles[i] == Tile::Rock)
    }

    /// In bounds and not rock.
    pub fn is_traversable(&self, pos: GridPosition) -> bool {
        self.tile(pos).is_some_and(|t| t != Tile::Rock)
    }

    /// Turn earth into tunnel. Succeeds without change on an existing
    /// tunnel; fails without change on rock or out of bounds.
    pub fn dig(&mut self, x: i32, y: i32) -> bool {
        let Some(i) = self.index(x, y) else {
            return false;
        };
        match self.tiles[i] {
            Tile::Rock => false,
            Tile::Tunnel => true,
            Tile::Undug => {
                self.tiles[i] = Tile::Tunnel;
                true
            }
        }
    }

    /// Overwrite a single cell. For level setup and fixtures, not gameplay.
    pub fn set(&mut self, pos: GridPosition, tile: Tile) {
        if let Some(i) = self.index(pos.x, pos.y) {
            self.tiles[i] = tile;
        }
    }

    /// Refill with earth and scatter `rock_count` distinct rocks over the
    /// interior (the outer ring never holds rock). Connectivity of the
    /// remaining earth is not guaranteed.
    pub fn reset(&mut self, rock_count: usize, rng: &mut impl Rng) {
        self.tiles.fill(Tile::Undug);

        if self.width < 3 || self.height < 3 {
            return;
        }
        let interior = ((self.width - 2) * (self.height - 2)) as usize;
        let target = rock_count.min(interior);

        let mut placed = HashSet::with_capacity(target);
        while placed.len() < target {
            let x = rng.gen_range(1..=self.width - 2);
            let y = rng.gen_range(1..=self.height - 2);
            if placed.insert((x, y)) {
                self.set(GridPosition::new(x, y), Tile::Rock);
            }
        }
    }

    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|t| **t == tile).count()
    }

    /// Every in-bounds cell, row by row.
    pub fn positions(&self) -> impl Iterator<Item = GridPosition> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| GridPosition::new(x, y)))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const TEST_GRID: &str = "\
.....
.o#..
.....";

    #[test]
    fn parse_small_grid() {
        let grid = Grid::parse(TEST_GRID).unwrap();
        assert_eq!(grid.width(), 5);
        assert_eq!(grid.height(), 3);
        assert!(grid.is_tunnel(1, 1));
        assert!(grid.is_rock(2, 1));
        assert_eq!(grid.tile(GridPosition::new(0, 0)), Some(Tile::Undug));
        assert_eq!(grid.render(), format!("{TEST_GRID}\n"));
    }

    #[test]
    fn out_of_bounds_queries_are_false() {
        let grid = Grid::parse(TEST_GRID).unwrap();
        for (x, y) in [(-1, 0), (0, -1), (5, 0), (0, 3), (100, 100)] {
            assert!(!grid.is_valid_position(x, y));
            assert!(!grid.is_tunnel(x, y));
            assert!(!grid.is_rock(x, y));
            assert!(!grid.is_traversable(GridPosition::new(x, y)));
        }
    }

    #[test]
    fn dig_transitions() {
        let mut grid = Grid::parse(TEST_GRID).unwrap();
        let before = grid.clone();

        // Rock never changes
        assert!(!grid.dig(2, 1));
        assert_eq!(grid, before);

        // Earth becomes tunnel
        assert!(grid.dig(0, 0));
        assert!(grid.is_tunnel(0, 0));

        // Tunnel stays tunnel and still reports success
        assert!(grid.dig(1, 1));
        assert!(grid.is_tunnel(1, 1));

        // Out of bounds fails without mutation
        let snapshot = grid.clone();
        assert!(!grid.dig(-1, 0));
        assert!(!grid.dig(5, 2));
        assert_eq!(grid, snapshot);
    }

    #[test]
    fn reset_places_interior_rocks() {
        let mut grid = Grid::new(25, 19);
        grid.dig(3, 3);
        let mut rng = StdRng::seed_from_u64(42);
        grid.reset(15, &mut rng);

        assert_eq!(grid.count(Tile::Rock), 15);
        assert_eq!(grid.count(Tile::Tunnel), 0);
        for pos in grid.positions() {
            let border = pos.x == 0 || pos.y == 0 || pos.x == 24 || pos.y == 18;
            if border {
                assert!(!grid.is_rock(pos.x, pos.y), "rock on border at {pos:?}");
            }
        }
    }

    #[test]
    fn reset_is_deterministic_per_seed() {
        let mut a = Grid::new(25, 19);
        let mut b = Grid::new(25, 19);
        a.reset(15, &mut StdRng::seed_from_u64(9));
        b.reset(15, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn reset_caps_rocks_at_interior_size() {
        let mut grid = Grid::new(4, 4);
        grid.reset(100, &mut StdRng::seed_from_u64(1));
        assert_eq!(grid.count(Tile::Rock), 4);
    }

    #[test]
    fn malformed_grids() {
        assert_eq!(Grid::parse(""), Err(GridParseError::Empty));
        assert_eq!(
            Grid::parse("...\n.."),
            Err(GridParseError::Ragged {
                row: 1,
                found: 2,
                expected: 3
            })
        );
        assert_eq!(
            Grid::parse("..?"),
            Err(GridParseError::UnknownTile { ch: '?', x: 2, y: 0 })
        );
    }
}
