use bevy::prelude::*;

// ---------------------------------------------------------------------------
// Grid and spatial
// ---------------------------------------------------------------------------

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridPosition {
    pub x: i32,
    pub y: i32,
}

impl GridPosition {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighboring cell one step in `dir`.
    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn manhattan(self, other: Self) -> u32 {
        (self.x - other.x).unsigned_abs() + (self.y - other.y).unsigned_abs()
    }

    /// True when `other` is this cell or one of its eight neighbors.
    pub fn touches(self, other: Self) -> bool {
        (self.x - other.x).abs() <= 1 && (self.y - other.y).abs() <= 1
    }
}

/// Cardinal direction. Grid y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// Neighbor expansion order. Pathfinding ties are broken by this order,
    /// so changing it changes which of several equal-cost paths is chosen.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Grid offset for this direction.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }

    /// Direction of a single orthogonal step from `from` to `to`.
    pub fn between(from: GridPosition, to: GridPosition) -> Option<Direction> {
        match (to.x - from.x, to.y - from.y) {
            (1, 0) => Some(Direction::Right),
            (-1, 0) => Some(Direction::Left),
            (0, 1) => Some(Direction::Down),
            (0, -1) => Some(Direction::Up),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// The digger. Moves one cell per `move_delay_ms`, digging as it goes.
#[derive(Component, Debug, Clone)]
pub struct Player {
    pub position: GridPosition,
    pub move_delay_ms: u64,
    pub last_move_ms: u64,
}

impl Player {
    pub fn new(position: GridPosition, move_delay_ms: u64) -> Self {
        Self {
            position,
            move_delay_ms,
            last_move_ms: 0,
        }
    }
}

/// What the input layer wants the player to do on the next tick.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct PlayerIntent {
    pub step: Option<Direction>,
    pub pump: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manhattan_distance() {
        let a = GridPosition::new(0, 0);
        let b = GridPosition::new(3, 4);
        assert_eq!(a.manhattan(b), 7);
        assert_eq!(b.manhattan(a), 7);
    }

    #[test]
    fn direction_between_adjacent() {
        let a = GridPosition::new(1, 1);
        assert_eq!(
            Direction::between(a, GridPosition::new(2, 1)),
            Some(Direction::Right)
        );
        assert_eq!(
            Direction::between(a, GridPosition::new(0, 1)),
            Some(Direction::Left)
        );
        assert_eq!(
            Direction::between(a, GridPosition::new(1, 0)),
            Some(Direction::Up)
        );
        assert_eq!(
            Direction::between(a, GridPosition::new(1, 2)),
            Some(Direction::Down)
        );
        assert_eq!(Direction::between(a, GridPosition::new(2, 2)), None);
    }

    #[test]
    fn step_follows_delta() {
        let a = GridPosition::new(5, 5);
        for dir in Direction::ALL {
            let b = a.step(dir);
            assert_eq!(Direction::between(a, b), Some(dir));
            assert_eq!(Direction::between(b, a).map(|back| b.step(back)), Some(a));
        }
    }

    #[test]
    fn touches_includes_diagonals() {
        let a = GridPosition::new(3, 3);
        assert!(a.touches(GridPosition::new(4, 4)));
        assert!(a.touches(a));
        assert!(!a.touches(GridPosition::new(5, 3)));
    }
}
