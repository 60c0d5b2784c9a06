//! Shared enemy actor state and the primitives every kind builds on:
//! proximity checks, chase, patrol, flee and pumping.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::ai::EnemyKind;
use crate::components::{Direction, GridPosition};
use crate::config::{AiTuning, SpawnConfig};
use crate::grid::Grid;
use crate::pathfinding::{Path, Pathfinder};

/// Attempts per patrol point before giving up on it.
const PATROL_POINT_ATTEMPTS: usize = 100;

/// Which behavior branch ran on the most recent tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AiState {
    #[default]
    Patrol,
    Chase,
    Cautious,
    Flee,
    Fire,
}

/// Ranged attack bookkeeping (Fygar only).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FireState {
    pub ready: bool,
    pub cooldown_until_ms: u64,
    /// Direction of the last armed attack, for the rendering layer.
    pub direction: Option<Direction>,
    /// Set when an attack is armed; cleared by [`Enemy::take_armed_fire`].
    pub just_armed: bool,
}

impl Default for FireState {
    fn default() -> Self {
        Self {
            ready: true,
            cooldown_until_ms: 0,
            direction: None,
            just_armed: false,
        }
    }
}

#[derive(Component, Debug, Clone)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub position: GridPosition,
    pub path: Path,
    pub state: AiState,
    pub patrol_points: Vec<GridPosition>,
    pub patrol_cursor: usize,
    pub move_delay_ms: u64,
    pub last_move_ms: u64,
    pub pump_count: u32,
    pub fire: Option<FireState>,
    /// Player cell as sensed at the start of the current update.
    pub target: GridPosition,
    pub now_ms: u64,
    pub tuning: AiTuning,
    rng: StdRng,
}

impl Enemy {
    /// Place an enemy at `position`, dig its starting cell and roll its
    /// patrol route. `seed` drives every random choice it makes. `None` when
    /// `position` is rock or off the grid.
    pub fn new(
        kind: EnemyKind,
        position: GridPosition,
        grid: &mut Grid,
        tuning: AiTuning,
        seed: u64,
    ) -> Option<Self> {
        if !grid.dig(position.x, position.y) {
            return None;
        }

        let mut enemy = Self {
            kind,
            position,
            path: Path::default(),
            state: AiState::Patrol,
            patrol_points: Vec::new(),
            patrol_cursor: 0,
            move_delay_ms: kind.move_delay_ms(&tuning),
            last_move_ms: 0,
            pump_count: 0,
            fire: (kind == EnemyKind::Fygar).then(FireState::default),
            target: position,
            now_ms: 0,
            tuning,
            rng: StdRng::seed_from_u64(seed),
        };
        enemy.generate_patrol_points(grid);
        Some(enemy)
    }

    pub fn pathfinder(&self) -> Pathfinder {
        Pathfinder::new(self.tuning.dig_penalty)
    }

    /// Roll 3-5 (per tuning) random interior non-rock waypoints.
    pub fn generate_patrol_points(&mut self, grid: &Grid) {
        self.patrol_points.clear();
        self.patrol_cursor = 0;
        if grid.width() < 3 || grid.height() < 3 {
            return;
        }

        let min = self.tuning.patrol_points_min;
        let max = self.tuning.patrol_points_max.max(min);
        let count = self.rng.gen_range(min..=max);
        for _ in 0..count {
            let found = (0..PATROL_POINT_ATTEMPTS).find_map(|_| {
                let p = GridPosition::new(
                    self.rng.gen_range(1..=grid.width() - 2),
                    self.rng.gen_range(1..=grid.height() - 2),
                );
                (!grid.is_rock(p.x, p.y)).then_some(p)
            });
            if let Some(p) = found {
                self.patrol_points.push(p);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Conditions
    // -----------------------------------------------------------------------

    pub fn distance_to_player(&self) -> u32 {
        self.position.manhattan(self.target)
    }

    pub fn is_player_nearby(&self) -> bool {
        self.distance_to_player() < self.tuning.nearby_distance
    }

    pub fn is_player_very_close(&self) -> bool {
        self.distance_to_player() < self.tuning.very_close_distance
    }

    pub fn is_being_pumped(&self) -> bool {
        self.pump_count > 0
    }

    // -----------------------------------------------------------------------
    // Actions
    // -----------------------------------------------------------------------

    /// Replace the current path with a fresh one to the player. Succeeds
    /// even when the player is unreachable; the next tick tries again.
    pub fn chase_player(&mut self, grid: &Grid) -> bool {
        self.state = AiState::Chase;
        self.path = self
            .pathfinder()
            .find_path(grid, self.position, self.target)
            .unwrap_or_default();
        true
    }

    /// Walk the patrol route. A waypoint that cannot be reached is skipped
    /// for this tick; reaching one moves the cursor on. A path left over from
    /// another behavior is dropped.
    pub fn patrol(&mut self, grid: &Grid) -> bool {
        if self.state != AiState::Patrol {
            self.path.clear();
        }
        self.state = AiState::Patrol;
        if self.patrol_points.is_empty() {
            self.generate_patrol_points(grid);
            return false;
        }
        if !self.path.is_trivial() {
            return true;
        }

        let count = self.patrol_points.len();
        let waypoint = self.patrol_points[self.patrol_cursor % count];
        match self.pathfinder().find_path(grid, self.position, waypoint) {
            None => {
                self.path.clear();
                self.patrol_cursor = (self.patrol_cursor + 1) % count;
                false
            }
            Some(path) => {
                if path.is_trivial() {
                    self.patrol_cursor = (self.patrol_cursor + 1) % count;
                }
                self.path = path;
                true
            }
        }
    }

    /// Cell `flee_distance` away from the player along the player-to-self
    /// direction, clamped to the grid interior.
    pub fn flee_target(&self, grid: &Grid) -> GridPosition {
        let dx = self.position.x - self.target.x;
        let dy = self.position.y - self.target.y;
        let dist = ((dx * dx + dy * dy) as f32).sqrt().max(1.0);
        let scale = self.tuning.flee_distance / dist;
        // `as` truncates toward zero
        let fx = (dx as f32 * scale) as i32;
        let fy = (dy as f32 * scale) as i32;

        GridPosition::new(
            (self.position.x + fx).max(1).min(grid.width() - 2),
            (self.position.y + fy).max(1).min(grid.height() - 2),
        )
    }

    /// Path away from the player. If no path exists, plan a single step into
    /// a random adjacent non-rock cell; the move timer still gates it.
    pub fn flee(&mut self, grid: &Grid) -> bool {
        self.state = AiState::Flee;
        let goal = self.flee_target(grid);
        if let Some(path) = self.pathfinder().find_path(grid, self.position, goal) {
            self.path = path;
            return true;
        }

        self.path.clear();
        let mut dirs = Direction::ALL;
        dirs.shuffle(&mut self.rng);
        let pathfinder = self.pathfinder();
        for dir in dirs {
            let next = self.position.step(dir);
            if let Some(cost) = pathfinder.step_cost(grid, next) {
                self.path = Path::new([self.position, next], cost);
                return true;
            }
        }
        false
    }

    /// Register one pump from the player. Removal happens on the next update.
    pub fn get_pumped(&mut self) {
        self.pump_count += 1;
        debug!(kind = self.kind.name(), pumps = self.pump_count, "enemy pumped");
    }

    /// Visual scale for the renderer.
    pub fn inflation(&self) -> f32 {
        1.0 + self.pump_count as f32 * 0.2
    }

    pub fn is_defeated(&self) -> bool {
        self.pump_count >= self.tuning.max_pump
    }

    /// Direction of an attack armed since the last call, if any.
    pub fn take_armed_fire(&mut self) -> Option<Direction> {
        let fire = self.fire.as_mut()?;
        if !fire.just_armed {
            return None;
        }
        fire.just_armed = false;
        fire.direction
    }

    // -----------------------------------------------------------------------
    // Per-tick driver
    // -----------------------------------------------------------------------

    /// Run one simulation tick. Returns `true` when the enemy should be
    /// removed from play.
    pub fn update(&mut self, now_ms: u64, player: GridPosition, grid: &mut Grid) -> bool {
        self.now_ms = now_ms;
        self.target = player;

        let before = self.state;
        self.kind.tree().tick(self, grid);
        if self.state != before {
            debug!(
                kind = self.kind.name(),
                x = self.position.x,
                y = self.position.y,
                from = ?before,
                to = ?self.state,
                "enemy state changed"
            );
        }

        if self.is_defeated() {
            return true;
        }

        if now_ms.saturating_sub(self.last_move_ms) > self.move_delay_ms {
            self.step(grid);
        }

        self.refresh_fire(now_ms);
        false
    }

    /// Commit one cell of the current path, digging it. With nothing left
    /// to follow, chasers and fleers replan.
    fn step(&mut self, grid: &mut Grid) {
        match self.path.next() {
            Some(next) if grid.is_traversable(next) => {
                self.path.advance();
                grid.dig(next.x, next.y);
                self.position = next;
                self.last_move_ms = self.now_ms;
            }
            Some(_) => self.path.clear(),
            None => match self.state {
                AiState::Chase => {
                    self.chase_player(grid);
                }
                AiState::Flee => {
                    self.flee(grid);
                }
                _ => {}
            },
        }
    }

    fn refresh_fire(&mut self, now_ms: u64) {
        if let Some(fire) = self.fire.as_mut()
            && !fire.ready
            && now_ms > fire.cooldown_until_ms
        {
            fire.ready = true;
        }
    }
}

/// Pick a spawn cell: x in `[1, width-2]`, y in the lower half, not rock,
/// and more than `min_player_distance` from the player on some axis.
/// Random attempts are bounded; after that the distance rule is dropped and
/// the band, then the whole grid, is scanned. `None` only if all is rock.
pub fn spawn_position(
    grid: &Grid,
    player: GridPosition,
    spawn: &SpawnConfig,
    rng: &mut impl Rng,
) -> Option<GridPosition> {
    let (w, h) = (grid.width(), grid.height());
    let far_enough = |p: GridPosition| {
        (p.x - player.x).abs() > spawn.min_player_distance
            || (p.y - player.y).abs() > spawn.min_player_distance
    };

    if w >= 3 && h >= 3 {
        let band = (h / 2).min(h - 2)..=h - 2;
        for _ in 0..spawn.placement_attempts {
            let p = GridPosition::new(rng.gen_range(1..=w - 2), rng.gen_range(band.clone()));
            if !grid.is_rock(p.x, p.y) && far_enough(p) {
                return Some(p);
            }
        }

        let mut cells: Vec<_> = band
            .flat_map(|y| (1..=w - 2).map(move |x| GridPosition::new(x, y)))
            .filter(|p| !grid.is_rock(p.x, p.y))
            .collect();
        if !cells.is_empty() {
            cells.sort_by_key(|p| std::cmp::Reverse(p.manhattan(player)));
            return cells.first().copied();
        }
    }

    grid.positions().find(|p| grid.is_traversable(*p))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
