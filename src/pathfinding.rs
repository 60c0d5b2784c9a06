//! Tunnel-aware A* over the tile grid.
//!
//! Stepping into an existing tunnel costs 1; stepping into earth costs
//! 1 plus the dig penalty. With a penalty above zero, enemies reuse the
//! tunnel network instead of always carving the Manhattan-shortest route.
//! Manhattan distance stays admissible because every step costs at least 1.

use std::collections::VecDeque;

use micromegas_tracing::prelude::span_scope;

use crate::components::{Direction, GridPosition};
use crate::grid::Grid;

/// A route from start to goal, both inclusive. The front cell is where the
/// owner currently stands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path {
    cells: VecDeque<GridPosition>,
    cost: u32,
}

impl Path {
    pub fn new(cells: impl IntoIterator<Item = GridPosition>, cost: u32) -> Self {
        Self {
            cells: cells.into_iter().collect(),
            cost,
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Already at the goal (or no route at all).
    pub fn is_trivial(&self) -> bool {
        self.cells.len() <= 1
    }

    /// Total search cost when the path was found.
    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn start(&self) -> Option<GridPosition> {
        self.cells.front().copied()
    }

    pub fn goal(&self) -> Option<GridPosition> {
        self.cells.back().copied()
    }

    /// The cell after the current one.
    pub fn next(&self) -> Option<GridPosition> {
        self.cells.get(1).copied()
    }

    /// Drop the current cell and return the new current cell.
    pub fn advance(&mut self) -> Option<GridPosition> {
        if self.cells.len() < 2 {
            return None;
        }
        self.cells.pop_front();
        self.cells.front().copied()
    }

    pub fn cells(&self) -> impl Iterator<Item = GridPosition> + '_ {
        self.cells.iter().copied()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.cost = 0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pathfinder {
    pub dig_penalty: u32,
}

impl Default for Pathfinder {
    fn default() -> Self {
        Self { dig_penalty: 5 }
    }
}

impl Pathfinder {
    pub fn new(dig_penalty: u32) -> Self {
        Self { dig_penalty }
    }

    /// Cost of stepping into `pos`, or `None` if it cannot be entered.
    pub fn step_cost(&self, grid: &Grid, pos: GridPosition) -> Option<u32> {
        if !grid.is_traversable(pos) {
            return None;
        }
        if grid.is_tunnel(pos.x, pos.y) {
            Some(1)
        } else {
            Some(1 + self.dig_penalty)
        }
    }

    /// Traversable neighbors with their entry cost, in up/right/down/left order.
    /// This sets insertion order only; equal-cost ties are settled by the heap.
    fn successors(&self, grid: &Grid, pos: GridPosition) -> Vec<(GridPosition, u32)> {
        Direction::ALL
            .iter()
            .filter_map(|dir| {
                let next = pos.step(*dir);
                self.step_cost(grid, next).map(|cost| (next, cost))
            })
            .collect()
    }

    /// Cheapest route from `start` to `goal`. `None` means unreachable,
    /// which callers treat as "stay put and replan later".
    pub fn find_path(&self, grid: &Grid, start: GridPosition, goal: GridPosition) -> Option<Path> {
        span_scope!("find_path");

        if start == goal {
            return Some(Path::new([start], 0));
        }
        // An enclosed or invalid goal would otherwise exhaust the whole grid.
        if !grid.is_traversable(goal) {
            return None;
        }

        ::pathfinding::prelude::astar(
            &start,
            |pos| self.successors(grid, *pos),
            |pos| pos.manhattan(goal),
            |pos| *pos == goal,
        )
        .map(|(cells, cost)| Path::new(cells, cost))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
