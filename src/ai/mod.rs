//! Enemy AI. Every enemy shares the [`Enemy`] actor state; each kind
//! contributes its own behavior tree through [`BehaviorPolicy`].
//!
//! Trees are priority lists re-evaluated from scratch every tick:
//! flee while being pumped, then the kind's engagement branch, then patrol.

pub mod enemy;
pub mod fygar;
pub mod pooka;

use std::sync::LazyLock;

use crate::behavior::{Behavior, BehaviorTree, action, guarded};
use crate::config::AiTuning;
use crate::grid::Grid;

pub use enemy::{AiState, Enemy, FireState, spawn_position};
pub use fygar::Fygar;
pub use pooka::Pooka;

/// Per-kind tree construction and pacing.
pub trait BehaviorPolicy {
    /// Build the kind's tree. Called once per kind; the result is shared by
    /// every enemy of that kind.
    fn build_tree() -> BehaviorTree<Enemy, Grid>;

    fn move_delay_ms(tuning: &AiTuning) -> u64 {
        tuning.base_move_delay_ms
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Pooka,
    Fygar,
}

static POOKA_TREE: LazyLock<BehaviorTree<Enemy, Grid>> = LazyLock::new(|| Pooka::build_tree());
static FYGAR_TREE: LazyLock<BehaviorTree<Enemy, Grid>> = LazyLock::new(|| Fygar::build_tree());

impl EnemyKind {
    pub fn tree(self) -> &'static dyn Behavior<Enemy, Grid> {
        match self {
            EnemyKind::Pooka => &**POOKA_TREE,
            EnemyKind::Fygar => &**FYGAR_TREE,
        }
    }

    pub fn move_delay_ms(self, tuning: &AiTuning) -> u64 {
        match self {
            EnemyKind::Pooka => Pooka::move_delay_ms(tuning),
            EnemyKind::Fygar => Fygar::move_delay_ms(tuning),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EnemyKind::Pooka => "pooka",
            EnemyKind::Fygar => "fygar",
        }
    }
}

/// Top branch of every tree: run while being pumped.
pub fn flee_when_pumped() -> BehaviorTree<Enemy, Grid> {
    guarded(|e: &Enemy, _: &Grid| e.is_being_pumped(), |e: &mut Enemy, g: &mut Grid| e.flee(g))
}

/// Last branch of every tree.
pub fn patrol_fallback() -> BehaviorTree<Enemy, Grid> {
    action(|e: &mut Enemy, g: &mut Grid| e.patrol(g))
}
