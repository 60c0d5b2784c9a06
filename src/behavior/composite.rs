//! Composite behavior nodes.
//!
//! [`Selector`] models a priority list (short-circuit OR) and [`Sequence`]
//! a guarded step (short-circuit AND). Children are evaluated in the order
//! given at construction and that order never changes.

use super::{Behavior, BehaviorTree, Status};

/// Tries children in order until one succeeds.
///
/// - A child returning `Success` stops the selector, which returns `Success`
/// - A child returning `Failure` moves on to the next child
/// - If every child fails, the selector returns `Failure`
pub struct Selector<A, W> {
    children: Vec<BehaviorTree<A, W>>,
}

impl<A, W> Selector<A, W> {
    /// # Panics
    ///
    /// Panics if `children` is empty; an empty selector is a construction bug.
    pub fn new(children: Vec<BehaviorTree<A, W>>) -> Self {
        assert!(!children.is_empty(), "Selector must have at least one child");
        Self { children }
    }
}

impl<A, W> Behavior<A, W> for Selector<A, W> {
    fn tick(&self, actor: &mut A, world: &mut W) -> Status {
        for child in &self.children {
            if child.tick(actor, world).is_success() {
                return Status::Success;
            }
        }
        Status::Failure
    }
}

/// Runs children in order until one fails.
///
/// - A child returning `Failure` stops the sequence, which returns `Failure`
/// - If every child succeeds, the sequence returns `Success`
pub struct Sequence<A, W> {
    children: Vec<BehaviorTree<A, W>>,
}

impl<A, W> Sequence<A, W> {
    /// # Panics
    ///
    /// Panics if `children` is empty.
    pub fn new(children: Vec<BehaviorTree<A, W>>) -> Self {
        assert!(!children.is_empty(), "Sequence must have at least one child");
        Self { children }
    }
}

impl<A, W> Behavior<A, W> for Sequence<A, W> {
    fn tick(&self, actor: &mut A, world: &mut W) -> Status {
        for child in &self.children {
            if child.tick(actor, world).is_failure() {
                return Status::Failure;
            }
        }
        Status::Success
    }
}
