//! Leaf nodes wrapping plain functions.

use super::{Behavior, Status};

/// A pure predicate over the actor and world. Cannot mutate either.
pub struct Condition<F> {
    predicate: F,
}

impl<F> Condition<F> {
    pub fn new(predicate: F) -> Self {
        Self { predicate }
    }
}

impl<A, W, F> Behavior<A, W> for Condition<F>
where
    F: Fn(&A, &W) -> bool + Send + Sync,
{
    fn tick(&self, actor: &mut A, world: &mut W) -> Status {
        (self.predicate)(actor, world).into()
    }
}

/// A side-effecting step. Returns whether it meaningfully acted.
pub struct Action<F> {
    act: F,
}

impl<F> Action<F> {
    pub fn new(act: F) -> Self {
        Self { act }
    }
}

impl<A, W, F> Behavior<A, W> for Action<F>
where
    F: Fn(&mut A, &mut W) -> bool + Send + Sync,
{
    fn tick(&self, actor: &mut A, world: &mut W) -> Status {
        (self.act)(actor, world).into()
    }
}
