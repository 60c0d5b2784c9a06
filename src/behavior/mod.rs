//! Minimal behavior tree engine.
//!
//! Nodes are stateless and shared: every tick receives the actor and the
//! world it acts in as explicit mutable references, so one tree serves every
//! actor of a kind. There is no `Running` status; each tick picks a branch,
//! runs it to completion and returns.
//!
//! - [`Behavior`]: core trait for all nodes
//! - Composites: [`Selector`] (first success wins), [`Sequence`] (all must succeed)
//! - Leaves: [`Condition`] (pure predicate), [`Action`] (may mutate)

pub mod composite;
pub mod leaf;
pub mod status;

pub use composite::{Selector, Sequence};
pub use leaf::{Action, Condition};
pub use status::Status;

/// A behavior tree node evaluated against an actor `A` living in world `W`.
pub trait Behavior<A, W>: Send + Sync {
    fn tick(&self, actor: &mut A, world: &mut W) -> Status;
}

impl<A, W> Behavior<A, W> for Box<dyn Behavior<A, W>> {
    #[inline]
    fn tick(&self, actor: &mut A, world: &mut W) -> Status {
        (**self).tick(actor, world)
    }
}

/// An owned, type-erased tree root.
pub type BehaviorTree<A, W> = Box<dyn Behavior<A, W>>;

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Shorthand for `Box::new(Selector::new(children))`.
pub fn selector<A: 'static, W: 'static>(children: Vec<BehaviorTree<A, W>>) -> BehaviorTree<A, W> {
    Box::new(Selector::new(children))
}

/// Shorthand for `Box::new(Sequence::new(children))`.
pub fn sequence<A: 'static, W: 'static>(children: Vec<BehaviorTree<A, W>>) -> BehaviorTree<A, W> {
    Box::new(Sequence::new(children))
}

pub fn condition<A: 'static, W: 'static, F>(predicate: F) -> BehaviorTree<A, W>
where
    F: Fn(&A, &W) -> bool + Send + Sync + 'static,
{
    Box::new(Condition::new(predicate))
}

pub fn action<A: 'static, W: 'static, F>(act: F) -> BehaviorTree<A, W>
where
    F: Fn(&mut A, &mut W) -> bool + Send + Sync + 'static,
{
    Box::new(Action::new(act))
}

/// `condition` guarding `act`: the common "if X then do Y" branch.
pub fn guarded<A: 'static, W: 'static, C, F>(predicate: C, act: F) -> BehaviorTree<A, W>
where
    C: Fn(&A, &W) -> bool + Send + Sync + 'static,
    F: Fn(&mut A, &mut W) -> bool + Send + Sync + 'static,
{
    sequence(vec![condition(predicate), action(act)])
}
