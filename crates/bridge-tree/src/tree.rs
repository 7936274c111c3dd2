//! Finished decision tree

use crate::eval::{self, DispatchOutcome};
use crate::handler::Handler;
use crate::node::Node;
use crate::print;
use crate::record::Fields;
use std::fmt;

/// Immutable decision tree produced by [`TreeBuilder`](crate::TreeBuilder)
///
/// `Tree` is `Send + Sync` whenever `C` and `R` are, so a single instance can
/// be shared behind an `Arc` or a static cell and run concurrently.
pub struct Tree<C, R> {
    root: Node<C, R>,
}

impl<C, R> Tree<C, R> {
    /// Wrap a hand-assembled root node
    #[must_use]
    pub fn new(root: Node<C, R>) -> Self {
        Self { root }
    }

    /// Root node
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Node<C, R> {
        &self.root
    }

    /// Number of decisions on the longest path
    #[must_use]
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Every handler reachable from the root
    #[must_use]
    pub fn handlers(&self) -> Vec<&Handler<C, R>> {
        self.root.handlers()
    }

    /// Render the decision structure as text
    #[must_use]
    pub fn describe(&self) -> String {
        print::render(&self.root)
    }

    /// Evaluate the tree against `ctx`, invoking at most one handler
    pub fn run(&self, ctx: &C) -> DispatchOutcome<R>
    where
        C: Fields,
    {
        eval::evaluate(&self.root, ctx)
    }
}

impl<C, R> fmt::Display for Tree<C, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

impl<C, R> fmt::Debug for Tree<C, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree").field("root", &self.root).finish()
    }
}
