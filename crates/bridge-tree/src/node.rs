//! Decision node model
//!
//! Nodes are immutable once built. There are two decision primitives,
//! [`Node::matching`] (branch on a field's value) and [`Node::exists`]
//! (branch on a field's presence). Leaves hold a [`Handler`]; an
//! [`Unmatched`] terminal marks a decision with no way to continue.

use crate::handler::Handler;
use crate::record::{EdgeKey, EdgeValue};
use indexmap::IndexMap;
use std::fmt;

/// One step in a decision tree
pub enum Node<C, R> {
    /// Terminal bound to a handler
    Leaf(Handler<C, R>),
    /// Branch on the value of a field
    Match(KeyDecision<C, R>),
    /// Branch on whether a field is present and non-null
    Exists(PresenceDecision<C, R>),
    /// Terminal with no handler; evaluating it yields a no-match
    Unmatched(Unmatched),
}

impl<C, R> Node<C, R> {
    /// Leaf node
    #[inline]
    #[must_use]
    pub fn leaf(handler: Handler<C, R>) -> Self {
        Self::Leaf(handler)
    }

    /// Value decision over `field`
    ///
    /// Later edges with the same normalized key replace earlier ones; use the
    /// builder to get duplicate detection.
    pub fn matching<I, V>(field: impl Into<String>, edges: I, default: Option<Node<C, R>>) -> Self
    where
        I: IntoIterator<Item = (V, Node<C, R>)>,
        V: Into<EdgeValue>,
    {
        let edges = edges
            .into_iter()
            .map(|(value, node)| {
                let value = value.into();
                (
                    value.key(),
                    Edge {
                        label: value.to_string(),
                        node,
                    },
                )
            })
            .collect();
        Self::Match(KeyDecision {
            field: field.into(),
            edges,
            default: default.map(Box::new),
        })
    }

    /// Presence decision over `field`
    #[must_use]
    pub fn exists(field: impl Into<String>, present: Node<C, R>, absent: Node<C, R>) -> Self {
        Self::Exists(PresenceDecision {
            field: field.into(),
            present: Box::new(present),
            absent: Box::new(absent),
        })
    }

    /// Dead end reporting the values the enclosing decision would accept
    #[must_use]
    pub fn unmatched(field: Option<String>, expected: Vec<String>) -> Self {
        Self::Unmatched(Unmatched { field, expected })
    }

    /// Whether this node is a leaf
    #[inline]
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    /// Longest path from this node to a terminal, counting decisions only
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Leaf(_) | Self::Unmatched(_) => 0,
            Self::Match(m) => {
                let edges = m.edges.values().map(|e| e.node.depth()).max().unwrap_or(0);
                let default = m.default.as_deref().map_or(0, Node::depth);
                1 + edges.max(default)
            }
            Self::Exists(p) => 1 + p.present.depth().max(p.absent.depth()),
        }
    }

    /// Collect every reachable handler, depth first in declaration order
    #[must_use]
    pub fn handlers(&self) -> Vec<&Handler<C, R>> {
        let mut out = Vec::new();
        self.collect_handlers(&mut out);
        out
    }

    fn collect_handlers<'a>(&'a self, out: &mut Vec<&'a Handler<C, R>>) {
        match self {
            Self::Leaf(h) => out.push(h),
            Self::Match(m) => {
                for edge in m.edges.values() {
                    edge.node.collect_handlers(out);
                }
                if let Some(d) = &m.default {
                    d.collect_handlers(out);
                }
            }
            Self::Exists(p) => {
                p.present.collect_handlers(out);
                p.absent.collect_handlers(out);
            }
            Self::Unmatched(_) => {}
        }
    }
}

impl<C, R> fmt::Debug for Node<C, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(h) => f.debug_tuple("Leaf").field(h).finish(),
            Self::Match(m) => f
                .debug_struct("Match")
                .field("field", &m.field)
                .field("edges", &m.edges)
                .field("default", &m.default)
                .finish(),
            Self::Exists(p) => f
                .debug_struct("Exists")
                .field("field", &p.field)
                .field("present", &p.present)
                .field("absent", &p.absent)
                .finish(),
            Self::Unmatched(u) => u.fmt(f),
        }
    }
}

/// Value decision: follows the edge whose key equals the field's value
pub struct KeyDecision<C, R> {
    pub(crate) field: String,
    pub(crate) edges: IndexMap<EdgeKey, Edge<C, R>>,
    pub(crate) default: Option<Box<Node<C, R>>>,
}

impl<C, R> KeyDecision<C, R> {
    /// Inspected field
    #[inline]
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Edges in declaration order
    pub fn edges(&self) -> impl Iterator<Item = &Edge<C, R>> {
        self.edges.values()
    }

    /// Edge for a normalized key
    #[inline]
    #[must_use]
    pub fn edge(&self, key: &EdgeKey) -> Option<&Edge<C, R>> {
        self.edges.get(key)
    }

    /// Fallback arm
    #[inline]
    #[must_use]
    pub fn default(&self) -> Option<&Node<C, R>> {
        self.default.as_deref()
    }

    /// Labels of the registered edges
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.edges.values().map(|e| e.label.clone()).collect()
    }
}

/// Labelled edge of a [`KeyDecision`]
pub struct Edge<C, R> {
    pub(crate) label: String,
    pub(crate) node: Node<C, R>,
}

impl<C, R> Edge<C, R> {
    /// Value as written by the tree author
    #[inline]
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Target node
    #[inline]
    #[must_use]
    pub fn node(&self) -> &Node<C, R> {
        &self.node
    }
}

impl<C, R> fmt::Debug for Edge<C, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Edge")
            .field("label", &self.label)
            .field("node", &self.node)
            .finish()
    }
}

/// Presence decision
pub struct PresenceDecision<C, R> {
    pub(crate) field: String,
    pub(crate) present: Box<Node<C, R>>,
    pub(crate) absent: Box<Node<C, R>>,
}

impl<C, R> PresenceDecision<C, R> {
    /// Inspected field
    #[inline]
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Arm taken when the field is present
    #[inline]
    #[must_use]
    pub fn present(&self) -> &Node<C, R> {
        &self.present
    }

    /// Arm taken when the field is missing or null
    #[inline]
    #[must_use]
    pub fn absent(&self) -> &Node<C, R> {
        &self.absent
    }
}

/// Terminal for decisions without a default arm
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unmatched {
    /// Key field of the decision that ran out of options
    pub field: Option<String>,
    /// Values that decision would have accepted
    pub expected: Vec<String>,
}
