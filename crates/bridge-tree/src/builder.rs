//! Tree Builder
//!
//! Scoped, stack-based construction of decision trees.
//!
//! Usage:
//! ```rust,ignore
//! let tree = TreeBuilder::create()
//!     .key("action")
//!         .leaf("menu", handle_menu)
//!         .branch("primitive")
//!             .optional_key("primitive_type")
//!                 .leaf("Cube", handle_cube)
//!                 .default_leaf(handle_from_primitive)
//!             .up()
//!             .default_leaf(handle_from_primitive)
//!         .up()
//!         .leaf("prefab", handle_prefab)
//!     .build()?;
//! ```
//!
//! Each scope collects value edges (`key` + `leaf` / `branch`), presence
//! checks (`optional_*`) and a default arm. On [`TreeBuilder::build`] a scope
//! is lowered into the two primitives: a [`Node::matching`] over its key whose
//! fallback is a chain of [`Node::exists`] checks, in declaration order,
//! ending in the default arm (or an [`Node::unmatched`] terminal).

use crate::handler::{Handler, IntoHandler};
use crate::node::Node;
use crate::record::{EdgeKey, EdgeValue};
use crate::tree::Tree;
use indexmap::IndexMap;

/// Error type for tree builder operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// Two edges with the same (case-folded) value in one decision
    #[error("duplicate edge '{value}' in scope {scope}")]
    DuplicateEdge {
        /// Scope trail
        scope: String,
        /// Offending value
        value: String,
    },

    /// Default arm set twice
    #[error("default arm already set in scope {scope}")]
    DuplicateDefault {
        /// Scope trail
        scope: String,
    },

    /// Presence check registered twice for the same field
    #[error("optional field '{field}' registered twice in scope {scope}")]
    DuplicateOptional {
        /// Scope trail
        scope: String,
        /// Offending field
        field: String,
    },

    /// Value edge added before `key` named the field to inspect
    #[error("edge '{value}' added in scope {scope} before a key was set")]
    EdgeWithoutKey {
        /// Scope trail
        scope: String,
        /// Offending value
        value: String,
    },

    /// `key` called twice with different fields on one scope
    #[error("scope {scope} already decides on '{old}', cannot switch to '{new}'")]
    KeyRedefined {
        /// Scope trail
        scope: String,
        /// Existing key field
        old: String,
        /// Rejected key field
        new: String,
    },

    /// `up` called on the root scope
    #[error("up() called at the root scope")]
    UnbalancedUp,

    /// A scope with nothing in it can never reach a handler
    #[error("scope {scope} has no edges, optional fields or default")]
    EmptyScope {
        /// Scope trail
        scope: String,
    },
}

enum Target<C, R> {
    Leaf(Handler<C, R>),
    Scope(usize),
}

struct EdgeSpec<C, R> {
    label: String,
    target: Target<C, R>,
}

struct Scope<C, R> {
    trail: String,
    field: Option<String>,
    edges: IndexMap<EdgeKey, EdgeSpec<C, R>>,
    optionals: Vec<(String, Target<C, R>)>,
    default: Option<Target<C, R>>,
}

impl<C, R> Scope<C, R> {
    fn new(trail: String) -> Self {
        Self {
            trail,
            field: None,
            edges: IndexMap::new(),
            optionals: Vec::new(),
            default: None,
        }
    }

    fn is_empty(&self) -> bool {
        self.edges.is_empty() && self.optionals.is_empty() && self.default.is_none()
    }

    fn expected(&self) -> Vec<String> {
        self.edges
            .values()
            .map(|e| e.label.clone())
            .chain(self.optionals.iter().map(|(f, _)| format!("{f} (optional)")))
            .collect()
    }
}

/// Builder for decision trees
///
/// Operations chain by value. The first error is remembered and reported by
/// [`build`](Self::build); later operations still run but cannot clear it.
pub struct TreeBuilder<C, R> {
    scopes: Vec<Scope<C, R>>,
    stack: Vec<usize>,
    error: Option<BuildError>,
}

impl<C, R> TreeBuilder<C, R> {
    /// Create a new builder whose insertion point is the root scope
    #[must_use]
    pub fn create() -> Self {
        Self {
            scopes: vec![Scope::new("<root>".to_string())],
            stack: vec![0],
            error: None,
        }
    }

    /// Nesting depth of the current insertion point (root = 0)
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    /// Name the field the current scope branches on
    #[must_use]
    pub fn key(mut self, field: impl Into<String>) -> Self {
        let field = field.into();
        let scope = self.current_mut();
        match scope.field.clone() {
            Some(old) if old != field => {
                let err = BuildError::KeyRedefined {
                    scope: scope.trail.clone(),
                    old,
                    new: field,
                };
                self.fail(err);
            }
            _ => scope.field = Some(field),
        }
        self
    }

    /// Add a value edge terminating in `handler`
    #[must_use]
    pub fn leaf<V, M>(mut self, value: V, handler: impl IntoHandler<C, R, M>) -> Self
    where
        V: Into<EdgeValue>,
    {
        let value = value.into();
        self.add_edge(&value, Target::Leaf(handler.into_handler()));
        self
    }

    /// Add a value edge to a new nested scope and enter it
    ///
    /// Branching on a value that already leads to a nested scope re-enters
    /// that scope.
    #[must_use]
    pub fn branch(mut self, value: impl Into<EdgeValue>) -> Self {
        let value = value.into();
        let key = value.key();
        let current = self.current();
        if let Some(EdgeSpec {
            target: Target::Scope(idx),
            ..
        }) = self.scopes[current].edges.get(&key)
        {
            let idx = *idx;
            self.stack.push(idx);
            return self;
        }
        let field = self.scopes[current].field.clone().unwrap_or_default();
        let child = self.new_scope(format!("{field}={value}"));
        if self.add_edge(&value, Target::Scope(child)) {
            self.stack.push(child);
        }
        self
    }

    /// Shorthand for `branch(value).key(field)`
    #[must_use]
    pub fn node(self, value: impl Into<EdgeValue>, field: impl Into<String>) -> Self {
        self.branch(value).key(field)
    }

    /// Set the default arm of the current scope to `handler`
    #[must_use]
    pub fn default_leaf<M>(mut self, handler: impl IntoHandler<C, R, M>) -> Self {
        self.set_default(Target::Leaf(handler.into_handler()));
        self
    }

    /// Set the default arm of the current scope to a new nested scope and
    /// enter it
    #[must_use]
    pub fn default_branch(mut self) -> Self {
        let child = self.new_scope("*".to_string());
        if self.set_default(Target::Scope(child)) {
            self.stack.push(child);
        }
        self
    }

    /// Route to `handler` when `field` is present
    #[must_use]
    pub fn optional_leaf<M>(mut self, field: impl Into<String>, handler: impl IntoHandler<C, R, M>) -> Self {
        self.add_optional(field.into(), Target::Leaf(handler.into_handler()));
        self
    }

    /// Enter a nested scope taken when `field` is present
    #[must_use]
    pub fn optional_branch(mut self, field: impl Into<String>) -> Self {
        let field = field.into();
        let child = self.new_scope(format!("{field}?"));
        if self.add_optional(field, Target::Scope(child)) {
            self.stack.push(child);
        }
        self
    }

    /// Enter a nested scope taken when `field` is present, deciding on the
    /// value of that same field
    ///
    /// Edges added next form the present arm; after [`up`](Self::up), a
    /// default set on the enclosing scope acts as the absent arm.
    #[must_use]
    pub fn optional_key(self, field: impl Into<String>) -> Self {
        let field = field.into();
        self.optional_branch(field.clone()).key(field)
    }

    /// Enter a nested scope taken when `field` is present, deciding on `key`
    #[must_use]
    pub fn optional_node(self, field: impl Into<String>, key: impl Into<String>) -> Self {
        self.optional_branch(field).key(key)
    }

    /// Shorthand for `up().leaf(value, handler)`
    #[must_use]
    pub fn up_leaf<V, M>(self, value: V, handler: impl IntoHandler<C, R, M>) -> Self
    where
        V: Into<EdgeValue>,
    {
        self.up().leaf(value, handler)
    }

    /// Shorthand for `up().node(value, field)`
    #[must_use]
    pub fn up_node(self, value: impl Into<EdgeValue>, field: impl Into<String>) -> Self {
        self.up().node(value, field)
    }

    /// Return to the parent scope
    #[must_use]
    pub fn up(mut self) -> Self {
        if self.stack.len() > 1 {
            self.stack.pop();
        } else {
            self.fail(BuildError::UnbalancedUp);
        }
        self
    }

    /// Finalize into an immutable [`Tree`]
    ///
    /// Scopes left open are closed implicitly.
    ///
    /// # Errors
    ///
    /// Returns the first [`BuildError`] recorded while chaining, or
    /// [`BuildError::EmptyScope`] for a scope that was never filled.
    pub fn build(self) -> Result<Tree<C, R>, BuildError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let mut slots: Vec<Option<Scope<C, R>>> = self.scopes.into_iter().map(Some).collect();
        let root = lower(&mut slots, 0)?;
        Ok(Tree::new(root))
    }

    fn current(&self) -> usize {
        self.stack.last().copied().unwrap_or(0)
    }

    fn current_mut(&mut self) -> &mut Scope<C, R> {
        let idx = self.current();
        &mut self.scopes[idx]
    }

    fn fail(&mut self, err: BuildError) {
        if self.error.is_none() {
            tracing::debug!(error = %err, "tree builder error");
            self.error = Some(err);
        }
    }

    fn new_scope(&mut self, label: String) -> usize {
        let parent = &self.scopes[self.current()].trail;
        let trail = if self.stack.len() == 1 {
            label
        } else {
            format!("{parent}/{label}")
        };
        self.scopes.push(Scope::new(trail));
        self.scopes.len() - 1
    }

    fn add_edge(&mut self, value: &EdgeValue, target: Target<C, R>) -> bool {
        let scope = self.current_mut();
        if scope.field.is_none() {
            let err = BuildError::EdgeWithoutKey {
                scope: scope.trail.clone(),
                value: value.to_string(),
            };
            self.fail(err);
            return false;
        }
        let key = value.key();
        if scope.edges.contains_key(&key) {
            let err = BuildError::DuplicateEdge {
                scope: scope.trail.clone(),
                value: value.to_string(),
            };
            self.fail(err);
            return false;
        }
        scope.edges.insert(
            key,
            EdgeSpec {
                label: value.to_string(),
                target,
            },
        );
        true
    }

    fn add_optional(&mut self, field: String, target: Target<C, R>) -> bool {
        let scope = self.current_mut();
        if scope.optionals.iter().any(|(f, _)| f.eq_ignore_ascii_case(&field)) {
            let err = BuildError::DuplicateOptional {
                scope: scope.trail.clone(),
                field,
            };
            self.fail(err);
            return false;
        }
        scope.optionals.push((field, target));
        true
    }

    fn set_default(&mut self, target: Target<C, R>) -> bool {
        let scope = self.current_mut();
        if scope.default.is_some() {
            let err = BuildError::DuplicateDefault {
                scope: scope.trail.clone(),
            };
            self.fail(err);
            return false;
        }
        scope.default = Some(target);
        true
    }
}

impl<C, R> Default for TreeBuilder<C, R> {
    fn default() -> Self {
        Self::create()
    }
}

fn lower<C, R>(slots: &mut [Option<Scope<C, R>>], idx: usize) -> Result<Node<C, R>, BuildError> {
    // Every scope index is referenced by exactly one target.
    let Some(scope) = slots.get_mut(idx).and_then(Option::take) else {
        return Err(BuildError::EmptyScope {
            scope: format!("#{idx}"),
        });
    };
    if scope.is_empty() {
        return Err(BuildError::EmptyScope { scope: scope.trail });
    }
    let expected = scope.expected();

    let mut fallback = match scope.default {
        Some(target) => Some(lower_target(slots, target)?),
        None if scope.optionals.is_empty() => None,
        // Without value edges the key field was never tested, so the failure
        // belongs to the missing optional.
        None if scope.edges.is_empty() => Some(Node::unmatched(None, expected)),
        None => Some(Node::unmatched(scope.field.clone(), expected)),
    };
    for (field, target) in scope.optionals.into_iter().rev() {
        let present = lower_target(slots, target)?;
        let absent = match fallback.take() {
            Some(node) => node,
            None => Node::unmatched(None, Vec::new()),
        };
        fallback = Some(Node::exists(field, present, absent));
    }

    match scope.field {
        Some(field) if !scope.edges.is_empty() || fallback.is_none() => {
            let mut edges = Vec::with_capacity(scope.edges.len());
            for (_, edge) in scope.edges {
                edges.push((edge.label, lower_target(slots, edge.target)?));
            }
            Ok(Node::matching(field, edges, fallback))
        }
        // A key with no value edges only ever takes its fallback.
        _ => Ok(fallback.unwrap_or_else(|| Node::unmatched(None, Vec::new()))),
    }
}

fn lower_target<C, R>(slots: &mut [Option<Scope<C, R>>], target: Target<C, R>) -> Result<Node<C, R>, BuildError> {
    match target {
        Target::Leaf(handler) => Ok(Node::leaf(handler)),
        Target::Scope(idx) => lower(slots, idx),
    }
}
