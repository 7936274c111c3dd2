//! Tool method facade
//!
//! A [`StateMethod`] owns one decision tree, built on first use and cached
//! for the life of the method. `execute` runs the tree and turns dispatcher
//! failures into error [`Response`]s; `describe` renders the tree.

use crate::context::ToolContext;
use crate::error::MethodError;
use crate::keys::{self, MethodKey};
use crate::response::Response;
use bridge_tree::{BuildError, DispatchOutcome, Tree};
use once_cell::sync::OnceCell;
use std::fmt;

/// Decision tree type used by tool methods
pub type ToolTree = Tree<ToolContext, Response>;

type TreeFactory<R> = Box<dyn Fn() -> Result<Tree<ToolContext, R>, BuildError> + Send + Sync>;

/// A callable editor capability
pub trait ToolMethod: Send + Sync {
    /// Registry name
    fn name(&self) -> &str;

    /// Documented parameters
    fn keys(&self) -> &[MethodKey];

    /// Run the command
    fn execute(&self, ctx: &ToolContext) -> Response;

    /// Render the routing structure
    fn describe(&self) -> String;

    /// Routing structure plus the parameter table
    fn preview(&self) -> String {
        format!("{}\n{}", self.describe(), keys::render_table(self.keys()))
    }

    /// JSON-schema object for the parameters
    fn schema(&self) -> serde_json::Value {
        keys::schema(self.keys())
    }
}

/// Lazily built, cached tree
pub(crate) struct LazyTree<R> {
    factory: TreeFactory<R>,
    cell: OnceCell<Tree<ToolContext, R>>,
}

impl<R> LazyTree<R> {
    pub(crate) fn new<F>(factory: F) -> Self
    where
        F: Fn() -> Result<Tree<ToolContext, R>, BuildError> + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(factory),
            cell: OnceCell::new(),
        }
    }

    /// Built tree; a failed build is retried on the next call
    pub(crate) fn get(&self, tool: &str) -> Result<&Tree<ToolContext, R>, MethodError> {
        self.cell.get_or_try_init(|| {
            let tree = (self.factory)().map_err(|source| MethodError::Build {
                tool: tool.to_string(),
                source,
            });
            match &tree {
                Ok(t) => tracing::debug!(tool, depth = t.depth(), "state tree built"),
                Err(err) => tracing::error!(tool, error = %err, "state tree build failed"),
            }
            tree
        })
    }

    pub(crate) fn describe(&self, tool: &str) -> String {
        match self.get(tool) {
            Ok(tree) => tree.describe(),
            Err(err) => err.to_string(),
        }
    }
}

/// Single-tree tool method
pub struct StateMethod {
    name: String,
    keys: Vec<MethodKey>,
    tree: LazyTree<Response>,
}

impl StateMethod {
    /// Method whose tree comes from `factory`; the factory runs once
    pub fn new<F>(name: impl Into<String>, keys: Vec<MethodKey>, factory: F) -> Self
    where
        F: Fn() -> Result<ToolTree, BuildError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            keys,
            tree: LazyTree::new(factory),
        }
    }

    /// The cached tree
    ///
    /// # Errors
    ///
    /// [`MethodError::Build`] when the tree cannot be built.
    pub fn tree(&self) -> Result<&ToolTree, MethodError> {
        self.tree.get(&self.name)
    }
}

impl ToolMethod for StateMethod {
    fn name(&self) -> &str {
        &self.name
    }

    fn keys(&self) -> &[MethodKey] {
        &self.keys
    }

    fn execute(&self, ctx: &ToolContext) -> Response {
        let tree = match self.tree() {
            Ok(tree) => tree,
            Err(err) => return err.into(),
        };
        tracing::debug!(tool = %self.name, "dispatching");
        finish(&self.name, tree.run(ctx), |m| m.to_string())
    }

    fn describe(&self) -> String {
        self.tree.describe(&self.name)
    }
}

impl fmt::Debug for StateMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMethod")
            .field("name", &self.name)
            .field("keys", &self.keys.len())
            .field("built", &self.tree.cell.get().is_some())
            .finish()
    }
}

/// Turn a dispatch outcome into a response, logging failures
pub(crate) fn finish(
    tool: &str,
    outcome: DispatchOutcome<Response>,
    no_match: impl FnOnce(&bridge_tree::NoMatch) -> String,
) -> Response {
    match outcome {
        DispatchOutcome::Handled(response) => response,
        DispatchOutcome::NoMatch(m) => {
            tracing::warn!(tool, reason = %m, "no handler matched");
            Response::error(no_match(&m))
        }
        DispatchOutcome::Faulted(fault) => {
            tracing::error!(tool, handler = %fault.handler, message = %fault.message, "handler faulted");
            Response::error(format!("Internal error in '{tool}': {fault}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_tree::{Record, TreeBuilder};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn ctx(action: &str) -> ToolContext {
        ToolContext::new(Record::new().with("action", action))
    }

    fn counted_method(builds: Arc<AtomicUsize>) -> StateMethod {
        StateMethod::new("demo", vec![MethodKey::string("action", "Action").required()], move || {
            builds.fetch_add(1, Ordering::SeqCst);
            TreeBuilder::<ToolContext, Response>::create()
                .key("action")
                .leaf("play", |_: &ToolContext| Response::success("playing"))
                .build()
        })
    }

    #[test]
    fn tree_is_built_once() {
        let builds = Arc::new(AtomicUsize::new(0));
        let method = counted_method(Arc::clone(&builds));
        assert_eq!(builds.load(Ordering::SeqCst), 0);
        assert!(method.execute(&ctx("play")).success);
        assert!(method.execute(&ctx("PLAY")).success);
        let _ = method.describe();
        assert_eq!(builds.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn no_match_becomes_error_response() {
        let method = counted_method(Arc::new(AtomicUsize::new(0)));
        let r = method.execute(&ctx("unknown"));
        assert!(r.is_error());
        assert_eq!(r.text(), "Unknown action: 'unknown'. Supported values: [play]");
    }

    #[test]
    fn build_failure_is_reported() {
        let method = StateMethod::new("broken", Vec::new(), || {
            TreeBuilder::<ToolContext, Response>::create().up().build()
        });
        let r = method.execute(&ctx("play"));
        assert_eq!(
            r.text(),
            "Failed to build state tree for 'broken': up() called at the root scope"
        );
        assert!(method.describe().starts_with("Failed to build"));
    }

    #[test]
    fn handler_fault_becomes_error_response() {
        let method = StateMethod::new("faulty", Vec::new(), || {
            TreeBuilder::<ToolContext, Response>::create()
                .default_leaf(bridge_tree::Handler::named("explode", |_: &ToolContext| -> Response {
                    panic!("no editor")
                }))
                .build()
        });
        let r = method.execute(&ctx("x"));
        assert_eq!(r.text(), "Internal error in 'faulty': handler 'explode' failed: no editor");
    }

    #[test]
    fn preview_includes_keys() {
        let method = counted_method(Arc::new(AtomicUsize::new(0)));
        let preview = method.preview();
        assert!(preview.starts_with("StateTree\n└─ action:\n   └─ play → anonymous\n"));
        assert!(preview.contains("Parameters:"));
    }
}
