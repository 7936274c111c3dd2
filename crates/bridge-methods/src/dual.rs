//! Two-phase tool method
//!
//! The target tree locates what the command operates on; its result is
//! attached to the context under [`RESOLVED_TARGETS`] and the action tree
//! then decides what to do with it. Both trees are built lazily and cached.

use crate::context::{ToolContext, RESOLVED_TARGETS};
use crate::keys::MethodKey;
use crate::method::{finish, LazyTree, ToolMethod, ToolTree};
use crate::response::Response;
use bridge_tree::{BuildError, DispatchOutcome, Tree};
use std::any::Any;
use std::fmt;

/// Tree whose leaves locate a target or explain why they could not
pub type TargetTree<T> = Tree<ToolContext, Result<T, Response>>;

/// Tool method with a target-location tree and an action tree
pub struct DualStateMethod<T> {
    name: String,
    keys: Vec<MethodKey>,
    target: LazyTree<Result<T, Response>>,
    action: LazyTree<Response>,
}

impl<T: Any + Send + Sync> DualStateMethod<T> {
    /// Method over the given tree factories
    pub fn new<FT, FA>(name: impl Into<String>, keys: Vec<MethodKey>, target: FT, action: FA) -> Self
    where
        FT: Fn() -> Result<TargetTree<T>, BuildError> + Send + Sync + 'static,
        FA: Fn() -> Result<ToolTree, BuildError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            keys,
            target: LazyTree::new(target),
            action: LazyTree::new(action),
        }
    }

    /// Run only the target phase
    ///
    /// # Errors
    ///
    /// The error response the caller would see.
    pub fn locate(&self, ctx: &ToolContext) -> Result<T, Response> {
        let tree = self.target.get(&self.name)?;
        match tree.run(ctx) {
            DispatchOutcome::Handled(located) => located,
            DispatchOutcome::NoMatch(m) => {
                tracing::warn!(tool = %self.name, reason = %m, "target location failed");
                Err(Response::error(format!("Target location failed: {m}")))
            }
            DispatchOutcome::Faulted(fault) => {
                tracing::error!(tool = %self.name, handler = %fault.handler, "target handler faulted");
                Err(Response::error(format!("Target location failed: {fault}")))
            }
        }
    }
}

impl<T: Any + Send + Sync> ToolMethod for DualStateMethod<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn keys(&self) -> &[MethodKey] {
        &self.keys
    }

    fn execute(&self, ctx: &ToolContext) -> Response {
        let action = match self.action.get(&self.name) {
            Ok(tree) => tree,
            Err(err) => return err.into(),
        };
        let located = match self.locate(ctx) {
            Ok(located) => located,
            Err(response) => return response,
        };
        let mut enriched = ctx.clone();
        enriched.insert_object(RESOLVED_TARGETS, located);
        tracing::debug!(tool = %self.name, "target located, dispatching action");
        finish(&self.name, action.run(&enriched), |m| format!("Action execution failed: {m}"))
    }

    fn describe(&self) -> String {
        format!(
            "=== Dual State Method Preview ===\n\n>>> Target Location Tree <<<\n{}\n>>> Action Execution Tree <<<\n{}",
            self.target.describe(&self.name),
            self.action.describe(&self.name),
        )
    }
}

impl<T> fmt::Debug for DualStateMethod<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DualStateMethod")
            .field("name", &self.name)
            .field("keys", &self.keys.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_tree::{Record, TreeBuilder};
    use serde_json::json;

    fn method() -> DualStateMethod<String> {
        DualStateMethod::new(
            "demo_edit",
            Vec::new(),
            || {
                TreeBuilder::<ToolContext, Result<String, Response>>::create()
                    .optional_leaf("name", |ctx: &ToolContext| {
                        ctx.text("name")
                            .map(str::to_string)
                            .ok_or_else(|| Response::error("name must be a non-empty string"))
                    })
                    .build()
            },
            || {
                TreeBuilder::<ToolContext, Response>::create()
                    .key("action")
                    .leaf("shout", |ctx: &ToolContext| {
                        let target = ctx.object::<String>(RESOLVED_TARGETS).cloned().unwrap_or_default();
                        Response::success(target.to_uppercase())
                    })
                    .build()
            },
        )
    }

    fn ctx(value: serde_json::Value) -> ToolContext {
        ToolContext::new(Record::try_from(value).unwrap())
    }

    #[test]
    fn target_then_action() {
        let r = method().execute(&ctx(json!({"name": "player", "action": "shout"})));
        assert_eq!(r, Response::success("PLAYER"));
    }

    #[test]
    fn target_no_match_is_prefixed() {
        let r = method().execute(&ctx(json!({"action": "shout"})));
        assert_eq!(
            r.text(),
            "Target location failed: Missing name. Supported values: [name (optional)]"
        );
    }

    #[test]
    fn target_handler_error_passes_through() {
        let r = method().execute(&ctx(json!({"name": "", "action": "shout"})));
        assert_eq!(r.text(), "name must be a non-empty string");
    }

    #[test]
    fn action_no_match_is_prefixed() {
        let r = method().execute(&ctx(json!({"name": "p", "action": "whisper"})));
        assert_eq!(
            r.text(),
            "Action execution failed: Unknown action: 'whisper'. Supported values: [shout]"
        );
    }

    #[test]
    fn describe_shows_both_trees() {
        let text = method().describe();
        assert!(text.starts_with("=== Dual State Method Preview ===\n\n>>> Target Location Tree <<<\nStateTree\n"));
        assert!(text.contains(">>> Action Execution Tree <<<\nStateTree\n└─ action:\n   └─ shout → anonymous\n"));
    }
}
