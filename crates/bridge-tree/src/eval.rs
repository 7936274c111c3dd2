//! Evaluator
//!
//! Walks a tree against one context and reaches at most one leaf. All
//! per-call state (the decision path) lives on the caller's stack, so a
//! shared tree can be evaluated from any number of threads at once.

use crate::handler::HandlerFault;
use crate::node::Node;
use crate::record::{EdgeKey, Fields};
use serde_json::Value;
use std::fmt;

/// What a decision step observed
#[derive(Debug, Clone, PartialEq)]
pub enum Probe {
    /// Value read by a key decision (`None` when missing or null)
    Value(Option<Value>),
    /// Result of a presence check
    Presence(bool),
}

/// One decision taken during evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// Inspected field
    pub field: String,
    /// Observation
    pub probe: Probe,
}

impl Step {
    fn value(field: &str, value: Option<&Value>) -> Self {
        Self {
            field: field.to_string(),
            probe: Probe::Value(value.filter(|v| !v.is_null()).cloned()),
        }
    }

    fn presence(field: &str, present: bool) -> Self {
        Self {
            field: field.to_string(),
            probe: Probe::Presence(present),
        }
    }
}

/// No edge and no default accepted the context
#[derive(Debug, Clone, PartialEq)]
pub struct NoMatch {
    /// Decisions taken, in order; the last one is the one that failed
    pub path: Vec<Step>,
    /// Values the failing decision would have accepted
    pub expected: Vec<String>,
}

impl NoMatch {
    /// Failing decision
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&Step> {
        self.path.last()
    }

    /// Field of the failing decision
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        self.last().map(|s| s.field.as_str())
    }

    /// Value the failing decision saw, if it was a key decision
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        match self.last().map(|s| &s.probe) {
            Some(Probe::Value(v)) => v.as_ref(),
            _ => None,
        }
    }
}

impl fmt::Display for NoMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.last() {
            Some(Step {
                field,
                probe: Probe::Value(Some(value)),
            }) => match value {
                Value::String(s) => write!(f, "Unknown {field}: '{s}'")?,
                other => write!(f, "Unknown {field}: '{other}'")?,
            },
            Some(Step {
                field,
                probe: Probe::Value(None) | Probe::Presence(false),
            }) => write!(f, "Missing {field}")?,
            Some(Step {
                field,
                probe: Probe::Presence(true),
            }) => write!(f, "No handler for {field}")?,
            None => f.write_str("No handler matched")?,
        }
        if !self.expected.is_empty() {
            write!(f, ". Supported values: [{}]", self.expected.join(", "))?;
        }
        Ok(())
    }
}

impl std::error::Error for NoMatch {}

/// Result of evaluating a tree
#[derive(Debug)]
#[must_use]
pub enum DispatchOutcome<R> {
    /// A leaf handler ran and returned this value
    Handled(R),
    /// No leaf was reachable; no handler ran
    NoMatch(NoMatch),
    /// The leaf handler panicked
    Faulted(HandlerFault),
}

impl<R> DispatchOutcome<R> {
    /// Whether a handler ran to completion
    #[inline]
    #[must_use]
    pub fn is_handled(&self) -> bool {
        matches!(self, Self::Handled(_))
    }

    /// Convert to a `Result`
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] when nothing matched or the handler faulted.
    pub fn into_result(self) -> Result<R, DispatchError> {
        match self {
            Self::Handled(r) => Ok(r),
            Self::NoMatch(m) => Err(DispatchError::NoMatch(m)),
            Self::Faulted(f) => Err(DispatchError::Faulted(f)),
        }
    }
}

/// Dispatch failure
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DispatchError {
    /// Nothing matched
    #[error(transparent)]
    NoMatch(NoMatch),
    /// Handler panicked
    #[error(transparent)]
    Faulted(HandlerFault),
}

pub(crate) fn evaluate<C: Fields, R>(root: &Node<C, R>, ctx: &C) -> DispatchOutcome<R> {
    let mut path = Vec::new();
    let mut node = root;
    loop {
        match node {
            Node::Leaf(handler) => {
                tracing::trace!(handler = handler.name(), steps = path.len(), "leaf reached");
                return match handler.invoke(ctx) {
                    Ok(r) => DispatchOutcome::Handled(r),
                    Err(fault) => DispatchOutcome::Faulted(fault),
                };
            }
            Node::Match(decision) => {
                let value = ctx.field(decision.field());
                tracing::trace!(field = decision.field(), value = ?value, "key decision");
                path.push(Step::value(decision.field(), value));
                let edge = value
                    .and_then(EdgeKey::from_value)
                    .and_then(|key| decision.edge(&key));
                node = match (edge, decision.default()) {
                    (Some(edge), _) => edge.node(),
                    (None, Some(default)) => default,
                    (None, None) => {
                        return DispatchOutcome::NoMatch(NoMatch {
                            path,
                            expected: decision.labels(),
                        })
                    }
                };
            }
            Node::Exists(decision) => {
                let present = ctx.is_present(decision.field());
                tracing::trace!(field = decision.field(), present, "presence decision");
                path.push(Step::presence(decision.field(), present));
                node = if present {
                    decision.present()
                } else {
                    decision.absent()
                };
            }
            Node::Unmatched(unmatched) => {
                if let Some(field) = &unmatched.field {
                    path.push(Step::value(field, ctx.field(field)));
                }
                return DispatchOutcome::NoMatch(NoMatch {
                    path,
                    expected: unmatched.expected.clone(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::Handler;
    use serde_json::json;

    fn h(name: &'static str) -> Node<Value, &'static str> {
        Node::leaf(Handler::named(name, move |_: &Value| name))
    }

    #[test]
    fn key_decision_follows_edge_then_default() {
        let root = Node::matching("action", [("play", h("play"))], Some(h("other")));
        assert!(matches!(evaluate(&root, &json!({"action": "Play"})), DispatchOutcome::Handled("play")));
        assert!(matches!(evaluate(&root, &json!({"action": "zip"})), DispatchOutcome::Handled("other")));
        assert!(matches!(evaluate(&root, &json!({})), DispatchOutcome::Handled("other")));
    }

    #[test]
    fn null_and_structured_values_take_default() {
        let root = Node::matching("action", [("play", h("play"))], Some(h("other")));
        assert!(matches!(evaluate(&root, &json!({"action": null})), DispatchOutcome::Handled("other")));
        assert!(matches!(evaluate(&root, &json!({"action": ["play"]})), DispatchOutcome::Handled("other")));
    }

    #[test]
    fn typed_edges() {
        let root = Node::matching("count", [(5, h("five")), (0, h("zero"))], None);
        assert!(matches!(evaluate(&root, &json!({"count": 5})), DispatchOutcome::Handled("five")));
        assert!(matches!(evaluate(&root, &json!({"count": 5.0})), DispatchOutcome::Handled("five")));
        assert!(matches!(evaluate(&root, &json!({"count": "5"})), DispatchOutcome::NoMatch(_)));
    }

    #[test]
    fn no_match_records_path_and_expected() {
        let root = Node::matching("action", [("play", h("a")), ("stop", h("b"))], None);
        let DispatchOutcome::NoMatch(m) = evaluate(&root, &json!({"action": "unknown"})) else {
            panic!("expected no match");
        };
        assert_eq!(m.field(), Some("action"));
        assert_eq!(m.value(), Some(&json!("unknown")));
        assert_eq!(
            m.to_string(),
            "Unknown action: 'unknown'. Supported values: [play, stop]"
        );
    }

    #[test]
    fn missing_field_message() {
        let root = Node::matching("action", [("play", h("a"))], None);
        let DispatchOutcome::NoMatch(m) = evaluate(&root, &json!({})) else {
            panic!("expected no match");
        };
        assert_eq!(m.to_string(), "Missing action. Supported values: [play]");
    }

    #[test]
    fn unmatched_terminal_rereads_its_field() {
        let fallback = Node::exists(
            "count",
            h("counted"),
            Node::unmatched(Some("action".into()), vec!["get".into(), "count (optional)".into()]),
        );
        let root = Node::matching("action", [("get", h("get"))], Some(fallback));
        let DispatchOutcome::NoMatch(m) = evaluate(&root, &json!({"action": "put"})) else {
            panic!("expected no match");
        };
        assert_eq!(m.path.len(), 3);
        assert_eq!(m.path[1], Step::presence("count", false));
        assert_eq!(
            m.to_string(),
            "Unknown action: 'put'. Supported values: [get, count (optional)]"
        );
    }

    #[test]
    fn faults_are_reported() {
        let root: Node<Value, u8> = Node::leaf(Handler::named("boom", |_: &Value| panic!("kaput")));
        let DispatchOutcome::Faulted(fault) = evaluate(&root, &json!({})) else {
            panic!("expected fault");
        };
        assert_eq!(fault.handler, "boom");
        let err = DispatchOutcome::<u8>::Faulted(fault).into_result().unwrap_err();
        assert_eq!(err.to_string(), "handler 'boom' failed: kaput");
    }
}
