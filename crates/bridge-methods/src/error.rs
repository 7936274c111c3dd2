//! Error types for bridge methods
//!
//! Every variant converts into an error [`Response`]; none of them escape a
//! tool's `execute`.

use crate::response::Response;
use bridge_tree::{BuildError, RecordError};

/// Main method-layer error type
#[derive(Debug, thiserror::Error)]
pub enum MethodError {
    /// No tool registered under this name
    #[error("Tool not found: '{name}'. Available tools: [{}]", .available.join(", "))]
    UnknownTool {
        /// Requested name
        name: String,
        /// Registered names
        available: Vec<String>,
    },

    /// A tool's decision tree failed to build
    #[error("Failed to build state tree for '{tool}': {source}")]
    Build {
        /// Tool name
        tool: String,
        /// Builder error
        #[source]
        source: BuildError,
    },

    /// Arguments could not be turned into a command record
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}

impl From<RecordError> for MethodError {
    fn from(err: RecordError) -> Self {
        Self::InvalidArguments(err.to_string())
    }
}

impl From<MethodError> for Response {
    fn from(err: MethodError) -> Self {
        Response::error(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_tool_lists_names() {
        let err = MethodError::UnknownTool {
            name: "frob".into(),
            available: vec!["console_read".into(), "manage_editor".into()],
        };
        assert_eq!(
            err.to_string(),
            "Tool not found: 'frob'. Available tools: [console_read, manage_editor]"
        );
    }

    #[test]
    fn converts_to_error_response() {
        let r: Response = MethodError::from(RecordError::NotAnObject("array")).into();
        assert_eq!(r.error.as_deref(), Some("Invalid arguments: command record must be a JSON object, got array"));
    }

    #[test]
    fn every_variant_is_raised_by_the_method_layer() {
        // Exhaustive: a new variant must come with a producer in the crate.
        fn producer(err: &MethodError) -> &'static str {
            match err {
                MethodError::UnknownTool { .. } => "MethodRegistry::lookup",
                MethodError::Build { .. } => "LazyTree::get",
                MethodError::InvalidArguments(_) => "MethodRegistry::execute_value",
            }
        }
        let build = MethodError::Build {
            tool: "demo".into(),
            source: BuildError::UnbalancedUp,
        };
        assert_eq!(producer(&build), "LazyTree::get");
        let r: Response = build.into();
        assert_eq!(r.text(), "Failed to build state tree for 'demo': up() called at the root scope");
    }
}
