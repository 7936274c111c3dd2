//! Tool registry
//!
//! Tools are listed in a static table of `{name, constructor}` pairs and
//! instantiated once per registry. Lookup failures and malformed arguments
//! come back as error [`Response`]s, so callers always get an envelope.

use crate::config::ToolsConfig;
use crate::context::ToolContext;
use crate::error::MethodError;
use crate::host::EditorHost;
use crate::method::ToolMethod;
use crate::response::Response;
use crate::tools;
use bridge_tree::Record;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;

/// Static description of a built-in tool
#[derive(Clone, Copy)]
pub struct ToolEntry {
    /// Registry name
    pub name: &'static str,
    /// Builds the tool over a host
    pub construct: fn(&Arc<EditorHost>) -> Box<dyn ToolMethod>,
}

impl fmt::Debug for ToolEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolEntry").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Every built-in tool, in listing order
pub static BUILTIN_TOOLS: &[ToolEntry] = &[
    ToolEntry {
        name: "console_read",
        construct: console_read,
    },
    ToolEntry {
        name: "console_write",
        construct: console_write,
    },
    ToolEntry {
        name: "manage_editor",
        construct: manage_editor,
    },
    ToolEntry {
        name: "hierarchy_create",
        construct: hierarchy_create,
    },
    ToolEntry {
        name: "gameobject_edit",
        construct: gameobject_edit,
    },
];

fn console_read(host: &Arc<EditorHost>) -> Box<dyn ToolMethod> {
    Box::new(tools::console_read(host))
}

fn console_write(host: &Arc<EditorHost>) -> Box<dyn ToolMethod> {
    Box::new(tools::console_write(host))
}

fn manage_editor(host: &Arc<EditorHost>) -> Box<dyn ToolMethod> {
    Box::new(tools::manage_editor(host))
}

fn hierarchy_create(host: &Arc<EditorHost>) -> Box<dyn ToolMethod> {
    Box::new(tools::hierarchy_create(host))
}

fn gameobject_edit(host: &Arc<EditorHost>) -> Box<dyn ToolMethod> {
    Box::new(tools::gameobject_edit(host))
}

/// One entry of a batch request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchCall {
    /// Tool name
    #[serde(alias = "tool")]
    pub func: String,
    /// Arguments object; `null` means no arguments
    #[serde(default)]
    pub args: Value,
}

impl BatchCall {
    /// Call of `func` with `args`
    #[must_use]
    pub fn new(func: impl Into<String>, args: Value) -> Self {
        Self {
            func: func.into(),
            args,
        }
    }
}

/// Name-indexed set of tool methods
#[derive(Default)]
pub struct MethodRegistry {
    methods: IndexMap<String, Box<dyn ToolMethod>>,
}

impl MethodRegistry {
    /// Empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in tool not disabled by `tools`
    #[must_use]
    pub fn with_builtins(host: &Arc<EditorHost>, tools: &ToolsConfig) -> Self {
        for name in &tools.disabled {
            if !BUILTIN_TOOLS.iter().any(|e| e.name == name) {
                tracing::warn!(tool = %name, "disabled tool is not a built-in tool");
            }
        }
        let mut registry = Self::new();
        for entry in BUILTIN_TOOLS {
            if tools.disabled.iter().any(|d| d == entry.name) {
                tracing::debug!(tool = entry.name, "tool disabled by configuration");
                continue;
            }
            registry.register((entry.construct)(host));
        }
        tracing::debug!(tools = registry.len(), "registry ready");
        registry
    }

    /// Add a method, returning the one it replaced
    pub fn register(&mut self, method: Box<dyn ToolMethod>) -> Option<Box<dyn ToolMethod>> {
        self.methods.insert(method.name().to_string(), method)
    }

    /// Method by name; exact match first, then ASCII case-insensitive
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn ToolMethod> {
        self.methods
            .get(name)
            .or_else(|| {
                self.methods
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(name))
                    .map(|(_, m)| m)
            })
            .map(|m| &**m)
    }

    /// Whether a method is registered under `name`
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Registered names in registration order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.methods.keys().map(String::as_str).collect()
    }

    /// Number of registered methods
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Whether no method is registered
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Method by name
    ///
    /// # Errors
    ///
    /// [`MethodError::UnknownTool`] listing the registered names.
    pub fn lookup(&self, name: &str) -> Result<&dyn ToolMethod, MethodError> {
        self.get(name).ok_or_else(|| MethodError::UnknownTool {
            name: name.to_string(),
            available: self.names().into_iter().map(str::to_string).collect(),
        })
    }

    /// Run a tool over a prepared context
    #[must_use]
    pub fn execute(&self, name: &str, ctx: &ToolContext) -> Response {
        match self.lookup(name) {
            Ok(method) => method.execute(ctx),
            Err(err) => {
                tracing::warn!(tool = name, "unknown tool");
                err.into()
            }
        }
    }

    /// Run a tool over a command record
    #[must_use]
    pub fn execute_record(&self, name: &str, record: Record) -> Response {
        self.execute(name, &ToolContext::new(record))
    }

    /// Run a tool over raw JSON arguments; `null` is an empty record
    #[must_use]
    pub fn execute_value(&self, name: &str, args: Value) -> Response {
        let record = match args {
            Value::Null => Record::new(),
            other => match Record::try_from(other) {
                Ok(record) => record,
                Err(err) => return MethodError::from(err).into(),
            },
        };
        self.execute_record(name, record)
    }

    /// Rendered tree and parameter table of a tool
    ///
    /// # Errors
    ///
    /// [`MethodError::UnknownTool`].
    pub fn describe(&self, name: &str) -> Result<String, MethodError> {
        self.lookup(name).map(|m| m.preview())
    }

    /// Run calls in order; each call's envelope is kept in `data.results`
    ///
    /// The batch succeeds only when every call succeeds. Later calls still run
    /// after a failure.
    #[must_use]
    pub fn execute_batch(&self, calls: &[BatchCall]) -> Response {
        let mut results = Vec::with_capacity(calls.len());
        let mut failed = 0usize;
        for (index, call) in calls.iter().enumerate() {
            let response = self.execute_value(&call.func, call.args.clone());
            if response.is_error() {
                failed += 1;
                tracing::debug!(index, tool = %call.func, error = response.text(), "batch call failed");
            }
            results.push(response.to_json());
        }
        let data = json!({
            "results": results,
            "total_calls": calls.len(),
            "successful_calls": calls.len() - failed,
            "failed_calls": failed,
        });
        if failed == 0 {
            Response::success_with("Batch function calls completed", data)
        } else {
            Response::error_with(format!("Batch completed with {failed} failure(s)"), data)
        }
    }
}

impl fmt::Debug for MethodRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodRegistry").field("methods", &self.names()).finish()
    }
}
