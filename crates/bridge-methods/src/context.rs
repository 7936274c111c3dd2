//! Evaluation context handed to tool handlers
//!
//! Wraps the command [`Record`] and a side table of object references that
//! cannot travel as JSON (for example targets located by a first dispatch
//! phase). Decision nodes only ever see the record fields.

use bridge_tree::{Fields, Record};
use indexmap::IndexMap;
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

type ObjectRef = Arc<dyn Any + Send + Sync>;

/// Context key under which the dual-tree facade stores located targets
pub const RESOLVED_TARGETS: &str = "_resolved_targets";

/// Record plus named object references
#[derive(Clone, Default)]
pub struct ToolContext {
    record: Record,
    objects: IndexMap<String, ObjectRef>,
}

impl ToolContext {
    /// Context over `record` with no object references
    #[must_use]
    pub fn new(record: Record) -> Self {
        Self {
            record,
            objects: IndexMap::new(),
        }
    }

    /// Command record
    #[inline]
    #[must_use]
    pub fn record(&self) -> &Record {
        &self.record
    }

    /// Attach an object reference, replacing any previous value under `name`
    pub fn insert_object<T: Any + Send + Sync>(&mut self, name: impl Into<String>, value: T) {
        self.objects.insert(name.into(), Arc::new(value));
    }

    /// Builder-style [`insert_object`](Self::insert_object)
    #[must_use]
    pub fn with_object<T: Any + Send + Sync>(mut self, name: impl Into<String>, value: T) -> Self {
        self.insert_object(name, value);
        self
    }

    /// Look up an object reference of type `T`
    #[must_use]
    pub fn object<T: Any + Send + Sync>(&self, name: &str) -> Option<&T> {
        self.objects.get(name).and_then(|o| o.downcast_ref::<T>())
    }

    /// Whether an object reference exists under `name`
    #[inline]
    #[must_use]
    pub fn has_object(&self, name: &str) -> bool {
        self.objects.contains_key(name)
    }

    /// String argument that is present and non-empty
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.record.str(name).filter(|s| !s.is_empty())
    }
}

impl Fields for ToolContext {
    #[inline]
    fn field(&self, name: &str) -> Option<&Value> {
        self.record.field(name)
    }
}

impl Deref for ToolContext {
    type Target = Record;

    fn deref(&self) -> &Self::Target {
        &self.record
    }
}

impl From<Record> for ToolContext {
    fn from(record: Record) -> Self {
        Self::new(record)
    }
}

impl fmt::Debug for ToolContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolContext")
            .field("record", &self.record)
            .field("objects", &self.objects.keys().collect::<Vec<_>>())
            .finish()
    }
}
