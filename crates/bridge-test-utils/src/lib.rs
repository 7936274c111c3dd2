//! Testing utilities for the bridge workspace
//!
//! Shared record helpers, call-recording handlers and the reference trees
//! used across the integration suites.

#![allow(missing_docs)]

use bridge_tree::{Handler, Record, Tree, TreeBuilder};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;

/// Build a record from a `json!` object literal
pub fn record(value: Value) -> Record {
    Record::try_from(value).unwrap()
}

/// Shared log of handler invocations
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handler that records its name and returns it
    pub fn handler(&self, name: &'static str) -> Handler<Record, String> {
        let calls = Arc::clone(&self.calls);
        Handler::named(name, move |_: &Record| {
            calls.lock().push(name.to_string());
            name.to_string()
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.calls.lock().iter().filter(|c| *c == name).count()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.lock().is_empty()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

/// `action` = play / stop with a fallback
pub fn play_stop_tree(log: &CallLog) -> Tree<Record, String> {
    TreeBuilder::create()
        .key("action")
        .leaf("play", log.handler("h1"))
        .leaf("stop", log.handler("h2"))
        .default_leaf(log.handler("herr"))
        .build()
        .unwrap()
}

/// `action` = play / stop / primitive(primitive_type = Cube), no root default
pub fn primitive_tree(log: &CallLog) -> Tree<Record, String> {
    TreeBuilder::create()
        .key("action")
        .leaf("play", log.handler("h1"))
        .leaf("stop", log.handler("h2"))
        .branch("primitive")
        .optional_key("primitive_type")
        .leaf("Cube", log.handler("hc"))
        .up()
        .default_leaf(log.handler("hd"))
        .up()
        .build()
        .unwrap()
}

/// Console-read shaped tree: get × count × filterText
pub fn console_read_tree(log: &CallLog) -> Tree<Record, String> {
    TreeBuilder::create()
        .key("action")
        .branch("get")
        .optional_key("count")
        .optional_leaf("filterText", log.handler("hA"))
        .default_leaf(log.handler("hB"))
        .up()
        .optional_leaf("filterText", log.handler("hC"))
        .default_leaf(log.handler("hD"))
        .build()
        .unwrap()
}
