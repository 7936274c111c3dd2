//! Bridge Methods (bridge-methods)
//!
//! Tool methods built on `bridge-tree` decision trees, the registry that
//! names them, and the in-memory editor they operate on.
//!
//! - **Facades**: [`StateMethod`] (one tree) and [`DualStateMethod`]
//!   (locate targets, then act), both built lazily and cached
//! - **Envelope**: every call returns a [`Response`]; dispatch failures
//!   never escape as panics or errors
//! - **Registry**: static table of built-in tools plus batch execution
//! - **Ambient**: TOML [`config`], `tracing` initialisation in [`logging`]
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use bridge_methods::prelude::*;
//! use std::sync::Arc;
//!
//! let host = Arc::new(EditorHost::new());
//! let registry = MethodRegistry::with_builtins(&host, &ToolsConfig::default());
//!
//! let response = registry.execute_value(
//!     "console_write",
//!     serde_json::json!({"action": "log", "message": "hello"}),
//! );
//! assert!(response.success);
//! println!("{}", registry.describe("console_read")?);
//! ```

#![warn(unreachable_pub)]

pub mod config;
pub mod console;
pub mod context;
pub mod dual;
pub mod editor;
pub mod error;
pub mod host;
pub mod keys;
pub mod logging;
pub mod method;
pub mod registry;
pub mod response;
pub mod scene;
pub mod tools;

pub use config::{
    load_config, parse_config, BridgeConfig, ConfigError, ConsoleConfig, LogFormat, LoggingConfig, ToolsConfig,
};
pub use console::{ConsoleLog, ConsoleQuery, LogEntry, LogKind};
pub use context::{ToolContext, RESOLVED_TARGETS};
pub use dual::{DualStateMethod, TargetTree};
pub use error::MethodError;
pub use host::EditorHost;
pub use keys::{KeyKind, MethodKey};
pub use method::{StateMethod, ToolMethod, ToolTree};
pub use registry::{BatchCall, MethodRegistry, ToolEntry, BUILTIN_TOOLS};
pub use response::Response;

/// Common imports for tool authors and embedders
pub mod prelude {
    pub use crate::config::{BridgeConfig, ToolsConfig};
    pub use crate::context::{ToolContext, RESOLVED_TARGETS};
    pub use crate::dual::DualStateMethod;
    pub use crate::host::EditorHost;
    pub use crate::keys::MethodKey;
    pub use crate::method::{StateMethod, ToolMethod};
    pub use crate::registry::{BatchCall, MethodRegistry};
    pub use crate::response::Response;
    pub use bridge_tree::prelude::*;
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
