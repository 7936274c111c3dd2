//! Bridge Tree (bridge-tree)
//!
//! Declarative command dispatch: route a flat JSON command record to exactly
//! one handler through an immutable decision tree.
//!
//! - **Node model**: two decision primitives (value match, presence check)
//!   plus handler leaves
//! - **Builder**: scoped, stack-based construction with `branch` / `up`
//! - **Evaluator**: pure walk returning a [`DispatchOutcome`]
//! - **Printer**: box-drawn rendering for help surfaces
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use bridge_tree::prelude::*;
//!
//! let tree = TreeBuilder::<Record, String>::create()
//!     .key("action")
//!     .leaf("play", |_: &Record| "playing".to_string())
//!     .leaf("stop", |_: &Record| "stopped".to_string())
//!     .build()?;
//!
//! let record = Record::new().with("action", "PLAY");
//! assert_eq!(tree.run(&record).into_result()?, "playing");
//! println!("{}", tree.describe());
//! ```

#![warn(unreachable_pub)]

pub mod builder;
pub mod eval;
pub mod handler;
pub mod node;
pub mod print;
pub mod record;
pub mod tree;

pub use builder::{BuildError, TreeBuilder};
pub use eval::{DispatchError, DispatchOutcome, NoMatch, Probe, Step};
pub use handler::{Handler, HandlerFault, IntoHandler};
pub use node::{Edge, KeyDecision, Node, PresenceDecision, Unmatched};
pub use record::{EdgeKey, EdgeValue, Fields, Record, RecordError};
pub use tree::Tree;

/// Common imports for tree authors
pub mod prelude {
    pub use crate::builder::{BuildError, TreeBuilder};
    pub use crate::eval::{DispatchError, DispatchOutcome, NoMatch};
    pub use crate::handler::Handler;
    pub use crate::record::{Fields, Record};
    pub use crate::tree::Tree;
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
