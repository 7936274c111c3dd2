//! Built-in editor tools
//!
//! Every tool is a constructor taking the shared [`EditorHost`]; the host is
//! captured by the tree factory and by each leaf handler.
//!
//! - `console_read`, `console_write` operate on the console buffer
//! - `manage_editor` drives play mode, tags and layers
//! - `hierarchy_create`, `gameobject_edit` operate on the scene

mod console_read;
mod console_write;
mod gameobject_edit;
mod hierarchy_create;
mod manage_editor;

pub use console_read::console_read;
pub use console_write::console_write;
pub use gameobject_edit::{gameobject_edit, Targets};
pub use hierarchy_create::hierarchy_create;
pub use manage_editor::manage_editor;

use crate::context::ToolContext;
use crate::host::EditorHost;
use crate::response::Response;
use bridge_tree::Handler;
use std::sync::Arc;

/// Named leaf handler over the host
pub(crate) fn bind<R: 'static>(
    host: &Arc<EditorHost>,
    name: &'static str,
    func: fn(&EditorHost, &ToolContext) -> R,
) -> Handler<ToolContext, R> {
    let host = Arc::clone(host);
    Handler::named(name, move |ctx: &ToolContext| func(&host, ctx))
}

/// [`bind`] for handler bodies written with `?`
pub(crate) fn bind_try(
    host: &Arc<EditorHost>,
    name: &'static str,
    func: fn(&EditorHost, &ToolContext) -> Result<Response, Response>,
) -> Handler<ToolContext, Response> {
    let host = Arc::clone(host);
    Handler::named(name, move |ctx: &ToolContext| respond(func(&host, ctx)))
}

/// Required non-empty string argument
pub(crate) fn require<'a>(ctx: &'a ToolContext, name: &str, purpose: &str) -> Result<&'a str, Response> {
    ctx.text(name)
        .ok_or_else(|| Response::error(format!("'{name}' parameter is required for {purpose}.")))
}

/// Collapse a handler body written with `?` into a response
pub(crate) fn respond(result: Result<Response, Response>) -> Response {
    result.unwrap_or_else(|err| err)
}
