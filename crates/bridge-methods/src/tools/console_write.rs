//! `console_write`: append a message to the console buffer

use super::{bind, respond};
use crate::console::LogKind;
use crate::context::ToolContext;
use crate::host::EditorHost;
use crate::keys::MethodKey;
use crate::method::{StateMethod, ToolTree};
use crate::response::Response;
use bridge_tree::{BuildError, Fields, TreeBuilder};
use serde_json::{json, Value};
use std::sync::Arc;

const NAME: &str = "console_write";
const DEFAULT_TAG: &str = "MCP";

/// Console writer tool
#[must_use]
pub fn console_write(host: &Arc<EditorHost>) -> StateMethod {
    let host = Arc::clone(host);
    StateMethod::new(NAME, keys(), move || tree(&host))
}

fn keys() -> Vec<MethodKey> {
    vec![
        MethodKey::string("action", "Message type")
            .required()
            .with_enum(["error", "warning", "log", "assert", "exception"]),
        MethodKey::string("message", "Message text").required(),
        MethodKey::string("tag", "Category tag prefixed to the message").with_default(DEFAULT_TAG),
        MethodKey::string("context", "Name or path of the GameObject the message refers to"),
        MethodKey::string("condition", "Failed condition, for assert messages"),
    ]
}

fn tree(host: &Arc<EditorHost>) -> Result<ToolTree, BuildError> {
    TreeBuilder::<ToolContext, Response>::create()
        .key("action")
        .leaf("error", bind(host, "write_error", write_error))
        .leaf("warning", bind(host, "write_warning", write_warning))
        .leaf("log", bind(host, "write_log", write_log))
        .leaf("assert", bind(host, "write_assert", write_assert))
        .leaf("exception", bind(host, "write_exception", write_exception))
        .default_leaf(bind(host, "unknown_action", unknown_action))
        .build()
}

fn write_error(host: &EditorHost, ctx: &ToolContext) -> Response {
    respond(write(host, ctx, LogKind::Error, "Error log"))
}

fn write_warning(host: &EditorHost, ctx: &ToolContext) -> Response {
    respond(write(host, ctx, LogKind::Warning, "Warning log"))
}

fn write_log(host: &EditorHost, ctx: &ToolContext) -> Response {
    respond(write(host, ctx, LogKind::Log, "Log"))
}

fn write_assert(host: &EditorHost, ctx: &ToolContext) -> Response {
    respond(write(host, ctx, LogKind::Assert, "Assertion log"))
}

fn write_exception(host: &EditorHost, ctx: &ToolContext) -> Response {
    respond(write(host, ctx, LogKind::Exception, "Exception log"))
}

fn unknown_action(_host: &EditorHost, ctx: &ToolContext) -> Response {
    let action = match ctx.field("action") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::String(_) | Value::Null) | None => "null".to_string(),
        Some(other) => other.to_string(),
    };
    Response::error(format!(
        "Unknown action: '{action}' for {NAME}. Valid actions are 'error', 'warning', 'log', 'assert', or 'exception'."
    ))
}

fn write(host: &EditorHost, ctx: &ToolContext, kind: LogKind, label: &str) -> Result<Response, Response> {
    let message = ctx
        .str("message")
        .ok_or_else(|| Response::error("'message' parameter is required."))?;
    let tag = ctx.text("tag").unwrap_or(DEFAULT_TAG);
    let mut formatted = format!("[{tag}][{}] {message}", kind.as_str().to_ascii_uppercase());
    if kind == LogKind::Assert {
        if let Some(condition) = ctx.text("condition") {
            formatted.push_str(&format!(" | Condition: {condition}"));
        }
    }

    // Messages about a scene object carry its path as the trace location.
    let context = ctx.text("context").and_then(|name| {
        let scene = host.scene.lock();
        let id = scene.find_path(name).or_else(|| scene.find_name(name).first().copied());
        match id {
            Some(id) => scene.path_of(id).map(|path| (id, path)),
            None => {
                tracing::debug!(tool = NAME, context = name, "context object not found");
                None
            }
        }
    });
    let stacktrace = match (&context, kind) {
        (Some((_, path)), LogKind::Error | LogKind::Assert | LogKind::Exception) => Some(format!("at {path}")),
        _ => None,
    };

    let sequence = host.console.push(kind, formatted.clone(), stacktrace);
    tracing::debug!(tool = NAME, sequence, kind = %kind, "console message written");
    Ok(Response::success_with(
        format!("{label} written successfully: {formatted}"),
        json!({
            "sequence": sequence,
            "context_id": context.map(|(id, _)| id),
        }),
    ))
}
