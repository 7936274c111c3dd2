//! `console_read`: query or clear the console buffer

use super::{bind, respond};
use crate::console::{ConsoleQuery, LogEntry, LogKind};
use crate::context::ToolContext;
use crate::host::EditorHost;
use crate::keys::MethodKey;
use crate::method::{StateMethod, ToolTree};
use crate::response::Response;
use bridge_tree::{BuildError, Fields, Handler, TreeBuilder};
use serde_json::{json, Value};
use std::sync::Arc;

const NAME: &str = "console_read";
const DEFAULT_COUNT: usize = 10;
const MAX_COUNT: usize = 1000;

/// Console reader tool
#[must_use]
pub fn console_read(host: &Arc<EditorHost>) -> StateMethod {
    let host = Arc::clone(host);
    StateMethod::new(NAME, keys(), move || tree(&host))
}

fn keys() -> Vec<MethodKey> {
    vec![
        MethodKey::string("action", "get (no stack traces), get_full (with stack traces) or clear")
            .required()
            .with_enum(["get", "get_full", "clear"]),
        MethodKey::vector("types", "Message types to include: error, warning, log or all")
            .with_examples(["[\"error\", \"warning\"]"]),
        MethodKey::integer("count", "Return only the newest N matching entries (1-1000)")
            .with_default(DEFAULT_COUNT),
        MethodKey::string("filterText", "Keep entries whose message contains this text"),
        MethodKey::string("format", "Entry format")
            .with_enum(["plain", "detailed", "json"])
            .with_default("detailed"),
    ]
}

fn tree(host: &Arc<EditorHost>) -> Result<ToolTree, BuildError> {
    let read = |full, counted, filtered| Read { full, counted, filtered }.handler(host);
    TreeBuilder::<ToolContext, Response>::create()
        .key("action")
        .branch("get")
        .optional_key("count")
        .optional_leaf("filterText", read(false, true, true))
        .default_leaf(read(false, true, false))
        .up()
        .optional_leaf("filterText", read(false, false, true))
        .default_leaf(read(false, false, false))
        .up()
        .branch("get_full")
        .optional_key("count")
        .optional_leaf("filterText", read(true, true, true))
        .default_leaf(read(true, true, false))
        .up()
        .optional_leaf("filterText", read(true, false, true))
        .default_leaf(read(true, false, false))
        .up()
        .leaf("clear", bind(host, "clear", clear))
        .build()
}

#[derive(Debug, Clone, Copy)]
struct Read {
    full: bool,
    counted: bool,
    filtered: bool,
}

impl Read {
    fn name(self) -> &'static str {
        match (self.full, self.counted, self.filtered) {
            (false, false, false) => "get_all",
            (false, false, true) => "get_all_filtered",
            (false, true, false) => "get_recent",
            (false, true, true) => "get_recent_filtered",
            (true, false, false) => "get_full_all",
            (true, false, true) => "get_full_all_filtered",
            (true, true, false) => "get_full_recent",
            (true, true, true) => "get_full_recent_filtered",
        }
    }

    fn handler(self, host: &Arc<EditorHost>) -> Handler<ToolContext, Response> {
        let host = Arc::clone(host);
        Handler::named(self.name(), move |ctx: &ToolContext| respond(self.run(&host, ctx)))
    }

    fn run(self, host: &EditorHost, ctx: &ToolContext) -> Result<Response, Response> {
        let count = if self.counted { Some(count(ctx)?) } else { None };
        let filter = if self.filtered { Some(filter_text(ctx)) } else { None };
        let kinds = kinds(ctx)?;
        let format = Format::parse(ctx)?;

        let scope = count.map_or_else(|| "all log entries".to_string(), |n| format!("{n} log entries"));
        let filtered = filter
            .as_deref()
            .map_or_else(|| "no filter".to_string(), |f| format!("filtered by '{f}'"));
        let trace = if self.full { "with stacktrace" } else { "no stacktrace" };
        let description = format!("{scope} ({filtered}, {trace})");
        tracing::debug!(tool = NAME, %description, "reading console");

        let entries = host.console.query(&ConsoleQuery {
            kinds: Some(kinds),
            count,
            filter,
            include_stacktrace: self.full,
        });
        let data: Vec<Value> = entries.iter().map(|e| format.render(e)).collect();
        Ok(Response::success_with(
            format!("Retrieved {} log entries ({description}).", entries.len()),
            data,
        ))
    }
}

fn clear(host: &EditorHost, _ctx: &ToolContext) -> Response {
    let removed = host.console.clear();
    tracing::debug!(tool = NAME, removed, "console cleared");
    Response::success("Console cleared successfully.")
}

fn count(ctx: &ToolContext) -> Result<usize, Response> {
    ctx.int("count")
        .and_then(|n| usize::try_from(n).ok())
        .filter(|n| (1..=MAX_COUNT).contains(n))
        .ok_or_else(|| Response::error(format!("'count' must be an integer between 1 and {MAX_COUNT}.")))
}

fn filter_text(ctx: &ToolContext) -> String {
    match ctx.field("filterText") {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

/// Requested kinds; `error` also covers assertions and exceptions
fn kinds(ctx: &ToolContext) -> Result<Vec<LogKind>, Response> {
    let names: Vec<String> = match ctx.field("types") {
        None | Some(Value::Null) => return Ok(LogKind::ALL.to_vec()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| v.as_str().map_or_else(|| v.to_string(), str::to_string))
            .collect(),
        Some(Value::String(s)) => s.split(',').map(str::to_string).collect(),
        Some(other) => {
            return Err(Response::error(format!(
                "'types' must be an array of message types, got {other}."
            )))
        }
    };

    let mut kinds = Vec::new();
    for name in names {
        let name = name.trim().to_ascii_lowercase();
        let group = match name.as_str() {
            "all" => LogKind::ALL.to_vec(),
            "error" => vec![LogKind::Error, LogKind::Assert, LogKind::Exception],
            other => vec![other.parse::<LogKind>().map_err(|unknown| {
                Response::error(format!(
                    "Unknown message type '{unknown}'. Valid types are 'error', 'warning', 'log', or 'all'."
                ))
            })?],
        };
        for kind in group {
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
    }
    Ok(kinds)
}

#[derive(Debug, Clone, Copy)]
enum Format {
    Plain,
    Detailed,
    Json,
}

impl Format {
    fn parse(ctx: &ToolContext) -> Result<Self, Response> {
        match ctx.text("format").map(str::to_ascii_lowercase).as_deref() {
            None | Some("detailed") => Ok(Self::Detailed),
            Some("plain") => Ok(Self::Plain),
            Some("json") => Ok(Self::Json),
            Some(other) => Err(Response::error(format!(
                "Unknown format '{other}'. Valid formats are 'plain', 'detailed', or 'json'."
            ))),
        }
    }

    fn render(self, entry: &LogEntry) -> Value {
        match self {
            Self::Plain => match &entry.stacktrace {
                Some(trace) => json!(format!("[{}] {}\n{trace}", entry.kind, entry.message)),
                None => json!(format!("[{}] {}", entry.kind, entry.message)),
            },
            Self::Detailed => {
                let mut value = json!({ "type": entry.kind, "message": entry.message });
                if let Some(trace) = &entry.stacktrace {
                    value["stackTrace"] = json!(trace);
                }
                value
            }
            Self::Json => serde_json::to_value(entry).unwrap_or(Value::Null),
        }
    }
}
