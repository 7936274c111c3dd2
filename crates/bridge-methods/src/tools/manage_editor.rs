//! `manage_editor`: play mode, tags and layers

use super::{bind, require, respond};
use crate::context::ToolContext;
use crate::editor::{PlayMode, LAYER_COUNT};
use crate::host::EditorHost;
use crate::keys::MethodKey;
use crate::method::{StateMethod, ToolTree};
use crate::response::Response;
use bridge_tree::{BuildError, TreeBuilder};
use serde_json::{json, Map, Value};
use std::sync::Arc;

const NAME: &str = "manage_editor";

/// Editor management tool
#[must_use]
pub fn manage_editor(host: &Arc<EditorHost>) -> StateMethod {
    let host = Arc::clone(host);
    StateMethod::new(NAME, keys(), move || tree(&host))
}

fn keys() -> Vec<MethodKey> {
    vec![
        MethodKey::string("action", "Operation").required().with_enum([
            "play",
            "pause",
            "stop",
            "get_state",
            "add_tag",
            "remove_tag",
            "get_tags",
            "add_layer",
            "remove_layer",
            "get_layers",
        ]),
        MethodKey::string("tag_name", "Tag name, for add_tag and remove_tag"),
        MethodKey::string("layer_name", "Layer name, for add_layer and remove_layer"),
    ]
}

fn tree(host: &Arc<EditorHost>) -> Result<ToolTree, BuildError> {
    TreeBuilder::<ToolContext, Response>::create()
        .key("action")
        // play mode
        .leaf("play", bind(host, "play", play))
        .leaf("pause", bind(host, "pause", pause))
        .leaf("stop", bind(host, "stop", stop))
        .leaf("get_state", bind(host, "get_state", get_state))
        // tags
        .leaf("add_tag", bind(host, "add_tag", add_tag))
        .leaf("remove_tag", bind(host, "remove_tag", remove_tag))
        .leaf("get_tags", bind(host, "get_tags", get_tags))
        // layers
        .leaf("add_layer", bind(host, "add_layer", add_layer))
        .leaf("remove_layer", bind(host, "remove_layer", remove_layer))
        .leaf("get_layers", bind(host, "get_layers", get_layers))
        .build()
}

fn play(host: &EditorHost, _ctx: &ToolContext) -> Response {
    match host.editor.lock().play() {
        PlayMode::Playing => Response::success("Already in play mode."),
        PlayMode::Paused => Response::success("Resumed play mode."),
        PlayMode::Stopped => Response::success("Entered play mode."),
    }
}

fn pause(host: &EditorHost, _ctx: &ToolContext) -> Response {
    match host.editor.lock().pause() {
        Ok(PlayMode::Paused) => Response::success("Game paused."),
        Ok(_) => Response::success("Game resumed."),
        Err(err) => Response::error(err.to_string()),
    }
}

fn stop(host: &EditorHost, _ctx: &ToolContext) -> Response {
    match host.editor.lock().stop() {
        PlayMode::Stopped => Response::success("Already stopped (not in play mode)."),
        PlayMode::Playing | PlayMode::Paused => Response::success("Exited play mode."),
    }
}

fn get_state(host: &EditorHost, _ctx: &ToolContext) -> Response {
    let editor = host.editor.lock();
    let mode = editor.play_mode();
    let state = json!({
        "playMode": mode,
        "isPlaying": mode != PlayMode::Stopped,
        "isPaused": mode == PlayMode::Paused,
        "tagCount": editor.tags().len(),
        "layerCount": editor.layers().len(),
        "sceneObjects": host.scene.lock().len(),
        "consoleEntries": host.console.len(),
    });
    Response::success_with("Retrieved editor state.", state)
}

fn add_tag(host: &EditorHost, ctx: &ToolContext) -> Response {
    respond(tag_name(ctx, "add_tag").and_then(|tag| {
        host.editor
            .lock()
            .add_tag(tag)
            .map(|()| Response::success(format!("Tag '{tag}' added successfully.")))
            .map_err(|err| Response::error(err.to_string()))
    }))
}

fn remove_tag(host: &EditorHost, ctx: &ToolContext) -> Response {
    respond(tag_name(ctx, "remove_tag").and_then(|tag| {
        host.editor
            .lock()
            .remove_tag(tag)
            .map(|()| Response::success(format!("Tag '{tag}' removed successfully.")))
            .map_err(|err| Response::error(err.to_string()))
    }))
}

fn get_tags(host: &EditorHost, _ctx: &ToolContext) -> Response {
    Response::success_with("Retrieved current tags.", json!(host.editor.lock().tags()))
}

fn add_layer(host: &EditorHost, ctx: &ToolContext) -> Response {
    respond(layer_name(ctx, "add_layer").and_then(|layer| {
        host.editor
            .lock()
            .add_layer(layer)
            .map(|slot| Response::success(format!("Layer '{layer}' added successfully to slot {slot}.")))
            .map_err(|err| Response::error(err.to_string()))
    }))
}

fn remove_layer(host: &EditorHost, ctx: &ToolContext) -> Response {
    respond(layer_name(ctx, "remove_layer").and_then(|layer| {
        host.editor
            .lock()
            .remove_layer(layer)
            .map(|slot| Response::success(format!("Layer '{layer}' (slot {slot}) removed successfully.")))
            .map_err(|err| Response::error(err.to_string()))
    }))
}

fn get_layers(host: &EditorHost, _ctx: &ToolContext) -> Response {
    let editor = host.editor.lock();
    let mut layers = Map::with_capacity(LAYER_COUNT);
    for (index, name) in editor.layers() {
        layers.insert(index.to_string(), Value::from(name));
    }
    Response::success_with("Retrieved current named layers.", layers)
}

fn tag_name<'a>(ctx: &'a ToolContext, action: &str) -> Result<&'a str, Response> {
    let tag = require(ctx, "tag_name", action)?;
    if tag.trim().is_empty() {
        return Err(Response::error("Tag name cannot be empty or whitespace."));
    }
    Ok(tag)
}

fn layer_name<'a>(ctx: &'a ToolContext, action: &str) -> Result<&'a str, Response> {
    let layer = require(ctx, "layer_name", action)?;
    if layer.trim().is_empty() {
        return Err(Response::error("Layer name cannot be empty or whitespace."));
    }
    Ok(layer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::ToolMethod;
    use bridge_tree::Record;

    fn run(method: &StateMethod, record: Record) -> Response {
        method.execute(&ToolContext::new(record))
    }

    fn action(name: &str) -> Record {
        Record::new().with("action", name)
    }

    #[test]
    fn play_mode_messages() {
        let host = Arc::new(EditorHost::new());
        let method = manage_editor(&host);
        assert_eq!(run(&method, action("pause")).text(), "Cannot pause: editor is not in play mode");
        assert_eq!(run(&method, action("play")).text(), "Entered play mode.");
        assert_eq!(run(&method, action("play")).text(), "Already in play mode.");
        assert_eq!(run(&method, action("pause")).text(), "Game paused.");
        assert_eq!(run(&method, action("pause")).text(), "Game resumed.");
        assert_eq!(run(&method, action("stop")).text(), "Exited play mode.");
        assert_eq!(run(&method, action("stop")).text(), "Already stopped (not in play mode).");
    }

    #[test]
    fn state_reports_mode() {
        let host = Arc::new(EditorHost::new());
        let method = manage_editor(&host);
        run(&method, action("play"));
        let r = run(&method, action("get_state"));
        let data = r.data.unwrap();
        assert_eq!(data["playMode"], json!("playing"));
        assert_eq!(data["isPaused"], json!(false));
    }

    #[test]
    fn tag_arguments_are_checked_by_the_handler() {
        let host = Arc::new(EditorHost::new());
        let method = manage_editor(&host);
        assert_eq!(
            run(&method, action("add_tag")).text(),
            "'tag_name' parameter is required for add_tag."
        );
        assert_eq!(
            run(&method, action("add_tag").with("tag_name", "   ")).text(),
            "Tag name cannot be empty or whitespace."
        );
        assert!(run(&method, action("add_tag").with("tag_name", "Enemy")).success);
        assert_eq!(
            run(&method, action("add_tag").with("tag_name", "Enemy")).text(),
            "Tag 'Enemy' already exists"
        );
        assert!(host.editor.lock().has_tag("Enemy"));
    }

    #[test]
    fn layers_round_trip_through_slots() {
        let host = Arc::new(EditorHost::new());
        let method = manage_editor(&host);
        assert_eq!(
            run(&method, action("add_layer").with("layer_name", "Ground")).text(),
            "Layer 'Ground' added successfully to slot 8."
        );
        let layers = run(&method, action("get_layers")).data.unwrap();
        assert_eq!(layers["8"], json!("Ground"));
        assert_eq!(layers["5"], json!("UI"));
        assert_eq!(
            run(&method, action("remove_layer").with("layer_name", "Ground")).text(),
            "Layer 'Ground' (slot 8) removed successfully."
        );
    }
}
