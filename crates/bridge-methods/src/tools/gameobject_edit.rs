//! `gameobject_edit`: locate GameObjects, then modify them
//!
//! Two trees: the target tree resolves `instance_id`, `path` or `name`
//! (in that order of preference) into [`Targets`]; the action tree routes
//! on `action` and edits every located object.

use super::{bind, bind_try, require};
use crate::context::{ToolContext, RESOLVED_TARGETS};
use crate::dual::{DualStateMethod, TargetTree};
use crate::host::EditorHost;
use crate::keys::MethodKey;
use crate::method::ToolTree;
use crate::response::Response;
use crate::scene::Scene;
use bridge_tree::{BuildError, TreeBuilder};
use serde_json::Value;
use std::sync::Arc;

const NAME: &str = "gameobject_edit";

/// Instance ids located by the target phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Targets(Vec<i64>);

impl Targets {
    /// Located ids in scene order
    #[inline]
    #[must_use]
    pub fn ids(&self) -> &[i64] {
        &self.0
    }
}

/// GameObject editing tool
#[must_use]
pub fn gameobject_edit(host: &Arc<EditorHost>) -> DualStateMethod<Targets> {
    let target_host = Arc::clone(host);
    let action_host = Arc::clone(host);
    DualStateMethod::new(
        NAME,
        keys(),
        move || target_tree(&target_host),
        move || action_tree(&action_host),
    )
}

fn keys() -> Vec<MethodKey> {
    vec![
        MethodKey::integer("instance_id", "Target instance id"),
        MethodKey::string("path", "Target hierarchy path").with_examples(["Canvas/Panel/Button"]),
        MethodKey::string("name", "Target name; every object with this name is edited"),
        MethodKey::string("action", "Edit to apply")
            .required()
            .with_enum(["rename", "set_active", "set_tag", "delete"]),
        MethodKey::string("new_name", "New name, for rename"),
        MethodKey::boolean("active", "Activation state, for set_active"),
        MethodKey::string("tag", "Tag, for set_tag"),
    ]
}

fn target_tree(host: &Arc<EditorHost>) -> Result<TargetTree<Targets>, BuildError> {
    TreeBuilder::<ToolContext, Result<Targets, Response>>::create()
        .optional_leaf("instance_id", bind(host, "find_by_id", find_by_id))
        .optional_leaf("path", bind(host, "find_by_path", find_by_path))
        .optional_leaf("name", bind(host, "find_by_name", find_by_name))
        .build()
}

fn action_tree(host: &Arc<EditorHost>) -> Result<ToolTree, BuildError> {
    TreeBuilder::<ToolContext, Response>::create()
        .key("action")
        .leaf("rename", bind_try(host, "rename", rename))
        .leaf("set_active", bind_try(host, "set_active", set_active))
        .leaf("set_tag", bind_try(host, "set_tag", set_tag))
        .leaf("delete", bind_try(host, "delete", delete))
        .build()
}

fn find_by_id(host: &EditorHost, ctx: &ToolContext) -> Result<Targets, Response> {
    let id = ctx
        .int("instance_id")
        .ok_or_else(|| Response::error("'instance_id' must be an integer."))?;
    match host.scene.lock().get(id) {
        Some(_) => Ok(Targets(vec![id])),
        None => Err(Response::error(format!("No GameObject with instance_id {id}"))),
    }
}

fn find_by_path(host: &EditorHost, ctx: &ToolContext) -> Result<Targets, Response> {
    let path = require(ctx, "path", "path lookup")?;
    host.scene
        .lock()
        .find_path(path)
        .map(|id| Targets(vec![id]))
        .ok_or_else(|| Response::error(format!("GameObject not found at path '{path}'")))
}

fn find_by_name(host: &EditorHost, ctx: &ToolContext) -> Result<Targets, Response> {
    let name = require(ctx, "name", "name lookup")?;
    let ids = host.scene.lock().find_name(name);
    if ids.is_empty() {
        return Err(Response::error(format!("No GameObject named '{name}'")));
    }
    Ok(Targets(ids))
}

fn targets(ctx: &ToolContext) -> Result<&[i64], Response> {
    ctx.object::<Targets>(RESOLVED_TARGETS)
        .map(Targets::ids)
        .filter(|ids| !ids.is_empty())
        .ok_or_else(|| Response::error("No target GameObjects found in execution context."))
}

fn snapshots(scene: &Scene, ids: &[i64]) -> Value {
    Value::Array(ids.iter().filter_map(|id| scene.snapshot(*id)).collect())
}

fn rename(host: &EditorHost, ctx: &ToolContext) -> Result<Response, Response> {
    let ids = targets(ctx)?;
    let new_name = require(ctx, "new_name", "rename")?;
    let mut scene = host.scene.lock();
    for id in ids {
        scene
            .rename(*id, new_name)
            .map_err(|err| Response::error(err.to_string()))?;
    }
    Ok(Response::success_with(
        format!("Renamed {} GameObject(s) to '{new_name}'.", ids.len()),
        snapshots(&scene, ids),
    ))
}

fn set_active(host: &EditorHost, ctx: &ToolContext) -> Result<Response, Response> {
    let ids = targets(ctx)?;
    let active = ctx
        .bool("active")
        .ok_or_else(|| Response::error("'active' parameter is required for set_active."))?;
    let mut scene = host.scene.lock();
    for id in ids {
        scene
            .get_mut(*id)
            .map_err(|err| Response::error(err.to_string()))?
            .active = active;
    }
    let state = if active { "Activated" } else { "Deactivated" };
    Ok(Response::success_with(
        format!("{state} {} GameObject(s).", ids.len()),
        snapshots(&scene, ids),
    ))
}

fn set_tag(host: &EditorHost, ctx: &ToolContext) -> Result<Response, Response> {
    let ids = targets(ctx)?;
    let tag = require(ctx, "tag", "set_tag")?;
    if !host.editor.lock().has_tag(tag) {
        return Err(Response::error(format!("Tag '{tag}' does not exist")));
    }
    let mut scene = host.scene.lock();
    for id in ids {
        scene
            .get_mut(*id)
            .map_err(|err| Response::error(err.to_string()))?
            .tag = tag.to_string();
    }
    Ok(Response::success_with(
        format!("Tagged {} GameObject(s) as '{tag}'.", ids.len()),
        snapshots(&scene, ids),
    ))
}

fn delete(host: &EditorHost, ctx: &ToolContext) -> Result<Response, Response> {
    let ids = targets(ctx)?;
    let mut scene = host.scene.lock();
    let mut removed = Vec::new();
    for id in ids {
        // A target may already be gone as a descendant of an earlier one.
        if scene.get(*id).is_some() {
            removed.extend(scene.remove(*id).map_err(|err| Response::error(err.to_string()))?);
        }
    }
    Ok(Response::success_with(
        format!("Deleted {} GameObject(s).", removed.len()),
        removed,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::ToolMethod;
    use bridge_tree::Record;
    use serde_json::json;

    fn scene() -> (Arc<EditorHost>, i64, i64) {
        let host = Arc::new(EditorHost::new());
        let (canvas, button) = {
            let mut scene = host.scene.lock();
            let canvas = scene.spawn("Canvas", "empty", None).unwrap();
            let button = scene.spawn("Button", "empty", Some(canvas)).unwrap();
            scene.spawn("Button", "empty", None).unwrap();
            (canvas, button)
        };
        (host, canvas, button)
    }

    fn run(host: &Arc<EditorHost>, record: Record) -> Response {
        gameobject_edit(host).execute(&ToolContext::new(record))
    }

    #[test]
    fn instance_id_wins_over_name() {
        let (host, _, button) = scene();
        let r = run(
            &host,
            Record::new()
                .with("instance_id", button)
                .with("name", "Button")
                .with("action", "rename")
                .with("new_name", "Play"),
        );
        assert_eq!(r.text(), "Renamed 1 GameObject(s) to 'Play'.");
        assert_eq!(host.scene.lock().find_name("Button").len(), 1);
    }

    #[test]
    fn name_targets_every_match() {
        let (host, _, _) = scene();
        let r = run(
            &host,
            Record::new().with("name", "Button").with("action", "set_active").with("active", false),
        );
        assert_eq!(r.text(), "Deactivated 2 GameObject(s).");
        assert_eq!(r.data.unwrap()[0]["active"], json!(false));
    }

    #[test]
    fn delete_by_path_removes_descendants() {
        let (host, canvas, button) = scene();
        let r = run(&host, Record::new().with("path", "Canvas").with("action", "delete"));
        assert_eq!(r.data, Some(json!([canvas, button])));
        assert_eq!(host.scene.lock().len(), 1);
    }

    #[test]
    fn lookup_failures_come_from_the_target_handler() {
        let (host, _, _) = scene();
        let r = run(&host, Record::new().with("path", "Canvas/Missing").with("action", "delete"));
        assert_eq!(r.text(), "GameObject not found at path 'Canvas/Missing'");
        let r = run(&host, Record::new().with("instance_id", 1).with("action", "delete"));
        assert_eq!(r.text(), "No GameObject with instance_id 1");
    }

    #[test]
    fn missing_locator_fails_target_phase() {
        let (host, _, _) = scene();
        let r = run(&host, Record::new().with("action", "delete"));
        assert_eq!(
            r.text(),
            "Target location failed: Missing name. Supported values: [instance_id (optional), path (optional), name (optional)]"
        );
    }

    #[test]
    fn unknown_action_fails_action_phase() {
        let (host, _, button) = scene();
        let r = run(&host, Record::new().with("instance_id", button).with("action", "explode"));
        assert_eq!(
            r.text(),
            "Action execution failed: Unknown action: 'explode'. Supported values: [rename, set_active, set_tag, delete]"
        );
        assert_eq!(host.scene.lock().len(), 3);
    }

    #[test]
    fn set_tag_requires_known_tag() {
        let (host, _, button) = scene();
        let record = Record::new().with("instance_id", button).with("action", "set_tag");
        assert_eq!(run(&host, record.clone().with("tag", "Boss")).text(), "Tag 'Boss' does not exist");
        assert!(run(&host, record.with("tag", "Player")).success);
        assert_eq!(host.scene.lock().get(button).unwrap().tag, "Player");
    }
}
