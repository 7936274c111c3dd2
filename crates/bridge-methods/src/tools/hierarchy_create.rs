//! `hierarchy_create`: add GameObjects to the scene
//!
//! Routes on `source`; primitives additionally route on `primitive_type`
//! when it is given.

use super::{bind, require, respond};
use crate::context::ToolContext;
use crate::host::EditorHost;
use crate::keys::MethodKey;
use crate::method::{StateMethod, ToolTree};
use crate::response::Response;
use bridge_tree::{BuildError, Fields, TreeBuilder};
use serde_json::Value;
use std::sync::Arc;

const NAME: &str = "hierarchy_create";

/// Primitive shapes
pub(crate) const PRIMITIVES: [&str; 6] = ["Cube", "Sphere", "Cylinder", "Capsule", "Plane", "Quad"];

/// GameObject creation tool
#[must_use]
pub fn hierarchy_create(host: &Arc<EditorHost>) -> StateMethod {
    let host = Arc::clone(host);
    StateMethod::new(NAME, keys(), move || tree(&host))
}

fn keys() -> Vec<MethodKey> {
    vec![
        MethodKey::string("name", "GameObject name").required(),
        MethodKey::string("source", "Creation source")
            .required()
            .with_enum(["menu", "primitive", "prefab", "empty", "copy"]),
        MethodKey::string("tag", "GameObject tag"),
        MethodKey::integer("layer", "GameObject layer index"),
        MethodKey::string("parent", "Parent object name or path"),
        MethodKey::integer("parent_id", "Parent object instance id"),
        MethodKey::string("primitive_type", "Primitive shape").with_enum(PRIMITIVES),
        MethodKey::string("prefab_path", "Prefab asset path").with_examples(["Assets/Prefabs/Enemy.prefab"]),
        MethodKey::string("menu_path", "Menu item creating the object").with_examples(["GameObject/UI/Canvas"]),
        MethodKey::string("copy_source", "Name or path of the GameObject to copy"),
        MethodKey::boolean("set_active", "Initial activation state").with_default(true),
    ]
}

fn tree(host: &Arc<EditorHost>) -> Result<ToolTree, BuildError> {
    TreeBuilder::<ToolContext, Response>::create()
        .key("source")
        .leaf("menu", bind(host, "create_from_menu", create_from_menu))
        .branch("primitive")
        .optional_key("primitive_type")
        .leaf("Cube", bind(host, "create_cube", |h: &EditorHost, c: &ToolContext| create_primitive(h, c, "Cube")))
        .leaf("Sphere", bind(host, "create_sphere", |h: &EditorHost, c: &ToolContext| create_primitive(h, c, "Sphere")))
        .leaf("Cylinder", bind(host, "create_cylinder", |h: &EditorHost, c: &ToolContext| create_primitive(h, c, "Cylinder")))
        .leaf("Capsule", bind(host, "create_capsule", |h: &EditorHost, c: &ToolContext| create_primitive(h, c, "Capsule")))
        .leaf("Plane", bind(host, "create_plane", |h: &EditorHost, c: &ToolContext| create_primitive(h, c, "Plane")))
        .leaf("Quad", bind(host, "create_quad", |h: &EditorHost, c: &ToolContext| create_primitive(h, c, "Quad")))
        .default_leaf(bind(host, "create_from_primitive", create_from_primitive))
        .up()
        .default_leaf(bind(host, "create_from_primitive", create_from_primitive))
        .up()
        .leaf("prefab", bind(host, "create_from_prefab", create_from_prefab))
        .leaf("empty", bind(host, "create_empty", create_empty))
        .leaf("copy", bind(host, "create_from_copy", create_from_copy))
        .build()
}

fn create_from_menu(host: &EditorHost, ctx: &ToolContext) -> Response {
    respond(require(ctx, "menu_path", "menu creation").and_then(|menu| finalize(host, ctx, format!("menu:{menu}"))))
}

fn create_primitive(host: &EditorHost, ctx: &ToolContext, shape: &str) -> Response {
    respond(finalize(host, ctx, format!("primitive:{shape}")))
}

/// Unrecognised or omitted `primitive_type`; an omitted type makes a cube
fn create_from_primitive(host: &EditorHost, ctx: &ToolContext) -> Response {
    let requested = match ctx.field("primitive_type") {
        None | Some(Value::Null) => return create_primitive(host, ctx, "Cube"),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };
    match PRIMITIVES.iter().find(|p| p.eq_ignore_ascii_case(&requested)) {
        Some(shape) => create_primitive(host, ctx, shape),
        None => Response::error(format!(
            "Invalid primitive type: '{requested}'. Valid types: {}",
            PRIMITIVES.join(", ")
        )),
    }
}

fn create_from_prefab(host: &EditorHost, ctx: &ToolContext) -> Response {
    respond(require(ctx, "prefab_path", "prefab instantiation").and_then(|path| {
        if !path.ends_with(".prefab") {
            return Err(Response::error(format!("Prefab not found at path: '{path}'")));
        }
        finalize(host, ctx, format!("prefab:{path}"))
    }))
}

fn create_empty(host: &EditorHost, ctx: &ToolContext) -> Response {
    respond(finalize(host, ctx, "empty".to_string()))
}

fn create_from_copy(host: &EditorHost, ctx: &ToolContext) -> Response {
    respond(create_copy(host, ctx))
}

fn create_copy(host: &EditorHost, ctx: &ToolContext) -> Result<Response, Response> {
    let source = require(ctx, "copy_source", "copy creation")?;
    let name = require(ctx, "name", "copy creation")?;
    let mut scene = host.scene.lock();
    let original = scene
        .find_path(source)
        .or_else(|| scene.find_name(source).first().copied())
        .ok_or_else(|| Response::error(format!("Source GameObject '{source}' not found in scene")))?;
    let id = scene
        .duplicate(original, name)
        .map_err(|err| Response::error(format!("Error copying GameObject '{source}': {err}")))?;
    drop(scene);
    if let Err(err) = apply_settings(host, ctx, id) {
        rollback(host, id);
        return Err(err);
    }
    created(host, id)
}

/// Spawn under the requested parent, then apply tag, layer and activation
fn finalize(host: &EditorHost, ctx: &ToolContext, source: String) -> Result<Response, Response> {
    let name = require(ctx, "name", "GameObject creation")?;
    let parent = resolve_parent(host, ctx)?;
    let id = host
        .scene
        .lock()
        .spawn(name, source, parent)
        .map_err(|err| Response::error(err.to_string()))?;
    if let Err(err) = apply_settings(host, ctx, id) {
        rollback(host, id);
        return Err(err);
    }
    created(host, id)
}

/// Creation is all-or-nothing: drop an object whose settings were rejected
fn rollback(host: &EditorHost, id: i64) {
    if let Err(err) = host.scene.lock().remove(id) {
        tracing::warn!(tool = NAME, id, error = %err, "failed to roll back GameObject creation");
    }
}

fn resolve_parent(host: &EditorHost, ctx: &ToolContext) -> Result<Option<i64>, Response> {
    if let Some(id) = ctx.int("parent_id") {
        return Ok(Some(id));
    }
    let Some(parent) = ctx.text("parent") else {
        return Ok(None);
    };
    let scene = host.scene.lock();
    scene
        .find_path(parent)
        .or_else(|| scene.find_name(parent).first().copied())
        .map(Some)
        .ok_or_else(|| Response::error(format!("Parent GameObject '{parent}' not found")))
}

fn apply_settings(host: &EditorHost, ctx: &ToolContext, id: i64) -> Result<(), Response> {
    let tag = match ctx.text("tag") {
        Some(tag) if !host.editor.lock().has_tag(tag) => {
            return Err(Response::error(format!("Tag '{tag}' does not exist")));
        }
        other => other,
    };
    let layer = match ctx.int("layer") {
        Some(index) => Some(
            usize::try_from(index)
                .ok()
                .filter(|i| host.editor.lock().layers().iter().any(|(slot, _)| slot == i))
                .ok_or_else(|| Response::error(format!("Layer {index} is not defined")))?,
        ),
        None => None,
    };

    let mut scene = host.scene.lock();
    let obj = scene.get_mut(id).map_err(|err| Response::error(err.to_string()))?;
    if let Some(tag) = tag {
        obj.tag = tag.to_string();
    }
    if let Some(layer) = layer {
        obj.layer = layer;
    }
    if let Some(active) = ctx.bool("set_active") {
        obj.active = active;
    }
    Ok(())
}

fn created(host: &EditorHost, id: i64) -> Result<Response, Response> {
    let scene = host.scene.lock();
    let snapshot = scene
        .snapshot(id)
        .ok_or_else(|| Response::error("GameObject creation failed."))?;
    let name = scene.get(id).map(|o| o.name.clone()).unwrap_or_default();
    tracing::debug!(tool = NAME, id, %name, "GameObject created");
    Ok(Response::success_with(
        format!("GameObject '{name}' created successfully in scene."),
        snapshot,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::ToolMethod;
    use bridge_tree::Record;
    use serde_json::json;

    fn run(host: &Arc<EditorHost>, record: Record) -> Response {
        hierarchy_create(host).execute(&ToolContext::new(record))
    }

    fn primitive(name: &str) -> Record {
        Record::new().with("name", name).with("source", "primitive")
    }

    #[test]
    fn primitive_shapes_route_case_insensitively() {
        let host = Arc::new(EditorHost::new());
        let r = run(&host, primitive("Ball").with("primitive_type", "sphere"));
        assert_eq!(r.text(), "GameObject 'Ball' created successfully in scene.");
        assert_eq!(r.data.unwrap()["source"], json!("primitive:Sphere"));
    }

    #[test]
    fn omitted_primitive_type_makes_a_cube() {
        let host = Arc::new(EditorHost::new());
        let r = run(&host, primitive("Box"));
        assert_eq!(r.data.unwrap()["source"], json!("primitive:Cube"));
    }

    #[test]
    fn unknown_primitive_type_is_reported() {
        let host = Arc::new(EditorHost::new());
        let r = run(&host, primitive("Blob").with("primitive_type", "Torus"));
        assert_eq!(
            r.text(),
            "Invalid primitive type: 'Torus'. Valid types: Cube, Sphere, Cylinder, Capsule, Plane, Quad"
        );
        assert!(host.scene.lock().is_empty());
    }

    #[test]
    fn parent_tag_and_layer_are_applied() {
        let host = Arc::new(EditorHost::new());
        run(&host, Record::new().with("name", "Canvas").with("source", "menu").with("menu_path", "GameObject/UI/Canvas"));
        let r = run(
            &host,
            Record::new()
                .with("name", "Panel")
                .with("source", "empty")
                .with("parent", "Canvas")
                .with("tag", "Finish")
                .with("layer", 5)
                .with("set_active", false),
        );
        let data = r.data.unwrap();
        assert_eq!(data["path"], json!("Canvas/Panel"));
        assert_eq!(data["tag"], json!("Finish"));
        assert_eq!(data["layer"], json!(5));
        assert_eq!(data["active"], json!(false));
    }

    #[test]
    fn failed_settings_leave_no_object_behind() {
        let host = Arc::new(EditorHost::new());
        let r = run(&host, Record::new().with("name", "X").with("source", "empty").with("tag", "Nope"));
        assert_eq!(r.text(), "Tag 'Nope' does not exist");
        assert!(host.scene.lock().is_empty());
    }

    #[test]
    fn failed_copy_settings_leave_no_copy_behind() {
        let host = Arc::new(EditorHost::new());
        run(&host, Record::new().with("name", "A").with("source", "empty"));
        let r = run(
            &host,
            Record::new()
                .with("name", "B")
                .with("source", "copy")
                .with("copy_source", "A")
                .with("tag", "Nope"),
        );
        assert_eq!(r.to_json(), json!({"success": false, "error": "Tag 'Nope' does not exist"}));
        let scene = host.scene.lock();
        assert_eq!(scene.len(), 1);
        assert!(scene.find_name("B").is_empty());
    }

    #[test]
    fn non_string_primitive_type_is_rejected() {
        let host = Arc::new(EditorHost::new());
        let r = run(&host, primitive("X").with("primitive_type", 5));
        assert!(r.is_error());
        assert_eq!(
            r.text(),
            "Invalid primitive type: '5'. Valid types: Cube, Sphere, Cylinder, Capsule, Plane, Quad"
        );
        assert!(host.scene.lock().is_empty());

        let r = run(&host, primitive("Y").with("primitive_type", Value::Null));
        assert_eq!(r.data.unwrap()["source"], json!("primitive:Cube"));
    }

    #[test]
    fn copy_needs_an_existing_source() {
        let host = Arc::new(EditorHost::new());
        let r = run(&host, Record::new().with("name", "B").with("source", "copy").with("copy_source", "A"));
        assert_eq!(r.text(), "Source GameObject 'A' not found in scene");
        run(&host, Record::new().with("name", "A").with("source", "empty"));
        let r = run(&host, Record::new().with("name", "B").with("source", "copy").with("copy_source", "A"));
        assert!(r.success, "{r}");
        assert_eq!(host.scene.lock().len(), 2);
    }

    #[test]
    fn unknown_source_lists_sources() {
        let host = Arc::new(EditorHost::new());
        let r = run(&host, Record::new().with("name", "A").with("source", "script"));
        assert_eq!(
            r.text(),
            "Unknown source: 'script'. Supported values: [menu, primitive, prefab, empty, copy]"
        );
    }
}
