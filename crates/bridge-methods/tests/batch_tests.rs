use bridge_methods::prelude::*;
use serde_json::json;
use std::sync::Arc;

fn registry() -> (Arc<EditorHost>, MethodRegistry) {
    let host = Arc::new(EditorHost::new());
    let registry = MethodRegistry::with_builtins(&host, &ToolsConfig::default());
    (host, registry)
}

#[test]
fn test_batch_runs_calls_in_order() {
    let (host, registry) = registry();
    let calls = vec![
        BatchCall::new("manage_editor", json!({"action": "play"})),
        BatchCall::new("console_write", json!({"action": "log", "message": "entered play"})),
        BatchCall::new("manage_editor", json!({"action": "get_state"})),
    ];
    let r = registry.execute_batch(&calls);
    assert_eq!(r.text(), "Batch function calls completed");
    let data = r.data.unwrap();
    assert_eq!(data["total_calls"], json!(3));
    assert_eq!(data["failed_calls"], json!(0));
    assert_eq!(data["results"][2]["data"]["isPlaying"], json!(true));
    assert_eq!(host.console.len(), 1);
}

#[test]
fn test_batch_failures_do_not_stop_later_calls() {
    let (host, registry) = registry();
    let calls = vec![
        BatchCall::new("warp_drive", json!({})),
        BatchCall::new("manage_editor", json!({"action": "pause"})),
        BatchCall::new("hierarchy_create", json!({"name": "Cube", "source": "primitive"})),
    ];
    let r = registry.execute_batch(&calls);
    assert!(r.is_error());
    assert_eq!(r.text(), "Batch completed with 2 failure(s)");
    let data = r.data.unwrap();
    assert_eq!(data["successful_calls"], json!(1));
    assert!(data["results"][0]["error"]
        .as_str()
        .unwrap()
        .starts_with("Tool not found: 'warp_drive'"));
    assert_eq!(data["results"][1]["error"], json!("Cannot pause: editor is not in play mode"));
    assert_eq!(data["results"][2]["success"], json!(true));
    assert_eq!(host.scene.lock().len(), 1);
}

#[test]
fn test_batch_calls_deserialize_from_request_json() {
    let calls: Vec<BatchCall> = serde_json::from_value(json!([
        {"func": "console_read", "args": {"action": "clear"}},
        {"tool": "manage_editor", "args": {"action": "get_tags"}},
        {"func": "manage_editor"},
    ]))
    .unwrap();
    assert_eq!(calls[1].func, "manage_editor");
    assert!(calls[2].args.is_null());

    let (_, registry) = registry();
    let r = registry.execute_batch(&calls);
    let data = r.data.unwrap();
    assert_eq!(data["results"][0]["message"], json!("Console cleared successfully."));
    assert_eq!(data["results"][2]["error"], json!("Missing action. Supported values: [play, pause, stop, get_state, add_tag, remove_tag, get_tags, add_layer, remove_layer, get_layers]"));
}

#[test]
fn test_empty_batch_succeeds() {
    let (_, registry) = registry();
    let r = registry.execute_batch(&[]);
    assert!(r.success);
    assert_eq!(r.data.unwrap()["total_calls"], json!(0));
}
