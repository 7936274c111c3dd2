use bridge_methods::prelude::*;
use serde_json::json;
use std::sync::Arc;
use std::thread;

const THREADS: usize = 8;
const ITERATIONS: usize = 100;

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn test_registry_is_send_sync() {
    assert_send_sync::<MethodRegistry>();
    assert_send_sync::<EditorHost>();
    assert_send_sync::<StateMethod>();
}

#[test]
fn test_concurrent_failures_report_their_own_values() {
    let host = Arc::new(EditorHost::new());
    let registry = MethodRegistry::with_builtins(&host, &ToolsConfig::default());

    thread::scope(|s| {
        for t in 0..THREADS {
            let registry = &registry;
            s.spawn(move || {
                for i in 0..ITERATIONS {
                    let action = format!("bogus_{t}_{i}");
                    let r = registry.execute_value("console_read", json!({"action": &action}));
                    assert_eq!(
                        r.text(),
                        format!("Unknown action: '{action}'. Supported values: [get, get_full, clear]")
                    );

                    let w = registry.execute_value(
                        "console_write",
                        json!({"action": "log", "message": format!("{t}:{i}")}),
                    );
                    assert!(w.success, "{w}");
                }
            });
        }
    });

    assert_eq!(host.console.len(), THREADS * ITERATIONS);
}

#[test]
fn test_concurrent_scene_edits_stay_consistent() {
    let host = Arc::new(EditorHost::new());
    let registry = MethodRegistry::with_builtins(&host, &ToolsConfig::default());

    thread::scope(|s| {
        for t in 0..THREADS {
            let registry = &registry;
            s.spawn(move || {
                for i in 0..ITERATIONS {
                    let name = format!("obj_{t}_{i}");
                    let created = registry.execute_value(
                        "hierarchy_create",
                        json!({"name": &name, "source": "empty"}),
                    );
                    assert!(created.success, "{created}");
                    let edited = registry.execute_value(
                        "gameobject_edit",
                        json!({"name": &name, "action": "set_active", "active": false}),
                    );
                    assert_eq!(edited.text(), "Deactivated 1 GameObject(s).");
                }
            });
        }
    });

    let scene = host.scene.lock();
    assert_eq!(scene.len(), THREADS * ITERATIONS);
    assert!(scene.children(None).iter().all(|id| !scene.get(*id).unwrap().active));
}
