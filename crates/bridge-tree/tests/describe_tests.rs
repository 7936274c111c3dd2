use bridge_test_utils::{console_read_tree, primitive_tree, CallLog};
use bridge_tree::prelude::*;
use pretty_assertions::assert_eq;

fn handle_play(_: &Record) -> String {
    "played".to_string()
}

fn handle_stop(_: &Record) -> String {
    "stopped".to_string()
}

#[test]
fn test_describe_console_read_shape() {
    let tree = console_read_tree(&CallLog::new());
    let expected = "\
StateTree
└─ action:
   └─ get
      ├─ count(option)
      │  ├─ filterText(option) → hA
      │  └─ * → hB
      ├─ filterText(option) → hC
      └─ * → hD
";
    assert_eq!(tree.describe(), expected);
}

#[test]
fn test_describe_skips_repeated_key_header() {
    let tree = primitive_tree(&CallLog::new());
    let expected = "\
StateTree
└─ action:
   ├─ play → h1
   ├─ stop → h2
   └─ primitive
      ├─ primitive_type(option)
      │  └─ Cube → hc
      └─ * → hd
";
    assert_eq!(tree.describe(), expected);
}

#[test]
fn test_function_names_appear_in_describe() {
    let tree = TreeBuilder::<Record, String>::create()
        .key("action")
        .leaf("play", handle_play)
        .leaf("stop", handle_stop)
        .default_leaf(|_: &Record| String::new())
        .build()
        .unwrap();
    let expected = "\
StateTree
└─ action:
   ├─ play → handle_play
   ├─ stop → handle_stop
   └─ * → anonymous
";
    assert_eq!(tree.to_string(), expected);
}

#[test]
fn test_nested_key_under_edge_prints_header() {
    let tree = TreeBuilder::<Record, ()>::create()
        .key("action")
        .node("primitive", "primitive_type")
        .leaf("Sphere", |_: &Record| ())
        .build()
        .unwrap();
    let expected = "\
StateTree
└─ action:
   └─ primitive
      └─ primitive_type:
         └─ Sphere → anonymous
";
    assert_eq!(tree.describe(), expected);
}
