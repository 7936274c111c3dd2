//! Tree printer
//!
//! Renders a tree as box-drawn text:
//!
//! ```text
//! StateTree
//! └─ action:
//!    ├─ get
//!    │  ├─ count(option) → read_counted
//!    │  └─ * → read_all
//!    └─ clear → clear_console
//! ```
//!
//! Fallback chains produced by the builder are flattened back into sibling
//! rows: a presence arm prints as `field(option)` and the final default as
//! `*`. A nested decision on the same field as its incoming edge does not
//! repeat the field header.

use crate::node::Node;

const TITLE: &str = "StateTree";

struct Row<'a, C, R> {
    label: String,
    parent: Option<&'a str>,
    target: &'a Node<C, R>,
}

impl<'a, C, R> Row<'a, C, R> {
    fn new(label: String, parent: Option<&'a str>, target: &'a Node<C, R>) -> Self {
        Self { label, parent, target }
    }
}

/// Render the tree rooted at `root`
#[must_use]
pub fn render<C, R>(root: &Node<C, R>) -> String {
    let mut out = String::new();
    out.push_str(TITLE);
    out.push('\n');
    children(root, "", None, &mut out);
    out
}

fn children<C, R>(node: &Node<C, R>, indent: &str, parent: Option<&str>, out: &mut String) {
    let mut rows = Vec::new();
    let mut edges_indent = indent.to_string();
    match node {
        Node::Match(decision) => {
            if !parent.is_some_and(|p| p.eq_ignore_ascii_case(decision.field())) {
                line(out, indent, "└─", &format!("{}:", decision.field()));
                edges_indent.push_str("   ");
            }
            for edge in decision.edges() {
                rows.push(Row::new(edge.label().to_string(), Some(edge.label()), edge.node()));
            }
            if let Some(default) = decision.default() {
                flatten(default, &mut rows);
            }
        }
        other => flatten(other, &mut rows),
    }

    let count = rows.len();
    for (i, Row { label, parent: child_parent, target }) in rows.into_iter().enumerate() {
        let last = i + 1 == count;
        let connector = if last { "└─" } else { "├─" };
        if let Node::Leaf(handler) = target {
            line(out, &edges_indent, connector, &format!("{label} → {}", handler.name()));
        } else {
            line(out, &edges_indent, connector, &label);
            let next = format!("{edges_indent}{}", if last { "   " } else { "│  " });
            children(target, &next, child_parent, out);
        }
    }
}

fn flatten<'a, C, R>(node: &'a Node<C, R>, rows: &mut Vec<Row<'a, C, R>>) {
    match node {
        Node::Exists(decision) => {
            rows.push(Row::new(
                format!("{}(option)", decision.field()),
                Some(decision.field()),
                decision.present(),
            ));
            flatten(decision.absent(), rows);
        }
        Node::Unmatched(_) => {}
        Node::Leaf(_) | Node::Match(_) => rows.push(Row::new("*".to_string(), None, node)),
    }
}

fn line(out: &mut String, indent: &str, connector: &str, text: &str) {
    out.push_str(indent);
    out.push_str(connector);
    out.push(' ');
    out.push_str(text);
    out.push('\n');
}
