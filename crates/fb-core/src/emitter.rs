//! Emitter: ComponentTree → outline notation.
//!
//! Canonical output: two-space indentation, hints in `[width, align]`
//! order, empty containers as `{}`. Round-trips through `parse_outline`.

use crate::model::*;
use std::fmt::Write;

/// Emit a tree in outline notation.
#[must_use]
pub fn emit_outline(tree: &ComponentTree) -> String {
    let mut out = String::with_capacity(64 * tree.len().max(1));
    for node in &tree.roots {
        emit_node(&mut out, node, 0);
    }
    out
}

/// Emit a single subtree (useful in log lines and assertion messages).
#[must_use]
pub fn emit_node_outline(node: &ComponentNode) -> String {
    let mut out = String::new();
    emit_node(&mut out, node, 0);
    out
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn emit_node(out: &mut String, node: &ComponentNode, depth: usize) {
    indent(out, depth);

    match &node.kind {
        ComponentKind::Leaf(FieldType::Custom(name)) => {
            let _ = write!(out, "custom \"{}\" @{}", escape(name), node.id.as_str());
        }
        ComponentKind::Leaf(field) => {
            let _ = write!(out, "{} @{}", field.keyword(), node.id.as_str());
        }
        ComponentKind::Container(kind) => {
            let _ = write!(out, "{} @{}", kind.keyword(), node.id.as_str());
        }
    }

    emit_hints(out, &node.layout_hints);

    if !node.is_container() {
        out.push('\n');
        return;
    }

    if node.children.is_empty() {
        out.push_str(" {}\n");
        return;
    }

    out.push_str(" {\n");
    for child in &node.children {
        emit_node(out, child, depth + 1);
    }
    indent(out, depth);
    out.push_str("}\n");
}

/// Quote-safe form of a custom field name.
fn escape(name: &str) -> String {
    name.replace('\\', "\\\\").replace('"', "\\\"")
}

fn emit_hints(out: &mut String, hints: &LayoutHints) {
    if hints.is_empty() {
        return;
    }
    let mut parts = Vec::with_capacity(2);
    if let Some(width) = hints.width {
        parts.push(format!("width: {width}"));
    }
    if let Some(align) = hints.alignment {
        parts.push(format!("align: {}", align.keyword()));
    }
    let _ = write!(out, " [{}]", parts.join(", "));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_outline;
    use pretty_assertions::assert_eq;

    #[test]
    fn emit_is_canonical() {
        let input = "row   @r{\n input @a [align: end,w:0.5]\n}\ncolumn @c\n";
        let tree = parse_outline(input).unwrap();
        assert_eq!(
            emit_outline(&tree),
            "row @r {\n  input @a [width: 0.5, align: end]\n}\ncolumn @c {}\n"
        );
    }

    #[test]
    fn emit_parse_emit_is_stable() {
        let input = r#"
column @form {
  row @names {
    input @first
    input @last
  }
  custom "rating" @stars [align: center]
  divider @sep
}
"#;
        let once = emit_outline(&parse_outline(input).unwrap());
        let twice = emit_outline(&parse_outline(&once).unwrap());
        assert_eq!(once, twice);
    }

    #[test]
    fn custom_names_with_quotes_survive() {
        let tree = ComponentTree::from_roots(vec![ComponentNode::leaf(
            "sig",
            FieldType::Custom(r#"say "hi" \ bye"#.into()),
        )]);
        let text = emit_outline(&tree);
        assert_eq!(text, "custom \"say \\\"hi\\\" \\\\ bye\" @sig\n");
        assert_eq!(parse_outline(&text).unwrap(), tree);
    }

    #[test]
    fn emit_single_node() {
        let node = ComponentNode::leaf("zip", FieldType::Number);
        assert_eq!(emit_node_outline(&node), "number @zip\n");
    }
}
