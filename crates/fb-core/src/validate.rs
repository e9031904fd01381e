//! Structural diagnostics for component trees.
//!
//! Reports trees that break the container rules without modifying them.
//! Trees built only through `mutate` never produce errors here; trees loaded
//! from JSON or hand-written outlines might.

use crate::id::ComponentId;
use crate::model::{ComponentNode, ComponentTree};
use crate::parser::is_outline_identifier;
use crate::policy::ContainerPolicy;
use crate::traverse;
use std::collections::HashSet;

// ─── Diagnostic types ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSeverity {
    /// The tree violates a structural rule; mutations may misbehave.
    Error,
    /// Legal but probably unintended.
    Warning,
}

/// A single finding for one component.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeIssue {
    pub node_id: ComponentId,
    pub message: String,
    pub severity: IssueSeverity,
    /// Short rule identifier (e.g. "duplicate-id", "row-in-row").
    pub rule: &'static str,
}

// ─── Public API ───────────────────────────────────────────────────────────

/// Run every rule over `tree`, in document order.
#[must_use]
pub fn validate_tree(tree: &ComponentTree, policy: &ContainerPolicy) -> Vec<TreeIssue> {
    let mut issues = Vec::new();
    let mut seen = HashSet::new();

    traverse::walk(&tree.roots, &mut |node, parent, _depth| {
        check_id(node, &mut seen, &mut issues);
        check_leaf(node, &mut issues);
        check_nesting(node, parent, policy, &mut issues);
        check_row(node, policy, &mut issues);
        check_hints(node, &mut issues);
    });
    issues
}

/// True if `validate_tree` reports no errors (warnings allowed).
pub fn is_well_formed(tree: &ComponentTree, policy: &ContainerPolicy) -> bool {
    validate_tree(tree, policy)
        .iter()
        .all(|issue| issue.severity != IssueSeverity::Error)
}

// ─── Rules ────────────────────────────────────────────────────────────────

fn check_id(node: &ComponentNode, seen: &mut HashSet<ComponentId>, issues: &mut Vec<TreeIssue>) {
    if node.id.is_root() {
        issues.push(TreeIssue {
            node_id: node.id,
            message: "`@root` is reserved for the top level".into(),
            severity: IssueSeverity::Error,
            rule: "reserved-id",
        });
    }
    if !is_outline_identifier(node.id.as_str()) {
        issues.push(TreeIssue {
            node_id: node.id,
            message: format!(
                "id {:?} cannot be written in outline notation (letters, digits, `_`, `-`)",
                node.id.as_str()
            ),
            severity: IssueSeverity::Warning,
            rule: "outline-id",
        });
    }
    if !seen.insert(node.id) {
        issues.push(TreeIssue {
            node_id: node.id,
            message: format!("{} appears more than once", node.id),
            severity: IssueSeverity::Error,
            rule: "duplicate-id",
        });
    }
}

fn check_leaf(node: &ComponentNode, issues: &mut Vec<TreeIssue>) {
    if node.kind.is_leaf() && !node.children.is_empty() {
        issues.push(TreeIssue {
            node_id: node.id,
            message: format!("leaf {} has {} children", node.id, node.children.len()),
            severity: IssueSeverity::Error,
            rule: "leaf-children",
        });
    }
}

fn check_nesting(
    node: &ComponentNode,
    parent: Option<&ComponentNode>,
    policy: &ContainerPolicy,
    issues: &mut Vec<TreeIssue>,
) {
    let Some(parent) = parent else { return };
    if parent.is_container() && !policy.may_nest(Some(&parent.kind), &node.kind) {
        issues.push(TreeIssue {
            node_id: node.id,
            message: format!("row {} sits directly inside row {}", node.id, parent.id),
            severity: IssueSeverity::Error,
            rule: "row-in-row",
        });
    }
}

fn check_row(node: &ComponentNode, policy: &ContainerPolicy, issues: &mut Vec<TreeIssue>) {
    if !node.is_row() {
        return;
    }
    let len = node.children.len();
    if len > policy.max_row_children {
        issues.push(TreeIssue {
            node_id: node.id,
            message: format!(
                "row {} holds {len} children (limit {})",
                node.id, policy.max_row_children
            ),
            severity: IssueSeverity::Error,
            rule: "row-capacity",
        });
    } else if len == 0 {
        issues.push(TreeIssue {
            node_id: node.id,
            message: format!("row {} is empty", node.id),
            severity: IssueSeverity::Warning,
            rule: "empty-row",
        });
    }
}

fn check_hints(node: &ComponentNode, issues: &mut Vec<TreeIssue>) {
    let Some(width) = node.layout_hints.width else { return };
    if !(0.0..=1.0).contains(&width) {
        issues.push(TreeIssue {
            node_id: node.id,
            message: format!("width {width} of {} is outside 0.0..=1.0", node.id),
            severity: IssueSeverity::Warning,
            rule: "width-range",
        });
    }
}
