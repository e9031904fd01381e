//! Tree mutator: pure transforms over `ComponentTree`.
//!
//! Every operation borrows the current tree and returns a new one; on
//! failure the caller still holds the untouched original. All inserts go
//! through one admission path (`place`) that enforces id uniqueness, the
//! row-in-row rule, leaf parents, and row capacity.
//!
//! A move is always `extract_node` followed by one insert on the resulting
//! tree; `move_node` does exactly that after rejecting drops into the moved
//! node's own subtree.

use crate::id::{ComponentId, IdGenerator};
use crate::model::{ComponentKind, ComponentNode, ComponentTree};
use crate::policy::{ContainerPolicy, MissingTargetPolicy, Refusal};
use crate::traverse::{self, Location};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Which side of the target the dragged node lands on when forming a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Side {
    Left,
    Right,
}

/// Where a new member goes inside an existing row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RowSlot {
    Start,
    End,
    Before(ComponentId),
    After(ComponentId),
}

impl RowSlot {
    fn anchor(self) -> Option<ComponentId> {
        match self {
            RowSlot::Before(id) | RowSlot::After(id) => Some(id),
            RowSlot::Start | RowSlot::End => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MutationError {
    /// The anchor of an insert is gone. Under `MissingTargetPolicy::AppendAtRoot`
    /// `fallback` holds the tree with the node appended at the top level.
    #[error("target {id} not found")]
    TargetNotFound {
        id: ComponentId,
        fallback: Option<Box<ComponentTree>>,
    },
    /// The node to move or extract is not in the tree.
    #[error("component {id} not found")]
    NodeNotFound { id: ComponentId },
    #[error("{id} is not a container")]
    NotAContainer { id: ComponentId },
    #[error("{id} is not a row")]
    NotARow { id: ComponentId },
    #[error("row {row} already holds {max} children")]
    CapacityExceeded { row: ComponentId, max: usize },
    #[error("{child} cannot sit directly inside row {parent}")]
    InvalidNesting {
        parent: ComponentId,
        child: ComponentId,
    },
    #[error("{id} cannot be dropped into its own subtree")]
    SelfDrop { id: ComponentId },
    #[error("id {id} is already used in the tree")]
    DuplicateId { id: ComponentId },
    #[error("index {index} out of range for {container} with {len} children")]
    IndexOutOfRange {
        container: ComponentId,
        index: usize,
        len: usize,
    },
}

pub type MutationResult = Result<ComponentTree, MutationError>;

/// A destination for a detached node. Mirrors the insert operations so that
/// `move_node` can run any of them after extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Before(ComponentId),
    After(ComponentId),
    Into(ComponentId),
    FormRow(ComponentId, Side),
    Row(ComponentId, RowSlot),
    At(ComponentId, usize),
}

impl Placement {
    /// Every id the placement depends on.
    fn anchors(self) -> impl Iterator<Item = ComponentId> {
        let (primary, secondary) = match self {
            Placement::Before(id)
            | Placement::After(id)
            | Placement::Into(id)
            | Placement::FormRow(id, _)
            | Placement::At(id, _) => (id, None),
            Placement::Row(id, slot) => (id, slot.anchor()),
        };
        std::iter::once(primary).chain(secondary)
    }
}

// ─── Inserts ─────────────────────────────────────────────────────────────

/// Insert `node` immediately before `target_id`, in whatever container holds it.
pub fn insert_before(
    tree: &ComponentTree,
    target_id: ComponentId,
    node: ComponentNode,
    policy: &ContainerPolicy,
) -> MutationResult {
    insert_beside(tree, target_id, node, policy, 0)
}

/// Insert `node` immediately after `target_id`, in whatever container holds it.
pub fn insert_after(
    tree: &ComponentTree,
    target_id: ComponentId,
    node: ComponentNode,
    policy: &ContainerPolicy,
) -> MutationResult {
    insert_beside(tree, target_id, node, policy, 1)
}

fn insert_beside(
    tree: &ComponentTree,
    target_id: ComponentId,
    node: ComponentNode,
    policy: &ContainerPolicy,
    offset: usize,
) -> MutationResult {
    ensure_fresh(tree, &node)?;
    let Some(loc) = traverse::locate(&tree.roots, target_id) else {
        return Err(missing_target(tree, target_id, node, policy));
    };
    let mut roots = tree.roots.clone();
    place(&mut roots, loc.container, loc.index + offset, node, policy)?;
    Ok(ComponentTree::from_roots(roots))
}

/// Append `node` as the last child of `container_id` (`root` = top level).
pub fn insert_into(
    tree: &ComponentTree,
    container_id: ComponentId,
    node: ComponentNode,
    policy: &ContainerPolicy,
) -> MutationResult {
    ensure_fresh(tree, &node)?;
    if !container_id.is_root() && !tree.contains(container_id) {
        return Err(missing_target(tree, container_id, node, policy));
    }
    let mut roots = tree.roots.clone();
    place(&mut roots, container_id, usize::MAX, node, policy)?;
    Ok(ComponentTree::from_roots(roots))
}

/// Insert `node` at an exact child index of `container_id`. The inverse of
/// `extract_node`: re-inserting at the extracted location restores the tree.
pub fn insert_at(
    tree: &ComponentTree,
    container_id: ComponentId,
    index: usize,
    node: ComponentNode,
    policy: &ContainerPolicy,
) -> MutationResult {
    ensure_fresh(tree, &node)?;
    let Some(len) = tree.children_of(container_id).map(<[_]>::len) else {
        return Err(if tree.contains(container_id) {
            MutationError::NotAContainer { id: container_id }
        } else {
            missing_target(tree, container_id, node, policy)
        });
    };
    if index > len {
        return Err(MutationError::IndexOutOfRange {
            container: container_id,
            index,
            len,
        });
    }
    let mut roots = tree.roots.clone();
    place(&mut roots, container_id, index, node, policy)?;
    Ok(ComponentTree::from_roots(roots))
}

/// Replace `target_id` with a fresh row holding `[node, target]` (`Left`) or
/// `[target, node]` (`Right`).
pub fn form_row(
    tree: &ComponentTree,
    target_id: ComponentId,
    node: ComponentNode,
    side: Side,
    policy: &ContainerPolicy,
    ids: &mut dyn IdGenerator,
) -> MutationResult {
    ensure_fresh(tree, &node)?;
    let Some(loc) = traverse::locate(&tree.roots, target_id) else {
        return Err(missing_target(tree, target_id, node, policy));
    };

    let row_id = fresh_id(tree, &node, ids, ComponentKind::ROW.id_prefix());

    if node.is_row() {
        return Err(MutationError::InvalidNesting {
            parent: row_id,
            child: node.id,
        });
    }
    if tree.get(target_id).is_some_and(ComponentNode::is_row) {
        return Err(MutationError::InvalidNesting {
            parent: row_id,
            child: target_id,
        });
    }
    if tree
        .container_kind(loc.container)
        .is_some_and(|k| ComponentKind::Container(k).is_row())
    {
        return Err(MutationError::InvalidNesting {
            parent: loc.container,
            child: row_id,
        });
    }
    if !policy.row_has_room(0, 2) {
        return Err(MutationError::CapacityExceeded {
            row: row_id,
            max: policy.max_row_children,
        });
    }

    let mut roots = tree.roots.clone();
    let siblings = traverse::children_mut(&mut roots, loc.container).ok_or(
        MutationError::TargetNotFound {
            id: target_id,
            fallback: None,
        },
    )?;
    let original = siblings.remove(loc.index);
    let children = match side {
        Side::Left => vec![node, original],
        Side::Right => vec![original, node],
    };
    siblings.insert(
        loc.index,
        ComponentNode::new(row_id, ComponentKind::ROW).with_children(children),
    );
    Ok(ComponentTree::from_roots(roots))
}

/// Add `node` to an existing row at `slot`. A full row is refused with
/// `CapacityExceeded`.
pub fn append_to_row(
    tree: &ComponentTree,
    row_id: ComponentId,
    node: ComponentNode,
    slot: RowSlot,
    policy: &ContainerPolicy,
) -> MutationResult {
    ensure_fresh(tree, &node)?;
    let Some(row) = tree.get(row_id) else {
        return Err(missing_target(tree, row_id, node, policy));
    };
    if !row.is_row() {
        return Err(MutationError::NotARow { id: row_id });
    }

    let index = match slot {
        RowSlot::Start => 0,
        RowSlot::End => row.children.len(),
        RowSlot::Before(anchor) | RowSlot::After(anchor) => {
            let pos = row
                .children
                .iter()
                .position(|c| c.id == anchor)
                .ok_or(MutationError::TargetNotFound {
                    id: anchor,
                    fallback: None,
                })?;
            if matches!(slot, RowSlot::After(_)) { pos + 1 } else { pos }
        }
    };

    let mut roots = tree.roots.clone();
    place(&mut roots, row_id, index, node, policy)?;
    Ok(ComponentTree::from_roots(roots))
}

// ─── Extraction & reordering ─────────────────────────────────────────────

/// Remove `node_id` (with its subtree) from wherever it lives.
/// Returns the unchanged tree and `None` if it is not present.
pub fn extract_node(tree: &ComponentTree, node_id: ComponentId) -> (ComponentTree, Option<ComponentNode>) {
    let mut roots = tree.roots.clone();
    match traverse::remove(&mut roots, node_id) {
        Some((_, node)) => (ComponentTree::from_roots(roots), Some(node)),
        None => (tree.clone(), None),
    }
}

/// Stable reorder of one container's children: the child at `from_index`
/// ends up at `to_index`, everything else keeps its relative order.
pub fn move_within_container(
    tree: &ComponentTree,
    container_id: ComponentId,
    from_index: usize,
    to_index: usize,
) -> MutationResult {
    let mut roots = tree.roots.clone();
    let Some(children) = traverse::children_mut(&mut roots, container_id) else {
        return Err(if tree.contains(container_id) {
            MutationError::NotAContainer { id: container_id }
        } else {
            MutationError::TargetNotFound {
                id: container_id,
                fallback: None,
            }
        });
    };

    let len = children.len();
    for index in [from_index, to_index] {
        if index >= len {
            return Err(MutationError::IndexOutOfRange {
                container: container_id,
                index,
                len,
            });
        }
    }

    let moved = children.remove(from_index);
    children.insert(to_index, moved);
    Ok(ComponentTree::from_roots(roots))
}

// ─── Placement & moves ───────────────────────────────────────────────────

/// Run the insert operation named by `placement` for a detached node.
pub fn place_node(
    tree: &ComponentTree,
    node: ComponentNode,
    placement: Placement,
    policy: &ContainerPolicy,
    ids: &mut dyn IdGenerator,
) -> MutationResult {
    match placement {
        Placement::Before(target) => insert_before(tree, target, node, policy),
        Placement::After(target) => insert_after(tree, target, node, policy),
        Placement::Into(container) => insert_into(tree, container, node, policy),
        Placement::FormRow(target, side) => form_row(tree, target, node, side, policy, ids),
        Placement::Row(row, slot) => append_to_row(tree, row, node, slot, policy),
        Placement::At(container, index) => insert_at(tree, container, index, node, policy),
    }
}

/// Move an existing node: reject drops into its own subtree, extract it,
/// then place it on the remaining tree.
pub fn move_node(
    tree: &ComponentTree,
    node_id: ComponentId,
    placement: Placement,
    policy: &ContainerPolicy,
    ids: &mut dyn IdGenerator,
) -> MutationResult {
    let Some(moving) = tree.get(node_id) else {
        return Err(MutationError::NodeNotFound { id: node_id });
    };
    if placement.anchors().any(|anchor| moving.contains(anchor)) {
        return Err(MutationError::SelfDrop { id: node_id });
    }

    let (rest, node) = extract_node(tree, node_id);
    let node = node.ok_or(MutationError::NodeNotFound { id: node_id })?;
    place_node(&rest, node, placement, policy, ids)
}

// ─── Shared admission path ───────────────────────────────────────────────

/// Insert `node` into `container` at `index` (clamped to the end), enforcing
/// nesting and capacity for that container.
fn place(
    roots: &mut Vec<ComponentNode>,
    container: ComponentId,
    index: usize,
    node: ComponentNode,
    policy: &ContainerPolicy,
) -> Result<(), MutationError> {
    let (parent_kind, siblings) = if container.is_root() {
        (None, roots)
    } else {
        let parent = traverse::find_mut(roots, container).ok_or(MutationError::TargetNotFound {
            id: container,
            fallback: None,
        })?;
        (Some(parent.kind.clone()), &mut parent.children)
    };

    policy
        .admit(parent_kind.as_ref(), siblings.len(), &node.kind)
        .map_err(|refusal| match refusal {
            Refusal::LeafParent => MutationError::NotAContainer { id: container },
            Refusal::RowInRow => MutationError::InvalidNesting {
                parent: container,
                child: node.id,
            },
            Refusal::RowFull => MutationError::CapacityExceeded {
                row: container,
                max: policy.max_row_children,
            },
        })?;

    let index = index.min(siblings.len());
    siblings.insert(index, node);
    Ok(())
}

/// Refuse a node whose subtree reuses an id already in the tree (or twice
/// within itself), or carries the reserved `root` id.
fn ensure_fresh(tree: &ComponentTree, node: &ComponentNode) -> Result<(), MutationError> {
    let existing: HashSet<ComponentId> = tree.ids().into_iter().collect();
    let mut incoming = HashSet::new();
    for id in node.subtree_ids() {
        if id.is_root() || existing.contains(&id) || !incoming.insert(id) {
            return Err(MutationError::DuplicateId { id });
        }
    }
    Ok(())
}

/// Draw ids until one is unused by both the tree and the incoming node.
fn fresh_id(
    tree: &ComponentTree,
    incoming: &ComponentNode,
    ids: &mut dyn IdGenerator,
    prefix: &str,
) -> ComponentId {
    loop {
        let id = ids.next_id(prefix);
        if !id.is_root() && !tree.contains(id) && !incoming.contains(id) {
            return id;
        }
    }
}

/// Build the `TargetNotFound` error, attaching the append-at-root fallback
/// tree when the policy asks for it.
fn missing_target(
    tree: &ComponentTree,
    target: ComponentId,
    node: ComponentNode,
    policy: &ContainerPolicy,
) -> MutationError {
    let fallback = match policy.missing_target {
        MissingTargetPolicy::Reject => None,
        MissingTargetPolicy::AppendAtRoot => {
            log::warn!(
                "drop target {target} not found; appending {} at the top level",
                node.id
            );
            let mut roots = tree.roots.clone();
            roots.push(node);
            Some(Box::new(ComponentTree::from_roots(roots)))
        }
    };
    MutationError::TargetNotFound {
        id: target,
        fallback,
    }
}

/// Locate helper re-exported for callers that need a node's slot before
/// extracting it (e.g. to record a drag origin).
pub fn location_of(tree: &ComponentTree, id: ComponentId) -> Option<Location> {
    traverse::locate(&tree.roots, id)
}
