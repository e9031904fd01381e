//! Constraint resolver: (zone, payload, target) → `Action`.
//!
//! Ordered rules:
//!
//! 1. Dropping a component onto itself or its own subtree is rejected.
//! 2. `Top`/`Bottom` insert before/after the target.
//! 3. `Left`/`Right`: a row payload goes below the target; a row target
//!    takes the payload at its start/end; a target inside a row gets the
//!    payload next to it; anything else forms a new row with the target.
//! 4. `Center` drops into containers and after leaves.
//! 5. Any placement into a row that is already full is rejected.
//!
//! Rows never nest rows: a row payload aimed beside a row member is lifted
//! to the enclosing row, and a row payload aimed into a row is rejected.

use crate::action::{Action, RejectReason};
use crate::payload::DragPayload;
use crate::zone::Zone;
use fb_core::id::ComponentId;
use fb_core::model::{ComponentKind, ComponentNode, ComponentTree};
use fb_core::mutate::{RowSlot, Side};
use fb_core::policy::ContainerPolicy;
use fb_core::traverse::{self, ParentChain};

/// Parent chain of a drop target (top level first), plus the tree it was
/// taken from for payload lookups.
#[derive(Debug, Clone)]
pub struct Ancestry<'a> {
    pub parent_chain: ParentChain<'a>,
    tree: &'a ComponentTree,
}

impl<'a> Ancestry<'a> {
    /// `None` if `target_id` is not in `tree`.
    pub fn of(tree: &'a ComponentTree, target_id: ComponentId) -> Option<Self> {
        traverse::ancestors(&tree.roots, target_id).map(|parent_chain| Self { parent_chain, tree })
    }

    /// Immediate parent; `None` at the top level.
    pub fn parent(&self) -> Option<&'a ComponentNode> {
        self.parent_chain.last().copied()
    }

    fn contains(&self, id: ComponentId) -> bool {
        self.parent_chain.iter().any(|n| n.id == id)
    }

    fn parent_row(&self) -> Option<&'a ComponentNode> {
        self.parent().filter(|p| p.is_row())
    }
}

/// Resolve a drop of `payload` onto `target` in `zone`.
pub fn resolve(
    zone: Zone,
    payload: &DragPayload,
    target: &ComponentNode,
    ancestry: &Ancestry<'_>,
    policy: &ContainerPolicy,
) -> Action {
    // 1. Self-drop
    if let Some(own) = payload.id()
        && (own == target.id || ancestry.contains(own))
    {
        return reject(RejectReason::SelfDrop);
    }

    let payload_is_row = match payload {
        DragPayload::NewItem { kind } => kind.is_row(),
        DragPayload::ExistingItem { .. } => payload.is_row(ancestry.tree),
    };

    match zone {
        // 2. Vertical placement
        Zone::Top => beside(target, Edge::Before, payload, payload_is_row, ancestry, policy),
        Zone::Bottom => beside(target, Edge::After, payload, payload_is_row, ancestry, policy),

        // 3. Horizontal placement
        Zone::Left | Zone::Right => {
            let side = if zone == Zone::Left { Side::Left } else { Side::Right };

            // Row payloads before row targets: a row only ever moves vertically
            if payload_is_row {
                return beside(target, Edge::After, payload, true, ancestry, policy);
            }

            // Onto a row: join it at the near end
            if target.is_row() {
                let slot = match side {
                    Side::Left => RowSlot::Start,
                    Side::Right => RowSlot::End,
                };
                return join_row(target, slot, payload, policy);
            }

            // Next to a row member: join that row beside the target
            if let Some(row) = ancestry.parent_row() {
                let slot = match side {
                    Side::Left => RowSlot::Before(target.id),
                    Side::Right => RowSlot::After(target.id),
                };
                return join_row(row, slot, payload, policy);
            }

            // Wrap the target and the payload in a new row
            if !policy.row_has_room(0, 2) {
                return reject(RejectReason::CapacityExceeded);
            }
            Action::FormRow {
                target_id: target.id,
                side,
            }
        }

        // 4. Center
        Zone::Center => match target.kind {
            ComponentKind::Container(_) if target.is_row() => {
                if payload_is_row {
                    reject(RejectReason::InvalidNesting)
                } else if !has_room(target, payload, 1, policy) {
                    reject(RejectReason::CapacityExceeded)
                } else {
                    Action::InsertInto {
                        container_id: target.id,
                    }
                }
            }
            ComponentKind::Container(_) => Action::InsertInto {
                container_id: target.id,
            },
            ComponentKind::Leaf(_) => beside(target, Edge::After, payload, payload_is_row, ancestry, policy),
        },
    }
}

#[derive(Clone, Copy)]
enum Edge {
    Before,
    After,
}

/// Insert before/after `target`, lifting row payloads out of rows and
/// checking the capacity of the destination row.
fn beside(
    target: &ComponentNode,
    edge: Edge,
    payload: &DragPayload,
    payload_is_row: bool,
    ancestry: &Ancestry<'_>,
    policy: &ContainerPolicy,
) -> Action {
    let anchor = match ancestry.parent_row() {
        // Row payload next to a row member: go beside the enclosing row
        Some(row) if payload_is_row => row.id,
        Some(row) if !has_room(row, payload, 1, policy) => {
            return reject(RejectReason::CapacityExceeded);
        }
        _ => target.id,
    };
    match edge {
        Edge::Before => Action::InsertBefore { target_id: anchor },
        Edge::After => Action::InsertAfter { target_id: anchor },
    }
}

fn join_row(row: &ComponentNode, slot: RowSlot, payload: &DragPayload, policy: &ContainerPolicy) -> Action {
    if !has_room(row, payload, 1, policy) {
        return reject(RejectReason::CapacityExceeded);
    }
    Action::AppendToRow {
        row_id: row.id,
        slot,
    }
}

/// Room for `incoming` more members in `row`. A payload already in the row
/// leaves before it is re-added, so it does not count.
fn has_room(row: &ComponentNode, payload: &DragPayload, incoming: usize, policy: &ContainerPolicy) -> bool {
    let already_member = payload
        .id()
        .is_some_and(|id| row.children.iter().any(|c| c.id == id));
    let len = row.children.len() - usize::from(already_member);
    policy.row_has_room(len, incoming)
}

fn reject(reason: RejectReason) -> Action {
    Action::Reject { reason }
}

/// Resolve against `target_id` in `tree`, covering the canvas background
/// (`root`, which accepts anything at the end of the top level) and vanished
/// targets (`None`).
pub fn resolve_in(
    tree: &ComponentTree,
    zone: Zone,
    payload: &DragPayload,
    target_id: ComponentId,
    policy: &ContainerPolicy,
) -> Option<Action> {
    if target_id.is_root() {
        return Some(Action::InsertInto {
            container_id: target_id,
        });
    }
    let target = tree.get(target_id)?;
    let ancestry = Ancestry::of(tree, target_id)?;
    let action = resolve(zone, payload, target, &ancestry, policy);
    log::trace!("resolve {target_id} {zone:?} -> {action}");
    Some(action)
}
