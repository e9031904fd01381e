//! Apply a resolved `Action` to a tree.
//!
//! The single entry point the session (or any other caller) uses to turn a
//! drop into a new tree. Never panics and never partially applies: the
//! result is either the fully edited tree or the original one.

use crate::action::{Action, RejectReason};
use crate::payload::DragPayload;
use fb_core::id::IdGenerator;
use fb_core::model::ComponentTree;
use fb_core::mutate::{self, MutationError, MutationResult, Placement};
use fb_core::policy::ContainerPolicy;
use serde::Serialize;
use std::fmt;

/// Flattened classification of an apply, suitable for UI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ApplyOutcome {
    Applied,
    TargetNotFound,
    CapacityExceeded,
    SelfDropRejected,
    InvalidNesting,
    DuplicateId,
    IndexOutOfRange,
}

impl ApplyOutcome {
    pub fn is_applied(self) -> bool {
        self == ApplyOutcome::Applied
    }
}

impl From<RejectReason> for ApplyOutcome {
    fn from(reason: RejectReason) -> Self {
        match reason {
            RejectReason::SelfDrop => ApplyOutcome::SelfDropRejected,
            RejectReason::CapacityExceeded => ApplyOutcome::CapacityExceeded,
            RejectReason::InvalidNesting => ApplyOutcome::InvalidNesting,
        }
    }
}

impl From<&MutationError> for ApplyOutcome {
    fn from(err: &MutationError) -> Self {
        match err {
            MutationError::TargetNotFound { .. } | MutationError::NodeNotFound { .. } => {
                ApplyOutcome::TargetNotFound
            }
            MutationError::NotAContainer { .. }
            | MutationError::NotARow { .. }
            | MutationError::InvalidNesting { .. } => ApplyOutcome::InvalidNesting,
            MutationError::CapacityExceeded { .. } => ApplyOutcome::CapacityExceeded,
            MutationError::SelfDrop { .. } => ApplyOutcome::SelfDropRejected,
            MutationError::DuplicateId { .. } => ApplyOutcome::DuplicateId,
            MutationError::IndexOutOfRange { .. } => ApplyOutcome::IndexOutOfRange,
        }
    }
}

impl fmt::Display for ApplyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ApplyOutcome::Applied => "applied",
            ApplyOutcome::TargetNotFound => "target not found",
            ApplyOutcome::CapacityExceeded => "capacity exceeded",
            ApplyOutcome::SelfDropRejected => "self-drop rejected",
            ApplyOutcome::InvalidNesting => "invalid nesting",
            ApplyOutcome::DuplicateId => "duplicate id",
            ApplyOutcome::IndexOutOfRange => "index out of range",
        };
        f.write_str(s)
    }
}

/// The tree after an apply plus what happened. On anything but `Applied`
/// the tree is the input (or, for `TargetNotFound` under the append-at-root
/// policy, the input with the payload appended at the top level).
#[derive(Debug, Clone, PartialEq)]
pub struct ApplyResult {
    pub tree: ComponentTree,
    pub outcome: ApplyOutcome,
}

impl ApplyResult {
    fn unchanged(tree: &ComponentTree, outcome: ApplyOutcome) -> Self {
        Self {
            tree: tree.clone(),
            outcome,
        }
    }
}

/// Apply `action` for `payload` to `tree`.
///
/// Palette payloads get a fresh id from `ids`; existing payloads are
/// extracted first and placed on the remaining tree.
pub fn apply(
    tree: &ComponentTree,
    action: &Action,
    payload: &DragPayload,
    policy: &ContainerPolicy,
    ids: &mut dyn IdGenerator,
) -> ApplyResult {
    let result = match *action {
        Action::Reject { reason } => {
            log::debug!("apply: {action} refused before mutation");
            return ApplyResult::unchanged(tree, reason.into());
        }
        Action::MoveWithinContainer {
            container_id,
            from_index,
            to_index,
        } => mutate::move_within_container(tree, container_id, from_index, to_index),
        Action::InsertBefore { target_id } => place(tree, Placement::Before(target_id), payload, policy, ids),
        Action::InsertAfter { target_id } => place(tree, Placement::After(target_id), payload, policy, ids),
        Action::InsertInto { container_id } => place(tree, Placement::Into(container_id), payload, policy, ids),
        Action::FormRow { target_id, side } => {
            place(tree, Placement::FormRow(target_id, side), payload, policy, ids)
        }
        Action::AppendToRow { row_id, slot } => place(tree, Placement::Row(row_id, slot), payload, policy, ids),
    };

    match result {
        Ok(new_tree) => {
            log::debug!("apply: {action} applied ({} nodes)", new_tree.len());
            ApplyResult {
                tree: new_tree,
                outcome: ApplyOutcome::Applied,
            }
        }
        Err(err) => {
            let outcome = ApplyOutcome::from(&err);
            log::debug!("apply: {action} failed: {err}");
            match err {
                MutationError::TargetNotFound {
                    fallback: Some(fallback),
                    ..
                } => ApplyResult {
                    tree: *fallback,
                    outcome,
                },
                _ => ApplyResult::unchanged(tree, outcome),
            }
        }
    }
}

/// Materialize a palette item, or move an existing one.
fn place(
    tree: &ComponentTree,
    placement: Placement,
    payload: &DragPayload,
    policy: &ContainerPolicy,
    ids: &mut dyn IdGenerator,
) -> MutationResult {
    match payload {
        DragPayload::NewItem { kind } => {
            let node = DragPayload::materialize(kind, tree, ids);
            mutate::place_node(tree, node, placement, policy, ids)
        }
        DragPayload::ExistingItem { id, .. } => mutate::move_node(tree, *id, placement, policy, ids),
    }
}
