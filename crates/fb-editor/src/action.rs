//! Resolved drop actions.

use fb_core::id::ComponentId;
use fb_core::mutate::{RowSlot, Side};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a drop is refused before it reaches the mutator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RejectReason {
    SelfDrop,
    CapacityExceeded,
    InvalidNesting,
}

impl RejectReason {
    pub fn as_str(self) -> &'static str {
        match self {
            RejectReason::SelfDrop => "self-drop",
            RejectReason::CapacityExceeded => "capacity-exceeded",
            RejectReason::InvalidNesting => "invalid-nesting",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a drop would do. Carries ids only; the payload travels separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Action {
    #[serde(rename_all = "camelCase")]
    InsertBefore { target_id: ComponentId },
    #[serde(rename_all = "camelCase")]
    InsertAfter { target_id: ComponentId },
    #[serde(rename_all = "camelCase")]
    InsertInto { container_id: ComponentId },
    #[serde(rename_all = "camelCase")]
    FormRow { target_id: ComponentId, side: Side },
    #[serde(rename_all = "camelCase")]
    AppendToRow { row_id: ComponentId, slot: RowSlot },
    #[serde(rename_all = "camelCase")]
    MoveWithinContainer {
        container_id: ComponentId,
        from_index: usize,
        to_index: usize,
    },
    Reject { reason: RejectReason },
}

impl Action {
    pub fn is_reject(&self) -> bool {
        matches!(self, Action::Reject { .. })
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::InsertBefore { target_id } => write!(f, "insert before {target_id}"),
            Action::InsertAfter { target_id } => write!(f, "insert after {target_id}"),
            Action::InsertInto { container_id } => write!(f, "insert into {container_id}"),
            Action::FormRow { target_id, side } => write!(f, "form row with {target_id} ({side:?})"),
            Action::AppendToRow { row_id, slot } => write!(f, "append to row {row_id} ({slot:?})"),
            Action::MoveWithinContainer {
                container_id,
                from_index,
                to_index,
            } => write!(f, "move within {container_id} {from_index} -> {to_index}"),
            Action::Reject { reason } => write!(f, "reject ({reason})"),
        }
    }
}
