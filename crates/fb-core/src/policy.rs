//! Container policy: the nesting and capacity rules for rows and columns.
//!
//! Every rule the resolver and the mutator enforce about *where* a component
//! may live is answered here, so the limits have one source of truth.

use crate::model::{ComponentKind, ContainerKind};
use serde::{Deserialize, Serialize};

/// Default row capacity. Configurable via [`ContainerPolicy::max_row_children`].
pub const DEFAULT_MAX_ROW_CHILDREN: usize = 4;

/// A row never holds another row directly.
pub const ROW_MAY_NEST_ROW: bool = false;

/// A dragged row only ever lands above or below its new neighbour.
pub const ROW_MOVES_VERTICALLY_ONLY: bool = true;

/// What an insert does when its target id is gone by the time it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MissingTargetPolicy {
    /// Leave the tree unchanged and report `TargetNotFound`.
    #[default]
    Reject,
    /// Append the dragged node to the top level and report `TargetNotFound`.
    AppendAtRoot,
}

/// Why a child may not go into a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    /// Leaves never have children.
    LeafParent,
    /// Row directly inside a row.
    RowInRow,
    /// Row already holds `max_row_children`.
    RowFull,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContainerPolicy {
    /// Upper bound on a row's children.
    pub max_row_children: usize,
    pub missing_target: MissingTargetPolicy,
}

impl Default for ContainerPolicy {
    fn default() -> Self {
        Self {
            max_row_children: DEFAULT_MAX_ROW_CHILDREN,
            missing_target: MissingTargetPolicy::Reject,
        }
    }
}

impl ContainerPolicy {
    pub fn with_max_row_children(max_row_children: usize) -> Self {
        Self {
            max_row_children,
            ..Self::default()
        }
    }

    /// Can a row currently holding `len` members take `incoming` more?
    pub fn row_has_room(&self, len: usize, incoming: usize) -> bool {
        len + incoming <= self.max_row_children
    }

    /// Nesting rule only: may `child` sit directly inside `parent`?
    /// `None` for `parent` means the top level, which accepts anything.
    pub fn may_nest(&self, parent: Option<&ComponentKind>, child: &ComponentKind) -> bool {
        match parent {
            None => true,
            Some(ComponentKind::Leaf(_)) => false,
            Some(ComponentKind::Container(ContainerKind::Row)) => {
                ROW_MAY_NEST_ROW || !child.is_row()
            }
            Some(ComponentKind::Container(ContainerKind::Column)) => true,
        }
    }

    /// Full admission check for adding `child` to a container that already
    /// holds `current_len` children (nesting first, then capacity).
    pub fn admit(
        &self,
        parent: Option<&ComponentKind>,
        current_len: usize,
        child: &ComponentKind,
    ) -> Result<(), Refusal> {
        match parent {
            Some(ComponentKind::Leaf(_)) => Err(Refusal::LeafParent),
            _ if !self.may_nest(parent, child) => Err(Refusal::RowInRow),
            Some(kind) if kind.is_row() && !self.row_has_room(current_len, 1) => {
                Err(Refusal::RowFull)
            }
            _ => Ok(()),
        }
    }
}
