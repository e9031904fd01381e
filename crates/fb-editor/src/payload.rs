//! What is being dragged.

use fb_core::id::{ComponentId, IdGenerator};
use fb_core::model::{ComponentKind, ComponentNode, ComponentTree};
use fb_core::traverse::{self, ContainerPath};
use serde::{Deserialize, Serialize};

/// Fixed when a drag crosses the threshold; lives for one gesture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DragPayload {
    /// A palette item, not yet in the tree. Gets an id at drop time.
    NewItem { kind: ComponentKind },
    /// A component already in the tree.
    #[serde(rename_all = "camelCase")]
    ExistingItem {
        id: ComponentId,
        /// Container ids from the top level down to the immediate parent.
        origin_container_path: ContainerPath,
        origin_index: usize,
    },
}

impl DragPayload {
    pub fn new_item(kind: ComponentKind) -> Self {
        DragPayload::NewItem { kind }
    }

    /// Capture an existing component's origin. `None` if `id` is not in `tree`.
    pub fn existing(tree: &ComponentTree, id: ComponentId) -> Option<Self> {
        let origin_container_path = traverse::container_path(&tree.roots, id)?;
        let origin_index = traverse::locate(&tree.roots, id)?.index;
        Some(DragPayload::ExistingItem {
            id,
            origin_container_path,
            origin_index,
        })
    }

    /// Id of the dragged component; `None` for palette items.
    pub fn id(&self) -> Option<ComponentId> {
        match self {
            DragPayload::NewItem { .. } => None,
            DragPayload::ExistingItem { id, .. } => Some(*id),
        }
    }

    /// Immediate parent at drag start (`root` for top-level components).
    pub fn origin_container(&self) -> Option<ComponentId> {
        match self {
            DragPayload::NewItem { .. } => None,
            DragPayload::ExistingItem {
                origin_container_path,
                ..
            } => Some(
                origin_container_path
                    .last()
                    .copied()
                    .unwrap_or_else(ComponentId::root),
            ),
        }
    }

    /// Kind of the dragged component, looked up in `tree` for existing items.
    pub fn kind<'a>(&'a self, tree: &'a ComponentTree) -> Option<&'a ComponentKind> {
        match self {
            DragPayload::NewItem { kind } => Some(kind),
            DragPayload::ExistingItem { id, .. } => tree.get(*id).map(|n| &n.kind),
        }
    }

    /// Is the payload a row? Unknown existing items are not.
    pub fn is_row(&self, tree: &ComponentTree) -> bool {
        self.kind(tree).is_some_and(ComponentKind::is_row)
    }

    /// Does the payload's subtree (in `tree`) contain `id`? Always false for
    /// palette items.
    pub fn covers(&self, tree: &ComponentTree, id: ComponentId) -> bool {
        match self {
            DragPayload::NewItem { .. } => false,
            DragPayload::ExistingItem { id: own, .. } => {
                *own == id || tree.get(*own).is_some_and(|n| n.contains(id))
            }
        }
    }

    /// Build the node a palette item drops as, with a fresh id.
    pub fn materialize(kind: &ComponentKind, tree: &ComponentTree, ids: &mut dyn IdGenerator) -> ComponentNode {
        let prefix = kind.id_prefix().to_string();
        loop {
            let id = ids.next_id(&prefix);
            if !id.is_root() && !tree.contains(id) {
                return ComponentNode::new(id, kind.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fb_core::id::SequentialIds;
    use fb_core::model::FieldType;
    use fb_core::parser::parse_outline;
    use pretty_assertions::assert_eq;

    fn id(s: &str) -> ComponentId {
        ComponentId::intern(s)
    }

    #[test]
    fn existing_captures_origin() {
        let tree = parse_outline("column @c {\n  row @r {\n    input @a\n    input @b\n  }\n}\n").unwrap();
        let payload = DragPayload::existing(&tree, id("b")).unwrap();
        match &payload {
            DragPayload::ExistingItem {
                origin_container_path,
                origin_index,
                ..
            } => {
                assert_eq!(origin_container_path.as_slice(), &[id("c"), id("r")]);
                assert_eq!(*origin_index, 1);
            }
            other => panic!("unexpected payload {other:?}"),
        }
        assert_eq!(payload.origin_container(), Some(id("r")));
        assert!(DragPayload::existing(&tree, id("nope")).is_none());
    }

    #[test]
    fn top_level_origin_is_root() {
        let tree = parse_outline("input @a\n").unwrap();
        let payload = DragPayload::existing(&tree, id("a")).unwrap();
        assert_eq!(payload.origin_container(), Some(ComponentId::root()));
    }

    #[test]
    fn covers_own_subtree() {
        let tree = parse_outline("column @c {\n  input @a\n}\ninput @b\n").unwrap();
        let payload = DragPayload::existing(&tree, id("c")).unwrap();
        assert!(payload.covers(&tree, id("c")));
        assert!(payload.covers(&tree, id("a")));
        assert!(!payload.covers(&tree, id("b")));
        assert!(!DragPayload::new_item(ComponentKind::ROW).covers(&tree, id("a")));
    }

    #[test]
    fn materialize_skips_taken_ids() {
        let tree = parse_outline("input @input_1\n").unwrap();
        let node = DragPayload::materialize(
            &ComponentKind::Leaf(FieldType::Input),
            &tree,
            &mut SequentialIds::new(),
        );
        assert_eq!(node.id, id("input_2"));
    }
}
