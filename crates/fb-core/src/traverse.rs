//! Shared tree traversal: find, locate, remove, and walk by id.
//!
//! Every mutation in `mutate` goes through these helpers so that "not
//! found", search order, and ancestry have one meaning across operations.
//! Search is depth-first in document order; ids are unique, so the first
//! match is the only match.

use crate::id::ComponentId;
use crate::model::ComponentNode;
use smallvec::SmallVec;

/// Where a node sits: its container (`root` for the top level) and index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub container: ComponentId,
    pub index: usize,
}

/// Ancestors of a node, outermost first, excluding the node itself.
pub type ParentChain<'a> = SmallVec<[&'a ComponentNode; 8]>;

/// Container ids from the top level down to a node's parent.
pub type ContainerPath = SmallVec<[ComponentId; 8]>;

pub fn find(nodes: &[ComponentNode], id: ComponentId) -> Option<&ComponentNode> {
    nodes.iter().find_map(|n| n.find(id))
}

pub fn find_mut(nodes: &mut [ComponentNode], id: ComponentId) -> Option<&mut ComponentNode> {
    for node in nodes.iter_mut() {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_mut(&mut node.children, id) {
            return Some(found);
        }
    }
    None
}

pub fn locate(nodes: &[ComponentNode], id: ComponentId) -> Option<Location> {
    locate_in(nodes, ComponentId::root(), id)
}

fn locate_in(list: &[ComponentNode], container: ComponentId, id: ComponentId) -> Option<Location> {
    if let Some(index) = list.iter().position(|n| n.id == id) {
        return Some(Location { container, index });
    }
    list.iter()
        .find_map(|n| locate_in(&n.children, n.id, id))
}

/// Parent chain of `id`, or `None` if `id` is not in the tree.
pub fn ancestors(nodes: &[ComponentNode], id: ComponentId) -> Option<ParentChain<'_>> {
    let mut chain = ParentChain::new();
    ancestors_in(nodes, id, &mut chain).then_some(chain)
}

fn ancestors_in<'a>(list: &'a [ComponentNode], id: ComponentId, chain: &mut ParentChain<'a>) -> bool {
    for node in list {
        if node.id == id {
            return true;
        }
        chain.push(node);
        if ancestors_in(&node.children, id, chain) {
            return true;
        }
        chain.pop();
    }
    false
}

/// Ids of the containers enclosing `id`, outermost first.
pub fn container_path(nodes: &[ComponentNode], id: ComponentId) -> Option<ContainerPath> {
    ancestors(nodes, id).map(|chain| chain.iter().map(|n| n.id).collect())
}

/// True if `id` lies strictly inside the subtree rooted at `ancestor`.
pub fn is_descendant(nodes: &[ComponentNode], ancestor: ComponentId, id: ComponentId) -> bool {
    ancestor != id && find(nodes, ancestor).is_some_and(|a| a.contains(id))
}

/// Child list of a container; `root` yields the top-level list.
/// `None` for leaves and unknown ids.
pub fn children_mut(
    roots: &mut Vec<ComponentNode>,
    container: ComponentId,
) -> Option<&mut Vec<ComponentNode>> {
    if container.is_root() {
        return Some(roots);
    }
    find_mut(roots, container)
        .filter(|n| n.is_container())
        .map(|n| &mut n.children)
}

/// Detach `id` from wherever it lives. Returns its former location and the
/// node (with its whole subtree).
pub fn remove(roots: &mut Vec<ComponentNode>, id: ComponentId) -> Option<(Location, ComponentNode)> {
    remove_in(roots, ComponentId::root(), id)
}

fn remove_in(
    list: &mut Vec<ComponentNode>,
    container: ComponentId,
    id: ComponentId,
) -> Option<(Location, ComponentNode)> {
    if let Some(index) = list.iter().position(|n| n.id == id) {
        let node = list.remove(index);
        return Some((Location { container, index }, node));
    }
    for node in list.iter_mut() {
        let parent = node.id;
        if let Some(hit) = remove_in(&mut node.children, parent, id) {
            return Some(hit);
        }
    }
    None
}

/// Pre-order walk. The visitor receives each node, its parent (`None` at the
/// top level), and its depth (0 at the top level).
pub fn walk<'a, F>(nodes: &'a [ComponentNode], visit: &mut F)
where
    F: FnMut(&'a ComponentNode, Option<&'a ComponentNode>, usize),
{
    walk_in(nodes, None, 0, visit);
}

fn walk_in<'a, F>(
    list: &'a [ComponentNode],
    parent: Option<&'a ComponentNode>,
    depth: usize,
    visit: &mut F,
) where
    F: FnMut(&'a ComponentNode, Option<&'a ComponentNode>, usize),
{
    for node in list {
        visit(node, parent, depth);
        walk_in(&node.children, Some(node), depth + 1, visit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldType;

    fn id(s: &str) -> ComponentId {
        ComponentId::intern(s)
    }

    fn sample() -> Vec<ComponentNode> {
        vec![
            ComponentNode::leaf("title", FieldType::Label),
            ComponentNode::column(
                "details",
                vec![
                    ComponentNode::row(
                        "name_row",
                        vec![
                            ComponentNode::leaf("first", FieldType::Input),
                            ComponentNode::leaf("last", FieldType::Input),
                        ],
                    ),
                    ComponentNode::leaf("bio", FieldType::Textarea),
                ],
            ),
        ]
    }

    #[test]
    fn locate_reports_container_and_index() {
        let nodes = sample();
        assert_eq!(
            locate(&nodes, id("last")),
            Some(Location {
                container: id("name_row"),
                index: 1
            })
        );
        assert_eq!(
            locate(&nodes, id("details")),
            Some(Location {
                container: ComponentId::root(),
                index: 1
            })
        );
        assert_eq!(locate(&nodes, id("nope")), None);
    }

    #[test]
    fn ancestors_are_outermost_first() {
        let nodes = sample();
        let chain = ancestors(&nodes, id("first")).unwrap();
        let ids: Vec<&str> = chain.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["details", "name_row"]);

        // Top-level node has an empty chain; unknown id has none
        assert!(ancestors(&nodes, id("title")).unwrap().is_empty());
        assert!(ancestors(&nodes, id("nope")).is_none());
    }

    #[test]
    fn descendant_checks() {
        let nodes = sample();
        assert!(is_descendant(&nodes, id("details"), id("last")));
        assert!(!is_descendant(&nodes, id("details"), id("details")));
        assert!(!is_descendant(&nodes, id("name_row"), id("bio")));
    }

    #[test]
    fn remove_detaches_subtree() {
        let mut nodes = sample();
        let (loc, node) = remove(&mut nodes, id("name_row")).unwrap();
        assert_eq!(loc.container, id("details"));
        assert_eq!(loc.index, 0);
        assert_eq!(node.children.len(), 2);
        assert!(find(&nodes, id("first")).is_none());
        assert!(remove(&mut nodes, id("name_row")).is_none());
    }

    #[test]
    fn children_mut_rejects_leaves() {
        let mut nodes = sample();
        assert!(children_mut(&mut nodes, id("bio")).is_none());
        assert_eq!(children_mut(&mut nodes, id("details")).map(|c| c.len()), Some(2));
        assert_eq!(children_mut(&mut nodes, ComponentId::root()).map(|c| c.len()), Some(2));
    }

    #[test]
    fn walk_visits_in_document_order() {
        let nodes = sample();
        let mut seen = Vec::new();
        walk(&nodes, &mut |node, parent, depth| {
            seen.push((node.id.as_str(), parent.map(|p| p.id.as_str()), depth));
        });
        assert_eq!(
            seen,
            vec![
                ("title", None, 0),
                ("details", None, 0),
                ("name_row", Some("details"), 1),
                ("first", Some("name_row"), 2),
                ("last", Some("name_row"), 2),
                ("bio", Some("details"), 1),
            ]
        );
    }
}
