//! Core data model for form component trees.
//!
//! A form is an ordered forest of `ComponentNode` values. Leaves are form
//! fields (inputs, selects, buttons); containers lay their children out
//! horizontally (`Row`) or vertically (`Column`). The top-level list acts as
//! an implicit column addressed by the reserved id `root`.
//!
//! Trees are values: every edit in `mutate` takes `&ComponentTree` and hands
//! back a new tree, so a caller holding the previous tree can always keep it
//! (e.g. as an undo snapshot).

use crate::emitter::emit_outline;
use crate::id::ComponentId;
use crate::traverse;
use serde::{Deserialize, Serialize};
use std::fmt;

// ─── Kinds ───────────────────────────────────────────────────────────────

/// The form field a leaf renders as.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldType {
    Input,
    Textarea,
    Number,
    Select,
    Checkbox,
    Radio,
    Switch,
    Date,
    Upload,
    Button,
    Label,
    Divider,
    /// A field type registered by the embedding application.
    Custom(String),
}

impl FieldType {
    /// Built-in field types, in palette order.
    pub const BUILTIN: [FieldType; 12] = [
        FieldType::Input,
        FieldType::Textarea,
        FieldType::Number,
        FieldType::Select,
        FieldType::Checkbox,
        FieldType::Radio,
        FieldType::Switch,
        FieldType::Date,
        FieldType::Upload,
        FieldType::Button,
        FieldType::Label,
        FieldType::Divider,
    ];

    /// Outline keyword. Custom fields are written as `custom "<name>"`.
    pub fn keyword(&self) -> &str {
        match self {
            FieldType::Input => "input",
            FieldType::Textarea => "textarea",
            FieldType::Number => "number",
            FieldType::Select => "select",
            FieldType::Checkbox => "checkbox",
            FieldType::Radio => "radio",
            FieldType::Switch => "switch",
            FieldType::Date => "date",
            FieldType::Upload => "upload",
            FieldType::Button => "button",
            FieldType::Label => "label",
            FieldType::Divider => "divider",
            FieldType::Custom(_) => "custom",
        }
    }

    /// Look up a built-in field type by its outline keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::BUILTIN.into_iter().find(|f| f.keyword() == keyword)
    }
}

/// Layout direction of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContainerKind {
    /// Children side by side.
    Row,
    /// Children stacked top to bottom.
    Column,
}

impl ContainerKind {
    pub fn keyword(self) -> &'static str {
        match self {
            ContainerKind::Row => "row",
            ContainerKind::Column => "column",
        }
    }
}

/// What a component is. Matched exhaustively wherever behavior depends on it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComponentKind {
    Leaf(FieldType),
    Container(ContainerKind),
}

impl ComponentKind {
    pub const ROW: ComponentKind = ComponentKind::Container(ContainerKind::Row);
    pub const COLUMN: ComponentKind = ComponentKind::Container(ContainerKind::Column);

    pub fn is_row(&self) -> bool {
        matches!(self, ComponentKind::Container(ContainerKind::Row))
    }

    pub fn is_container(&self) -> bool {
        matches!(self, ComponentKind::Container(_))
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, ComponentKind::Leaf(_))
    }

    pub fn container(&self) -> Option<ContainerKind> {
        match self {
            ComponentKind::Container(kind) => Some(*kind),
            ComponentKind::Leaf(_) => None,
        }
    }

    /// Prefix for generated ids of this kind (`row_3`, `select_7`).
    pub fn id_prefix(&self) -> &str {
        match self {
            ComponentKind::Leaf(FieldType::Custom(_)) => "field",
            ComponentKind::Leaf(field) => field.keyword(),
            ComponentKind::Container(kind) => kind.keyword(),
        }
    }
}

// ─── Layout hints ────────────────────────────────────────────────────────

/// Cross-axis alignment of a component inside its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Alignment {
    Start,
    Center,
    End,
    Stretch,
}

impl Alignment {
    pub fn keyword(self) -> &'static str {
        match self {
            Alignment::Start => "start",
            Alignment::Center => "center",
            Alignment::End => "end",
            Alignment::Stretch => "stretch",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "start" => Some(Alignment::Start),
            "center" => Some(Alignment::Center),
            "end" => Some(Alignment::End),
            "stretch" => Some(Alignment::Stretch),
            _ => None,
        }
    }
}

/// Rendering hints carried along when a component moves. Opaque to the
/// drag-and-drop engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutHints {
    /// Share of the containing row, `0.0 ..= 1.0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
}

impl LayoutHints {
    pub fn is_empty(&self) -> bool {
        self.width.is_none() && self.alignment.is_none()
    }
}

// ─── Nodes ───────────────────────────────────────────────────────────────

/// A single component in the form tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentNode {
    pub id: ComponentId,
    pub kind: ComponentKind,
    /// Always empty for leaves.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ComponentNode>,
    #[serde(default, skip_serializing_if = "LayoutHints::is_empty")]
    pub layout_hints: LayoutHints,
}

impl ComponentNode {
    pub fn new(id: ComponentId, kind: ComponentKind) -> Self {
        Self {
            id,
            kind,
            children: Vec::new(),
            layout_hints: LayoutHints::default(),
        }
    }

    pub fn leaf(id: &str, field: FieldType) -> Self {
        Self::new(ComponentId::intern(id), ComponentKind::Leaf(field))
    }

    pub fn row(id: &str, children: Vec<ComponentNode>) -> Self {
        Self::new(ComponentId::intern(id), ComponentKind::ROW).with_children(children)
    }

    pub fn column(id: &str, children: Vec<ComponentNode>) -> Self {
        Self::new(ComponentId::intern(id), ComponentKind::COLUMN).with_children(children)
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<ComponentNode>) -> Self {
        self.children = children;
        self
    }

    #[must_use]
    pub fn with_hints(mut self, layout_hints: LayoutHints) -> Self {
        self.layout_hints = layout_hints;
        self
    }

    pub fn is_row(&self) -> bool {
        self.kind.is_row()
    }

    pub fn is_container(&self) -> bool {
        self.kind.is_container()
    }

    /// True if `id` is this node or anywhere below it.
    pub fn contains(&self, id: ComponentId) -> bool {
        self.id == id || self.children.iter().any(|c| c.contains(id))
    }

    /// Find `id` in this subtree (self included).
    pub fn find(&self, id: ComponentId) -> Option<&ComponentNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    /// Number of nodes in this subtree, self included.
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(ComponentNode::subtree_len)
            .sum::<usize>()
    }

    /// Pre-order list of ids in this subtree.
    pub fn subtree_ids(&self) -> Vec<ComponentId> {
        let mut out = Vec::with_capacity(self.subtree_len());
        collect_ids(self, &mut out);
        out
    }
}

fn collect_ids(node: &ComponentNode, out: &mut Vec<ComponentId>) {
    out.push(node.id);
    for child in &node.children {
        collect_ids(child, out);
    }
}

// ─── Tree ────────────────────────────────────────────────────────────────

/// The complete form: an ordered list of top-level components.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentTree {
    pub roots: Vec<ComponentNode>,
}

impl ComponentTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_roots(roots: Vec<ComponentNode>) -> Self {
        Self { roots }
    }

    /// Look up a node by id anywhere in the tree.
    pub fn get(&self, id: ComponentId) -> Option<&ComponentNode> {
        traverse::find(&self.roots, id)
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.get(id).is_some()
    }

    /// Total node count.
    pub fn len(&self) -> usize {
        self.roots.iter().map(ComponentNode::subtree_len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Pre-order list of every id in the tree.
    pub fn ids(&self) -> Vec<ComponentId> {
        let mut out = Vec::with_capacity(self.len());
        for root in &self.roots {
            collect_ids(root, &mut out);
        }
        out
    }

    /// Children of a container, with `root` naming the top-level list.
    /// `None` for leaves and unknown ids.
    pub fn children_of(&self, container_id: ComponentId) -> Option<&[ComponentNode]> {
        if container_id.is_root() {
            return Some(&self.roots);
        }
        self.get(container_id)
            .filter(|n| n.is_container())
            .map(|n| n.children.as_slice())
    }

    /// Kind of the container holding children for `container_id`. The
    /// top-level list lays out as a column.
    pub fn container_kind(&self, container_id: ComponentId) -> Option<ContainerKind> {
        if container_id.is_root() {
            return Some(ContainerKind::Column);
        }
        self.get(container_id).and_then(|n| n.kind.container())
    }
}

impl fmt::Display for ComponentTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&emit_outline(self))
    }
}
