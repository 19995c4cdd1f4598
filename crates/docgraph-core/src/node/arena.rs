//! Arena storage for the node graph
//!
//! All nodes of all trees live in one [`NodeArena`]; a [`NodeId`] is an index
//! into it and stays valid for the arena's lifetime, so cross-tree references
//! never dangle. Nodes are never removed individually; a node disappears only
//! when the whole arena is dropped.

use std::ops::{Index, IndexMut};

use super::{Node, NodeId, NodeType, Status};

/// Owning storage for every node in the database
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    /// Create an empty arena
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Move a node into the arena, returning its handle
    ///
    /// The node's parent link is left untouched; use
    /// [`add_child`](NodeArena::add_child) to attach it to an aggregate.
    pub fn alloc(&mut self, mut node: Node) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).expect("arena overflow"));
        node.id = id;
        self.nodes.push(node);
        id
    }

    /// Number of nodes allocated
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if nothing has been allocated
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all nodes in allocation order
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// The node behind a handle, or `None` for a foreign handle
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// The owning parent of a node
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self[id].parent
    }

    /// Walk the parent chain from `id` upward, excluding `id` itself
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self[id].parent, move |&p| self[p].parent)
    }

    /// The root of the tree containing `id`
    #[must_use]
    pub fn root_of(&self, id: NodeId) -> NodeId {
        self.ancestors(id).last().unwrap_or(id)
    }

    /// Internal-ness derives downward: a node is internal if its own status
    /// or any ancestor's status is Internal, without being stored redundantly
    #[must_use]
    pub fn is_internal(&self, id: NodeId) -> bool {
        if self[id].status() == Status::Internal {
            return true;
        }
        self.ancestors(id)
            .any(|a| self[a].status() == Status::Internal)
    }

    /// The name path from the tree root down to `id`, skipping the unnamed
    /// root
    #[must_use]
    pub fn full_path(&self, id: NodeId) -> Vec<String> {
        let mut path: Vec<String> = std::iter::once(id)
            .chain(self.ancestors(id))
            .filter(|&n| !self[n].name.is_empty())
            .map(|n| self[n].name.clone())
            .collect();
        path.reverse();
        path
    }

    /// The `::`-qualified name, e.g. `Qt::Widgets::QWidget`
    #[must_use]
    pub fn plain_full_name(&self, id: NodeId) -> String {
        self.full_path(id).join("::")
    }

    /// `Parent::name` when the parent is named, else just the name
    #[must_use]
    pub fn qualify_with_parent_name(&self, id: NodeId) -> String {
        match self[id].parent {
            Some(parent) if !self[parent].name.is_empty() => {
                format!("{}::{}", self[parent].name, self[id].name)
            }
            _ => self[id].name.clone(),
        }
    }

    /// A function signature rendered for messages, `name(types)` plus
    /// cv-qualifiers
    #[must_use]
    pub fn function_signature(&self, id: NodeId) -> String {
        let node = &self[id];
        let Some(data) = node.as_function() else {
            return node.name.clone();
        };
        let mut text = format!("{}({})", node.name, data.parameters.signature(false));
        if data.is_const {
            text.push_str(" const");
        }
        text
    }

    /// Whether documentation for this node must exist in the current module
    ///
    /// Index nodes never qualify, they are documented in the module that
    /// produced the index. Only classes, namespaces and header files make
    /// documentation mandatory; a class declared in a private `_p.h` header
    /// is exempt.
    #[must_use]
    pub fn doc_must_be_generated(&self, id: NodeId) -> bool {
        let node = &self[id];
        if node.is_index_node {
            return false;
        }
        match node.node_type() {
            NodeType::Class | NodeType::Struct | NodeType::Union => {
                self.is_in_api(id) && !node.declaration_location.file_name().ends_with("_p.h")
            }
            NodeType::Namespace | NodeType::HeaderFile => {
                self.is_in_api(id) || self.has_documented_children(id)
            }
            _ => false,
        }
    }

    /// Public, not internal, not suppressed, and documented
    #[must_use]
    pub fn is_in_api(&self, id: NodeId) -> bool {
        let node = &self[id];
        !node.is_private()
            && !self.is_internal(id)
            && !node.is_dont_document()
            && node.has_doc()
    }

    /// True if any direct child is part of the documented API
    #[must_use]
    pub fn has_documented_children(&self, id: NodeId) -> bool {
        self[id]
            .as_aggregate()
            .is_some_and(|agg| agg.children.iter().any(|&c| self.is_in_api(c)))
    }
}

impl Index<NodeId> for NodeArena {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }
}

impl IndexMut<NodeId> for NodeArena {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::Doc;
    use crate::location::Location;

    fn doc(text: &str) -> Doc {
        Doc::parse(text, Location::new("test.cpp", 1, 1))
    }

    fn arena_with_chain() -> (NodeArena, NodeId, NodeId, NodeId) {
        let mut arena = NodeArena::new();
        let root = arena.alloc(Node::new(NodeType::Namespace, ""));
        let ns = arena.alloc(Node::new(NodeType::Namespace, "Qt"));
        arena[ns].parent = Some(root);
        let class = arena.alloc(Node::new(NodeType::Class, "QWidget"));
        arena[class].parent = Some(ns);
        (arena, root, ns, class)
    }

    #[test]
    fn qualified_names_skip_unnamed_root() {
        let (arena, _, ns, class) = arena_with_chain();
        assert_eq!(arena.plain_full_name(class), "Qt::QWidget");
        assert_eq!(arena.plain_full_name(ns), "Qt");
        assert_eq!(arena.qualify_with_parent_name(class), "Qt::QWidget");
    }

    #[test]
    fn internal_propagates_from_ancestors() {
        let (mut arena, _, ns, class) = arena_with_chain();
        assert!(!arena.is_internal(class));
        arena[ns].set_status(Status::Internal);
        assert!(arena.is_internal(class));
        // The child's own stored status is untouched
        assert_eq!(arena[class].status(), Status::Active);
    }

    #[test]
    fn root_of_walks_to_the_top() {
        let (arena, root, _, class) = arena_with_chain();
        assert_eq!(arena.root_of(class), root);
        assert_eq!(arena.root_of(root), root);
    }

    #[test]
    fn private_header_classes_are_exempt() {
        let (mut arena, _, _, class) = arena_with_chain();
        arena[class].set_doc(doc("\\class QWidget\nText."));
        arena[class].declaration_location = Location::new("qwidget.h", 1, 1);
        assert!(arena.doc_must_be_generated(class));
        arena[class].declaration_location = Location::new("qwidget_p.h", 1, 1);
        assert!(!arena.doc_must_be_generated(class));
    }

    #[test]
    fn index_nodes_are_never_mandatory() {
        let (mut arena, _, _, class) = arena_with_chain();
        arena[class].set_doc(doc("\\class QWidget\nText."));
        arena[class].is_index_node = true;
        assert!(!arena.doc_must_be_generated(class));
    }

    #[test]
    fn namespace_counts_documented_children() {
        let (mut arena, _, ns, class) = arena_with_chain();
        assert!(!arena.doc_must_be_generated(ns));
        arena[class].set_doc(doc("\\class QWidget\nText."));
        arena[ns]
            .as_aggregate_mut()
            .unwrap()
            .children
            .push(class);
        assert!(arena.doc_must_be_generated(ns));
    }
}
