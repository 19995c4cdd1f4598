//! Resolution passes
//!
//! Everything that connects nodes after input is complete lives here: base
//! classes, QML inheritance, property accessors, cross-module namespace
//! merging, proxies and the classification indexes. Each pass is a method on
//! [`Database`](crate::database::Database), run once by `resolve_all` in
//! dependency order.

use std::collections::BTreeMap;

use crate::node::NodeId;

pub(crate) mod bases;
pub(crate) mod classify;
pub(crate) mod merge;
pub(crate) mod qml;

/// Cross-node relations recorded during resolution
///
/// These are plural relations that do not belong to either endpoint alone,
/// so they live next to the arena instead of inside the nodes.
#[derive(Debug, Default)]
pub struct ResolutionContext {
    /// QML type -> types that name it as their base
    inherited_by: BTreeMap<NodeId, Vec<NodeId>>,
}

impl ResolutionContext {
    /// Record that `subclass` inherits `base`
    pub fn add_inherited_by(&mut self, base: NodeId, subclass: NodeId) {
        let entry = self.inherited_by.entry(base).or_default();
        if !entry.contains(&subclass) {
            entry.push(subclass);
        }
    }

    /// The recorded subclasses of a QML type, in registration order
    #[must_use]
    pub fn subclasses(&self, base: NodeId) -> &[NodeId] {
        self.inherited_by
            .get(&base)
            .map_or(&[], Vec::as_slice)
    }
}

/// Lookup tables over the resolved forest
///
/// The QML type and collection maps are filled as nodes are created, the
/// namespace map by the merge pass, and the remaining classification maps
/// are rebuilt by the final resolution pass.
#[derive(Debug, Default)]
pub struct Indexes {
    /// `module::Name` -> QML or JS type node
    pub qml_types: BTreeMap<String, NodeId>,
    /// Group collections of the primary tree, by name
    pub groups: BTreeMap<String, NodeId>,
    /// Module collections of the primary tree, by name
    pub modules: BTreeMap<String, NodeId>,
    /// QML module collections of the primary tree, by name
    pub qml_modules: BTreeMap<String, NodeId>,
    /// Documented C++ classes by lower-cased name
    pub cpp_classes: BTreeMap<String, Vec<NodeId>>,
    /// Elected namespace winners by lower-cased name, filled by the merge
    /// pass; undocumented winners are listed too
    pub namespaces: BTreeMap<String, Vec<NodeId>>,
    /// Documented QML types by lower-cased name
    pub qml_type_names: BTreeMap<String, Vec<NodeId>>,
    /// Documented QML and JS basic types by lower-cased name
    pub qml_basic_types: BTreeMap<String, Vec<NodeId>>,
    /// Example pages by title (name when untitled)
    pub examples: BTreeMap<String, Vec<NodeId>>,
    /// Obsolete classes by lower-cased name
    pub obsolete_classes: BTreeMap<String, Vec<NodeId>>,
    /// Active classes that contain obsolete members
    pub classes_with_obsolete_members: BTreeMap<String, Vec<NodeId>>,
    /// Obsolete QML types by lower-cased name
    pub obsolete_qml_types: BTreeMap<String, Vec<NodeId>>,
    /// Active QML types that contain obsolete members
    pub qml_types_with_obsolete_members: BTreeMap<String, Vec<NodeId>>,
    /// Documented functions by name
    pub functions: BTreeMap<String, Vec<NodeId>>,
    /// Attribution pages by lower-cased name
    pub attributions: BTreeMap<String, Vec<NodeId>>,
    /// Nodes grouped by the `\since` version that introduced them
    pub since: BTreeMap<String, Vec<NodeId>>,
    /// Classes only, by introducing version
    pub since_classes: BTreeMap<String, Vec<NodeId>>,
    /// QML types only, by introducing version
    pub since_qml_types: BTreeMap<String, Vec<NodeId>>,
    /// Link targets from `\target` and `\keyword` commands
    pub targets: BTreeMap<String, NodeId>,
}

impl Indexes {
    pub(crate) fn clear_classification(&mut self) {
        self.cpp_classes.clear();
        self.qml_type_names.clear();
        self.qml_basic_types.clear();
        self.examples.clear();
        self.obsolete_classes.clear();
        self.classes_with_obsolete_members.clear();
        self.obsolete_qml_types.clear();
        self.qml_types_with_obsolete_members.clear();
        self.functions.clear();
        self.attributions.clear();
        self.since.clear();
        self.since_classes.clear();
        self.since_qml_types.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inherited_by_deduplicates() {
        let mut ctx = ResolutionContext::default();
        let base = NodeId(1);
        let sub = NodeId(2);
        ctx.add_inherited_by(base, sub);
        ctx.add_inherited_by(base, sub);
        ctx.add_inherited_by(base, NodeId(3));
        assert_eq!(ctx.subclasses(base), &[sub, NodeId(3)]);
        assert!(ctx.subclasses(NodeId(9)).is_empty());
    }
}
