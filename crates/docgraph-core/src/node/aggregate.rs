//! Child management and lookup for aggregate nodes
//!
//! An aggregate owns its children through the arena: the child list holds
//! ids, the name maps speed up lookup, and the overload list for a function
//! name keeps the primary function at position 0. The `\relates` command is
//! the one sanctioned exception to single registration: an adopted node stays
//! in its old parent's searchable maps while its owning parent changes.

use super::arena::NodeArena;
use super::{Genus, Node, NodeId, NodeType};

/// Filters applied by [`NodeArena::find_child_node`]
#[derive(Debug, Clone, Copy, Default)]
pub struct FindFlags {
    /// Only accept type nodes (classes, enums, typedefs, QML types)
    pub types_only: bool,
    /// Skip module collections that share a name with a type
    pub ignore_modules: bool,
}

impl NodeArena {
    /// Append `child` to `parent`'s child list and searchable maps
    ///
    /// The child's parent pointer and index-node flag follow the parent.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        let is_index = self[parent].is_index_node;
        {
            let node = &mut self[child];
            node.parent = Some(parent);
            node.is_index_node = is_index;
        }
        let name = self[child].name.clone();
        let is_function = self[child].is_function();
        let is_enum = self[child].is_enum();
        let agg = self[parent]
            .as_aggregate_mut()
            .expect("add_child target must be an aggregate");
        agg.children.push(child);
        if is_function {
            agg.function_map.entry(name).or_default().push(child);
        } else {
            agg.nonfunction_map.entry(name).or_default().push(child);
            if is_enum {
                agg.enum_children.push(child);
            }
        }
    }

    /// Make `parent` the adoptive parent of `child`
    ///
    /// The child's former parent keeps it in its own child list and maps;
    /// only the parent pointer moves. A function is entered into the new
    /// parent's function map only when the name is not taken, and never as a
    /// fresh overload list reshuffle. Adopting a shared comment adopts its
    /// whole collective.
    pub fn adopt_child(&mut self, parent: NodeId, child: NodeId) {
        if self[child].parent == Some(parent) {
            return;
        }
        self[child].parent = Some(parent);
        let name = self[child].name.clone();
        let is_function = self[child].is_function();
        let is_enum = self[child].is_enum();
        let collective = self[child]
            .as_shared_comment()
            .map(|sc| sc.collective.clone());
        let agg = self[parent]
            .as_aggregate_mut()
            .expect("adopt_child target must be an aggregate");
        agg.children.push(child);
        if is_function {
            agg.function_map.entry(name).or_insert_with(|| vec![child]);
        } else {
            agg.nonfunction_map.entry(name).or_default().push(child);
            if is_enum {
                agg.enum_children.push(child);
            }
        }
        if let Some(members) = collective {
            for member in members {
                self.adopt_child(parent, member);
            }
        }
    }

    /// Register `child` in the parent's name map under `title`
    ///
    /// The child is presumed to be in the child list already; this only makes
    /// it findable by a page title.
    pub fn add_child_by_title(&mut self, parent: NodeId, title: impl Into<String>, child: NodeId) {
        let agg = self[parent]
            .as_aggregate_mut()
            .expect("add_child_by_title target must be an aggregate");
        agg.nonfunction_map
            .entry(title.into())
            .or_default()
            .push(child);
    }

    /// Find a child of `parent` by name, preferring non-function children
    ///
    /// With `Genus::DontCare` the first non-function child of that name
    /// wins. With a concrete genus, non-function candidates are filtered by
    /// genus and by `flags`; the function map is consulted last, and only if
    /// the aggregate itself satisfies the genus.
    #[must_use]
    pub fn find_child_node(
        &self,
        parent: NodeId,
        name: &str,
        genus: Genus,
        flags: FindFlags,
    ) -> Option<NodeId> {
        let agg = self[parent].as_aggregate()?;
        if let Some(candidates) = agg.nonfunction_map.get(name) {
            if genus == Genus::DontCare {
                if let Some(&first) = candidates.first() {
                    return Some(first);
                }
            } else {
                for &candidate in candidates {
                    if genus != self[candidate].genus {
                        continue;
                    }
                    if flags.types_only && !is_type_node(&self[candidate]) {
                        continue;
                    }
                    if flags.ignore_modules
                        && self[candidate].node_type() == NodeType::Module
                    {
                        continue;
                    }
                    return Some(candidate);
                }
            }
        }
        if genus != Genus::DontCare && self[parent].genus != genus {
            return None;
        }
        self.primary_function(parent, name)
    }

    /// All children of `parent` named `name`, overloads first
    #[must_use]
    pub fn find_children(&self, parent: NodeId, name: &str) -> Vec<NodeId> {
        let Some(agg) = self[parent].as_aggregate() else {
            return Vec::new();
        };
        let mut nodes = Vec::new();
        if let Some(overloads) = agg.function_map.get(name) {
            nodes.extend_from_slice(overloads);
        }
        if let Some(candidates) = agg.nonfunction_map.get(name) {
            nodes.extend_from_slice(candidates);
        }
        nodes
    }

    /// Find a non-function child by name for which `is_match` holds
    #[must_use]
    pub fn find_nonfunction_child(
        &self,
        parent: NodeId,
        name: &str,
        is_match: impl Fn(&Node) -> bool,
    ) -> Option<NodeId> {
        let agg = self[parent].as_aggregate()?;
        agg.nonfunction_map
            .get(name)?
            .iter()
            .copied()
            .find(|&candidate| is_match(&self[candidate]))
    }

    /// The primary function for `name`, if any
    #[must_use]
    pub fn primary_function(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self[parent]
            .as_aggregate()?
            .function_map
            .get(name)
            .and_then(|overloads| overloads.first().copied())
    }

    /// The whole overload list for `name`, primary first
    #[must_use]
    pub fn overloads(&self, parent: NodeId, name: &str) -> Vec<NodeId> {
        self[parent]
            .as_aggregate()
            .and_then(|agg| agg.function_map.get(name).cloned())
            .unwrap_or_default()
    }

    /// Find a function child with matching name and parameter types
    ///
    /// If `parameters` is empty and no parameterless overload exists, the
    /// first non-internal overload is returned, whether it has parameters or
    /// not; the primary is the last resort. This relaxed policy lets a
    /// `\fn Foo::bar()` comment find the only `bar` there is.
    #[must_use]
    pub fn find_function_child(
        &self,
        parent: NodeId,
        name: &str,
        parameters: &crate::params::Parameters,
    ) -> Option<NodeId> {
        let overloads = self[parent]
            .as_aggregate()?
            .function_map
            .get(name)?
            .clone();
        let primary = *overloads.first()?;

        let primary_params = &self[primary].as_function().expect("function map").parameters;
        if parameters.is_empty() && primary_params.is_empty() && !self.is_internal(primary) {
            return Some(primary);
        }

        for &fn_id in &overloads {
            let fn_params = &self[fn_id].as_function().expect("function map").parameters;
            if parameters.count() == fn_params.count() && !self.is_internal(fn_id) {
                if parameters.is_empty() {
                    return Some(fn_id);
                }
                let matched = (0..parameters.count())
                    .all(|i| parameters.at(i).ty() == fn_params.at(i).ty());
                if matched {
                    return Some(fn_id);
                }
            }
        }

        if parameters.is_empty() {
            return overloads
                .iter()
                .copied()
                .find(|&fn_id| !self.is_internal(fn_id))
                .or(Some(primary));
        }
        None
    }

    /// Find a function child with the same signature as `clone`
    ///
    /// Used when merging a function parsed elsewhere into this aggregate.
    #[must_use]
    pub fn find_function_child_like(&self, parent: NodeId, clone: NodeId) -> Option<NodeId> {
        let name = self[clone].name.clone();
        let overloads = self[parent].as_aggregate()?.function_map.get(&name)?;
        overloads
            .iter()
            .copied()
            .find(|&fn_id| self.same_signature(clone, fn_id))
    }

    /// Structural signature equality between two function nodes
    ///
    /// Tolerates a superfluous enclosing-scope prefix on one side
    /// (`Foo::Iterator` matches `Iterator` inside `Foo`) and elided template
    /// arguments (`QAtomicInteger<T>` matches `QAtomicInteger`).
    #[must_use]
    pub fn same_signature(&self, clone: NodeId, candidate: NodeId) -> bool {
        let (Some(f1), Some(f2)) = (self[clone].as_function(), self[candidate].as_function())
        else {
            return false;
        };
        if f1.parameters.count() != f2.parameters.count() {
            return false;
        }
        if f1.is_const != f2.is_const || f1.ref_qualifier != f2.ref_qualifier {
            return false;
        }
        let scope = self[candidate]
            .parent()
            .map(|p| self[p].name.clone())
            .unwrap_or_default();
        for i in 0..f1.parameters.count() {
            let a = f1.parameters.at(i).ty();
            let b = f2.parameters.at(i).ty();
            if a.is_empty() || b.is_empty() {
                continue;
            }
            // Compare with the longer type on the left
            let (mut long, short) = if a.len() < b.len() { (b, a) } else { (a, b) };
            let mut long_owned;
            if long != short && long != format!("{scope}::{short}") {
                let Some(lt) = long.find('<') else {
                    return false;
                };
                let Some(gt) = long[lt..].find('>').map(|o| lt + o) else {
                    return false;
                };
                long_owned = long.to_string();
                long_owned.replace_range(lt..=gt, "");
                long = &long_owned;
                if long != short {
                    return false;
                }
            }
        }
        true
    }

    /// The enum child that has `value` as one of its enumerators
    #[must_use]
    pub fn find_enum_node_for_value(&self, parent: NodeId, value: &str) -> Option<NodeId> {
        let agg = self[parent].as_aggregate()?;
        agg.enum_children.iter().copied().find(|&enum_id| {
            self[enum_id]
                .as_enum()
                .is_some_and(|e| e.items.iter().any(|item| item.name == value))
        })
    }

    /// A QML or JS property child named `name`, optionally filtered by
    /// attachment
    #[must_use]
    pub fn find_qml_property(
        &self,
        parent: NodeId,
        name: &str,
        attached: Option<bool>,
    ) -> Option<NodeId> {
        let goal = if self[parent].genus == Genus::Js {
            NodeType::JsProperty
        } else {
            NodeType::QmlProperty
        };
        let agg = self[parent].as_aggregate()?;
        agg.children.iter().copied().find(|&child| {
            self[child].node_type() == goal
                && self[child].name == name
                && attached.map_or(true, |want| {
                    self[child]
                        .data
                        .as_qml_property()
                        .is_some_and(|p| p.is_attached == want)
                })
        })
    }

    /// Assign overload numbers below `id`, recursively
    ///
    /// Ensures the primary overload is not `\overload`-flagged, then numbers
    /// the primary 0 and the rest 1..n with public overloads first in
    /// declaration order and internal overloads last in their original
    /// relative order. Numbering is deterministic, it feeds generated URLs.
    pub fn normalize_overloads(&mut self, id: NodeId) {
        let Some(agg) = self[id].as_aggregate() else {
            return;
        };
        let names: Vec<String> = agg.function_map.keys().cloned().collect();
        let children = agg.children.clone();

        for name in names {
            let mut overloads = self[id]
                .as_aggregate()
                .expect("aggregate checked above")
                .function_map[&name]
                .clone();
            if overloads.is_empty() {
                continue;
            }

            let flagged = |arena: &Self, f: NodeId| {
                arena[f].as_function().expect("function map").overload_flag
            };
            if flagged(self, overloads[0]) {
                match overloads.iter().position(|&f| !flagged(self, f)) {
                    Some(pos) => {
                        let primary = overloads.remove(pos);
                        overloads.insert(0, primary);
                    }
                    None => {
                        self[overloads[0]]
                            .as_function_mut()
                            .expect("function map")
                            .overload_flag = false;
                    }
                }
            }

            let mut order = vec![overloads[0]];
            let (publics, internals): (Vec<NodeId>, Vec<NodeId>) = overloads[1..]
                .iter()
                .copied()
                .partition(|&f| !self.is_internal(f));
            order.extend(publics);
            order.extend(internals);

            for (number, &fn_id) in order.iter().enumerate() {
                self[fn_id].as_function_mut().expect("function map").overload_number =
                    u8::try_from(number).unwrap_or(u8::MAX);
            }
            self[id]
                .as_aggregate_mut()
                .expect("aggregate checked above")
                .function_map
                .insert(name, order);
        }

        for child in children {
            if self[child].is_aggregate() {
                self.normalize_overloads(child);
            }
        }
    }

    /// Demote children that neither have nor require documentation
    ///
    /// Runs after all comments are attached. Property accessors and
    /// flags-typedefs are spared, their documentation lives with the property
    /// or enum.
    pub fn mark_undocumented_children_internal(&mut self, id: NodeId) {
        let Some(agg) = self[id].as_aggregate() else {
            return;
        };
        let children = agg.children.clone();
        for child in children {
            let node = &self[child];
            // Proxies and collections are synthetic carriers, never
            // documented in their own right
            if !node.is_sharing_comment()
                && !node.is_proxy()
                && !node.is_collection()
                && !node.has_doc()
                && !self.doc_must_be_generated(child)
            {
                let spared = match self[child].as_function() {
                    Some(f) => !f.associated_properties.is_empty(),
                    None => self[child]
                        .as_typedef()
                        .is_some_and(|t| t.associated_enum.is_some()),
                };
                if !spared {
                    self[child].access = super::Access::Private;
                    self[child].set_status(super::Status::Internal);
                }
            }
            if self[child].is_aggregate() {
                self.mark_undocumented_children_internal(child);
            }
        }
    }
}

/// Kinds acceptable to a `TypesOnly` child search
fn is_type_node(node: &Node) -> bool {
    matches!(
        node.node_type(),
        NodeType::Class
            | NodeType::Struct
            | NodeType::Union
            | NodeType::Enum
            | NodeType::Typedef
            | NodeType::TypeAlias
            | NodeType::QmlType
            | NodeType::QmlBasicType
            | NodeType::JsType
            | NodeType::JsBasicType
    )
}

impl super::NodeData {
    /// QML property payload accessor used by lookups
    #[must_use]
    pub fn as_qml_property(&self) -> Option<&super::QmlPropertyData> {
        match self {
            super::NodeData::QmlProperty(d) => Some(d),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Access, Status};
    use crate::params::Parameters;

    fn function(name: &str, params: &str) -> Node {
        let mut node = Node::new(NodeType::Function, name);
        node.as_function_mut().unwrap().parameters = Parameters::parse(params);
        node
    }

    fn class_with_functions(signatures: &[(&str, &str)]) -> (NodeArena, NodeId, Vec<NodeId>) {
        let mut arena = NodeArena::new();
        let class = arena.alloc(Node::new(NodeType::Class, "Foo"));
        let mut ids = Vec::new();
        for (name, params) in signatures {
            let id = arena.alloc(function(name, params));
            arena.add_child(class, id);
            ids.push(id);
        }
        (arena, class, ids)
    }

    #[test]
    fn add_child_maintains_maps() {
        let (arena, class, ids) = class_with_functions(&[("bar", ""), ("bar", "int x")]);
        assert_eq!(arena.overloads(class, "bar"), ids);
        assert_eq!(arena[ids[0]].parent(), Some(class));
    }

    #[test]
    fn find_function_child_matches_types() {
        let (arena, class, ids) =
            class_with_functions(&[("bar", ""), ("bar", "int x"), ("bar", "const QString &s")]);
        let found = arena
            .find_function_child(class, "bar", &Parameters::parse("int y"))
            .unwrap();
        assert_eq!(found, ids[1]);
        assert!(arena
            .find_function_child(class, "bar", &Parameters::parse("double d"))
            .is_none());
    }

    #[test]
    fn empty_parameters_fall_back_to_first_non_internal() {
        let (mut arena, class, ids) = class_with_functions(&[("bar", "int x"), ("bar", "char c")]);
        arena[ids[0]].set_status(Status::Internal);
        let found = arena
            .find_function_child(class, "bar", &Parameters::new())
            .unwrap();
        assert_eq!(found, ids[1]);

        // With every overload internal the primary is the last resort
        arena[ids[1]].set_status(Status::Internal);
        let found = arena
            .find_function_child(class, "bar", &Parameters::new())
            .unwrap();
        assert_eq!(found, ids[0]);
    }

    #[test]
    fn overload_numbering_is_deterministic() {
        let (mut arena, class, ids) = class_with_functions(&[
            ("bar", ""),
            ("bar", "int x"),
            ("bar", "char c"),
            ("bar", "double d"),
        ]);
        // Declaration order: public, internal, public, internal
        arena[ids[1]].set_status(Status::Internal);
        arena[ids[3]].set_status(Status::Internal);
        arena.normalize_overloads(class);

        let number =
            |arena: &NodeArena, id: NodeId| arena[id].as_function().unwrap().overload_number;
        assert_eq!(number(&arena, ids[0]), 0);
        assert_eq!(number(&arena, ids[2]), 1);
        assert_eq!(number(&arena, ids[1]), 2);
        assert_eq!(number(&arena, ids[3]), 3);
        assert_eq!(arena.overloads(class, "bar"), vec![ids[0], ids[2], ids[1], ids[3]]);
    }

    #[test]
    fn flagged_primary_is_demoted() {
        let (mut arena, class, ids) =
            class_with_functions(&[("bar", ""), ("bar", "int x"), ("bar", "char c")]);
        arena[ids[0]].as_function_mut().unwrap().overload_flag = true;
        arena.normalize_overloads(class);

        assert_eq!(arena.primary_function(class, "bar"), Some(ids[1]));
        assert_eq!(arena[ids[1]].as_function().unwrap().overload_number, 0);
        assert_eq!(arena[ids[0]].as_function().unwrap().overload_number, 1);
        assert_eq!(arena[ids[2]].as_function().unwrap().overload_number, 2);
    }

    #[test]
    fn all_flagged_clears_primary_flag() {
        let (mut arena, class, ids) = class_with_functions(&[("bar", ""), ("bar", "int x")]);
        arena[ids[0]].as_function_mut().unwrap().overload_flag = true;
        arena[ids[1]].as_function_mut().unwrap().overload_flag = true;
        arena.normalize_overloads(class);
        assert!(!arena[ids[0]].as_function().unwrap().overload_flag);
        assert_eq!(arena[ids[0]].as_function().unwrap().overload_number, 0);
    }

    #[test]
    fn same_signature_strips_enclosing_scope() {
        let mut arena = NodeArena::new();
        let class = arena.alloc(Node::new(NodeType::Class, "Foo"));
        let inner = arena.alloc(function("insert", "Foo::Iterator it"));
        arena.add_child(class, inner);
        let clone = arena.alloc(function("insert", "Iterator it"));
        assert_eq!(arena.find_function_child_like(class, clone), Some(inner));
    }

    #[test]
    fn same_signature_tolerates_elided_template_arguments() {
        let mut arena = NodeArena::new();
        let class = arena.alloc(Node::new(NodeType::Class, "Foo"));
        let inner = arena.alloc(function("store", "QAtomicInteger<T> v"));
        arena.add_child(class, inner);
        let clone = arena.alloc(function("store", "QAtomicInteger v"));
        assert!(arena.same_signature(clone, inner));

        let other = arena.alloc(function("store", "QAtomicPointer v"));
        assert!(!arena.same_signature(other, inner));
    }

    #[test]
    fn find_child_node_prefers_matching_genus() {
        let mut arena = NodeArena::new();
        let root = arena.alloc(Node::new(NodeType::Namespace, ""));
        let qml = arena.alloc(Node::new(NodeType::QmlType, "Text"));
        arena.add_child(root, qml);
        let class = arena.alloc(Node::new(NodeType::Class, "Text"));
        arena.add_child(root, class);

        assert_eq!(
            arena.find_child_node(root, "Text", Genus::Cpp, FindFlags::default()),
            Some(class)
        );
        assert_eq!(
            arena.find_child_node(root, "Text", Genus::Qml, FindFlags::default()),
            Some(qml)
        );
        assert_eq!(
            arena.find_child_node(root, "Text", Genus::DontCare, FindFlags::default()),
            Some(qml)
        );
    }

    #[test]
    fn adoption_keeps_old_registration() {
        let mut arena = NodeArena::new();
        let home = arena.alloc(Node::new(NodeType::Class, "Home"));
        let away = arena.alloc(Node::new(NodeType::Class, "Away"));
        let func = arena.alloc(function("helper", ""));
        arena.add_child(home, func);
        arena.adopt_child(away, func);

        assert_eq!(arena[func].parent(), Some(away));
        // Still findable through the old parent
        assert_eq!(arena.primary_function(home, "helper"), Some(func));
        assert_eq!(arena.primary_function(away, "helper"), Some(func));
    }

    #[test]
    fn undocumented_children_become_internal() {
        let (mut arena, class, ids) = class_with_functions(&[("bar", ""), ("baz", "")]);
        arena[ids[0]].set_doc(crate::doc::Doc::parse(
            "Does things.",
            crate::location::Location::new("foo.cpp", 3, 1),
        ));
        arena.mark_undocumented_children_internal(class);
        assert_eq!(arena[ids[0]].status(), Status::Active);
        assert_eq!(arena[ids[1]].status(), Status::Internal);
        assert_eq!(arena[ids[1]].access, Access::Private);
    }

    #[test]
    fn enum_value_reverse_lookup() {
        let mut arena = NodeArena::new();
        let class = arena.alloc(Node::new(NodeType::Class, "Qt"));
        let mut en = Node::new(NodeType::Enum, "Key");
        en.as_enum_mut().unwrap().items.push(crate::node::EnumItem {
            name: "Key_Up".into(),
            ..Default::default()
        });
        let en = arena.alloc(en);
        arena.add_child(class, en);
        assert_eq!(arena.find_enum_node_for_value(class, "Key_Up"), Some(en));
        assert_eq!(arena.find_enum_node_for_value(class, "Key_Down"), None);
    }
}
