//! QML inheritance and C++/QML linking
//!
//! QML base types are resolved by name through the import list of the
//! inheriting type, then by qualified or module-less lookup. A memo caches
//! every search, negative results included, because module documentation
//! tends to repeat the same handful of base names hundreds of times.

use std::collections::BTreeMap;

use crate::database::Database;
use crate::error::DiagnosticKind;
use crate::node::NodeId;

impl Database {
    /// Resolve the base type of every QML and JS type below `root`
    pub(crate) fn resolve_qml_inheritance(&mut self, root: NodeId) {
        let mut previous_searches: BTreeMap<String, Option<NodeId>> = BTreeMap::new();
        let types = self.collect_qml_types(root);
        for qml_type in types {
            self.resolve_one_qml_base(qml_type, &mut previous_searches);
        }
    }

    fn resolve_one_qml_base(
        &mut self,
        qml_type: NodeId,
        previous_searches: &mut BTreeMap<String, Option<NodeId>>,
    ) {
        let (base_name, already_resolved, imports) = {
            let Some(data) = self.arena[qml_type].as_qml_type() else {
                return;
            };
            (
                data.qml_base_name.clone(),
                data.qml_base_node.is_some(),
                data.imports.clone(),
            )
        };
        if already_resolved || base_name.is_empty() {
            return;
        }

        let memo_key = self.qml_search_key(qml_type, &base_name);
        let base = if let Some(&memoized) = previous_searches.get(&memo_key) {
            memoized
        } else {
            let found = self.search_qml_base(qml_type, &base_name, &imports);
            previous_searches.insert(memo_key, found);
            found
        };

        let Some(base) = base else {
            return;
        };
        if base == qml_type {
            self.diags.warn(
                DiagnosticKind::SelfQmlInheritance(self.arena[qml_type].name.clone()),
                self.arena[qml_type].doc_location.clone(),
            );
            return;
        }
        if let Some(data) = self.arena[qml_type].as_qml_type_mut() {
            data.qml_base_node = Some(base);
        }
        self.ctx.add_inherited_by(base, qml_type);

        // A base from an index tree may itself still be unresolved
        if self.arena[base].is_index_node {
            self.resolve_one_qml_base(base, previous_searches);
        }
    }

    /// The memo key scopes a base name by the searching type's module
    fn qml_search_key(&self, qml_type: NodeId, base_name: &str) -> String {
        let module = self.arena[qml_type]
            .as_qml_type()
            .and_then(|d| d.logical_module)
            .and_then(|m| self.arena[m].as_collection())
            .map(|c| c.logical_module_name.clone())
            .unwrap_or_default();
        format!("{module}${base_name}")
    }

    fn search_qml_base(
        &self,
        qml_type: NodeId,
        base_name: &str,
        imports: &[crate::node::ImportRec],
    ) -> Option<NodeId> {
        for import in imports {
            if let Some(found) = self.find_qml_type_by_import(import, base_name) {
                return Some(found);
            }
        }
        if let Some((qmid, name)) = base_name.split_once("::") {
            return self.find_qml_type(qmid, name);
        }
        // Module-less fallback: the same module first, then any
        let own_module = self.arena[qml_type]
            .as_qml_type()
            .and_then(|d| d.logical_module)
            .and_then(|m| self.arena[m].as_collection())
            .map(|c| c.logical_module_name.clone());
        if let Some(module) = own_module {
            if let Some(found) = self.find_qml_type(&module, base_name) {
                return Some(found);
            }
        }
        self.find_qml_type("", base_name)
    }

    /// Connect QML types to the C++ classes they instantiate, both ways
    pub(crate) fn resolve_cpp_to_qml_links(&mut self, root: NodeId) {
        for qml_type in self.collect_qml_types(root) {
            let class_name = self.arena[qml_type]
                .as_qml_type()
                .map(|d| d.cpp_class_name.clone())
                .unwrap_or_default();
            if class_name.is_empty() {
                continue;
            }
            let path: Vec<String> = class_name.split("::").map(str::to_string).collect();
            let Some(class) = self.find_class_node(&path) else {
                continue;
            };
            if let Some(data) = self.arena[qml_type].as_qml_type_mut() {
                data.class_node = Some(class);
            }
            if let Some(data) = self.arena[class].as_class_mut() {
                data.qml_element = Some(qml_type);
            }
        }
    }

    /// All QML and JS type nodes below `root`, preorder
    pub(crate) fn collect_qml_types(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if self.arena[node].is_qml_type() {
                out.push(node);
            }
            if let Some(agg) = self.arena[node].as_aggregate() {
                stack.extend(agg.children.iter().rev().copied());
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{ImportRec, Node, NodeType};

    fn qml_type(db: &mut Database, module: &str, name: &str) -> NodeId {
        let node = db.arena_mut().alloc(Node::new(NodeType::QmlType, name));
        let root = db.primary_root();
        db.arena_mut().add_child(root, node);
        if !module.is_empty() {
            db.indexes
                .qml_types
                .insert(format!("{module}::{name}"), node);
        }
        node
    }

    fn set_base(db: &mut Database, node: NodeId, base: &str) {
        db.arena_mut()[node]
            .as_qml_type_mut()
            .unwrap()
            .qml_base_name = base.to_string();
    }

    #[test]
    fn base_resolved_through_import_list() {
        let mut db = Database::new("quick");
        let item = qml_type(&mut db, "QtQuick", "Item");
        let rect = qml_type(&mut db, "QtQuick", "Rectangle");
        set_base(&mut db, rect, "Item");
        db.arena_mut()[rect]
            .as_qml_type_mut()
            .unwrap()
            .imports
            .push(ImportRec {
                module_name: "QtQuick".into(),
                version: "2.0".into(),
            });
        let root = db.primary_root();
        db.resolve_qml_inheritance(root);
        assert_eq!(
            db.arena()[rect].as_qml_type().unwrap().qml_base_node,
            Some(item)
        );
        assert_eq!(db.ctx.subclasses(item), &[rect]);
    }

    #[test]
    fn qualified_base_bypasses_imports() {
        let mut db = Database::new("quick");
        let item = qml_type(&mut db, "QtQuick", "Item");
        let rect = qml_type(&mut db, "QtQuick", "Rectangle");
        set_base(&mut db, rect, "QtQuick::Item");
        let root = db.primary_root();
        db.resolve_qml_inheritance(root);
        assert_eq!(
            db.arena()[rect].as_qml_type().unwrap().qml_base_node,
            Some(item)
        );
    }

    #[test]
    fn moduleless_base_found_by_name() {
        let mut db = Database::new("quick");
        let item = qml_type(&mut db, "", "Item");
        let rect = qml_type(&mut db, "", "Rectangle");
        set_base(&mut db, rect, "Item");
        let root = db.primary_root();
        db.resolve_qml_inheritance(root);
        assert_eq!(
            db.arena()[rect].as_qml_type().unwrap().qml_base_node,
            Some(item)
        );
    }

    #[test]
    fn self_inheritance_is_rejected() {
        let mut db = Database::new("quick");
        let item = qml_type(&mut db, "QtQuick", "Item");
        set_base(&mut db, item, "QtQuick::Item");
        let root = db.primary_root();
        db.resolve_qml_inheritance(root);
        assert!(db.arena()[item].as_qml_type().unwrap().qml_base_node.is_none());
        assert!(matches!(
            db.diagnostics()[0].kind,
            DiagnosticKind::SelfQmlInheritance(_)
        ));
    }

    #[test]
    fn instantiated_class_links_both_ways() {
        use crate::database::{DeclKind, Declaration};
        use crate::location::Location;
        use crate::node::Access;

        let mut db = Database::new("quick");
        let class = db.declare(&Declaration {
            kind: DeclKind::Class,
            parent_path: vec![],
            name: "QQuickItem".into(),
            access: Access::Public,
            location: Location::new("t.h", 1, 1),
        });
        let item = qml_type(&mut db, "QtQuick", "Item");
        db.arena_mut()[item]
            .as_qml_type_mut()
            .unwrap()
            .cpp_class_name = "QQuickItem".into();
        let root = db.primary_root();
        db.resolve_cpp_to_qml_links(root);
        assert_eq!(db.arena()[item].as_qml_type().unwrap().class_node, Some(class));
        assert_eq!(db.arena()[class].as_class().unwrap().qml_element, Some(item));
    }
}
