//! Module index files
//!
//! A module's resolved tree is exported as a JSON index so other modules
//! can link against it without reparsing its sources. Loading an index
//! grows the forest by one tree whose nodes are all flagged as index nodes;
//! they take part in lookups and merging but never generate pages here.

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::error::Error;
use crate::node::{
    Access, EnumItem, ImportRec, Metaness, Node, NodeData, NodeId, NodeType, ProxyData,
    RelatedClass, Status, Virtualness,
};
use crate::params::Parameters;

/// Top level of an index file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexTree {
    pub module: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub root: Vec<IndexNode>,
}

/// One exported node
///
/// Only the fields cross-module resolution needs are carried; everything
/// that merely renders a page stays in the producing module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexNode {
    pub kind: NodeType,
    pub name: String,
    #[serde(default)]
    pub access: Access,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub since: String,
    /// True if the producing module attached documentation
    #[serde(default)]
    pub documented: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bases: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameter_types: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub return_type: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_const: bool,
    #[serde(default, skip_serializing_if = "is_plain")]
    pub metaness: Metaness,
    #[serde(default, skip_serializing_if = "is_non_virtual")]
    pub virtualness: Virtualness,
    #[serde(default, skip_serializing_if = "u8_is_zero")]
    pub overload_number: u8,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub qml_base_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub qml_module: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<ImportRec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enum_items: Vec<EnumItem>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub proxied_module: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<IndexNode>,
}

fn is_plain(m: &Metaness) -> bool {
    *m == Metaness::Plain
}

fn is_non_virtual(v: &Virtualness) -> bool {
    *v == Virtualness::NonVirtual
}

fn u8_is_zero(n: &u8) -> bool {
    *n == 0
}

impl IndexNode {
    fn for_node(kind: NodeType, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            access: Access::Public,
            status: Status::Active,
            since: String::new(),
            documented: false,
            bases: Vec::new(),
            parameter_types: Vec::new(),
            return_type: String::new(),
            is_const: false,
            metaness: Metaness::Plain,
            virtualness: Virtualness::NonVirtual,
            overload_number: 0,
            qml_base_name: String::new(),
            qml_module: String::new(),
            imports: Vec::new(),
            enum_items: Vec::new(),
            proxied_module: String::new(),
            children: Vec::new(),
        }
    }
}

impl Database {
    /// Load an index file, adding its tree to the forest
    ///
    /// Lookup order follows load order, so indexes should be loaded after
    /// the primary sources and in dependency order.
    pub fn load_index<R: Read>(&mut self, reader: R) -> Result<NodeId, Error> {
        let tree: IndexTree = serde_json::from_reader(reader)?;
        if tree.module.is_empty() {
            return Err(Error::IndexMissingModule);
        }
        Ok(self.insert_index_tree(&tree))
    }

    /// Insert an already-parsed index tree
    pub fn insert_index_tree(&mut self, tree: &IndexTree) -> NodeId {
        let root = self.add_tree(tree.module.clone(), true);
        for child in &tree.root {
            self.insert_index_node(root, child, &tree.module);
        }
        root
    }

    fn insert_index_node(&mut self, parent: NodeId, entry: &IndexNode, module: &str) -> NodeId {
        let mut node = Node::new(entry.kind, entry.name.clone());
        node.access = entry.access;
        node.set_status(entry.status);
        node.since = entry.since.clone();
        node.had_doc = entry.documented;
        node.physical_module_name = module.to_string();

        match &mut node.data {
            NodeData::Class(data) => {
                for base in &entry.bases {
                    let path = base.split("::").map(str::to_string).collect();
                    data.bases
                        .push(RelatedClass::unresolved(Access::Public, path, String::new()));
                }
            }
            NodeData::Function(data) => {
                data.parameters = Parameters::from_types(&entry.parameter_types);
                data.return_type = entry.return_type.clone();
                data.is_const = entry.is_const;
                data.metaness = entry.metaness;
                data.virtualness = entry.virtualness;
                data.overload_number = entry.overload_number;
            }
            NodeData::QmlType(data) => {
                data.qml_base_name = entry.qml_base_name.clone();
                data.imports = entry.imports.clone();
            }
            NodeData::Enum(data) => {
                data.items = entry.enum_items.clone();
            }
            NodeData::Proxy(data) => {
                *data = ProxyData {
                    proxied_module: entry.proxied_module.clone(),
                    ..ProxyData::default()
                };
            }
            _ => {}
        }

        let id = self.arena.alloc(node);
        self.arena.add_child(parent, id);

        if self.arena[id].is_qml_type() && !entry.qml_module.is_empty() {
            self.indexes
                .qml_types
                .insert(format!("{}::{}", entry.qml_module, entry.name), id);
        }
        if self.arena[id].is_proxy() {
            let tree = self
                .trees
                .last_mut()
                .expect("insert runs inside a tree");
            tree.proxies.push(id);
        }

        for child in &entry.children {
            self.insert_index_node(id, child, module);
        }
        id
    }

    /// Export the resolved primary tree as an index
    ///
    /// Private and internal nodes are left out; consumers can never link
    /// to them anyway.
    #[must_use]
    pub fn export_index(&self) -> IndexTree {
        let root = self.primary_root();
        let children = self.arena[root]
            .as_aggregate()
            .map(|agg| agg.children.clone())
            .unwrap_or_default();
        IndexTree {
            module: self.primary_module_name().to_string(),
            version: String::new(),
            root: children
                .iter()
                .filter_map(|&c| self.export_node(c))
                .collect(),
        }
    }

    fn export_node(&self, id: NodeId) -> Option<IndexNode> {
        let node = &self.arena[id];
        if node.is_private() || self.arena.is_internal(id) || node.is_dont_document() {
            return None;
        }
        let mut entry = IndexNode::for_node(node.node_type(), node.name.clone());
        entry.access = node.access;
        entry.status = node.status();
        entry.since = node.since.clone();
        entry.documented = node.had_doc;

        match &node.data {
            NodeData::Class(data) => {
                entry.bases = data
                    .bases
                    .iter()
                    .filter_map(|b| b.node.map(|n| self.arena.plain_full_name(n)))
                    .collect();
            }
            NodeData::Function(data) => {
                entry.parameter_types = data
                    .parameters
                    .types()
                    .iter()
                    .map(|t| (*t).to_string())
                    .collect();
                entry.return_type = data.return_type.clone();
                entry.is_const = data.is_const;
                entry.metaness = data.metaness;
                entry.virtualness = data.virtualness;
                entry.overload_number = data.overload_number;
            }
            NodeData::QmlType(data) => {
                entry.qml_base_name = data.qml_base_name.clone();
                entry.imports = data.imports.clone();
                entry.qml_module = data
                    .logical_module
                    .and_then(|m| self.arena[m].as_collection())
                    .map(|c| c.logical_module_name.clone())
                    .unwrap_or_default();
            }
            NodeData::Enum(data) => {
                entry.enum_items = data.items.clone();
            }
            NodeData::Proxy(data) => {
                entry.proxied_module = data.proxied_module.clone();
            }
            _ => {}
        }

        if let Some(agg) = node.as_aggregate() {
            entry.children = agg
                .children
                .iter()
                .filter_map(|&c| self.export_node(c))
                .collect();
        }
        Some(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{DeclKind, Declaration, FunctionDecl};
    use crate::location::Location;

    fn sample_index() -> &'static str {
        r#"{
            "module": "core",
            "root": [
                {
                    "kind": "class",
                    "name": "QObject",
                    "documented": true,
                    "children": [
                        {
                            "kind": "function",
                            "name": "event",
                            "virtualness": "normal_virtual",
                            "parameter_types": ["QEvent *"],
                            "return_type": "bool"
                        }
                    ]
                },
                {
                    "kind": "namespace",
                    "name": "Qt",
                    "documented": true
                }
            ]
        }"#
    }

    #[test]
    fn loaded_nodes_are_index_nodes_and_findable() {
        let mut db = Database::new("widgets");
        let root = db.load_index(sample_index().as_bytes()).unwrap();
        assert!(db.arena()[root].is_index_node);
        let class = db.find_class_node(&["QObject".to_string()]).unwrap();
        assert!(db.arena()[class].is_index_node);
        assert!(db.arena()[class].had_doc);
        assert_eq!(db.arena()[class].physical_module_name, "core");
        let function = db.find_function_node("QObject::event(QEvent *)").unwrap();
        assert_eq!(
            db.arena()[function].as_function().unwrap().virtualness,
            Virtualness::NormalVirtual
        );
    }

    #[test]
    fn primary_tree_shadows_index_trees() {
        let mut db = Database::new("widgets");
        db.load_index(sample_index().as_bytes()).unwrap();
        let local = db.declare(&Declaration {
            kind: DeclKind::Class,
            parent_path: vec![],
            name: "QObject".into(),
            access: crate::node::Access::Public,
            location: Location::new("t.h", 1, 1),
        });
        assert_eq!(db.find_class_node(&["QObject".to_string()]), Some(local));
    }

    #[test]
    fn export_round_trips_the_essentials() {
        let mut db = Database::new("widgets");
        db.declare(&Declaration {
            kind: DeclKind::Class,
            parent_path: vec![],
            name: "QWidget".into(),
            access: crate::node::Access::Public,
            location: Location::new("t.h", 1, 1),
        });
        db.declare(&Declaration {
            kind: DeclKind::Function(FunctionDecl {
                signature: Some("QEvent *event".into()),
                return_type: "bool".into(),
                ..FunctionDecl::default()
            }),
            parent_path: vec!["QWidget".into()],
            name: "event".into(),
            access: crate::node::Access::Public,
            location: Location::new("t.h", 2, 1),
        });
        db.attach_comment(
            "\\class QWidget\nThe widget.",
            Location::new("t.cpp", 1, 1),
        );
        db.resolve_all();

        let exported = db.export_index();
        assert_eq!(exported.module, "widgets");
        assert_eq!(exported.root.len(), 1);
        let class = &exported.root[0];
        assert!(class.documented);
        assert_eq!(class.children.len(), 1);
        assert_eq!(class.children[0].parameter_types, vec!["QEvent *"]);

        // A second database consumes the export
        let mut consumer = Database::new("quick");
        consumer.insert_index_tree(&exported);
        assert!(consumer.find_class_node(&["QWidget".to_string()]).is_some());
    }

    #[test]
    fn index_without_module_name_is_rejected() {
        let mut db = Database::new("widgets");
        let result = db.load_index(br#"{ "module": "", "root": [] }"#.as_slice());
        assert!(matches!(result, Err(Error::IndexMissingModule)));
        assert_eq!(db.trees().len(), 1);
    }

    #[test]
    fn internal_nodes_are_not_exported() {
        let mut db = Database::new("widgets");
        let class = db.declare(&Declaration {
            kind: DeclKind::Class,
            parent_path: vec![],
            name: "QInternal".into(),
            access: crate::node::Access::Public,
            location: Location::new("t.h", 1, 1),
        });
        db.arena_mut()[class].set_status(Status::Internal);
        assert!(db.export_index().root.is_empty());
    }
}
